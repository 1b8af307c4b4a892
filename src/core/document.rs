//! Document representation shared by the store and the entity codec.
//!
//! A document is a JSON object. Fields are addressed with dotted paths
//! (`"reviews"`, `"address.city"`); array elements are not addressable.

use super::error::{Result, StoreError};
use super::id::DocumentId;
use serde_json::{Map, Value};

pub type Document = Map<String, Value>;

/// Name of the identity field of every stored document.
pub const ID_FIELD: &str = "_id";

/// Read the identifier of a document, if it has a well-formed one.
pub fn document_id(doc: &Document) -> Option<DocumentId> {
    doc.get(ID_FIELD)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}

/// Resolve a dotted path against a document.
pub fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Append `value` to the array at `path`, creating the array (and any missing
/// parent objects) when absent.
pub fn push_at_path(doc: &mut Document, path: &str, value: Value) -> Result<()> {
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(StoreError::InvalidDocument(format!(
            "invalid field path '{}'",
            path
        )));
    }
    if path == ID_FIELD {
        return Err(StoreError::ImmutableId(path.to_string()));
    }

    let (parents, leaf) = match path.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, path),
    };

    let mut target = doc;
    if let Some(parents) = parents {
        for segment in parents.split('.') {
            let entry = target
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            target = match entry {
                Value::Object(map) => map,
                _ => {
                    return Err(StoreError::InvalidDocument(format!(
                        "cannot create field '{}' in non-object element '{}'",
                        leaf, segment
                    )));
                }
            };
        }
    }

    match target
        .entry(leaf.to_string())
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(items) => {
            items.push(value);
            Ok(())
        }
        _ => Err(StoreError::NotAnArray(path.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_get_nested_path() {
        let d = doc(json!({"a": {"b": {"c": 3}}, "x": 1}));
        assert_eq!(get_path(&d, "a.b.c"), Some(&json!(3)));
        assert_eq!(get_path(&d, "x"), Some(&json!(1)));
        assert_eq!(get_path(&d, "a.missing"), None);
        assert_eq!(get_path(&d, "x.y"), None);
    }

    #[test]
    fn test_push_appends_to_existing_array() {
        let mut d = doc(json!({"tags": ["a"]}));
        push_at_path(&mut d, "tags", json!("b")).unwrap();
        assert_eq!(d["tags"], json!(["a", "b"]));
    }

    #[test]
    fn test_push_creates_missing_array_and_parents() {
        let mut d = doc(json!({}));
        push_at_path(&mut d, "meta.tags", json!(1)).unwrap();
        assert_eq!(Value::Object(d), json!({"meta": {"tags": [1]}}));
    }

    #[test]
    fn test_push_rejects_non_array() {
        let mut d = doc(json!({"name": "x"}));
        let err = push_at_path(&mut d, "name", json!(1)).unwrap_err();
        assert_eq!(err, StoreError::NotAnArray("name".into()));
    }

    #[test]
    fn test_push_rejects_id_field() {
        let mut d = doc(json!({"_id": "abc"}));
        assert!(push_at_path(&mut d, "_id", json!(1)).is_err());
    }

    #[test]
    fn test_document_id() {
        let id = DocumentId::generate();
        let d = doc(json!({"_id": id.to_string()}));
        assert_eq!(document_id(&d), Some(id));
        assert_eq!(document_id(&doc(json!({"_id": 5}))), None);
    }
}
