use super::Entity;
use crate::core::{Document, ID_FIELD, Result, StoreError};
use serde_json::Value;

/// Encode an entity into a document.
///
/// The encoding must be a JSON object whose `_id` equals `entity.id()`.
pub fn to_document<T: Entity>(entity: &T) -> Result<Document> {
    let doc = match serde_json::to_value(entity)? {
        Value::Object(map) => map,
        other => {
            return Err(StoreError::Codec(format!(
                "{} must encode to an object, got {}",
                T::KIND,
                type_name(&other)
            )));
        }
    };

    let expected = entity.id().to_string();
    match doc.get(ID_FIELD) {
        Some(Value::String(id)) if *id == expected => Ok(doc),
        Some(other) => Err(StoreError::Codec(format!(
            "{} encodes '{}' as {} but its id is {}",
            T::KIND,
            ID_FIELD,
            other,
            expected
        ))),
        None => Err(StoreError::Codec(format!(
            "{} does not encode an '{}' field",
            T::KIND,
            ID_FIELD
        ))),
    }
}

pub fn from_document<T: Entity>(doc: Document) -> Result<T> {
    serde_json::from_value(Value::Object(doc)).map_err(|e| {
        StoreError::Codec(format!("cannot decode {}: {}", T::KIND, e))
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DocumentId;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tag {
        #[serde(rename = "_id")]
        id: DocumentId,
        label: String,
    }

    impl Entity for Tag {
        const KIND: &'static str = "Tag";

        fn id(&self) -> DocumentId {
            self.id
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Unlabelled {
        id: DocumentId,
    }

    impl Entity for Unlabelled {
        const KIND: &'static str = "Unlabelled";

        fn id(&self) -> DocumentId {
            self.id
        }
    }

    #[test]
    fn test_entity_round_trip() {
        let tag = Tag {
            id: DocumentId::generate(),
            label: "rust".into(),
        };
        let doc = to_document(&tag).unwrap();
        assert_eq!(doc["_id"], Value::String(tag.id.to_string()));
        assert_eq!(from_document::<Tag>(doc).unwrap(), tag);
    }

    #[test]
    fn test_missing_id_field_is_rejected() {
        let err = to_document(&Unlabelled {
            id: DocumentId::generate(),
        })
        .unwrap_err();
        assert!(matches!(err, StoreError::Codec(_)));
    }

    #[test]
    fn test_decode_failure_names_kind() {
        let mut doc = Document::new();
        doc.insert("_id".into(), Value::from(3));
        let err = from_document::<Tag>(doc).unwrap_err();
        assert!(err.to_string().contains("Tag"));
    }
}
