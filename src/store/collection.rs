use crate::core::{Document, DocumentId};
use crate::query::Filter;
use im::{HashMap as ImHashMap, OrdMap};

/// A stored document with the bookkeeping the store needs.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoredDocument {
    pub id: DocumentId,
    /// Bumped on every write; used to detect conflicting commits
    pub version: u64,
    pub body: Document,
}

/// Documents of one collection, in insertion order.
///
/// Both maps are persistent, so cloning a collection (or a whole database
/// snapshot) is O(1) and later writes only copy the touched paths.
#[derive(Debug, Clone, Default)]
pub(crate) struct CollectionData {
    docs: OrdMap<u64, StoredDocument>,
    index: ImHashMap<DocumentId, u64>,
}

/// Collection name -> contents.
pub(crate) type Snapshot = ImHashMap<String, CollectionData>;

impl CollectionData {
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &DocumentId) -> Option<&StoredDocument> {
        self.index.get(id).and_then(|seq| self.docs.get(seq))
    }

    /// Sequence number of `id`, i.e. its position in insertion order.
    pub fn seq_of(&self, id: &DocumentId) -> Option<u64> {
        self.index.get(id).copied()
    }

    /// Matching documents in insertion order.
    pub fn matching<'a>(
        &'a self,
        filter: &'a Filter,
    ) -> Box<dyn Iterator<Item = &'a StoredDocument> + 'a> {
        match filter.pinned_id() {
            Some(id) => Box::new(
                self.get(&id)
                    .into_iter()
                    .filter(move |d| filter.matches(&d.body)),
            ),
            None => Box::new(self.docs.values().filter(move |d| filter.matches(&d.body))),
        }
    }

    pub fn first_match<'a>(&'a self, filter: &'a Filter) -> Option<&'a StoredDocument> {
        self.matching(filter).next()
    }

    /// Insert or overwrite the document at `seq`.
    pub fn put(&mut self, seq: u64, doc: StoredDocument) {
        if let Some(old_seq) = self.index.get(&doc.id).copied()
            && old_seq != seq
        {
            self.docs.remove(&old_seq);
        }
        self.index.insert(doc.id, seq);
        self.docs.insert(seq, doc);
    }

    pub fn remove(&mut self, id: &DocumentId) -> Option<StoredDocument> {
        let seq = self.index.remove(id)?;
        self.docs.remove(&seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn stored(name: &str) -> StoredDocument {
        let id = DocumentId::generate();
        let body = match json!({"_id": id.to_string(), "name": name}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        StoredDocument { id, version: 1, body }
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut coll = CollectionData::default();
        for (seq, name) in ["c", "a", "b"].iter().enumerate() {
            coll.put(seq as u64, stored(name));
        }
        let names: Vec<_> = coll
            .matching(&Filter::Empty)
            .map(|d| d.body["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("c"), json!("a"), json!("b")]);
    }

    #[test]
    fn test_lookup_and_remove() {
        let mut coll = CollectionData::default();
        let doc = stored("x");
        let id = doc.id;
        coll.put(5, doc);

        assert!(coll.contains(&id));
        assert_eq!(coll.seq_of(&id), Some(5));
        assert!(coll.first_match(&Filter::by_id(id)).is_some());
        assert!(coll.remove(&id).is_some());
        assert_eq!(coll.len(), 0);
        assert!(coll.first_match(&Filter::by_id(id)).is_none());
    }

    #[test]
    fn test_pinned_lookup_agrees_with_matches() {
        let mut coll = CollectionData::default();
        let doc = stored("x");
        let id = doc.id;
        coll.put(1, doc);

        let upper = Filter::eq("_id", id.to_string().to_uppercase());
        assert!(coll.first_match(&upper).is_none());

        let narrowed = Filter::by_id(id).and(Filter::eq("name", "y"));
        assert!(coll.first_match(&narrowed).is_none());
        let widened = Filter::by_id(id).and(Filter::eq("name", "x"));
        assert!(coll.first_match(&widened).is_some());
    }

    #[test]
    fn test_put_moves_document_to_new_seq() {
        let mut coll = CollectionData::default();
        let doc = stored("x");
        coll.put(1, doc.clone());
        coll.put(9, doc);
        assert_eq!(coll.len(), 1);
        assert_eq!(coll.seq_of(&coll.first_match(&Filter::Empty).unwrap().id), Some(9));
    }

    #[test]
    fn test_snapshot_clone_is_isolated() {
        let mut coll = CollectionData::default();
        coll.put(1, stored("x"));
        let snapshot = coll.clone();
        coll.put(2, stored("y"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(coll.len(), 2);
    }
}
