//! Output records: the per-document [`DocumentRecord`] and the [`Manifest`].
//!
//! A `DocumentRecord` is an open-schema JSON object. The pipeline never looks
//! inside it; extractors add whatever fields they know about, so a new
//! extractor never requires a change to this type. Keys are kept in a sorted
//! map, which makes serialisation deterministic regardless of the order in
//! which extractors wrote their fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON-LD context used by every record and the manifest.
pub const SCHEMA_CONTEXT: &str = "http://schema.org";

/// Mutable, open-ended metadata record for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRecord {
    fields: Map<String, Value>,
}

impl DocumentRecord {
    /// An empty record with no fields at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh schema.org `CreativeWork`: only `@context` and `@type` are set.
    ///
    /// This is what the pipeline allocates for every document before running
    /// the extractor chain.
    pub fn creative_work() -> Self {
        let mut record = Self::new();
        record.insert("@context", SCHEMA_CONTEXT);
        record.insert("@type", "CreativeWork");
        record
    }

    /// Set a field, replacing any previous value. Last writer wins.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Copy every field of `other` into `self`; `other` wins on collisions.
    pub fn merge(&mut self, other: DocumentRecord) {
        self.fields.extend(other.fields);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Consume the record into a plain JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// The single aggregate file listing every converted document, encoded as a
/// schema.org `ItemList` of output-relative record paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "@context")]
    pub context: String,

    #[serde(rename = "@type")]
    pub kind: String,

    /// Record paths in discovery order.
    #[serde(rename = "itemListElement")]
    pub elements: Vec<String>,
}

impl Manifest {
    pub fn new(elements: Vec<String>) -> Self {
        Self {
            context: SCHEMA_CONTEXT.to_string(),
            kind: "ItemList".to_string(),
            elements,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
