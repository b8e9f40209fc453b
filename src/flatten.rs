use crate::types::{FlattenConfig, Record};
use serde_json::{Map, Value};

/// Flattens nested documents into single-level records
///
/// Nested objects are internal nodes: their keys are joined onto the parent
/// key with the configured separator. Every other value, arrays included, is
/// kept as a leaf.
#[derive(Debug, Clone, Default)]
pub struct Flattener {
    config: FlattenConfig,
}

impl Flattener {
    pub fn new(config: FlattenConfig) -> Self {
        Flattener { config }
    }

    pub fn separator(&self) -> &str {
        &self.config.separator
    }

    /// Flatten one document
    ///
    /// A document that is not an object has no keys and yields an empty record.
    pub fn flatten(&self, document: Value) -> Record {
        let mut record = Map::new();
        if let Value::Object(obj) = document {
            self.flatten_into(obj, "", &mut record);
        }
        record
    }

    /// Flatten every document, preserving order and cardinality
    pub fn flatten_all(&self, documents: Vec<Value>) -> Vec<Record> {
        documents
            .into_iter()
            .map(|document| self.flatten(document))
            .collect()
    }

    /// Recursively copy the leaves of `obj` into `out` under `prefix`
    fn flatten_into(&self, obj: Map<String, Value>, prefix: &str, out: &mut Record) {
        for (key, value) in obj.into_iter() {
            let joined = if prefix.is_empty() {
                key
            } else {
                format!("{}{}{}", prefix, self.config.separator, key)
            };

            match value {
                Value::Object(nested) => self.flatten_into(nested, &joined, out),
                // On collision the later value wins and the key keeps its first position
                leaf => {
                    out.insert(joined, leaf);
                }
            }
        }
    }
}

/// Flatten a single document with the default `_` separator
pub fn flatten(document: Value) -> Record {
    Flattener::default().flatten(document)
}
