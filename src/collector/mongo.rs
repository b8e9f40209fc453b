use super::DocumentStore;
use crate::config::Config;
use crate::error::Result;
use mongodb::bson::{Bson, Document};
use mongodb::sync::Client;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Document store backed by the gateway's MongoDB database
pub struct MongoStore {
    client: Client,
    database: String,
}

impl MongoStore {
    /// Create a client for the database named in `config`
    ///
    /// The driver connects lazily, so bad credentials or an unreachable host
    /// surface on the first aggregation.
    pub fn connect(config: &Config) -> Result<Self> {
        info!(host = %config.host, database = %config.database, "Connecting to document store");
        let client = Client::with_uri_str(config.connection_string())?;

        Ok(MongoStore {
            client,
            database: config.database.clone(),
        })
    }
}

impl DocumentStore for MongoStore {
    fn aggregate(&self, collection: &str, pipeline: &[Value]) -> Result<Vec<Value>> {
        let stages: Vec<Document> = pipeline
            .iter()
            .filter_map(|stage| match json_to_bson(stage) {
                Bson::Document(doc) => Some(doc),
                _ => None,
            })
            .collect();

        let collection = self
            .client
            .database(&self.database)
            .collection::<Document>(collection);

        let mut documents = Vec::new();
        for document in collection.aggregate(stages).run()? {
            documents.push(bson_to_json(Bson::Document(document?)));
        }

        debug!(count = documents.len(), "Aggregation finished");
        Ok(documents)
    }
}

/// Convert a pipeline stage into BSON
fn json_to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(small) => Bson::Int32(small),
                    Err(_) => Bson::Int64(i),
                }
            } else {
                Bson::Double(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(json_to_bson).collect()),
        Value::Object(obj) => {
            let mut doc = Document::new();
            for (key, value) in obj {
                doc.insert(key.clone(), json_to_bson(value));
            }
            Bson::Document(doc)
        }
    }
}

/// Convert a fetched BSON value into a raw document value
///
/// Embedded documents stay nested so they can be flattened. Identifiers and
/// dates become strings so they land in a single column instead of being
/// split into extended-JSON wrapper keys.
pub(crate) fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect::<Map<String, Value>>(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::String(s) => Value::String(s),
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Int32(i) => Value::from(i),
        Bson::Int64(i) => Value::from(i),
        Bson::Double(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(
            dt.try_to_rfc3339_string()
                .unwrap_or_else(|_| dt.timestamp_millis().to_string()),
        ),
        other => Value::String(other.into_relaxed_extjson().to_string()),
    }
}
