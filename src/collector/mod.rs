//! Collection of dataset documents from a document store
//!
//! A single aggregation pipeline keeps active dataset records and projects the
//! fields listed in [`crate::schema`]. Stores implement [`DocumentStore`];
//! [`MongoStore`] talks to the gateway database and [`JsonFileStore`] replays
//! an exported dump.

pub mod json_file;
pub mod mongo;

pub use json_file::JsonFileStore;
pub use mongo::MongoStore;

use crate::error::Result;
use crate::schema;
use serde_json::{json, Value};
use tracing::{debug, info};

/// Something that can run an aggregation pipeline over a named collection
pub trait DocumentStore {
    /// Run `pipeline` against `collection` and return every resulting document
    /// in the order the store yields them
    fn aggregate(&self, collection: &str, pipeline: &[Value]) -> Result<Vec<Value>>;
}

/// Pipeline selecting active datasets and the fields the reports need
pub fn dataset_pipeline() -> Vec<Value> {
    vec![
        json!({"$match": {"type": "dataset", "activeflag": "active"}}),
        json!({"$project": schema::projection()}),
    ]
}

/// Fetch every active dataset document from `collection`
pub fn collect<S: DocumentStore + ?Sized>(store: &S, collection: &str) -> Result<Vec<Value>> {
    let pipeline = dataset_pipeline();
    debug!(collection, stages = pipeline.len(), "Running dataset aggregation");

    let documents = store.aggregate(collection, &pipeline)?;
    info!(collection, count = documents.len(), "Collected dataset documents");
    Ok(documents)
}
