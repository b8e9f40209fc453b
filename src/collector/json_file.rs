use super::DocumentStore;
use crate::error::{ReportError, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Document store reading a JSON export of a single collection
///
/// The file may hold a JSON array of documents, a single document, or one
/// document per line (the `mongoexport` default). `$match` equality filters
/// and `$project` inclusions are applied in memory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every document in the file
    pub fn load(&self) -> Result<Vec<Value>> {
        let content = std::fs::read(&self.path).map_err(|e| self.source_error(e))?;
        let documents = parse_documents(content).map_err(|e| self.source_error(e))?;
        debug!(path = %self.path.display(), count = documents.len(), "Loaded documents");
        Ok(documents)
    }

    fn source_error(&self, err: impl std::fmt::Display) -> ReportError {
        ReportError::Source {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }
}

impl DocumentStore for JsonFileStore {
    fn aggregate(&self, collection: &str, pipeline: &[Value]) -> Result<Vec<Value>> {
        debug!(collection, path = %self.path.display(), "Reading collection export");
        let mut documents = self.load()?;

        for stage in pipeline {
            documents = match stage.as_object().and_then(|s| s.iter().next()) {
                Some((name, spec)) if name == "$match" => {
                    let filter = spec.as_object().cloned().unwrap_or_default();
                    documents
                        .into_iter()
                        .filter(|doc| matches_filter(doc, &filter))
                        .collect()
                }
                Some((name, spec)) if name == "$project" => {
                    let spec = spec.as_object().cloned().unwrap_or_default();
                    documents
                        .into_iter()
                        .map(|doc| apply_projection(&doc, &spec))
                        .collect()
                }
                Some((name, _)) => {
                    return Err(self.source_error(format!("unsupported pipeline stage {}", name)))
                }
                None => return Err(self.source_error("empty pipeline stage")),
            };
        }

        Ok(documents)
    }
}

/// Parse a JSON array, a single document, or newline-delimited documents
fn parse_documents(content: Vec<u8>) -> std::result::Result<Vec<Value>, String> {
    // simd-json parses in place, so keep the original bytes for the NDJSON fallback
    let mut scratch = content.clone();
    match simd_json::serde::from_slice::<Value>(&mut scratch) {
        Ok(Value::Array(items)) => return Ok(items),
        Ok(doc @ Value::Object(_)) => return Ok(vec![doc]),
        Ok(other) => return Err(format!("expected documents, found {}", other)),
        Err(_) => {}
    }

    // Fallback for NDJSON
    let mut documents = Vec::new();
    let text = String::from_utf8_lossy(&content);
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .map_err(|e| format!("line {}: {}", line_no + 1, e))?;
        if !value.is_object() {
            warn!(line = line_no + 1, "Skipping non-object line");
            continue;
        }
        documents.push(value);
    }
    Ok(documents)
}

/// Value at a dotted path, `None` when any step is missing
fn lookup<'a>(doc: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted
        .split('.')
        .try_fold(doc, |current, key| current.as_object()?.get(key))
}

fn matches_filter(doc: &Value, filter: &Map<String, Value>) -> bool {
    filter
        .iter()
        .all(|(path, expected)| lookup(doc, path) == Some(expected))
}

/// Keep `_id` and the included dotted paths, in the document's own field order
fn apply_projection(doc: &Value, spec: &Map<String, Value>) -> Value {
    let Some(obj) = doc.as_object() else {
        return doc.clone();
    };

    let keep_id = spec.get("_id").map_or(true, is_inclusion);
    let mut paths: Vec<Vec<&str>> = spec
        .iter()
        .filter(|(key, value)| key.as_str() != "_id" && is_inclusion(value))
        .map(|(key, _)| key.split('.').collect())
        .collect();
    if keep_id {
        paths.push(vec!["_id"]);
    }

    Value::Object(project_object(obj, &paths))
}

fn is_inclusion(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        _ => false,
    }
}

fn project_object(obj: &Map<String, Value>, paths: &[Vec<&str>]) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in obj {
        let rests: Vec<Vec<&str>> = paths
            .iter()
            .filter(|path| path.first() == Some(&key.as_str()))
            .map(|path| path[1..].to_vec())
            .collect();

        if rests.is_empty() {
            continue;
        }
        if rests.iter().any(Vec::is_empty) {
            out.insert(key.clone(), value.clone());
        } else if let Value::Object(inner) = value {
            out.insert(key.clone(), Value::Object(project_object(inner, &rests)));
        }
    }
    out
}
