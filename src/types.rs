use serde_json::{Map, Value};

/// Separator placed between the keys of a nested path when flattening
pub const DEFAULT_SEPARATOR: &str = "_";

/// A single-level mapping produced by flattening one raw document
pub type Record = Map<String, Value>;

/// Configuration for the flattening process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenConfig {
    /// Separator for joined key paths
    pub separator: String,
}

impl FlattenConfig {
    pub fn with_separator(separator: impl Into<String>) -> Self {
        FlattenConfig {
            separator: separator.into(),
        }
    }
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig {
            separator: String::from(DEFAULT_SEPARATOR),
        }
    }
}
