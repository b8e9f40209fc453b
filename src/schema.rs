//! Dataset fields shared by the collection query and the report columns
//!
//! The aggregation projection and the export projection both derive their
//! field names from [`DatasetField`], so a renamed source field only has to
//! change here.

use serde_json::{Map, Value};

/// Column added to classified subsets holding each row's original position
pub const INDEX_COLUMN: &str = "index";

/// A field of a dataset record, addressed by its path in the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetField {
    Id,
    Pid,
    Title,
    AllowableUses,
    MetadataUrl,
    DataUseLimitation,
    DataUseRequirements,
    PublisherName,
    PublisherMemberOf,
}

impl DatasetField {
    /// Every field the collector asks the store for, in projection order
    pub const ALL: [DatasetField; 9] = [
        DatasetField::Id,
        DatasetField::Pid,
        DatasetField::Title,
        DatasetField::AllowableUses,
        DatasetField::MetadataUrl,
        DatasetField::DataUseLimitation,
        DatasetField::DataUseRequirements,
        DatasetField::PublisherName,
        DatasetField::PublisherMemberOf,
    ];

    /// Column order of the commercial and not-for-profit exports
    pub const EXPORT_ORDER: [DatasetField; 6] = [
        DatasetField::Id,
        DatasetField::Pid,
        DatasetField::PublisherMemberOf,
        DatasetField::PublisherName,
        DatasetField::Title,
        DatasetField::MetadataUrl,
    ];

    /// Working fields used by the classifier and dropped before export
    pub const WORKING: [DatasetField; 3] = [
        DatasetField::AllowableUses,
        DatasetField::DataUseLimitation,
        DatasetField::DataUseRequirements,
    ];

    /// Key path of this field inside a raw dataset document
    pub fn path(self) -> &'static [&'static str] {
        match self {
            DatasetField::Id => &["_id"],
            DatasetField::Pid => &["pid"],
            DatasetField::Title => &["datasetfields", "datautility", "title"],
            DatasetField::AllowableUses => &["datasetfields", "datautility", "allowable_uses"],
            DatasetField::MetadataUrl => &["datasetfields", "metadataschema", "url"],
            DatasetField::DataUseLimitation => {
                &["datasetv2", "accessibility", "usage", "dataUseLimitation"]
            }
            DatasetField::DataUseRequirements => {
                &["datasetv2", "accessibility", "usage", "dataUseRequirements"]
            }
            DatasetField::PublisherName => &["datasetv2", "summary", "publisher", "name"],
            DatasetField::PublisherMemberOf => &["datasetv2", "summary", "publisher", "memberOf"],
        }
    }

    /// Dotted path as used in store projections, e.g. `datasetfields.metadataschema.url`
    pub fn dotted_path(self) -> String {
        self.path().join(".")
    }

    /// Name of the flattened column for this field
    pub fn column(self, separator: &str) -> String {
        self.path().join(separator)
    }

    /// Header written in the classified exports, `None` for working fields
    pub fn export_header(self) -> Option<&'static str> {
        match self {
            DatasetField::Id => Some("_id"),
            DatasetField::Pid => Some("pid"),
            DatasetField::Title => Some("Dataset Name"),
            DatasetField::MetadataUrl => Some("URL"),
            DatasetField::PublisherName => Some("Publisher"),
            DatasetField::PublisherMemberOf => Some("Member Of"),
            DatasetField::AllowableUses
            | DatasetField::DataUseLimitation
            | DatasetField::DataUseRequirements => None,
        }
    }
}

/// The `$project` body selecting every dataset field
///
/// `_id` is left out because the store always returns it.
pub fn projection() -> Map<String, Value> {
    DatasetField::ALL
        .iter()
        .filter(|field| **field != DatasetField::Id)
        .map(|field| (field.dotted_path(), Value::from(1)))
        .collect()
}

/// Flattened column names of the dataset fields for one separator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetColumns {
    separator: String,
}

impl DatasetColumns {
    pub fn new(separator: impl Into<String>) -> Self {
        DatasetColumns {
            separator: separator.into(),
        }
    }

    pub fn get(&self, field: DatasetField) -> String {
        field.column(&self.separator)
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl Default for DatasetColumns {
    fn default() -> Self {
        DatasetColumns::new(crate::types::DEFAULT_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns() {
        let columns = DatasetColumns::default();
        assert_eq!(columns.get(DatasetField::Id), "_id");
        assert_eq!(
            columns.get(DatasetField::AllowableUses),
            "datasetfields_datautility_allowable_uses"
        );
        assert_eq!(
            columns.get(DatasetField::PublisherMemberOf),
            "datasetv2_summary_publisher_memberOf"
        );
    }

    #[test]
    fn test_projection_uses_dotted_paths() {
        let projection = projection();

        assert_eq!(projection.len(), 8);
        assert!(!projection.contains_key("_id"));
        assert_eq!(projection.get("pid").unwrap(), 1);
        assert_eq!(
            projection
                .get("datasetv2.accessibility.usage.dataUseRequirements")
                .unwrap(),
            1
        );
    }

    #[test]
    fn test_working_fields_have_no_export_header() {
        for field in DatasetField::WORKING {
            assert!(field.export_header().is_none());
        }
        for field in DatasetField::EXPORT_ORDER {
            assert!(field.export_header().is_some());
        }
    }
}
