use dataset_usage::{
    run_report, DocumentStore, FlattenConfig, JsonFileStore, ReportError, ReportPaths,
    ReportSummary,
};
use serde_json::{json, Value};
use std::fs;

struct MemoryStore {
    documents: Vec<Value>,
}

impl DocumentStore for MemoryStore {
    fn aggregate(&self, _collection: &str, _pipeline: &[Value]) -> dataset_usage::Result<Vec<Value>> {
        Ok(self.documents.clone())
    }
}

fn dataset(id: &str, allowable_uses: &str, limitation: Value, requirements: Value) -> Value {
    json!({
        "_id": id,
        "pid": format!("pid-{}", id),
        "datasetfields": {
            "datautility": {"allowable_uses": allowable_uses, "title": format!("Dataset {}", id)},
            "metadataschema": {"url": format!("https://example.org/{}", id)}
        },
        "datasetv2": {
            "accessibility": {
                "usage": {"dataUseLimitation": limitation, "dataUseRequirements": requirements}
            },
            "summary": {"publisher": {"name": "SAIL", "memberOf": "ALLIANCE"}}
        }
    })
}

#[test]
fn test_platinum_and_not_for_profit_split() {
    let store = MemoryStore {
        documents: vec![
            dataset("1", "Platinum", Value::Null, Value::Null),
            dataset("2", "", json!("NOT FOR PROFIT USE"), Value::Null),
        ],
    };
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::in_dir(dir.path());

    let summary = run_report(&store, "tools", &paths, &FlattenConfig::default()).unwrap();

    assert_eq!(
        summary,
        ReportSummary {
            total: 2,
            commercial: 1,
            not_for_profit: 1
        }
    );

    let full = fs::read_to_string(&paths.full).unwrap();
    let mut lines = full.lines();
    assert_eq!(
        lines.next().unwrap(),
        "_id,pid,datasetfields_datautility_allowable_uses,datasetfields_datautility_title,\
         datasetfields_metadataschema_url,datasetv2_accessibility_usage_dataUseLimitation,\
         datasetv2_accessibility_usage_dataUseRequirements,datasetv2_summary_publisher_name,\
         datasetv2_summary_publisher_memberOf"
    );
    assert_eq!(
        lines.next().unwrap(),
        "1,pid-1,Platinum,Dataset 1,https://example.org/1,,,SAIL,ALLIANCE"
    );
    assert_eq!(
        lines.next().unwrap(),
        "2,pid-2,,Dataset 2,https://example.org/2,NOT FOR PROFIT USE,,SAIL,ALLIANCE"
    );
    assert!(lines.next().is_none());

    assert_eq!(
        fs::read_to_string(&paths.commercial).unwrap(),
        "_id,pid,Member Of,Publisher,Dataset Name,URL\n\
         1,pid-1,ALLIANCE,SAIL,Dataset 1,https://example.org/1\n"
    );
    assert_eq!(
        fs::read_to_string(&paths.not_for_profit).unwrap(),
        "_id,pid,Member Of,Publisher,Dataset Name,URL\n\
         2,pid-2,ALLIANCE,SAIL,Dataset 2,https://example.org/2\n"
    );
}

#[test]
fn test_empty_subsets_still_written() {
    let store = MemoryStore {
        documents: vec![dataset("1", "Silver", json!("NO RESTRICTION"), Value::Null)],
    };
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::in_dir(dir.path());

    let summary = run_report(&store, "tools", &paths, &FlattenConfig::default()).unwrap();

    assert_eq!(summary.commercial, 0);
    assert_eq!(summary.not_for_profit, 0);
    assert_eq!(
        fs::read_to_string(&paths.commercial).unwrap(),
        "_id,pid,Member Of,Publisher,Dataset Name,URL\n"
    );
    assert_eq!(
        fs::read_to_string(&paths.not_for_profit).unwrap(),
        "_id,pid,Member Of,Publisher,Dataset Name,URL\n"
    );
}

#[test]
fn test_schema_drift_writes_nothing() {
    let mut document = dataset("1", "Gold", Value::Null, Value::Null);
    document["datasetv2"]["summary"]
        .as_object_mut()
        .unwrap()
        .remove("publisher");
    let store = MemoryStore {
        documents: vec![document],
    };
    let dir = tempfile::tempdir().unwrap();
    let paths = ReportPaths::in_dir(dir.path());

    let err = run_report(&store, "tools", &paths, &FlattenConfig::default()).unwrap_err();

    assert!(matches!(err, ReportError::SchemaMismatch { .. }));
    assert!(!paths.full.exists());
}

#[test]
fn test_report_from_collection_export() {
    let mut active = dataset("1", "Gold", Value::Null, json!("NOT FOR PROFIT USE ONLY"));
    active["type"] = json!("dataset");
    active["activeflag"] = json!("active");
    let mut archived = dataset("2", "Gold", Value::Null, Value::Null);
    archived["type"] = json!("dataset");
    archived["activeflag"] = json!("archive");

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tools.json");
    fs::write(&input, format!("{}\n{}\n", active, archived)).unwrap();
    let paths = ReportPaths::in_dir(dir.path());

    let summary = run_report(
        &JsonFileStore::new(&input),
        "tools",
        &paths,
        &FlattenConfig::default(),
    )
    .unwrap();

    assert_eq!(
        summary,
        ReportSummary {
            total: 1,
            commercial: 1,
            not_for_profit: 1
        }
    );
    let full = fs::read_to_string(&paths.full).unwrap();
    assert!(!full.contains("activeflag"));
}
