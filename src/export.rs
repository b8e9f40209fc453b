use crate::error::{ReportError, Result};
use crate::table::Table;
use serde_json::Value;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes tables as CSV: one header row, then one record per table row
pub struct TableWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        TableWriter {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn write_table(&mut self, table: &Table) -> csv::Result<()> {
        // A table without columns has nothing to write, not even a header
        if table.columns().is_empty() {
            return Ok(());
        }

        self.writer.write_record(table.columns())?;
        for row in table.rows() {
            self.writer
                .write_record(row.cells().iter().map(|cell| render_cell(cell).into_owned()))?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> csv::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Text of a CSV field: empty for `null`, strings verbatim, compact JSON otherwise
pub fn render_cell(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Write `table` to `path`, replacing any existing file
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let export_error = |source: csv::Error| ReportError::Export {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::create(path).map_err(|e| export_error(e.into()))?;
    let mut writer = TableWriter::new(file);
    writer.write_table(table).map_err(export_error)?;
    writer.flush().map_err(export_error)?;

    info!(path = %path.display(), rows = table.len(), "Exported table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;
    use serde_json::json;

    fn table(rows: Vec<Value>) -> Table {
        let records: Vec<Record> = rows
            .into_iter()
            .map(|row| serde_json::from_value(row).unwrap())
            .collect();
        Table::from_records(&records)
    }

    #[test]
    fn test_table_writer() {
        let mut buffer = Vec::new();
        {
            let mut writer = TableWriter::new(&mut buffer);
            writer
                .write_table(&table(vec![
                    json!({"name": "Asthma, adult", "count": 3}),
                    json!({"name": "Diabetes", "tags": ["a", "b"], "flag": true}),
                ]))
                .unwrap();
            writer.flush().unwrap();
        }

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(
            output,
            "name,count,tags,flag\n\
             \"Asthma, adult\",3,,\n\
             Diabetes,,\"[\"\"a\"\",\"\"b\"\"]\",true\n"
        );
    }

    #[test]
    fn test_header_only_for_empty_subset() {
        let subset = table(vec![json!({"pid": "p"})]).filter(|_| Ok(false)).unwrap();

        let mut buffer = Vec::new();
        {
            let mut writer = TableWriter::new(&mut buffer);
            writer.write_table(&subset).unwrap();
            writer.flush().unwrap();
        }

        assert_eq!(String::from_utf8(buffer).unwrap(), "index,pid\n");
    }

    #[test]
    fn test_write_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_csv(&table(vec![json!({"pid": "p-1"})]), &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "pid\np-1\n");
    }

    #[test]
    fn test_write_csv_reports_path() {
        let path = Path::new("/nonexistent/dir/out.csv");
        let err = write_csv(&table(vec![json!({"pid": "p-1"})]), path).unwrap_err();

        assert!(matches!(err, ReportError::Export { path: ref p, .. } if p == path));
    }
}
