//! Tabular view over flattened records
//!
//! A [`Table`] has one column per key seen across its records, in the order
//! the keys were first seen, and one row per record. Cells for keys a record
//! does not have are `null`.

use crate::error::{ReportError, Result};
use crate::schema::INDEX_COLUMN;
use crate::types::Record;
use serde_json::Value;
use std::collections::HashMap;

static NULL: Value = Value::Null;

/// One table row: its zero-based position and one cell per column
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    index: usize,
    cells: Vec<Value>,
}

impl Row {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    /// Cell at a column position, `null` when out of range
    pub fn cell(&self, position: usize) -> &Value {
        self.cells.get(position).unwrap_or(&NULL)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table from flattened records
    pub fn from_records(records: &[Record]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for record in records {
            for key in record.keys() {
                if !positions.contains_key(key.as_str()) {
                    positions.insert(key.as_str(), columns.len());
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let mut cells = vec![Value::Null; columns.len()];
                for (key, value) in record {
                    cells[positions[key.as_str()]] = value.clone();
                }
                Row { index, cells }
            })
            .collect();

        Table { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Position of a column, or a schema mismatch error when it is absent
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_position(name)
            .ok_or_else(|| ReportError::missing_column(name))
    }

    /// Cell by row position and column name, `None` if either is absent
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let position = self.column_position(column)?;
        self.rows.get(row).map(|r| r.cell(position))
    }

    /// Keep the rows matching `predicate`, in order
    ///
    /// The result has the same columns preceded by an `index` column holding
    /// each kept row's position in this table. Rows of the result are
    /// renumbered from zero.
    pub fn filter<F>(&self, mut predicate: F) -> Result<Table>
    where
        F: FnMut(&Row) -> Result<bool>,
    {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(INDEX_COLUMN.to_string());
        columns.extend(self.columns.iter().cloned());

        let mut rows = Vec::new();
        for row in &self.rows {
            if predicate(row)? {
                let mut cells = Vec::with_capacity(columns.len());
                cells.push(Value::from(row.index));
                cells.extend(row.cells.iter().cloned());
                rows.push(Row {
                    index: rows.len(),
                    cells,
                });
            }
        }

        Ok(Table { columns, rows })
    }

    /// Remove the named columns; every name must exist
    pub fn drop_columns<S: AsRef<str>>(self, names: &[S]) -> Result<Table> {
        let mut drop = Vec::with_capacity(names.len());
        for name in names {
            drop.push(self.require_column(name.as_ref())?);
        }

        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|position| !drop.contains(position))
            .collect();
        Ok(self.take_columns(&keep))
    }

    /// Rename columns given as `(from, to)` pairs; every `from` must exist
    pub fn rename_columns<S: AsRef<str>>(mut self, renames: &[(S, S)]) -> Result<Table> {
        for (from, to) in renames {
            let position = self.require_column(from.as_ref())?;
            self.columns[position] = to.as_ref().to_string();
        }
        Ok(self)
    }

    /// Keep only the named columns, in the given order
    pub fn select_columns<S: AsRef<str>>(self, names: &[S]) -> Result<Table> {
        let mut keep = Vec::with_capacity(names.len());
        for name in names {
            keep.push(self.require_column(name.as_ref())?);
        }
        Ok(self.take_columns(&keep))
    }

    fn take_columns(self, positions: &[usize]) -> Table {
        let columns = positions
            .iter()
            .map(|&position| self.columns[position].clone())
            .collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| Row {
                index: row.index,
                cells: positions
                    .iter()
                    .map(|&position| row.cell(position).clone())
                    .collect(),
            })
            .collect();

        Table { columns, rows }
    }
}
