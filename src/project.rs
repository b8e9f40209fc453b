use crate::error::Result;
use crate::schema::{DatasetColumns, DatasetField, INDEX_COLUMN};
use crate::table::Table;

/// Reduce a classified subset to the six export columns
///
/// Drops the `index` column and the working fields, renames the remaining
/// dataset fields to their export headers and orders them as
/// `_id, pid, Member Of, Publisher, Dataset Name, URL`.
///
/// # Errors
///
/// Returns `ReportError::SchemaMismatch` naming the first expected column
/// missing from `subset`.
pub fn project_for_export(subset: Table, columns: &DatasetColumns) -> Result<Table> {
    let mut dropped = vec![INDEX_COLUMN.to_string()];
    dropped.extend(DatasetField::WORKING.iter().map(|field| columns.get(*field)));

    let renames: Vec<(String, String)> = DatasetField::EXPORT_ORDER
        .iter()
        .filter_map(|field| {
            let header = field.export_header()?;
            let column = columns.get(*field);
            (column != header).then(|| (column, header.to_string()))
        })
        .collect();

    let order: Vec<&str> = DatasetField::EXPORT_ORDER
        .iter()
        .filter_map(|field| field.export_header())
        .collect();

    subset
        .drop_columns(&dropped)?
        .rename_columns(&renames)?
        .select_columns(&order)
}
