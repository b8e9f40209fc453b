//! Usage-licence classification of dataset rows
//!
//! Commercial use: a dataset qualifies when its allowable-use tier is `Gold`
//! or `Platinum`, which outweighs every other field. When the tier is the
//! empty string the data use limitation decides instead, and it qualifies if
//! it mentions `NO RESTRICTION` or `“COMMERCIAL RESEARCH USE`.
//!
//! Not for profit: a dataset is flagged when either its data use limitation
//! or its data use requirements mention `NOT FOR PROFIT USE`.

use crate::error::{ReportError, Result};
use crate::schema::{DatasetColumns, DatasetField};
use crate::table::{Row, Table};
use serde_json::Value;
use std::borrow::Cow;
use tracing::info;

/// Allowable-use tiers that mark a dataset as commercially usable
pub const COMMERCIAL_TIERS: [&str; 2] = ["Gold", "Platinum"];

/// Data use limitation phrases that allow commercial use when no tier is set
///
/// The curly quote is part of the phrase as stored in the gateway's rule.
pub const COMMERCIAL_LIMITATIONS: [&str; 2] = ["NO RESTRICTION", "\u{201C}COMMERCIAL RESEARCH USE"];

pub const NOT_FOR_PROFIT_PHRASE: &str = "NOT FOR PROFIT USE";

/// Text used for substring checks: `null` reads as `None`, strings as
/// themselves and other values as their JSON text
pub fn coerce_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed("None"),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Column positions the classification rules read from
#[derive(Debug, Clone, Copy)]
struct RuleColumns {
    allowable_uses: Option<usize>,
    data_use_limitation: Option<usize>,
    data_use_requirements: Option<usize>,
}

impl RuleColumns {
    fn locate(table: &Table, columns: &DatasetColumns) -> Self {
        RuleColumns {
            allowable_uses: table.column_position(&columns.get(DatasetField::AllowableUses)),
            data_use_limitation: table
                .column_position(&columns.get(DatasetField::DataUseLimitation)),
            data_use_requirements: table
                .column_position(&columns.get(DatasetField::DataUseRequirements)),
        }
    }
}

/// Cell at an optional column position; an absent column reads as `null`
fn cell(row: &Row, position: Option<usize>) -> &Value {
    static NULL: Value = Value::Null;
    position.map_or(&NULL, |p| row.cell(p))
}

/// Commercial-use rule for one row
fn is_commercial(row: &Row, rule: &RuleColumns, column: &str) -> Result<bool> {
    let allowable_uses = match cell(row, rule.allowable_uses) {
        Value::String(s) => Some(s.as_str()),
        Value::Null => None,
        other => {
            return Err(ReportError::FieldType {
                column: column.to_string(),
                row: row.index(),
                found: other.to_string(),
            })
        }
    };

    let Some(tier) = allowable_uses else {
        return Ok(false);
    };

    if COMMERCIAL_TIERS.contains(&tier.trim()) {
        return Ok(true);
    }

    if tier.is_empty() {
        let limitation = coerce_text(cell(row, rule.data_use_limitation));
        return Ok(COMMERCIAL_LIMITATIONS
            .iter()
            .any(|phrase| limitation.contains(phrase)));
    }

    Ok(false)
}

/// Not-for-profit rule for one row
fn is_not_for_profit(row: &Row, rule: &RuleColumns) -> bool {
    coerce_text(cell(row, rule.data_use_limitation)).contains(NOT_FOR_PROFIT_PHRASE)
        || coerce_text(cell(row, rule.data_use_requirements)).contains(NOT_FOR_PROFIT_PHRASE)
}

/// Rows of `table` that qualify for commercial use
///
/// # Errors
///
/// Returns `ReportError::FieldType` when an allowable-use cell is neither a
/// string nor null.
pub fn commercial_datasets(table: &Table, columns: &DatasetColumns) -> Result<Table> {
    let rule = RuleColumns::locate(table, columns);
    let column = columns.get(DatasetField::AllowableUses);

    let subset = table.filter(|row| is_commercial(row, &rule, &column))?;
    info!(count = subset.len(), total = table.len(), "Classified commercial datasets");
    Ok(subset)
}

/// Rows of `table` flagged as not-for-profit only
pub fn not_for_profit_datasets(table: &Table, columns: &DatasetColumns) -> Result<Table> {
    let rule = RuleColumns::locate(table, columns);

    let subset = table.filter(|row| Ok(is_not_for_profit(row, &rule)))?;
    info!(count = subset.len(), total = table.len(), "Classified not-for-profit datasets");
    Ok(subset)
}
