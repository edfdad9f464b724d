//! Catalog Formatter: maps POS field names onto the internal catalog schema.
//!
//! Field policy:
//!
//! | field            | absent | present                                      |
//! |------------------|--------|----------------------------------------------|
//! | name, category, barcode | `""` | numbers and booleans are stringified, arrays and objects default |
//! | price            | `0`    | passed through unchanged                     |
//! | taxPercentage    | `12`   | passed through unchanged                     |
//! | stock            | `50`   | no source field                              |

use crate::domain::model::{
    CatalogRecord, CleanedRecord, RawRecord, BARCODE, CATEGORY, DEFAULT_PRICE, DEFAULT_STOCK,
    DEFAULT_TAX_PERCENTAGE, ITEM_NAME,
};
use serde_json::Value;

fn text_field(field: &str, value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(other) => {
            tracing::warn!("Ignoring non-scalar {} value: {}", field, other);
            String::new()
        }
    }
}

/// Keeps the exported value as is; no parsing, no range checks.
fn passthrough_field(value: Option<&Value>, default: u64) -> Value {
    match value {
        None | Some(Value::Null) => Value::from(default),
        Some(value) => value.clone(),
    }
}

pub fn format_record(record: &CleanedRecord) -> CatalogRecord {
    CatalogRecord {
        name: text_field(ITEM_NAME, record.item_name.as_ref()),
        category: text_field(CATEGORY, record.category.as_ref()),
        price: passthrough_field(record.mrp.as_ref(), DEFAULT_PRICE),
        barcode: text_field(BARCODE, record.barcode.as_ref()),
        tax_percentage: passthrough_field(
            record.tax_percentage.as_ref(),
            DEFAULT_TAX_PERCENTAGE,
        ),
        stock: DEFAULT_STOCK,
        size: None,
    }
}

pub fn format_records(records: &[CleanedRecord]) -> Vec<CatalogRecord> {
    records.iter().map(format_record).collect()
}

/// Formats POS-shaped records that never went through the cleaner.
pub fn format_raw_records(records: &[RawRecord]) -> Vec<CatalogRecord> {
    records
        .iter()
        .map(|raw| format_record(&CleanedRecord::project(raw)))
        .collect()
}
