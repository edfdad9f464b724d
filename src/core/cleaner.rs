//! Record Cleaner: strips POS records down to the allowed fields.
//!
//! Bare `NaN` and `Infinity` tokens in the export are rewritten to `null` by
//! the record store before parsing, so they reach this stage as `Value::Null`.

use crate::domain::model::{CleanSummary, CleanedRecord, RawRecord};
use serde_json::Value;

const NAN_TEXT: &str = "NaN";

/// Whether a field value carries information worth keeping.
pub fn is_meaningful(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => text != NAN_TEXT,
        Value::Number(number) => number.as_f64().map_or(true, |n| !n.is_nan()),
        _ => true,
    }
}

/// Keeps the allowed fields that hold a meaningful value; `None` if nothing is left.
pub fn clean_record(raw: &RawRecord) -> Option<CleanedRecord> {
    let cleaned =
        CleanedRecord::from_lookup(|key| raw.get(key).filter(|v| is_meaningful(v)).cloned());
    (!cleaned.is_empty()).then_some(cleaned)
}

pub fn clean_records(records: &[RawRecord]) -> Vec<CleanedRecord> {
    clean_with_summary(records).0
}

pub fn clean_with_summary(records: &[RawRecord]) -> (Vec<CleanedRecord>, CleanSummary) {
    let cleaned: Vec<CleanedRecord> = records
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let cleaned = clean_record(raw);
            if cleaned.is_none() {
                tracing::debug!("Dropping record #{}: no usable fields", index);
            }
            cleaned
        })
        .collect();

    let summary = CleanSummary {
        input: records.len(),
        kept: cleaned.len(),
        dropped: records.len() - cleaned.len(),
    };
    (cleaned, summary)
}
