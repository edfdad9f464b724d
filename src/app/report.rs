//! Console Reporter: human-readable summaries of what a run produced.
//!
//! Rendering returns `String`s so callers (and tests) decide where they go;
//! the `print_*` helpers write to stdout.

use crate::core::sizing::{no_size_marker, size_priority};
use crate::core::{CatalogRecord, RunSummary};
use crate::domain::model::{CleanSummary, PublishSummary, SizeLabel, SyncReport};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde_json::Value;

const UNKNOWN_CATEGORY: &str = "Unknown";
const NO_SIZE: &str = "No Size";

/// Per-category counts in first-seen order.
pub fn category_counts(records: &[CatalogRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        let category = if record.category.is_empty() {
            UNKNOWN_CATEGORY
        } else {
            record.category.as_str()
        };
        match counts.iter_mut().find(|(name, _)| name == category) {
            Some((_, count)) => *count += 1,
            None => counts.push((category.to_string(), 1)),
        }
    }
    counts
}

/// Per-size counts in catalog order, records without a size last.
pub fn size_counts(records: &[CatalogRecord]) -> Vec<(Option<SizeLabel>, usize)> {
    let mut counts: Vec<(Option<SizeLabel>, usize)> = SizeLabel::ALL
        .iter()
        .map(|label| Some(*label))
        .chain(std::iter::once(None))
        .map(|size| (size, records.iter().filter(|r| r.size == size).count()))
        .filter(|(_, count)| *count > 0)
        .collect();
    counts.sort_by_key(|(size, _)| size_priority(*size));
    counts
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100)
        .set_header(headers.iter().map(|h| header_cell(h)));
    table
}

/// Text values print without JSON quotes.
fn price_text(price: &Value) -> String {
    match price {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn render_category_table(records: &[CatalogRecord]) -> String {
    let mut table = new_table(&["Category", "Products"]);
    align_column(&mut table, 1, CellAlignment::Right);
    for (category, count) in category_counts(records) {
        table.add_row(vec![Cell::new(category), Cell::new(count)]);
    }
    table.to_string()
}

pub fn render_size_table(records: &[CatalogRecord]) -> String {
    let mut table = new_table(&["Size", "Products"]);
    align_column(&mut table, 1, CellAlignment::Right);
    for (size, count) in size_counts(records) {
        let label = match size {
            Some(label) => Cell::new(label.as_str()),
            None => dim_cell(NO_SIZE),
        };
        table.add_row(vec![label, Cell::new(count)]);
    }
    table.to_string()
}

/// Lists the first `sample_size` records, then a "... and K more" line.
pub fn render_sample(records: &[CatalogRecord], sample_size: usize) -> String {
    let mut table = new_table(&["#", "Name", "Category", "MRP", "Barcode", "Size"]);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    for (index, record) in records.iter().take(sample_size).enumerate() {
        let size = match (record.size, no_size_marker(&record.name)) {
            (Some(size), _) => Cell::new(size.as_str()),
            (None, Some(reason)) => dim_cell(format!("{} ({})", NO_SIZE, reason)),
            (None, None) => dim_cell(NO_SIZE),
        };
        let barcode = if record.barcode.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(&record.barcode)
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&record.name),
            Cell::new(&record.category),
            Cell::new(format!("₹{}", price_text(&record.price))),
            barcode,
            size,
        ]);
    }

    let mut out = table.to_string();
    if records.len() > sample_size {
        out.push_str(&format!(
            "\n... and {} more products",
            records.len() - sample_size
        ));
    }
    out
}

/// Full report over a formatted inventory.
pub fn render_catalog_report(records: &[CatalogRecord], sample_size: usize) -> String {
    let mut out = format!("Found {} products\n\n", records.len());
    out.push_str("By category:\n");
    out.push_str(&render_category_table(records));
    out.push_str("\n\nBy size:\n");
    out.push_str(&render_size_table(records));
    if sample_size > 0 && !records.is_empty() {
        out.push_str("\n\nSample products:\n");
        out.push_str(&render_sample(records, sample_size));
    }
    out
}

pub fn render_clean_summary(summary: &CleanSummary) -> String {
    format!(
        "Total items: {} ({} kept, {} dropped as empty)",
        summary.input, summary.kept, summary.dropped
    )
}

pub fn render_publish_summary(summary: &PublishSummary) -> String {
    format!(
        "Published {} products\nProducts with size: {}\nProducts without size: {}",
        summary.total, summary.with_size, summary.without_size
    )
}

pub fn render_sync_report(report: &SyncReport) -> String {
    if report.skipped {
        let reason = report.note.as_deref().unwrap_or("remote sync unavailable");
        return format!(
            "Remote sync skipped ({}). Files were written locally; import them manually.",
            reason
        );
    }

    let mut out = format!(
        "Remote sync via {}: {} products uploaded in {} batch(es)",
        report.backend, report.uploaded, report.batches_committed
    );
    if !report.is_success() {
        out.push_str(&format!("\n{} batch(es) failed:", report.batches_failed));
        for failure in &report.failures {
            out.push_str(&format!("\n  - {}", failure));
        }
    }
    out
}

pub fn render_run_summary(summary: &RunSummary) -> String {
    let mut lines = vec![
        render_clean_summary(&summary.clean_summary),
        render_publish_summary(&summary.publish_summary),
    ];
    lines.extend(summary.written.iter().map(|path| format!("Wrote {}", path)));
    if let Some(sync) = &summary.sync {
        lines.push(render_sync_report(sync));
    }
    lines.join("\n")
}

pub fn print_catalog_report(records: &[CatalogRecord], sample_size: usize) {
    println!("{}", render_catalog_report(records, sample_size));
}

pub fn print_clean_summary(summary: &CleanSummary) {
    println!("{}", render_clean_summary(summary));
}

pub fn print_publish_summary(summary: &PublishSummary) {
    println!("{}", render_publish_summary(summary));
}

pub fn print_sync_report(report: &SyncReport) {
    println!("{}", render_sync_report(report));
}

pub fn print_run_summary(summary: &RunSummary) {
    println!("{}", render_run_summary(summary));
}
