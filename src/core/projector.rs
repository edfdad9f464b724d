use crate::domain::model::{CatalogRecord, PublicRecord, PublishSummary};

pub fn project_record(record: &CatalogRecord) -> PublicRecord {
    PublicRecord {
        item_name: record.name.clone(),
        category: record.category.clone(),
        mrp: record.price.clone(),
        barcode: record.barcode.clone(),
        tax_percentage: record.tax_percentage.clone(),
        size: record.size,
    }
}

/// Order preserving; the catalog is expected to be sorted already.
pub fn project_records(records: &[CatalogRecord]) -> Vec<PublicRecord> {
    records.iter().map(project_record).collect()
}

pub fn publish_summary(records: &[PublicRecord]) -> PublishSummary {
    let with_size = records.iter().filter(|r| r.size.is_some()).count();
    PublishSummary {
        total: records.len(),
        with_size,
        without_size: records.len() - with_size,
    }
}
