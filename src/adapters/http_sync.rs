use crate::config::SyncSettings;
use crate::core::sizing::BARCODE_PREFIX;
use crate::core::{CatalogRecord, RemoteCatalogSync};
use crate::domain::model::{SizeLabel, SyncReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

// The catalog schema has no tax type; every product is filed under GST.
const DEFAULT_TAX_TYPE: &str = "GST";

/// One product document as stored by the hosted catalog.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductDocument<'a> {
    id: String,
    name: &'a str,
    category: &'a str,
    price: &'a Value,
    barcode: String,
    tax_percentage: &'a Value,
    tax_type: &'static str,
    stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<SizeLabel>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct BatchWrite<'a> {
    documents: Vec<ProductDocument<'a>>,
}

/// Products without a barcode get a synthetic `CFRST<position>` id.
pub fn document_id(barcode: &str, position: usize) -> String {
    if barcode.is_empty() {
        format!("{}{:03}", BARCODE_PREFIX, position + 1)
    } else {
        barcode.to_string()
    }
}

fn product_document(record: &CatalogRecord, position: usize, now: DateTime<Utc>) -> ProductDocument<'_> {
    let id = document_id(&record.barcode, position);
    ProductDocument {
        barcode: id.clone(),
        id,
        name: &record.name,
        category: &record.category,
        price: &record.price,
        tax_percentage: &record.tax_percentage,
        tax_type: DEFAULT_TAX_TYPE,
        stock: record.stock,
        size: record.size,
        created_at: now,
        updated_at: now,
    }
}

/// Pushes the catalog to a document database over HTTP, one request per batch.
pub struct HttpCatalogSync {
    settings: SyncSettings,
    client: Client,
}

impl HttpCatalogSync {
    pub fn new(settings: SyncSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;
        Ok(Self { settings, client })
    }

    pub fn batch_url(&self) -> String {
        format!(
            "{}/collections/{}/documents:batchWrite",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.collection
        )
    }

    async fn send_batch(&self, batch: &BatchWrite<'_>) -> std::result::Result<(), String> {
        let mut request = self.client.post(self.batch_url()).json(batch);
        if let Some(token) = &self.settings.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(format!("HTTP {}: {}", status, body.trim()))
        }
    }
}

#[async_trait]
impl RemoteCatalogSync for HttpCatalogSync {
    fn name(&self) -> &str {
        "http"
    }

    async fn push(&self, records: &[CatalogRecord]) -> Result<SyncReport> {
        let now = Utc::now();
        let mut report = SyncReport {
            backend: self.name().to_string(),
            ..SyncReport::default()
        };

        let batch_size = self.settings.batch_size.max(1);
        for (batch_index, chunk) in records.chunks(batch_size).enumerate() {
            let offset = batch_index * batch_size;
            let batch = BatchWrite {
                documents: chunk
                    .iter()
                    .enumerate()
                    .map(|(i, record)| product_document(record, offset + i, now))
                    .collect(),
            };

            match self.send_batch(&batch).await {
                Ok(()) => {
                    report.batches_committed += 1;
                    report.uploaded += chunk.len();
                    tracing::info!(
                        "Uploaded batch {}: {} products (total {})",
                        batch_index + 1,
                        chunk.len(),
                        report.uploaded
                    );
                }
                Err(message) => {
                    report.batches_failed += 1;
                    tracing::warn!("Batch {} failed: {}", batch_index + 1, message);
                    report
                        .failures
                        .push(format!("batch {}: {}", batch_index + 1, message));
                }
            }
        }

        Ok(report)
    }
}
