use crate::adapters::record_store::JsonRecordStore;
use crate::adapters::sync::NoopCatalogSync;
use crate::core::{
    cleaner, formatter, projector, sizing, CatalogRecord, CleanedRecord, ConfigProvider, Pipeline,
    PublicRecord, RawRecord, RemoteCatalogSync, RunSummary, Storage, TransformResult,
};
use crate::domain::model::{CleanSummary, PublishSummary, SyncReport};
use crate::utils::error::Result;

/// The Canefrost inventory pipeline over a file record store.
///
/// `run` goes raw export → formatted inventory → public inventory in one
/// pass. The `run_*` methods execute a single stage, each reading the file
/// the previous stage wrote.
pub struct CatalogPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) store: JsonRecordStore<S>,
    pub(crate) config: C,
    pub(crate) sync: Box<dyn RemoteCatalogSync>,
}

impl<S: Storage, C: ConfigProvider> CatalogPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            store: JsonRecordStore::new(storage),
            config,
            sync: Box::new(NoopCatalogSync::new("no sync endpoint configured")),
        }
    }

    pub fn with_sync(mut self, sync: Box<dyn RemoteCatalogSync>) -> Self {
        self.sync = sync;
        self
    }

    pub fn sync_backend(&self) -> &dyn RemoteCatalogSync {
        self.sync.as_ref()
    }

    pub async fn run_clean(&self) -> Result<(Vec<CleanedRecord>, CleanSummary)> {
        let paths = self.config.paths();
        let raw: Vec<RawRecord> = self.store.read_records(&paths.input_path).await?;
        let (cleaned, summary) = cleaner::clean_with_summary(&raw);

        self.store
            .write_records(paths.cleaned_target(), &cleaned)
            .await?;
        tracing::info!(
            "Cleaned {} of {} records into {}",
            summary.kept,
            summary.input,
            paths.cleaned_target()
        );
        Ok((cleaned, summary))
    }

    pub async fn run_format(&self) -> Result<Vec<CatalogRecord>> {
        let paths = self.config.paths();
        let cleaned: Vec<CleanedRecord> = self.store.read_records(paths.cleaned_target()).await?;
        let catalog = formatter::format_records(&cleaned);

        self.store
            .write_records(&paths.intermediate_path, &catalog)
            .await?;
        tracing::info!(
            "Formatted {} records into {}",
            catalog.len(),
            paths.intermediate_path
        );
        Ok(catalog)
    }

    pub async fn run_size(&self) -> Result<Vec<CatalogRecord>> {
        let path = &self.config.paths().intermediate_path;
        let catalog = sizing::classify_and_sort(self.load_catalog().await?);

        self.store.write_records(path, &catalog).await?;
        tracing::info!("Sized and sorted {} records in {}", catalog.len(), path);
        Ok(catalog)
    }

    pub async fn run_publish(&self) -> Result<(Vec<PublicRecord>, PublishSummary)> {
        let path = &self.config.paths().output_path;
        let public = projector::project_records(&self.load_catalog().await?);
        let summary = projector::publish_summary(&public);

        self.store.write_records(path, &public).await?;
        tracing::info!("Published {} records to {}", public.len(), path);
        Ok((public, summary))
    }

    pub async fn run_sync(&self) -> Result<SyncReport> {
        let catalog = self.load_catalog().await?;
        self.push_catalog(&catalog).await
    }

    /// Reads the formatted inventory.
    pub async fn load_catalog(&self) -> Result<Vec<CatalogRecord>> {
        self.store
            .read_records(&self.config.paths().intermediate_path)
            .await
    }

    /// Remote failures are recorded in the report; they never fail the run.
    async fn push_catalog(&self, catalog: &[CatalogRecord]) -> Result<SyncReport> {
        match self.sync.push(catalog).await {
            Ok(report) => {
                if !report.is_success() {
                    tracing::warn!(
                        "Remote sync finished with {} failed batch(es)",
                        report.batches_failed
                    );
                }
                Ok(report)
            }
            Err(e) => {
                tracing::warn!("Remote sync via {} failed: {}", self.sync.name(), e);
                Ok(SyncReport {
                    backend: self.sync.name().to_string(),
                    failures: vec![e.to_string()],
                    batches_failed: 1,
                    ..SyncReport::default()
                })
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CatalogPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RawRecord>> {
        self.store.read_records(&self.config.paths().input_path).await
    }

    async fn transform(&self, data: Vec<RawRecord>) -> Result<TransformResult> {
        let (cleaned, clean_summary) = cleaner::clean_with_summary(&data);
        let catalog = sizing::classify_and_sort(formatter::format_records(&cleaned));
        let public = projector::project_records(&catalog);
        let publish_summary = projector::publish_summary(&public);

        Ok(TransformResult {
            cleaned,
            catalog,
            public,
            clean_summary,
            publish_summary,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<RunSummary> {
        let paths = self.config.paths();

        // Encode everything before touching the disk.
        let cleaned = match &paths.cleaned_path {
            Some(path) => Some((path, JsonRecordStore::<S>::encode(&result.cleaned)?)),
            None => None,
        };
        let intermediate = JsonRecordStore::<S>::encode(&result.catalog)?;
        let output = JsonRecordStore::<S>::encode(&result.public)?;

        let mut written = Vec::new();
        if let Some((path, encoded)) = &cleaned {
            self.store.write_encoded(path, encoded).await?;
            written.push(path.to_string());
        }
        self.store
            .write_encoded(&paths.intermediate_path, &intermediate)
            .await?;
        written.push(paths.intermediate_path.clone());
        self.store
            .write_encoded(&paths.output_path, &output)
            .await?;
        written.push(paths.output_path.clone());

        // The no-op backend answers with a skipped report, which the console shows.
        let sync = Some(self.push_catalog(&result.catalog).await?);

        Ok(RunSummary {
            written,
            clean_summary: result.clean_summary,
            publish_summary: result.publish_summary,
            sync,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::domain::model::{PipelinePaths, SizeLabel};
    use crate::utils::error::CatalogError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put_json(&self, path: &str, value: serde_json::Value) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), serde_json::to_vec(&value).unwrap());
        }

        async fn get_json(&self, path: &str) -> Option<serde_json::Value> {
            let files = self.files.lock().await;
            files
                .get(path)
                .map(|bytes| serde_json::from_slice(bytes).unwrap())
        }

        async fn file_count(&self) -> usize {
            self.files.lock().await.len()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files
                .get(path)
                .cloned()
                .ok_or_else(|| CatalogError::MissingFile {
                    path: path.to_string(),
                })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSync {
        pushed: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl RemoteCatalogSync for RecordingSync {
        fn name(&self) -> &str {
            "recording"
        }

        async fn push(&self, records: &[CatalogRecord]) -> Result<SyncReport> {
            if self.fail {
                return Err(CatalogError::SyncError {
                    message: "service unavailable".to_string(),
                });
            }
            let mut pushed = self.pushed.lock().await;
            pushed.extend(records.iter().map(|r| r.name.clone()));
            Ok(SyncReport {
                backend: "recording".to_string(),
                uploaded: records.len(),
                batches_committed: 1,
                ..SyncReport::default()
            })
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig::with_paths(PipelinePaths {
            input_path: "raw.json".to_string(),
            cleaned_path: Some("cleaned.json".to_string()),
            intermediate_path: "formatted.json".to_string(),
            output_path: "public.json".to_string(),
        })
    }

    fn raw_export() -> serde_json::Value {
        json!([
            {"Item Name": "Mango Fizz", "Category": "Fizz", "MRP": 60, "Barcode": "CFRST10", "Tax percentage": 5, "HSN": "2202"},
            {"Item Name": "Water Bottle", "Category": "Water", "MRP": 20, "Barcode": "CFRST91"},
            {"Item Name": null, "MRP": "NaN"},
            {"Item Name": "Kesar Barfi", "Category": "Sweets", "MRP": 120},
            {"Item Name": "apple fizz", "Category": "Fizz", "MRP": 60, "Barcode": "CFRST02"}
        ])
    }

    #[tokio::test]
    async fn test_transform_cleans_sizes_and_sorts() {
        let pipeline = CatalogPipeline::new(MockStorage::default(), config());
        let raw: Vec<RawRecord> = serde_json::from_value(raw_export()).unwrap();

        let result = pipeline.transform(raw).await.unwrap();

        assert_eq!(result.clean_summary.dropped, 1);
        let names: Vec<&str> = result.catalog.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["apple fizz", "Mango Fizz", "Water Bottle", "Kesar Barfi"]
        );
        assert_eq!(result.catalog[2].size, Some(SizeLabel::Litre1));
        assert_eq!(result.public[3].size, None);
        assert_eq!(result.publish_summary.with_size, 3);
    }

    #[tokio::test]
    async fn test_load_writes_all_documents() {
        let storage = MockStorage::default();
        let pipeline = CatalogPipeline::new(storage.clone(), config());
        let raw: Vec<RawRecord> = serde_json::from_value(raw_export()).unwrap();
        let result = pipeline.transform(raw).await.unwrap();

        let summary = pipeline.load(result).await.unwrap();

        assert_eq!(
            summary.written,
            vec!["cleaned.json", "formatted.json", "public.json"]
        );
        assert!(summary.sync.unwrap().skipped);
        let public = storage.get_json("public.json").await.unwrap();
        assert_eq!(public[0]["Item Name"], json!("apple fizz"));
        assert_eq!(public[0]["size"], json!("240ml"));
        assert!(public[3].get("size").is_none());
        let formatted = storage.get_json("formatted.json").await.unwrap();
        assert_eq!(formatted[3]["size"], json!(null));
        assert_eq!(formatted[3]["stock"], json!(50));
    }

    #[tokio::test]
    async fn test_stages_chain_through_files() {
        let storage = MockStorage::default();
        storage.put_json("raw.json", raw_export()).await;
        let pipeline = CatalogPipeline::new(storage.clone(), config());

        let (_, clean_summary) = pipeline.run_clean().await.unwrap();
        let formatted = pipeline.run_format().await.unwrap();
        let sized = pipeline.run_size().await.unwrap();
        let (public, publish_summary) = pipeline.run_publish().await.unwrap();

        assert_eq!(clean_summary.kept, 4);
        assert_eq!(formatted[0].name, "Mango Fizz");
        assert_eq!(formatted[0].size, None);
        assert_eq!(sized[0].name, "apple fizz");
        assert_eq!(public.len(), 4);
        assert_eq!(publish_summary.without_size, 1);
        let cleaned = storage.get_json("cleaned.json").await.unwrap();
        assert!(cleaned[0].get("HSN").is_none());
    }

    #[tokio::test]
    async fn test_clean_rewrites_input_when_no_cleaned_path() {
        let storage = MockStorage::default();
        storage.put_json("raw.json", raw_export()).await;
        let mut config = config();
        config.paths.cleaned_path = None;
        let pipeline = CatalogPipeline::new(storage.clone(), config);

        pipeline.run_clean().await.unwrap();

        let rewritten = storage.get_json("raw.json").await.unwrap();
        assert_eq!(rewritten.as_array().unwrap().len(), 4);
        assert_eq!(storage.file_count().await, 1);
    }

    #[tokio::test]
    async fn test_missing_intermediate_aborts_publish_without_output() {
        let storage = MockStorage::default();
        let pipeline = CatalogPipeline::new(storage.clone(), config());

        let err = pipeline.run_publish().await.unwrap_err();

        assert!(matches!(err, CatalogError::MissingFile { ref path } if path == "formatted.json"));
        assert_eq!(storage.file_count().await, 0);
    }

    #[tokio::test]
    async fn test_sync_receives_sorted_catalog() {
        let storage = MockStorage::default();
        let sync = Arc::new(RecordingSync::default());
        let pipeline = CatalogPipeline::new(storage, config()).with_sync(Box::new(ArcSync(sync.clone())));
        let raw: Vec<RawRecord> = serde_json::from_value(raw_export()).unwrap();

        let result = pipeline.transform(raw).await.unwrap();
        let summary = pipeline.load(result).await.unwrap();

        assert_eq!(summary.sync.unwrap().uploaded, 4);
        assert_eq!(sync.pushed.lock().await[0], "apple fizz");
    }

    #[tokio::test]
    async fn test_sync_failure_does_not_fail_run() {
        let sync = RecordingSync {
            fail: true,
            ..RecordingSync::default()
        };
        let pipeline = CatalogPipeline::new(MockStorage::default(), config()).with_sync(Box::new(sync));
        let raw: Vec<RawRecord> = serde_json::from_value(raw_export()).unwrap();

        let result = pipeline.transform(raw).await.unwrap();
        let summary = pipeline.load(result).await.unwrap();

        let report = summary.sync.unwrap();
        assert!(!report.is_success());
        assert_eq!(report.failures, vec!["Remote catalog sync failed: service unavailable"]);
        assert_eq!(summary.written.len(), 3);
    }

    struct ArcSync(Arc<RecordingSync>);

    #[async_trait]
    impl RemoteCatalogSync for ArcSync {
        fn name(&self) -> &str {
            self.0.name()
        }

        async fn push(&self, records: &[CatalogRecord]) -> Result<SyncReport> {
            self.0.push(records).await
        }
    }
}
