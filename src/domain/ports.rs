use crate::domain::model::{
    CatalogRecord, PipelinePaths, RawRecord, RunSummary, SyncReport, TransformResult,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn paths(&self) -> &PipelinePaths;
    /// How many records the console report lists individually.
    fn sample_size(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawRecord>>;
    async fn transform(&self, data: Vec<RawRecord>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<RunSummary>;
}

/// Pushes the formatted catalog to a hosted document database.
///
/// The pipeline only ever talks to this trait; whether a network client or
/// the no-op stand-in sits behind it is decided once at start-up.
#[async_trait]
pub trait RemoteCatalogSync: Send + Sync {
    fn name(&self) -> &str;

    fn is_available(&self) -> bool {
        true
    }

    async fn push(&self, records: &[CatalogRecord]) -> Result<SyncReport>;
}
