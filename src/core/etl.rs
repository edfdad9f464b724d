use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;
use std::time::Instant;

/// Drives a pipeline through extract, transform and load.
///
/// Nothing is written until the whole transform has succeeded in memory.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        tracing::info!("Starting catalog run");

        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extracted {} raw records", raw_data.len());

        let transformed = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "Transformed {} records ({} dropped while cleaning)",
            transformed.catalog.len(),
            transformed.clean_summary.dropped
        );

        let summary = self.pipeline.load(transformed).await?;
        tracing::info!(
            "Wrote {} file(s) in {:?}",
            summary.written.len(),
            started.elapsed()
        );

        Ok(summary)
    }
}
