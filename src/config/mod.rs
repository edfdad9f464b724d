#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::PipelinePaths;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_json_path, validate_non_empty_string, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SAMPLE_SIZE: usize = 10;
pub const DEFAULT_SYNC_COLLECTION: &str = "products";
/// Upper bound the hosted document store accepts per batch write.
pub const MAX_SYNC_BATCH_SIZE: usize = 500;
pub const DEFAULT_SYNC_TIMEOUT_SECONDS: u64 = 30;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    pub endpoint: String,
    pub collection: String,
    pub token: Option<String>,
    pub batch_size: usize,
    pub timeout_seconds: u64,
}

impl SyncSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            collection: DEFAULT_SYNC_COLLECTION.to_string(),
            token: None,
            batch_size: MAX_SYNC_BATCH_SIZE,
            timeout_seconds: DEFAULT_SYNC_TIMEOUT_SECONDS,
        }
    }
}

// Keeps the token out of verbose config dumps.
impl fmt::Debug for SyncSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSettings")
            .field("endpoint", &self.endpoint)
            .field("collection", &self.collection)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("batch_size", &self.batch_size)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl Validate for SyncSettings {
    fn validate(&self) -> Result<()> {
        validate_url("sync.endpoint", &self.endpoint)?;
        validate_non_empty_string("sync.collection", &self.collection)?;
        validate_range("sync.batch_size", self.batch_size, 1, MAX_SYNC_BATCH_SIZE)?;
        validate_range("sync.timeout_seconds", self.timeout_seconds, 1, 600)?;
        Ok(())
    }
}

/// Fully resolved settings for one run, built once at process entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub paths: PipelinePaths,
    pub sample_size: usize,
    pub sync: Option<SyncSettings>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            paths: PipelinePaths::default(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            sync: None,
        }
    }
}

impl PipelineConfig {
    pub fn with_paths(paths: PipelinePaths) -> Self {
        Self {
            paths,
            ..Self::default()
        }
    }
}

impl ConfigProvider for PipelineConfig {
    fn paths(&self) -> &PipelinePaths {
        &self.paths
    }

    fn sample_size(&self) -> usize {
        self.sample_size
    }
}

impl Validate for PipelineConfig {
    fn validate(&self) -> Result<()> {
        validate_json_path("paths.input", &self.paths.input_path)?;
        if let Some(cleaned) = &self.paths.cleaned_path {
            validate_json_path("paths.cleaned", cleaned)?;
        }
        validate_json_path("paths.intermediate", &self.paths.intermediate_path)?;
        validate_json_path("paths.output", &self.paths.output_path)?;

        if let Some(sync) = &self.sync {
            sync.validate()?;
        }
        Ok(())
    }
}
