use crate::config::{
    PipelineConfig, SyncSettings, DEFAULT_SAMPLE_SIZE, DEFAULT_SYNC_COLLECTION,
    DEFAULT_SYNC_TIMEOUT_SECONDS, MAX_SYNC_BATCH_SIZE,
};
use crate::domain::model::PipelinePaths;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub report: ReportConfig,
    pub sync: Option<SyncConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    pub input: Option<String>,
    pub cleaned: Option<String>,
    pub intermediate: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub sample_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub enabled: Option<bool>,
    pub endpoint: String,
    pub collection: Option<String>,
    pub token: Option<String>,
    pub batch_size: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

fn placeholder_regex() -> Result<Regex> {
    Regex::new(r"\$\{([^}]+)\}").map_err(|e| CatalogError::ConfigError {
        message: format!("invalid placeholder pattern: {}", e),
    })
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CatalogError::MissingFile {
                path: path.display().to_string(),
            },
            _ => CatalogError::IoError(e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CANEFROST_SYNC_TOKEN})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = placeholder_regex()?;
        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });
        Ok(result.into_owned())
    }

    fn sync_settings(&self) -> Result<Option<SyncSettings>> {
        let Some(sync) = &self.sync else {
            return Ok(None);
        };
        if !sync.enabled.unwrap_or(true) {
            return Ok(None);
        }

        let re = placeholder_regex()?;
        let token = match &sync.token {
            Some(token) if re.is_match(token) => {
                tracing::warn!("sync.token refers to an unset environment variable, ignoring it");
                None
            }
            Some(token) if token.is_empty() => None,
            other => other.clone(),
        };

        Ok(Some(SyncSettings {
            endpoint: sync.endpoint.clone(),
            collection: sync
                .collection
                .clone()
                .unwrap_or_else(|| DEFAULT_SYNC_COLLECTION.to_string()),
            token,
            batch_size: sync.batch_size.unwrap_or(MAX_SYNC_BATCH_SIZE),
            timeout_seconds: sync.timeout_seconds.unwrap_or(DEFAULT_SYNC_TIMEOUT_SECONDS),
        }))
    }

    /// Resolves the file into run settings, filling gaps with defaults.
    pub fn to_pipeline_config(&self) -> Result<PipelineConfig> {
        let defaults = PipelinePaths::default();
        let paths = PipelinePaths {
            input_path: self.paths.input.clone().unwrap_or(defaults.input_path),
            cleaned_path: self.paths.cleaned.clone(),
            intermediate_path: self
                .paths
                .intermediate
                .clone()
                .unwrap_or(defaults.intermediate_path),
            output_path: self.paths.output.clone().unwrap_or(defaults.output_path),
        };

        Ok(PipelineConfig {
            paths,
            sample_size: self.report.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE),
            sync: self.sync_settings()?,
        })
    }

    pub fn verbose(&self) -> bool {
        self.logging.verbose.unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_pipeline_config()?.validate()
    }
}
