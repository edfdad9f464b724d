use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("File not found: {path}")]
    MissingFile { path: String },

    #[error("Malformed input in {path}: {message}")]
    MalformedInput { path: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "remote-sync")]
    #[error("Remote request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Remote catalog sync failed: {message}")]
    SyncError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Storage,
    Remote,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl CatalogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingFile { .. } | Self::MalformedInput { .. } => ErrorCategory::Input,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::Storage,
            #[cfg(feature = "remote-sync")]
            Self::HttpError(_) => ErrorCategory::Remote,
            Self::SyncError { .. } => ErrorCategory::Remote,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a failed command: 2 retryable, 1 bad input or config, 3 system.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MissingFile { path } => format!(
                "Check that '{}' exists, or run the previous pipeline stage to produce it",
                path
            ),
            Self::MalformedInput { path, .. } => format!(
                "Make sure '{}' holds a JSON array of objects as exported by the POS tool",
                path
            ),
            Self::IoError(_) => "Check file permissions and free disk space".to_string(),
            Self::SerializationError(_) => {
                "The record set could not be encoded as JSON; inspect the input values".to_string()
            }
            #[cfg(feature = "remote-sync")]
            Self::HttpError(_) => {
                "Check network access to the sync endpoint, or run without --sync-endpoint"
                    .to_string()
            }
            Self::SyncError { .. } => {
                "Local files were still written; retry the sync with the `sync` command".to_string()
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingFile { path } => format!("Input file not found: {}", path),
            Self::MalformedInput { path, message } => {
                format!("Could not read records from {}: {}", path, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_input_error() {
        let err = CatalogError::MissingFile {
            path: "formatted_inventory.json".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("formatted_inventory.json"));
    }

    #[test]
    fn test_sync_error_is_not_fatal() {
        let err = CatalogError::SyncError {
            message: "503".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_every_error_exits_nonzero() {
        let errors = [
            CatalogError::MissingFile {
                path: "inventory.json".to_string(),
            },
            CatalogError::MalformedInput {
                path: "inventory.json".to_string(),
                message: "expected array".to_string(),
            },
            std::io::Error::other("disk full").into(),
            CatalogError::SyncError {
                message: "1 batch(es) failed".to_string(),
            },
            CatalogError::ConfigError {
                message: "bad toml".to_string(),
            },
            CatalogError::InvalidConfigValueError {
                field: "sync.batch_size".to_string(),
                value: "0".to_string(),
                reason: "must be between 1 and 500".to_string(),
            },
        ];

        let codes: Vec<i32> = errors.iter().map(CatalogError::exit_code).collect();
        assert_eq!(codes, vec![1, 1, 3, 2, 1, 1]);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CatalogError = io.into();
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
