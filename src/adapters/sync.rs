use crate::config::SyncSettings;
use crate::core::{CatalogRecord, RemoteCatalogSync};
use crate::domain::model::SyncReport;
use crate::utils::error::{CatalogError, Result};
use async_trait::async_trait;

/// Stands in for the remote catalog when no client is available; the run
/// continues in file-only mode.
#[derive(Debug, Clone)]
pub struct NoopCatalogSync {
    reason: String,
}

impl NoopCatalogSync {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl RemoteCatalogSync for NoopCatalogSync {
    fn name(&self) -> &str {
        "file-only"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn push(&self, records: &[CatalogRecord]) -> Result<SyncReport> {
        tracing::info!(
            "Remote sync skipped for {} records: {}",
            records.len(),
            self.reason
        );
        Ok(SyncReport {
            backend: self.name().to_string(),
            skipped: true,
            note: Some(self.reason.clone()),
            ..SyncReport::default()
        })
    }
}

/// Stand-in used when the remote client could not be set up.
pub fn file_only_fallback(err: &CatalogError) -> NoopCatalogSync {
    tracing::warn!("Remote sync client unavailable, continuing in file-only mode: {}", err);
    NoopCatalogSync::new(format!("remote sync client unavailable: {}", err))
}

/// Picks the sync backend once at start-up. Never fails: anything that keeps
/// the remote client from starting degrades to file-only mode.
pub fn select_catalog_sync(settings: Option<&SyncSettings>) -> Box<dyn RemoteCatalogSync> {
    match settings {
        None => Box::new(NoopCatalogSync::new("no sync endpoint configured")),
        #[cfg(feature = "remote-sync")]
        Some(settings) => match crate::adapters::http_sync::HttpCatalogSync::new(settings.clone()) {
            Ok(sync) => {
                tracing::info!(
                    "Remote sync enabled: {} (collection '{}')",
                    settings.endpoint,
                    settings.collection
                );
                Box::new(sync)
            }
            Err(e) => Box::new(file_only_fallback(&e)),
        },
        #[cfg(not(feature = "remote-sync"))]
        Some(settings) => {
            tracing::warn!(
                "Sync endpoint {} ignored: built without the remote-sync feature",
                settings.endpoint
            );
            Box::new(NoopCatalogSync::new(
                "remote sync client not built in (enable the `remote-sync` feature)",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_sync_reports_skip() {
        let sync = NoopCatalogSync::new("offline");
        let report = sync
            .push(&[CatalogRecord::new("Lime Soda", "CFRST04")])
            .await
            .unwrap();

        assert!(!sync.is_available());
        assert!(report.skipped);
        assert!(report.is_success());
        assert_eq!(report.uploaded, 0);
        assert_eq!(report.note.as_deref(), Some("offline"));
    }

    #[test]
    fn test_no_settings_selects_noop() {
        let sync = select_catalog_sync(None);
        assert!(!sync.is_available());
        assert_eq!(sync.name(), "file-only");
    }

    #[cfg(feature = "remote-sync")]
    #[test]
    fn test_settings_select_http_backend() {
        let settings = SyncSettings::new("https://catalog.example.com/v1");
        let sync = select_catalog_sync(Some(&settings));
        assert!(sync.is_available());
        assert_eq!(sync.name(), "http");
    }

    #[tokio::test]
    async fn test_client_failure_falls_back_to_file_only() {
        let err = CatalogError::ConfigError {
            message: "TLS backend missing".to_string(),
        };
        let sync = file_only_fallback(&err);

        assert!(!sync.is_available());
        let report = sync.push(&[]).await.unwrap();
        assert!(report.skipped);
        assert!(report.is_success());
        assert!(report
            .note
            .as_deref()
            .unwrap()
            .contains("TLS backend missing"));
    }
}
