//! File Record Store: whole-document JSON arrays on top of a [`Storage`].

use crate::core::Storage;
use crate::utils::error::{CatalogError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;

/// Non-finite float literals Python's `json` module writes and accepts.
/// `-Infinity` comes before `Infinity` so the sign is consumed with it.
const NON_FINITE_TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

/// Rewrites bare `NaN`, `Infinity` and `-Infinity` tokens (as written by
/// pandas/Python exporters) to `null`. String contents are left alone.
pub fn replace_non_finite_tokens(text: &str) -> Cow<'_, str> {
    if !NON_FINITE_TOKENS[1..].iter().any(|token| text.contains(token)) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
        } else if ch == '"' {
            in_string = true;
        } else if let Some(token) = NON_FINITE_TOKENS.iter().find(|t| rest.starts_with(*t)) {
            out.push_str("null");
            rest = &rest[token.len()..];
            continue;
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    Cow::Owned(out)
}

pub struct JsonRecordStore<S: Storage> {
    storage: S,
}

impl<S: Storage> JsonRecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn read_records<T: DeserializeOwned + Send>(&self, path: &str) -> Result<Vec<T>> {
        let bytes = self.storage.read_file(path).await?;
        let text = String::from_utf8(bytes).map_err(|e| CatalogError::MalformedInput {
            path: path.to_string(),
            message: format!("not UTF-8: {}", e),
        })?;

        let text = text.trim_start_matches('\u{feff}');
        let records: Vec<T> =
            serde_json::from_str(&replace_non_finite_tokens(text)).map_err(|e| {
                CatalogError::MalformedInput {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            })?;

        tracing::debug!("Read {} records from {}", records.len(), path);
        Ok(records)
    }

    /// Two-space indented, non-ASCII text kept as is.
    pub fn encode<T: Serialize>(records: &[T]) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(records)?)
    }

    pub async fn write_encoded(&self, path: &str, encoded: &[u8]) -> Result<()> {
        self.storage.write_file(path, encoded).await
    }

    pub async fn write_records<T: Serialize + Sync>(&self, path: &str, records: &[T]) -> Result<()> {
        let encoded = Self::encode(records)?;
        self.write_encoded(path, &encoded).await?;
        tracing::debug!("Wrote {} records to {}", records.len(), path);
        Ok(())
    }
}
