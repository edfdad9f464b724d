use crate::utils::error::{CatalogError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> CatalogError {
    CatalogError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

/// Record store paths must name `.json` documents.
pub fn validate_json_path(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;

    match std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(()),
        Some(ext) => Err(invalid(
            field_name,
            path,
            format!("Unsupported file extension: {}. Expected: json", ext),
        )),
        None => Err(invalid(
            field_name,
            path,
            "File has no extension or invalid filename",
        )),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("sync.endpoint", "https://example.com").is_ok());
        assert!(validate_url("sync.endpoint", "http://localhost:8080").is_ok());
        assert!(validate_url("sync.endpoint", "").is_err());
        assert!(validate_url("sync.endpoint", "invalid-url").is_err());
        assert!(validate_url("sync.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_json_path() {
        assert!(validate_json_path("paths.input", "Canefrost_Inventory_Upload.json").is_ok());
        assert!(validate_json_path("paths.output", "public/inventory.JSON").is_ok());
        assert!(validate_json_path("paths.input", "inventory.csv").is_err());
        assert!(validate_json_path("paths.input", "inventory").is_err());
        assert!(validate_json_path("paths.input", "  ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("sync.batch_size", 500, 1, 500).is_ok());
        assert!(validate_range("sync.batch_size", 0, 1, 500).is_err());
        assert!(validate_range("sync.batch_size", 501, 1, 500).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("sync.collection", "products").is_ok());
        assert!(validate_non_empty_string("sync.collection", " ").is_err());
    }
}
