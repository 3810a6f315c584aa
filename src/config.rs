// articlepdf-form/src/config.rs
//
// Page wiring configuration: element ids, selectors and endpoint

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of article URLs accepted per submission
pub const DEFAULT_MAX_URLS: usize = 5;

/// Backend route that assembles the zip archive
pub const DEFAULT_ZIP_ENDPOINT: &str = "/zip_pdfs";

/// Suggested filename for the downloaded archive
pub const DEFAULT_ARCHIVE_FILENAME: &str = "downloaded_pdfs.zip";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("config field `{0}` must not be empty")]
    EmptyField(&'static str),

    #[error("max_urls must be at least 1")]
    ZeroMaxUrls,

    #[error("malformed JSON: {0}")]
    Parse(String),
}

/// Resolve an optional URL limit from JS; `None` means the default
pub fn resolve_max_urls(max_urls: Option<u32>) -> Result<usize, ConfigError> {
    match max_urls {
        None => Ok(DEFAULT_MAX_URLS),
        Some(0) => Err(ConfigError::ZeroMaxUrls),
        Some(n) => Ok(n as usize),
    }
}

/// Page wiring configuration
///
/// Every field has a default matching the server-rendered template, so JS may
/// pass a partial object (or nothing at all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    /// Id of the article URL form
    pub form_id: String,

    /// Id of the "download all" control
    pub download_all_id: String,

    /// Id of the "clear all" control
    pub clear_all_id: String,

    /// Selector matching the URL inputs
    pub url_input_selector: String,

    /// Selector matching rendered PDF download links
    pub download_link_selector: String,

    /// Endpoint receiving `{ "pdf_urls": [...] }`
    pub zip_endpoint: String,

    /// Filename offered for the archive download
    pub archive_filename: String,

    /// Upper bound on non-empty URLs per submission
    pub max_urls: usize,

    /// CSS `display` value used when the download-all control is shown
    pub visible_display: String,

    /// Re-evaluate download-all visibility on every DOM mutation under <body>
    pub watch_links: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            form_id: "articleForm".to_string(),
            download_all_id: "downloadAllPdfs".to_string(),
            clear_all_id: "clearAllUrls".to_string(),
            url_input_selector: "input[type=\"url\"]".to_string(),
            download_link_selector: ".download-pdf".to_string(),
            zip_endpoint: DEFAULT_ZIP_ENDPOINT.to_string(),
            archive_filename: DEFAULT_ARCHIVE_FILENAME.to_string(),
            max_urls: DEFAULT_MAX_URLS,
            visible_display: "inline-block".to_string(),
            watch_links: false,
        }
    }
}

impl PageConfig {
    /// Check that every identifier and selector is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("form_id", &self.form_id),
            ("download_all_id", &self.download_all_id),
            ("clear_all_id", &self.clear_all_id),
            ("url_input_selector", &self.url_input_selector),
            ("download_link_selector", &self.download_link_selector),
            ("zip_endpoint", &self.zip_endpoint),
            ("archive_filename", &self.archive_filename),
            ("visible_display", &self.visible_display),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(name));
            }
        }
        if self.max_urls == 0 {
            return Err(ConfigError::ZeroMaxUrls);
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON config, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_template() {
        let config = PageConfig::default();
        assert_eq!(config.form_id, "articleForm");
        assert_eq!(config.download_all_id, "downloadAllPdfs");
        assert_eq!(config.clear_all_id, "clearAllUrls");
        assert_eq!(config.download_link_selector, ".download-pdf");
        assert_eq!(config.zip_endpoint, "/zip_pdfs");
        assert_eq!(config.archive_filename, "downloaded_pdfs.zip");
        assert_eq!(config.max_urls, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PageConfig::from_json(r#"{ "zipEndpoint": "/api/zip", "maxUrls": 3 }"#).unwrap();
        assert_eq!(config.zip_endpoint, "/api/zip");
        assert_eq!(config.max_urls, 3);
        assert_eq!(config.form_id, "articleForm");
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = PageConfig::from_json("{}").unwrap();
        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn test_rejects_zero_max() {
        let err = PageConfig::from_json(r#"{ "maxUrls": 0 }"#).unwrap_err();
        assert_eq!(err, ConfigError::ZeroMaxUrls);
    }

    #[test]
    fn test_rejects_blank_selector() {
        let config = PageConfig {
            download_link_selector: "  ".to_string(),
            ..PageConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyField("download_link_selector"))
        );
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PageConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_resolve_max_urls() {
        assert_eq!(resolve_max_urls(None), Ok(5));
        assert_eq!(resolve_max_urls(Some(3)), Ok(3));
        assert_eq!(resolve_max_urls(Some(0)), Err(ConfigError::ZeroMaxUrls));
    }
}
