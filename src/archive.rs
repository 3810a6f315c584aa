//! Batch download planning
//!
//! Pure side of the "download all" control: given the links currently on the
//! page, decide whether the control is visible and what the zip request
//! carries. The DOM layer re-runs [`DownloadPlan::from_links`] on every
//! refresh and every click, so no handler ever holds a stale link list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Types
// =============================================================================

/// JSON body posted to the zip endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipRequest {
    pub pdf_urls: Vec<String>,
}

impl ZipRequest {
    pub fn to_json(&self) -> Result<String, ArchiveError> {
        serde_json::to_string(self).map_err(|e| ArchiveError::Encode(e.to_string()))
    }
}

/// Result of evaluating the download links on the page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DownloadPlan {
    /// Whether the download-all control should be shown
    pub visible: bool,
    /// Request to send when the control is activated (None when hidden)
    pub request: Option<ZipRequest>,
}

impl DownloadPlan {
    /// Build a plan from resolved link URLs, in DOM order
    pub fn from_links(links: Vec<String>) -> Self {
        if links.is_empty() {
            return Self::default();
        }
        Self {
            visible: true,
            request: Some(ZipRequest { pdf_urls: links }),
        }
    }

    pub fn link_count(&self) -> usize {
        self.request.as_ref().map_or(0, |r| r.pdf_urls.len())
    }
}

/// Archive request failures. All are logged, none reach the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    #[error("failed to encode zip request: {0}")]
    Encode(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("zip endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("failed to read archive body: {0}")]
    Body(String),

    #[error("failed to trigger download: {0}")]
    Dom(String),
}

/// Map an HTTP status to success or [`ArchiveError::Status`]
pub fn check_status(status: u16) -> Result<(), ArchiveError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ArchiveError::Status { status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_links_hidden() {
        let plan = DownloadPlan::from_links(Vec::new());
        assert!(!plan.visible);
        assert!(plan.request.is_none());
        assert_eq!(plan.link_count(), 0);
    }

    #[test]
    fn test_links_visible_in_order() {
        let plan = DownloadPlan::from_links(vec!["A.pdf".into(), "B.pdf".into()]);
        assert!(plan.visible);
        assert_eq!(plan.link_count(), 2);
        assert_eq!(
            plan.request.unwrap().pdf_urls,
            vec!["A.pdf".to_string(), "B.pdf".to_string()]
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = ZipRequest {
            pdf_urls: vec!["A.pdf".into(), "B.pdf".into()],
        };
        assert_eq!(request.to_json().unwrap(), r#"{"pdf_urls":["A.pdf","B.pdf"]}"#);
    }

    #[test]
    fn test_duplicate_links_kept() {
        let plan = DownloadPlan::from_links(vec!["A.pdf".into(), "A.pdf".into()]);
        assert_eq!(plan.link_count(), 2);
    }

    #[test]
    fn test_plan_is_idempotent() {
        let links = vec!["https://h/download/a.pdf".to_string()];
        assert_eq!(
            DownloadPlan::from_links(links.clone()),
            DownloadPlan::from_links(links)
        );
    }

    #[test]
    fn test_status_mapping() {
        assert!(check_status(200).is_ok());
        assert!(check_status(204).is_ok());
        assert_eq!(check_status(500), Err(ArchiveError::Status { status: 500 }));
        assert_eq!(check_status(404).unwrap_err().to_string(), "zip endpoint returned HTTP 404");
    }
}
