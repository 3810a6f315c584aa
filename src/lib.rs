//! ArticlePDF Form: browser helper for the article-to-PDF page
//!
//! A Rust/WASM replacement for the page script of the server-rendered
//! article form.
//!
//! # Architecture
//! - `config.rs` - Element ids, selectors, endpoint and limits
//! - `validation.rs` - Submission gate (1..=5 non-blank URLs)
//! - `archive.rs` - Download-all planning and the zip request body
//! - `page/` - DOM wiring: listeners, clear-all, fetch and blob download
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { boot, PageForm } from 'articlepdf-form';
//!
//! await init();
//!
//! // Either wire the page with template defaults once the DOM is ready...
//! boot();
//!
//! // ...or, instead of boot(), keep a handle to re-check the control later.
//! // A form can only be attached once; a second attach throws.
//! const page = PageForm.attach({ zipEndpoint: '/zip_pdfs' });
//! page.refreshDownloadAll();
//! ```

pub mod archive;
pub mod config;
pub mod page;
pub mod validation;

pub use archive::{ArchiveError, DownloadPlan, ZipRequest};
pub use config::{resolve_max_urls, ConfigError, PageConfig};
pub use page::{boot, PageForm, SetupError};
pub use validation::{collect_urls, validate_urls, ValidationError};

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Validate raw URL input values without touching the DOM
///
/// Returns the accepted URLs, or throws the user-facing message.
#[wasm_bindgen(js_name = validateUrls)]
pub fn validate_urls_js(values: Vec<String>, max_urls: Option<u32>) -> Result<Vec<String>, JsValue> {
    let max_urls = config::resolve_max_urls(max_urls).map_err(|e| JsValue::from_str(&e.to_string()))?;
    validate_urls(values, max_urls).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("articlepdf-form v{}", env!("CARGO_PKG_VERSION"))
}
