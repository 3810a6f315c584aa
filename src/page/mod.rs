//! PageForm: DOM wiring for the article URL form
//!
//! Installs three independent listeners:
//! - `submit` on the form runs the validation gate
//! - `click` on the clear-all control empties every URL input
//! - `click` on the download-all control posts the current links for zipping
//!
//! Each listener reads the DOM fresh when it fires. A failure in one handler is
//! logged and never affects the others.

mod dom;
mod download;


use std::rc::Rc;

use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::{
    Document, Event, HtmlElement, HtmlFormElement, MutationObserver,
    MutationObserverInit, Window,
};

use crate::archive::{ArchiveError, DownloadPlan};
use crate::config::{ConfigError, PageConfig};
use crate::validation::{validate_urls, ValidationError};

/// Failures while wiring the page
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("element #{0} not found")]
    MissingElement(String),

    #[error("element #{id} is not a {expected}")]
    WrongElement { id: String, expected: &'static str },

    #[error("invalid page config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid page config: {0}")]
    Decode(String),

    #[error("failed to install listener: {0}")]
    Listener(String),

    #[error("form #{0} is already attached")]
    AlreadyAttached(String),

    #[error("DOM access failed: {0}")]
    Dom(String),
}

impl From<SetupError> for JsValue {
    fn from(err: SetupError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Marks a form whose listeners are installed
const ATTACHED_ATTR: &str = "data-articlepdf-attached";

/// Decode a JS config object or JSON string; `undefined`/`null` mean defaults
pub(crate) fn parse_config(value: JsValue) -> Result<PageConfig, SetupError> {
    if let Some(json) = value.as_string() {
        return Ok(PageConfig::from_json(&json)?);
    }
    let config = if value.is_undefined() || value.is_null() {
        PageConfig::default()
    } else {
        serde_wasm_bindgen::from_value(value).map_err(|e| SetupError::Decode(e.to_string()))?
    };
    config.validate()?;
    Ok(config)
}

// =============================================================================
// Shared page state
// =============================================================================

pub(crate) struct PageInner {
    config: PageConfig,
    window: Window,
    document: Document,
    form: HtmlFormElement,
    download_all: HtmlElement,
    clear_all: HtmlElement,
}

impl PageInner {
    fn resolve(config: PageConfig) -> Result<Self, SetupError> {
        let window = web_sys::window().ok_or(SetupError::NoWindow)?;
        let document = window.document().ok_or(SetupError::NoDocument)?;

        let form = dom::element_by_id::<HtmlFormElement>(&document, &config.form_id, "form")?;
        let download_all =
            dom::element_by_id::<HtmlElement>(&document, &config.download_all_id, "HTML element")?;
        let clear_all =
            dom::element_by_id::<HtmlElement>(&document, &config.clear_all_id, "HTML element")?;

        Ok(Self {
            config,
            window,
            document,
            form,
            download_all,
            clear_all,
        })
    }

    /// Run the submission gate over the form's URL inputs
    pub(crate) fn validate(&self) -> Result<Result<Vec<String>, ValidationError>, JsValue> {
        let list = self.form.query_selector_all(&self.config.url_input_selector)?;
        let values: Vec<String> = dom::inputs(&list).iter().map(|input| input.value()).collect();
        Ok(validate_urls(values, self.config.max_urls))
    }

    /// Empty every URL input in the document; returns how many were cleared
    pub(crate) fn clear_all(&self) -> Result<usize, JsValue> {
        let list = self.document.query_selector_all(&self.config.url_input_selector)?;
        let inputs = dom::inputs(&list);
        for input in &inputs {
            input.set_value("");
        }
        Ok(inputs.len())
    }

    pub(crate) fn plan(&self) -> Result<DownloadPlan, JsValue> {
        let links = dom::link_hrefs(&self.document, &self.config.download_link_selector)?;
        Ok(DownloadPlan::from_links(links))
    }

    /// Re-evaluate download-all visibility against the current links
    pub(crate) fn refresh(&self) -> Result<DownloadPlan, JsValue> {
        let plan = self.plan()?;
        dom::set_visible(&self.download_all, plan.visible, &self.config.visible_display)?;
        Ok(plan)
    }

    /// Plan from the live DOM and download; `Ok(false)` when there are no links
    pub(crate) async fn download_all(&self) -> Result<bool, ArchiveError> {
        let plan = self
            .plan()
            .map_err(|e| ArchiveError::Dom(format!("{:?}", e)))?;
        let Some(request) = plan.request else {
            return Ok(false);
        };

        download::download_archive(
            &self.window,
            &self.document,
            &self.config.zip_endpoint,
            &request,
            &self.config.archive_filename,
        )
        .await?;
        Ok(true)
    }

    fn on_submit(&self, event: &Event) {
        match self.validate() {
            Ok(Ok(_)) => {}
            Ok(Err(invalid)) => {
                event.prevent_default();
                if let Err(e) = self.window.alert_with_message(&invalid.to_string()) {
                    web_sys::console::error_1(&e);
                }
            }
            Err(e) => {
                web_sys::console::error_1(&format!("[PageForm] Validation failed to run: {:?}", e).into());
            }
        }
    }

    fn on_clear_all(&self) {
        if let Err(e) = self.clear_all() {
            web_sys::console::error_1(&format!("[PageForm] Clear all failed: {:?}", e).into());
        }
    }

    fn on_download_all(self: &Rc<Self>) {
        let inner = Rc::clone(self);
        spawn_local(async move {
            if let Err(e) = inner.download_all().await {
                web_sys::console::error_1(&format!("[BatchDownload] Error creating zip: {}", e).into());
            }
        });
    }

    fn install_listeners(self: &Rc<Self>) -> Result<(), SetupError> {
        let listener_err = |e: JsValue| SetupError::Listener(format!("{:?}", e));

        // submit
        {
            let inner = Rc::clone(self);
            let closure = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
                inner.on_submit(&event);
            }));
            self.form
                .add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())
                .map_err(listener_err)?;
            closure.forget();
        }

        // clear all
        {
            let inner = Rc::clone(self);
            let closure = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
                inner.on_clear_all();
            }));
            self.clear_all
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .map_err(listener_err)?;
            closure.forget();
        }

        // download all
        {
            let inner = Rc::clone(self);
            let closure = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
                inner.on_download_all();
            }));
            self.download_all
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .map_err(listener_err)?;
            closure.forget();
        }

        Ok(())
    }

    fn watch_links(self: &Rc<Self>) -> Result<MutationObserver, SetupError> {
        let listener_err = |e: JsValue| SetupError::Listener(format!("{:?}", e));
        let body = self
            .document
            .body()
            .ok_or_else(|| SetupError::MissingElement("body".to_string()))?;

        let inner = Rc::clone(self);
        let closure = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::wrap(Box::new(
            move |_records: js_sys::Array, _observer: MutationObserver| {
                if let Err(e) = inner.refresh() {
                    web_sys::console::error_1(&format!("[BatchDownload] Refresh failed: {:?}", e).into());
                }
            },
        ));
        let observer = MutationObserver::new(closure.as_ref().unchecked_ref()).map_err(listener_err)?;
        closure.forget();

        // Child list only; style changes on the control are not observed
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        observer
            .observe_with_options(&body, &options)
            .map_err(listener_err)?;
        Ok(observer)
    }
}

// =============================================================================
// PageForm (WASM handle)
// =============================================================================

/// Handle to an attached page
///
/// A form can be attached once; `boot()` and `PageForm.attach()` are
/// alternatives, and the second attach throws.
///
/// # Example (TypeScript)
/// ```typescript
/// const page = PageForm.attach({ maxUrls: 5 });
/// // after injecting new .download-pdf links:
/// page.refreshDownloadAll();
/// ```
#[wasm_bindgen]
pub struct PageForm {
    inner: Rc<PageInner>,
    observer: Option<MutationObserver>,
}

impl PageForm {
    pub(crate) fn attach_with(config: PageConfig) -> Result<Self, SetupError> {
        let inner = Rc::new(PageInner::resolve(config)?);
        if inner.form.has_attribute(ATTACHED_ATTR) {
            return Err(SetupError::AlreadyAttached(inner.config.form_id.clone()));
        }
        let plan = inner
            .refresh()
            .map_err(|e| SetupError::Dom(format!("{:?}", e)))?;

        inner.install_listeners()?;
        inner
            .form
            .set_attribute(ATTACHED_ATTR, "")
            .map_err(|e| SetupError::Dom(format!("{:?}", e)))?;

        let observer = if inner.config.watch_links {
            Some(inner.watch_links()?)
        } else {
            None
        };

        web_sys::console::log_1(
            &format!("[PageForm] Attached ({} download links)", plan.link_count()).into(),
        );

        Ok(Self { inner, observer })
    }
}

#[wasm_bindgen]
impl PageForm {
    /// Resolve the page elements and install every listener
    #[wasm_bindgen]
    pub fn attach(config: JsValue) -> Result<PageForm, JsValue> {
        let config = parse_config(config)?;
        Ok(Self::attach_with(config)?)
    }

    /// Show or hide the download-all control; returns the new visibility
    #[wasm_bindgen(js_name = refreshDownloadAll)]
    pub fn refresh_download_all(&self) -> Result<bool, JsValue> {
        Ok(self.inner.refresh()?.visible)
    }

    /// Current download plan as `{ visible, request: { pdf_urls } | null }`
    #[wasm_bindgen(js_name = downloadPlan)]
    pub fn download_plan(&self) -> Result<JsValue, JsValue> {
        let plan = self.inner.plan()?;
        serde_wasm_bindgen::to_value(&plan).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&self) -> Result<usize, JsValue> {
        self.inner.clear_all()
    }

    /// Accepted URLs, or throws the user-facing validation message
    #[wasm_bindgen]
    pub fn validate(&self) -> Result<Vec<String>, JsValue> {
        self.inner
            .validate()?
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Run one batch download; resolves to `false` when there is nothing to zip
    #[wasm_bindgen(js_name = downloadAll)]
    pub fn download_all(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            match inner.download_all().await {
                Ok(downloaded) => Ok(JsValue::from_bool(downloaded)),
                Err(e) => {
                    web_sys::console::error_1(&format!("[BatchDownload] Error creating zip: {}", e).into());
                    Err(JsValue::from_str(&e.to_string()))
                }
            }
        })
    }

    /// Stop re-evaluating visibility on DOM mutations
    #[wasm_bindgen(js_name = stopWatching)]
    pub fn stop_watching(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
    }

    #[wasm_bindgen(js_name = isWatching)]
    pub fn is_watching(&self) -> bool {
        self.observer.is_some()
    }
}

/// Attach once the document is parsed
///
/// Attaches immediately when the document is already interactive, otherwise
/// on `DOMContentLoaded`. Setup failures are logged.
#[wasm_bindgen]
pub fn boot(config: JsValue) -> Result<(), JsValue> {
    let config = parse_config(config)?;
    let window = web_sys::window().ok_or(SetupError::NoWindow)?;
    let document = window.document().ok_or(SetupError::NoDocument)?;

    if document.ready_state() != "loading" {
        attach_logged(config);
        return Ok(());
    }

    let on_ready = Closure::once_into_js(move || attach_logged(config));
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    Ok(())
}

fn attach_logged(config: PageConfig) {
    if let Err(e) = PageForm::attach_with(config) {
        web_sys::console::error_1(&format!("[PageForm] Setup failed: {}", e).into());
    }
}
