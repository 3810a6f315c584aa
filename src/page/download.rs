//! Zip request and archive download
//!
//! `POST` the link list, read the body as a blob, then hand the blob to the
//! browser through a hidden anchor. Each call is one request and at most one
//! download; nothing is retried.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, Document, Headers, HtmlAnchorElement, Request, RequestInit, Response, Url, Window};

use crate::archive::{check_status, ArchiveError, ZipRequest};

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Send the zip request and wait for the response headers
pub(crate) async fn send_zip_request(
    window: &Window,
    endpoint: &str,
    request: &ZipRequest,
) -> Result<Response, ArchiveError> {
    let body = request.to_json()?;

    let headers = Headers::new().map_err(|e| ArchiveError::Network(describe(&e)))?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|e| ArchiveError::Network(describe(&e)))?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(endpoint, &init)
        .map_err(|e| ArchiveError::Network(describe(&e)))?;

    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| ArchiveError::Network(describe(&e)))?;

    value
        .dyn_into::<Response>()
        .map_err(|v| ArchiveError::Network(format!("fetch resolved to a non-Response: {}", describe(&v))))
}

/// Check the status and read the whole body as a blob
pub(crate) async fn read_archive(response: Response) -> Result<Blob, ArchiveError> {
    check_status(response.status())?;

    let promise = response.blob().map_err(|e| ArchiveError::Body(describe(&e)))?;
    let value = JsFuture::from(promise)
        .await
        .map_err(|e| ArchiveError::Body(describe(&e)))?;

    value
        .dyn_into::<Blob>()
        .map_err(|v| ArchiveError::Body(format!("body is not a Blob: {}", describe(&v))))
}

/// Offer `blob` as a download named `filename`
///
/// The object URL is released on the next tick, once the click has been
/// dispatched.
pub(crate) fn save_blob(
    window: &Window,
    document: &Document,
    blob: &Blob,
    filename: &str,
) -> Result<(), ArchiveError> {
    let url = Url::create_object_url_with_blob(blob).map_err(|e| ArchiveError::Dom(describe(&e)))?;
    let clicked = click_hidden_anchor(document, &url, filename);

    let revoke_url = url.clone();
    let revoke = Closure::once_into_js(move || revoke_object_url(&revoke_url));
    if window
        .set_timeout_with_callback_and_timeout_and_arguments_0(revoke.unchecked_ref(), 0)
        .is_err()
    {
        revoke_object_url(&url);
    }

    clicked
}

pub(crate) fn revoke_object_url(url: &str) {
    if let Err(e) = Url::revoke_object_url(url) {
        web_sys::console::error_1(&format!("[BatchDownload] Failed to revoke object URL: {}", describe(&e)).into());
    }
}

fn click_hidden_anchor(document: &Document, url: &str, filename: &str) -> Result<(), ArchiveError> {
    let dom_err = |e: JsValue| ArchiveError::Dom(describe(&e));

    let body = document
        .body()
        .ok_or_else(|| ArchiveError::Dom("document has no <body>".to_string()))?;
    let anchor = document
        .create_element("a")
        .map_err(dom_err)?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| ArchiveError::Dom("created element is not an anchor".to_string()))?;

    anchor.set_href(url);
    anchor.set_download(filename);
    anchor.style().set_property("display", "none").map_err(dom_err)?;

    body.append_child(&anchor).map_err(dom_err)?;
    anchor.click();
    anchor.remove();
    Ok(())
}

/// Full round trip: request, read, save
pub(crate) async fn download_archive(
    window: &Window,
    document: &Document,
    endpoint: &str,
    request: &ZipRequest,
    filename: &str,
) -> Result<(), ArchiveError> {
    let response = send_zip_request(window, endpoint, request).await?;
    let blob = read_archive(response).await?;
    save_blob(window, document, &blob, filename)
}
