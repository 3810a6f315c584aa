//! DOM lookups shared by the page handlers

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlAnchorElement, HtmlElement, HtmlInputElement, NodeList, Url};

use super::SetupError;

/// Look up an element by id and cast it to the expected interface
pub(crate) fn element_by_id<T: JsCast>(
    document: &Document,
    id: &str,
    expected: &'static str,
) -> Result<T, SetupError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| SetupError::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| SetupError::WrongElement {
            id: id.to_string(),
            expected,
        })
}

/// Collect the input elements of a node list, skipping anything else
pub(crate) fn inputs(list: &NodeList) -> Vec<HtmlInputElement> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
        .collect()
}

/// Resolved absolute href of a download link
///
/// Anchors resolve through the browser; other marked elements resolve their
/// `href` attribute against the node's base URI. Elements without an href
/// yield `None`.
pub(crate) fn link_href(element: &Element) -> Option<String> {
    if let Some(anchor) = element.dyn_ref::<HtmlAnchorElement>() {
        let href = anchor.href();
        return (!href.is_empty()).then_some(href);
    }

    let raw = element.get_attribute("href")?;
    match element.base_uri().ok().flatten() {
        Some(base) => Some(
            Url::new_with_base(&raw, &base)
                .map(|url| url.href())
                .unwrap_or(raw),
        ),
        None => Some(raw),
    }
}

/// Hrefs of every element matching `selector`, in document order
pub(crate) fn link_hrefs(document: &Document, selector: &str) -> Result<Vec<String>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .filter_map(|element| link_href(&element))
        .collect())
}

/// Show or hide an element via its inline `display` style
pub(crate) fn set_visible(element: &HtmlElement, visible: bool, display: &str) -> Result<(), JsValue> {
    let value = if visible { display } else { "none" };
    element.style().set_property("display", value)
}
