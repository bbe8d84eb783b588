//! Small DOM helpers shared by the service and zoom sessions.

use mediazoom_core::{PageOffset, ViewportMetrics};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use crate::error::ZoomError;

pub fn window() -> Result<Window, ZoomError> {
    web_sys::window().ok_or(ZoomError::NoWindow)
}

pub fn document() -> Result<Document, ZoomError> {
    window()?.document().ok_or(ZoomError::NoDocument)
}

pub fn body() -> Result<HtmlElement, ZoomError> {
    document()?.body().ok_or(ZoomError::NoBody)
}

/// Absolute page position of `element`, found by walking its offset parents.
/// Elements without an offset parent (detached or `display: none`) sit at
/// the origin.
pub fn page_offset(element: &HtmlElement) -> PageOffset {
    if element.offset_parent().is_none() {
        return PageOffset::default();
    }

    let chain = std::iter::successors(Some(element.clone()), |el| {
        el.offset_parent()
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
    });

    PageOffset::accumulate(chain.map(|el| (el.offset_left() as f64, el.offset_top() as f64)))
}

/// Inner size and scroll position of the window.
pub fn viewport_metrics(window: &Window) -> Result<ViewportMetrics, JsValue> {
    Ok(ViewportMetrics {
        inner_width: window.inner_width()?.as_f64().unwrap_or(0.0),
        inner_height: window.inner_height()?.as_f64().unwrap_or(0.0),
        scroll_x: window.scroll_x()?,
        scroll_y: window.scroll_y()?,
    })
}

/// Set `transform` along with its vendor-prefixed forms. An empty value
/// removes the property.
pub fn set_transform_style(element: &HtmlElement, value: &str) -> Result<(), JsValue> {
    let style = element.style();
    for property in ["-webkit-transform", "-ms-transform", "transform"] {
        style.set_property(property, value)?;
    }
    Ok(())
}

/// Whether the engine knows the `transition` CSS property. Without it no
/// `transitionend` event will ever fire.
pub fn supports_transitions(body: &HtmlElement) -> bool {
    js_sys::Reflect::has(&body.style(), &JsValue::from_str("transition")).unwrap_or(false)
}

pub fn create_div(document: &Document, class_name: &str) -> Result<HtmlElement, JsValue> {
    let div = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    div.set_class_name(class_name);
    Ok(div)
}
