//! Fixtures shared by the browser tests.

use gloo_timers::future::TimeoutFuture;
use mediazoom_core::contract::{CLASS_MEDIA_WRAP, CLASS_OVERLAY, ORIGINAL_ATTR, PLAY_ATTR, ZOOM_ATTR};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Event, EventTarget, HtmlElement, HtmlImageElement, HtmlVideoElement};

/// 400x300 SVG, loads without network access.
pub const SVG_400X300: &str = "data:image/svg+xml,%3Csvg%20xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22%20width%3D%22400%22%20height%3D%22300%22%3E%3C%2Fsvg%3E";

/// Never decodes; video tests drive readiness by hand.
pub const VIDEO_URL: &str = "data:video/mp4;base64,AAAA";

pub fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn body() -> HtmlElement {
    document().body().unwrap()
}

/// A container appended to the body, removed again on drop.
pub struct Fixture {
    container: HtmlElement,
}

impl Fixture {
    pub fn new() -> Self {
        let container = document()
            .create_element("div")
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap();
        body().append_child(&container).unwrap();
        Self { container }
    }

    pub fn child(&self, tag: &str) -> HtmlElement {
        let element = document()
            .create_element(tag)
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap();
        self.container.append_child(&element).unwrap();
        element
    }

    /// Armed `<img>` showing the 400x300 test asset at `width` CSS pixels.
    pub fn image(&self, width: u32) -> HtmlImageElement {
        let img = self.child("img").dyn_into::<HtmlImageElement>().unwrap();
        img.set_width(width);
        img.set_src(SVG_400X300);
        img.set_attribute(ZOOM_ATTR, "zoom").unwrap();
        img
    }

    /// Armed `<video>` at `width` CSS pixels whose `play()` only counts
    /// calls, see `play_count`.
    pub fn video(&self, width: u32, play_policy: Option<&str>) -> HtmlVideoElement {
        let video = self.child("video").dyn_into::<HtmlVideoElement>().unwrap();
        video.set_width(width);
        video.set_attribute(ZOOM_ATTR, "zoom").unwrap();
        video.set_attribute(ORIGINAL_ATTR, VIDEO_URL).unwrap();
        if let Some(policy) = play_policy {
            video.set_attribute(PLAY_ATTR, policy).unwrap();
        }

        let play = js_sys::Function::new_no_args(
            "this.playCount = (this.playCount || 0) + 1; return Promise.resolve();",
        );
        js_sys::Reflect::set(&video, &JsValue::from_str("play"), &play).unwrap();
        video
    }

    /// Whether `element` sits directly in the fixture, i.e. is not wrapped.
    pub fn holds(&self, element: &HtmlElement) -> bool {
        element
            .parent_node()
            .is_some_and(|parent| parent.is_same_node(Some(self.container.as_ref())))
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.container.remove();
    }
}

pub fn is_wrapped(element: &HtmlElement) -> bool {
    element
        .parent_element()
        .is_some_and(|parent| parent.class_list().contains(CLASS_MEDIA_WRAP))
}

pub fn overlay_count() -> u32 {
    document()
        .get_elements_by_class_name(CLASS_OVERLAY)
        .length()
}

pub fn play_count(video: &HtmlVideoElement) -> u32 {
    js_sys::Reflect::get(video, &JsValue::from_str("playCount"))
        .unwrap()
        .as_f64()
        .unwrap_or(0.0) as u32
}

pub fn body_has(class_name: &str) -> bool {
    body().class_list().contains(class_name)
}

pub fn fire(target: &EventTarget, event_type: &str) {
    let event = Event::new(event_type).unwrap();
    target.dispatch_event(&event).unwrap();
}

/// Poll `condition` every 10ms for up to two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        TimeoutFuture::new(10).await;
    }
    condition()
}

/// Give pending load callbacks a chance to run.
pub async fn settle() {
    TimeoutFuture::new(200).await;
}
