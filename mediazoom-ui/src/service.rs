//! Page-level zoom controller.
//!
//! `ZoomService` watches the body for clicks on armed media, owns at most one
//! active `Zoom`, and attaches the scroll/click/key/touch listeners that
//! dismiss it. Those listeners belong to the active session and are dropped,
//! and so detached, together with it.

use std::cell::RefCell;
use std::rc::Rc;

use mediazoom_core::contract::{CLASS_OVERLAY_OPEN, ZOOM_ATTR};
use mediazoom_core::{
    is_dismiss_key, is_full_size, ScrollDismiss, SessionPhase, TouchDismiss, ZoomConfig,
    ZoomMarker,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent, Window};

use crate::dom::viewport_metrics;
use crate::error::ZoomError;
use crate::listener::Listener;
use crate::media::MediaElement;
use crate::zoom::Zoom;

pub struct ZoomService {
    state: Rc<RefCell<ServiceState>>,
    trigger: Option<Listener>,
}

struct ServiceState {
    config: ZoomConfig,
    window: Window,
    document: Document,
    body: HtmlElement,
    active: Option<ActiveZoom>,
}

/// The open session together with the dismissal state and listeners bound
/// to it.
struct ActiveZoom {
    zoom: Zoom,
    scroll: ScrollDismiss,
    touch: Option<TouchDismiss>,
    touch_move: Option<Listener>,
    _dismiss: Vec<Listener>,
}

impl ZoomService {
    pub fn new(config: ZoomConfig) -> Result<Self, ZoomError> {
        config.validate()?;

        let window = crate::dom::window()?;
        let document = window.document().ok_or(ZoomError::NoDocument)?;
        let body = document.body().ok_or(ZoomError::NoBody)?;

        Ok(Self {
            state: Rc::new(RefCell::new(ServiceState {
                config,
                window,
                document,
                body,
                active: None,
            })),
            trigger: None,
        })
    }

    /// Attach the delegated click handler to the document body. Calling it
    /// again replaces the previous registration.
    pub fn listen(&mut self) -> Result<(), ZoomError> {
        let body = self.state.borrow().body.clone();
        let service = Rc::downgrade(&self.state);

        self.trigger = None;
        self.trigger = Some(Listener::new(&body, "click", move |event| {
            let Some(state) = service.upgrade() else {
                return;
            };
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                ServiceState::on_trigger_click(&state, event);
            }
        })?);

        log::info!("Media zoom listening for clicks");
        Ok(())
    }

    /// Close the active zoom, if any. `force` skips the closing animation.
    pub fn close(&self, force: bool) {
        ServiceState::close_active(&self.state, force);
    }

    /// Whether a zoom session is active (loading or open).
    pub fn is_open(&self) -> bool {
        self.state.borrow().active.is_some()
    }

    pub fn active_phase(&self) -> Option<SessionPhase> {
        self.state
            .borrow()
            .active
            .as_ref()
            .map(|active| active.zoom.phase())
    }
}

impl Drop for ZoomService {
    fn drop(&mut self) {
        ServiceState::close_active(&self.state, true);
    }
}

impl ServiceState {
    fn on_trigger_click(state: &Rc<RefCell<Self>>, event: &MouseEvent) {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let marker = target.get_attribute(ZOOM_ATTR);
        if marker.as_deref().and_then(ZoomMarker::parse) != Some(ZoomMarker::Zoom) {
            return;
        }
        let Some(media) = MediaElement::from_element(&target) else {
            log::trace!("Ignoring {} marked {}", target.tag_name(), ZOOM_ATTR);
            return;
        };

        let (window, body, config) = {
            let s = state.borrow();
            (s.window.clone(), s.body.clone(), s.config)
        };

        if body.class_list().contains(CLASS_OVERLAY_OPEN) {
            log::trace!("A zoom is already open");
            return;
        }

        if event.meta_key() || event.ctrl_key() {
            open_in_new_context(&window, &media);
            return;
        }

        let viewport = match viewport_metrics(&window) {
            Ok(viewport) => viewport,
            Err(e) => {
                log::warn!("Failed to read viewport: {:?}", e);
                return;
            }
        };
        if is_full_size(media.rendered_size().width, viewport.inner_width, config.offset) {
            log::trace!("Media already fills the viewport");
            return;
        }

        if Self::open_zoom(state, media, viewport.scroll_y) {
            // The document-level click dismissal is already registered and
            // would otherwise close this zoom as the click bubbles up.
            event.stop_propagation();
        }
    }

    fn open_zoom(state: &Rc<RefCell<Self>>, media: MediaElement, scroll_y: f64) -> bool {
        Self::close_active(state, true);

        let config = state.borrow().config;
        let zoom = match Zoom::new(media, config) {
            Ok(zoom) => zoom,
            Err(e) => {
                log::warn!("Failed to create zoom: {}", e);
                return false;
            }
        };
        if let Err(e) = zoom.open() {
            log::warn!("Failed to open zoom: {}", e);
            zoom.dispose();
            return false;
        }

        let dismiss = match Self::dismiss_listeners(state) {
            Ok(listeners) => listeners,
            Err(e) => {
                log::warn!("Failed to attach dismiss listeners: {:?}", e);
                zoom.dispose();
                return false;
            }
        };

        state.borrow_mut().active = Some(ActiveZoom {
            zoom,
            scroll: ScrollDismiss::new(scroll_y, config.scroll_threshold),
            touch: None,
            touch_move: None,
            _dismiss: dismiss,
        });
        true
    }

    fn dismiss_listeners(state: &Rc<RefCell<Self>>) -> Result<Vec<Listener>, JsValue> {
        let (window, document) = {
            let s = state.borrow();
            (s.window.clone(), s.document.clone())
        };

        let bind = |handler: fn(&Rc<RefCell<Self>>, &Event)| {
            let service = Rc::downgrade(state);
            move |event: Event| {
                if let Some(state) = service.upgrade() {
                    handler(&state, &event);
                }
            }
        };

        Ok(vec![
            Listener::new(&window, "scroll", bind(Self::on_scroll))?,
            Listener::new(&document, "click", bind(Self::on_dismiss_click))?,
            Listener::new(&document, "keyup", bind(Self::on_key_up))?,
            Listener::new(&document, "touchstart", bind(Self::on_touch_start))?,
        ])
    }

    fn close_active(state: &Rc<RefCell<Self>>, force: bool) {
        let Some(active) = state.borrow_mut().active.take() else {
            return;
        };

        log::debug!("Closing zoom (force: {})", force);
        if force {
            active.zoom.dispose();
        } else {
            active.zoom.close();
        }
        // Dismiss listeners detach as `active` drops here.
    }

    fn on_scroll(state: &Rc<RefCell<Self>>, _event: &Event) {
        let should_close = {
            let s = state.borrow();
            match (&s.active, s.window.scroll_y()) {
                (Some(active), Ok(scroll_y)) => active.scroll.should_dismiss(scroll_y),
                _ => false,
            }
        };

        if should_close {
            Self::close_active(state, false);
        }
    }

    fn on_dismiss_click(state: &Rc<RefCell<Self>>, event: &Event) {
        event.stop_propagation();
        event.prevent_default();
        Self::close_active(state, false);
    }

    fn on_key_up(state: &Rc<RefCell<Self>>, event: &Event) {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if is_dismiss_key(&event.key()) {
            Self::close_active(state, false);
        }
    }

    fn on_touch_start(state: &Rc<RefCell<Self>>, event: &Event) {
        let Some(touch) = event
            .dyn_ref::<TouchEvent>()
            .and_then(|e| e.touches().get(0))
        else {
            return;
        };
        let Some(target) = event.target() else {
            return;
        };

        let mut s = state.borrow_mut();
        let threshold = s.config.touch_threshold;
        let Some(active) = s.active.as_mut() else {
            return;
        };

        active.touch = Some(TouchDismiss::new(touch.page_y() as f64, threshold));

        let service = Rc::downgrade(state);
        match Listener::new(&target, "touchmove", move |event| {
            if let Some(state) = service.upgrade() {
                Self::on_touch_move(&state, &event);
            }
        }) {
            Ok(listener) => active.touch_move = Some(listener),
            Err(e) => log::warn!("Failed to watch touchmove: {:?}", e),
        }
    }

    fn on_touch_move(state: &Rc<RefCell<Self>>, event: &Event) {
        let Some(touch) = event
            .dyn_ref::<TouchEvent>()
            .and_then(|e| e.touches().get(0))
        else {
            return;
        };

        let should_close = state
            .borrow()
            .active
            .as_ref()
            .and_then(|active| active.touch)
            .is_some_and(|touch_start| touch_start.should_dismiss(touch.page_y() as f64));

        if should_close {
            Self::close_active(state, false);
        }
    }
}

/// Modifier-click: show the full-resolution asset in a new browsing context.
fn open_in_new_context(window: &Window, media: &MediaElement) {
    let Some(url) = media.source_url() else {
        return;
    };

    log::debug!("Opening {} in a new tab", url);
    if let Err(e) = window.open_with_url_and_target(&url, "_blank") {
        log::warn!("Failed to open {}: {:?}", url, e);
    }
}

#[cfg(test)]
mod browser_tests {
    use super::*;
    use crate::test_support::*;
    use mediazoom_core::contract::{CLASS_MEDIA_LOADING, CLASS_OVERLAY_TRANSITIONING, ORIGINAL_ATTR};
    use wasm_bindgen_test::*;
    use web_sys::{EventTarget, KeyboardEventInit, MouseEventInit, Touch, TouchEventInit, TouchInit};

    wasm_bindgen_test_configure!(run_in_browser);

    fn listening_service() -> ZoomService {
        let mut service = ZoomService::new(ZoomConfig::default()).unwrap();
        service.listen().unwrap();
        service
    }

    fn key_up(key: &str) {
        let init = KeyboardEventInit::new();
        init.set_key(key);
        init.set_bubbles(true);
        let event = KeyboardEvent::new_with_keyboard_event_init_dict("keyup", &init).unwrap();
        document().dispatch_event(&event).unwrap();
    }

    /// Dispatch a single-finger touch event at `page_y` on `target`.
    fn touch(target: &EventTarget, event_type: &str, page_y: f64) {
        let touch_init = TouchInit::new(1, target);
        touch_init.set_page_y(page_y as i32);
        let touches = js_sys::Array::of1(&Touch::new(&touch_init).unwrap());

        let init = TouchEventInit::new();
        init.set_bubbles(true);
        init.set_touches(&touches);
        let event = TouchEvent::new_with_event_init_dict(event_type, &init).unwrap();
        target.dispatch_event(&event).unwrap();
    }

    fn scroll_to(y: f64) {
        let window = web_sys::window().unwrap();
        window.scroll_to_with_x_and_y(0.0, y);
        window.dispatch_event(&Event::new("scroll").unwrap()).unwrap();
    }

    #[wasm_bindgen_test]
    async fn test_click_opens_and_click_elsewhere_restores() {
        let fixture = Fixture::new();
        let img = fixture.image(100);
        let service = listening_service();

        img.click();
        assert!(service.is_open());
        assert!(img.class_list().contains(CLASS_MEDIA_LOADING));

        assert!(wait_until(|| service.active_phase() == Some(SessionPhase::Open)).await);
        assert!(is_wrapped(&img));
        assert_eq!(overlay_count(), 1);
        assert_eq!(img.get_attribute(ZOOM_ATTR).as_deref(), Some("zoom-out"));

        body().click();
        assert!(!service.is_open());
        assert!(body_has(CLASS_OVERLAY_TRANSITIONING));

        fire(&img, "transitionend");
        assert!(fixture.holds(&img));
        assert_eq!(overlay_count(), 0);
        assert_eq!(img.get_attribute(ZOOM_ATTR).as_deref(), Some("zoom"));
        assert!(!body_has(CLASS_OVERLAY_TRANSITIONING));
    }

    #[wasm_bindgen_test]
    async fn test_clicking_zoomed_media_closes_it() {
        let fixture = Fixture::new();
        let img = fixture.image(100);
        let service = listening_service();

        img.click();
        assert!(wait_until(|| service.active_phase() == Some(SessionPhase::Open)).await);

        img.click();
        assert!(!service.is_open());

        fire(&img, "transitionend");
        assert!(fixture.holds(&img));
    }

    #[wasm_bindgen_test]
    async fn test_new_trigger_forcibly_replaces_loading_zoom() {
        let fixture = Fixture::new();
        let first = fixture.image(100);
        let second = fixture.image(120);
        let service = listening_service();

        first.click();
        second.click();

        assert!(service.is_open());
        assert!(!first.class_list().contains(CLASS_MEDIA_LOADING));
        assert!(second.class_list().contains(CLASS_MEDIA_LOADING));

        assert!(wait_until(|| service.active_phase() == Some(SessionPhase::Open)).await);
        settle().await;

        assert!(is_wrapped(&second));
        assert!(fixture.holds(&first));
        assert_eq!(first.get_attribute(ZOOM_ATTR).as_deref(), Some("zoom"));
        assert_eq!(overlay_count(), 1);

        service.close(true);
        assert!(fixture.holds(&second));
        assert_eq!(overlay_count(), 0);
    }

    #[wasm_bindgen_test]
    fn test_unmarked_and_unsupported_targets_are_ignored() {
        let fixture = Fixture::new();
        let plain = fixture.image(100);
        plain.remove_attribute(ZOOM_ATTR).unwrap();
        let div = fixture.child("div");
        div.set_attribute(ZOOM_ATTR, "zoom").unwrap();
        let service = listening_service();

        plain.click();
        assert!(!service.is_open());

        div.click();
        assert!(!service.is_open());
    }

    #[wasm_bindgen_test]
    fn test_full_size_media_is_not_zoomed() {
        let fixture = Fixture::new();
        let inner_width = web_sys::window()
            .unwrap()
            .inner_width()
            .unwrap()
            .as_f64()
            .unwrap();
        let img = fixture.image((inner_width - 80.0) as u32);
        let service = listening_service();

        img.click();
        assert!(!service.is_open());
        assert!(!img.class_list().contains(CLASS_MEDIA_LOADING));
    }

    #[wasm_bindgen_test]
    fn test_modifier_click_opens_original_in_new_tab() {
        const FULL_URL: &str = "https://example.com/full-size.png";

        let fixture = Fixture::new();
        let img = fixture.image(100);
        img.set_attribute(ORIGINAL_ATTR, FULL_URL).unwrap();
        let service = listening_service();

        // Record window.open calls instead of opening tabs
        let window = web_sys::window().unwrap();
        let open_key = JsValue::from_str("open");
        let real_open = js_sys::Reflect::get(&window, &open_key).unwrap();
        let recorder = js_sys::Function::new_with_args(
            "url, target",
            "(this.openCalls = this.openCalls || []).push([url, target]); return null;",
        );
        js_sys::Reflect::set(&window, &open_key, &recorder).unwrap();

        for (ctrl, meta) in [(true, false), (false, true)] {
            let init = MouseEventInit::new();
            init.set_bubbles(true);
            init.set_ctrl_key(ctrl);
            init.set_meta_key(meta);
            let event = MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap();
            img.dispatch_event(&event).unwrap();

            assert!(!service.is_open());
            assert!(!img.class_list().contains(CLASS_MEDIA_LOADING));
        }

        let calls = js_sys::Reflect::get(&window, &JsValue::from_str("openCalls")).unwrap();
        js_sys::Reflect::set(&window, &open_key, &real_open).unwrap();
        js_sys::Reflect::delete_property(&window, &JsValue::from_str("openCalls")).unwrap();

        let calls: js_sys::Array = calls.dyn_into().unwrap();
        assert_eq!(calls.length(), 2);
        for call in calls.iter() {
            let call: js_sys::Array = call.dyn_into().unwrap();
            assert_eq!(call.get(0).as_string().as_deref(), Some(FULL_URL));
            assert_eq!(call.get(1).as_string().as_deref(), Some("_blank"));
        }
        // The override stays for a later plain click
        assert_eq!(img.get_attribute(ORIGINAL_ATTR).as_deref(), Some(FULL_URL));
    }

    #[wasm_bindgen_test]
    async fn test_zoom_opened_during_close_survives_old_transition_end() {
        let fixture = Fixture::new();
        let first = fixture.image(100);
        let second = fixture.image(120);
        let third = fixture.image(140);
        let service = listening_service();

        first.click();
        assert!(wait_until(|| service.active_phase() == Some(SessionPhase::Open)).await);

        // First zoom starts animating back; second is clicked before it ends
        body().click();
        assert!(!service.is_open());
        second.click();
        assert!(wait_until(|| service.active_phase() == Some(SessionPhase::Open)).await);

        fire(&first, "transitionend");
        assert!(fixture.holds(&first));
        assert!(is_wrapped(&second));
        assert!(body_has(CLASS_OVERLAY_OPEN));
        assert!(!body_has(CLASS_OVERLAY_TRANSITIONING));
        assert_eq!(overlay_count(), 1);

        // With the second zoom open, clicking another armed image dismisses it
        third.click();
        assert!(!service.is_open());
        assert!(!third.class_list().contains(CLASS_MEDIA_LOADING));
        assert!(fixture.holds(&third));
        assert!(body_has(CLASS_OVERLAY_TRANSITIONING));

        fire(&second, "transitionend");
        assert!(fixture.holds(&second));
        assert_eq!(overlay_count(), 0);
        assert!(!body_has(CLASS_OVERLAY_OPEN));
    }

    #[wasm_bindgen_test]
    async fn test_touch_drag_past_threshold_dismisses() {
        let fixture = Fixture::new();
        let img = fixture.image(100);
        let service = listening_service();

        img.click();
        assert!(wait_until(|| service.active_phase() == Some(SessionPhase::Open)).await);

        touch(&img, "touchstart", 200.0);
        touch(&img, "touchmove", 209.0);
        assert!(service.is_open());
        touch(&img, "touchmove", 191.0);
        assert!(service.is_open());

        touch(&img, "touchmove", 211.0);
        assert!(!service.is_open());
        assert!(body_has(CLASS_OVERLAY_TRANSITIONING));

        // Listener went with the closed session
        touch(&img, "touchmove", 400.0);
        assert!(!service.is_open());
        assert!(is_wrapped(&img));

        fire(&img, "transitionend");
        assert!(fixture.holds(&img));
    }

    #[wasm_bindgen_test]
    async fn test_touch_start_belongs_to_one_session() {
        let fixture = Fixture::new();
        let img = fixture.image(100);
        let service = listening_service();

        img.click();
        assert!(wait_until(|| service.active_phase() == Some(SessionPhase::Open)).await);
        touch(&img, "touchstart", 200.0);

        service.close(true);
        img.click();
        assert!(wait_until(|| service.active_phase() == Some(SessionPhase::Open)).await);

        // No touchstart yet for this session, so the drag is not tracked
        touch(&img, "touchmove", 400.0);
        assert!(service.is_open());

        // A fresh touchstart re-baselines the drag
        let wrap = img.parent_element().unwrap();
        touch(&wrap, "touchstart", 400.0);
        touch(&wrap, "touchmove", 405.0);
        assert!(service.is_open());

        service.close(true);
        assert!(fixture.holds(&img));
    }

    #[wasm_bindgen_test]
    async fn test_only_escape_dismisses() {
        let fixture = Fixture::new();
        let img = fixture.image(100);
        let service = listening_service();

        img.click();
        assert!(wait_until(|| service.active_phase() == Some(SessionPhase::Open)).await);

        key_up("Enter");
        key_up("a");
        assert!(service.is_open());

        key_up("Escape");
        assert!(!service.is_open());
        fire(&img, "transitionend");
        assert!(fixture.holds(&img));
    }

    #[wasm_bindgen_test]
    async fn test_scroll_past_threshold_dismisses() {
        let fixture = Fixture::new();
        let spacer = fixture.child("div");
        spacer.set_attribute("style", "height: 5000px;").unwrap();
        let img = fixture.image(100);
        scroll_to(0.0);
        let service = listening_service();

        img.click();
        assert!(wait_until(|| service.active_phase() == Some(SessionPhase::Open)).await);

        scroll_to(39.0);
        assert!(service.is_open());

        scroll_to(41.0);
        assert!(!service.is_open());

        fire(&img, "transitionend");
        scroll_to(0.0);
    }

    #[wasm_bindgen_test]
    async fn test_dropping_service_restores_page() {
        let fixture = Fixture::new();
        let img = fixture.image(100);
        let service = listening_service();

        img.click();
        assert!(wait_until(|| service.active_phase() == Some(SessionPhase::Open)).await);

        drop(service);
        assert!(fixture.holds(&img));
        assert_eq!(overlay_count(), 0);
        assert!(!body_has(CLASS_OVERLAY_OPEN));

        // Body listener is gone with the service
        img.click();
        assert!(!img.class_list().contains(CLASS_MEDIA_LOADING));
    }
}
