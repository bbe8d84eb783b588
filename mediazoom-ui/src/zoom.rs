//! A single zoom session.
//!
//! A `Zoom` loads the full-resolution asset of one media element off-DOM,
//! wraps the element, adds the page overlay and applies the scale/translate
//! transforms. `close` animates back; `dispose` restores the original DOM.
//!
//! Asset callbacks hold a weak reference to the session and only act while it
//! is still loading, so a session disposed before its asset arrives is left
//! alone.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use mediazoom_core::contract::{
    CLASS_MEDIA, CLASS_MEDIA_LOADING, CLASS_MEDIA_WRAP, CLASS_OVERLAY, CLASS_OVERLAY_OPEN,
    CLASS_OVERLAY_TRANSITIONING, ORIGINAL_ATTR, ZOOM_ATTR,
};
use mediazoom_core::{
    scale_factor, scale_transform, translate_transform, translation, LoadStrategy, PlayPolicy,
    SessionPhase, Size, Translation, ZoomConfig, ZoomMarker,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, EventTarget, HtmlElement, HtmlImageElement, HtmlSourceElement, HtmlVideoElement, Window};

use crate::dom::{
    create_div, page_offset, set_transform_style, supports_transitions, viewport_metrics,
};
use crate::error::ZoomError;
use crate::listener::Listener;
use crate::media::MediaElement;

const TRANSITION_END_EVENTS: [&str; 2] = ["transitionend", "webkitTransitionEnd"];

pub struct Zoom {
    state: Rc<RefCell<ZoomState>>,
}

struct ZoomState {
    media: MediaElement,
    window: Window,
    document: Document,
    body: HtmlElement,
    config: ZoomConfig,
    phase: SessionPhase,
    wrap: Option<HtmlElement>,
    overlay: Option<HtmlElement>,
    natural: Option<Size>,
    scale: f64,
    translation: Translation,
    loader: Option<AssetLoader>,
    transition_end: Vec<Listener>,
}

/// Off-DOM element fetching the full-resolution asset, plus its ready
/// listener. Dropping it abandons the load.
struct AssetLoader {
    _element: HtmlElement,
    _ready: Listener,
}

impl AssetLoader {
    fn image(document: &Document, url: &str, session: Weak<RefCell<ZoomState>>) -> Result<Self, JsValue> {
        let img = document
            .create_element("img")?
            .dyn_into::<HtmlImageElement>()?;

        let loaded = img.clone();
        let ready = Listener::new(&img, "load", move |_| {
            let natural = Size::new(loaded.natural_width() as f64, loaded.natural_height() as f64);
            ZoomState::on_asset_ready(&session, natural);
        })?;

        img.set_src(url);

        Ok(Self {
            _element: img.into(),
            _ready: ready,
        })
    }

    fn video(document: &Document, url: &str, session: Weak<RefCell<ZoomState>>) -> Result<Self, JsValue> {
        let video = document
            .create_element("video")?
            .dyn_into::<HtmlVideoElement>()?;
        let source = document
            .create_element("source")?
            .dyn_into::<HtmlSourceElement>()?;

        // Off-DOM videos may stop at metadata and never reach `canplay`
        video.set_preload("auto");
        video.append_child(&source)?;

        let loaded = video.clone();
        let ready = Listener::new(&video, "canplay", move |_| {
            let natural = Size::new(loaded.video_width() as f64, loaded.video_height() as f64);
            ZoomState::on_asset_ready(&session, natural);
        })?;

        source.set_src(url);

        Ok(Self {
            _element: video.into(),
            _ready: ready,
        })
    }
}

impl Zoom {
    pub fn new(media: MediaElement, config: ZoomConfig) -> Result<Self, ZoomError> {
        let window = crate::dom::window()?;
        let document = window.document().ok_or(ZoomError::NoDocument)?;
        let body = document.body().ok_or(ZoomError::NoBody)?;

        Ok(Self {
            state: Rc::new(RefCell::new(ZoomState {
                media,
                window,
                document,
                body,
                config,
                phase: SessionPhase::Loading,
                wrap: None,
                overlay: None,
                natural: None,
                scale: 1.0,
                translation: Translation::default(),
                loader: None,
                transition_end: Vec::new(),
            })),
        })
    }

    /// Start loading the full-resolution asset. Layout happens once it is
    /// ready; the visible element switches to the resolved URL right away.
    pub fn open(&self) -> Result<(), ZoomError> {
        let mut state = self.state.borrow_mut();

        let Some(url) = state.media.source_url() else {
            log::warn!("Zoom target has no source to load");
            return Ok(());
        };

        state
            .media
            .element()
            .class_list()
            .add_1(CLASS_MEDIA_LOADING)?;

        let session = Rc::downgrade(&self.state);
        let loader = match state.media.kind().load_strategy() {
            LoadStrategy::Image => AssetLoader::image(&state.document, &url, session)?,
            LoadStrategy::Video => AssetLoader::video(&state.document, &url, session)?,
        };
        state.loader = Some(loader);
        state.media.set_source(&url);

        log::debug!("Zoom loading {:?} from {}", state.media.kind(), url);
        Ok(())
    }

    /// Animate back to the original position and dispose once the CSS
    /// transition ends. A session still loading is disposed immediately.
    pub fn close(&self) {
        let mut state = self.state.borrow_mut();

        match state.phase.on_close() {
            SessionPhase::Disposed => {
                state.dispose();
                return;
            }
            _ if state.phase == SessionPhase::Closing => return,
            _ => {}
        }

        state.phase = SessionPhase::Closing;

        let classes = state.body.class_list();
        if let Err(e) = classes
            .remove_1(CLASS_OVERLAY_OPEN)
            .and_then(|_| classes.add_1(CLASS_OVERLAY_TRANSITIONING))
        {
            log::warn!("Failed to update body classes on close: {:?}", e);
        }
        state.clear_transforms();

        if !supports_transitions(&state.body) {
            state.dispose();
            return;
        }

        let target: EventTarget = state.media.html().clone().into();
        for event_type in TRANSITION_END_EVENTS {
            let session = Rc::clone(&self.state);
            match Listener::new(&target, event_type, move |_| session.borrow_mut().dispose()) {
                Ok(listener) => state.transition_end.push(listener),
                Err(e) => log::warn!("Failed to watch {}: {:?}", event_type, e),
            }
        }

        if state.transition_end.is_empty() {
            state.dispose();
        }
    }

    /// Restore the original DOM. Safe to call at any point, any number of
    /// times.
    pub fn dispose(&self) {
        self.state.borrow_mut().dispose();
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase
    }

    /// Natural size of the loaded asset, once known.
    pub fn natural_size(&self) -> Option<Size> {
        self.state.borrow().natural
    }

    pub fn scale(&self) -> f64 {
        self.state.borrow().scale
    }

    pub fn translation(&self) -> Translation {
        self.state.borrow().translation
    }
}

#[cfg(test)]
impl Zoom {
    /// URL the off-DOM loader is fetching, if a load is pending.
    pub(crate) fn loading_url(&self) -> Option<String> {
        let state = self.state.borrow();
        let element = &state.loader.as_ref()?._element;
        if let Some(img) = element.dyn_ref::<HtmlImageElement>() {
            return Some(img.src());
        }
        let source = element.query_selector("source").ok()??;
        Some(source.dyn_into::<HtmlSourceElement>().ok()?.src())
    }

    /// Deliver the asset's natural size as the loader's ready event would.
    pub(crate) fn asset_ready(&self, natural: Size) {
        ZoomState::on_asset_ready(&Rc::downgrade(&self.state), natural);
    }
}

impl ZoomState {
    fn on_asset_ready(session: &Weak<RefCell<ZoomState>>, natural: Size) {
        let Some(session) = session.upgrade() else {
            log::trace!("Asset ready after its zoom was dropped");
            return;
        };
        let mut state = session.borrow_mut();

        if !state.phase.accepts_layout() {
            log::debug!("Asset ready for a zoom in phase {:?}; ignoring", state.phase);
            return;
        }

        state.natural = Some(natural);
        if let Err(e) = state.layout(natural) {
            log::warn!("Failed to lay out zoom: {:?}", e);
        }
        state.finish_loading();
    }

    fn layout(&mut self, natural: Size) -> Result<(), JsValue> {
        let media = self.media.html().clone();
        let parent = media
            .parent_node()
            .ok_or_else(|| JsValue::from_str("zoom target is not attached"))?;

        let wrap = create_div(&self.document, CLASS_MEDIA_WRAP)?;
        parent.insert_before(&wrap, Some(media.as_ref()))?;
        wrap.append_child(&media)?;
        self.wrap = Some(wrap.clone());
        self.phase = SessionPhase::Open;

        media.class_list().add_1(CLASS_MEDIA)?;
        media.set_attribute(ZOOM_ATTR, ZoomMarker::ZoomOut.as_str())?;

        let overlay = create_div(&self.document, CLASS_OVERLAY)?;
        self.body.append_child(&overlay)?;
        self.overlay = Some(overlay);

        // Force a reflow so the transforms animate from the wrapped position.
        let _ = media.offset_width();

        let viewport = viewport_metrics(&self.window)?;
        let rendered = self.media.rendered_size();
        self.scale = scale_factor(natural, rendered.width, &viewport, self.config.offset);
        self.translation = translation(page_offset(&media), rendered, &viewport);

        set_transform_style(&media, &scale_transform(self.scale))?;
        set_transform_style(&wrap, &translate_transform(self.translation))?;
        self.body.class_list().add_1(CLASS_OVERLAY_OPEN)?;

        log::debug!(
            "Zoom open: natural {}x{}, scale {}, translate ({}, {})",
            natural.width,
            natural.height,
            self.scale,
            self.translation.x,
            self.translation.y
        );
        Ok(())
    }

    fn finish_loading(&self) {
        let element = self.media.element();
        if let Err(e) = element.class_list().remove_1(CLASS_MEDIA_LOADING) {
            log::warn!("Failed to clear loading state: {:?}", e);
        }

        match self.media.kind().load_strategy() {
            // Later zooms fall back to the source now on display.
            LoadStrategy::Image => {
                if let Err(e) = element.remove_attribute(ORIGINAL_ATTR) {
                    log::warn!("Failed to drop {} after load: {:?}", ORIGINAL_ATTR, e);
                }
            }
            LoadStrategy::Video => self.media.play(),
        }
    }

    fn clear_transforms(&self) {
        let media = self.media.html();
        let cleared = set_transform_style(media, "").and_then(|_| match &self.wrap {
            Some(wrap) => set_transform_style(wrap, ""),
            None => Ok(()),
        });

        if let Err(e) = cleared {
            log::warn!("Failed to clear zoom transforms: {:?}", e);
        }
    }

    fn dispose(&mut self) {
        if self.phase.is_disposed() {
            return;
        }

        let was_loading = self.phase == SessionPhase::Loading;
        let was_open = self.phase.holds_overlay_class();
        self.phase = SessionPhase::Disposed;
        self.loader = None;
        self.transition_end.clear();

        if was_loading {
            let _ = self
                .media
                .element()
                .class_list()
                .remove_1(CLASS_MEDIA_LOADING);
        }

        let overlay = self.overlay.take();
        let Some(wrap) = self.wrap.take() else {
            return;
        };
        if wrap.parent_node().is_none() {
            return;
        }

        if let Err(e) = self.restore(&wrap, overlay.as_ref(), was_open) {
            log::warn!("Failed to restore DOM after zoom: {:?}", e);
        }
        log::debug!("Zoom disposed");
    }

    fn restore(
        &self,
        wrap: &HtmlElement,
        overlay: Option<&HtmlElement>,
        was_open: bool,
    ) -> Result<(), JsValue> {
        let media = self.media.html();

        set_transform_style(media, "")?;
        media.class_list().remove_1(CLASS_MEDIA)?;
        media.set_attribute(ZOOM_ATTR, ZoomMarker::Zoom.as_str())?;
        wrap.replace_with_with_node_1(media)?;

        if let Some(overlay) = overlay {
            overlay.remove();
        }

        let body_classes = self.body.class_list();
        body_classes.remove_1(CLASS_OVERLAY_TRANSITIONING)?;
        if was_open {
            body_classes.remove_1(CLASS_OVERLAY_OPEN)?;
        }

        if self.media.kind().is_video() && self.media.play_policy() == PlayPolicy::Always {
            self.media.play();
        }

        Ok(())
    }
}
