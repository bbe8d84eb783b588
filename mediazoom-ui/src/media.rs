//! Typed handles to the zoomable elements of a page.

use mediazoom_core::contract::{ORIGINAL_ATTR, PLAY_ATTR};
use mediazoom_core::{resolve_source, MediaKind, PlayPolicy, Size};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, HtmlElement, HtmlImageElement, HtmlVideoElement};

/// A zoomable element, tagged by kind.
#[derive(Clone, Debug)]
pub enum MediaElement {
    Image(HtmlImageElement),
    Picture(HtmlElement),
    Video(HtmlVideoElement),
}

impl MediaElement {
    /// Wrap `element` if its tag is one we know how to zoom.
    pub fn from_element(element: &Element) -> Option<Self> {
        match MediaKind::from_tag_name(&element.tag_name())? {
            MediaKind::Image => element
                .dyn_ref::<HtmlImageElement>()
                .cloned()
                .map(MediaElement::Image),
            MediaKind::Picture => element
                .dyn_ref::<HtmlElement>()
                .cloned()
                .map(MediaElement::Picture),
            MediaKind::Video => element
                .dyn_ref::<HtmlVideoElement>()
                .cloned()
                .map(MediaElement::Video),
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            MediaElement::Image(_) => MediaKind::Image,
            MediaElement::Picture(_) => MediaKind::Picture,
            MediaElement::Video(_) => MediaKind::Video,
        }
    }

    pub fn html(&self) -> &HtmlElement {
        match self {
            MediaElement::Image(img) => img.as_ref(),
            MediaElement::Picture(picture) => picture,
            MediaElement::Video(video) => video.as_ref(),
        }
    }

    pub fn element(&self) -> &Element {
        self.html().as_ref()
    }

    /// URL of the full-resolution asset: `data-zoom-original`, then the
    /// source currently in use, then `src`.
    pub fn source_url(&self) -> Option<String> {
        let original = self.element().get_attribute(ORIGINAL_ATTR);
        let (current, src) = match self {
            MediaElement::Image(img) => (Some(img.current_src()), Some(img.src())),
            MediaElement::Video(video) => (Some(video.current_src()), Some(video.src())),
            // <picture> has no source of its own; its fallback <img> does.
            MediaElement::Picture(picture) => match picture
                .query_selector("img")
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
            {
                Some(img) => (Some(img.current_src()), Some(img.src())),
                None => (None, None),
            },
        };

        resolve_source(original.as_deref(), current.as_deref(), src.as_deref())
    }

    /// Point the visible element at `url`. `<picture>` keeps its own
    /// source selection.
    pub fn set_source(&self, url: &str) {
        match self {
            MediaElement::Image(img) => img.set_src(url),
            MediaElement::Video(video) => video.set_src(url),
            MediaElement::Picture(_) => {}
        }
    }

    /// Size the element is currently laid out at.
    pub fn rendered_size(&self) -> Size {
        let html = self.html();
        let (width, height) = match self {
            MediaElement::Image(img) => (img.width(), img.height()),
            MediaElement::Video(video) => (video.width(), video.height()),
            MediaElement::Picture(_) => (0, 0),
        };

        let width = if width > 0 {
            width as f64
        } else {
            html.offset_width() as f64
        };
        let height = if height > 0 {
            height as f64
        } else {
            html.offset_height() as f64
        };

        Size::new(width, height)
    }

    pub fn play_policy(&self) -> PlayPolicy {
        PlayPolicy::from_attribute(self.element().get_attribute(PLAY_ATTR).as_deref())
    }

    /// Start playback on videos; other kinds ignore the call. A rejected play
    /// promise (autoplay blocked, source gone) is logged, not raised.
    pub fn play(&self) {
        let MediaElement::Video(video) = self else {
            return;
        };

        match video.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::debug!("Video playback was rejected: {:?}", e);
                }
            }),
            Err(e) => log::warn!("Failed to start video playback: {:?}", e),
        }
    }
}
