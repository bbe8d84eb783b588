//! Attribute and class names shared with the page markup and stylesheet.

/// Opt-in marker attribute. `zoom` arms a medium, `zoom-out` marks it as open.
pub const ZOOM_ATTR: &str = "data-zoom";
/// Optional URL of the full-resolution asset.
pub const ORIGINAL_ATTR: &str = "data-zoom-original";
/// Playback policy for videos after the zoom closes.
pub const PLAY_ATTR: &str = "data-zoom-play";

pub const CLASS_MEDIA_LOADING: &str = "zoom-media-loading";
pub const CLASS_MEDIA: &str = "zoom-media";
pub const CLASS_MEDIA_WRAP: &str = "zoom-media-wrap";
pub const CLASS_OVERLAY: &str = "zoom-overlay";
pub const CLASS_OVERLAY_OPEN: &str = "zoom-overlay-open";
pub const CLASS_OVERLAY_TRANSITIONING: &str = "zoom-overlay-transitioning";

/// Value of the `data-zoom` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomMarker {
    /// Clicking zooms in
    Zoom,
    /// Currently zoomed; clicking closes
    ZoomOut,
}

impl ZoomMarker {
    pub fn as_str(self) -> &'static str {
        match self {
            ZoomMarker::Zoom => "zoom",
            ZoomMarker::ZoomOut => "zoom-out",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "zoom" => Some(ZoomMarker::Zoom),
            "zoom-out" => Some(ZoomMarker::ZoomOut),
            _ => None,
        }
    }
}

/// Value of the `data-zoom-play` attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayPolicy {
    /// Leave playback as it is after closing
    #[default]
    Untouched,
    /// Resume playback once the zoom is disposed
    Always,
}

impl PlayPolicy {
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("always") => PlayPolicy::Always,
            _ => PlayPolicy::Untouched,
        }
    }
}
