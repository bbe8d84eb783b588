//! Zoomable media kinds and full-resolution source selection.

/// Element kinds that can be zoomed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Picture,
    Video,
}

/// How the natural size of a medium is discovered before layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Off-DOM `<img>`, natural size read on `load`
    Image,
    /// Off-DOM `<video>` with a `<source>` child, size read on `canplay`
    Video,
}

impl MediaKind {
    /// Classify a DOM tag name. Matching ignores case so XHTML documents,
    /// which report lowercase tag names, behave like HTML ones.
    pub fn from_tag_name(tag: &str) -> Option<Self> {
        if tag.eq_ignore_ascii_case("img") {
            Some(MediaKind::Image)
        } else if tag.eq_ignore_ascii_case("picture") {
            Some(MediaKind::Picture)
        } else if tag.eq_ignore_ascii_case("video") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn load_strategy(self) -> LoadStrategy {
        match self {
            MediaKind::Image | MediaKind::Picture => LoadStrategy::Image,
            MediaKind::Video => LoadStrategy::Video,
        }
    }

    pub fn is_video(self) -> bool {
        matches!(self, MediaKind::Video)
    }
}

/// Pick the URL of the full-resolution asset.
///
/// Preference order: explicit override, the source currently playing, the
/// plain `src`. Empty strings count as absent.
pub fn resolve_source(
    original: Option<&str>,
    current: Option<&str>,
    src: Option<&str>,
) -> Option<String> {
    [original, current, src]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
        .map(str::to_owned)
}
