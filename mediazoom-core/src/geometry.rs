//! Zoom geometry: how far to scale a medium and where to move it.
//!
//! All values are CSS pixels. The media element is scaled around its own
//! centre, while its wrapper is translated so that centre lands on the centre
//! of the visible viewport.

/// Width/height pair in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// True when both sides are strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Absolute position of an element relative to the document.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PageOffset {
    pub left: f64,
    pub top: f64,
}

impl PageOffset {
    /// Sum the `(offsetLeft, offsetTop)` pairs of an element and each of its
    /// offset parents, innermost first.
    pub fn accumulate<I>(chain: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        chain
            .into_iter()
            .fold(Self::default(), |acc, (left, top)| Self {
                left: acc.left + left,
                top: acc.top + top,
            })
    }
}

/// Window metrics captured at layout time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportMetrics {
    pub inner_width: f64,
    pub inner_height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl ViewportMetrics {
    /// Area available to a zoomed medium once `offset` is taken off each axis.
    pub fn usable(&self, offset: f64) -> Size {
        Size::new(
            (self.inner_width - offset).max(0.0),
            (self.inner_height - offset).max(0.0),
        )
    }

    /// Centre of the visible viewport in document coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            self.scroll_x + self.inner_width / 2.0,
            self.scroll_y + self.inner_height / 2.0,
        )
    }
}

/// Pixel translation applied to the media wrapper.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
}

/// Media at least this wide already fills the usable viewport; zooming it
/// would not make it any bigger.
pub fn is_full_size(rendered_width: f64, inner_width: f64, offset: f64) -> bool {
    rendered_width >= inner_width - offset
}

/// Scale factor that shows `natural` as large as possible inside the usable
/// viewport without exceeding native resolution.
///
/// Returns 1.0 when either size is degenerate (nothing has been rendered yet,
/// or the asset reported zero dimensions). A viewport no larger than the
/// offset leaves nothing to fit into, so the asset is shown at native
/// resolution.
pub fn scale_factor(
    natural: Size,
    rendered_width: f64,
    viewport: &ViewportMetrics,
    offset: f64,
) -> f64 {
    if !natural.is_positive() || rendered_width <= 0.0 {
        return 1.0;
    }

    let max_scale = natural.width / rendered_width;
    let usable = viewport.usable(offset);
    if !usable.is_positive() {
        return max_scale;
    }

    if natural.width < usable.width && natural.height < usable.height {
        max_scale
    } else if natural.aspect_ratio() < usable.aspect_ratio() {
        // Taller than the viewport: fit to height
        (usable.height / natural.height) * max_scale
    } else {
        (usable.width / natural.width) * max_scale
    }
}

/// Translation moving the centre of a medium at `offset` with rendered size
/// `size` onto the centre of the viewport, rounded to whole pixels.
pub fn translation(offset: PageOffset, size: Size, viewport: &ViewportMetrics) -> Translation {
    let (center_x, center_y) = viewport.center();
    let media_x = offset.left + size.width / 2.0;
    let media_y = offset.top + size.height / 2.0;

    Translation {
        x: round_px(center_x - media_x),
        y: round_px(center_y - media_y),
    }
}

// Adding 0.0 turns -0.0 into 0.0 so the CSS text never reads "-0px".
fn round_px(value: f64) -> f64 {
    value.round() + 0.0
}

/// CSS `transform` value for the media element.
pub fn scale_transform(scale: f64) -> String {
    format!("scale({scale})")
}

/// CSS `transform` value for the wrapper. `translateZ(0)` promotes the
/// wrapper to its own compositing layer.
pub fn translate_transform(translation: Translation) -> String {
    format!(
        "translate({}px, {}px) translateZ(0)",
        translation.x, translation.y
    )
}
