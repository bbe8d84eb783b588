//! Gesture thresholds that dismiss an open zoom.

/// Tracks vertical scrolling since the zoom opened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollDismiss {
    initial_y: f64,
    threshold: f64,
}

impl ScrollDismiss {
    pub fn new(initial_y: f64, threshold: f64) -> Self {
        Self {
            initial_y,
            threshold,
        }
    }

    pub fn initial_y(&self) -> f64 {
        self.initial_y
    }

    /// True once the page has scrolled more than the threshold in either
    /// direction from where it was at open time.
    pub fn should_dismiss(&self, scroll_y: f64) -> bool {
        (self.initial_y - scroll_y).abs() > self.threshold
    }
}

/// Tracks a single touch from `touchstart` through its `touchmove` events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchDismiss {
    start_y: f64,
    threshold: f64,
}

impl TouchDismiss {
    pub fn new(start_y: f64, threshold: f64) -> Self {
        Self { start_y, threshold }
    }

    pub fn start_y(&self) -> f64 {
        self.start_y
    }

    pub fn should_dismiss(&self, page_y: f64) -> bool {
        (page_y - self.start_y).abs() > self.threshold
    }
}

/// Keys that close an open zoom. Older engines report `"Esc"`.
pub fn is_dismiss_key(key: &str) -> bool {
    matches!(key, "Escape" | "Esc")
}
