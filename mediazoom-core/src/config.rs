//! Zoom configuration.
//!
//! Every field has a default, so an empty options object (or none at all)
//! yields the stock behaviour: an 80px viewport margin, 40px of scroll and
//! 10px of vertical touch movement before an open zoom is dismissed.

use serde::Deserialize;
use thiserror::Error;

/// Margin kept free around a zoomed medium, in CSS pixels.
pub const DEFAULT_OFFSET: f64 = 80.0;
/// Scroll distance since open that dismisses the zoom.
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 40.0;
/// Vertical touch movement that dismisses the zoom.
pub const DEFAULT_TOUCH_THRESHOLD: f64 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Runtime settings for a zoom service.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ZoomConfig {
    /// Margin subtracted from each viewport axis. Media already wider than
    /// `innerWidth - offset` is treated as full size and never zoomed.
    pub offset: f64,
    /// Vertical scroll distance (either direction) that closes the zoom
    pub scroll_threshold: f64,
    /// Vertical touch movement that closes the zoom
    pub touch_threshold: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            touch_threshold: DEFAULT_TOUCH_THRESHOLD,
        }
    }
}

impl ZoomConfig {
    /// Reject negative, NaN and infinite values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("offset", self.offset),
            ("scrollThreshold", self.scroll_threshold),
            ("touchThreshold", self.touch_threshold),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        Ok(())
    }
}
