pub mod config;
pub mod contract;
pub mod dismiss;
pub mod geometry;
pub mod media;
pub mod phase;

pub use config::{ConfigError, ZoomConfig};
pub use contract::{PlayPolicy, ZoomMarker};
pub use dismiss::{is_dismiss_key, ScrollDismiss, TouchDismiss};
pub use geometry::{
    is_full_size, scale_factor, scale_transform, translate_transform, translation, PageOffset,
    Size, Translation, ViewportMetrics,
};
pub use media::{resolve_source, LoadStrategy, MediaKind};
pub use phase::SessionPhase;
