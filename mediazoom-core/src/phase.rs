//! Lifecycle of a single zoom session.

/// Where a zoom session is in its open/close cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the full-resolution asset
    #[default]
    Loading,
    /// Wrapper and overlay are in the DOM, transforms applied
    Open,
    /// Transforms cleared, waiting for the transition to end
    Closing,
    /// DOM restored; terminal
    Disposed,
}

impl SessionPhase {
    /// Whether a load/canplay callback may still lay the session out.
    pub fn accepts_layout(self) -> bool {
        self == SessionPhase::Loading
    }

    /// Whether the session still holds the body's `zoom-overlay-open` class.
    /// A closing session hands it back in `close`, after which a newer
    /// session may own it.
    pub fn holds_overlay_class(self) -> bool {
        self == SessionPhase::Open
    }

    pub fn is_disposed(self) -> bool {
        self == SessionPhase::Disposed
    }

    /// Phase reached by an animated close. Sessions that never opened skip
    /// straight to disposal.
    pub fn on_close(self) -> Self {
        match self {
            SessionPhase::Open => SessionPhase::Closing,
            SessionPhase::Closing => SessionPhase::Closing,
            SessionPhase::Loading | SessionPhase::Disposed => SessionPhase::Disposed,
        }
    }
}
