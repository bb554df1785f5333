//! Presentation state of the floating window.

use std::fmt;

use serde::Serialize;

/// Where the floating window is in its lifecycle.
///
/// Mutated only by facade lifecycle operations and by notifications
/// relayed through the delegate bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PresentationState {
    /// Constructed but not presented, or returned from the floating window.
    #[default]
    Idle,
    /// Presented; play state not yet reported.
    Presenting,
    /// Presented and playing.
    Playing,
    /// Presented and paused.
    Paused,
    /// Content is travelling back to its inline position.
    Returning,
    /// The floating window closed or the facade was torn down.
    Closed,
}

impl PresentationState {
    /// Returns `true` while the floating window is on screen.
    #[must_use]
    pub const fn is_presented(self) -> bool {
        matches!(self, Self::Presenting | Self::Playing | Self::Paused)
    }

    /// Returns `true` for states in which a window drag may be forwarded.
    #[must_use]
    pub const fn accepts_drag(self) -> bool { matches!(self, Self::Presenting | Self::Playing) }
}

impl fmt::Display for PresentationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Presenting => "presenting",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Returning => "returning",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}
