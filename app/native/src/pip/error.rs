//! Error taxonomy for the picture-in-picture proxy.
//!
//! Only [`PipError::InvalidGeometry`] is ever surfaced to callers as a
//! failure of an otherwise-silent operation. `Unavailable` and
//! `AlreadyTornDown` are expected outcomes: the facade reports them from
//! `construct()` and absorbs them everywhere else.

use thiserror::Error;

/// Result type alias for picture-in-picture operations.
pub type PipResult<T> = Result<T, PipError>;

/// Errors produced by the picture-in-picture proxy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipError {
    /// The private controller does not exist on this runtime.
    #[error("picture-in-picture controller is unavailable on this system")]
    Unavailable,

    /// A rect or aspect ratio had a non-positive or non-finite dimension.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The facade was already torn down.
    #[error("picture-in-picture controller was already torn down")]
    AlreadyTornDown,
}

impl PipError {
    /// Creates an invalid geometry error with the given message.
    #[must_use]
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry(message.into())
    }

    /// Returns `true` for outcomes that reflect the environment rather than a caller bug.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::Unavailable | Self::AlreadyTornDown)
    }
}
