//! Geometry describing where the floating window returns to.
//!
//! The replacement window and view are held through [`WeakObject`] so the
//! facade never extends their lifetimes. Every access goes through
//! [`WeakObject::upgrade`] and treats the target as possibly gone, since the
//! private controller gives no invalidation signal for them.

use std::sync::{Arc, Weak};

use serde::Serialize;

use super::error::{PipError, PipResult};

/// A non-owning reference to a host object that may be deallocated at any time.
pub trait WeakObject {
    /// The strong form produced while the target is alive.
    type Strong;

    /// Returns a strong reference if the target is still alive.
    fn upgrade(&self) -> Option<Self::Strong>;
}

impl<T: ?Sized> WeakObject for Weak<T> {
    type Strong = Arc<T>;

    fn upgrade(&self) -> Option<Arc<T>> { Self::upgrade(self) }
}

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Checks that the origin is finite and both dimensions are finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`PipError::InvalidGeometry`] describing the first offending field.
    pub fn validate(&self) -> PipResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(PipError::invalid_geometry(format!(
                "rect origin ({}, {}) is not finite",
                self.x, self.y
            )));
        }
        ensure_positive("rect width", self.width)?;
        ensure_positive("rect height", self.height)
    }
}

/// A validated width:height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AspectRatio {
    width: f64,
    height: f64,
}

impl AspectRatio {
    /// Creates an aspect ratio, rejecting non-positive or non-finite components.
    ///
    /// # Errors
    ///
    /// Returns [`PipError::InvalidGeometry`] if either component is not a
    /// finite positive number.
    pub fn new(width: f64, height: f64) -> PipResult<Self> {
        ensure_positive("aspect ratio width", width)?;
        ensure_positive("aspect ratio height", height)?;
        Ok(Self { width, height })
    }

    #[must_use]
    pub const fn width(self) -> f64 { self.width }

    #[must_use]
    pub const fn height(self) -> f64 { self.height }

    /// Returns `width / height`.
    #[must_use]
    pub fn ratio(self) -> f64 { self.width / self.height }
}

fn ensure_positive(field: &str, value: f64) -> PipResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PipError::invalid_geometry(format!("{field} must be positive, got {value}")))
    }
}

/// Where the floating window should return to when the user asks for it.
///
/// `W` is the backend's weak reference type; the facade forwards the window
/// and view only if they are still alive at the time of the call.
#[derive(Debug, Clone)]
pub struct Geometry<W> {
    pub replacement_rect: Rect,
    pub replacement_window: Option<W>,
    pub replacement_view: Option<W>,
    pub aspect_ratio: Option<AspectRatio>,
}

impl<W> Geometry<W> {
    /// Geometry with only a replacement rect.
    #[must_use]
    pub const fn new(replacement_rect: Rect) -> Self {
        Self {
            replacement_rect,
            replacement_window: None,
            replacement_view: None,
            aspect_ratio: None,
        }
    }

    #[must_use]
    pub fn with_window(mut self, window: W) -> Self {
        self.replacement_window = Some(window);
        self
    }

    #[must_use]
    pub fn with_view(mut self, view: W) -> Self {
        self.replacement_view = Some(view);
        self
    }

    #[must_use]
    pub const fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(aspect_ratio);
        self
    }

    /// Validates the replacement rect.
    ///
    /// The aspect ratio is validated on construction.
    ///
    /// # Errors
    ///
    /// Returns [`PipError::InvalidGeometry`] if the rect is invalid.
    pub fn validate(&self) -> PipResult<()> { self.replacement_rect.validate() }
}
