//! Seam between the facade and the live private controller.
//!
//! [`Backend`] allocates controllers; [`ControllerHandle`] is one live
//! controller. The facade guarantees that a handle method is only called
//! when the corresponding [`Selector`](super::Selector) was confirmed by the
//! prober, so implementations may send messages without re-checking.

use std::fmt;
use std::sync::Arc;

use super::availability::Availability;
use super::bridge::DelegateBridge;
use super::geometry::{AspectRatio, Rect, WeakObject};
use super::selectors::Selector;
use super::state::PresentationState;

/// Operations forwarded to one live private controller.
///
/// Dropping the handle releases the controller.
pub trait ControllerHandle {
    /// Host object type passed by reference (view controllers, events).
    type Object: ?Sized;

    /// Non-owning reference to a host window or view.
    type WeakObject: WeakObject;

    /// `-presentViewControllerAsPictureInPicture:`
    fn present(&mut self, controller: &Self::Object);

    /// `-performWindowDragWithEvent:`
    fn perform_window_drag(&mut self, event: &Self::Object);

    /// `-setPlaying:`
    fn set_playing(&mut self, playing: bool);

    /// `-playing`
    fn is_playing(&self) -> bool;

    /// `-setName:`
    fn set_name(&mut self, name: &str);

    /// `-setAspectRatio:`
    fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio);

    /// `-setReplacementRect:`
    fn set_replacement_rect(&mut self, rect: Rect);

    /// `-setReplacementWindow:`
    fn set_replacement_window(&mut self, window: &<Self::WeakObject as WeakObject>::Strong);

    /// `-setReplacementView:`
    fn set_replacement_view(&mut self, view: &<Self::WeakObject as WeakObject>::Strong);

    /// Installs a delegate that relays notifications into `bridge`.
    ///
    /// Replaces any previously attached delegate.
    fn attach_delegate(&mut self, bridge: &Arc<DelegateBridge>);

    /// Removes the delegate so no further notifications reach the bridge.
    fn detach_delegate(&mut self);
}

/// Allocates live controllers.
pub trait Backend {
    /// The live controller type.
    type Handle: ControllerHandle;

    /// Allocates and initializes a controller.
    ///
    /// Only called when `availability.can_construct()` holds. Returns `None`
    /// if the runtime refused to produce an instance.
    fn construct(&mut self, availability: &Availability) -> Option<Self::Handle>;
}

/// Why a silent facade operation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The private controller does not exist on this runtime.
    Unavailable,
    /// The facade was torn down.
    TornDown,
    /// No controller has been constructed (or the window closed and released it).
    NoHandle,
    /// The controller lacks the selector this operation needs.
    Unsupported(Selector),
    /// The operation is not valid in the current presentation state.
    InvalidState(PresentationState),
    /// Every host object the operation targeted has been deallocated.
    StaleReference,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "controller unavailable"),
            Self::TornDown => write!(f, "already torn down"),
            Self::NoHandle => write!(f, "no controller constructed"),
            Self::Unsupported(selector) => write!(f, "selector {selector} not supported"),
            Self::InvalidState(state) => write!(f, "not valid while {state}"),
            Self::StaleReference => write!(f, "target object was deallocated"),
        }
    }
}

/// Outcome of a facade operation that never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The call reached the live controller.
    Forwarded,
    /// The call was absorbed.
    Skipped(SkipReason),
}

impl Dispatch {
    /// Returns `true` if the call reached the live controller.
    #[must_use]
    pub const fn is_forwarded(self) -> bool { matches!(self, Self::Forwarded) }

    /// Returns the skip reason, if any.
    #[must_use]
    pub const fn skip_reason(self) -> Option<SkipReason> {
        if let Self::Skipped(reason) = self { Some(reason) } else { None }
    }
}

impl From<SkipReason> for Dispatch {
    fn from(reason: SkipReason) -> Self { Self::Skipped(reason) }
}
