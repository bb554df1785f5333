//! Safe proxy for the private macOS picture-in-picture controller.
//!
//! The controller (`PIPViewController` in `PIP.framework`) is not part of
//! any public SDK and may change shape or vanish between OS releases. This
//! module lets the rest of the application program against it as if it were
//! always there:
//!
//! - [`probe`] - Capability prober; decides once per process what exists.
//! - [`PipController`] - Typed facade; every operation is callable unconditionally.
//! - [`DelegateBridge`] - Relays delegate notifications to host [`PipCallbacks`].
//!
//! # Flow
//!
//! 1. The host creates a [`PipController`] with a [`Backend`].
//! 2. The facade takes the cached [`Availability`] from the prober.
//! 3. If the class is present, `construct()` allocates it and installs a
//!    delegate for the confirmed notifications.
//! 4. Operations are forwarded only when their selectors exist; otherwise
//!    they return [`Dispatch::Skipped`].
//! 5. `teardown()` releases everything; later notifications are dropped.

mod availability;
mod backend;
mod bridge;
mod error;
mod facade;
mod geometry;
mod probe;
mod selectors;
mod state;

#[cfg(target_os = "macos")]
pub mod native;

#[cfg(test)]
mod testing;

pub use availability::Availability;
pub use backend::{Backend, ControllerHandle, Dispatch, SkipReason};
pub use bridge::{Callback, DelegateBridge, PipCallbacks};
pub use error::{PipError, PipResult};
pub use facade::{HostObject, HostWeak, PipController};
pub use geometry::{AspectRatio, Geometry, Rect, WeakObject};
#[cfg(target_os = "macos")]
pub use native::{NativeBackend, NativeController, NativeRuntime, NativeWeak};
pub use probe::{ProbeTarget, RuntimeIntrospection, probe, probe_target, probe_with};
pub use selectors::{Notification, Selector};
pub use state::PresentationState;
