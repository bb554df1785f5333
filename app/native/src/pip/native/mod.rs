//! Objective-C runtime implementations of the prober and backend seams.
//!
//! This is the only place that touches the private controller. Everything
//! above it programs against [`RuntimeIntrospection`](super::RuntimeIntrospection),
//! [`Backend`](super::Backend) and [`ControllerHandle`](super::ControllerHandle).
//!
//! # Thread Safety
//!
//! The private controller expects main-thread use. `NativeController` is
//! neither `Send` nor `Sync`, and its delegate relays notifications on the
//! thread the controller sends them from.

mod controller;
mod delegate;
mod runtime;

pub use controller::{NativeBackend, NativeController, NativeWeak};
pub use runtime::NativeRuntime;
