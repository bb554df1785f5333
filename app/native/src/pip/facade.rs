//! Typed facade over the private picture-in-picture controller.
//!
//! Every method is safe to call unconditionally. Availability, teardown and
//! presentation-state checks all happen here, so host code never branches on
//! whether the feature exists.
//!
//! ```rust,ignore
//! use float_lib::pip::{NativeBackend, PipCallbacks, PipController};
//!
//! let mut pip = PipController::new(NativeBackend::from_config());
//! let callbacks = Arc::new(PipCallbacks::new().on_did_close(|| println!("closed")));
//! pip.set_callbacks(&callbacks);
//!
//! if pip.construct().is_ok() {
//!     pip.set_aspect_ratio(16.0, 9.0)?;
//!     pip.present_as_picture_in_picture(view_controller);
//! }
//! ```

use std::sync::Arc;

use super::availability::Availability;
use super::backend::{Backend, ControllerHandle, Dispatch, SkipReason};
use super::bridge::{DelegateBridge, PipCallbacks};
use super::error::{PipError, PipResult};
use super::geometry::{AspectRatio, Geometry, WeakObject};
use super::probe::probe;
use super::selectors::Selector;
use super::state::PresentationState;

/// Host object type accepted by a backend's controllers.
pub type HostObject<B> = <<B as Backend>::Handle as ControllerHandle>::Object;

/// Weak host reference type used in a backend's [`Geometry`].
pub type HostWeak<B> = <<B as Backend>::Handle as ControllerHandle>::WeakObject;

/// Typed, always-callable proxy for the private controller.
///
/// Single-owner: confine it to one thread (normally the main thread).
/// Notifications may still arrive from the controller on any thread; they
/// are handled by the shared [`DelegateBridge`].
pub struct PipController<B: Backend> {
    backend: B,
    availability: Availability,
    handle: Option<B::Handle>,
    bridge: Arc<DelegateBridge>,
    torn_down: bool,
}

impl<B: Backend> PipController<B> {
    /// Creates a facade using the process-wide probe result.
    #[must_use]
    pub fn new(backend: B) -> Self { Self::with_availability(backend, probe().clone()) }

    /// Creates a facade with an explicit availability fact.
    #[must_use]
    pub fn with_availability(backend: B, availability: Availability) -> Self {
        let bridge = Arc::new(DelegateBridge::for_availability(&availability));
        Self {
            backend,
            availability,
            handle: None,
            bridge,
            torn_down: false,
        }
    }

    /// The availability fact this facade was created with.
    #[must_use]
    pub const fn availability(&self) -> &Availability { &self.availability }

    /// The current presentation state.
    #[must_use]
    pub fn state(&self) -> PresentationState { self.bridge.state() }

    /// Returns `true` while a live controller is held and its window is open.
    ///
    /// Once the window has fully closed this is `false`, although the handle
    /// itself is only released on the next `&mut self` call. The private
    /// controller is never deallocated from inside its own delegate method.
    #[must_use]
    pub fn is_constructed(&self) -> bool { self.handle.is_some() && !self.bridge.is_closed() }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool { self.torn_down }

    /// The bridge notifications are relayed through.
    #[must_use]
    pub const fn bridge(&self) -> &Arc<DelegateBridge> { &self.bridge }

    /// Registers the host's callbacks, replacing any previous set.
    ///
    /// Only a weak reference is kept; the host owns `callbacks`.
    pub fn set_callbacks(&mut self, callbacks: &Arc<PipCallbacks>) {
        self.bridge.register(callbacks);
    }

    /// Drops the callback registration.
    pub fn clear_callbacks(&mut self) { self.bridge.deregister(); }

    /// Allocates the live controller and wires its delegate.
    ///
    /// Idempotent while a controller is held.
    ///
    /// # Errors
    ///
    /// - [`PipError::AlreadyTornDown`] after [`teardown`](Self::teardown).
    /// - [`PipError::Unavailable`] if the controller cannot be constructed on this runtime.
    pub fn construct(&mut self) -> PipResult<()> {
        if self.torn_down {
            return Err(PipError::AlreadyTornDown);
        }

        self.release_closed_handle();
        if self.handle.is_some() {
            return Ok(());
        }

        if !self.availability.can_construct() {
            tracing::debug!("pip: controller unavailable, construct skipped");
            return Err(PipError::Unavailable);
        }

        let Some(mut handle) = self.backend.construct(&self.availability) else {
            tracing::warn!("pip: runtime returned no controller instance");
            return Err(PipError::Unavailable);
        };

        if self.availability.supports(Selector::SetDelegate) && !self.bridge.wired().is_empty() {
            handle.attach_delegate(&self.bridge);
        }

        self.bridge.reopen();
        self.handle = Some(handle);
        tracing::debug!("pip: controller constructed");
        Ok(())
    }

    /// Presents `controller` in the floating window.
    ///
    /// Forwarded only from Idle; moves the state to Presenting.
    pub fn present_as_picture_in_picture(&mut self, controller: &HostObject<B>) -> Dispatch {
        let outcome = self.forward(Selector::PresentAsPictureInPicture, |handle, state| {
            if state != PresentationState::Idle {
                return Err(SkipReason::InvalidState(state));
            }
            handle.present(controller);
            Ok(Some(PresentationState::Presenting))
        });
        log_skip("present", outcome)
    }

    /// Forwards a mouse-drag event so the floating window follows it.
    ///
    /// Forwarded only while Presenting or Playing.
    pub fn perform_window_drag(&mut self, event: &HostObject<B>) -> Dispatch {
        let outcome = self.forward(Selector::PerformWindowDrag, |handle, state| {
            if !state.accepts_drag() {
                return Err(SkipReason::InvalidState(state));
            }
            handle.perform_window_drag(event);
            Ok(None)
        });
        log_skip("perform_window_drag", outcome)
    }

    /// Sets the play state shown by the floating window.
    ///
    /// Forwarded only while the window is presented.
    pub fn set_playing(&mut self, playing: bool) -> Dispatch {
        let outcome = self.forward(Selector::SetPlaying, |handle, state| {
            if !state.is_presented() {
                return Err(SkipReason::InvalidState(state));
            }
            handle.set_playing(playing);
            Ok(Some(if playing { PresentationState::Playing } else { PresentationState::Paused }))
        });
        log_skip("set_playing", outcome)
    }

    /// Returns whether the floating window is playing.
    ///
    /// Always `false` without a live, presented controller. Reads the live
    /// controller when it implements `-playing`, otherwise the mirrored state.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        if self.torn_down {
            return false;
        }
        let Some(handle) = self.handle.as_ref() else {
            return false;
        };

        let state = self.bridge.state();
        if !state.is_presented() {
            return false;
        }

        if self.availability.supports(Selector::Playing) {
            handle.is_playing()
        } else {
            state == PresentationState::Playing
        }
    }

    /// Sets the title of the floating window.
    pub fn set_name(&mut self, name: &str) -> Dispatch {
        let outcome = self.forward(Selector::SetName, |handle, _| {
            handle.set_name(name);
            Ok(None)
        });
        log_skip("set_name", outcome)
    }

    /// Sets the aspect ratio the floating window keeps while resizing.
    ///
    /// # Errors
    ///
    /// Returns [`PipError::InvalidGeometry`] for non-positive or non-finite
    /// components, whether or not the controller is available.
    pub fn set_aspect_ratio(&mut self, width: f64, height: f64) -> PipResult<Dispatch> {
        let aspect_ratio = AspectRatio::new(width, height)?;
        let outcome = self.forward(Selector::SetAspectRatio, |handle, _| {
            handle.set_aspect_ratio(aspect_ratio);
            Ok(None)
        });
        Ok(log_skip("set_aspect_ratio", outcome))
    }

    /// Sets where the floating window returns to.
    ///
    /// Each part is forwarded independently when its selector is supported.
    /// A replacement window or view that has already been deallocated is
    /// skipped; if nothing could be forwarded the outcome says why.
    ///
    /// # Errors
    ///
    /// Returns [`PipError::InvalidGeometry`] if the replacement rect is
    /// invalid, whether or not the controller is available.
    pub fn set_replacement_geometry(
        &mut self,
        geometry: &Geometry<HostWeak<B>>,
    ) -> PipResult<Dispatch> {
        geometry.validate()?;

        if let Err(reason) = self.gate(None) {
            return Ok(log_skip("set_replacement_geometry", Dispatch::Skipped(reason)));
        }
        let availability = &self.availability;
        let Some(handle) = self.handle.as_mut() else {
            return Ok(log_skip("set_replacement_geometry", SkipReason::NoHandle.into()));
        };

        let mut forwarded = false;
        let mut skipped = None;

        if availability.supports(Selector::SetReplacementRect) {
            handle.set_replacement_rect(geometry.replacement_rect);
            forwarded = true;
        } else {
            skipped = Some(SkipReason::Unsupported(Selector::SetReplacementRect));
        }

        if let Some(window) = &geometry.replacement_window {
            match forward_weak(availability, Selector::SetReplacementWindow, window) {
                Ok(strong) => {
                    handle.set_replacement_window(&strong);
                    forwarded = true;
                }
                Err(reason) => skipped = Some(reason),
            }
        }

        if let Some(view) = &geometry.replacement_view {
            match forward_weak(availability, Selector::SetReplacementView, view) {
                Ok(strong) => {
                    handle.set_replacement_view(&strong);
                    forwarded = true;
                }
                Err(reason) => skipped = Some(reason),
            }
        }

        if let Some(aspect_ratio) = geometry.aspect_ratio {
            if availability.supports(Selector::SetAspectRatio) {
                handle.set_aspect_ratio(aspect_ratio);
                forwarded = true;
            } else {
                skipped = Some(SkipReason::Unsupported(Selector::SetAspectRatio));
            }
        }

        let outcome = match (forwarded, skipped) {
            (true, _) => Dispatch::Forwarded,
            (false, Some(reason)) => Dispatch::Skipped(reason),
            (false, None) => Dispatch::Skipped(SkipReason::Unsupported(Selector::SetReplacementRect)),
        };
        Ok(log_skip("set_replacement_geometry", outcome))
    }

    /// Releases the controller, deregisters the delegate and moves to Closed.
    ///
    /// Idempotent. No host callback fires after this returns.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.bridge.shut_down();
        if let Some(mut handle) = self.handle.take() {
            handle.detach_delegate();
            drop(handle);
            tracing::debug!("pip: controller released");
        }
    }

    /// Releases the handle once the private side has fully closed the window.
    fn release_closed_handle(&mut self) {
        if self.handle.is_some() && self.bridge.is_closed() {
            if let Some(mut handle) = self.handle.take() {
                handle.detach_delegate();
            }
            tracing::debug!("pip: window closed, controller released");
        }
    }

    /// Checks everything except handle presence and presentation state.
    fn gate(&mut self, selector: Option<Selector>) -> Result<(), SkipReason> {
        if self.torn_down {
            return Err(SkipReason::TornDown);
        }
        if !self.availability.is_present() {
            return Err(SkipReason::Unavailable);
        }
        self.release_closed_handle();
        if let Some(selector) = selector
            && !self.availability.supports(selector)
        {
            return Err(SkipReason::Unsupported(selector));
        }
        Ok(())
    }

    /// Runs `op` against the live handle once all gates pass.
    ///
    /// `op` returns the state to move to, if any.
    fn forward<F>(&mut self, selector: Selector, op: F) -> Dispatch
    where F: FnOnce(&mut B::Handle, PresentationState) -> Result<Option<PresentationState>, SkipReason> {
        if let Err(reason) = self.gate(Some(selector)) {
            return reason.into();
        }
        let Some(handle) = self.handle.as_mut() else {
            return SkipReason::NoHandle.into();
        };

        match op(handle, self.bridge.state()) {
            Ok(next) => {
                if let Some(next) = next {
                    self.bridge.set_state(next);
                }
                Dispatch::Forwarded
            }
            Err(reason) => reason.into(),
        }
    }
}

impl<B: Backend> Drop for PipController<B> {
    fn drop(&mut self) { self.teardown(); }
}

fn forward_weak<W: WeakObject>(
    availability: &Availability,
    selector: Selector,
    target: &W,
) -> Result<W::Strong, SkipReason> {
    if !availability.supports(selector) {
        return Err(SkipReason::Unsupported(selector));
    }
    target.upgrade().ok_or_else(|| {
        tracing::debug!(%selector, "pip: replacement target deallocated, skipping");
        SkipReason::StaleReference
    })
}

fn log_skip(operation: &'static str, outcome: Dispatch) -> Dispatch {
    if let Dispatch::Skipped(reason) = outcome {
        tracing::debug!(operation, %reason, "pip: operation skipped");
    }
    outcome
}
