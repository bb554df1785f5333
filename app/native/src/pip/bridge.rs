//! Delegate bridge.
//!
//! Turns the private controller's optional, loosely-typed delegate messages
//! into typed, synchronous host callbacks and mirrors them onto the
//! [`PresentationState`].
//!
//! # Transitions
//!
//! | Notification | From | To | Callback |
//! |---|---|---|---|
//! | `WillClose` | any but Closed | Closed (pending) | `on_will_close` |
//! | `DidClose` | any but final Closed | Closed | `on_did_close` |
//! | `ActionStop` | Presenting, Playing, Paused | Idle | `on_stop` |
//! | `ActionPause` | Presenting, Playing | Paused | `on_pause` |
//! | `ActionPlay` | Paused, Idle | Playing | `on_play` |
//! | `ActionReturn` | Presenting, Playing, Paused | Returning, then Idle | `on_return` |
//!
//! Anything else is ignored. `DidClose` is accepted without a preceding
//! `WillClose` because some builds never send the latter.
//!
//! # Threading
//!
//! Callbacks run synchronously on the thread the notification arrived on,
//! with no internal lock held other than a reentrant delivery gate. The gate
//! makes [`DelegateBridge::shut_down`] wait for an in-flight delivery on
//! another thread, so once it returns no callback can fire again.

use std::collections::BTreeSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};

use super::availability::Availability;
use super::selectors::Notification;
use super::state::PresentationState;

/// A host callback.
pub type Callback = Box<dyn Fn() + Send + Sync>;

/// Host-supplied handlers, each independently optional.
///
/// Owned by the host (behind an `Arc`); the bridge only keeps a `Weak`.
#[derive(Default)]
pub struct PipCallbacks {
    on_will_close: Option<Callback>,
    on_did_close: Option<Callback>,
    on_stop: Option<Callback>,
    on_pause: Option<Callback>,
    on_play: Option<Callback>,
    on_return: Option<Callback>,
}

impl PipCallbacks {
    /// An empty handler set.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn on_will_close(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_will_close = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_did_close(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_did_close = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_stop(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_stop = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_pause(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_pause = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_play(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_play = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_return(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_return = Some(Box::new(callback));
        self
    }

    /// Returns the handler registered for `notification`, if any.
    fn slot(&self, notification: Notification) -> Option<&Callback> {
        match notification {
            Notification::WillClose => self.on_will_close.as_ref(),
            Notification::DidClose => self.on_did_close.as_ref(),
            Notification::ActionStop => self.on_stop.as_ref(),
            Notification::ActionPause => self.on_pause.as_ref(),
            Notification::ActionPlay => self.on_play.as_ref(),
            Notification::ActionReturn => self.on_return.as_ref(),
        }
    }

    /// Returns `true` if the host registered a handler for `notification`.
    #[must_use]
    pub fn handles(&self, notification: Notification) -> bool { self.slot(notification).is_some() }
}

impl fmt::Debug for PipCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<_> =
            Notification::ALL.into_iter().filter(|n| self.handles(*n)).collect();
        f.debug_struct("PipCallbacks").field("registered", &registered).finish()
    }
}

#[derive(Debug, Default)]
struct BridgeState {
    state: PresentationState,
    close_pending: bool,
    callbacks: Option<Weak<PipCallbacks>>,
    shut_down: bool,
}

/// Relays delegate notifications to host callbacks.
#[derive(Debug)]
pub struct DelegateBridge {
    wired: BTreeSet<Notification>,
    delivery: ReentrantMutex<()>,
    inner: Mutex<BridgeState>,
}

impl DelegateBridge {
    /// Creates a bridge that accepts only the given notifications.
    #[must_use]
    pub fn new(wired: impl IntoIterator<Item = Notification>) -> Self {
        Self {
            wired: wired.into_iter().collect(),
            delivery: ReentrantMutex::new(()),
            inner: Mutex::new(BridgeState::default()),
        }
    }

    /// Creates a bridge wired for the notifications the prober confirmed.
    #[must_use]
    pub fn for_availability(availability: &Availability) -> Self {
        Self::new(availability.notifications().iter().copied())
    }

    /// The notifications this bridge accepts.
    #[must_use]
    pub const fn wired(&self) -> &BTreeSet<Notification> { &self.wired }

    #[must_use]
    pub fn is_wired(&self, notification: Notification) -> bool {
        self.wired.contains(&notification)
    }

    /// The current presentation state.
    #[must_use]
    pub fn state(&self) -> PresentationState { self.inner.lock().state }

    /// Returns `true` between `WillClose` and `DidClose`.
    #[must_use]
    pub fn is_close_pending(&self) -> bool { self.inner.lock().close_pending }

    /// Returns `true` once the window has fully closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        let inner = self.inner.lock();
        inner.state == PresentationState::Closed && !inner.close_pending
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool { self.inner.lock().shut_down }

    /// Registers the host's handler set, replacing any previous registration.
    pub fn register(&self, callbacks: &Arc<PipCallbacks>) {
        let mut inner = self.inner.lock();
        if inner.shut_down {
            tracing::debug!("pip: bridge: ignoring callback registration after teardown");
            return;
        }
        inner.callbacks = Some(Arc::downgrade(callbacks));
    }

    /// Drops the current registration.
    pub fn deregister(&self) { self.inner.lock().callbacks = None; }

    /// Stops all further delivery and marks the state Closed.
    ///
    /// Waits for a delivery in progress on another thread. Idempotent.
    pub fn shut_down(&self) {
        let _delivery = self.delivery.lock();
        let mut inner = self.inner.lock();
        inner.shut_down = true;
        inner.callbacks = None;
        inner.close_pending = false;
        inner.state = PresentationState::Closed;
    }

    /// Applies a facade-driven state change.
    pub(crate) fn set_state(&self, state: PresentationState) {
        let mut inner = self.inner.lock();
        if !inner.shut_down {
            inner.state = state;
        }
    }

    /// Resets a closed bridge for a freshly constructed controller.
    pub(crate) fn reopen(&self) {
        let mut inner = self.inner.lock();
        if !inner.shut_down {
            inner.state = PresentationState::Idle;
            inner.close_pending = false;
        }
    }

    /// Delivers one notification from the private controller.
    ///
    /// Returns the resulting state, or `None` if the notification was not
    /// wired, arrived after teardown, or is not valid in the current state.
    pub fn deliver(&self, notification: Notification) -> Option<PresentationState> {
        if !self.is_wired(notification) {
            tracing::trace!(%notification, "pip: bridge: notification not wired");
            return None;
        }

        let _delivery = self.delivery.lock();

        let callbacks = {
            let mut inner = self.inner.lock();
            if inner.shut_down {
                tracing::trace!(%notification, "pip: bridge: dropped after teardown");
                return None;
            }

            let Some(next) = next_state(inner.state, inner.close_pending, notification) else {
                tracing::debug!(
                    %notification,
                    state = %inner.state,
                    "pip: bridge: notification ignored in current state"
                );
                return None;
            };

            tracing::debug!(%notification, from = %inner.state, to = %next, "pip: bridge: transition");
            inner.state = next;
            inner.close_pending = notification == Notification::WillClose;
            inner.callbacks.as_ref().and_then(Weak::upgrade)
        };

        if let Some(callbacks) = callbacks {
            invoke(&callbacks, notification);
        }

        let mut inner = self.inner.lock();
        if inner.state == PresentationState::Returning && !inner.shut_down {
            inner.state = PresentationState::Idle;
        }
        Some(inner.state)
    }
}

/// Computes the state a notification leads to, or `None` if it must be ignored.
const fn next_state(
    current: PresentationState,
    close_pending: bool,
    notification: Notification,
) -> Option<PresentationState> {
    use PresentationState::{Closed, Idle, Paused, Playing, Presenting, Returning};

    match (notification, current) {
        (Notification::WillClose, Closed) => None,
        (Notification::WillClose, _) => Some(Closed),
        (Notification::DidClose, Closed) if !close_pending => None,
        (Notification::DidClose, _) => Some(Closed),
        (Notification::ActionStop, Presenting | Playing | Paused) => Some(Idle),
        (Notification::ActionPause, Presenting | Playing) => Some(Paused),
        (Notification::ActionPlay, Paused | Idle) => Some(Playing),
        (Notification::ActionReturn, Presenting | Playing | Paused) => Some(Returning),
        _ => None,
    }
}

fn invoke(callbacks: &PipCallbacks, notification: Notification) {
    let Some(callback) = callbacks.slot(notification) else {
        return;
    };

    if panic::catch_unwind(AssertUnwindSafe(|| callback())).is_err() {
        tracing::error!(%notification, "pip: bridge: host callback panicked");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use super::*;

    fn all_wired() -> DelegateBridge { DelegateBridge::new(Notification::ALL) }

    fn recording_callbacks(log: &Arc<Mutex<Vec<&'static str>>>) -> Arc<PipCallbacks> {
        let (a, b, c, d, e, f) = (
            Arc::clone(log),
            Arc::clone(log),
            Arc::clone(log),
            Arc::clone(log),
            Arc::clone(log),
            Arc::clone(log),
        );
        Arc::new(
            PipCallbacks::new()
                .on_will_close(move || a.lock().push("will_close"))
                .on_did_close(move || b.lock().push("did_close"))
                .on_stop(move || c.lock().push("stop"))
                .on_pause(move || d.lock().push("pause"))
                .on_play(move || e.lock().push("play"))
                .on_return(move || f.lock().push("return")),
        )
    }

    #[test]
    fn from_presenting_only_documented_transitions() {
        let expectations = [
            (Notification::ActionStop, Some(PresentationState::Idle)),
            (Notification::ActionPause, Some(PresentationState::Paused)),
            (Notification::ActionReturn, Some(PresentationState::Idle)),
            (Notification::WillClose, Some(PresentationState::Closed)),
            (Notification::DidClose, Some(PresentationState::Closed)),
            (Notification::ActionPlay, None),
        ];

        for (notification, expected) in expectations {
            let bridge = all_wired();
            bridge.set_state(PresentationState::Presenting);
            assert_eq!(bridge.deliver(notification), expected, "{notification}");
            if expected.is_none() {
                assert_eq!(bridge.state(), PresentationState::Presenting);
            }
        }
    }

    #[test]
    fn pause_and_play_fire_in_arrival_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let callbacks = recording_callbacks(&log);
        let bridge = all_wired();
        bridge.register(&callbacks);
        bridge.set_state(PresentationState::Playing);

        bridge.deliver(Notification::ActionPause);
        bridge.deliver(Notification::ActionPlay);
        bridge.deliver(Notification::ActionPause);

        assert_eq!(*log.lock(), vec!["pause", "play", "pause"]);
        assert_eq!(bridge.state(), PresentationState::Paused);
    }

    #[test]
    fn pause_while_paused_is_ignored() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let callbacks = recording_callbacks(&log);
        let bridge = all_wired();
        bridge.register(&callbacks);
        bridge.set_state(PresentationState::Paused);

        assert_eq!(bridge.deliver(Notification::ActionPause), None);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn return_passes_through_returning_to_idle() {
        let observed = Arc::new(Mutex::new(None));
        let bridge = Arc::new(all_wired());

        let observed_in_callback = Arc::clone(&observed);
        let bridge_in_callback = Arc::downgrade(&bridge);
        let callbacks = Arc::new(PipCallbacks::new().on_return(move || {
            if let Some(bridge) = bridge_in_callback.upgrade() {
                *observed_in_callback.lock() = Some(bridge.state());
            }
        }));
        bridge.register(&callbacks);
        bridge.set_state(PresentationState::Playing);

        assert_eq!(bridge.deliver(Notification::ActionReturn), Some(PresentationState::Idle));
        assert_eq!(*observed.lock(), Some(PresentationState::Returning));
    }

    #[test]
    fn will_close_then_did_close() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let callbacks = recording_callbacks(&log);
        let bridge = all_wired();
        bridge.register(&callbacks);
        bridge.set_state(PresentationState::Playing);

        bridge.deliver(Notification::WillClose);
        assert_eq!(bridge.state(), PresentationState::Closed);
        assert!(bridge.is_close_pending());
        assert!(!bridge.is_closed());

        bridge.deliver(Notification::DidClose);
        assert!(bridge.is_closed());
        assert_eq!(*log.lock(), vec!["will_close", "did_close"]);

        assert_eq!(bridge.deliver(Notification::DidClose), None);
        assert_eq!(bridge.deliver(Notification::WillClose), None);
        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn did_close_alone_reaches_closed() {
        let bridge = DelegateBridge::new([Notification::DidClose, Notification::ActionStop]);
        bridge.set_state(PresentationState::Presenting);

        assert_eq!(bridge.deliver(Notification::WillClose), None);
        assert_eq!(bridge.state(), PresentationState::Presenting);

        assert_eq!(bridge.deliver(Notification::DidClose), Some(PresentationState::Closed));
        assert!(bridge.is_closed());
    }

    #[test]
    fn unwired_notifications_are_dropped() {
        let bridge = DelegateBridge::new([Notification::ActionStop]);
        bridge.set_state(PresentationState::Playing);
        assert_eq!(bridge.deliver(Notification::ActionPause), None);
        assert_eq!(bridge.state(), PresentationState::Playing);
    }

    #[test]
    fn partial_host_handlers_are_tolerated() {
        let stops = Arc::new(AtomicUsize::new(0));
        let stops_in_callback = Arc::clone(&stops);
        let callbacks = Arc::new(PipCallbacks::new().on_stop(move || {
            stops_in_callback.fetch_add(1, Ordering::SeqCst);
        }));

        let bridge = all_wired();
        bridge.register(&callbacks);
        bridge.set_state(PresentationState::Playing);

        assert_eq!(bridge.deliver(Notification::ActionPause), Some(PresentationState::Paused));
        assert_eq!(bridge.deliver(Notification::ActionStop), Some(PresentationState::Idle));
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_callbacks_after_shut_down() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let callbacks = recording_callbacks(&log);
        let bridge = all_wired();
        bridge.register(&callbacks);
        bridge.set_state(PresentationState::Playing);

        bridge.shut_down();
        bridge.shut_down();

        for notification in Notification::ALL {
            assert_eq!(bridge.deliver(notification), None);
        }
        assert!(log.lock().is_empty());
        assert_eq!(bridge.state(), PresentationState::Closed);

        bridge.register(&callbacks);
        bridge.deliver(Notification::ActionStop);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn registration_is_weak() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let callbacks = recording_callbacks(&log);
        let bridge = all_wired();
        bridge.register(&callbacks);
        drop(callbacks);

        bridge.set_state(PresentationState::Playing);
        assert_eq!(bridge.deliver(Notification::ActionPause), Some(PresentationState::Paused));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn panicking_callback_is_contained() {
        let callbacks = Arc::new(PipCallbacks::new().on_stop(|| panic!("host bug")));
        let bridge = all_wired();
        bridge.register(&callbacks);
        bridge.set_state(PresentationState::Presenting);

        assert_eq!(bridge.deliver(Notification::ActionStop), Some(PresentationState::Idle));
    }

    #[test]
    fn callback_may_shut_down_reentrantly() {
        let bridge = Arc::new(all_wired());
        let weak = Arc::downgrade(&bridge);
        let callbacks = Arc::new(PipCallbacks::new().on_return(move || {
            if let Some(bridge) = weak.upgrade() {
                bridge.shut_down();
            }
        }));
        bridge.register(&callbacks);
        bridge.set_state(PresentationState::Presenting);

        assert_eq!(bridge.deliver(Notification::ActionReturn), Some(PresentationState::Closed));
        assert!(bridge.is_shut_down());
    }

    #[test]
    fn reopen_resets_closed_bridge() {
        let bridge = all_wired();
        bridge.deliver(Notification::DidClose);
        assert!(bridge.is_closed());

        bridge.reopen();
        assert_eq!(bridge.state(), PresentationState::Idle);
    }

    #[test]
    fn callbacks_debug_lists_registered_slots() {
        let callbacks = PipCallbacks::new().on_play(|| {}).on_stop(|| {});
        let debug = format!("{callbacks:?}");
        assert!(debug.contains("ActionStop"));
        assert!(debug.contains("ActionPlay"));
        assert!(!debug.contains("ActionPause"));
    }

    #[test]
    fn shut_down_waits_for_in_flight_delivery() {
        let bridge = Arc::new(all_wired());
        bridge.set_state(PresentationState::Playing);

        let fired = Arc::new(AtomicUsize::new(0));
        let (entered_tx, entered_rx) = mpsc::channel();
        let (resume_tx, resume_rx) = mpsc::channel::<()>();

        let on_pause = Arc::clone(&fired);
        let on_play = Arc::clone(&fired);
        let callbacks = Arc::new(
            PipCallbacks::new()
                .on_pause(move || {
                    let _ = entered_tx.send(());
                    thread::sleep(Duration::from_millis(100));
                    on_pause.fetch_add(1, Ordering::SeqCst);
                })
                .on_play(move || {
                    on_play.fetch_add(1, Ordering::SeqCst);
                }),
        );
        bridge.register(&callbacks);

        let worker = {
            let bridge = Arc::clone(&bridge);
            thread::spawn(move || {
                let paused = bridge.deliver(Notification::ActionPause);
                resume_rx.recv().unwrap();
                let late = bridge.deliver(Notification::ActionPlay);
                (paused, late)
            })
        };

        entered_rx.recv().unwrap();
        bridge.shut_down();
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        resume_tx.send(()).unwrap();
        let (paused, late) = worker.join().unwrap();
        assert_eq!(paused, Some(PresentationState::Paused));
        assert_eq!(late, None);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(bridge.state(), PresentationState::Closed);
    }
}
