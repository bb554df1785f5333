//! In-process fakes for the runtime and the private controller.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;

use super::availability::Availability;
use super::backend::{Backend, ControllerHandle};
use super::bridge::DelegateBridge;
use super::geometry::{AspectRatio, Rect};
use super::probe::RuntimeIntrospection;
use super::selectors::{Notification, Selector};
use super::state::PresentationState;

/// A runtime whose class, selectors and protocol are configured per test.
#[derive(Debug)]
pub struct FakeRuntime {
    class_registered: bool,
    requires_load: bool,
    loaded: Cell<bool>,
    selectors: BTreeSet<&'static str>,
    protocol_registered: bool,
    declared: BTreeSet<&'static str>,
    lookups: Cell<usize>,
    loads: Cell<usize>,
}

impl FakeRuntime {
    /// Class, every selector and the full delegate protocol are present.
    pub fn complete() -> Self {
        Self {
            class_registered: true,
            requires_load: false,
            loaded: Cell::new(false),
            selectors: Selector::ALL.iter().map(|s| s.name()).collect(),
            protocol_registered: true,
            declared: Notification::ALL.iter().map(|n| n.selector_name()).collect(),
            lookups: Cell::new(0),
            loads: Cell::new(0),
        }
    }

    /// Nothing is present and the framework cannot be loaded.
    pub fn empty() -> Self {
        Self {
            class_registered: false,
            selectors: BTreeSet::new(),
            protocol_registered: false,
            declared: BTreeSet::new(),
            ..Self::complete()
        }
    }

    /// The class only appears after the framework bundle is loaded.
    pub fn requiring_framework_load(mut self) -> Self {
        self.requires_load = true;
        self
    }

    pub fn without_selector(mut self, selector: Selector) -> Self {
        self.selectors.remove(selector.name());
        self
    }

    pub fn without_notification(mut self, notification: Notification) -> Self {
        self.declared.remove(notification.selector_name());
        self
    }

    pub fn without_protocol(mut self) -> Self {
        self.protocol_registered = false;
        self
    }

    /// Number of class, selector and protocol lookups performed.
    pub fn lookups(&self) -> usize { self.lookups.get() }

    pub fn framework_loads(&self) -> usize { self.loads.get() }

    fn count(&self) { self.lookups.set(self.lookups.get() + 1); }
}

impl RuntimeIntrospection for FakeRuntime {
    fn load_framework(&self, _path: &str) -> bool {
        self.loads.set(self.loads.get() + 1);
        if self.class_registered {
            self.loaded.set(true);
        }
        self.class_registered
    }

    fn class_exists(&self, _class_name: &str) -> bool {
        self.count();
        self.class_registered && (!self.requires_load || self.loaded.get())
    }

    fn instances_respond_to(&self, _class_name: &str, selector: &str) -> bool {
        self.count();
        self.selectors.contains(selector)
    }

    fn protocol_exists(&self, _protocol: &str) -> bool {
        self.count();
        self.protocol_registered
    }

    fn protocol_declares(&self, _protocol: &str, selector: &str) -> bool {
        self.count();
        self.declared.contains(selector)
    }
}

/// Stand-in for a host `NSViewController`, `NSWindow`, `NSView` or `NSEvent`.
#[derive(Debug, PartialEq, Eq)]
pub struct FakeObject(pub u32);

/// A message received by the fake controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Present(u32),
    WindowDrag(u32),
    SetPlaying(bool),
    SetName(String),
    SetAspectRatio(AspectRatio),
    SetReplacementRect(Rect),
    SetReplacementWindow(u32),
    SetReplacementView(u32),
    AttachDelegate,
    DetachDelegate,
    Released,
}

#[derive(Debug, Default)]
struct Shared {
    calls: Vec<Call>,
    delegate: Option<Arc<DelegateBridge>>,
    refuse_construct: bool,
    constructed: usize,
}

/// Observes and drives the fake controller from a test.
#[derive(Debug, Clone, Default)]
pub struct FakeEnvironment {
    shared: Arc<Mutex<Shared>>,
}

impl FakeEnvironment {
    pub fn new() -> Self { Self::default() }

    pub fn backend(&self) -> FakeBackend {
        FakeBackend {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Messages received so far, in order.
    pub fn calls(&self) -> Vec<Call> { self.shared.lock().calls.clone() }

    pub fn constructed(&self) -> usize { self.shared.lock().constructed }

    pub fn has_delegate(&self) -> bool { self.shared.lock().delegate.is_some() }

    /// Makes the next construction return no instance.
    pub fn refuse_construct(&self) { self.shared.lock().refuse_construct = true; }

    /// Sends a delegate notification the way the private controller would.
    ///
    /// Returns `None` when no delegate is attached.
    pub fn emit(&self, notification: Notification) -> Option<PresentationState> {
        let delegate = self.shared.lock().delegate.clone()?;
        delegate.deliver(notification)
    }
}

#[derive(Debug)]
pub struct FakeBackend {
    shared: Arc<Mutex<Shared>>,
}

impl Backend for FakeBackend {
    type Handle = FakeController;

    fn construct(&mut self, _availability: &Availability) -> Option<FakeController> {
        let mut shared = self.shared.lock();
        if shared.refuse_construct {
            return None;
        }
        shared.constructed += 1;
        Some(FakeController {
            shared: Arc::clone(&self.shared),
            playing: false,
        })
    }
}

#[derive(Debug)]
pub struct FakeController {
    shared: Arc<Mutex<Shared>>,
    playing: bool,
}

impl FakeController {
    fn record(&self, call: Call) { self.shared.lock().calls.push(call); }
}

impl ControllerHandle for FakeController {
    type Object = FakeObject;
    type WeakObject = std::sync::Weak<FakeObject>;

    fn present(&mut self, controller: &FakeObject) { self.record(Call::Present(controller.0)); }

    fn perform_window_drag(&mut self, event: &FakeObject) { self.record(Call::WindowDrag(event.0)); }

    fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        self.record(Call::SetPlaying(playing));
    }

    fn is_playing(&self) -> bool { self.playing }

    fn set_name(&mut self, name: &str) { self.record(Call::SetName(name.to_string())); }

    fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        self.record(Call::SetAspectRatio(aspect_ratio));
    }

    fn set_replacement_rect(&mut self, rect: Rect) { self.record(Call::SetReplacementRect(rect)); }

    fn set_replacement_window(&mut self, window: &Arc<FakeObject>) {
        self.record(Call::SetReplacementWindow(window.0));
    }

    fn set_replacement_view(&mut self, view: &Arc<FakeObject>) {
        self.record(Call::SetReplacementView(view.0));
    }

    fn attach_delegate(&mut self, bridge: &Arc<DelegateBridge>) {
        let mut shared = self.shared.lock();
        shared.delegate = Some(Arc::clone(bridge));
        shared.calls.push(Call::AttachDelegate);
    }

    fn detach_delegate(&mut self) {
        let mut shared = self.shared.lock();
        shared.delegate = None;
        shared.calls.push(Call::DetachDelegate);
    }
}

impl Drop for FakeController {
    fn drop(&mut self) { self.record(Call::Released); }
}
