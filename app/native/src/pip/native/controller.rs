//! Live private controller handle.

use std::fmt;
use std::ptr;
use std::sync::Arc;

use objc::rc::{StrongPtr, WeakPtr, autoreleasepool};
use objc::runtime::{BOOL, Class, NO, Object, YES};
use objc::{msg_send, sel, sel_impl};

use super::delegate::DelegateRelay;
use crate::config;
use crate::pip::availability::Availability;
use crate::pip::backend::{Backend, ControllerHandle};
use crate::pip::bridge::DelegateBridge;
use crate::pip::geometry::{AspectRatio, Rect, WeakObject};
use crate::utils::objc::nsstring;

/// `NSPoint`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
struct NSPoint {
    x: f64,
    y: f64,
}

/// `NSSize`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
struct NSSize {
    width: f64,
    height: f64,
}

/// `NSRect`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
struct NSRect {
    origin: NSPoint,
    size: NSSize,
}

impl From<Rect> for NSRect {
    fn from(rect: Rect) -> Self {
        Self {
            origin: NSPoint { x: rect.x, y: rect.y },
            size: NSSize { width: rect.width, height: rect.height },
        }
    }
}

/// A zeroing weak reference to a host `NSWindow` or `NSView`.
pub struct NativeWeak(WeakPtr);

impl NativeWeak {
    /// Creates a weak reference to `object`.
    ///
    /// # Safety
    ///
    /// `object` must be null or a valid Objective-C object pointer.
    #[must_use]
    pub unsafe fn new(object: *mut Object) -> Self { Self(unsafe { WeakPtr::new(object) }) }
}

impl WeakObject for NativeWeak {
    type Strong = StrongPtr;

    fn upgrade(&self) -> Option<StrongPtr> {
        let strong = self.0.load();
        if strong.is_null() { None } else { Some(strong) }
    }
}

impl fmt::Debug for NativeWeak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeWeak").field(&self.upgrade().is_some()).finish()
    }
}

/// Allocates controllers of the configured private class.
#[derive(Debug, Clone)]
pub struct NativeBackend {
    class_name: String,
}

impl NativeBackend {
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self { Self { class_name: class_name.into() } }

    /// Uses the class name from the loaded configuration.
    #[must_use]
    pub fn from_config() -> Self { Self::new(config::get_config().pip.class_name.clone()) }
}

impl Backend for NativeBackend {
    type Handle = NativeController;

    fn construct(&mut self, _availability: &Availability) -> Option<NativeController> {
        let class = Class::get(&self.class_name)?;

        // SAFETY: `+alloc` and `-init` were confirmed on this class by the prober.
        let controller = unsafe {
            let allocated: *mut Object = msg_send![class, alloc];
            if allocated.is_null() {
                return None;
            }
            let initialized: *mut Object = msg_send![allocated, init];
            if initialized.is_null() {
                return None;
            }
            StrongPtr::new(initialized)
        };

        Some(NativeController {
            controller,
            delegate: None,
        })
    }
}

/// One live private controller, released on drop.
///
/// Every method sends exactly one message; the facade only calls the ones
/// whose selectors the prober confirmed.
pub struct NativeController {
    controller: StrongPtr,
    delegate: Option<DelegateRelay>,
}

impl NativeController {
    fn id(&self) -> *mut Object { *self.controller }
}

impl ControllerHandle for NativeController {
    type Object = Object;
    type WeakObject = NativeWeak;

    fn present(&mut self, controller: &Object) {
        let controller = ptr::from_ref(controller).cast_mut();
        unsafe {
            let _: () = msg_send![self.id(), presentViewControllerAsPictureInPicture: controller];
        }
    }

    fn perform_window_drag(&mut self, event: &Object) {
        let event = ptr::from_ref(event).cast_mut();
        unsafe {
            let _: () = msg_send![self.id(), performWindowDragWithEvent: event];
        }
    }

    fn set_playing(&mut self, playing: bool) {
        let playing: BOOL = if playing { YES } else { NO };
        unsafe {
            let _: () = msg_send![self.id(), setPlaying: playing];
        }
    }

    fn is_playing(&self) -> bool {
        let playing: BOOL = unsafe { msg_send![self.id(), playing] };
        playing != NO
    }

    fn set_name(&mut self, name: &str) {
        let controller = self.id();
        // The controller copies the autoreleased string before the pool drains.
        autoreleasepool(|| unsafe {
            let name = nsstring(name);
            let _: () = msg_send![controller, setName: name];
        });
    }

    fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        let size = NSSize {
            width: aspect_ratio.width(),
            height: aspect_ratio.height(),
        };
        unsafe {
            let _: () = msg_send![self.id(), setAspectRatio: size];
        }
    }

    fn set_replacement_rect(&mut self, rect: Rect) {
        let rect = NSRect::from(rect);
        unsafe {
            let _: () = msg_send![self.id(), setReplacementRect: rect];
        }
    }

    fn set_replacement_window(&mut self, window: &StrongPtr) {
        let window: *mut Object = **window;
        unsafe {
            let _: () = msg_send![self.id(), setReplacementWindow: window];
        }
    }

    fn set_replacement_view(&mut self, view: &StrongPtr) {
        let view: *mut Object = **view;
        unsafe {
            let _: () = msg_send![self.id(), setReplacementView: view];
        }
    }

    fn attach_delegate(&mut self, bridge: &Arc<DelegateBridge>) {
        self.detach_delegate();

        let Some(relay) = DelegateRelay::new(bridge) else {
            tracing::warn!("pip: delegate: could not create relay, notifications disabled");
            return;
        };
        unsafe {
            let _: () = msg_send![self.id(), setDelegate: relay.as_ptr()];
        }
        self.delegate = Some(relay);
    }

    fn detach_delegate(&mut self) {
        if let Some(relay) = self.delegate.take() {
            unsafe {
                let _: () = msg_send![self.id(), setDelegate: ptr::null_mut::<Object>()];
            }
            drop(relay);
        }
    }
}

impl Drop for NativeController {
    fn drop(&mut self) { self.detach_delegate(); }
}
