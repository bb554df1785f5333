//! Runtime-registered delegate class relaying notifications into the bridge.
//!
//! The class is declared once per process and implements every known
//! delegate method. Each instance relays into one bridge, which drops the
//! notifications it was not wired for.

use std::sync::{Arc, OnceLock};

use objc::declare::ClassDecl;
use objc::rc::StrongPtr;
use objc::runtime::{Class, Object, Sel};
use objc::{msg_send, sel, sel_impl};

use crate::pip::bridge::DelegateBridge;
use crate::pip::selectors::Notification;

const DELEGATE_CLASS_NAME: &str = "FloatPIPDelegateRelay";

/// Holds `Arc::into_raw` of the bridge, or 0 once detached.
const BRIDGE_IVAR: &str = "_floatBridge";

static DELEGATE_CLASS: OnceLock<Option<&'static Class>> = OnceLock::new();

/// Returns the delegate class, declaring it on first use.
fn delegate_class() -> Option<&'static Class> { *DELEGATE_CLASS.get_or_init(declare_delegate_class) }

fn declare_delegate_class() -> Option<&'static Class> {
    if let Some(existing) = Class::get(DELEGATE_CLASS_NAME) {
        return Some(existing);
    }

    let superclass = Class::get("NSObject")?;
    let Some(mut decl) = ClassDecl::new(DELEGATE_CLASS_NAME, superclass) else {
        tracing::warn!(class = DELEGATE_CLASS_NAME, "pip: delegate: class declaration refused");
        return Class::get(DELEGATE_CLASS_NAME);
    };

    decl.add_ivar::<usize>(BRIDGE_IVAR);
    for notification in Notification::ALL {
        // SAFETY: every delegate method has the signature `- (void)pipX:(PIPViewController *)pip`.
        unsafe {
            decl.add_method(
                Sel::register(notification.selector_name()),
                relay_notification as extern "C" fn(&Object, Sel, *mut Object),
            );
        }
    }

    tracing::debug!(
        class = DELEGATE_CLASS_NAME,
        methods = Notification::ALL.len(),
        "pip: delegate: class registered"
    );
    Some(decl.register())
}

/// Shared implementation of every delegate method.
extern "C" fn relay_notification(this: &Object, cmd: Sel, _controller: *mut Object) {
    let Some(notification) = Notification::from_selector_name(cmd.name()) else {
        return;
    };

    // SAFETY: the ivar is declared on this class and only written by `DelegateRelay`.
    let raw = unsafe { *this.get_ivar::<usize>(BRIDGE_IVAR) };
    if raw == 0 {
        tracing::trace!(%notification, "pip: delegate: detached, dropping notification");
        return;
    }

    // SAFETY: a non-zero ivar is a live `Arc::into_raw` pointer owned by the relay,
    // which clears it before releasing that reference.
    let bridge = unsafe { &*(raw as *const DelegateBridge) };
    bridge.deliver(notification);
}

/// One delegate instance bound to a bridge.
///
/// Owns a strong reference to the Objective-C object (the controller's
/// `delegate` property is weak) and one `Arc` count on the bridge.
pub struct DelegateRelay {
    object: StrongPtr,
    bridge: *const DelegateBridge,
}

impl DelegateRelay {
    /// Creates a delegate relaying into `bridge`.
    pub fn new(bridge: &Arc<DelegateBridge>) -> Option<Self> {
        let class = delegate_class()?;

        // SAFETY: `class` was declared above as an NSObject subclass.
        let object: *mut Object = unsafe { msg_send![class, new] };
        if object.is_null() {
            return None;
        }

        let raw = Arc::into_raw(Arc::clone(bridge));
        // SAFETY: `object` is a fresh instance of the relay class, which declares the ivar.
        unsafe { (*object).set_ivar::<usize>(BRIDGE_IVAR, raw as usize) };

        Some(Self {
            // SAFETY: `+new` returned a +1 reference that we now own.
            object: unsafe { StrongPtr::new(object) },
            bridge: raw,
        })
    }

    /// The delegate object to hand to `-setDelegate:`.
    pub fn as_ptr(&self) -> *mut Object { *self.object }
}

impl Drop for DelegateRelay {
    fn drop(&mut self) {
        // SAFETY: the object is alive while we hold `self.object`; the ivar is declared on its class.
        unsafe { (**self.object).set_ivar::<usize>(BRIDGE_IVAR, 0) };
        // SAFETY: `self.bridge` came from `Arc::into_raw` in `new` and is released exactly once.
        drop(unsafe { Arc::from_raw(self.bridge) });
    }
}
