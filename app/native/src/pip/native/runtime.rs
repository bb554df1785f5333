//! Existence checks against the live Objective-C runtime.

use std::ffi::{c_char, c_void};

use objc::rc::autoreleasepool;
use objc::runtime::{BOOL, Class, NO, Object, Protocol, Sel, YES};
use objc::{msg_send, sel, sel_impl};

use crate::pip::probe::RuntimeIntrospection;
use crate::utils::objc::{nsstring, nsstring_to_string};

/// `struct objc_method_description`
#[repr(C)]
struct MethodDescription {
    name: *const c_void,
    types: *const c_char,
}

#[link(name = "objc", kind = "dylib")]
unsafe extern "C" {
    fn protocol_getMethodDescription(
        protocol: *const Protocol,
        selector: Sel,
        is_required_method: BOOL,
        is_instance_method: BOOL,
    ) -> MethodDescription;
}

/// The process's Objective-C runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

impl RuntimeIntrospection for NativeRuntime {
    fn load_framework(&self, path: &str) -> bool {
        let Some(bundle_class) = Class::get("NSBundle") else {
            return false;
        };

        autoreleasepool(|| {
            // SAFETY: NSBundle is a public class; both messages are part of its API.
            unsafe {
                let bundle_path = nsstring(path);
                let bundle: *mut Object = msg_send![bundle_class, bundleWithPath: bundle_path];
                if bundle.is_null() {
                    return false;
                }

                let loaded: BOOL = msg_send![bundle, load];
                if loaded == NO {
                    tracing::warn!(path, "pip: runtime: bundle refused to load");
                    return false;
                }

                let identifier: *mut Object = msg_send![bundle, bundleIdentifier];
                tracing::debug!(
                    path,
                    bundle_id = %nsstring_to_string(identifier),
                    "pip: runtime: framework loaded"
                );
                true
            }
        })
    }

    fn class_exists(&self, class_name: &str) -> bool { Class::get(class_name).is_some() }

    fn instances_respond_to(&self, class_name: &str, selector: &str) -> bool {
        Class::get(class_name)
            .is_some_and(|class| class.instance_method(Sel::register(selector)).is_some())
    }

    fn protocol_exists(&self, protocol: &str) -> bool { Protocol::get(protocol).is_some() }

    fn protocol_declares(&self, protocol: &str, selector: &str) -> bool {
        let Some(protocol) = Protocol::get(protocol) else {
            return false;
        };
        let selector = Sel::register(selector);

        [NO, YES].into_iter().any(|required| {
            // SAFETY: `protocol` comes from the runtime and the call only reads its metadata.
            let description =
                unsafe { protocol_getMethodDescription(protocol, selector, required, YES) };
            !description.name.is_null()
        })
    }
}
