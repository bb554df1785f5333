//! Objective-C string helpers.

use std::ffi::{CStr, c_char, c_void};

use objc::runtime::Object;
use objc::{class, msg_send, sel, sel_impl};

/// `NSUTF8StringEncoding`.
const NS_UTF8_STRING_ENCODING: usize = 4;

/// Creates an autoreleased `NSString` from a Rust string slice.
///
/// # Safety
///
/// Must be called with an autorelease pool in place; the result is only valid
/// until that pool drains.
#[must_use]
pub unsafe fn nsstring(s: &str) -> *mut Object {
    let bytes = s.as_ptr().cast::<c_void>();
    unsafe {
        msg_send![
            class!(NSString),
            stringWithBytes: bytes
            length: s.len()
            encoding: NS_UTF8_STRING_ENCODING
        ]
    }
}

/// Copies an `NSString` into a Rust `String`.
///
/// Null input or a string without a UTF-8 representation yields an empty
/// string.
///
/// # Safety
///
/// `string` must be null or a valid `NSString` pointer.
#[must_use]
pub unsafe fn nsstring_to_string(string: *mut Object) -> String {
    if string.is_null() {
        return String::new();
    }

    let utf8: *const c_char = unsafe { msg_send![string, UTF8String] };
    if utf8.is_null() {
        return String::new();
    }

    // SAFETY: non-null, and UTF8String returns a NUL-terminated buffer owned by `string`.
    unsafe { CStr::from_ptr(utf8) }.to_string_lossy().into_owned()
}
