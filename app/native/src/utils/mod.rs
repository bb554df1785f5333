//! Shared helpers.

#[cfg(target_os = "macos")]
pub mod objc;
