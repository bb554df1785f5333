//! Float - a safe proxy for the private macOS picture-in-picture controller.
//!
//! The library exposes the [`pip`] proxy for hosts that embed it, plus the
//! configuration and CLI used by the `float` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod pip;

mod utils;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is used. Output goes
/// to stderr so command output on stdout stays machine-readable. Calling this
/// more than once keeps the first subscriber.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
