//! Capability prober.
//!
//! Decides whether the private controller class exists and which of the
//! selectors this layer depends on it implements. Only existence checks are
//! used: no probed selector is ever sent. Absence is reported as
//! [`Availability::absent`], never as an error.
//!
//! The process-wide result is computed once by [`probe`] and cached; the
//! runtime does not change under a running process.

use std::sync::OnceLock;

use super::availability::Availability;
use super::selectors::{Notification, Selector};
use crate::config::{self, PipConfig};

/// Read-only questions the prober asks of the Objective-C runtime.
///
/// Implementations must answer without sending any of the queried selectors.
pub trait RuntimeIntrospection {
    /// Loads the framework bundle at `path`. Returns `true` if it is loaded.
    fn load_framework(&self, path: &str) -> bool;

    /// Returns `true` if a class named `class_name` is registered.
    fn class_exists(&self, class_name: &str) -> bool;

    /// Returns `true` if instances of `class_name` implement `selector`.
    fn instances_respond_to(&self, class_name: &str, selector: &str) -> bool;

    /// Returns `true` if a protocol named `protocol` is registered.
    fn protocol_exists(&self, protocol: &str) -> bool;

    /// Returns `true` if `protocol` declares the instance method `selector`.
    fn protocol_declares(&self, protocol: &str, selector: &str) -> bool;
}

/// What to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    /// When `false`, probing is skipped and the feature reported absent.
    pub enabled: bool,
    /// Bundle loaded if the class is not registered yet.
    pub framework_path: String,
    /// The controller class.
    pub class_name: String,
    /// The delegate protocol whose optional methods carry notifications.
    pub delegate_protocol: String,
}

impl ProbeTarget {
    /// Builds a target from the `pip` configuration section.
    #[must_use]
    pub fn from_config(config: &PipConfig) -> Self {
        Self {
            enabled: config.enabled,
            framework_path: config.framework_path.clone(),
            class_name: config.class_name.clone(),
            delegate_protocol: config.delegate_protocol.clone(),
        }
    }
}

impl Default for ProbeTarget {
    fn default() -> Self { Self::from_config(&PipConfig::default()) }
}

/// Probes `runtime` for `target`.
///
/// Deterministic for a given runtime and free of side effects apart from
/// loading the framework bundle when the class is not yet registered.
pub fn probe_with<R>(runtime: &R, target: &ProbeTarget) -> Availability
where R: RuntimeIntrospection + ?Sized {
    if !target.enabled {
        tracing::debug!("pip: probe: disabled by configuration");
        return Availability::absent();
    }

    let class_name = target.class_name.as_str();
    let mut present = runtime.class_exists(class_name);
    if !present && !target.framework_path.is_empty() {
        if runtime.load_framework(&target.framework_path) {
            present = runtime.class_exists(class_name);
        } else {
            tracing::debug!(path = %target.framework_path, "pip: probe: framework not loadable");
        }
    }

    if !present {
        tracing::info!(class = class_name, "pip: probe: controller class not found");
        return Availability::absent();
    }

    let selectors: Vec<Selector> = Selector::ALL
        .into_iter()
        .filter(|selector| runtime.instances_respond_to(class_name, selector.name()))
        .collect();

    let notifications = if selectors.contains(&Selector::SetDelegate) {
        probe_notifications(runtime, &target.delegate_protocol)
    } else {
        tracing::debug!("pip: probe: no -setDelegate:, notifications disabled");
        Vec::new()
    };

    let availability = Availability::new(true, selectors, notifications);
    tracing::info!(
        class = class_name,
        selectors = availability.supported_selectors().len(),
        notifications = availability.notifications().len(),
        "pip: probe: controller available"
    );
    for selector in availability.missing_selectors() {
        tracing::warn!(class = class_name, %selector, "pip: probe: selector missing");
    }
    availability
}

/// Confirms delegate notifications against the protocol declaration.
///
/// When the protocol is not registered with the runtime, the documented set
/// is assumed; the bridge tolerates any subset actually being sent.
fn probe_notifications<R>(runtime: &R, protocol: &str) -> Vec<Notification>
where R: RuntimeIntrospection + ?Sized {
    if !runtime.protocol_exists(protocol) {
        tracing::debug!(protocol, "pip: probe: delegate protocol not registered, using known set");
        return Notification::ALL.to_vec();
    }

    Notification::ALL
        .into_iter()
        .filter(|notification| runtime.protocol_declares(protocol, notification.selector_name()))
        .collect()
}

/// Cached process-wide availability.
static AVAILABILITY: OnceLock<Availability> = OnceLock::new();

/// Returns the process-wide availability, probing on first use.
///
/// Safe to call from any thread; concurrent first calls probe once.
pub fn probe() -> &'static Availability {
    AVAILABILITY.get_or_init(|| {
        let target = ProbeTarget::from_config(&config::get_config().pip);
        probe_target(&target)
    })
}

/// Probes the live runtime for `target`, bypassing the process-wide cache.
#[cfg(target_os = "macos")]
#[must_use]
pub fn probe_target(target: &ProbeTarget) -> Availability {
    probe_with(&super::native::NativeRuntime, target)
}

/// Probes the live runtime for `target`, bypassing the process-wide cache.
#[cfg(not(target_os = "macos"))]
#[must_use]
pub fn probe_target(target: &ProbeTarget) -> Availability {
    tracing::debug!(
        class = %target.class_name,
        "pip: probe: no Objective-C runtime on this platform"
    );
    Availability::absent()
}
