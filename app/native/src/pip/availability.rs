//! The capability fact produced by the prober.

use std::collections::BTreeSet;

use serde::Serialize;

use super::selectors::{Notification, Selector};

/// Whether the private controller exists in this process, and which parts of it do.
///
/// Computed once per process. A value with `present == false` is a normal
/// outcome, not an error: every facade operation degrades to a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    present: bool,
    supported_selectors: BTreeSet<Selector>,
    notifications: BTreeSet<Notification>,
}

impl Availability {
    /// Builds an availability fact from already-confirmed parts.
    ///
    /// Selectors and notifications are discarded when `present` is `false`,
    /// so an absent class can never report support for anything.
    #[must_use]
    pub fn new(
        present: bool,
        supported_selectors: impl IntoIterator<Item = Selector>,
        notifications: impl IntoIterator<Item = Notification>,
    ) -> Self {
        if !present {
            return Self::absent();
        }

        Self {
            present,
            supported_selectors: supported_selectors.into_iter().collect(),
            notifications: notifications.into_iter().collect(),
        }
    }

    /// The fact for a runtime where the private class cannot be found.
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            present: false,
            supported_selectors: BTreeSet::new(),
            notifications: BTreeSet::new(),
        }
    }

    /// Returns `true` if the private class is loadable.
    #[must_use]
    pub const fn is_present(&self) -> bool { self.present }

    /// Returns `true` if instances of the private class implement `selector`.
    #[must_use]
    pub fn supports(&self, selector: Selector) -> bool {
        self.present && self.supported_selectors.contains(&selector)
    }

    /// Returns `true` if the delegate `notification` may be wired up.
    #[must_use]
    pub fn supports_notification(&self, notification: Notification) -> bool {
        self.present && self.notifications.contains(&notification)
    }

    /// Returns `true` if a live controller can be allocated.
    #[must_use]
    pub fn can_construct(&self) -> bool { self.supports(Selector::Init) }

    /// The confirmed controller selectors.
    #[must_use]
    pub const fn supported_selectors(&self) -> &BTreeSet<Selector> { &self.supported_selectors }

    /// The confirmed delegate notifications.
    #[must_use]
    pub const fn notifications(&self) -> &BTreeSet<Notification> { &self.notifications }

    /// The selectors the facade knows about but this runtime lacks.
    pub fn missing_selectors(&self) -> impl Iterator<Item = Selector> + '_ {
        Selector::ALL.into_iter().filter(|selector| !self.supports(*selector))
    }
}

impl Default for Availability {
    fn default() -> Self { Self::absent() }
}
