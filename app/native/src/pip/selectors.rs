//! Selectors this layer depends on.
//!
//! Two families are tracked separately:
//!
//! - [`Selector`] - instance methods sent *to* the private controller.
//! - [`Notification`] - optional delegate methods the controller sends *back*.
//!
//! Both carry their exact Objective-C selector names so the prober can check
//! for them without ever sending them.

use std::fmt;

use serde::{Serialize, Serializer};

/// An instance method of the private controller that the facade may forward to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Selector {
    /// `-init`
    Init,
    /// `-setDelegate:`
    SetDelegate,
    /// `-presentViewControllerAsPictureInPicture:`
    PresentAsPictureInPicture,
    /// `-performWindowDragWithEvent:`
    PerformWindowDrag,
    /// `-setPlaying:`
    SetPlaying,
    /// `-playing`
    Playing,
    /// `-setName:`
    SetName,
    /// `-setAspectRatio:`
    SetAspectRatio,
    /// `-setReplacementRect:`
    SetReplacementRect,
    /// `-setReplacementWindow:`
    SetReplacementWindow,
    /// `-setReplacementView:`
    SetReplacementView,
}

impl Selector {
    /// Every selector the facade can forward, in probe order.
    pub const ALL: [Self; 11] = [
        Self::Init,
        Self::SetDelegate,
        Self::PresentAsPictureInPicture,
        Self::PerformWindowDrag,
        Self::SetPlaying,
        Self::Playing,
        Self::SetName,
        Self::SetAspectRatio,
        Self::SetReplacementRect,
        Self::SetReplacementWindow,
        Self::SetReplacementView,
    ];

    /// Returns the Objective-C selector name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::SetDelegate => "setDelegate:",
            Self::PresentAsPictureInPicture => "presentViewControllerAsPictureInPicture:",
            Self::PerformWindowDrag => "performWindowDragWithEvent:",
            Self::SetPlaying => "setPlaying:",
            Self::Playing => "playing",
            Self::SetName => "setName:",
            Self::SetAspectRatio => "setAspectRatio:",
            Self::SetReplacementRect => "setReplacementRect:",
            Self::SetReplacementWindow => "setReplacementWindow:",
            Self::SetReplacementView => "setReplacementView:",
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A lifecycle or user-action notification delivered through the delegate protocol.
///
/// Every one of these is optional on the private side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Notification {
    /// The floating window is about to close.
    WillClose,
    /// The floating window has closed.
    DidClose,
    /// The user pressed stop.
    ActionStop,
    /// The user pressed pause.
    ActionPause,
    /// The user pressed play.
    ActionPlay,
    /// The user asked to return the content to its inline position.
    ActionReturn,
}

impl Notification {
    /// Every delegate notification the bridge understands.
    pub const ALL: [Self; 6] = [
        Self::WillClose,
        Self::DidClose,
        Self::ActionStop,
        Self::ActionPause,
        Self::ActionPlay,
        Self::ActionReturn,
    ];

    /// Returns the Objective-C selector name of the delegate method.
    #[must_use]
    pub const fn selector_name(self) -> &'static str {
        match self {
            Self::WillClose => "pipWillClose:",
            Self::DidClose => "pipDidClose:",
            Self::ActionStop => "pipActionStop:",
            Self::ActionPause => "pipActionPause:",
            Self::ActionPlay => "pipActionPlay:",
            Self::ActionReturn => "pipActionReturn:",
        }
    }

    /// Maps a delegate selector name back to its notification.
    #[must_use]
    pub fn from_selector_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|notification| notification.selector_name() == name)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.selector_name()) }
}

impl Serialize for Notification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.selector_name())
    }
}
