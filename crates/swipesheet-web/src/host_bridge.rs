#![forbid(unsafe_code)]

//! Queued host bridge for JS embeddings.
//!
//! Rust cannot call the host SDK directly from inside a touch handler, so
//! [`QueuedHost`] turns every [`HostGestureApi`] call into a [`HostCommand`]
//! that the JS shim drains and executes after each dispatch. The capability
//! set is whatever JS announced after probing the SDK.
//!
//! Wire format, one object per command:
//!
//! ```json
//! {"cmd":"disable_vertical_swipes"}
//! {"cmd":"enable_vertical_swipes"}
//! {"cmd":"haptic","feedback":{"kind":"impact","style":"medium"}}
//! {"cmd":"haptic","feedback":{"kind":"selection"}}
//! ```

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};
use swipesheet_core::host::{HapticFeedback, HostCapabilities, HostError, HostGestureApi};

/// One host SDK call for JS to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum HostCommand {
    DisableVerticalSwipes,
    EnableVerticalSwipes,
    Haptic { feedback: HapticFeedback },
}

/// Capability names as announced by JS.
const CAPABILITY_NAMES: [(&str, HostCapabilities); 3] = [
    (
        "disable_vertical_swipes",
        HostCapabilities::DISABLE_VERTICAL_SWIPES,
    ),
    (
        "enable_vertical_swipes",
        HostCapabilities::ENABLE_VERTICAL_SWIPES,
    ),
    ("haptics", HostCapabilities::HAPTICS),
];

/// Map announced capability names to flags. Unknown names are skipped so an
/// older core keeps working against a newer shim.
#[must_use]
pub fn capabilities_from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> HostCapabilities {
    names
        .into_iter()
        .fold(HostCapabilities::empty(), |caps, name| {
            match CAPABILITY_NAMES.iter().find(|(known, _)| *known == name) {
                Some((_, flag)) => caps | *flag,
                None => {
                    tracing::debug!(target: "swipesheet.web", capability = name, "unknown host capability ignored");
                    caps
                }
            }
        })
}

/// A [`HostGestureApi`] that queues calls for JS.
#[derive(Debug, Default)]
pub struct QueuedHost {
    capabilities: Cell<HostCapabilities>,
    queue: RefCell<Vec<HostCommand>>,
}

impl QueuedHost {
    #[must_use]
    pub fn new(capabilities: HostCapabilities) -> Self {
        Self {
            capabilities: Cell::new(capabilities),
            queue: RefCell::new(Vec::new()),
        }
    }

    /// Replace the capability set (JS re-probed the SDK).
    pub fn announce(&self, capabilities: HostCapabilities) {
        tracing::debug!(target: "swipesheet.web", capabilities = ?capabilities, "host capabilities announced");
        self.capabilities.set(capabilities);
    }

    /// Take every queued command, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<HostCommand> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    fn push(
        &self,
        required: HostCapabilities,
        name: &'static str,
        command: HostCommand,
    ) -> Result<(), HostError> {
        if !self.capabilities.get().contains(required) {
            return Err(HostError::Unsupported(name));
        }
        self.queue.borrow_mut().push(command);
        Ok(())
    }
}

impl HostGestureApi for QueuedHost {
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities.get()
    }

    fn disable_vertical_swipes(&self) -> Result<(), HostError> {
        self.push(
            HostCapabilities::DISABLE_VERTICAL_SWIPES,
            "disable_vertical_swipes",
            HostCommand::DisableVerticalSwipes,
        )
    }

    fn enable_vertical_swipes(&self) -> Result<(), HostError> {
        self.push(
            HostCapabilities::ENABLE_VERTICAL_SWIPES,
            "enable_vertical_swipes",
            HostCommand::EnableVerticalSwipes,
        )
    }

    fn trigger_haptic(&self, feedback: HapticFeedback) -> Result<(), HostError> {
        self.push(
            HostCapabilities::HAPTICS,
            "haptics",
            HostCommand::Haptic { feedback },
        )
    }
}
