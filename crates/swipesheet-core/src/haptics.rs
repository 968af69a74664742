#![forbid(unsafe_code)]

//! Tactile feedback at gesture milestones.
//!
//! - A selection tick fires once per session, the first time the drag
//!   distance reaches the selection threshold. Edge-triggered: falling back
//!   below and crossing again in the same session does not re-fire.
//! - An impact fires once per committed transition: medium when opening,
//!   light when closing. Settles are silent.

use std::rc::Rc;

use crate::host::{HapticFeedback, HostCapabilities, HostGestureApi, ImpactStyle, NotificationKind};
use crate::position::SheetPosition;

/// Haptic thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HapticConfig {
    /// Drag distance (px) that fires the selection tick (default: 50).
    pub selection_distance_px: f64,
}

impl Default for HapticConfig {
    fn default() -> Self {
        Self {
            selection_distance_px: 50.0,
        }
    }
}

/// Fires haptics through the injected host.
pub struct HapticDispatcher {
    host: Rc<dyn HostGestureApi>,
    config: HapticConfig,
    selection_fired: bool,
}

impl std::fmt::Debug for HapticDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HapticDispatcher")
            .field("config", &self.config)
            .field("selection_fired", &self.selection_fired)
            .finish_non_exhaustive()
    }
}

impl HapticDispatcher {
    #[must_use]
    pub fn new(host: Rc<dyn HostGestureApi>, config: HapticConfig) -> Self {
        Self {
            host,
            config,
            selection_fired: false,
        }
    }

    /// Re-arm the selection tick for a new session.
    pub fn begin_session(&mut self) {
        self.selection_fired = false;
    }

    /// Feed the current drag distance. Returns `true` if the tick fired.
    pub fn observe_distance(&mut self, distance: f64) -> bool {
        if self.selection_fired || distance < self.config.selection_distance_px {
            return false;
        }
        self.selection_fired = true;
        self.trigger(HapticFeedback::Selection)
    }

    /// Impact for a committed transition into `to`.
    pub fn on_commit(&mut self, to: SheetPosition) -> HapticFeedback {
        let feedback = HapticFeedback::Impact(match to {
            SheetPosition::Expanded => ImpactStyle::Medium,
            SheetPosition::Collapsed => ImpactStyle::Light,
        });
        self.trigger(feedback);
        feedback
    }

    /// Notification haptic for callers outside the gesture path.
    pub fn notify(&self, kind: NotificationKind) -> bool {
        self.trigger(HapticFeedback::Notification(kind))
    }

    /// Fire one haptic. Returns `true` if the host accepted it.
    pub fn trigger(&self, feedback: HapticFeedback) -> bool {
        if !self.host.capabilities().contains(HostCapabilities::HAPTICS) {
            tracing::warn!(
                target: "swipesheet.haptics",
                kind = feedback.kind_name(),
                "host has no haptics; skipped"
            );
            return false;
        }
        match self.host.trigger_haptic(feedback) {
            Ok(()) => {
                tracing::debug!(target: "swipesheet.haptics", feedback = ?feedback, "haptic fired");
                true
            }
            Err(err) => {
                tracing::warn!(target: "swipesheet.haptics", error = %err, "haptic failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FakeHost;

    fn dispatcher(host: &Rc<FakeHost>) -> HapticDispatcher {
        HapticDispatcher::new(host.clone(), HapticConfig::default())
    }

    #[test]
    fn selection_fires_once_per_session() {
        let host = Rc::new(FakeHost::new());
        let mut d = dispatcher(&host);
        assert!(!d.observe_distance(49.9));
        assert!(d.observe_distance(50.0));
        assert!(!d.observe_distance(80.0));
        assert!(!d.observe_distance(10.0));
        assert!(!d.observe_distance(60.0));
        assert_eq!(host.haptics(), vec![HapticFeedback::Selection]);

        d.begin_session();
        assert!(d.observe_distance(55.0));
        assert_eq!(host.haptics().len(), 2);
    }

    #[test]
    fn commit_impact_depends_on_direction() {
        let host = Rc::new(FakeHost::new());
        let mut d = dispatcher(&host);
        assert_eq!(
            d.on_commit(SheetPosition::Expanded),
            HapticFeedback::Impact(ImpactStyle::Medium)
        );
        assert_eq!(
            d.on_commit(SheetPosition::Collapsed),
            HapticFeedback::Impact(ImpactStyle::Light)
        );
        assert_eq!(host.haptics().len(), 2);
    }

    #[test]
    fn missing_haptics_capability_is_skipped() {
        let host = Rc::new(FakeHost::with_capabilities(HostCapabilities::SWIPE_CONTROL));
        let mut d = dispatcher(&host);
        assert!(!d.observe_distance(100.0));
        assert!(!d.notify(NotificationKind::Error));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn notification_passes_through() {
        let host = Rc::new(FakeHost::new());
        let d = dispatcher(&host);
        assert!(d.notify(NotificationKind::Success));
        assert_eq!(
            host.haptics(),
            vec![HapticFeedback::Notification(NotificationKind::Success)]
        );
    }
}
