#![forbid(unsafe_code)]

//! Host application gesture and haptic API.
//!
//! The enclosing runtime (for example a chat-client webview) owns app-level
//! vertical swipes and a haptic engine. Every part of that surface is
//! optional: an implementation announces what it supports through
//! [`HostGestureApi::capabilities`], and callers skip anything missing with a
//! warning instead of failing.

use bitflags::bitflags;

bitflags! {
    /// Optional host features.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HostCapabilities: u8 {
        /// `disableVerticalSwipes()`
        const DISABLE_VERTICAL_SWIPES = 0b001;
        /// `enableVerticalSwipes()`
        const ENABLE_VERTICAL_SWIPES  = 0b010;
        /// `HapticFeedback.*`
        const HAPTICS                 = 0b100;
    }
}

impl HostCapabilities {
    /// Both halves of native vertical swipe control.
    pub const SWIPE_CONTROL: Self = Self::DISABLE_VERTICAL_SWIPES.union(Self::ENABLE_VERTICAL_SWIPES);
}

/// Strength of an impact haptic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
}

/// Kind of a notification haptic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NotificationKind {
    Error,
    Success,
    Warning,
}

/// One discrete haptic request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "style", rename_all = "snake_case")
)]
pub enum HapticFeedback {
    Impact(ImpactStyle),
    Notification(NotificationKind),
    Selection,
}

impl HapticFeedback {
    /// Host-side kind name (`impact`, `notification`, `selection`).
    #[must_use]
    pub const fn kind_name(self) -> &'static str {
        match self {
            Self::Impact(_) => "impact",
            Self::Notification(_) => "notification",
            Self::Selection => "selection",
        }
    }
}

/// Failure reported by a host call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The host does not provide this capability.
    #[error("host capability `{0}` is not available")]
    Unsupported(&'static str),
    /// The host provides the capability but the call failed.
    #[error("host call failed: {0}")]
    Failed(String),
}

/// Injected host interface.
///
/// Every method is optional. The defaults report [`HostError::Unsupported`],
/// so an implementation overrides only what it actually provides.
pub trait HostGestureApi {
    /// Capabilities currently available.
    fn capabilities(&self) -> HostCapabilities;

    fn disable_vertical_swipes(&self) -> Result<(), HostError> {
        Err(HostError::Unsupported("disable_vertical_swipes"))
    }

    fn enable_vertical_swipes(&self) -> Result<(), HostError> {
        Err(HostError::Unsupported("enable_vertical_swipes"))
    }

    fn trigger_haptic(&self, _feedback: HapticFeedback) -> Result<(), HostError> {
        Err(HostError::Unsupported("haptics"))
    }
}

/// A host with no capabilities at all (plain browser tab).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHost;

impl HostGestureApi for NoHost {
    fn capabilities(&self) -> HostCapabilities {
        HostCapabilities::empty()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub use fake::{FakeHost, HostCall};

#[cfg(any(test, feature = "test-helpers"))]
mod fake {
    use std::cell::{Cell, RefCell};

    use super::{HapticFeedback, HostCapabilities, HostError, HostGestureApi};

    /// One successful call recorded by [`FakeHost`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum HostCall {
        DisableVerticalSwipes,
        EnableVerticalSwipes,
        Haptic(HapticFeedback),
    }

    /// Recording host for tests.
    #[derive(Debug)]
    pub struct FakeHost {
        capabilities: Cell<HostCapabilities>,
        fail: Cell<bool>,
        calls: RefCell<Vec<HostCall>>,
        swipes_disabled: Cell<bool>,
    }

    impl Default for FakeHost {
        fn default() -> Self {
            Self::with_capabilities(HostCapabilities::all())
        }
    }

    impl FakeHost {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn with_capabilities(capabilities: HostCapabilities) -> Self {
            Self {
                capabilities: Cell::new(capabilities),
                fail: Cell::new(false),
                calls: RefCell::new(Vec::new()),
                swipes_disabled: Cell::new(false),
            }
        }

        /// Change the announced capabilities.
        pub fn set_capabilities(&self, capabilities: HostCapabilities) {
            self.capabilities.set(capabilities);
        }

        /// Make every subsequent supported call fail.
        pub fn set_failing(&self, fail: bool) {
            self.fail.set(fail);
        }

        /// Whether the host's native vertical swipe is currently off.
        #[must_use]
        pub fn swipes_disabled(&self) -> bool {
            self.swipes_disabled.get()
        }

        #[must_use]
        pub fn calls(&self) -> Vec<HostCall> {
            self.calls.borrow().clone()
        }

        #[must_use]
        pub fn haptics(&self) -> Vec<HapticFeedback> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|call| match call {
                    HostCall::Haptic(feedback) => Some(*feedback),
                    _ => None,
                })
                .collect()
        }

        pub fn clear(&self) {
            self.calls.borrow_mut().clear();
        }

        fn record(
            &self,
            required: HostCapabilities,
            name: &'static str,
            call: HostCall,
        ) -> Result<(), HostError> {
            if !self.capabilities.get().contains(required) {
                return Err(HostError::Unsupported(name));
            }
            if self.fail.get() {
                return Err(HostError::Failed(format!("{name} rejected")));
            }
            self.calls.borrow_mut().push(call);
            Ok(())
        }
    }

    impl HostGestureApi for FakeHost {
        fn capabilities(&self) -> HostCapabilities {
            self.capabilities.get()
        }

        fn disable_vertical_swipes(&self) -> Result<(), HostError> {
            self.record(
                HostCapabilities::DISABLE_VERTICAL_SWIPES,
                "disable_vertical_swipes",
                HostCall::DisableVerticalSwipes,
            )?;
            self.swipes_disabled.set(true);
            Ok(())
        }

        fn enable_vertical_swipes(&self) -> Result<(), HostError> {
            self.record(
                HostCapabilities::ENABLE_VERTICAL_SWIPES,
                "enable_vertical_swipes",
                HostCall::EnableVerticalSwipes,
            )?;
            self.swipes_disabled.set(false);
            Ok(())
        }

        fn trigger_haptic(&self, feedback: HapticFeedback) -> Result<(), HostError> {
            self.record(HostCapabilities::HAPTICS, "haptics", HostCall::Haptic(feedback))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_host_reports_unsupported_for_everything() {
        let host = NoHost;
        assert!(host.capabilities().is_empty());
        assert_eq!(
            host.disable_vertical_swipes(),
            Err(HostError::Unsupported("disable_vertical_swipes"))
        );
        assert!(host.enable_vertical_swipes().is_err());
        assert!(host.trigger_haptic(HapticFeedback::Selection).is_err());
    }

    #[test]
    fn fake_host_records_supported_calls() {
        let host = FakeHost::new();
        host.disable_vertical_swipes().unwrap();
        assert!(host.swipes_disabled());
        host.trigger_haptic(HapticFeedback::Impact(ImpactStyle::Heavy))
            .unwrap();
        host.enable_vertical_swipes().unwrap();
        assert!(!host.swipes_disabled());
        assert_eq!(
            host.calls(),
            vec![
                HostCall::DisableVerticalSwipes,
                HostCall::Haptic(HapticFeedback::Impact(ImpactStyle::Heavy)),
                HostCall::EnableVerticalSwipes,
            ]
        );
    }

    #[test]
    fn fake_host_honours_dropped_capabilities_and_failures() {
        let host = FakeHost::with_capabilities(HostCapabilities::HAPTICS);
        assert!(matches!(
            host.disable_vertical_swipes(),
            Err(HostError::Unsupported(_))
        ));
        host.set_failing(true);
        assert!(matches!(
            host.trigger_haptic(HapticFeedback::Selection),
            Err(HostError::Failed(_))
        ));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn haptic_kind_names() {
        assert_eq!(HapticFeedback::Selection.kind_name(), "selection");
        assert_eq!(
            HapticFeedback::Notification(NotificationKind::Warning).kind_name(),
            "notification"
        );
    }

    #[test]
    fn error_messages_name_the_capability() {
        let err = HostError::Unsupported("haptics");
        assert_eq!(err.to_string(), "host capability `haptics` is not available");
    }
}
