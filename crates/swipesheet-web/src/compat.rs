#![forbid(unsafe_code)]

//! Platform compatibility shim.
//!
//! Some mobile WebKit builds keep rubber-banding the whole document even when
//! the sheet's own `touchmove` listener calls `preventDefault()`. Instead of
//! sniffing user agents, the JS shim probes a few features once and reports
//! them as a [`PlatformProbe`]; [`CompatShim`] then decides whether a captured
//! move also needs a document-level `preventDefault()`.
//!
//! None of this affects capture arbitration. The shim only adds DOM commands
//! on top of what the sheet already decided.

use serde::{Deserialize, Serialize};
use swipesheet_core::event::TouchPhase;
use swipesheet_core::sheet::SheetDispatch;

/// Feature probe results reported by JS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformProbe {
    /// `CSS.supports("overscroll-behavior", "contain")`
    pub overscroll_behavior: bool,
    /// `addEventListener` honours `{ passive: false }`.
    pub passive_listener_option: bool,
}

impl Default for PlatformProbe {
    fn default() -> Self {
        Self {
            overscroll_behavior: true,
            passive_listener_option: true,
        }
    }
}

/// One call to make on the native event or document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DomCommand {
    /// `event.preventDefault()`
    PreventDefault,
    /// `event.stopPropagation()`
    StopPropagation,
    /// `preventDefault()` from a document-level non-passive `touchmove` listener.
    PreventDocumentDefault,
}

/// Maps a sheet dispatch to DOM commands for the probed platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompatShim {
    probe: PlatformProbe,
}

impl CompatShim {
    #[must_use]
    pub const fn new(probe: PlatformProbe) -> Self {
        Self { probe }
    }

    #[must_use]
    pub const fn probe(&self) -> PlatformProbe {
        self.probe
    }

    /// Whether the JS shim must install the document-level guard listener.
    ///
    /// Needed when the platform cannot contain overscroll with CSS, or when
    /// it ignores `passive: false` on the sheet element.
    #[must_use]
    pub const fn needs_document_guard(&self) -> bool {
        !self.probe.overscroll_behavior || !self.probe.passive_listener_option
    }

    /// DOM commands for one dispatch, in the order JS should apply them.
    #[must_use]
    pub fn commands(&self, dispatch: &SheetDispatch) -> Vec<DomCommand> {
        let mut commands = Vec::with_capacity(3);
        if dispatch.prevent_default {
            commands.push(DomCommand::PreventDefault);
        }
        if dispatch.stop_propagation {
            commands.push(DomCommand::StopPropagation);
        }
        if dispatch.captured && dispatch.phase == TouchPhase::Move && self.needs_document_guard() {
            commands.push(DomCommand::PreventDocumentDefault);
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn dispatch(phase: TouchPhase, captured: bool) -> SheetDispatch {
        SheetDispatch {
            phase,
            prevent_default: captured && phase != TouchPhase::Start,
            stop_propagation: captured,
            captured,
            frame: None,
            outcome: None,
            ignored: None,
        }
    }

    #[test]
    fn capable_platform_gets_plain_commands() {
        let shim = CompatShim::default();
        assert!(!shim.needs_document_guard());
        assert_eq!(
            shim.commands(&dispatch(TouchPhase::Move, true)),
            vec![DomCommand::PreventDefault, DomCommand::StopPropagation]
        );
        assert_eq!(
            shim.commands(&dispatch(TouchPhase::Start, true)),
            vec![DomCommand::StopPropagation]
        );
        assert!(shim.commands(&dispatch(TouchPhase::Move, false)).is_empty());
    }

    #[test]
    fn missing_overscroll_support_doubles_prevention_on_captured_moves() {
        let shim = CompatShim::new(PlatformProbe {
            overscroll_behavior: false,
            passive_listener_option: true,
        });
        assert!(shim.needs_document_guard());
        assert_eq!(
            shim.commands(&dispatch(TouchPhase::Move, true)),
            vec![
                DomCommand::PreventDefault,
                DomCommand::StopPropagation,
                DomCommand::PreventDocumentDefault,
            ]
        );
        assert!(
            !shim
                .commands(&dispatch(TouchPhase::End, true))
                .contains(&DomCommand::PreventDocumentDefault)
        );
        assert!(shim.commands(&dispatch(TouchPhase::Move, false)).is_empty());
    }

    #[test]
    fn probe_json_defaults_missing_fields() {
        let probe: PlatformProbe = serde_json::from_str(r#"{"overscroll_behavior":false}"#).unwrap();
        assert!(!probe.overscroll_behavior);
        assert!(probe.passive_listener_option);
    }
}
