#![forbid(unsafe_code)]

//! Deterministic touch adapter for webview hosts.
//!
//! [`SheetTouchAdapter`] owns one [`Sheet`] and its [`QueuedHost`]. For every
//! touch event JS posts, it returns:
//! - DOM commands to apply to the native event before the handler returns,
//! - host SDK commands to execute (swipe toggles and haptics),
//! - the transform to render, and
//! - a structured log entry.
//!
//! Layout snapshots are sticky: an event without a layout reuses the last one.
//!
//! Unmount with [`SheetTouchAdapter::teardown`] and run the commands it
//! returns. Dropping the adapter tears it down too, but the re-enable command
//! produced then only reaches JS through a queue taken earlier with
//! [`SheetTouchAdapter::host_queue`]; otherwise it is logged at `warn` and lost.

use std::rc::Rc;
use std::time::Duration;

use serde_json::json;
use swipesheet_core::capture::SheetLayout;
use swipesheet_core::config::SheetConfig;
use swipesheet_core::coordinator::HostSwipeLock;
use swipesheet_core::event::TouchPhase;
use swipesheet_core::gesture::IgnoredReason;
use swipesheet_core::host::HostCapabilities;
use swipesheet_core::position::{CommitOutcome, SheetPosition, SheetTransform};
use swipesheet_core::sheet::{Sheet, SheetDispatch, SheetProps};

use crate::compat::{CompatShim, DomCommand, PlatformProbe};
use crate::host_bridge::{HostCommand, QueuedHost};
use crate::input_parser::{InputParseError, ParsedTouch, parse_touch_json};

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetTouchLogOutcome {
    /// The sheet owns the session.
    Captured,
    /// The event was left to content scroll or the host.
    PassedThrough,
    /// A captured session ended with a position change.
    Committed(SheetPosition),
    /// A captured session ended without a position change.
    Settled,
    Ignored(IgnoredReason),
}

impl SheetTouchLogOutcome {
    fn from_dispatch(dispatch: &SheetDispatch) -> Self {
        if let Some(reason) = dispatch.ignored {
            return Self::Ignored(reason);
        }
        match dispatch.outcome {
            Some(CommitOutcome::Committed { to, .. }) => Self::Committed(to),
            Some(CommitOutcome::Settled) => Self::Settled,
            None if dispatch.captured => Self::Captured,
            None => Self::PassedThrough,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Captured => "captured",
            Self::PassedThrough => "passed_through",
            Self::Committed(_) => "committed",
            Self::Settled => "settled",
            Self::Ignored(_) => "ignored",
        }
    }
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetTouchLogEntry {
    pub phase: TouchPhase,
    /// Monotonic per adapter; `None` for ignored events.
    pub sequence: Option<u64>,
    pub captured: bool,
    pub outcome: SheetTouchLogOutcome,
}

/// Everything JS needs after one touch event.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTouchDispatch {
    pub dom: Vec<DomCommand>,
    pub host: Vec<HostCommand>,
    pub transform: SheetTransform,
    pub log: SheetTouchLogEntry,
}

impl SheetTouchDispatch {
    /// Encode for the JS shim.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let position = match self.log.outcome {
            SheetTouchLogOutcome::Committed(to) => Some(position_name(to)),
            _ => None,
        };
        json!({
            "dom": self.dom,
            "host": self.host,
            "transform": {
                "translate_y": self.transform.translate_y,
                "animated": self.transform.animated,
            },
            "log": {
                "phase": self.log.phase.dom_name(),
                "sequence": self.log.sequence,
                "captured": self.log.captured,
                "outcome": self.log.outcome.label(),
                "position": position,
            },
        })
    }
}

fn position_name(position: SheetPosition) -> &'static str {
    match position {
        SheetPosition::Collapsed => "collapsed",
        SheetPosition::Expanded => "expanded",
    }
}

/// Owns a sheet and translates JS touch traffic into commands.
#[derive(Debug)]
pub struct SheetTouchAdapter {
    sheet: Sheet,
    host: Rc<QueuedHost>,
    shim: CompatShim,
    layout: SheetLayout,
    next_sequence: u64,
    host_shared: bool,
}

impl SheetTouchAdapter {
    /// Mount a sheet behind the process-wide host swipe lock.
    #[must_use]
    pub fn new(props: SheetProps, config: SheetConfig, probe: PlatformProbe) -> Self {
        Self::with_lock(props, config, probe, HostSwipeLock::global())
    }

    #[must_use]
    pub fn with_lock(
        props: SheetProps,
        config: SheetConfig,
        probe: PlatformProbe,
        lock: HostSwipeLock,
    ) -> Self {
        let host = Rc::new(QueuedHost::default());
        let sheet = Sheet::with_config(props, host.clone(), config, lock);
        Self {
            sheet,
            host,
            shim: CompatShim::new(probe),
            layout: SheetLayout::default(),
            next_sequence: 1,
            host_shared: false,
        }
    }

    /// Shared handle to the host command queue.
    ///
    /// Commands queued while the adapter is dropped stay readable here.
    #[must_use]
    pub fn host_queue(&mut self) -> Rc<QueuedHost> {
        self.host_shared = true;
        Rc::clone(&self.host)
    }

    /// JS finished probing the host SDK.
    pub fn announce_capabilities(&self, capabilities: HostCapabilities) {
        self.host.announce(capabilities);
    }

    #[must_use]
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    #[must_use]
    pub fn position(&self) -> SheetPosition {
        self.sheet.position()
    }

    #[must_use]
    pub const fn needs_document_guard(&self) -> bool {
        self.shim.needs_document_guard()
    }

    /// Decode and dispatch one JSON touch event.
    pub fn handle_json(&mut self, json: &str) -> Result<SheetTouchDispatch, InputParseError> {
        let parsed = parse_touch_json(json).inspect_err(|err| {
            tracing::debug!(target: "swipesheet.web", error = %err, "touch input rejected");
        })?;
        Ok(self.handle(parsed))
    }

    /// Dispatch one decoded touch event.
    pub fn handle(&mut self, parsed: ParsedTouch) -> SheetTouchDispatch {
        if let Some(layout) = parsed.layout {
            self.layout = layout;
        }
        let dispatch = self.sheet.handle_touch(&parsed.event, &self.layout);
        let outcome = SheetTouchLogOutcome::from_dispatch(&dispatch);
        let sequence = match outcome {
            SheetTouchLogOutcome::Ignored(_) => None,
            _ => {
                let sequence = self.next_sequence;
                self.next_sequence = self.next_sequence.saturating_add(1);
                Some(sequence)
            }
        };
        let log = SheetTouchLogEntry {
            phase: dispatch.phase,
            sequence,
            captured: dispatch.captured,
            outcome,
        };
        if !matches!(
            outcome,
            SheetTouchLogOutcome::Captured | SheetTouchLogOutcome::PassedThrough
        ) {
            tracing::debug!(target: "swipesheet.web", log = ?log, "touch dispatch");
        }
        SheetTouchDispatch {
            dom: self.shim.commands(&dispatch),
            host: self.host.drain(),
            transform: self.sheet.transform(),
            log,
        }
    }

    /// Advance animations by `dt_ms` and return the transform to render.
    pub fn tick(&mut self, dt_ms: f64) -> SheetTransform {
        let dt = Duration::try_from_secs_f64(dt_ms.max(0.0) / 1000.0).unwrap_or(Duration::ZERO);
        self.sheet.advance(dt);
        self.sheet.transform()
    }

    /// Unmount. Returns the host commands JS must still run.
    pub fn teardown(&mut self) -> Vec<HostCommand> {
        self.sheet.teardown();
        self.host.drain()
    }
}

impl Drop for SheetTouchAdapter {
    fn drop(&mut self) {
        if self.sheet.is_torn_down() {
            return;
        }
        self.sheet.teardown();
        if self.host_shared {
            return;
        }
        let undelivered = self.host.drain();
        if !undelivered.is_empty() {
            tracing::warn!(
                target: "swipesheet.web",
                commands = ?undelivered,
                "adapter dropped without teardown; host commands undelivered"
            );
        }
    }
}
