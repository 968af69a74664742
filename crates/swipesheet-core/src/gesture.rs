#![forbid(unsafe_code)]

//! Gesture tracking: transforms raw touch events into structured gesture frames.
//!
//! [`GestureTracker`] owns at most one [`DragSession`] and feeds
//! [`GestureFrame`]s to a [`GestureCallbacks`] implementation. It knows
//! nothing about sheets: whether a session is captured is decided by the
//! callbacks, and the tracker only turns that decision into native event
//! handling (`preventDefault` / `stopPropagation`).
//!
//! # State Machine
//!
//! ```text
//! Idle --start--> Active(undecided) --decision--> Active(captured | yielded)
//!   ^                                                   |
//!   +------------------- end | cancel ------------------+
//! ```
//!
//! # Invariants
//!
//! 1. At most one session is active. A `Start` while active is ignored.
//! 2. A capture decision is made exactly once per session and never revised.
//!    A deferred decision is resolved on a later move, at which point it is
//!    final.
//! 3. `End` and `Cancel` both discard the session and always invoke
//!    [`GestureCallbacks::on_end`]; they differ only in [`EndKind`].
//! 4. Events with no touch points are dropped on `Start`/`Move`/`End` and the
//!    prior state is retained. `Cancel` never needs a touch point.
//! 5. Per-event work is O(1): a session stores only its first and last sample.

use std::time::Duration;

use crate::event::{TouchEvent, TouchPhase, TouchPoint};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for gesture tracking.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Movement (px) below which a touch still counts as a tap (default: 3).
    pub tap_slop_px: f64,
    /// Lower bound on the time delta used for velocity (default: 1ms).
    pub min_time_delta_ms: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_slop_px: 3.0,
            min_time_delta_ms: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// Vertical direction of a drag relative to its start point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Up,
    Down,
    #[default]
    None,
}

impl Direction {
    /// Direction of a vertical delta (`y` grows downward).
    #[inline]
    #[must_use]
    pub fn from_delta(delta_y: f64) -> Self {
        if delta_y > 0.0 {
            Self::Down
        } else if delta_y < 0.0 {
            Self::Up
        } else {
            Self::None
        }
    }

    /// `+1.0` for down, `-1.0` for up, `0.0` for none.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Down => 1.0,
            Self::Up => -1.0,
            Self::None => 0.0,
        }
    }
}

/// Which part of the sheet claimed a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureOwner {
    #[default]
    None,
    /// Started on the drag handle.
    Handle,
    /// Claimed after content scroll was exhausted at its bottom edge.
    ContentEdge,
    /// Started on the sheet body (collapsed strip or expanded top band).
    Container,
}

/// Outcome of asking whether a session should be captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureDecision {
    /// Claim the gesture for the sheet.
    Capture(CaptureOwner),
    /// Let the gesture pass through to content scroll or the host.
    Yield,
    /// Not decidable yet; ask again on the next move.
    Defer,
}

impl CaptureDecision {
    /// Whether this decision claims the gesture.
    #[inline]
    #[must_use]
    pub const fn capture(self) -> bool {
        matches!(self, Self::Capture(_))
    }
}

/// How a session terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndKind {
    /// `touchend`: the finger was lifted.
    Released,
    /// `touchcancel` or teardown: never commits.
    Cancelled,
}

/// Deterministic reason why an incoming touch event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoredReason {
    /// Start/move/end carried zero touch points.
    NoTouchPoints,
    /// A start arrived while a session was already in flight.
    SessionAlreadyActive,
    /// A move/end/cancel arrived with no session in flight.
    NoActiveSession,
    /// The owning component has been torn down.
    TornDown,
}

/// One structured sample of an in-flight or finished gesture.
///
/// Immutable once emitted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureFrame {
    /// `false` only for the final frame of a session.
    pub active: bool,
    pub direction: Direction,
    /// Absolute vertical distance from the start point (px).
    pub distance: f64,
    /// Velocity magnitude of the most recent segment (px/ms).
    pub velocity: f64,
    /// Direction of the most recent segment. May differ from `direction`
    /// when the finger reverses.
    pub velocity_direction: Direction,
    /// `velocity * distance`.
    pub momentum: f64,
}

impl GestureFrame {
    fn new(active: bool, delta_y: f64, velocity: f64) -> Self {
        let distance = delta_y.abs();
        let velocity_direction = Direction::from_delta(velocity);
        let velocity = velocity.abs();
        Self {
            active,
            direction: Direction::from_delta(delta_y),
            distance,
            velocity,
            velocity_direction,
            momentum: velocity * distance,
        }
    }

    /// Signed vertical offset from the start point (positive = downward).
    #[inline]
    #[must_use]
    pub fn signed_offset(&self) -> f64 {
        self.direction.sign() * self.distance
    }
}

// ---------------------------------------------------------------------------
// DragSession
// ---------------------------------------------------------------------------

/// Ephemeral state of one touch sequence.
///
/// Created at `touchstart`, advanced by pure functions that return a new
/// value, and discarded at `touchend`/`touchcancel`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub start_y: f64,
    pub start_time: Duration,
    pub last_y: f64,
    pub last_time: Duration,
    /// Signed velocity of the most recent segment (px/ms).
    pub velocity: f64,
    pub captured_by: CaptureOwner,
    pub has_exceeded_move_threshold: bool,
    /// The capture decision is still outstanding.
    pub deferred: bool,
}

impl DragSession {
    /// Begin a session at the given touch point.
    #[must_use]
    pub const fn begin(point: TouchPoint, at: Duration) -> Self {
        Self {
            start_y: point.client_y,
            start_time: at,
            last_y: point.client_y,
            last_time: at,
            velocity: 0.0,
            captured_by: CaptureOwner::None,
            has_exceeded_move_threshold: false,
            deferred: false,
        }
    }

    /// Apply a capture decision.
    #[must_use]
    pub const fn decided(mut self, decision: CaptureDecision) -> Self {
        match decision {
            CaptureDecision::Capture(owner) => {
                self.captured_by = owner;
                self.deferred = false;
            }
            CaptureDecision::Yield => {
                self.captured_by = CaptureOwner::None;
                self.deferred = false;
            }
            CaptureDecision::Defer => {
                self.deferred = true;
            }
        }
        self
    }

    /// Advance by one sample, returning the new session and its frame.
    #[must_use]
    pub fn advance(self, y: f64, at: Duration, config: &GestureConfig) -> (Self, GestureFrame) {
        let elapsed_ms = at.saturating_sub(self.last_time).as_secs_f64() * 1000.0;
        let dt = elapsed_ms.max(config.min_time_delta_ms.max(f64::MIN_POSITIVE));
        let velocity = (y - self.last_y) / dt;
        let delta_y = y - self.start_y;

        let next = Self {
            last_y: y,
            last_time: at,
            velocity,
            has_exceeded_move_threshold: self.has_exceeded_move_threshold
                || delta_y.abs() > config.tap_slop_px,
            ..self
        };
        (next, GestureFrame::new(true, delta_y, velocity))
    }

    /// The final, inactive frame of this session.
    #[must_use]
    pub fn final_frame(&self) -> GestureFrame {
        GestureFrame::new(false, self.offset(), self.velocity)
    }

    /// Signed offset of the last sample from the start (positive = downward).
    #[inline]
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.last_y - self.start_y
    }

    #[inline]
    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured_by != CaptureOwner::None
    }

    /// Session duration so far.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.last_time.saturating_sub(self.start_time)
    }
}

// ---------------------------------------------------------------------------
// Callbacks and responses
// ---------------------------------------------------------------------------

/// Consumer side of a [`GestureTracker`].
///
/// This is the onStart/onMove/onEnd triple: the tracker asks for a capture
/// decision once, streams frames, and always reports the end.
pub trait GestureCallbacks {
    /// Decide at `touchstart`. Called once per session.
    fn on_start(&mut self, event: &TouchEvent, session: &DragSession) -> CaptureDecision;

    /// Resolve a deferred decision. Called on each move until it returns
    /// something other than [`CaptureDecision::Defer`].
    fn on_deferred(
        &mut self,
        _event: &TouchEvent,
        _session: &DragSession,
        _frame: &GestureFrame,
    ) -> CaptureDecision {
        CaptureDecision::Yield
    }

    /// A move frame, after any deferred decision for this move was applied.
    fn on_move(&mut self, session: &DragSession, frame: &GestureFrame);

    /// The session ended or was cancelled. Always called exactly once.
    fn on_end(&mut self, session: &DragSession, frame: &GestureFrame, kind: EndKind);
}

/// Listener registration options for the host's touch listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerOptions {
    /// `passive: false` is required for `preventDefault` to take effect.
    pub passive: bool,
}

impl ListenerOptions {
    /// Options for a surface that may or may not ever capture.
    #[must_use]
    pub const fn for_capture(capture_possible: bool) -> Self {
        Self {
            passive: !capture_possible,
        }
    }
}

/// What the host should do with the native event after tracking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerResponse {
    pub phase: TouchPhase,
    pub prevent_default: bool,
    pub stop_propagation: bool,
    /// Whether the session is captured after this event.
    pub captured: bool,
    pub frame: Option<GestureFrame>,
    pub ignored: Option<IgnoredReason>,
}

impl TrackerResponse {
    fn ignored(phase: TouchPhase, reason: IgnoredReason) -> Self {
        Self {
            phase,
            prevent_default: false,
            stop_propagation: false,
            captured: false,
            frame: None,
            ignored: Some(reason),
        }
    }

    fn handled(phase: TouchPhase, captured: bool, frame: Option<GestureFrame>) -> Self {
        Self {
            phase,
            prevent_default: captured && phase != TouchPhase::Start,
            stop_propagation: captured,
            captured,
            frame,
            ignored: None,
        }
    }
}

// ---------------------------------------------------------------------------
// GestureTracker
// ---------------------------------------------------------------------------

/// Stateful touch tracker. Holds at most one [`DragSession`].
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    config: GestureConfig,
    session: Option<DragSession>,
}

impl GestureTracker {
    /// Create a new tracker with the given configuration.
    #[must_use]
    pub const fn new(config: GestureConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// The in-flight session, if any.
    #[inline]
    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Whether a session is in flight.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Process one touch event.
    pub fn handle<C: GestureCallbacks>(
        &mut self,
        event: &TouchEvent,
        callbacks: &mut C,
    ) -> TrackerResponse {
        match event.phase {
            TouchPhase::Start => self.on_touch_start(event, callbacks),
            TouchPhase::Move => self.on_touch_move(event, callbacks),
            TouchPhase::End => self.on_touch_end(event, callbacks, EndKind::Released),
            TouchPhase::Cancel => self.on_touch_end(event, callbacks, EndKind::Cancelled),
        }
    }

    /// Terminate any in-flight session as cancelled without a native event.
    ///
    /// Returns `true` if a session was active.
    pub fn abort<C: GestureCallbacks>(&mut self, callbacks: &mut C) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        tracing::debug!(
            target: "swipesheet.gesture",
            captured = session.is_captured(),
            "session aborted"
        );
        callbacks.on_end(&session, &session.final_frame(), EndKind::Cancelled);
        true
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl GestureTracker {
    fn on_touch_start<C: GestureCallbacks>(
        &mut self,
        event: &TouchEvent,
        callbacks: &mut C,
    ) -> TrackerResponse {
        if self.session.is_some() {
            tracing::debug!(target: "swipesheet.gesture", "touchstart ignored: session already active");
            return TrackerResponse::ignored(event.phase, IgnoredReason::SessionAlreadyActive);
        }
        let Some(point) = event.primary() else {
            return TrackerResponse::ignored(event.phase, IgnoredReason::NoTouchPoints);
        };

        let session = DragSession::begin(point, event.timestamp);
        let decision = callbacks.on_start(event, &session);
        let session = session.decided(decision);
        tracing::debug!(
            target: "swipesheet.gesture",
            start_y = point.client_y,
            decision = ?decision,
            "session started"
        );
        self.session = Some(session);
        TrackerResponse::handled(event.phase, session.is_captured(), None)
    }

    fn on_touch_move<C: GestureCallbacks>(
        &mut self,
        event: &TouchEvent,
        callbacks: &mut C,
    ) -> TrackerResponse {
        let Some(session) = self.session else {
            return TrackerResponse::ignored(event.phase, IgnoredReason::NoActiveSession);
        };
        let Some(point) = event.primary() else {
            return TrackerResponse::ignored(event.phase, IgnoredReason::NoTouchPoints);
        };

        let (mut session, frame) = session.advance(point.client_y, event.timestamp, &self.config);
        if session.deferred {
            let decision = callbacks.on_deferred(event, &session, &frame);
            session = session.decided(decision);
            if !session.deferred {
                tracing::debug!(
                    target: "swipesheet.gesture",
                    decision = ?decision,
                    offset = session.offset(),
                    "deferred capture resolved"
                );
            }
        }
        self.session = Some(session);
        callbacks.on_move(&session, &frame);
        TrackerResponse::handled(event.phase, session.is_captured(), Some(frame))
    }

    fn on_touch_end<C: GestureCallbacks>(
        &mut self,
        event: &TouchEvent,
        callbacks: &mut C,
        kind: EndKind,
    ) -> TrackerResponse {
        let Some(mut session) = self.session else {
            return TrackerResponse::ignored(event.phase, IgnoredReason::NoActiveSession);
        };
        if kind == EndKind::Released {
            let Some(point) = event.primary() else {
                return TrackerResponse::ignored(event.phase, IgnoredReason::NoTouchPoints);
            };
            // A lift at the last sampled position keeps the last segment's velocity.
            if point.client_y != session.last_y {
                session = session
                    .advance(point.client_y, event.timestamp, &self.config)
                    .0;
            }
        }

        self.session = None;
        let frame = session.final_frame();
        tracing::debug!(
            target: "swipesheet.gesture",
            kind = ?kind,
            distance = frame.distance,
            velocity = frame.velocity,
            captured = session.is_captured(),
            "session ended"
        );
        callbacks.on_end(&session, &frame, kind);
        TrackerResponse::handled(event.phase, session.is_captured(), Some(frame))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
