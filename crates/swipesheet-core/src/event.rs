#![forbid(unsafe_code)]

//! Canonical touch event types.
//!
//! Hosts translate their native touch events into [`TouchEvent`] values before
//! handing them to a [`Sheet`](crate::sheet::Sheet).
//!
//! # Design Notes
//!
//! - Coordinates are viewport CSS pixels (`clientX`/`clientY`).
//! - Timestamps are monotonic host time (e.g. `performance.now()`), carried as
//!   a [`Duration`] since an arbitrary host epoch.
//! - The event target is pre-resolved by the host into [`TargetFlags`]: the
//!   host walks the target's ancestors once and sets a flag for every role it
//!   finds, so "descendant of the handle" is just `HANDLE`.

use std::time::Duration;

use bitflags::bitflags;

use crate::geometry::Point;

/// Lifecycle phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// `touchstart`
    Start,
    /// `touchmove`
    Move,
    /// `touchend`
    End,
    /// `touchcancel` (platform interruption)
    Cancel,
}

impl TouchPhase {
    /// DOM event name for this phase.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Start => "touchstart",
            Self::Move => "touchmove",
            Self::End => "touchend",
            Self::Cancel => "touchcancel",
        }
    }
}

/// One contact point of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    pub client_x: f64,
    pub client_y: f64,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }

    /// The point as a geometry value.
    #[inline]
    #[must_use]
    pub const fn to_point(self) -> Point {
        Point::new(self.client_x, self.client_y)
    }
}

bitflags! {
    /// Roles found on the event target or any of its ancestors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TargetFlags: u8 {
        /// No recognised role (outside the sheet).
        const NONE        = 0b0_0000;
        /// The drag handle region.
        const HANDLE      = 0b0_0001;
        /// A button, input, or other interactive control.
        const INTERACTIVE = 0b0_0010;
        /// Explicitly marked non-draggable.
        const NO_DRAG     = 0b0_0100;
        /// The scrollable content region.
        const CONTENT     = 0b0_1000;
        /// The sheet container itself.
        const SHEET       = 0b1_0000;
    }
}

impl Default for TargetFlags {
    fn default() -> Self {
        Self::NONE
    }
}

impl TargetFlags {
    /// Whether the target must keep tap semantics and never start a drag.
    #[inline]
    #[must_use]
    pub const fn is_tap_only(self) -> bool {
        self.intersects(Self::INTERACTIVE.union(Self::NO_DRAG))
    }
}

/// A touch event as delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    /// Active contact points. For `End`/`Cancel` hosts pass the changed touches.
    pub touches: Vec<TouchPoint>,
    pub timestamp: Duration,
    pub target: TargetFlags,
}

impl TouchEvent {
    /// Create an event with no touch points and no target roles.
    #[must_use]
    pub fn new(phase: TouchPhase, timestamp: Duration) -> Self {
        Self {
            phase,
            touches: Vec::new(),
            timestamp,
            target: TargetFlags::NONE,
        }
    }

    /// Create an event from a host timestamp in (fractional) milliseconds.
    #[must_use]
    pub fn at_ms(phase: TouchPhase, timestamp_ms: f64) -> Self {
        let timestamp = Duration::try_from_secs_f64(timestamp_ms.max(0.0) / 1000.0)
            .unwrap_or(Duration::MAX);
        Self::new(phase, timestamp)
    }

    /// Add a contact point (builder pattern).
    #[must_use]
    pub fn with_touch(mut self, client_x: f64, client_y: f64) -> Self {
        self.touches.push(TouchPoint::new(client_x, client_y));
        self
    }

    /// Set the resolved target roles (builder pattern).
    #[must_use]
    pub const fn with_target(mut self, target: TargetFlags) -> Self {
        self.target = target;
        self
    }

    /// The first contact point, if any. Only the primary touch drives a sheet.
    #[inline]
    #[must_use]
    pub fn primary(&self) -> Option<TouchPoint> {
        self.touches.first().copied()
    }

    /// Host timestamp in milliseconds.
    #[inline]
    #[must_use]
    pub fn timestamp_ms(&self) -> f64 {
        self.timestamp.as_secs_f64() * 1000.0
    }
}
