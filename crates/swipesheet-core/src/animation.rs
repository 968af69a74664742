#![forbid(unsafe_code)]

//! Damped spring used for settle and commit animations.
//!
//! The sheet's drag offset springs back to `0` after every gesture: from the
//! released offset on a settle, and from a re-based offset on a commit so the
//! visible edge does not jump when the resting position changes.
//!
//! Based on the classical damped spring equation:
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!
//! # Invariants
//!
//! 1. A spring at rest stays at rest; a new animation is a new spring.
//! 2. Stiffness is clamped to a positive minimum; damping to `>= 0`.
//! 3. Large `dt` values are subdivided into steps of at most 4ms.

use std::time::Duration;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

/// Offset delta (px) below which the spring is "at rest".
const DEFAULT_REST_THRESHOLD: f64 = 0.5;

/// Velocity (px/s) below which, combined with the position threshold, the
/// spring is at rest.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 5.0;

const MIN_STIFFNESS: f64 = 0.1;

/// Spring parameters for settle/commit motion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SettleConfig {
    /// Restoring force strength (default: 170).
    pub stiffness: f64,
    /// Velocity drag (default: 26).
    pub damping: f64,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            stiffness: 170.0,
            damping: 26.0,
        }
    }
}

/// A damped harmonic oscillator in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial` and targeting `target`.
    #[must_use]
    pub fn new(initial: f64, target: f64, config: SettleConfig) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            stiffness: config.stiffness.max(MIN_STIFFNESS),
            damping: config.damping.max(0.0),
            at_rest: (initial - target).abs() < DEFAULT_REST_THRESHOLD,
        }
    }

    /// Current position (unclamped).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        if self.at_rest { self.target } else { self.position }
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    fn step(&mut self, dt: f64) {
        // Semi-implicit Euler.
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`, subdividing for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }
        if (self.position - self.target).abs() < DEFAULT_REST_THRESHOLD
            && self.velocity.abs() < DEFAULT_VELOCITY_THRESHOLD
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}
