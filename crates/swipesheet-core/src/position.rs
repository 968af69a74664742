#![forbid(unsafe_code)]

//! Two-state position model and the commit algorithm.
//!
//! [`PositionController`] owns the sheet's [`SheetPosition`] and its
//! provisional drag offset. While a captured gesture is tracked, every frame
//! replaces the offset with the [`ResistanceProfile`] output. At gesture end
//! [`decide_commit`] picks between a state change and a settle.
//!
//! # Commit rules (in order)
//!
//! 1. **Fast flick**: velocity above the threshold in the valid direction,
//!    with the last segment moving that way too.
//! 2. **Slow drag**: distance above the halfway threshold in the valid direction.
//! 3. Otherwise settle back to offset `0` without a state change.
//!
//! The valid direction is downward while expanded and upward while
//! collapsed. A drag the other way can never change state.
//!
//! # Invariants
//!
//! 1. [`PositionController::finish`] is the only code path that mutates the
//!    position.
//! 2. A cancelled gesture never commits.
//! 3. The rendered edge is continuous across a commit: the offset is re-based
//!    onto the new resting position before it springs to `0`.

use std::time::Duration;

use crate::animation::{SettleConfig, Spring};
use crate::gesture::{Direction, EndKind, GestureFrame};
use crate::resistance::ResistanceProfile;

/// Resting position of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SheetPosition {
    Collapsed,
    Expanded,
}

impl SheetPosition {
    /// The other resting position.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }

    /// The only drag direction that can leave this position.
    #[inline]
    #[must_use]
    pub const fn transition_direction(self) -> Direction {
        match self {
            Self::Collapsed => Direction::Up,
            Self::Expanded => Direction::Down,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_expanded(self) -> bool {
        matches!(self, Self::Expanded)
    }
}

/// Thresholds for the commit algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CommitConfig {
    /// Release velocity (px/ms) above which a flick commits (default: 0.2).
    pub velocity_threshold: f64,
    /// Drag distance (px) above which a slow drag commits (default: 120).
    pub distance_threshold_px: f64,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            velocity_threshold: 0.2,
            distance_threshold_px: 120.0,
        }
    }
}

/// Resting translation of each position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// `translateY` of the collapsed sheet relative to expanded (default: 350).
    pub collapsed_offset_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            collapsed_offset_px: 350.0,
        }
    }
}

impl LayoutConfig {
    /// Base `translateY` for a resting position.
    #[inline]
    #[must_use]
    pub fn base_offset(&self, position: SheetPosition) -> f64 {
        match position {
            SheetPosition::Expanded => 0.0,
            SheetPosition::Collapsed => self.collapsed_offset_px,
        }
    }
}

/// Which rule produced a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitRule {
    FastFlick,
    SlowDrag,
}

/// Result of ending a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitOutcome {
    /// The position changed.
    Committed {
        from: SheetPosition,
        to: SheetPosition,
        rule: CommitRule,
    },
    /// No state change; the offset animates back to `0`.
    Settled,
}

impl CommitOutcome {
    #[inline]
    #[must_use]
    pub const fn is_commit(self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Pure commit decision for a released gesture.
#[must_use]
pub fn decide_commit(
    position: SheetPosition,
    frame: &GestureFrame,
    config: &CommitConfig,
) -> Option<CommitRule> {
    if frame.direction != position.transition_direction() {
        return None;
    }
    let flick = frame.velocity_direction == frame.direction;
    if flick && frame.velocity > config.velocity_threshold {
        Some(CommitRule::FastFlick)
    } else if frame.distance > config.distance_threshold_px {
        Some(CommitRule::SlowDrag)
    } else {
        None
    }
}

/// Visual state to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetTransform {
    /// `translateY` in px: base of the resting position plus the drag offset.
    pub translate_y: f64,
    /// Whether CSS transitions should be enabled. Off while a gesture is captured.
    pub animated: bool,
}

/// Owner of the position model.
#[derive(Debug, Clone)]
pub struct PositionController {
    position: SheetPosition,
    drag_offset: f64,
    tracking: bool,
    settle: Option<Spring>,
    resistance: ResistanceProfile,
    commit: CommitConfig,
    layout: LayoutConfig,
    settle_config: SettleConfig,
}

impl PositionController {
    #[must_use]
    pub fn new(
        initial: SheetPosition,
        resistance: ResistanceProfile,
        commit: CommitConfig,
        layout: LayoutConfig,
        settle_config: SettleConfig,
    ) -> Self {
        Self {
            position: initial,
            drag_offset: 0.0,
            tracking: false,
            settle: None,
            resistance,
            commit,
            layout,
            settle_config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> SheetPosition {
        self.position
    }

    /// Current provisional offset (px, positive = downward).
    #[inline]
    #[must_use]
    pub const fn drag_offset(&self) -> f64 {
        self.drag_offset
    }

    #[inline]
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Whether a settle/commit animation is still running.
    #[inline]
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.settle.is_some()
    }

    /// Enter tracking for a newly captured gesture. Interrupts any animation.
    pub fn begin_tracking(&mut self) {
        self.tracking = true;
        self.settle = None;
        self.drag_offset = 0.0;
    }

    /// Apply one captured frame.
    pub fn track(&mut self, frame: &GestureFrame) {
        if !self.tracking {
            return;
        }
        self.drag_offset = self.resistance.apply(self.position, frame.signed_offset());
    }

    /// End the tracked gesture.
    ///
    /// `moved` is false when the gesture never left the tap slop; such a
    /// gesture always settles.
    pub fn finish(&mut self, frame: &GestureFrame, kind: EndKind, moved: bool) -> CommitOutcome {
        self.tracking = false;
        let rule = match kind {
            EndKind::Released if moved => decide_commit(self.position, frame, &self.commit),
            _ => None,
        };

        let outcome = match rule {
            Some(rule) => {
                let from = self.position;
                let to = from.opposite();
                let visible = self.layout.base_offset(from) + self.drag_offset;
                self.position = to;
                self.drag_offset = visible - self.layout.base_offset(to);
                CommitOutcome::Committed { from, to, rule }
            }
            None => CommitOutcome::Settled,
        };

        let spring = Spring::new(self.drag_offset, 0.0, self.settle_config);
        if spring.is_at_rest() {
            self.drag_offset = 0.0;
            self.settle = None;
        } else {
            self.settle = Some(spring);
        }
        outcome
    }

    /// Advance the settle/commit animation.
    pub fn advance(&mut self, dt: Duration) {
        let Some(spring) = self.settle.as_mut() else {
            return;
        };
        spring.advance(dt);
        self.drag_offset = spring.position();
        if spring.is_at_rest() {
            self.drag_offset = 0.0;
            self.settle = None;
        }
    }

    /// What to render now.
    #[must_use]
    pub fn transform(&self) -> SheetTransform {
        SheetTransform {
            translate_y: self.layout.base_offset(self.position) + self.drag_offset,
            animated: !self.tracking,
        }
    }
}
