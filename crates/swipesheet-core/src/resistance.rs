#![forbid(unsafe_code)]

//! Rubber-band resistance at the sheet's travel limits.
//!
//! [`ResistanceProfile::apply`] maps a raw drag offset (positive = downward)
//! to the offset actually rendered. It is a pure function of its inputs.
//!
//! | position  | raw offset           | effective offset                       |
//! |-----------|----------------------|----------------------------------------|
//! | Expanded  | `< 0`                | `0` (pinned)                           |
//! | Expanded  | `0..=L`              | `raw`                                  |
//! | Expanded  | `> L`                | `L + (raw - L) * k`                    |
//! | Collapsed | `> 0`                | `raw * k`                              |
//! | Collapsed | `-L..=0`             | `raw`                                  |
//! | Collapsed | `< -L`               | `-L + (raw + L) * k`                   |
//!
//! with `L = linear_limit_px` and `k = damping`. Both joints at `±L` are
//! continuous, and the open-direction branches are monotonic for `k >= 0`.

use crate::position::SheetPosition;

/// Stateless resistance curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResistanceProfile {
    /// Offset (px) tracked 1:1 before damping starts (default: 150).
    pub linear_limit_px: f64,
    /// Fraction of movement kept past the limit (default: 0.3).
    pub damping: f64,
}

impl Default for ResistanceProfile {
    fn default() -> Self {
        Self {
            linear_limit_px: 150.0,
            damping: 0.3,
        }
    }
}

impl ResistanceProfile {
    /// Effective visual offset for `raw_offset` while resting at `position`.
    #[must_use]
    pub fn apply(&self, position: SheetPosition, raw_offset: f64) -> f64 {
        let limit = self.linear_limit_px;
        let k = self.damping;
        match position {
            SheetPosition::Expanded if raw_offset < 0.0 => 0.0,
            SheetPosition::Expanded if raw_offset <= limit => raw_offset,
            SheetPosition::Expanded => limit + (raw_offset - limit) * k,
            SheetPosition::Collapsed if raw_offset > 0.0 => raw_offset * k,
            SheetPosition::Collapsed if raw_offset >= -limit => raw_offset,
            SheetPosition::Collapsed => -limit + (raw_offset + limit) * k,
        }
    }
}
