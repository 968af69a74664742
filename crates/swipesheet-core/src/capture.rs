#![forbid(unsafe_code)]

//! Capture arbitration between the sheet, its scrollable content, and the host.
//!
//! [`CaptureArbiter`] is a pure decision function. It is consulted once at
//! `touchstart` and, only when that answer is [`CaptureDecision::Defer`], on
//! subsequent moves until the content-edge dead zone is left. Either way the
//! session receives exactly one final decision.
//!
//! # Rules (in order)
//!
//! 1. Target inside the drag handle: capture.
//! 2. Target is an interactive or non-draggable control: yield, whatever the
//!    position, so taps stay taps.
//! 3. Collapsed: capture anywhere inside the sheet's bounding box.
//! 4. Expanded: capture only within the top band below the sheet's top edge.
//! 5. Expanded, outside the band, content already at its bottom edge: defer
//!    until the drag has moved past the dead zone; a downward drag is then
//!    captured, anything else yields.
//!
//! Everything else yields.

use crate::event::TargetFlags;
use crate::geometry::{Point, Rect, ScrollMetrics};
use crate::gesture::{CaptureDecision, CaptureOwner};
use crate::position::SheetPosition;

/// Thresholds for capture arbitration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CaptureConfig {
    /// Height of the draggable band below the expanded sheet's top edge (default: 60).
    pub top_band_px: f64,
    /// Movement required before a content-edge decision is made (default: 10).
    pub content_dead_zone_px: f64,
    /// Rounding tolerance for the content bottom-edge test (default: 1).
    pub bottom_edge_tolerance_px: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            top_band_px: 60.0,
            content_dead_zone_px: 10.0,
            bottom_edge_tolerance_px: 1.0,
        }
    }
}

/// Layout snapshot supplied by the host with every touch event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SheetLayout {
    /// The sheet's bounding client rect.
    pub sheet: Rect,
    /// Scroll state of the content region.
    pub content: ScrollMetrics,
}

impl SheetLayout {
    #[must_use]
    pub const fn new(sheet: Rect, content: ScrollMetrics) -> Self {
        Self { sheet, content }
    }
}

/// Inputs to one capture decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureContext {
    pub target: TargetFlags,
    pub position: SheetPosition,
    pub touch: Point,
    pub layout: SheetLayout,
}

/// Pure capture decision function.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CaptureArbiter {
    config: CaptureConfig,
}

impl CaptureArbiter {
    #[must_use]
    pub const fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Decide at `touchstart`.
    #[must_use]
    pub fn decide_at_start(&self, ctx: &CaptureContext) -> CaptureDecision {
        if ctx.target.contains(TargetFlags::HANDLE) {
            return CaptureDecision::Capture(CaptureOwner::Handle);
        }
        if ctx.target.is_tap_only() {
            return CaptureDecision::Yield;
        }
        let inside = self.inside_sheet(ctx);
        match ctx.position {
            SheetPosition::Collapsed if inside => CaptureDecision::Capture(CaptureOwner::Container),
            SheetPosition::Collapsed => CaptureDecision::Yield,
            SheetPosition::Expanded => {
                let from_top = ctx.touch.y - ctx.layout.sheet.top();
                if inside && (0.0..self.config.top_band_px).contains(&from_top) {
                    CaptureDecision::Capture(CaptureOwner::Container)
                } else if inside && self.content_exhausted(ctx) {
                    CaptureDecision::Defer
                } else {
                    CaptureDecision::Yield
                }
            }
        }
    }

    /// Resolve a deferred decision given the drag's signed offset so far
    /// (positive = downward).
    ///
    /// Scroll metrics are re-read from `ctx` because content may have
    /// scrolled inside the dead zone.
    #[must_use]
    pub fn decide_deferred(&self, ctx: &CaptureContext, offset: f64) -> CaptureDecision {
        if ctx.position != SheetPosition::Expanded || !self.content_exhausted(ctx) {
            return CaptureDecision::Yield;
        }
        let dead_zone = self.config.content_dead_zone_px;
        if offset > dead_zone {
            CaptureDecision::Capture(CaptureOwner::ContentEdge)
        } else if offset < -dead_zone {
            CaptureDecision::Yield
        } else {
            CaptureDecision::Defer
        }
    }

    fn inside_sheet(&self, ctx: &CaptureContext) -> bool {
        ctx.target.intersects(TargetFlags::SHEET | TargetFlags::CONTENT)
            || ctx.layout.sheet.contains(ctx.touch)
    }

    fn content_exhausted(&self, ctx: &CaptureContext) -> bool {
        ctx.layout
            .content
            .is_at_bottom(self.config.bottom_edge_tolerance_px)
    }
}
