//! Property-based invariant tests for whole touch sessions against a sheet.
//!
//! 1. The host swipe lock is never left held once no session is active
//! 2. At most one position change per session
//! 3. A cancelled session never changes position
//! 4. Frames never report NaN or negative distance
//! 5. Teardown at any point releases the lock

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use swipesheet_core::capture::SheetLayout;
use swipesheet_core::config::SheetConfig;
use swipesheet_core::coordinator::HostSwipeLock;
use swipesheet_core::event::{TargetFlags, TouchEvent, TouchPhase};
use swipesheet_core::geometry::{Rect, ScrollMetrics};
use swipesheet_core::host::{FakeHost, HostCapabilities};
use swipesheet_core::position::SheetPosition;
use swipesheet_core::sheet::{Sheet, SheetProps};

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Step {
    phase: TouchPhase,
    /// `None` models a frame with zero touch points.
    y: Option<f64>,
    dt_ms: f64,
    target: TargetFlags,
    scroll_top: f64,
}

fn phase_strategy() -> impl Strategy<Value = TouchPhase> {
    prop_oneof![
        2 => Just(TouchPhase::Start),
        6 => Just(TouchPhase::Move),
        2 => Just(TouchPhase::End),
        1 => Just(TouchPhase::Cancel),
    ]
}

fn target_strategy() -> impl Strategy<Value = TargetFlags> {
    (0u8..32).prop_map(TargetFlags::from_bits_truncate)
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (
        phase_strategy(),
        prop::option::weighted(0.95, 0.0f64..900.0),
        0.0f64..120.0,
        target_strategy(),
        prop_oneof![Just(0.0), Just(100.0), Just(600.0)],
    )
        .prop_map(|(phase, y, dt_ms, target, scroll_top)| Step {
            phase,
            y,
            dt_ms,
            target,
            scroll_top,
        })
}

fn capabilities_strategy() -> impl Strategy<Value = HostCapabilities> {
    (0u8..8).prop_map(HostCapabilities::from_bits_truncate)
}

struct Rig {
    sheet: Sheet,
    lock: HostSwipeLock,
    changes: Rc<Cell<usize>>,
}

fn rig(initial: SheetPosition, caps: HostCapabilities) -> Rig {
    let host = Rc::new(FakeHost::with_capabilities(caps));
    let lock = HostSwipeLock::new();
    let changes = Rc::new(Cell::new(0));
    let counter = changes.clone();
    let props = SheetProps::new(initial).on_position_change(move |_| counter.set(counter.get() + 1));
    Rig {
        sheet: Sheet::with_config(props, host, SheetConfig::default(), lock.clone()),
        lock,
        changes,
    }
}

fn event(step: &Step, t: f64) -> TouchEvent {
    let event = TouchEvent::at_ms(step.phase, t).with_target(step.target);
    match step.y {
        Some(y) => event.with_touch(100.0, y),
        None => event,
    }
}

fn layout(scroll_top: f64) -> SheetLayout {
    SheetLayout::new(
        Rect::new(0.0, 400.0, 390.0, 444.0),
        ScrollMetrics::new(scroll_top, 300.0, 900.0),
    )
}

fn initial_strategy() -> impl Strategy<Value = SheetPosition> {
    prop_oneof![Just(SheetPosition::Collapsed), Just(SheetPosition::Expanded)]
}

// ═══════════════════════════════════════════════════════════════════════
// 1-4. Arbitrary sequences
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lock_free_whenever_idle(
        initial in initial_strategy(),
        caps in capabilities_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..200),
    ) {
        let mut rig = rig(initial, caps);
        let mut t = 0.0;
        for step in &steps {
            t += step.dt_ms;
            let d = rig.sheet.handle_touch(&event(step, t), &layout(step.scroll_top));
            if !rig.sheet.is_tracking() {
                prop_assert!(!rig.lock.is_disabled(), "lock held with no session after {:?}", step.phase);
            }
            if rig.lock.is_disabled() {
                prop_assert!(d.captured || d.ignored.is_some());
            }
            if let Some(frame) = d.frame {
                prop_assert!(frame.distance >= 0.0 && frame.distance.is_finite());
                prop_assert!(frame.velocity >= 0.0 && frame.velocity.is_finite());
            }
        }
    }

    #[test]
    fn at_most_one_change_per_session(
        initial in initial_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..200),
    ) {
        let mut rig = rig(initial, HostCapabilities::all());
        let mut t = 0.0;
        for step in &steps {
            t += step.dt_ms;
            let before = rig.changes.get();
            let was_tracking = rig.sheet.is_tracking();
            let d = rig.sheet.handle_touch(&event(step, t), &layout(step.scroll_top));
            let delta = rig.changes.get() - before;
            prop_assert!(delta <= 1);
            if delta == 1 {
                prop_assert!(was_tracking && !rig.sheet.is_tracking());
                prop_assert_eq!(step.phase, TouchPhase::End);
                prop_assert!(d.outcome.is_some_and(|o| o.is_commit()));
            }
        }
    }

    #[test]
    fn cancel_never_changes_position(
        initial in initial_strategy(),
        ys in prop::collection::vec(0.0f64..900.0, 1..40),
    ) {
        let mut rig = rig(initial, HostCapabilities::all());
        let l = layout(0.0);
        let target = TargetFlags::HANDLE;
        rig.sheet.handle_touch(
            &TouchEvent::at_ms(TouchPhase::Start, 0.0).with_touch(100.0, 450.0).with_target(target),
            &l,
        );
        for (i, y) in ys.iter().enumerate() {
            let t = (i as f64 + 1.0) * 4.0;
            rig.sheet.handle_touch(
                &TouchEvent::at_ms(TouchPhase::Move, t).with_touch(100.0, *y).with_target(target),
                &l,
            );
        }
        rig.sheet.handle_touch(&TouchEvent::at_ms(TouchPhase::Cancel, 1_000.0), &l);
        prop_assert_eq!(rig.sheet.position(), initial);
        prop_assert_eq!(rig.changes.get(), 0);
        prop_assert!(!rig.lock.is_disabled());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Teardown at any point
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn drop_anywhere_releases_lock(
        initial in initial_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..100),
        cut in 0usize..100,
    ) {
        let rig = rig(initial, HostCapabilities::all());
        let Rig { mut sheet, lock, changes } = rig;
        let mut t = 0.0;
        for step in steps.iter().take(cut) {
            t += step.dt_ms;
            sheet.handle_touch(&event(step, t), &layout(step.scroll_top));
        }
        let before = changes.get();
        drop(sheet);
        prop_assert!(!lock.is_disabled());
        prop_assert_eq!(changes.get(), before);
    }
}
