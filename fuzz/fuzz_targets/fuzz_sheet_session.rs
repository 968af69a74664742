#![no_main]

use std::rc::Rc;
use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use swipesheet_core::capture::SheetLayout;
use swipesheet_core::config::SheetConfig;
use swipesheet_core::coordinator::HostSwipeLock;
use swipesheet_core::event::{TargetFlags, TouchEvent, TouchPhase};
use swipesheet_core::geometry::{Rect, ScrollMetrics};
use swipesheet_core::host::{FakeHost, HostCapabilities};
use swipesheet_core::position::SheetPosition;
use swipesheet_core::sheet::{Sheet, SheetProps};

#[derive(Debug, Arbitrary)]
enum Phase {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Debug, Arbitrary)]
struct Step {
    phase: Phase,
    y: Option<i16>,
    dt_ms: u8,
    target_bits: u8,
    scroll_top: u16,
    tick_ms: u8,
}

#[derive(Debug, Arbitrary)]
struct Input {
    expanded: bool,
    capability_bits: u8,
    failing_host: bool,
    steps: Vec<Step>,
}

fuzz_target!(|input: Input| {
    let host = Rc::new(FakeHost::with_capabilities(HostCapabilities::from_bits_truncate(
        input.capability_bits,
    )));
    host.set_failing(input.failing_host);
    let lock = HostSwipeLock::new();
    let initial = if input.expanded {
        SheetPosition::Expanded
    } else {
        SheetPosition::Collapsed
    };
    let mut sheet = Sheet::with_config(
        SheetProps::new(initial),
        host.clone(),
        SheetConfig::default(),
        lock.clone(),
    );

    let mut t = 0.0;
    for step in input.steps.iter().take(256) {
        t += f64::from(step.dt_ms);
        let phase = match step.phase {
            Phase::Start => TouchPhase::Start,
            Phase::Move => TouchPhase::Move,
            Phase::End => TouchPhase::End,
            Phase::Cancel => TouchPhase::Cancel,
        };
        let mut event = TouchEvent::at_ms(phase, t)
            .with_target(TargetFlags::from_bits_truncate(step.target_bits));
        if let Some(y) = step.y {
            event = event.with_touch(195.0, f64::from(y));
        }
        let layout = SheetLayout::new(
            Rect::new(0.0, 400.0, 390.0, 444.0),
            ScrollMetrics::new(f64::from(step.scroll_top), 300.0, 900.0),
        );
        let dispatch = sheet.handle_touch(&event, &layout);
        sheet.advance(Duration::from_millis(u64::from(step.tick_ms)));

        if let Some(frame) = dispatch.frame {
            assert!(frame.distance >= 0.0 && !frame.distance.is_nan());
        }
        if !sheet.is_tracking() {
            assert!(!lock.is_disabled(), "lock held with no session");
        }
    }

    drop(sheet);
    assert!(!lock.is_disabled(), "lock held after drop");
});
