//! Benchmark: per-touchmove cost of a captured sheet session.
//!
//! Run with: `cargo bench -p swipesheet-core --bench touch_move_bench`
//!
//! Native touch cadence is tens to a few hundred events per second, so the
//! captured move path (tracker advance, resistance, haptic edge check) must
//! stay flat regardless of how long the session has run.

use std::hint::black_box;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use swipesheet_core::capture::SheetLayout;
use swipesheet_core::config::SheetConfig;
use swipesheet_core::coordinator::HostSwipeLock;
use swipesheet_core::event::{TargetFlags, TouchEvent, TouchPhase};
use swipesheet_core::geometry::{Rect, ScrollMetrics};
use swipesheet_core::host::NoHost;
use swipesheet_core::position::SheetPosition;
use swipesheet_core::resistance::ResistanceProfile;
use swipesheet_core::sheet::{Sheet, SheetProps};

fn layout() -> SheetLayout {
    SheetLayout::new(
        Rect::new(0.0, 400.0, 390.0, 444.0),
        ScrollMetrics::new(0.0, 300.0, 900.0),
    )
}

fn captured_sheet() -> Sheet {
    let mut sheet = Sheet::with_config(
        SheetProps::new(SheetPosition::Expanded),
        Rc::new(NoHost),
        SheetConfig::default(),
        HostSwipeLock::new(),
    );
    let start = TouchEvent::at_ms(TouchPhase::Start, 0.0)
        .with_touch(100.0, 410.0)
        .with_target(TargetFlags::HANDLE);
    sheet.handle_touch(&start, &layout());
    sheet
}

fn bench_captured_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("touch_move");
    let layout = layout();

    group.bench_function("captured_move", |b| {
        let mut sheet = captured_sheet();
        let mut t = 0.0;
        b.iter(|| {
            t += 16.0;
            let y = 410.0 + (t % 400.0);
            let event = TouchEvent::at_ms(TouchPhase::Move, t)
                .with_touch(100.0, y)
                .with_target(TargetFlags::HANDLE);
            black_box(sheet.handle_touch(black_box(&event), &layout))
        });
    });

    group.bench_function("full_session_60_moves", |b| {
        b.iter_batched(
            captured_sheet,
            |mut sheet| {
                for i in 1..=60 {
                    let t = f64::from(i) * 16.0;
                    let event = TouchEvent::at_ms(TouchPhase::Move, t)
                        .with_touch(100.0, 410.0 + f64::from(i) * 3.0)
                        .with_target(TargetFlags::HANDLE);
                    black_box(sheet.handle_touch(&event, &layout));
                }
                let end = TouchEvent::at_ms(TouchPhase::End, 976.0).with_touch(100.0, 590.0);
                black_box(sheet.handle_touch(&end, &layout))
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_resistance(c: &mut Criterion) {
    let profile = ResistanceProfile::default();
    c.bench_function("resistance_apply", |b| {
        let mut raw = -600.0;
        b.iter(|| {
            raw = if raw > 600.0 { -600.0 } else { raw + 1.7 };
            black_box(profile.apply(black_box(SheetPosition::Collapsed), black_box(raw)))
        });
    });
}

criterion_group!(benches, bench_captured_move, bench_resistance);
criterion_main!(benches);
