#![forbid(unsafe_code)]

//! The sheet component: tracker, arbiter, position model, host coordination
//! and haptics wired behind one touch entry point.
//!
//! A host creates one [`Sheet`] per mounted panel, forwards every native
//! touch event to [`Sheet::handle_touch`] together with a fresh
//! [`SheetLayout`], applies the returned [`SheetDispatch`] to the native
//! event, and renders [`Sheet::transform`] each frame after calling
//! [`Sheet::advance`].
//!
//! Position is private state. The only way to observe a change is the
//! `on_position_change` callback in [`SheetProps`] (or polling
//! [`Sheet::position`]).
//!
//! Dropping a `Sheet` tears it down: an in-flight session is cancelled and
//! the host swipe lock is released.

use std::rc::Rc;
use std::time::Duration;

use crate::capture::{CaptureArbiter, CaptureContext, SheetLayout};
use crate::config::SheetConfig;
use crate::coordinator::{HostSwipeCoordinator, HostSwipeLock};
use crate::event::{TouchEvent, TouchPhase, TouchPoint};
use crate::geometry::Point;
use crate::gesture::{
    CaptureDecision, DragSession, EndKind, GestureCallbacks, GestureFrame, GestureTracker,
    IgnoredReason, ListenerOptions,
};
use crate::haptics::HapticDispatcher;
use crate::host::HostGestureApi;
use crate::position::{CommitOutcome, PositionController, SheetPosition, SheetTransform};

/// Position-change callback.
pub type PositionCallback = Box<dyn FnMut(SheetPosition)>;

/// Component props.
pub struct SheetProps {
    pub initial_position: SheetPosition,
    pub on_position_change: Option<PositionCallback>,
}

impl SheetProps {
    #[must_use]
    pub fn new(initial_position: SheetPosition) -> Self {
        Self {
            initial_position,
            on_position_change: None,
        }
    }

    #[must_use]
    pub fn on_position_change(mut self, callback: impl FnMut(SheetPosition) + 'static) -> Self {
        self.on_position_change = Some(Box::new(callback));
        self
    }
}

impl std::fmt::Debug for SheetProps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetProps")
            .field("initial_position", &self.initial_position)
            .field("on_position_change", &self.on_position_change.is_some())
            .finish()
    }
}

/// What the host should do with one native touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetDispatch {
    pub phase: TouchPhase,
    /// Call `preventDefault()` on the native event.
    pub prevent_default: bool,
    /// Call `stopPropagation()` on the native event.
    pub stop_propagation: bool,
    /// Whether the sheet owns the session after this event.
    pub captured: bool,
    pub frame: Option<GestureFrame>,
    /// Set on the event that ended a captured session.
    pub outcome: Option<CommitOutcome>,
    pub ignored: Option<IgnoredReason>,
}

impl SheetDispatch {
    fn ignored(phase: TouchPhase, reason: IgnoredReason) -> Self {
        Self {
            phase,
            prevent_default: false,
            stop_propagation: false,
            captured: false,
            frame: None,
            outcome: None,
            ignored: Some(reason),
        }
    }
}

struct SheetCore {
    arbiter: CaptureArbiter,
    controller: PositionController,
    coordinator: HostSwipeCoordinator,
    haptics: HapticDispatcher,
    on_position_change: Option<PositionCallback>,
    layout: SheetLayout,
    outcome: Option<CommitOutcome>,
}

impl SheetCore {
    fn context(&self, event: &TouchEvent, session: &DragSession) -> CaptureContext {
        let touch = event
            .primary()
            .map_or_else(|| Point::new(0.0, session.last_y), TouchPoint::to_point);
        CaptureContext {
            target: event.target,
            position: self.controller.position(),
            touch,
            layout: self.layout,
        }
    }

    fn begin_capture(&mut self) {
        self.controller.begin_tracking();
        self.haptics.begin_session();
        self.coordinator.disable();
    }
}

impl GestureCallbacks for SheetCore {
    fn on_start(&mut self, event: &TouchEvent, session: &DragSession) -> CaptureDecision {
        let ctx = self.context(event, session);
        let decision = self.arbiter.decide_at_start(&ctx);
        tracing::debug!(
            target: "swipesheet.capture",
            position = ?ctx.position,
            target_flags = ?ctx.target,
            touch_y = ctx.touch.y,
            decision = ?decision,
            "capture decided at start"
        );
        if decision.capture() {
            self.begin_capture();
        }
        decision
    }

    fn on_deferred(
        &mut self,
        event: &TouchEvent,
        session: &DragSession,
        _frame: &GestureFrame,
    ) -> CaptureDecision {
        let ctx = self.context(event, session);
        let decision = self.arbiter.decide_deferred(&ctx, session.offset());
        if decision != CaptureDecision::Defer {
            tracing::debug!(
                target: "swipesheet.capture",
                offset = session.offset(),
                decision = ?decision,
                "content-edge capture resolved"
            );
        }
        if decision.capture() {
            self.begin_capture();
        }
        decision
    }

    fn on_move(&mut self, session: &DragSession, frame: &GestureFrame) {
        if !session.is_captured() {
            return;
        }
        self.controller.track(frame);
        self.haptics.observe_distance(frame.distance);
    }

    fn on_end(&mut self, session: &DragSession, frame: &GestureFrame, kind: EndKind) {
        if session.is_captured() {
            let outcome = self
                .controller
                .finish(frame, kind, session.has_exceeded_move_threshold);
            match outcome {
                CommitOutcome::Committed { from, to, rule } => {
                    tracing::debug!(
                        target: "swipesheet.sheet",
                        from = ?from,
                        to = ?to,
                        rule = ?rule,
                        "position committed"
                    );
                    self.haptics.on_commit(to);
                    if let Some(callback) = self.on_position_change.as_mut() {
                        callback(to);
                    }
                }
                CommitOutcome::Settled => {
                    tracing::debug!(
                        target: "swipesheet.sheet",
                        kind = ?kind,
                        distance = frame.distance,
                        velocity = frame.velocity,
                        "settling without commit"
                    );
                }
            }
            self.outcome = Some(outcome);
        }
        self.coordinator.enable();
    }
}

/// A mounted two-position sheet.
pub struct Sheet {
    tracker: GestureTracker,
    core: SheetCore,
    config: SheetConfig,
    torn_down: bool,
}

impl std::fmt::Debug for Sheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sheet")
            .field("position", &self.core.controller.position())
            .field("session", &self.tracker.session())
            .field("coordinator", &self.core.coordinator)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl Sheet {
    /// Mount with default tuning and the process-wide host swipe lock.
    #[must_use]
    pub fn new(props: SheetProps, host: Rc<dyn HostGestureApi>) -> Self {
        Self::with_config(props, host, SheetConfig::default(), HostSwipeLock::global())
    }

    /// Mount with explicit tuning and lock.
    #[must_use]
    pub fn with_config(
        props: SheetProps,
        host: Rc<dyn HostGestureApi>,
        config: SheetConfig,
        lock: HostSwipeLock,
    ) -> Self {
        let core = SheetCore {
            arbiter: CaptureArbiter::new(config.capture),
            controller: PositionController::new(
                props.initial_position,
                config.resistance,
                config.commit,
                config.layout,
                config.settle,
            ),
            coordinator: HostSwipeCoordinator::new(host.clone(), lock),
            haptics: HapticDispatcher::new(host, config.haptics),
            on_position_change: props.on_position_change,
            layout: SheetLayout::default(),
            outcome: None,
        };
        tracing::debug!(
            target: "swipesheet.sheet",
            initial_position = ?props.initial_position,
            "sheet mounted"
        );
        Self {
            tracker: GestureTracker::new(config.gesture),
            core,
            config,
            torn_down: false,
        }
    }

    /// Process one native touch event.
    pub fn handle_touch(&mut self, event: &TouchEvent, layout: &SheetLayout) -> SheetDispatch {
        if self.torn_down {
            return SheetDispatch::ignored(event.phase, IgnoredReason::TornDown);
        }
        self.core.layout = *layout;
        self.core.outcome = None;
        let response = self.tracker.handle(event, &mut self.core);
        if let Some(reason) = response.ignored {
            tracing::debug!(
                target: "swipesheet.sheet",
                phase = event.phase.dom_name(),
                reason = ?reason,
                "touch event ignored"
            );
        }
        SheetDispatch {
            phase: response.phase,
            prevent_default: response.prevent_default,
            stop_propagation: response.stop_propagation,
            captured: response.captured,
            frame: response.frame,
            outcome: self.core.outcome.take(),
            ignored: response.ignored,
        }
    }

    /// Tick the settle/commit animation.
    pub fn advance(&mut self, dt: Duration) {
        self.core.controller.advance(dt);
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> SheetPosition {
        self.core.controller.position()
    }

    /// What to render now.
    #[must_use]
    pub fn transform(&self) -> SheetTransform {
        self.core.controller.transform()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.core.controller.is_animating()
    }

    /// Whether a touch session is in flight.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.tracker.is_active()
    }

    /// Options for registering the sheet's touch listeners.
    ///
    /// The handle is always capture-eligible, so listeners are never passive.
    #[must_use]
    pub const fn listener_options(&self) -> ListenerOptions {
        ListenerOptions::for_capture(true)
    }

    #[must_use]
    pub const fn config(&self) -> &SheetConfig {
        &self.config
    }

    #[must_use]
    pub fn host_lock(&self) -> &HostSwipeLock {
        self.core.coordinator.lock()
    }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Unmount. Cancels an in-flight session and releases the host lock.
    ///
    /// Idempotent; also run on drop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        let aborted = self.tracker.abort(&mut self.core);
        self.core.coordinator.enable();
        tracing::debug!(target: "swipesheet.sheet", aborted, "sheet torn down");
    }
}

impl Drop for Sheet {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::event::TargetFlags;
    use crate::geometry::{Rect, ScrollMetrics};
    use crate::host::{FakeHost, HapticFeedback, ImpactStyle};

    const TOP: f64 = 400.0;

    fn layout() -> SheetLayout {
        SheetLayout::new(
            Rect::new(0.0, TOP, 390.0, 444.0),
            ScrollMetrics::new(0.0, 300.0, 900.0),
        )
    }

    fn handle_event(phase: TouchPhase, y: f64, t: f64) -> TouchEvent {
        TouchEvent::at_ms(phase, t)
            .with_touch(195.0, y)
            .with_target(TargetFlags::HANDLE | TargetFlags::SHEET)
    }

    fn mount(initial: SheetPosition) -> (Sheet, Rc<FakeHost>, Rc<RefCell<Vec<SheetPosition>>>) {
        let host = Rc::new(FakeHost::new());
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        let props = SheetProps::new(initial).on_position_change(move |p| sink.borrow_mut().push(p));
        let sheet = Sheet::with_config(props, host.clone(), SheetConfig::default(), HostSwipeLock::new());
        (sheet, host, changes)
    }

    #[test]
    fn handle_drag_disables_then_restores_host_swipes() {
        let (mut sheet, host, _) = mount(SheetPosition::Expanded);
        let d = sheet.handle_touch(&handle_event(TouchPhase::Start, TOP + 10.0, 0.0), &layout());
        assert!(d.captured);
        assert!(sheet.host_lock().is_disabled());
        assert!(host.swipes_disabled());

        sheet.handle_touch(&handle_event(TouchPhase::Move, TOP + 40.0, 50.0), &layout());
        assert!(!sheet.transform().animated);
        assert_eq!(sheet.transform().translate_y, 30.0);

        let d = sheet.handle_touch(&handle_event(TouchPhase::End, TOP + 40.0, 60.0), &layout());
        assert!(d.outcome.is_some());
        assert!(!sheet.host_lock().is_disabled());
        assert!(!host.swipes_disabled());
    }

    #[test]
    fn opening_commit_fires_medium_impact_and_callback() {
        let (mut sheet, host, changes) = mount(SheetPosition::Collapsed);
        let top = TOP + 350.0;
        sheet.handle_touch(&handle_event(TouchPhase::Start, top + 5.0, 0.0), &layout());
        sheet.handle_touch(&handle_event(TouchPhase::Move, top - 55.0, 100.0), &layout());
        let d = sheet.handle_touch(&handle_event(TouchPhase::End, top - 55.0, 110.0), &layout());

        assert!(matches!(
            d.outcome,
            Some(CommitOutcome::Committed {
                to: SheetPosition::Expanded,
                ..
            })
        ));
        assert_eq!(sheet.position(), SheetPosition::Expanded);
        assert_eq!(*changes.borrow(), vec![SheetPosition::Expanded]);
        assert_eq!(
            host.haptics(),
            vec![
                HapticFeedback::Selection,
                HapticFeedback::Impact(ImpactStyle::Medium),
            ]
        );
    }

    #[test]
    fn teardown_is_idempotent_and_blocks_further_input() {
        let (mut sheet, _host, changes) = mount(SheetPosition::Expanded);
        sheet.handle_touch(&handle_event(TouchPhase::Start, TOP + 10.0, 0.0), &layout());
        sheet.handle_touch(&handle_event(TouchPhase::Move, TOP + 300.0, 20.0), &layout());
        sheet.teardown();
        sheet.teardown();
        assert!(!sheet.host_lock().is_disabled());
        assert!(changes.borrow().is_empty());
        assert_eq!(sheet.position(), SheetPosition::Expanded);

        let d = sheet.handle_touch(&handle_event(TouchPhase::Start, TOP + 10.0, 40.0), &layout());
        assert_eq!(d.ignored, Some(IgnoredReason::TornDown));
    }

    #[test]
    fn animation_settles_after_release() {
        let (mut sheet, _host, _) = mount(SheetPosition::Expanded);
        sheet.handle_touch(&handle_event(TouchPhase::Start, TOP + 10.0, 0.0), &layout());
        sheet.handle_touch(&handle_event(TouchPhase::Move, TOP + 50.0, 1000.0), &layout());
        sheet.handle_touch(&handle_event(TouchPhase::End, TOP + 50.0, 2000.0), &layout());
        assert!(sheet.transform().animated);
        assert!(sheet.is_animating());
        for _ in 0..300 {
            sheet.advance(Duration::from_millis(16));
        }
        assert!(!sheet.is_animating());
        assert_eq!(sheet.transform().translate_y, 0.0);
    }

    #[test]
    fn listeners_are_never_passive() {
        let (sheet, _host, _) = mount(SheetPosition::Collapsed);
        assert!(!sheet.listener_options().passive);
    }
}
