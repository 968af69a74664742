#![forbid(unsafe_code)]

//! Host native vertical-swipe coordination.
//!
//! While a captured session is live the host's own vertical swipe (for
//! example "minimize the mini-app") must be off, and it must come back on no
//! matter how the session ends: release, platform cancel, or the sheet being
//! torn down mid-drag.
//!
//! [`HostSwipeLock`] is the one piece of state shared between sheet
//! instances. By default every [`HostSwipeCoordinator`] uses the process-wide
//! lock from [`HostSwipeLock::global`]; tests build isolated locks with
//! [`HostSwipeLock::new`].
//!
//! # Invariants
//!
//! 1. The lock is set only by a coordinator whose disable call succeeded, and
//!    only that coordinator clears it.
//! 2. `disable()` while holding and `enable()` while not holding are no-ops.
//! 3. Missing capabilities and failed host calls are logged at `warn` and
//!    never surface as errors.

use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use crate::host::{HostCapabilities, HostGestureApi};

static GLOBAL_LOCK: LazyLock<HostSwipeLock> = LazyLock::new(HostSwipeLock::new);

/// Shared "host swipes are disabled" flag.
#[derive(Debug, Clone, Default)]
pub struct HostSwipeLock(Arc<AtomicBool>);

impl HostSwipeLock {
    /// A fresh, unshared lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the process-wide lock.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_LOCK.clone()
    }

    /// Whether host swipes are currently disabled by some sheet.
    #[inline]
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Set the flag if it was clear. Returns `true` on success.
    fn try_acquire(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn release(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Toggles the host's native vertical swipe in lock-step with capture.
pub struct HostSwipeCoordinator {
    host: Rc<dyn HostGestureApi>,
    lock: HostSwipeLock,
    held: bool,
}

impl std::fmt::Debug for HostSwipeCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostSwipeCoordinator")
            .field("capabilities", &self.host.capabilities())
            .field("lock", &self.lock)
            .field("held", &self.held)
            .finish()
    }
}

impl HostSwipeCoordinator {
    #[must_use]
    pub fn new(host: Rc<dyn HostGestureApi>, lock: HostSwipeLock) -> Self {
        Self {
            host,
            lock,
            held: false,
        }
    }

    /// Whether this coordinator currently holds the lock.
    #[inline]
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held
    }

    #[inline]
    #[must_use]
    pub fn lock(&self) -> &HostSwipeLock {
        &self.lock
    }

    /// Disable the host's native vertical swipe. Returns `true` if this call
    /// took the lock.
    pub fn disable(&mut self) -> bool {
        if self.held {
            return false;
        }
        if !self
            .host
            .capabilities()
            .contains(HostCapabilities::DISABLE_VERTICAL_SWIPES)
        {
            tracing::warn!(
                target: "swipesheet.host",
                capability = "disable_vertical_swipes",
                "host capability missing; native swipe left as is"
            );
            return false;
        }
        if !self.lock.try_acquire() {
            tracing::debug!(target: "swipesheet.host", "host swipes already disabled elsewhere");
            return false;
        }
        match self.host.disable_vertical_swipes() {
            Ok(()) => {
                self.held = true;
                tracing::debug!(target: "swipesheet.host", "host vertical swipes disabled");
                true
            }
            Err(err) => {
                self.lock.release();
                tracing::warn!(target: "swipesheet.host", error = %err, "disable_vertical_swipes failed");
                false
            }
        }
    }

    /// Re-enable the host's native vertical swipe. Returns `true` if this
    /// call released the lock.
    ///
    /// Gesture end, gesture cancel, and teardown all converge here.
    pub fn enable(&mut self) -> bool {
        if !self.held {
            return false;
        }
        self.held = false;
        self.lock.release();
        if !self
            .host
            .capabilities()
            .contains(HostCapabilities::ENABLE_VERTICAL_SWIPES)
        {
            tracing::warn!(
                target: "swipesheet.host",
                capability = "enable_vertical_swipes",
                "host capability missing; cannot restore native swipe"
            );
            return true;
        }
        match self.host.enable_vertical_swipes() {
            Ok(()) => tracing::debug!(target: "swipesheet.host", "host vertical swipes enabled"),
            Err(err) => {
                tracing::warn!(target: "swipesheet.host", error = %err, "enable_vertical_swipes failed");
            }
        }
        true
    }
}
