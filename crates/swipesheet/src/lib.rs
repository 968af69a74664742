#![forbid(unsafe_code)]

//! swipesheet public facade crate.
//!
//! Re-exports the types a host needs to mount a sheet, feed it touches and
//! render it, plus a prelude for day-to-day use.

// --- Core re-exports -------------------------------------------------------

pub use swipesheet_core::capture::{CaptureConfig, SheetLayout};
pub use swipesheet_core::config::{ConfigError, SheetConfig};
pub use swipesheet_core::coordinator::HostSwipeLock;
pub use swipesheet_core::event::{TargetFlags, TouchEvent, TouchPhase, TouchPoint};
pub use swipesheet_core::geometry::{Point, Rect, ScrollMetrics};
pub use swipesheet_core::gesture::{Direction, GestureConfig, GestureFrame, ListenerOptions};
pub use swipesheet_core::host::{
    HapticFeedback, HostCapabilities, HostError, HostGestureApi, ImpactStyle, NoHost,
    NotificationKind,
};
pub use swipesheet_core::position::{CommitOutcome, SheetPosition, SheetTransform};
pub use swipesheet_core::sheet::{Sheet, SheetDispatch, SheetProps};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use swipesheet_web::{
    HostCommand, InputParseError, PlatformProbe, SheetTouchAdapter, SheetTouchDispatch,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for swipesheet hosts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[cfg(feature = "web")]
    #[error(transparent)]
    Input(#[from] InputParseError),
}

/// Standard result type for swipesheet APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, HostCapabilities, HostGestureApi, Result, Sheet, SheetConfig, SheetLayout,
        SheetPosition, SheetProps, TouchEvent, TouchPhase,
    };

    #[cfg(feature = "web")]
    pub use crate::{PlatformProbe, SheetTouchAdapter};

    pub use crate::core;
    #[cfg(feature = "web")]
    pub use crate::web;
}

pub use swipesheet_core as core;
#[cfg(feature = "web")]
pub use swipesheet_web as web;
