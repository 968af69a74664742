#![forbid(unsafe_code)]

//! Core: touch gesture tracking, capture arbitration, and commit logic for a
//! two-position swipe sheet.
//!
//! # Role in swipesheet
//! `swipesheet-core` owns everything that decides what a vertical touch
//! gesture means for a sheet that rests either collapsed or expanded. It has
//! no DOM, no JS, and no clock of its own: the embedding host pushes touch
//! events (with timestamps) and a layout snapshot, and receives back what to
//! do with the native event.
//!
//! # Primary responsibilities
//! - **GestureTracker**: raw touch events to structured [`gesture::GestureFrame`]s.
//! - **CaptureArbiter**: one decision per gesture between the sheet, its
//!   scrollable content, and the host application.
//! - **ResistanceProfile**: rubber-band damping at the travel limits.
//! - **PositionController**: the collapsed/expanded model and commit rules.
//! - **HostSwipeCoordinator**: keeps the host's native vertical swipe disabled
//!   exactly while a captured session is live.
//! - **HapticDispatcher**: tactile ticks and impacts at gesture milestones.
//!
//! # How it fits in the system
//! [`sheet::Sheet`] wires the pieces together behind the component contract.
//! `swipesheet-web` wraps a `Sheet` for webview hosts that talk JSON.

pub mod animation;
pub mod capture;
pub mod config;
pub mod coordinator;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod haptics;
pub mod host;
pub mod position;
pub mod resistance;
pub mod sheet;
