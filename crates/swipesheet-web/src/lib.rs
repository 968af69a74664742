#![forbid(unsafe_code)]

//! `swipesheet-web` adapts a [`swipesheet_core::sheet::Sheet`] for webview hosts.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding JS shim posts one JSON object per
//!   native touch event and drives animation with explicit frame deltas.
//! - **Synchronous answers**: every dispatch returns the DOM commands to apply
//!   before the native handler returns, so `preventDefault()` is never late.
//! - **Queued host calls**: host SDK calls (vertical swipe toggles, haptics)
//!   come back as [`host_bridge::HostCommand`]s for JS to execute.
//!
//! This crate does not bind to `wasm-bindgen`. A thin binding layer can wrap
//! [`SheetTouchAdapter`] and hand its JSON straight to the shim.

pub mod compat;
pub mod host_bridge;
pub mod input_parser;
pub mod touch_adapter;

pub use compat::{CompatShim, DomCommand, PlatformProbe};
pub use host_bridge::{HostCommand, QueuedHost, capabilities_from_names};
pub use input_parser::{InputParseError, ParsedTouch, parse_touch_json};
pub use touch_adapter::{
    SheetTouchAdapter, SheetTouchDispatch, SheetTouchLogEntry, SheetTouchLogOutcome,
};
