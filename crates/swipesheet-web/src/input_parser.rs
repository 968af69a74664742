#![forbid(unsafe_code)]

//! JSON touch input produced by the JS shim.
//!
//! The shim listens for `touchstart`/`touchmove`/`touchend`/`touchcancel` on
//! the sheet element, resolves the target's roles once by walking its
//! ancestors, measures the sheet and its content, and posts one JSON object
//! per native event:
//!
//! ```json
//! {
//!   "kind": "touchmove",
//!   "t": 1532.25,
//!   "touches": [{ "x": 180, "y": 512.5 }],
//!   "target": ["content", "sheet"],
//!   "layout": {
//!     "sheet":  { "left": 0, "top": 400, "width": 390, "height": 444 },
//!     "scroll": { "top": 600, "client_height": 300, "scroll_height": 900 }
//!   }
//! }
//! ```
//!
//! `touches`, `target` and `layout` may be omitted. An omitted layout means
//! "unchanged since the previous event". For `touchend` the shim sends
//! `changedTouches`, since the lifted finger is no longer in `touches`.

use serde::Deserialize;
use swipesheet_core::capture::SheetLayout;
use swipesheet_core::event::{TargetFlags, TouchEvent, TouchPhase, TouchPoint};
use swipesheet_core::geometry::{Rect, ScrollMetrics};

/// Errors from parsing encoded touch JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputParseError {
    /// Malformed JSON.
    #[error("JSON parse error: {0}")]
    Json(String),
    /// Missing required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// `kind` is not a touch event name.
    #[error("unknown touch kind: {0}")]
    UnknownKind(String),
    /// A `target` entry is not a known role.
    #[error("unknown target role: {0}")]
    UnknownTargetRole(String),
}

/// One decoded touch event plus the layout it was measured against.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTouch {
    pub event: TouchEvent,
    pub layout: Option<SheetLayout>,
}

#[derive(Debug, Deserialize)]
struct RawTouch {
    kind: Option<String>,
    #[serde(default)]
    t: Option<f64>,
    #[serde(default)]
    touches: Vec<RawPoint>,
    #[serde(default)]
    target: Vec<String>,
    #[serde(default)]
    layout: Option<RawLayout>,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct RawLayout {
    sheet: RawRect,
    #[serde(default)]
    scroll: Option<RawScroll>,
}

#[derive(Debug, Deserialize)]
struct RawRect {
    #[serde(default)]
    left: f64,
    top: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

#[derive(Debug, Deserialize)]
struct RawScroll {
    top: f64,
    client_height: f64,
    scroll_height: f64,
}

/// Parse one JSON-encoded touch event.
pub fn parse_touch_json(json: &str) -> Result<ParsedTouch, InputParseError> {
    let raw: RawTouch =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    let kind = raw.kind.ok_or(InputParseError::MissingField("kind"))?;
    let phase = parse_phase(&kind)?;
    let t = raw.t.ok_or(InputParseError::MissingField("t"))?;

    let mut event = TouchEvent::at_ms(phase, t).with_target(parse_target(&raw.target)?);
    event.touches = raw
        .touches
        .into_iter()
        .map(|p| TouchPoint::new(p.x, p.y))
        .collect();

    Ok(ParsedTouch {
        event,
        layout: raw.layout.map(RawLayout::into_layout),
    })
}

fn parse_phase(kind: &str) -> Result<TouchPhase, InputParseError> {
    match kind {
        "touchstart" => Ok(TouchPhase::Start),
        "touchmove" => Ok(TouchPhase::Move),
        "touchend" => Ok(TouchPhase::End),
        "touchcancel" => Ok(TouchPhase::Cancel),
        other => Err(InputParseError::UnknownKind(other.to_owned())),
    }
}

/// Map role names to flags.
///
/// `button` and `input` are accepted as aliases for `interactive` so the shim
/// can pass element tag names straight through.
fn parse_target(roles: &[String]) -> Result<TargetFlags, InputParseError> {
    roles.iter().try_fold(TargetFlags::NONE, |flags, role| {
        let flag = match role.as_str() {
            "handle" => TargetFlags::HANDLE,
            "interactive" | "button" | "input" | "select" | "textarea" => TargetFlags::INTERACTIVE,
            "no_drag" | "no-drag" => TargetFlags::NO_DRAG,
            "content" => TargetFlags::CONTENT,
            "sheet" => TargetFlags::SHEET,
            other => return Err(InputParseError::UnknownTargetRole(other.to_owned())),
        };
        Ok(flags | flag)
    })
}

impl RawLayout {
    fn into_layout(self) -> SheetLayout {
        let sheet = Rect::new(self.sheet.left, self.sheet.top, self.sheet.width, self.sheet.height);
        // A sheet without scrollable content is always "at the bottom".
        let content = self
            .scroll
            .map_or(ScrollMetrics::new(0.0, 0.0, 0.0), |s| {
                ScrollMetrics::new(s.top, s.client_height, s.scroll_height)
            });
        SheetLayout::new(sheet, content)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn touchstart_with_layout() {
        let parsed = parse_touch_json(
            r#"{"kind":"touchstart","t":16.5,"touches":[{"x":10,"y":420}],
                "target":["handle","sheet"],
                "layout":{"sheet":{"left":0,"top":400,"width":390,"height":444},
                          "scroll":{"top":0,"client_height":300,"scroll_height":900}}}"#,
        )
        .unwrap();

        assert_eq!(parsed.event.phase, TouchPhase::Start);
        assert_eq!(parsed.event.timestamp, Duration::from_secs_f64(0.0165));
        assert_eq!(parsed.event.touches, vec![TouchPoint::new(10.0, 420.0)]);
        assert_eq!(parsed.event.target, TargetFlags::HANDLE | TargetFlags::SHEET);
        assert_eq!(
            parsed.layout,
            Some(SheetLayout::new(
                Rect::new(0.0, 400.0, 390.0, 444.0),
                ScrollMetrics::new(0.0, 300.0, 900.0),
            ))
        );
    }

    #[test]
    fn cancel_without_touches_or_layout() {
        let parsed = parse_touch_json(r#"{"kind":"touchcancel","t":99}"#).unwrap();
        assert_eq!(parsed.event.phase, TouchPhase::Cancel);
        assert!(parsed.event.touches.is_empty());
        assert_eq!(parsed.event.target, TargetFlags::NONE);
        assert_eq!(parsed.layout, None);
    }

    #[test]
    fn element_names_map_to_interactive() {
        for role in ["button", "input", "interactive", "textarea"] {
            let json = format!(r#"{{"kind":"touchstart","t":0,"target":["{role}"]}}"#);
            let parsed = parse_touch_json(&json).unwrap();
            assert_eq!(parsed.event.target, TargetFlags::INTERACTIVE, "{role}");
        }
        let parsed = parse_touch_json(r#"{"kind":"touchstart","t":0,"target":["no-drag"]}"#).unwrap();
        assert_eq!(parsed.event.target, TargetFlags::NO_DRAG);
    }

    #[test]
    fn layout_without_scroll_counts_as_exhausted() {
        let parsed = parse_touch_json(
            r#"{"kind":"touchmove","t":1,"layout":{"sheet":{"top":350}}}"#,
        )
        .unwrap();
        let layout = parsed.layout.unwrap();
        assert_eq!(layout.sheet.top(), 350.0);
        assert!(layout.content.is_at_bottom(1.0));
    }

    #[test]
    fn errors() {
        assert!(matches!(parse_touch_json("{"), Err(InputParseError::Json(_))));
        assert_eq!(
            parse_touch_json(r#"{"t":0}"#),
            Err(InputParseError::MissingField("kind"))
        );
        assert_eq!(
            parse_touch_json(r#"{"kind":"touchmove"}"#),
            Err(InputParseError::MissingField("t"))
        );
        assert_eq!(
            parse_touch_json(r#"{"kind":"pointerdown","t":0}"#),
            Err(InputParseError::UnknownKind("pointerdown".into()))
        );
        assert_eq!(
            parse_touch_json(r#"{"kind":"touchstart","t":0,"target":["map"]}"#),
            Err(InputParseError::UnknownTargetRole("map".into()))
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(
            InputParseError::MissingField("t").to_string(),
            "missing required field: t"
        );
        assert_eq!(
            InputParseError::UnknownKind("x".into()).to_string(),
            "unknown touch kind: x"
        );
    }

    #[test]
    fn negative_timestamp_clamps_to_zero() {
        let parsed = parse_touch_json(r#"{"kind":"touchstart","t":-5}"#).unwrap();
        assert_eq!(parsed.event.timestamp, Duration::ZERO);
    }
}
