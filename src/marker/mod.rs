//! Timing and input markers embedded in recordings.
//!
//! A marker records when a frame was captured and which buttons were sent
//! just before it. It travels two ways:
//!
//! 1. **Text** - `"[12.345s] [lR]"` wrapped in conceal/reset escapes, so a
//!    terminal shows nothing where it sits
//! 2. **Image** - the same text, prefixed by a frame number, hidden in the
//!    first scanline of a GIF frame by choosing between near-identical colours
//!
//! Decoding is forgiving: anything that does not match yields no marker.

mod steg;
mod text;

pub use steg::{
    decode_image_marker, decode_payload, encode_image_marker, encode_payload, StegError,
    STEG_BITS, STEG_CHARS,
};
pub use text::{decode_text_marker, decode_text_markers, encode_text_marker, marker_timestamp};

use std::fmt;
use std::time::Duration;

use crate::button::{encode_codes, ButtonEvent};

/// A timestamp and the buttons pressed at that moment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Marker {
    /// Milliseconds since the session started.
    pub timestamp_ms: u64,
    pub buttons: Vec<ButtonEvent>,
}

impl Marker {
    pub fn new(timestamp_ms: u64, buttons: Vec<ButtonEvent>) -> Self {
        Self {
            timestamp_ms,
            buttons,
        }
    }

    /// Marker for a point `elapsed` into the session, truncated to milliseconds.
    pub fn at(elapsed: Duration, buttons: Vec<ButtonEvent>) -> Self {
        Self::new(elapsed.as_millis() as u64, buttons)
    }

    pub fn timestamp(&self) -> Duration {
        Duration::from_millis(self.timestamp_ms)
    }

    /// Timestamp formatted with exactly three decimals, e.g. `12.345`.
    pub fn seconds_label(&self) -> String {
        format!("{}.{:03}", self.timestamp_ms / 1000, self.timestamp_ms % 1000)
    }

    pub fn codes(&self) -> String {
        encode_codes(&self.buttons)
    }

    /// Invisible text form.
    pub fn to_text(&self) -> String {
        encode_text_marker(self)
    }

    /// Payload hidden in a recorded GIF frame.
    pub fn image_payload(&self, frame_number: u64) -> String {
        format!("[{}] {}", frame_number, self.to_text())
    }
}

/// Visible form without the conceal escapes: `[12.345s] [lR]`.
impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}s] [{}]", self.seconds_label(), self.codes())
    }
}
