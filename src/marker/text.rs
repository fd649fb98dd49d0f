//! Invisible text form of a marker.

use std::sync::OnceLock;
use std::time::Duration;

use regex::{bytes, Captures, Regex};

use super::Marker;
use crate::ansi::{CONCEAL, RESET};
use crate::button::decode_codes;

const MARKER_PATTERN: &str =
    r"\x1b\[8m\[([0-9]+)\.([0-9]{3})s\] \[([lLdDuUrRoObB]*)\]\x1b\[0m";

fn marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MARKER_PATTERN).expect("marker pattern is valid"))
}

fn marker_bytes_regex() -> &'static bytes::Regex {
    static RE: OnceLock<bytes::Regex> = OnceLock::new();
    RE.get_or_init(|| bytes::Regex::new(MARKER_PATTERN).expect("marker pattern is valid"))
}

/// Wrap a marker in conceal/reset escapes.
pub fn encode_text_marker(marker: &Marker) -> String {
    format!("{}{}{}", CONCEAL, marker, RESET)
}

fn millis(secs: &str, frac: &str) -> Option<u64> {
    let secs: u64 = secs.parse().ok()?;
    let frac: u64 = frac.parse().ok()?;
    secs.checked_mul(1000)?.checked_add(frac)
}

fn from_captures(caps: &Captures<'_>) -> Option<Marker> {
    let timestamp_ms = millis(&caps[1], &caps[2])?;
    let buttons = decode_codes(&caps[3])?;
    Some(Marker::new(timestamp_ms, buttons))
}

/// First marker found in `text`, if any.
pub fn decode_text_marker(text: &str) -> Option<Marker> {
    marker_regex()
        .captures_iter(text)
        .find_map(|caps| from_captures(&caps))
}

/// Every marker in `text`, in order of appearance.
pub fn decode_text_markers(text: &str) -> Vec<Marker> {
    marker_regex()
        .captures_iter(text)
        .filter_map(|caps| from_captures(&caps))
        .collect()
}

/// Timestamp of the first marker in a raw transcript line.
pub fn marker_timestamp(line: &[u8]) -> Option<Duration> {
    let caps = marker_bytes_regex().captures(line)?;
    let secs = std::str::from_utf8(&caps[1]).ok()?;
    let frac = std::str::from_utf8(&caps[2]).ok()?;
    millis(secs, frac).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::{ButtonEvent, Direction};

    #[test]
    fn test_encode_exact_bytes() {
        let marker = Marker::new(3_000, vec![ButtonEvent::long(Direction::Back)]);
        assert_eq!(encode_text_marker(&marker), "\x1b[8m[3.000s] [B]\x1b[0m");
    }

    #[test]
    fn test_decode_inside_surrounding_text() {
        let text = format!(
            "   {}    [ Flipper ]   \r\n",
            encode_text_marker(&Marker::new(42, vec![]))
        );
        assert_eq!(decode_text_marker(&text), Some(Marker::new(42, vec![])));
    }

    #[test]
    fn test_decode_requires_sentinels() {
        assert_eq!(decode_text_marker("[1.000s] [l]"), None);
        assert_eq!(decode_text_marker("\x1b[8m[1.000s] [l]"), None);
    }

    #[test]
    fn test_decode_rejects_bad_grammar() {
        // two decimals
        assert_eq!(decode_text_marker("\x1b[8m[1.00s] [l]\x1b[0m"), None);
        // unknown button letter
        assert_eq!(decode_text_marker("\x1b[8m[1.000s] [x]\x1b[0m"), None);
        // overflowing timestamp
        let huge = format!("\x1b[8m[{}.000s] []\x1b[0m", u64::MAX);
        assert_eq!(decode_text_marker(&huge), None);
    }

    #[test]
    fn test_decode_all_in_order() {
        let a = Marker::new(0, vec![ButtonEvent::short(Direction::Left)]);
        let b = Marker::new(1_500, vec![ButtonEvent::long(Direction::Right)]);
        let text = format!("{}frame\x1b[33A{}frame", a.to_text(), b.to_text());
        assert_eq!(decode_text_markers(&text), vec![a, b]);
    }

    #[test]
    fn test_marker_timestamp_from_bytes() {
        let line = format!("\r{}\r\n", Marker::new(7_250, vec![]).to_text());
        assert_eq!(
            marker_timestamp(line.as_bytes()),
            Some(Duration::from_millis(7_250))
        );
        assert_eq!(marker_timestamp(b"\x1b[33A"), None);
    }
}
