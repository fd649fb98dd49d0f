//! Terminal playback of a text transcript.
//!
//! Lines are copied to the output verbatim. A line holding a marker is held
//! back until the marker's timestamp, which recreates the recorded pacing.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

use regex::bytes::Regex;

use crate::ansi::{CR, CURSOR_HIDE, CURSOR_SHOW, LF};
use crate::marker::marker_timestamp;

/// Longest single sleep, so interrupts are noticed promptly.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

fn cursor_up_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1b\[([0-9]+)A").expect("cursor-up pattern is valid"))
}

/// What a playback run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub lines: usize,
    pub markers: usize,
    pub interrupted: bool,
}

/// Vertical cursor position relative to where playback started.
#[derive(Debug, Default)]
struct CursorTrack {
    row: i64,
    lowest: i64,
}

impl CursorTrack {
    /// Follow the cursor-up sequences and the trailing line feed of `line`.
    fn follow(&mut self, line: &[u8]) {
        let up: i64 = cursor_up_regex()
            .captures_iter(line)
            .filter_map(|caps| std::str::from_utf8(&caps[1]).ok()?.parse::<i64>().ok())
            .sum();
        let feeds = line.iter().filter(|&&b| b == b'\n').count() as i64;
        self.row = (self.row - up).max(0) + feeds;
        self.lowest = self.lowest.max(self.row);
    }

    /// Lines between the cursor and the lowest line written.
    fn below(&self) -> usize {
        (self.lowest - self.row).max(0) as usize
    }
}

/// Sleep until `deadline`, returning `false` if interrupted first.
fn wait_until(deadline: Instant, interrupt: &AtomicBool) -> bool {
    loop {
        if interrupt.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep((deadline - now).min(SLEEP_SLICE));
    }
}

struct Player<'a, W> {
    out: &'a mut W,
    interrupt: &'a AtomicBool,
    start: Instant,
    cursor: CursorTrack,
    cursor_hidden: bool,
    summary: PlaybackSummary,
}

impl<W: Write> Player<'_, W> {
    fn play(&mut self, reader: &mut impl BufRead) -> io::Result<()> {
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(());
            }
            if let Some(timestamp) = marker_timestamp(&line) {
                self.summary.markers += 1;
                if !wait_until(self.start + timestamp, self.interrupt) {
                    self.summary.interrupted = true;
                    return Ok(());
                }
            }
            if !self.cursor_hidden {
                self.out.write_all(CURSOR_HIDE.as_bytes())?;
                self.cursor_hidden = true;
            }
            self.out.write_all(&line)?;
            self.out.flush()?;
            self.cursor.follow(&line);
            self.summary.lines += 1;
        }
    }

    /// Leave the cursor below everything written, visible.
    fn restore(&mut self) -> io::Result<()> {
        if self.summary.interrupted {
            self.out.write_all(LF.as_bytes())?;
        }
        let below = self.cursor.below();
        if below > 0 {
            let tail = format!("{}{}", CR, LF.repeat(below));
            self.out.write_all(tail.as_bytes())?;
        }
        if self.cursor_hidden {
            self.out.write_all(CURSOR_SHOW.as_bytes())?;
        }
        self.out.flush()
    }
}

/// Replay a transcript from `reader` onto `out` at its recorded pace.
///
/// Setting `interrupt` stops playback early. Either way the cursor ends up
/// below the picture and visible again.
pub fn play_transcript<R: BufRead, W: Write>(
    mut reader: R,
    out: &mut W,
    interrupt: &AtomicBool,
) -> io::Result<PlaybackSummary> {
    let mut player = Player {
        out,
        interrupt,
        start: Instant::now(),
        cursor: CursorTrack::default(),
        cursor_hidden: false,
        summary: PlaybackSummary::default(),
    };
    let played = player.play(&mut reader);
    player.restore()?;
    played?;

    log::debug!(
        "Played {} lines, {} markers",
        player.summary.lines,
        player.summary.markers
    );
    Ok(player.summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{encode_text_marker, Marker};

    #[test]
    fn test_cursor_track() {
        let mut track = CursorTrack::default();
        track.follow(b"title\r\n");
        track.follow(b"row\r\n");
        assert_eq!(track.below(), 0);
        track.follow(b"\x1b[2Atitle\r\n");
        assert_eq!(track.below(), 1);
        track.follow(b"\x1b[5A");
        assert_eq!(track.below(), 2);
    }

    #[test]
    fn test_plays_lines_and_restores_cursor() {
        let transcript = format!(
            "{} [ Flipper ]\r\nrow one\r\n\x1b[2A{} [ Flipper ]\r\nrow two\r\n\x1b[2A",
            encode_text_marker(&Marker::new(0, vec![])),
            encode_text_marker(&Marker::new(20, vec![])),
        );
        let mut out = Vec::new();
        let interrupt = AtomicBool::new(false);
        let summary = play_transcript(transcript.as_bytes(), &mut out, &interrupt).unwrap();

        assert_eq!(summary.markers, 2);
        assert_eq!(summary.lines, 5);
        assert!(!summary.interrupted);
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with(CURSOR_HIDE));
        assert!(out.contains("row two"));
        // cursor left at the top of a two-line picture
        assert!(out.ends_with(&format!("\x1b[2A\r\n\n{}", CURSOR_SHOW)));
    }

    #[test]
    fn test_interrupt_stops_before_waiting() {
        let transcript = format!(
            "{} first\r\n{} second\r\n",
            encode_text_marker(&Marker::new(0, vec![])),
            encode_text_marker(&Marker::new(60_000, vec![])),
        );
        let interrupt = AtomicBool::new(true);
        let mut out = Vec::new();
        let summary = play_transcript(transcript.as_bytes(), &mut out, &interrupt).unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.lines, 0);
        assert_eq!(out, b"\n");
    }

    #[test]
    fn test_empty_transcript_writes_nothing() {
        let mut out = Vec::new();
        let summary = play_transcript(&b""[..], &mut out, &AtomicBool::new(false)).unwrap();
        assert_eq!(summary, PlaybackSummary::default());
        assert!(out.is_empty());
    }
}
