//! End-to-end tests for session recording.
//!
//! These tests verify:
//! - Text and GIF sinks written through one recorder carry the same markers
//! - Recordings written to disk load back as replay events
//! - Long pauses are split into GIF frames whose delays stay in range and
//!   add up to the session length

use std::fs::File;
use std::io::BufReader;

use flipper_term::button::{ButtonEvent, Direction};
use flipper_term::glyph::Density;
use flipper_term::layout::TextStyle;
use flipper_term::marker::{decode_payload, Marker};
use flipper_term::raster::Raster;
use flipper_term::record::{split_gap, GifSink, SessionRecorder, TextSink, MAX_FRAME_MS, MIN_FRAME_MS};
use flipper_term::replay::{self, load_gif_events, RecordingFormat, ReplayEvent};
use flipper_term::screen::FrameBuffer;
use proptest::prelude::*;
use tempfile::TempDir;

fn frame_with_pixel(x: usize, y: usize) -> FrameBuffer {
    let mut frame = FrameBuffer::blank();
    frame.set_pixel(x, y, true);
    frame
}

fn record_both(dir: &TempDir, markers: &[Marker], final_marker: &Marker) -> (std::path::PathBuf, std::path::PathBuf) {
    let txt = dir.path().join("session.txt");
    let gif = dir.path().join("session.gif");

    let mut recorder = SessionRecorder::new()
        .with_sink(Box::new(
            TextSink::create(&txt, Density::Medium, TextStyle::default(), "Flipper Zero").unwrap(),
        ))
        .with_sink(Box::new(GifSink::create(&gif).unwrap()));
    for (i, marker) in markers.iter().enumerate() {
        recorder.record_frame(&frame_with_pixel(i, i), marker).unwrap();
    }
    assert_eq!(recorder.frame_count(), markers.len());
    recorder.finish(final_marker).unwrap();
    (txt, gif)
}

fn gif_delays(path: &std::path::Path) -> Vec<u16> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options.read_info(BufReader::new(File::open(path).unwrap())).unwrap();
    let mut delays = Vec::new();
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        delays.push(frame.delay);
    }
    delays
}

/// Hidden payload of every frame in a GIF recording.
fn gif_payloads(path: &std::path::Path) -> Vec<String> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options.read_info(BufReader::new(File::open(path).unwrap())).unwrap();
    let palette: Vec<[u8; 3]> = decoder
        .global_palette()
        .unwrap()
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();
    let mut payloads = Vec::new();
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        let raster = Raster::from_indices(frame.width as usize, frame.height as usize, frame.buffer.to_vec()).unwrap();
        payloads.push(decode_payload(raster.first_row(), &palette).unwrap());
    }
    payloads
}

/// The `n` of a payload starting with `[n]`.
fn frame_number(payload: &str) -> i64 {
    let end = payload.find(']').unwrap();
    payload[1..end].parse().unwrap()
}

// ==================== Round Trip Tests ====================

#[test]
fn test_both_sinks_load_back_same_events() {
    let dir = TempDir::new().unwrap();
    let markers = vec![
        Marker::new(0, vec![]),
        Marker::new(1_200, vec![ButtonEvent::short(Direction::Ok)]),
        Marker::new(2_750, vec![ButtonEvent::long(Direction::Back), ButtonEvent::short(Direction::Up)]),
    ];
    let final_marker = Marker::new(3_100, vec![ButtonEvent::short(Direction::Down)]);
    let (txt, gif) = record_both(&dir, &markers, &final_marker);

    let mut expected: Vec<ReplayEvent> = markers.iter().cloned().map(ReplayEvent::from).collect();
    expected.push(ReplayEvent::from(final_marker));

    assert_eq!(replay::read_events(&txt).unwrap(), expected);
    assert_eq!(replay::read_events(&gif).unwrap(), expected);
    assert_eq!(load_gif_events(File::open(&gif).unwrap()).unwrap(), expected);
}

#[test]
fn test_format_detected_from_contents() {
    let dir = TempDir::new().unwrap();
    let (txt, gif) = record_both(&dir, &[Marker::new(0, vec![])], &Marker::new(100, vec![]));

    assert_eq!(RecordingFormat::detect(&std::fs::read(&gif).unwrap()), RecordingFormat::Gif);
    assert_eq!(RecordingFormat::detect(&std::fs::read(&txt).unwrap()), RecordingFormat::Text);

    // Extensions do not matter.
    let renamed = dir.path().join("session.bin");
    std::fs::rename(&gif, &renamed).unwrap();
    assert_eq!(replay::read_events(&renamed).unwrap().len(), 2);
}

#[test]
fn test_transcript_ends_with_final_marker() {
    let dir = TempDir::new().unwrap();
    let final_marker = Marker::new(900, vec![]);
    let (txt, _) = record_both(&dir, &[Marker::new(0, vec![])], &final_marker);

    let text = std::fs::read_to_string(&txt).unwrap();
    let tail = format!("\r{}\r{}", final_marker.to_text(), "\n".repeat(Density::Medium.lines() + 2));
    assert!(text.ends_with(&tail));
}

#[test]
fn test_empty_session_writes_empty_gif() {
    let dir = TempDir::new().unwrap();
    let (txt, gif) = record_both(&dir, &[], &Marker::new(0, vec![]));

    assert_eq!(std::fs::metadata(&gif).unwrap().len(), 0);
    // The transcript still carries the closing marker.
    assert_eq!(replay::read_events(&txt).unwrap(), vec![ReplayEvent::new(0, vec![])]);
}

#[test]
fn test_missing_recording_loads_no_events() {
    let dir = TempDir::new().unwrap();
    assert!(replay::load_events(&dir.path().join("missing.txt")).is_empty());
}

// ==================== GIF Timing Tests ====================

#[test]
fn test_long_pause_split_across_frames() {
    let dir = TempDir::new().unwrap();
    let markers = [Marker::new(0, vec![]), Marker::new(2_000_000, vec![])];
    let (_, gif) = record_both(&dir, &markers, &Marker::new(2_000_500, vec![]));

    let delays = gif_delays(&gif);
    // Lead copy, the first frame split in four, the second frame, tail copy.
    assert_eq!(delays.len(), 7);
    assert!(delays.iter().all(|&d| d >= 1));
    assert_eq!(delays.iter().map(|&d| d as u64).sum::<u64>(), 200_050);

    // The split copies still decode to the two recorded frames plus the end.
    let events = replay::read_events(&gif).unwrap();
    let stamps: Vec<u64> = events.iter().map(|e| e.timestamp_ms).collect();
    assert_eq!(stamps, vec![0, 2_000_000, 2_000_500]);
}

#[test]
fn test_frame_numbers_follow_write_order() {
    let dir = TempDir::new().unwrap();
    let markers = [Marker::new(0, vec![]), Marker::new(2 * MAX_FRAME_MS + 500, vec![])];
    let final_marker = Marker::new(2 * MAX_FRAME_MS + 1_500, vec![]);
    let (_, gif) = record_both(&dir, &markers, &final_marker);

    let payloads = gif_payloads(&gif);
    let numbers: Vec<i64> = payloads.iter().map(|p| frame_number(p)).collect();
    assert_eq!(numbers, vec![-1, 0, 1, 2, 3, 4]);
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));

    // Lead and gap copies carry only their number.
    assert_eq!(payloads[0], "[-1]");
    assert_eq!(payloads[2], "[1]");
    assert_eq!(payloads[3], "[2]");
    assert_eq!(payloads[1], markers[0].image_payload(0));
    assert_eq!(payloads[4], markers[1].image_payload(3));
    assert_eq!(payloads[5], final_marker.image_payload(4));
}

#[test]
fn test_short_gaps_use_minimum_delay() {
    let dir = TempDir::new().unwrap();
    let markers = [Marker::new(0, vec![]), Marker::new(3, vec![])];
    let (_, gif) = record_both(&dir, &markers, &Marker::new(4, vec![]));
    assert!(gif_delays(&gif).iter().all(|&d| d == 1));
}

proptest! {
    #[test]
    fn test_split_gap_chunks_in_range(total in MIN_FRAME_MS..10 * MAX_FRAME_MS) {
        let chunks = split_gap(total);
        prop_assert!(chunks.iter().all(|&c| (MIN_FRAME_MS..=MAX_FRAME_MS).contains(&c)));
        prop_assert_eq!(chunks.iter().sum::<u64>(), total);
    }
}
