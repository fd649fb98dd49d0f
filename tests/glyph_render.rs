//! Integration tests for the glyph renderer.
//!
//! These tests verify:
//! - Output geometry at every density
//! - Determinism
//! - That a single dark pixel changes exactly one glyph, in the right cell,
//!   with the right partial shape

use flipper_term::glyph::{render, Density, BLOCKS_1X2, BRAILLE_2X4, SEXTANTS_2X3};
use flipper_term::screen::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use proptest::prelude::*;

const DENSITIES: [Density; 3] = [Density::Low, Density::Medium, Density::High];

fn grid(frame: &FrameBuffer, density: Density) -> Vec<Vec<char>> {
    render(frame, density)
        .iter()
        .map(|line| line.chars().collect())
        .collect()
}

fn single_pixel(x: usize, y: usize) -> FrameBuffer {
    let mut frame = FrameBuffer::blank();
    frame.set_pixel(x, y, true);
    frame
}

/// Cell holding pixel `(x, y)` and the glyph it shows when only that pixel
/// is dark.
fn expected_cell(density: Density, x: usize, y: usize) -> (usize, usize, char) {
    match density {
        Density::Low => (y / 2, x, BLOCKS_1X2[1 << (y % 2)]),
        Density::Medium => {
            let (band, row) = (y / 24, y % 24);
            let bit = row % 3 + 3 * (x % 2);
            let line = band * 8 + row / 3;
            // Line 21 also carries the two dark padding rows below row 63.
            let padding = if line == 21 { 0b110_110 } else { 0 };
            (line, x / 2, SEXTANTS_2X3[(1 << bit) | padding])
        }
        Density::High => {
            let bit = y % 4 + 4 * (x % 2);
            (y / 4, x / 2, BRAILLE_2X4[1 << bit])
        }
    }
}

fn differing_cells(a: &[Vec<char>], b: &[Vec<char>]) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    for (line, (ra, rb)) in a.iter().zip(b.iter()).enumerate() {
        for (col, (ca, cb)) in ra.iter().zip(rb.iter()).enumerate() {
            if ca != cb {
                cells.push((line, col));
            }
        }
    }
    cells
}

// ==================== Geometry Tests ====================

#[test]
fn test_line_counts_and_widths() {
    for density in DENSITIES {
        let lines = grid(&FrameBuffer::blank(), density);
        assert_eq!(lines.len(), density.lines(), "{:?}", density);
        for line in &lines {
            assert_eq!(line.len(), density.columns(), "{:?}", density);
        }
    }
}

#[test]
fn test_blank_frame_is_uniform_except_medium_padding() {
    for density in DENSITIES {
        let lines = grid(&FrameBuffer::blank(), density);
        let first = lines[0][0];
        let body = match density {
            Density::Medium => &lines[..21],
            _ => &lines[..],
        };
        assert!(body.iter().flatten().all(|&c| c == first), "{:?}", density);
    }
}

#[test]
fn test_medium_padding_rows_render_blank() {
    // The last line covers row 63 plus two padding rows that read as dark.
    let lines = grid(&FrameBuffer::blank(), Density::Medium);
    let padded = SEXTANTS_2X3[0b110_110];
    assert!(lines[21].iter().all(|&c| c == padded));
}

#[test]
fn test_full_dark_frame() {
    let mut frame = FrameBuffer::blank();
    for y in 0..SCREEN_HEIGHT {
        for x in 0..SCREEN_WIDTH {
            frame.set_pixel(x, y, true);
        }
    }
    assert!(grid(&frame, Density::Low).iter().flatten().all(|&c| c == ' '));
    assert!(grid(&frame, Density::High)
        .iter()
        .flatten()
        .all(|&c| c == '\u{2800}'));
}

// ==================== Determinism Tests ====================

#[test]
fn test_render_is_deterministic() {
    let mut frame = FrameBuffer::blank();
    for i in 0..SCREEN_HEIGHT {
        frame.set_pixel((i * 7) % SCREEN_WIDTH, i, true);
        frame.set_pixel(i, (i * 3) % SCREEN_HEIGHT, true);
    }
    for density in DENSITIES {
        assert_eq!(render(&frame, density), render(&frame.clone(), density));
    }
}

// ==================== Single Pixel Tests ====================

#[test]
fn test_single_pixel_corners() {
    let corners = [(0, 0), (SCREEN_WIDTH - 1, 0), (0, SCREEN_HEIGHT - 1), (SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1)];
    for density in DENSITIES {
        let blank = grid(&FrameBuffer::blank(), density);
        for &(x, y) in &corners {
            let lines = grid(&single_pixel(x, y), density);
            let (line, col, glyph) = expected_cell(density, x, y);
            assert_eq!(differing_cells(&blank, &lines), vec![(line, col)], "{:?} ({}, {})", density, x, y);
            assert_eq!(lines[line][col], glyph, "{:?} ({}, {})", density, x, y);
        }
    }
}

proptest! {
    #[test]
    fn test_single_pixel_changes_one_glyph(x in 0..SCREEN_WIDTH, y in 0..SCREEN_HEIGHT) {
        for density in DENSITIES {
            let blank = grid(&FrameBuffer::blank(), density);
            let lines = grid(&single_pixel(x, y), density);
            let (line, col, glyph) = expected_cell(density, x, y);
            prop_assert_eq!(differing_cells(&blank, &lines), vec![(line, col)]);
            prop_assert_eq!(lines[line][col], glyph);
        }
    }
}
