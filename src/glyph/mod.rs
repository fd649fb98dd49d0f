//! Frame buffer to text glyph rendering.
//!
//! The renderer turns one [`FrameBuffer`] into terminal lines at one of three
//! densities:
//!
//! - `Low` - 1x2 half blocks, 128 columns by 32 lines
//! - `Medium` - 2x3 sextants, 64 columns by 22 lines
//! - `High` - 2x4 braille dots, 64 columns by 16 lines
//!
//! Rendering is lossless at every density: each source pixel maps to exactly
//! one glyph sub-cell.

mod tables;

pub use tables::{BLOCKS_1X2, BRAILLE_2X4, BRAILLE_BASE, SEXTANTS_2X3};

use crate::screen::{FrameBuffer, PAGE_COUNT, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Pixel-to-glyph block ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Density {
    /// 1x2 pixels per glyph
    #[default]
    Low,
    /// 2x3 pixels per glyph
    Medium,
    /// 2x4 pixels per glyph
    High,
}

impl Density {
    /// Number of lines produced for one frame.
    pub fn lines(self) -> usize {
        match self {
            Density::Low => 32,
            Density::Medium => 22,
            Density::High => 16,
        }
    }

    /// Number of glyphs per line.
    pub fn columns(self) -> usize {
        match self {
            Density::Low => SCREEN_WIDTH,
            Density::Medium | Density::High => SCREEN_WIDTH / 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Density::Low => "low",
            Density::Medium => "medium",
            Density::High => "high",
        }
    }

    /// Parse a density name as used in the config file.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "low" => Some(Density::Low),
            "medium" | "mid" => Some(Density::Medium),
            "high" => Some(Density::High),
            _ => None,
        }
    }
}

/// Render a frame into glyph lines.
pub fn render(frame: &FrameBuffer, density: Density) -> Vec<String> {
    match density {
        Density::Low => render_low(frame),
        Density::Medium => render_medium(frame),
        Density::High => render_high(frame),
    }
}

fn render_low(frame: &FrameBuffer) -> Vec<String> {
    let mut lines = Vec::with_capacity(Density::Low.lines());
    for page in 0..PAGE_COUNT {
        for shift in [0, 2, 4, 6] {
            let line = (0..SCREEN_WIDTH)
                .map(|x| BLOCKS_1X2[((frame.page_byte(page, x) >> shift) & 0b11) as usize])
                .collect();
            lines.push(line);
        }
    }
    lines
}

fn render_medium(frame: &FrameBuffer) -> Vec<String> {
    let mut lines = Vec::with_capacity(Density::Medium.lines());

    // Three pages per band; rows past the bottom edge read as dark so they
    // render blank.
    for first_page in (0..PAGE_COUNT).step_by(3) {
        let columns: Vec<u32> = (0..SCREEN_WIDTH)
            .map(|x| {
                (0..3).fold(0u32, |word, i| {
                    let page = first_page + i;
                    let byte = if page < PAGE_COUNT {
                        frame.page_byte(page, x)
                    } else {
                        0xff
                    };
                    word | (byte as u32) << (8 * i)
                })
            })
            .collect();

        let rows = (SCREEN_HEIGHT - first_page * 8).min(24);
        for shift in (0..rows).step_by(3) {
            let line = columns
                .chunks_exact(2)
                .map(|pair| {
                    let left = (pair[0] >> shift) & 0b111;
                    let right = (pair[1] >> shift) & 0b111;
                    SEXTANTS_2X3[(left | right << 3) as usize]
                })
                .collect();
            lines.push(line);
        }
    }
    lines
}

fn render_high(frame: &FrameBuffer) -> Vec<String> {
    let mut lines = Vec::with_capacity(Density::High.lines());
    for page in 0..PAGE_COUNT {
        for shift in [0, 4] {
            let line = (0..SCREEN_WIDTH)
                .step_by(2)
                .map(|x| {
                    let left = (frame.page_byte(page, x) >> shift) & 0x0f;
                    let right = (frame.page_byte(page, x + 1) >> shift) & 0x0f;
                    BRAILLE_2X4[(left | right << 4) as usize]
                })
                .collect();
            lines.push(line);
        }
    }
    lines
}
