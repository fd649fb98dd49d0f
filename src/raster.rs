//! Indexed two-tone raster used for GIF recording.
//!
//! The frame buffer is upscaled 4x to 512x256. Pixels index a fixed 4-entry
//! palette holding two near-identical colour pairs: slots 0 and 2 are the
//! foreground (lit) pair, slots 1 and 3 the background (dark) pair. The
//! second member of each pair differs by one unit of blue and is only used by
//! the marker channel on the first scanline.

use crate::screen::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};

pub const RASTER_SCALE: usize = 4;
pub const RASTER_WIDTH: usize = SCREEN_WIDTH * RASTER_SCALE;
pub const RASTER_HEIGHT: usize = SCREEN_HEIGHT * RASTER_SCALE;

/// Palette slot of a lit pixel.
pub const LIT: u8 = 0;
/// Palette slot of a dark pixel.
pub const DARK: u8 = 1;

/// Recording palette, in slot order.
pub const PALETTE: [[u8; 3]; 4] = [
    [0xfe, 0x8a, 0x2c],
    [0x00, 0x00, 0x00],
    [0xfe, 0x8a, 0x2d],
    [0x00, 0x00, 0x01],
];

/// Palette flattened to `r, g, b` triples as GIF expects.
pub fn palette_bytes() -> Vec<u8> {
    PALETTE.iter().flatten().copied().collect()
}

/// Luminance using BT.601 weights.
pub fn luma(rgb: [u8; 3]) -> u32 {
    (299 * rgb[0] as u32 + 587 * rgb[1] as u32 + 114 * rgb[2] as u32) / 1000
}

/// An indexed image.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// Wrap raw palette indices. Returns `None` if the size does not match.
    pub fn from_indices(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// 4x box upscale of a frame buffer.
    pub fn upscaled(frame: &FrameBuffer) -> Self {
        let mut pixels = Vec::with_capacity(RASTER_WIDTH * RASTER_HEIGHT);
        for y in 0..SCREEN_HEIGHT {
            let row: Vec<u8> = (0..SCREEN_WIDTH)
                .flat_map(|x| {
                    let slot = if frame.pixel(x, y) { DARK } else { LIT };
                    std::iter::repeat(slot).take(RASTER_SCALE)
                })
                .collect();
            for _ in 0..RASTER_SCALE {
                pixels.extend_from_slice(&row);
            }
        }
        Self {
            width: RASTER_WIDTH,
            height: RASTER_HEIGHT,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn first_row(&self) -> &[u8] {
        &self.pixels[..self.width]
    }

    pub fn first_row_mut(&mut self) -> &mut [u8] {
        &mut self.pixels[..self.width]
    }
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
