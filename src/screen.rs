//! Packed monochrome frame buffer as sent by the device.
//!
//! The display is 128x64 pixels stored as 8 horizontal pages of 128 bytes.
//! Within a page byte, bit `i` (0 = top) addresses row `page * 8 + i` of that
//! column. A set bit is a dark pixel.

/// Display width in pixels.
pub const SCREEN_WIDTH: usize = 128;

/// Display height in pixels.
pub const SCREEN_HEIGHT: usize = 64;

/// Number of 8-row pages.
pub const PAGE_COUNT: usize = SCREEN_HEIGHT / 8;

/// Size of one raw frame in bytes.
pub const FRAME_BYTES: usize = SCREEN_WIDTH * PAGE_COUNT;

/// An immutable snapshot of the device display.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: [u8; FRAME_BYTES],
}

impl FrameBuffer {
    /// A frame with no dark pixels.
    pub fn blank() -> Self {
        Self {
            bytes: [0; FRAME_BYTES],
        }
    }

    pub fn from_array(bytes: [u8; FRAME_BYTES]) -> Self {
        Self { bytes }
    }

    /// Build a frame from a raw buffer, returning `None` if the length is wrong.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; FRAME_BYTES] = bytes.try_into().ok()?;
        Some(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_BYTES] {
        &self.bytes
    }

    /// The byte holding rows `page*8..page*8+8` of column `x`.
    #[inline]
    pub fn page_byte(&self, page: usize, x: usize) -> u8 {
        self.bytes[page * SCREEN_WIDTH + x]
    }

    /// Whether the pixel at `(x, y)` is dark.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        (self.page_byte(y / 8, x) >> (y % 8)) & 1 == 1
    }

    /// Set or clear the pixel at `(x, y)`.
    pub fn set_pixel(&mut self, x: usize, y: usize, dark: bool) {
        let byte = &mut self.bytes[(y / 8) * SCREEN_WIDTH + x];
        if dark {
            *byte |= 1 << (y % 8);
        } else {
            *byte &= !(1 << (y % 8));
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::blank()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dark = self.bytes.iter().map(|b| b.count_ones()).sum::<u32>();
        f.debug_struct("FrameBuffer")
            .field("dark_pixels", &dark)
            .finish()
    }
}
