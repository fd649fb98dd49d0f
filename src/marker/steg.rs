//! Marker payload hidden in the first scanline of an indexed image.
//!
//! Each of the first 512 pixels carries one bit, most significant bit first
//! per character. A pixel keeps its colour pair (lit or dark) and only
//! switches between the two near-identical members of that pair: slots 0/1
//! for a zero bit, slots 2/3 for a one bit.

use super::{decode_text_marker, Marker};
use crate::ansi::ESC;
use crate::raster::{luma, Raster, PALETTE};

/// Bits carried by one scanline.
pub const STEG_BITS: usize = 512;

/// Characters carried by one scanline.
pub const STEG_CHARS: usize = STEG_BITS / 8;

/// Structural problems that make the channel unreadable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StegError {
    #[error("palette has {0} colours, expected 4")]
    PaletteSize(usize),

    #[error("scanline is {0} pixels wide, need at least {STEG_BITS}")]
    ScanlineTooNarrow(usize),

    #[error("pixel uses palette slot {0}, outside the 4-colour palette")]
    SlotOutOfRange(u8),
}

fn payload_bits(payload: &str) -> impl Iterator<Item = u8> + '_ {
    payload
        .bytes()
        .take(STEG_CHARS)
        .flat_map(|byte| (0..8).rev().map(move |i| (byte >> i) & 1))
        .chain(std::iter::repeat(0))
        .take(STEG_BITS)
}

/// Hide `payload` in a scanline of palette slots.
///
/// Characters past the 64th are dropped; shorter payloads are zero-padded.
pub fn encode_payload(row: &mut [u8], payload: &str) -> Result<(), StegError> {
    if row.len() < STEG_BITS {
        return Err(StegError::ScanlineTooNarrow(row.len()));
    }
    // Rejected rows are left untouched.
    if let Some(&slot) = row[..STEG_BITS].iter().find(|&&slot| slot > 3) {
        return Err(StegError::SlotOutOfRange(slot));
    }
    for (pixel, bit) in row.iter_mut().zip(payload_bits(payload)) {
        *pixel = (*pixel & 1) | (bit << 1);
    }
    Ok(())
}

/// Hide `payload` in the first scanline of `raster`.
pub fn encode_image_marker(raster: &mut Raster, payload: &str) -> Result<(), StegError> {
    encode_payload(raster.first_row_mut(), payload)
}

/// Map each palette slot of a decoded image to the bit it carries.
///
/// Slots are split into the lit and dark pairs by luminance, then matched to
/// the nearest member of that pair in the recording palette. Colours shifted
/// by re-encoding still land on the right pair.
fn bit_table(palette: &[[u8; 3]]) -> Result<[u8; 4], StegError> {
    if palette.len() != 4 {
        return Err(StegError::PaletteSize(palette.len()));
    }
    let threshold = (luma(PALETTE[0]) + luma(PALETTE[1])) / 2;
    let distance = |a: [u8; 3], b: [u8; 3]| -> u32 {
        a.iter()
            .zip(b.iter())
            .map(|(&x, &y)| (x as i32 - y as i32).pow(2) as u32)
            .sum()
    };

    let mut table = [0u8; 4];
    for (slot, &color) in palette.iter().enumerate() {
        let pair = if luma(color) > threshold { 0 } else { 1 };
        let zero = distance(color, PALETTE[pair]);
        let one = distance(color, PALETTE[pair | 2]);
        table[slot] = u8::from(one < zero);
    }
    Ok(table)
}

fn is_payload_char(byte: u8) -> bool {
    byte == ESC as u8 || (0x20..=0x7e).contains(&byte)
}

/// Read the hidden payload from a scanline of palette slots.
///
/// Stops at the first character that is neither printable ASCII nor ESC, so
/// a damaged tail still yields the intact prefix.
pub fn decode_payload(row: &[u8], palette: &[[u8; 3]]) -> Result<String, StegError> {
    let bits = bit_table(palette)?;
    if row.len() < STEG_BITS {
        return Err(StegError::ScanlineTooNarrow(row.len()));
    }

    let mut payload = String::new();
    for chunk in row[..STEG_BITS].chunks_exact(8) {
        let mut byte = 0u8;
        for &slot in chunk {
            let bit = *bits
                .get(slot as usize)
                .ok_or(StegError::SlotOutOfRange(slot))?;
            byte = byte << 1 | bit;
        }
        if !is_payload_char(byte) {
            break;
        }
        payload.push(byte as char);
    }
    Ok(payload)
}

/// Read the marker hidden in a raster, if there is one.
///
/// Frames that only carry a frame number yield `Ok(None)`.
pub fn decode_image_marker(
    raster: &Raster,
    palette: &[[u8; 3]],
) -> Result<Option<Marker>, StegError> {
    let payload = decode_payload(raster.first_row(), palette)?;
    Ok(decode_text_marker(&payload))
}
