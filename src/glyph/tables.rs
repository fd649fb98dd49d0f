//! Precomputed glyph lookup tables.
//!
//! Every table is indexed directly by the source bit pattern of one glyph
//! cell, where a set bit is a dark pixel. Dark pixels are drawn as gaps in the
//! foreground glyph, so an all-clear cell is a full block.

/// Braille base character (U+2800, empty braille pattern).
pub const BRAILLE_BASE: char = '\u{2800}';

/// 1x2 cells: index = lower << 1 | upper.
pub const BLOCKS_1X2: [char; 4] = ['\u{2588}', '\u{2584}', '\u{2580}', ' '];

/// 2x3 sextant cells.
///
/// Bits 0-2 are the left column top to bottom, bits 3-5 the right column.
#[rustfmt::skip]
pub const SEXTANTS_2X3: [char; 64] = [
    '\u{2588}',  '\u{1FB3B}', '\u{1FB38}', '\u{1FB37}',
    '\u{1FB2C}', '\u{1FB2B}', '\u{1FB28}', '\u{2590}',
    '\u{1FB3A}', '\u{1FB39}', '\u{1FB36}', '\u{1FB35}',
    '\u{1FB2A}', '\u{1FB29}', '\u{1FB27}', '\u{1FB26}',
    '\u{1FB34}', '\u{1FB33}', '\u{1FB30}', '\u{1FB2F}',
    '\u{1FB25}', '\u{1FB24}', '\u{1FB21}', '\u{1FB20}',
    '\u{1FB32}', '\u{1FB31}', '\u{1FB2E}', '\u{1FB2D}',
    '\u{1FB23}', '\u{1FB22}', '\u{1FB1F}', '\u{1FB1E}',
    '\u{1FB1D}', '\u{1FB1C}', '\u{1FB19}', '\u{1FB18}',
    '\u{1FB0E}', '\u{1FB0D}', '\u{1FB0A}', '\u{1FB09}',
    '\u{1FB1B}', '\u{1FB1A}', '\u{1FB17}', '\u{1FB16}',
    '\u{1FB0C}', '\u{1FB0B}', '\u{1FB08}', '\u{1FB07}',
    '\u{1FB15}', '\u{1FB14}', '\u{1FB12}', '\u{1FB11}',
    '\u{1FB06}', '\u{1FB05}', '\u{1FB02}', '\u{1FB01}',
    '\u{258C}',  '\u{1FB13}', '\u{1FB10}', '\u{1FB0F}',
    '\u{1FB04}', '\u{1FB03}', '\u{1FB00}', ' ',
];

/// Braille dot bit for each source bit.
///
/// Source bits 0-3 are the left column rows 0-3, bits 4-7 the right column.
/// The braille bit positions are:
/// ```text
/// [0,0]=1   [1,0]=8
/// [0,1]=2   [1,1]=16
/// [0,2]=4   [1,2]=32
/// [0,3]=64  [1,3]=128
/// ```
const DOT_FOR_SOURCE_BIT: [u32; 8] = [0, 1, 2, 6, 3, 4, 5, 7];

/// 2x4 braille cells, a dot for every lit pixel.
pub const BRAILLE_2X4: [char; 256] = build_braille_table();

const fn build_braille_table() -> [char; 256] {
    let mut table = [BRAILLE_BASE; 256];
    let mut src = 0usize;
    while src < 256 {
        let lit = !(src as u8);
        let mut dots = 0u32;
        let mut bit = 0usize;
        while bit < 8 {
            if (lit >> bit) & 1 == 1 {
                dots |= 1 << DOT_FOR_SOURCE_BIT[bit];
            }
            bit += 1;
        }
        table[src] = match char::from_u32(BRAILLE_BASE as u32 + dots) {
            Some(c) => c,
            None => BRAILLE_BASE,
        };
        src += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braille_table_extremes() {
        assert_eq!(BRAILLE_2X4[0x00], '\u{28FF}');
        assert_eq!(BRAILLE_2X4[0xFF], BRAILLE_BASE);
    }

    #[test]
    fn test_braille_table_single_dots() {
        // Top-left dark -> dot 1 missing
        assert_eq!(BRAILLE_2X4[0x01], '\u{28FE}');
        // Bottom-left dark -> dot 7 missing
        assert_eq!(BRAILLE_2X4[0x08], '\u{28BF}');
        // Top-right dark -> dot 4 missing
        assert_eq!(BRAILLE_2X4[0x10], '\u{28F7}');
        // Bottom-right dark -> dot 8 missing
        assert_eq!(BRAILLE_2X4[0x80], '\u{287F}');
    }

    #[test]
    fn test_sextant_degenerate_cases() {
        assert_eq!(SEXTANTS_2X3[0b000_000], '\u{2588}');
        assert_eq!(SEXTANTS_2X3[0b000_111], '\u{2590}');
        assert_eq!(SEXTANTS_2X3[0b111_000], '\u{258C}');
        assert_eq!(SEXTANTS_2X3[0b111_111], ' ');
    }

    #[test]
    fn test_tables_have_unique_glyphs() {
        let mut sextants = SEXTANTS_2X3.to_vec();
        sextants.sort_unstable();
        sextants.dedup();
        assert_eq!(sextants.len(), 64);

        let mut braille = BRAILLE_2X4.to_vec();
        braille.sort_unstable();
        braille.dedup();
        assert_eq!(braille.len(), 256);
    }
}
