//! CLI enum types.

use clap::ValueEnum;

use crate::glyph::Density;

/// Glyph density for the picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DensityArg {
    /// 1x2 half blocks, 128x32 cells
    #[default]
    Low,
    /// 2x3 sextants, 64x22 cells
    #[value(alias = "mid")]
    Medium,
    /// 2x4 braille, 64x16 cells
    High,
}

impl From<DensityArg> for Density {
    fn from(d: DensityArg) -> Self {
        match d {
            DensityArg::Low => Density::Low,
            DensityArg::Medium => Density::Medium,
            DensityArg::High => Density::High,
        }
    }
}
