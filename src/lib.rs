//! flipper-term library crate.
//!
//! Mirrors the 128x64 monochrome screen of a handheld device in the
//! terminal, forwards keyboard input as button presses, records sessions as
//! text transcripts or animated GIFs and replays them. This module exposes the
//! components for the binary and for integration testing.

pub mod ansi;
pub mod button;
pub mod cli;
pub mod config;
pub mod device;
pub mod gate;
pub mod glyph;
pub mod input;
pub mod layout;
pub mod marker;
pub mod raster;
pub mod record;
pub mod replay;
pub mod screen;
pub mod session;
pub mod terminal;
