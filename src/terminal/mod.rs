//! Terminal output - live display, keymap overlay, raw mode and cleanup.

mod display;
mod keymap;
mod raw_mode;

pub use display::{
    bottom_line, button_report, compose_frame, overlay_keymap, DisplayOptions, LiveDisplay,
};
pub use keymap::{keymap_lines, KEYMAP_WIDTH};
pub use raw_mode::RawModeGuard;
