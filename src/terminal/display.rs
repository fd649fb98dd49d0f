//! Live picture in the terminal.
//!
//! Every update redraws a block made of the title line, the glyph lines and a
//! help line, then returns the cursor to the top of the block. In no-display
//! mode only the sent buttons are printed, one per line.

use std::io::{self, Write};

use super::keymap::{keymap_lines, KEYMAP_WIDTH};
use crate::ansi::{cursor_up, CR, CRLF, CURSOR_HIDE, CURSOR_SHOW, LF, RESET};
use crate::button::Press;
use crate::glyph::{self, Density};
use crate::layout::{centred, header_line, TextStyle};
use crate::marker::Marker;
use crate::screen::FrameBuffer;

/// How the live display looks.
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub density: Density,
    pub style: TextStyle,
    pub device_name: String,
    /// Buttons come from a recording, so there is no keymap to show.
    pub replaying: bool,
    /// Print sent buttons instead of the picture.
    pub no_display: bool,
}

/// Help line below the picture.
pub fn bottom_line(replaying: bool, width: usize) -> String {
    let hint = if replaying {
        "[ Ctrl-C to stop ]"
    } else {
        "[ Ctrl-K to show/hide keymap ]     [ Ctrl-C to stop ]"
    };
    centred(hint, width)
}

/// Splice the keymap into the middle of the glyph lines.
///
/// Overlay cells are drawn without the picture colours, which resume after
/// the overlay.
pub fn overlay_keymap(lines: &mut [String], width: usize, style: &TextStyle) {
    let keymap = keymap_lines();
    let first_line = lines.len().saturating_sub(keymap.len()) / 2;
    let column = width.saturating_sub(KEYMAP_WIDTH) / 2;

    for (line, help) in lines.iter_mut().skip(first_line).zip(keymap.iter()) {
        let cells: Vec<char> = line.chars().collect();
        let left: String = cells.iter().take(column).collect();
        let right: String = cells.iter().skip(column + KEYMAP_WIDTH).collect();
        *line = format!("{}{}{}{}{}", left, RESET, help, style.prefix(), right);
    }
}

/// The block written for one frame. The cursor ends at the block's top.
pub fn compose_frame(lines: &[String], marker: &Marker, options: &DisplayOptions) -> String {
    let width = options.density.columns();
    let mut block = header_line(marker, &options.device_name, width);
    block.push_str(CRLF);
    for line in lines {
        block.push_str(&options.style.paint(line));
        block.push_str(CRLF);
    }
    block.push_str(&bottom_line(options.replaying, width));
    // Back to the start of the help line without scrolling, then to the top.
    block.push_str(&cursor_up(1));
    block.push_str(CRLF);
    block.push_str(&cursor_up(lines.len() + 1));
    block
}

/// One no-display line per button, e.g. `[1.500s] ← (long press)`.
pub fn button_report(marker: &Marker) -> String {
    marker
        .buttons
        .iter()
        .map(|button| {
            let long = match button.press {
                Press::Long => " (long press)",
                Press::Short => "",
            };
            format!(
                "[{}s] {}{}{}",
                marker.seconds_label(),
                button.direction.symbol(),
                long,
                CRLF
            )
        })
        .collect()
}

/// Terminal output of a live session.
pub struct LiveDisplay<W: Write> {
    out: W,
    options: DisplayOptions,
    show_keymap: bool,
    cursor_hidden: bool,
    /// Lines between the top of the last block and its help line.
    block_height: usize,
}

impl<W: Write> LiveDisplay<W> {
    pub fn new(out: W, options: DisplayOptions) -> Self {
        Self {
            out,
            options,
            show_keymap: false,
            cursor_hidden: false,
            block_height: 0,
        }
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    pub fn keymap_shown(&self) -> bool {
        self.show_keymap
    }

    pub fn toggle_keymap(&mut self) {
        self.show_keymap = !self.show_keymap;
    }

    /// Draw `frame`, or in no-display mode print `marker`'s buttons.
    pub fn show(&mut self, frame: &FrameBuffer, marker: &Marker) -> io::Result<()> {
        if self.options.no_display {
            self.out.write_all(button_report(marker).as_bytes())?;
            return self.out.flush();
        }
        if !self.cursor_hidden {
            self.out.write_all(CURSOR_HIDE.as_bytes())?;
            self.cursor_hidden = true;
        }

        let mut lines = glyph::render(frame, self.options.density);
        if self.show_keymap && !self.options.replaying {
            overlay_keymap(&mut lines, self.options.density.columns(), &self.options.style);
        }
        let block = compose_frame(&lines, marker, &self.options);
        self.out.write_all(block.as_bytes())?;
        self.out.flush()?;
        self.block_height = lines.len() + 1;
        Ok(())
    }

    /// Print the closing marker below the picture and show the cursor again.
    pub fn finish(&mut self, final_marker: &Marker) -> io::Result<()> {
        if !self.options.no_display {
            let tail = format!(
                "{}{}{}{}",
                CR,
                final_marker.to_text(),
                CR,
                LF.repeat(self.block_height + 1)
            );
            self.out.write_all(tail.as_bytes())?;
        }
        if self.cursor_hidden {
            self.out.write_all(CURSOR_SHOW.as_bytes())?;
            self.cursor_hidden = false;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
