//! Terminal transcript sink.
//!
//! Each frame is written as a title line followed by the styled glyph lines,
//! then the cursor moves back up so the next frame overwrites it. Replaying
//! the file (or just `cat`ing it) redraws the session in place. The hidden
//! marker at the start of every title line lets the player pace playback.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{RecordError, RecordingSink};
use crate::ansi::{cursor_up, CR, CRLF, LF};
use crate::glyph::{self, Density};
use crate::layout::{header_line, TextStyle};
use crate::marker::Marker;
use crate::screen::FrameBuffer;

pub struct TextSink<W: Write> {
    out: W,
    density: Density,
    style: TextStyle,
    device_name: String,
    /// Lines the cursor sits above the bottom of the last block.
    block_height: usize,
    finished: bool,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W, density: Density, style: TextStyle, device_name: impl Into<String>) -> Self {
        Self {
            out,
            density,
            style,
            device_name: device_name.into(),
            block_height: 0,
            finished: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TextSink<BufWriter<File>> {
    /// Create (or truncate) the transcript at `path`.
    pub fn create(
        path: &Path,
        density: Density,
        style: TextStyle,
        device_name: impl Into<String>,
    ) -> Result<Self, RecordError> {
        let file = File::create(path)?;
        log::info!("Writing text transcript to {}", path.display());
        Ok(Self::new(BufWriter::new(file), density, style, device_name))
    }
}

impl<W: Write> RecordingSink for TextSink<W> {
    fn kind(&self) -> &'static str {
        "text"
    }

    fn record_frame(&mut self, frame: &FrameBuffer, marker: &Marker) -> Result<(), RecordError> {
        if self.finished {
            return Err(RecordError::Finished(self.kind()));
        }
        let lines = glyph::render(frame, self.density);
        let width = self.density.columns();

        let mut block = header_line(marker, &self.device_name, width);
        block.push_str(CRLF);
        for line in &lines {
            block.push_str(&self.style.paint(line));
            block.push_str(CRLF);
        }
        block.push_str(&cursor_up(lines.len() + 1));

        self.out.write_all(block.as_bytes())?;
        self.block_height = lines.len() + 1;
        Ok(())
    }

    fn finish(&mut self, final_marker: &Marker) -> Result<(), RecordError> {
        if self.finished {
            return Err(RecordError::Finished(self.kind()));
        }
        self.finished = true;
        // Leave the cursor below the last block.
        let tail = format!(
            "{}{}{}{}",
            CR,
            final_marker.to_text(),
            CR,
            LF.repeat(self.block_height + 1)
        );
        self.out.write_all(tail.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
