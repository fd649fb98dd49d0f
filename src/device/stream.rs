//! Device link over a pair of byte streams.
//!
//! An external RPC bridge writes raw 1024-byte frames to one stream and reads
//! button commands such as `SHORT LEFT` (one per line) from the other. Named
//! pipes work well for this.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use super::{DeviceError, DeviceLink};
use crate::button::ButtonEvent;
use crate::screen::{FrameBuffer, FRAME_BYTES};

pub struct StreamLink<R, W> {
    name: String,
    frames: R,
    buttons: W,
}

impl<R: Read, W: Write> StreamLink<R, W> {
    pub fn new(name: impl Into<String>, frames: R, buttons: W) -> Self {
        Self {
            name: name.into(),
            frames,
            buttons,
        }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.frames, self.buttons)
    }
}

impl StreamLink<File, BufWriter<File>> {
    /// Open the frame and button paths (regular files or named pipes).
    pub fn open(name: impl Into<String>, frames: &Path, buttons: &Path) -> io::Result<Self> {
        log::info!("Opening stream link: frames={:?} buttons={:?}", frames, buttons);
        let frames = File::open(frames)?;
        let buttons = OpenOptions::new().append(true).create(true).open(buttons)?;
        Ok(Self::new(name, frames, BufWriter::new(buttons)))
    }
}

/// Read up to one frame, tolerating short reads from pipes.
fn read_record(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

impl<R: Read, W: Write> DeviceLink for StreamLink<R, W> {
    fn device_name(&self) -> &str {
        &self.name
    }

    fn fetch_frame(&mut self) -> Result<FrameBuffer, DeviceError> {
        let mut buf = [0u8; FRAME_BYTES];
        match read_record(&mut self.frames, &mut buf)? {
            0 => Err(DeviceError::Disconnected),
            FRAME_BYTES => Ok(FrameBuffer::from_array(buf)),
            n => Err(DeviceError::FrameLength(n)),
        }
    }

    fn send_button(&mut self, button: ButtonEvent) -> Result<(), DeviceError> {
        writeln!(self.buttons, "{}", button)?;
        self.buttons.flush()?;
        Ok(())
    }
}
