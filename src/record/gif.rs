//! Animated GIF sink.
//!
//! Frames are upscaled rasters using the four-colour recording palette, each
//! carrying its marker in the first scanline. A frame is shown until the next
//! recorded frame, so it is only written once that next frame (or the end of
//! the session) arrives.
//!
//! GIF frame delays are bounded, so long pauses are split across numbered
//! copies of the same picture. The first frame is preceded by a short copy
//! numbered `[-1]` and the last is followed by a short copy carrying the
//! closing marker; players that skip the first or last frame lose nothing.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ::gif::{Encoder, Frame, Repeat};

use super::{RecordError, RecordingSink};
use crate::marker::{encode_image_marker, Marker};
use crate::raster::{palette_bytes, Raster, RASTER_HEIGHT, RASTER_WIDTH};
use crate::screen::FrameBuffer;

/// Shortest frame duration written, in milliseconds.
pub const MIN_FRAME_MS: u64 = 10;

/// Longest frame duration a GIF can express, in milliseconds.
pub const MAX_FRAME_MS: u64 = 655_350;

/// Split a display duration into GIF-sized chunks.
///
/// Every chunk lies in `MIN_FRAME_MS..=MAX_FRAME_MS` and, for durations of at
/// least `MIN_FRAME_MS`, the chunks add up exactly.
pub fn split_gap(total_ms: u64) -> Vec<u64> {
    let mut chunks = Vec::new();
    let mut remaining = total_ms;
    while remaining > MAX_FRAME_MS {
        // Never leave a remainder too short to express.
        let take = if remaining - MAX_FRAME_MS < MIN_FRAME_MS {
            remaining - MIN_FRAME_MS
        } else {
            MAX_FRAME_MS
        };
        chunks.push(take);
        remaining -= take;
    }
    chunks.push(remaining.max(MIN_FRAME_MS));
    chunks
}

fn shortened(ms: u64) -> u64 {
    ms.saturating_sub(MIN_FRAME_MS).max(MIN_FRAME_MS)
}

fn centiseconds(ms: u64) -> u16 {
    ((ms + 5) / 10).clamp(1, u16::MAX as u64) as u16
}

struct PendingFrame {
    raster: Raster,
    captured_ms: u64,
    is_first: bool,
}

pub struct GifSink<W: Write> {
    /// Output before the first frame creates the encoder.
    writer: Option<W>,
    encoder: Option<Encoder<W>>,
    pending: Option<PendingFrame>,
    next_number: u64,
    frames_written: usize,
    finished: bool,
}

impl<W: Write> GifSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: Some(out),
            encoder: None,
            pending: None,
            next_number: 0,
            frames_written: 0,
            finished: false,
        }
    }

    /// GIF frames written so far, including copies.
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// The underlying writer once the sink has been finalised.
    pub fn into_inner(self) -> Option<W> {
        self.writer
    }

    fn take_number(&mut self) -> u64 {
        let number = self.next_number;
        self.next_number += 1;
        number
    }

    fn encoder(&mut self) -> Result<&mut Encoder<W>, RecordError> {
        if self.encoder.is_none() {
            let out = self.writer.take().ok_or(RecordError::Finished("GIF"))?;
            let mut encoder = Encoder::new(
                out,
                RASTER_WIDTH as u16,
                RASTER_HEIGHT as u16,
                &palette_bytes(),
            )?;
            encoder.set_repeat(Repeat::Infinite)?;
            self.encoder = Some(encoder);
        }
        self.encoder.as_mut().ok_or(RecordError::Finished("GIF"))
    }

    fn write_raster(&mut self, raster: &Raster, duration_ms: u64) -> Result<(), RecordError> {
        let frame = Frame {
            width: raster.width() as u16,
            height: raster.height() as u16,
            buffer: Cow::Borrowed(raster.pixels()),
            delay: centiseconds(duration_ms),
            ..Frame::default()
        };
        self.encoder()?.write_frame(&frame)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Write a copy of `raster` carrying a different payload.
    fn write_copy(&mut self, raster: &Raster, payload: &str, duration_ms: u64) -> Result<(), RecordError> {
        let mut copy = raster.clone();
        encode_image_marker(&mut copy, payload)?;
        self.write_raster(&copy, duration_ms)
    }

    /// Write the pending frame, shown until `until_ms`.
    fn flush_pending(&mut self, pending: &PendingFrame, until_ms: u64, is_last: bool) -> Result<(), RecordError> {
        let mut chunks = split_gap(until_ms.saturating_sub(pending.captured_ms));
        // The edge copies take up MIN_FRAME_MS of their own.
        if pending.is_first {
            chunks[0] = shortened(chunks[0]);
        }
        if is_last {
            let last = chunks.len() - 1;
            chunks[last] = shortened(chunks[last]);
        }

        self.write_raster(&pending.raster, chunks[0])?;
        for &chunk in &chunks[1..] {
            let number = self.take_number();
            self.write_copy(&pending.raster, &format!("[{}]", number), chunk)?;
        }
        if chunks.len() > 1 {
            log::debug!("Split {}ms pause into {} GIF frames", until_ms - pending.captured_ms, chunks.len());
        }
        Ok(())
    }
}

impl GifSink<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, RecordError> {
        let file = File::create(path)?;
        log::info!("Writing GIF recording to {}", path.display());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RecordingSink for GifSink<W> {
    fn kind(&self) -> &'static str {
        "GIF"
    }

    fn record_frame(&mut self, frame: &FrameBuffer, marker: &Marker) -> Result<(), RecordError> {
        if self.finished {
            return Err(RecordError::Finished(self.kind()));
        }
        // Copies of the previous frame are numbered before this one.
        let previous = self.pending.take();
        if let Some(previous) = &previous {
            self.flush_pending(previous, marker.timestamp_ms, false)?;
        }

        let mut raster = Raster::upscaled(frame);
        let number = self.take_number();
        encode_image_marker(&mut raster, &marker.image_payload(number))?;

        let is_first = previous.is_none();
        if is_first {
            self.write_copy(&raster, "[-1]", MIN_FRAME_MS)?;
        }
        self.pending = Some(PendingFrame {
            raster,
            captured_ms: marker.timestamp_ms,
            is_first,
        });
        Ok(())
    }

    fn finish(&mut self, final_marker: &Marker) -> Result<(), RecordError> {
        if self.finished {
            return Err(RecordError::Finished(self.kind()));
        }
        self.finished = true;

        match self.pending.take() {
            Some(last) => {
                self.flush_pending(&last, final_marker.timestamp_ms, true)?;
                let number = self.take_number();
                self.write_copy(&last.raster, &final_marker.image_payload(number), MIN_FRAME_MS)?;
            }
            None => log::warn!("No frames recorded, GIF recording is empty"),
        }

        if let Some(encoder) = self.encoder.take() {
            let mut out = encoder.into_inner()?;
            out.flush()?;
            self.writer = Some(out);
        } else if let Some(out) = self.writer.as_mut() {
            out.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_short_gap_unchanged() {
        assert_eq!(split_gap(1_500), vec![1_500]);
        assert_eq!(split_gap(MAX_FRAME_MS), vec![MAX_FRAME_MS]);
    }

    #[test]
    fn test_split_clamps_tiny_gap() {
        assert_eq!(split_gap(0), vec![MIN_FRAME_MS]);
        assert_eq!(split_gap(3), vec![MIN_FRAME_MS]);
    }

    #[test]
    fn test_split_long_gap() {
        let chunks = split_gap(2_000_000);
        assert_eq!(chunks, vec![655_350, 655_350, 655_350, 33_950]);
    }

    #[test]
    fn test_split_avoids_short_remainder() {
        let chunks = split_gap(MAX_FRAME_MS + 4);
        assert_eq!(chunks, vec![MAX_FRAME_MS - 6, MIN_FRAME_MS]);
        assert_eq!(chunks.iter().sum::<u64>(), MAX_FRAME_MS + 4);
    }

    #[test]
    fn test_centiseconds_rounding() {
        assert_eq!(centiseconds(10), 1);
        assert_eq!(centiseconds(14), 1);
        assert_eq!(centiseconds(15), 2);
        assert_eq!(centiseconds(1), 1);
        assert_eq!(centiseconds(MAX_FRAME_MS), 65_535);
    }

    #[test]
    fn test_frame_layout() {
        let mut sink = GifSink::new(Vec::new());
        sink.record_frame(&FrameBuffer::blank(), &Marker::new(0, vec![])).unwrap();
        // lead copy written immediately, first frame pending
        assert_eq!(sink.frames_written(), 1);
        sink.record_frame(&FrameBuffer::blank(), &Marker::new(1_000, vec![])).unwrap();
        assert_eq!(sink.frames_written(), 2);
        sink.finish(&Marker::new(2_000, vec![])).unwrap();
        // second frame and tail copy
        assert_eq!(sink.frames_written(), 4);

        let bytes = sink.into_inner().unwrap();
        assert_eq!(&bytes[..6], b"GIF89a");
        assert_eq!(bytes.last(), Some(&0x3b));
    }

    #[test]
    fn test_empty_recording_writes_nothing() {
        let mut sink = GifSink::new(Vec::new());
        sink.finish(&Marker::new(100, vec![])).unwrap();
        assert_eq!(sink.frames_written(), 0);
        assert!(sink.into_inner().unwrap().is_empty());
    }

    #[test]
    fn test_finalised_once() {
        let mut sink = GifSink::new(Vec::new());
        sink.record_frame(&FrameBuffer::blank(), &Marker::default()).unwrap();
        sink.finish(&Marker::new(10, vec![])).unwrap();
        assert!(matches!(
            sink.finish(&Marker::default()),
            Err(RecordError::Finished("GIF"))
        ));
        assert!(sink.record_frame(&FrameBuffer::blank(), &Marker::default()).is_err());
    }
}
