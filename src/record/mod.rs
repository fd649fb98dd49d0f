//! Session recording.
//!
//! A [`SessionRecorder`] fans each recorded frame out to zero or more sinks.
//! Every frame carries a [`Marker`] so the recording can later be replayed.
//! Sinks are finalised exactly once, with a closing marker that holds the
//! session's end time.

mod gif;
mod text;

pub use self::gif::{split_gap, GifSink, MAX_FRAME_MS, MIN_FRAME_MS};
pub use self::text::TextSink;

use crate::marker::{Marker, StegError};
use crate::screen::FrameBuffer;

/// Errors raised while writing a recording.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("recording I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GIF encoding failed: {0}")]
    Gif(#[from] ::gif::EncodingError),

    #[error("could not embed marker: {0}")]
    Marker(#[from] StegError),

    #[error("{0} recording already finalised")]
    Finished(&'static str),
}

/// Destination for recorded frames.
pub trait RecordingSink {
    /// Short label used in log messages.
    fn kind(&self) -> &'static str;

    /// Append one frame captured at `marker`'s timestamp.
    fn record_frame(&mut self, frame: &FrameBuffer, marker: &Marker) -> Result<(), RecordError>;

    /// Write the closing marker and flush. Further calls fail with
    /// [`RecordError::Finished`].
    fn finish(&mut self, final_marker: &Marker) -> Result<(), RecordError>;
}

/// Fans frames out to every active sink.
#[derive(Default)]
pub struct SessionRecorder {
    sinks: Vec<Box<dyn RecordingSink>>,
    frames: usize,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sink(&mut self, sink: Box<dyn RecordingSink>) {
        log::info!("Recording to {} sink", sink.kind());
        self.sinks.push(sink);
    }

    pub fn with_sink(mut self, sink: Box<dyn RecordingSink>) -> Self {
        self.add_sink(sink);
        self
    }

    /// Whether any sink is attached.
    pub fn is_active(&self) -> bool {
        !self.sinks.is_empty()
    }

    /// Frames recorded so far.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn record_frame(&mut self, frame: &FrameBuffer, marker: &Marker) -> Result<(), RecordError> {
        for sink in &mut self.sinks {
            sink.record_frame(frame, marker)?;
        }
        if self.is_active() {
            self.frames += 1;
        }
        Ok(())
    }

    /// Finalise every sink, even if an earlier one fails. The first error is
    /// returned.
    pub fn finish(mut self, final_marker: &Marker) -> Result<(), RecordError> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            match sink.finish(final_marker) {
                Ok(()) => log::debug!("Finalised {} recording", sink.kind()),
                Err(e) => {
                    log::error!("Failed to finalise {} recording: {}", sink.kind(), e);
                    first_error.get_or_insert(e);
                }
            }
        }
        log::info!("Recorded {} frames", self.frames);
        first_error.map_or(Ok(()), Err)
    }
}
