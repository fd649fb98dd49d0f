//! Replaying recorded sessions.
//!
//! Button events are extracted from the markers of a text transcript or a GIF
//! recording and paced against wall-clock time by a [`ReplaySchedule`].
//! [`play_transcript`] redraws a text transcript in the terminal instead.

mod playback;
mod schedule;

pub use playback::{play_transcript, PlaybackSummary};
pub use schedule::{prune, ReplaySchedule};

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use gif::{ColorOutput, DecodeOptions};

use crate::button::ButtonEvent;
use crate::marker::{decode_image_marker, decode_text_markers, Marker, StegError};
use crate::raster::{Raster, RASTER_HEIGHT, RASTER_WIDTH};

/// Buttons to send once the session clock reaches `timestamp_ms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayEvent {
    pub timestamp_ms: u64,
    pub buttons: Vec<ButtonEvent>,
}

impl ReplayEvent {
    pub fn new(timestamp_ms: u64, buttons: Vec<ButtonEvent>) -> Self {
        Self {
            timestamp_ms,
            buttons,
        }
    }
}

impl From<Marker> for ReplayEvent {
    fn from(marker: Marker) -> Self {
        Self::new(marker.timestamp_ms, marker.buttons)
    }
}

/// Errors raised while reading a recording.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("cannot read recording: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot decode GIF: {0}")]
    Gif(#[from] gif::DecodingError),

    #[error("GIF is {width}x{height}, expected {RASTER_WIDTH}x{RASTER_HEIGHT}")]
    Geometry { width: u16, height: u16 },

    #[error("GIF frame {0} has no palette")]
    MissingPalette(usize),

    #[error("GIF frame {frame}: {source}")]
    Steg {
        frame: usize,
        #[source]
        source: StegError,
    },
}

/// Kind of recording, told apart by its first bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingFormat {
    Text,
    Gif,
}

impl RecordingFormat {
    pub fn detect(head: &[u8]) -> Self {
        if head.starts_with(b"GIF8") {
            Self::Gif
        } else {
            Self::Text
        }
    }
}

/// Every marker of a text transcript, in file order.
pub fn load_text_events(mut reader: impl Read) -> Result<Vec<ReplayEvent>, ReplayError> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    let text = String::from_utf8_lossy(&raw);
    Ok(decode_text_markers(&text)
        .into_iter()
        .map(ReplayEvent::from)
        .collect())
}

fn rgb_triples(bytes: &[u8]) -> Vec<[u8; 3]> {
    bytes.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect()
}

/// Every marker hidden in the frames of a GIF recording, in frame order.
///
/// Frames numbered only (`[n]`) carry no marker and are skipped.
pub fn load_gif_events(reader: impl Read) -> Result<Vec<ReplayEvent>, ReplayError> {
    let mut options = DecodeOptions::new();
    options.set_color_output(ColorOutput::Indexed);
    let mut decoder = options.read_info(reader)?;

    let (width, height) = (decoder.width(), decoder.height());
    if (width as usize, height as usize) != (RASTER_WIDTH, RASTER_HEIGHT) {
        return Err(ReplayError::Geometry { width, height });
    }
    let global = decoder.global_palette().map(rgb_triples);

    let mut events = Vec::new();
    let mut index = 0;
    while let Some(frame) = decoder.read_next_frame()? {
        let palette = match (&frame.palette, &global) {
            (Some(local), _) => rgb_triples(local),
            (None, Some(global)) => global.clone(),
            (None, None) => return Err(ReplayError::MissingPalette(index)),
        };

        // Partial frames do not cover the marker scanline.
        let raster = match (frame.left, frame.top) {
            (0, 0) => Raster::from_indices(
                frame.width as usize,
                frame.height as usize,
                frame.buffer.to_vec(),
            ),
            _ => None,
        };
        match raster {
            Some(raster) => {
                let marker = decode_image_marker(&raster, &palette)
                    .map_err(|source| ReplayError::Steg { frame: index, source })?;
                events.extend(marker.map(ReplayEvent::from));
            }
            None => log::debug!("Skipping partial GIF frame {}", index),
        }
        index += 1;
    }
    log::debug!("Decoded {} GIF frames", index);
    Ok(events)
}

/// Read the events of the recording at `path`, whatever its format.
pub fn read_events(path: &Path) -> Result<Vec<ReplayEvent>, ReplayError> {
    let mut reader = BufReader::new(File::open(path)?);
    let format = RecordingFormat::detect(reader.fill_buf()?);
    match format {
        RecordingFormat::Gif => load_gif_events(reader),
        RecordingFormat::Text => load_text_events(reader),
    }
}

/// Replay events for `path`. Unreadable recordings give no events.
pub fn load_events(path: &Path) -> Vec<ReplayEvent> {
    match read_events(path) {
        Ok(events) => {
            log::info!("Loaded {} replay events from {}", events.len(), path.display());
            events
        }
        Err(e) => {
            log::warn!("Cannot replay {}: {}", path.display(), e);
            Vec::new()
        }
    }
}
