//! Link to the mirrored device.
//!
//! The session only needs two operations from the device: fetch the current
//! display and press a button. Anything that can do both implements
//! [`DeviceLink`].

mod stream;

pub use stream::StreamLink;

use crate::button::ButtonEvent;
use crate::screen::{FrameBuffer, FRAME_BYTES};

/// Errors that can occur while talking to the device.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("device link closed")]
    Disconnected,

    #[error("device sent a {0}-byte frame, expected {FRAME_BYTES}")]
    FrameLength(usize),

    #[error("device I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A connection able to snapshot the screen and send button presses.
///
/// Calls are made from the session loop only, never concurrently.
pub trait DeviceLink {
    /// Human-readable device name shown above the picture.
    fn device_name(&self) -> &str;

    /// Block until the current display contents are available.
    fn fetch_frame(&mut self) -> Result<FrameBuffer, DeviceError>;

    /// Send one complete press-and-release.
    fn send_button(&mut self, button: ButtonEvent) -> Result<(), DeviceError>;
}

impl<L: DeviceLink + ?Sized> DeviceLink for Box<L> {
    fn device_name(&self) -> &str {
        (**self).device_name()
    }

    fn fetch_frame(&mut self) -> Result<FrameBuffer, DeviceError> {
        (**self).fetch_frame()
    }

    fn send_button(&mut self, button: ButtonEvent) -> Result<(), DeviceError> {
        (**self).send_button(button)
    }
}

impl<L: DeviceLink + ?Sized> DeviceLink for &mut L {
    fn device_name(&self) -> &str {
        (**self).device_name()
    }

    fn fetch_frame(&mut self) -> Result<FrameBuffer, DeviceError> {
        (**self).fetch_frame()
    }

    fn send_button(&mut self, button: ButtonEvent) -> Result<(), DeviceError> {
        (**self).send_button(button)
    }
}
