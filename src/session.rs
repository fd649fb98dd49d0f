//! The mirror session loop.
//!
//! Each iteration takes pending input (keyboard messages or due replay
//! events), sends it to the device, fetches the display and lets the
//! [`ChangeGate`] decide whether to record and redraw. Whatever ends the
//! loop, the same finalisation runs: sinks are closed with a final marker,
//! the terminal is restored and the capture thread is joined.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::button::ButtonEvent;
use crate::device::{DeviceError, DeviceLink};
use crate::gate::{ChangeGate, GateInputs};
use crate::input::{CaptureMessage, InputCapture};
use crate::marker::Marker;
use crate::record::{RecordError, SessionRecorder};
use crate::replay::ReplaySchedule;
use crate::terminal::{LiveDisplay, RawModeGuard};

/// Errors that end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("terminal output failed: {0}")]
    Display(#[from] io::Error),

    #[error("keyboard capture failed: {0}")]
    Capture(io::Error),
}

/// Where button presses come from.
pub enum InputSource {
    Keyboard(InputCapture),
    Replay(ReplaySchedule),
    /// Mirror only.
    Idle,
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user pressed Ctrl-C in the capture thread.
    Stopped,
    /// The interrupt flag was raised.
    Interrupted,
    /// Every replay event has been sent.
    ReplayFinished,
}

/// What a finished session did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub end: SessionEnd,
    pub duration: Duration,
    pub frames_shown: usize,
    pub frames_recorded: usize,
    pub buttons_sent: usize,
}

/// Install the Ctrl-C handler and return the flag it raises.
///
/// In raw mode Ctrl-C arrives as a key press instead; this covers replay and
/// playback, where the terminal stays cooked.
///
/// This should be called once at program startup.
pub fn setup_ctrlc_handler() -> Result<Arc<AtomicBool>, ctrlc::Error> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })?;
    Ok(flag)
}

/// Counters kept across iterations.
#[derive(Default)]
struct LoopState {
    frames_shown: usize,
    buttons_sent: usize,
    /// Buttons sent but not yet carried by a recorded marker.
    unrecorded: Vec<ButtonEvent>,
}

/// A live session.
pub struct Session<L: DeviceLink, W: Write> {
    link: L,
    display: LiveDisplay<W>,
    recorder: SessionRecorder,
    input: InputSource,
    gate: ChangeGate,
    interrupt: Arc<AtomicBool>,
    raw_mode: Option<RawModeGuard>,
}

impl<L: DeviceLink, W: Write> Session<L, W> {
    pub fn new(link: L, display: LiveDisplay<W>, recorder: SessionRecorder, input: InputSource) -> Self {
        Self {
            link,
            display,
            recorder,
            input,
            gate: ChangeGate::new(),
            interrupt: Arc::new(AtomicBool::new(false)),
            raw_mode: None,
        }
    }

    /// Stop when `flag` is raised.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = flag;
        self
    }

    /// Hand over the raw-mode guard so finalisation can leave raw mode.
    pub fn with_raw_mode(mut self, guard: RawModeGuard) -> Self {
        self.raw_mode = Some(guard);
        self
    }

    /// Run until stopped, then finalise.
    pub fn run(mut self) -> Result<SessionSummary, SessionError> {
        log::info!("Session started with {}", self.link.device_name());
        let start = Instant::now();
        let mut state = LoopState::default();

        let outcome = self.run_loop(start, &mut state);
        let duration = start.elapsed();
        let final_marker = Marker::at(duration, std::mem::take(&mut state.unrecorded));
        let finalised = self.finalise(&final_marker);
        let frames_recorded = finalised.as_ref().map_or(0, |&frames| frames);

        let end = match outcome {
            Ok(end) => end,
            Err(e) => {
                log::error!("Session failed: {}", e);
                if let Err(cleanup) = finalised {
                    log::error!("Finalisation also failed: {}", cleanup);
                }
                return Err(e);
            }
        };
        finalised?;
        log::info!("Session ended ({:?}) after {:.3}s", end, duration.as_secs_f64());

        Ok(SessionSummary {
            end,
            duration,
            frames_shown: state.frames_shown,
            frames_recorded,
            buttons_sent: state.buttons_sent,
        })
    }

    fn send(&mut self, button: ButtonEvent, state: &mut LoopState, sent: &mut Vec<ButtonEvent>) -> Result<(), SessionError> {
        log::debug!("Sending {}", button);
        self.link.send_button(button)?;
        state.buttons_sent += 1;
        state.unrecorded.push(button);
        sent.push(button);
        Ok(())
    }

    fn run_loop(&mut self, start: Instant, state: &mut LoopState) -> Result<SessionEnd, SessionError> {
        let mut first = true;
        loop {
            if self.interrupt.load(Ordering::SeqCst) {
                return Ok(SessionEnd::Interrupted);
            }
            let elapsed = start.elapsed();
            let mut sent = Vec::new();
            let mut overlay_toggled = false;

            let messages = match &mut self.input {
                InputSource::Keyboard(capture) => capture.drain(),
                InputSource::Replay(schedule) => {
                    if schedule.is_exhausted() {
                        return Ok(SessionEnd::ReplayFinished);
                    }
                    schedule
                        .replay_step(elapsed)
                        .into_iter()
                        .map(CaptureMessage::Input)
                        .collect()
                }
                InputSource::Idle => Vec::new(),
            };
            for message in messages {
                match message {
                    CaptureMessage::Input(button) => self.send(button, state, &mut sent)?,
                    CaptureMessage::ToggleOverlay => {
                        self.display.toggle_keymap();
                        overlay_toggled = true;
                    }
                    CaptureMessage::Stopped => return Ok(SessionEnd::Stopped),
                    CaptureMessage::Failed(e) => return Err(SessionError::Capture(e)),
                }
            }

            let frame = self.link.fetch_frame()?;
            let inputs = GateInputs {
                buttons_processed: !sent.is_empty(),
                overlay_toggled,
                redraw_requested: first,
            };
            first = false;
            let decision = self.gate.evaluate(&frame, inputs);
            let marker = Marker::at(elapsed, sent);

            if decision.should_record(&inputs) {
                self.recorder.record_frame(&frame, &marker)?;
                state.unrecorded.clear();
            }
            if decision.should_render() {
                self.display.show(&frame, &marker)?;
                state.frames_shown += 1;
            }
        }
    }

    /// Close the sinks, print the final marker and restore the terminal.
    /// Every step runs; the first error is returned.
    fn finalise(&mut self, final_marker: &Marker) -> Result<usize, SessionError> {
        let recorder = std::mem::take(&mut self.recorder);
        let frames_recorded = recorder.frame_count();
        let recorded = recorder.finish(final_marker).map_err(SessionError::from);
        let displayed = self.display.finish(final_marker).map_err(SessionError::from);
        let restored = match self.raw_mode.as_mut() {
            Some(guard) => guard.exit().map_err(SessionError::from),
            None => Ok(()),
        };
        if let InputSource::Keyboard(capture) = &mut self.input {
            capture.stop();
        }
        recorded.and(displayed).and(restored)?;
        Ok(frames_recorded)
    }
}
