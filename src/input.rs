//! Keyboard capture on a background thread.
//!
//! Key presses are mapped to device buttons and posted, together with the
//! overlay toggle and stop requests, to the session loop over a channel. The
//! loop drains the channel without blocking.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::button::{ButtonEvent, Direction, Press};

/// How long a key read blocks before the stop flag is checked again.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    Button(ButtonEvent),
    ToggleOverlay,
    Stop,
}

/// Message posted by the capture thread.
#[derive(Debug)]
pub enum CaptureMessage {
    Input(ButtonEvent),
    ToggleOverlay,
    /// The user asked to stop.
    Stopped,
    /// Reading the keyboard failed; the thread has exited.
    Failed(io::Error),
}

impl From<KeyIntent> for CaptureMessage {
    fn from(intent: KeyIntent) -> Self {
        match intent {
            KeyIntent::Button(button) => CaptureMessage::Input(button),
            KeyIntent::ToggleOverlay => CaptureMessage::ToggleOverlay,
            KeyIntent::Stop => CaptureMessage::Stopped,
        }
    }
}

fn letter_direction(c: char) -> Option<Direction> {
    match c.to_ascii_lowercase() {
        'a' | 'h' => Some(Direction::Left),
        's' | 'j' => Some(Direction::Down),
        'w' | 'k' => Some(Direction::Up),
        'd' | 'l' => Some(Direction::Right),
        'o' => Some(Direction::Ok),
        'b' => Some(Direction::Back),
        _ => None,
    }
}

/// Map a key event to its intent.
///
/// Lower-case letters, arrows, Space, Enter, Backspace and Delete send short
/// presses; the upper-case letters send long presses. Ctrl-K toggles the
/// keymap and Ctrl-C stops.
pub fn map_key(event: KeyEvent) -> Option<KeyIntent> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(KeyIntent::Stop),
            KeyCode::Char('k') | KeyCode::Char('K') => Some(KeyIntent::ToggleOverlay),
            _ => None,
        };
    }

    let button = match event.code {
        KeyCode::Char(' ') => ButtonEvent::short(Direction::Ok),
        KeyCode::Char(c) => {
            let direction = letter_direction(c)?;
            let press = if c.is_ascii_uppercase() {
                Press::Long
            } else {
                Press::Short
            };
            ButtonEvent::new(direction, press)
        }
        KeyCode::Left => ButtonEvent::short(Direction::Left),
        KeyCode::Down => ButtonEvent::short(Direction::Down),
        KeyCode::Up => ButtonEvent::short(Direction::Up),
        KeyCode::Right => ButtonEvent::short(Direction::Right),
        KeyCode::Enter => ButtonEvent::short(Direction::Ok),
        KeyCode::Backspace | KeyCode::Delete => ButtonEvent::short(Direction::Back),
        _ => return None,
    };
    Some(KeyIntent::Button(button))
}

fn capture_loop(tx: Sender<CaptureMessage>, stop_flag: Arc<AtomicBool>) {
    log::debug!("Keyboard capture started");
    while !stop_flag.load(Ordering::SeqCst) {
        let key = match event::poll(POLL_INTERVAL).and_then(|ready| {
            if ready {
                event::read().map(Some)
            } else {
                Ok(None)
            }
        }) {
            Ok(Some(Event::Key(key))) => key,
            Ok(_) => continue,
            Err(e) => {
                log::error!("Keyboard capture failed: {}", e);
                let _ = tx.send(CaptureMessage::Failed(e));
                return;
            }
        };

        let Some(intent) = map_key(key) else {
            continue;
        };
        if tx.send(intent.into()).is_err() || intent == KeyIntent::Stop {
            break;
        }
    }
    log::debug!("Keyboard capture stopped");
}

/// Handle to the keyboard capture thread.
pub struct InputCapture {
    rx: Receiver<CaptureMessage>,
    /// Flag to stop the capture thread
    stop_flag: Arc<AtomicBool>,
    capture_thread: Option<JoinHandle<()>>,
}

impl InputCapture {
    /// Start reading the keyboard. The terminal should be in raw mode.
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop_flag);
        let handle = thread::Builder::new()
            .name("keyboard".into())
            .spawn(move || capture_loop(tx, thread_stop))?;
        Ok(Self {
            rx,
            stop_flag,
            capture_thread: Some(handle),
        })
    }

    /// Take messages from an existing channel instead of the keyboard.
    pub fn from_receiver(rx: Receiver<CaptureMessage>) -> Self {
        Self {
            rx,
            stop_flag: Arc::new(AtomicBool::new(false)),
            capture_thread: None,
        }
    }

    /// Every message posted since the last call, without blocking.
    pub fn drain(&self) -> Vec<CaptureMessage> {
        let mut messages = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(message) => messages.push(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        messages
    }

    /// Signal the capture thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.capture_thread.take() {
            if handle.join().is_err() {
                log::error!("Keyboard capture thread panicked");
            }
        }
    }
}

impl Drop for InputCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
