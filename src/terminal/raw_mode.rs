//! Raw keyboard mode for live sessions.
//!
//! Raw mode and the hidden cursor are undone by one routine, reached from
//! `RawModeGuard::exit`, from the guard's drop and from the panic hook. A
//! shared flag makes sure it only runs once.

use std::io::{self, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::ansi::CURSOR_SHOW;

/// Set while the terminal is in raw mode.
static RAW_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Show the cursor on `out` and leave raw mode, if raw mode is on.
fn leave_raw_mode(out: &mut impl Write) -> io::Result<()> {
    if !RAW_ACTIVE.swap(false, Ordering::SeqCst) {
        return Ok(());
    }
    out.write_all(CURSOR_SHOW.as_bytes())?;
    out.flush()?;
    disable_raw_mode()?;
    log::debug!("Left raw mode");
    Ok(())
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let _ = leave_raw_mode(&mut io::stdout());
            previous(info);
        }));
    });
}

/// Keeps the terminal in raw mode while alive.
///
/// Keyboard capture needs raw mode so keys arrive unbuffered and Ctrl-C
/// arrives as a key press.
pub struct RawModeGuard(());

impl RawModeGuard {
    /// Switch the terminal to raw mode.
    ///
    /// # Errors
    /// Fails when stdin is not a terminal.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        RAW_ACTIVE.store(true, Ordering::SeqCst);
        log::debug!("Entered raw mode");
        Ok(Self(()))
    }

    /// Restore the terminal now instead of on drop.
    pub fn exit(&mut self) -> io::Result<()> {
        leave_raw_mode(&mut io::stdout())
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = leave_raw_mode(&mut io::stdout());
    }
}
