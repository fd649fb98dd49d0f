//! Escape sequences written to the terminal and to text transcripts.

pub const ESC: char = '\x1b';
pub const CR: &str = "\r";
pub const LF: &str = "\n";
pub const CRLF: &str = "\r\n";

/// Conceal attribute: the text occupies cells but is not shown.
pub const CONCEAL: &str = "\x1b[8m";

/// Reset all attributes.
pub const RESET: &str = "\x1b[0m";

pub const BOLD: &str = "\x1b[1m";

pub const CURSOR_HIDE: &str = "\x1b[?25l";
pub const CURSOR_SHOW: &str = "\x1b[?25h";

/// Move the cursor up `n` lines.
pub fn cursor_up(n: usize) -> String {
    format!("\x1b[{}A", n)
}

/// Select a 256-colour foreground.
pub fn fg(color: u8) -> String {
    format!("\x1b[38;5;{}m", color)
}

/// Select a 256-colour background.
pub fn bg(color: u8) -> String {
    format!("\x1b[48;5;{}m", color)
}
