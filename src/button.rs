//! Device buttons and their one-letter codes.
//!
//! Each press is written as a single ASCII letter: `l d u r o b` for the
//! direction, lower case for a short press and upper case for a long press.

use std::fmt;

/// One of the six device buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    Ok,
    Back,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
        Direction::Ok,
        Direction::Back,
    ];

    /// Lower-case code letter.
    pub fn letter(self) -> char {
        match self {
            Direction::Left => 'l',
            Direction::Right => 'r',
            Direction::Up => 'u',
            Direction::Down => 'd',
            Direction::Ok => 'o',
            Direction::Back => 'b',
        }
    }

    /// Name used by the device RPC input command.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Ok => "OK",
            Direction::Back => "BACK",
        }
    }

    /// Symbol printed in no-display mode.
    pub fn symbol(self) -> char {
        match self {
            Direction::Left => '\u{2190}',
            Direction::Down => '\u{2193}',
            Direction::Up => '\u{2191}',
            Direction::Right => '\u{2192}',
            Direction::Ok => 'o',
            Direction::Back => '\u{21B0}',
        }
    }
}

/// Press duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Press {
    Short,
    Long,
}

impl Press {
    pub fn name(self) -> &'static str {
        match self {
            Press::Short => "SHORT",
            Press::Long => "LONG",
        }
    }
}

/// A single button press sent to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonEvent {
    pub direction: Direction,
    pub press: Press,
}

impl ButtonEvent {
    pub const fn new(direction: Direction, press: Press) -> Self {
        Self { direction, press }
    }

    pub const fn short(direction: Direction) -> Self {
        Self::new(direction, Press::Short)
    }

    pub const fn long(direction: Direction) -> Self {
        Self::new(direction, Press::Long)
    }

    /// The one-letter code for this press.
    pub fn code(self) -> char {
        let letter = self.direction.letter();
        match self.press {
            Press::Short => letter,
            Press::Long => letter.to_ascii_uppercase(),
        }
    }

    /// Parse a one-letter code.
    pub fn from_code(code: char) -> Option<Self> {
        let direction = match code.to_ascii_lowercase() {
            'l' => Direction::Left,
            'r' => Direction::Right,
            'u' => Direction::Up,
            'd' => Direction::Down,
            'o' => Direction::Ok,
            'b' => Direction::Back,
            _ => return None,
        };
        let press = if code.is_ascii_uppercase() {
            Press::Long
        } else {
            Press::Short
        };
        Some(Self::new(direction, press))
    }
}

impl fmt::Display for ButtonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.press.name(), self.direction.name())
    }
}

/// Join a sequence of presses into its compact code string.
pub fn encode_codes(buttons: &[ButtonEvent]) -> String {
    buttons.iter().map(|b| b.code()).collect()
}

/// Expand a code string back into presses.
///
/// Returns `None` if any letter is outside the code alphabet.
pub fn decode_codes(codes: &str) -> Option<Vec<ButtonEvent>> {
    codes.chars().map(ButtonEvent::from_code).collect()
}
