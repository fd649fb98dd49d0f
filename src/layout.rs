//! Line composition shared by the live display and text transcripts.

use crate::ansi::{self, BOLD, RESET};
use crate::marker::Marker;

/// Colours and attributes applied to rendered glyph lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// 256-colour index of the lit pixels.
    pub foreground: u8,
    /// 256-colour index of the dark pixels.
    pub background: u8,
    pub bold: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            foreground: 208,
            background: 0,
            bold: false,
        }
    }
}

impl TextStyle {
    /// Escape sequence selecting this style.
    pub fn prefix(&self) -> String {
        let mut prefix = ansi::bg(self.background) + &ansi::fg(self.foreground);
        if self.bold {
            prefix.push_str(BOLD);
        }
        prefix
    }

    /// Wrap one glyph line in this style, resetting afterwards.
    pub fn paint(&self, line: &str) -> String {
        format!("{}{}{}", self.prefix(), line, RESET)
    }
}

/// Left and right padding that centre `len` cells in `width`.
pub fn centre_padding(len: usize, width: usize) -> (usize, usize) {
    let left = width.saturating_sub(len) / 2;
    let right = width.saturating_sub(left + len);
    (left, right)
}

/// Pad `text` with spaces so it sits centred in `width` cells.
pub fn centred(text: &str, width: usize) -> String {
    let (left, right) = centre_padding(text.chars().count(), width);
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Title line: the concealed marker in the left margin, then the centred
/// device name.
///
/// Concealed text still takes up cells, so the margin shrinks by the marker's
/// width.
pub fn header_line(marker: &Marker, device_name: &str, width: usize) -> String {
    let title = format!("[ {} ]", device_name);
    let (left, right) = centre_padding(title.chars().count(), width);
    let label_width = marker.to_string().len();
    format!(
        "{}{}{}{}",
        marker.to_text(),
        " ".repeat(left.saturating_sub(label_width)),
        title,
        " ".repeat(right)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_padding() {
        assert_eq!(centre_padding(4, 10), (3, 3));
        assert_eq!(centre_padding(5, 10), (2, 3));
        assert_eq!(centre_padding(12, 10), (0, 0));
    }

    #[test]
    fn test_paint_wraps_in_colours() {
        let style = TextStyle {
            bold: true,
            ..Default::default()
        };
        assert_eq!(
            style.paint("ab"),
            "\x1b[48;5;0m\x1b[38;5;208m\x1b[1mab\x1b[0m"
        );
    }

    #[test]
    fn test_header_keeps_visible_width() {
        let marker = Marker::new(1_000, vec![]);
        let header = header_line(&marker, "Flipper", 64);
        assert!(header.starts_with(&marker.to_text()));
        let visible = header.chars().count() - "\x1b[8m".len() - "\x1b[0m".len();
        assert_eq!(visible, 64);
        assert!(header.contains("[ Flipper ]"));
    }
}
