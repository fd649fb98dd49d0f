//! Keyboard map shown over the picture on request.

/// ASCII sketch of the map; [`keymap_lines`] turns it into box drawing.
const KEYMAP_SKETCH: [&str; 15] = [
    "                     _________________                        ",
    "                     |      UP:      |                        ",
    "              Long > |    [W] [K]    |                        ",
    "             Short > |     w ^ k     |                        ",
    "                     +---------------+                        ",
    "        ___________  _________________  ___________           ",
    "        |  LEFT:  |  |      OK:      |  |  RIGHT: |           ",
    " Long > | [A] [H] |  |      [O]      |  | [D] [L] |           ",
    "Short > |  < a h  |  | SPACE ENTER o |  |  d l >  |           ",
    "        +---------+  +---------------+  +---------+           ",
    "                     _________________          ______________",
    "                     |     DOWN:     |          |    BACK:   |",
    "              Long > |    [S] [J]    |   Long > |     [B]    |",
    "             Short > |     s v j     |  Short > | BACK DEL b |",
    "                     +---------------+          +------------+",
];

/// Width of every keymap line, in cells.
pub const KEYMAP_WIDTH: usize = 62;

/// The keymap drawn with box-drawing characters and arrows.
pub fn keymap_lines() -> Vec<String> {
    KEYMAP_SKETCH
        .iter()
        .map(|sketch| {
            // Padding lets corners at the line edges match.
            let padded = format!(" {} ", sketch)
                .replace(" _", " \u{250c}")
                .replace("_ ", "\u{2510} ")
                .replace('_', "\u{2500}")
                .replace('|', "\u{2502}")
                .replace(" +", " \u{2514}")
                .replace("+ ", "\u{2518} ")
                .replace('-', "\u{2500}")
                .replace('<', "\u{2190}")
                .replace('^', "\u{2191}")
                .replace('>', "\u{2192}")
                .replace('v', "\u{2193}");
            let cells: Vec<char> = padded.chars().collect();
            cells[1..cells.len() - 1].iter().collect()
        })
        .collect()
}
