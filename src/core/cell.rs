//! Packed color-text cell and inline color markup.
//!
//! The scrollback buffer stores one `Cell` per column: a 24-bit RGB color in
//! the high bytes and an 8-bit character code in the low byte. Character code
//! zero marks an unwritten cell and is never rendered.

/// Reset value for the active write color (a light gray), pre-shifted to the
/// cell layout so it can be OR'd with a character byte directly.
pub const DEFAULT_COLOR: u32 = 0xBBBB_BB00;

/// A single scrollback cell.
///
/// Bit layout: `RRRRRRRR GGGGGGGG BBBBBBBB CCCCCCCC`, with red in bits
/// 31..24, green 23..16, blue 15..8, and the character code in 7..0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell(u32);

impl Cell {
    /// An unwritten cell (character code zero).
    pub const EMPTY: Cell = Cell(0);

    /// Create a cell from a pre-shifted color and a character byte.
    #[inline]
    pub fn new(color: u32, ch: u8) -> Self {
        Cell((color & 0xFFFF_FF00) | ch as u32)
    }

    /// The character byte. Zero means the cell was never written.
    #[inline]
    pub fn ch(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// The cell's character as a `char`, or `None` for an unwritten cell.
    #[inline]
    pub fn glyph(self) -> Option<char> {
        match self.ch() {
            0 => None,
            b => Some(b as char),
        }
    }

    /// The color channels as `(r, g, b)`.
    #[inline]
    pub fn rgb(self) -> (u8, u8, u8) {
        (
            (self.0 >> 24) as u8,
            (self.0 >> 16) as u8,
            (self.0 >> 8) as u8,
        )
    }

    /// The pre-shifted 24-bit color (low byte zero).
    #[inline]
    pub fn color(self) -> u32 {
        self.0 & 0xFFFF_FF00
    }

    /// Whether this cell has never been written.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.ch() == 0
    }
}

/// Parse the three hex digits of a `^RGB` color markup sequence.
///
/// Each nibble `v` expands to the byte `v * 17`, so `^F08` becomes
/// `(0xFF, 0x00, 0x88)`. The result is pre-shifted left 8 bits to align with
/// the [`Cell`] layout.
///
/// Returns `None` when any digit is not hexadecimal; the caller then treats
/// the caret and following characters as literal text, the same fallback used
/// when fewer than three characters remain after the caret.
pub fn parse_color_markup(digits: &[char]) -> Option<u32> {
    if digits.len() < 3 {
        return None;
    }
    let mut color = 0u32;
    for d in &digits[..3] {
        let v = d.to_digit(16)?;
        color = (color << 8) | (v * 17);
    }
    Some(color << 8)
}

/// Color markup strings for common console message colors.
pub mod palette {
    pub const WHITE: &str = "^FFF";
    pub const GRAY: &str = "^BBB";
    pub const GREEN: &str = "^0F0";
    pub const YELLOW: &str = "^FF0";
    pub const RED: &str = "^F00";
    pub const PINK: &str = "^F8F";
}
