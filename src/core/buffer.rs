//! Fixed-capacity ring of colored scrollback rows.
//!
//! The buffer is a flat array of [`Cell`]s sized once at construction and
//! reused cyclically: row `n` lives at `(n % num_lines) * width`. Rows older
//! than `last_line - num_lines` are overwritten and unrecoverable. That is the
//! contract, not a bug: memory stays bounded, history is lossy.

use super::cell::{Cell, DEFAULT_COLOR, parse_color_markup};

/// Scroll wheel steps are multiplied by this many rows.
const SCROLL_STEP: i64 = 3;

/// A ring of `num_lines` rows of `width` colored character cells.
///
/// Three row counters drive the wrap/scroll semantics, all monotonically
/// increasing (only their modulo use wraps):
///
/// - `last_line`: the row currently being written.
/// - `last_column`: the write column within that row, `0..=width`.
/// - `last_visible_line`: the bottom row of the viewport. Always within
///   `[max(height - 1, last_line - num_lines + height), last_line]`.
pub struct ScrollbackBuffer {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
    num_lines: usize,
    last_line: usize,
    last_column: usize,
    last_visible_line: usize,
    /// Set after a soft wrap; the next explicit `\n` is swallowed so that
    /// writing exactly `width` characters ends in the same state as the same
    /// text followed by a newline.
    wrap_pending: bool,
}

impl ScrollbackBuffer {
    /// Create a buffer of `width * height * depth` cells, i.e. `depth`
    /// screens of retained rows.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero. Zero-dimension buffers are a
    /// construction-time contract violation, not a runtime error.
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        assert!(
            width > 0 && height > 0 && depth > 0,
            "scrollback buffer dimensions must be non-zero"
        );
        let capacity = width * height * depth;
        Self {
            cells: vec![Cell::EMPTY; capacity],
            width,
            height,
            num_lines: capacity / width,
            last_line: height - 1,
            last_column: 0,
            last_visible_line: height - 1,
            wrap_pending: false,
        }
    }

    /// Append color-tagged text.
    ///
    /// `^` followed by three hex digits switches the active write color
    /// without emitting a cell (`^F00` is red). The color is scoped to this
    /// call: every `write` starts at the default gray. A caret with fewer
    /// than three characters after it, or with non-hex digits, is written as
    /// literal text. `\n` advances to the next row. Text reaching the right
    /// edge soft wraps, overwriting the oldest retained row once the ring is
    /// full. Characters outside Latin-1 are written as `?`.
    pub fn write(&mut self, text: &str) {
        let mut color = DEFAULT_COLOR;
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == '\n' {
                if self.wrap_pending {
                    self.wrap_pending = false;
                } else {
                    self.newline();
                }
                i += 1;
                continue;
            }
            if c == '^' && i + 3 < chars.len() {
                if let Some(parsed) = parse_color_markup(&chars[i + 1..i + 4]) {
                    color = parsed;
                    i += 4;
                    continue;
                }
            }
            self.wrap_pending = false;
            let byte = if (c as u32) < 256 { c as u8 } else { b'?' };
            let idx = (self.last_line % self.num_lines) * self.width + self.last_column;
            self.cells[idx] = Cell::new(color, byte);
            self.last_column += 1;
            if self.last_column >= self.width {
                self.newline();
                self.wrap_pending = true;
            }
            i += 1;
        }
    }

    /// Advance to the next row, keeping the viewport pinned if it was at the
    /// bottom.
    fn newline(&mut self) {
        if self.last_visible_line == self.last_line {
            self.last_visible_line += 1;
        }
        self.last_line += 1;
        self.last_column = 0;
    }

    /// Move the viewport by `amount` wheel steps (positive = down).
    ///
    /// The viewport is clamped so it can neither pass the bottom row nor
    /// reach rows the ring has already overwritten.
    pub fn scroll(&mut self, amount: i32) {
        let mut line = self.last_visible_line as i64 + amount as i64 * SCROLL_STEP;

        let floor = (self.height as i64 - 1)
            .max(self.last_line as i64 - self.num_lines as i64 + self.height as i64);
        line = line.clamp(floor, self.last_line as i64);
        self.last_visible_line = line as usize;
    }

    /// Zero every cell and reset the write column.
    ///
    /// The row and scroll counters are intentionally left untouched: the
    /// viewport keeps its framing and subsequent writes continue from the
    /// current row into the now-empty ring.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
        self.last_column = 0;
        self.wrap_pending = false;
    }

    /// Re-grid the fixed cell store to a new width and height.
    ///
    /// The cell capacity is unchanged; `num_lines` is recomputed for the new
    /// width. Old content is discarded, not remapped.
    ///
    /// # Panics
    ///
    /// Panics if a dimension is zero or the new screen exceeds the capacity.
    pub fn resize(&mut self, width: usize, height: usize) {
        assert!(width > 0 && height > 0, "resize dimensions must be non-zero");
        assert!(
            width * height <= self.cells.len(),
            "resize screen exceeds buffer capacity"
        );
        self.width = width;
        self.height = height;
        self.num_lines = self.cells.len() / width;
        self.last_line = height - 1;
        self.last_visible_line = height - 1;
        self.last_column = 0;
        self.wrap_pending = false;
        self.cells.fill(Cell::EMPTY);
    }

    /// The cells of a logical row.
    pub fn row(&self, line: usize) -> &[Cell] {
        let start = (line % self.num_lines) * self.width;
        &self.cells[start..start + self.width]
    }

    /// Iterate the `height - 1` viewport rows from the bottom up, for the
    /// host renderer. The last screen row is reserved for the input line.
    ///
    /// When the view is pinned to the bottom and the cursor sits at column 0,
    /// the blank current row is skipped so a freshly ended line stays in view.
    pub fn visible_rows(&self) -> VisibleRows<'_> {
        let mut line = self.last_visible_line;
        if self.last_visible_line == self.last_line && self.last_column == 0 && line > 0 {
            line -= 1;
        }
        VisibleRows {
            buf: self,
            line,
            remaining: self.height - 1,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_lines(&self) -> usize {
        self.num_lines
    }

    pub fn last_line(&self) -> usize {
        self.last_line
    }

    pub fn last_column(&self) -> usize {
        self.last_column
    }

    pub fn last_visible_line(&self) -> usize {
        self.last_visible_line
    }
}

/// Bottom-up iterator over the viewport rows of a [`ScrollbackBuffer`].
pub struct VisibleRows<'a> {
    buf: &'a ScrollbackBuffer,
    line: usize,
    remaining: usize,
}

impl<'a> Iterator for VisibleRows<'a> {
    type Item = &'a [Cell];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let row = self.buf.row(self.line);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.line = self.line.saturating_sub(1);
        }
        Some(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &ScrollbackBuffer, line: usize) -> String {
        buf.row(line).iter().filter_map(|c| c.glyph()).collect()
    }

    #[test]
    fn test_markup_write_colors_cells() {
        let mut buf = ScrollbackBuffer::new(80, 25, 4);
        let start = buf.last_line();

        buf.write("^F08Hi\n");

        let row = buf.row(start);
        assert_eq!(row[0].glyph(), Some('H'));
        assert_eq!(row[1].glyph(), Some('i'));
        assert_eq!(row[0].rgb(), (0xFF, 0x00, 0x88));
        assert_eq!(row[1].rgb(), (0xFF, 0x00, 0x88));
        // The markup itself never lands in a cell.
        assert!(row[2].is_empty());
        // Exactly one row advance.
        assert_eq!(buf.last_line(), start + 1);
        assert_eq!(buf.last_column(), 0);
    }

    #[test]
    fn test_caret_near_end_is_literal() {
        let mut buf = ScrollbackBuffer::new(80, 25, 4);
        let start = buf.last_line();

        buf.write("x^F0");

        assert_eq!(row_text(&buf, start), "x^F0");
    }

    #[test]
    fn test_caret_with_non_hex_digits_is_literal() {
        let mut buf = ScrollbackBuffer::new(80, 25, 4);
        let start = buf.last_line();

        buf.write("^xyz!");

        assert_eq!(row_text(&buf, start), "^xyz!");
    }

    #[test]
    fn test_caret_exactly_three_remaining_parses() {
        let mut buf = ScrollbackBuffer::new(80, 25, 4);
        let start = buf.last_line();

        buf.write("a^0F0b");

        let row = buf.row(start);
        assert_eq!(row[0].glyph(), Some('a'));
        assert_eq!(row[0].rgb(), (0xBB, 0xBB, 0xBB));
        assert_eq!(row[1].glyph(), Some('b'));
        assert_eq!(row[1].rgb(), (0x00, 0xFF, 0x00));
    }

    #[test]
    fn test_color_is_scoped_to_one_write_call() {
        let mut buf = ScrollbackBuffer::new(80, 25, 4);
        let start = buf.last_line();

        buf.write("^F00err\n");
        buf.write("plain\n");

        let tagged = buf.row(start);
        assert_eq!(tagged[0].rgb(), (0xFF, 0x00, 0x00));
        // The next call starts back at the default gray.
        let untagged = buf.row(start + 1);
        assert_eq!(untagged[0].glyph(), Some('p'));
        assert!(untagged[..5].iter().all(|c| c.rgb() == (0xBB, 0xBB, 0xBB)));
    }

    #[test]
    fn test_auto_wrap_equals_explicit_newline() {
        let mut wrapped = ScrollbackBuffer::new(8, 4, 4);
        let mut explicit = ScrollbackBuffer::new(8, 4, 4);

        wrapped.write("abcdefgh");
        explicit.write("abcdefgh\n");

        assert_eq!(wrapped.last_line(), explicit.last_line());
        assert_eq!(wrapped.last_column(), explicit.last_column());
        assert_eq!(wrapped.last_column(), 0);
    }

    #[test]
    fn test_soft_wrap_continues_on_next_row() {
        let mut buf = ScrollbackBuffer::new(4, 3, 4);
        let start = buf.last_line();

        buf.write("abcdef");

        assert_eq!(row_text(&buf, start), "abcd");
        assert_eq!(row_text(&buf, start + 1), "ef");
        assert_eq!(buf.last_line(), start + 1);
        assert_eq!(buf.last_column(), 2);
    }

    #[test]
    fn test_ring_overwrites_oldest_row() {
        // 4 columns, 2 rows on screen, depth 2 -> 4 retained rows.
        let mut buf = ScrollbackBuffer::new(4, 2, 2);
        assert_eq!(buf.num_lines(), 4);

        for i in 0..6 {
            buf.write(&format!("r{i}\n"));
        }

        // r0..r5 were written at lines 1..=6; lines 5 and 6 reuse the slots
        // of lines 1 and 2, so r0 and r1 are gone.
        assert_eq!(row_text(&buf, 5), "r4");
        assert_eq!(row_text(&buf, 6), "r5");
        // Reading the overwritten line's index lands on the newer content.
        assert_eq!(row_text(&buf, 1), "r4");
    }

    #[test]
    fn test_view_pinned_to_bottom_while_writing() {
        let mut buf = ScrollbackBuffer::new(8, 3, 4);
        for _ in 0..10 {
            buf.write("line\n");
        }
        assert_eq!(buf.last_visible_line(), buf.last_line());
    }

    #[test]
    fn test_scroll_clamps_on_short_buffer() {
        let mut buf = ScrollbackBuffer::new(8, 4, 4);
        buf.write("one\ntwo\n");

        buf.scroll(1000);
        assert_eq!(buf.last_visible_line(), buf.last_line());

        buf.scroll(-1000);
        // Cannot scroll above the single-page bottom position.
        assert_eq!(buf.last_visible_line(), buf.height() - 1);

        buf.scroll(1000);
        assert_eq!(buf.last_visible_line(), buf.last_line());
    }

    #[test]
    fn test_scroll_cannot_reach_overwritten_rows() {
        let mut buf = ScrollbackBuffer::new(4, 2, 3);
        // Push far past the 6 retained rows.
        for i in 0..40 {
            buf.write(&format!("{i}\n"));
        }

        buf.scroll(-1000);
        let floor = buf.last_line() - buf.num_lines() + buf.height();
        assert_eq!(buf.last_visible_line(), floor);
    }

    #[test]
    fn test_scroll_detaches_view_from_bottom() {
        let mut buf = ScrollbackBuffer::new(8, 3, 8);
        for _ in 0..20 {
            buf.write("x\n");
        }
        buf.scroll(-1);
        let held = buf.last_visible_line();
        assert!(held < buf.last_line());

        // New writes no longer move a detached viewport.
        buf.write("y\n");
        assert_eq!(buf.last_visible_line(), held);
    }

    #[test]
    fn test_clear_zeroes_cells_but_keeps_counters() {
        let mut buf = ScrollbackBuffer::new(8, 4, 4);
        buf.write("hello\nworld\n");
        let line = buf.last_line();

        buf.clear();

        assert_eq!(buf.last_line(), line);
        assert_eq!(buf.last_column(), 0);
        for l in 0..buf.num_lines() {
            assert!(buf.row(l).iter().all(|c| c.is_empty()));
        }

        // Writing continues from the preserved row index.
        buf.write("next\n");
        assert_eq!(row_text(&buf, line), "next");
    }

    #[test]
    fn test_resize_discards_content() {
        let mut buf = ScrollbackBuffer::new(8, 4, 4);
        buf.write("hello\n");

        buf.resize(16, 6);

        assert_eq!(buf.width(), 16);
        assert_eq!(buf.height(), 6);
        assert_eq!(buf.num_lines(), 8 * 4 * 4 / 16);
        assert_eq!(buf.last_line(), 5);
        assert_eq!(buf.last_visible_line(), 5);
        assert_eq!(buf.last_column(), 0);
        assert!(buf.row(5).iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_visible_rows_skips_blank_current_row() {
        let mut buf = ScrollbackBuffer::new(8, 3, 4);
        buf.write("a\nb\n");

        // View pinned, cursor at column 0: the blank row being written is
        // skipped, so the two visible rows are "b" then "a".
        let rows: Vec<String> = buf
            .visible_rows()
            .map(|r| r.iter().filter_map(|c| c.glyph()).collect())
            .collect();
        assert_eq!(rows.len(), buf.height() - 1);
        assert_eq!(rows[0], "b");
        assert_eq!(rows[1], "a");
    }

    #[test]
    fn test_visible_rows_includes_partial_row() {
        let mut buf = ScrollbackBuffer::new(8, 3, 4);
        buf.write("a\npartial");

        let rows: Vec<String> = buf
            .visible_rows()
            .map(|r| r.iter().filter_map(|c| c.glyph()).collect())
            .collect();
        assert_eq!(rows[0], "partial");
        assert_eq!(rows[1], "a");
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_dimension_panics() {
        ScrollbackBuffer::new(0, 25, 4);
    }

    #[test]
    fn test_non_latin1_becomes_question_mark() {
        let mut buf = ScrollbackBuffer::new(8, 3, 4);
        let start = buf.last_line();
        buf.write("a€b");
        assert_eq!(row_text(&buf, start), "a?b");
    }
}
