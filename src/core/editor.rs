//! In-place mutable input line with a cursor.
//!
//! Fixed capacity: typing into a full line is silently dropped, matching the
//! rest of the console's bounded-memory discipline.

/// The pending command line being edited.
///
/// Invariant: `cursor <= len <= capacity`.
pub struct InputLine {
    chars: Vec<char>,
    capacity: usize,
    cursor: usize,
}

impl InputLine {
    /// Create an empty line holding at most `capacity` characters.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "input line capacity must be non-zero");
        Self {
            chars: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// Insert a character at the cursor, shifting the tail right.
    ///
    /// A full line drops the character; this is a no-op, not an error.
    pub fn insert(&mut self, c: char) {
        if self.chars.len() >= self.capacity {
            return;
        }
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor, shifting the tail left.
    /// No-op at column 0.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.chars.remove(self.cursor - 1);
        self.cursor -= 1;
    }

    /// Move the cursor by `delta`, clamped to `[0, len]`.
    pub fn move_cursor(&mut self, delta: isize) {
        let pos = self.cursor as isize + delta;
        self.cursor = pos.clamp(0, self.chars.len() as isize) as usize;
    }

    /// Jump to the start of the line.
    pub fn home(&mut self) {
        self.cursor = 0;
    }

    /// Jump past the last character.
    pub fn end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Replace the contents with `s`, truncated to capacity. The cursor moves
    /// to the end. Used by history recall.
    pub fn set_contents(&mut self, s: &str) {
        self.chars.clear();
        self.chars.extend(s.chars().take(self.capacity));
        self.cursor = self.chars.len();
    }

    /// Reset to an empty line.
    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// The current contents as an owned string.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// The current contents as characters, for the host renderer.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
