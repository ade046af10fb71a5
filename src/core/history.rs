//! Circular log of submitted command lines.
//!
//! `next_index` is the monotonically increasing write pointer; `display_index`
//! trails it while the user browses. `display_index == next_index` means the
//! editor shows the live, not-yet-submitted line. Entries older than
//! `next_index - capacity` are overwritten and unrecoverable.

use super::editor::InputLine;

/// Fixed-capacity command history with live/browsing navigation.
pub struct CommandHistory {
    entries: Vec<String>,
    next_index: usize,
    display_index: usize,
}

impl CommandHistory {
    /// Create a history ring retaining at most `capacity` lines.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be non-zero");
        Self {
            entries: vec![String::new(); capacity],
            next_index: 0,
            display_index: 0,
        }
    }

    /// Record a submitted line and return to the live position.
    pub fn store(&mut self, cmd: &str) {
        let slot = self.next_index % self.entries.len();
        self.entries[slot] = cmd.to_string();
        self.next_index += 1;
        self.display_index = self.next_index;
    }

    /// Step back one entry, loading it into the editor.
    ///
    /// No-op at the oldest retained entry. When leaving the live position the
    /// in-progress line is snapshotted into the live slot so stepping forward
    /// the same number of times restores it exactly.
    pub fn prev(&mut self, input: &mut InputLine) {
        if self.display_index == 0
            || self.next_index - self.display_index >= self.entries.len() - 1
        {
            return;
        }
        if self.display_index == self.next_index {
            let slot = self.next_index % self.entries.len();
            self.entries[slot] = input.text();
        }
        self.display_index -= 1;
        let slot = self.display_index % self.entries.len();
        input.set_contents(&self.entries[slot]);
    }

    /// Step forward one entry, loading it into the editor. No-op when live.
    pub fn next(&mut self, input: &mut InputLine) {
        if self.display_index == self.next_index {
            return;
        }
        self.display_index += 1;
        let slot = self.display_index % self.entries.len();
        input.set_contents(&self.entries[slot]);
    }

    /// Whether a past entry is currently recalled.
    pub fn is_browsing(&self) -> bool {
        self.display_index != self.next_index
    }

    pub fn len(&self) -> usize {
        self.next_index.min(self.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prev_recalls_most_recent() {
        let mut history = CommandHistory::new(8);
        let mut input = InputLine::new(64);

        history.store("first");
        history.store("second");

        history.prev(&mut input);
        assert_eq!(input.text(), "second");
        history.prev(&mut input);
        assert_eq!(input.text(), "first");
    }

    #[test]
    fn test_prev_at_start_is_noop() {
        let mut history = CommandHistory::new(8);
        let mut input = InputLine::new(64);

        history.prev(&mut input);
        assert_eq!(input.text(), "");
        assert!(!history.is_browsing());

        history.store("only");
        history.prev(&mut input);
        history.prev(&mut input);
        history.prev(&mut input);
        assert_eq!(input.text(), "only");
    }

    #[test]
    fn test_next_when_live_is_noop() {
        let mut history = CommandHistory::new(8);
        let mut input = InputLine::new(64);

        history.store("cmd");
        input.set_contents("typing");
        history.next(&mut input);
        assert_eq!(input.text(), "typing");
    }

    #[test]
    fn test_browse_roundtrip_restores_unsaved_line() {
        let mut history = CommandHistory::new(8);
        let mut input = InputLine::new(64);

        for cmd in ["a", "b", "c"] {
            history.store(cmd);
        }
        input.set_contents("work in progress");

        for _ in 0..3 {
            history.prev(&mut input);
        }
        assert_eq!(input.text(), "a");
        for _ in 0..3 {
            history.next(&mut input);
        }
        assert_eq!(input.text(), "work in progress");
        assert!(!history.is_browsing());
    }

    #[test]
    fn test_prev_stops_before_overwritten_slots() {
        let mut history = CommandHistory::new(4);
        let mut input = InputLine::new(64);

        for i in 0..10 {
            history.store(&format!("cmd{i}"));
        }

        // Only capacity - 1 steps back are reachable; the oldest slot holds
        // the live snapshot.
        let mut seen = Vec::new();
        for _ in 0..10 {
            history.prev(&mut input);
            seen.push(input.text());
        }
        assert_eq!(seen[0], "cmd9");
        assert_eq!(seen[1], "cmd8");
        assert_eq!(seen[2], "cmd7");
        // Further prev calls are no-ops on the same entry.
        assert!(seen[3..].iter().all(|s| s == "cmd7"));
    }

    #[test]
    fn test_store_returns_to_live() {
        let mut history = CommandHistory::new(8);
        let mut input = InputLine::new(64);

        history.store("a");
        history.prev(&mut input);
        assert!(history.is_browsing());
        history.store("b");
        assert!(!history.is_browsing());
    }
}
