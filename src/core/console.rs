//! The console engine: scrollback, line editor, history, registry, dispatch.
//!
//! One [`Console`] instance is owned by the host as a resource and driven
//! once per tick. Every call completes synchronously; there is no internal
//! locking and no other component writes the buffer or history directly.

use bevy::prelude::*;

use super::buffer::ScrollbackBuffer;
use super::editor::InputLine;
use super::history::CommandHistory;
use super::registry::{CommandMeta, CommandRegistry};

/// Dimensions and capacities for a console instance.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Grid columns.
    pub width: usize,
    /// Grid rows on screen (the last row renders the input line).
    pub height: usize,
    /// Screens of scrollback retained in the ring.
    pub scrollback_depth: usize,
    /// Maximum characters in the input line.
    pub input_capacity: usize,
    /// Lines of command history retained.
    pub history_capacity: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            width: 120,
            height: 36,
            scrollback_depth: 30,
            input_capacity: 512,
            history_capacity: 1000,
        }
    }
}

/// A dispatched command waiting for its handler to run.
///
/// Produced by [`Console::dispatch_line`]; the plugin layer executes the
/// handler with exclusive `World` access.
#[derive(Debug, Clone)]
pub struct QueuedCommand {
    /// The raw submitted line.
    pub raw: String,
    /// The registry lookup key (lowercased name).
    pub name: Box<str>,
    /// The remaining whitespace-separated tokens.
    pub args: Vec<String>,
}

/// The console engine.
///
/// Owns the scrollback buffer, the input line, the command history, and the
/// command registry. Handlers are stored separately in
/// [`CommandHandlers`](super::CommandHandlers).
#[derive(Resource)]
pub struct Console {
    buffer: ScrollbackBuffer,
    input: InputLine,
    history: CommandHistory,
    registry: CommandRegistry,
}

impl Console {
    /// Create a console with the given dimensions and capacities.
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            buffer: ScrollbackBuffer::new(config.width, config.height, config.scrollback_depth),
            input: InputLine::new(config.input_capacity),
            history: CommandHistory::new(config.history_capacity),
            registry: CommandRegistry::new(),
        }
    }

    // --- Output ---

    /// Append color-tagged text to the scrollback. See
    /// [`ScrollbackBuffer::write`] for the markup syntax.
    pub fn write(&mut self, text: &str) {
        self.buffer.write(text);
    }

    /// Append color-tagged text followed by a newline.
    pub fn write_line(&mut self, text: &str) {
        self.buffer.write(text);
        self.buffer.write("\n");
    }

    // --- Registration ---

    /// Register a command name and description.
    ///
    /// Returns the lookup key under which the handler should be stored. A
    /// duplicate name is rejected: the existing registration is kept, a
    /// diagnostic is written to the scrollback, and `None` is returned.
    pub fn register(
        &mut self,
        name: impl Into<Box<str>>,
        description: &'static str,
    ) -> Option<Box<str>> {
        let name = name.into();
        match self.registry.register(name.clone(), description) {
            Some(key) => Some(key),
            None => {
                self.buffer
                    .write(&format!("Cannot add command '{name}' twice\n"));
                None
            }
        }
    }

    // --- Dispatch ---

    /// Parse and route a raw input line.
    ///
    /// Tokenizes on whitespace runs. A line with no tokens is a silent no-op:
    /// no echo, no history entry. Otherwise the re-joined line is echoed with
    /// a `>` prompt, the raw line is recorded in history, and the first token
    /// is looked up case-insensitively. An unknown name writes one diagnostic
    /// line; a known one yields a [`QueuedCommand`] for the executor.
    pub fn dispatch_line(&mut self, raw: &str) -> Option<QueuedCommand> {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.is_empty() {
            return None;
        }

        self.buffer.write(&format!(">{}\n", tokens.join(" ")));
        self.history.store(raw);

        let key: Option<Box<str>> = self.registry.lookup_key(tokens[0]).map(Into::into);
        match key {
            Some(name) => Some(QueuedCommand {
                raw: raw.to_string(),
                name,
                args: tokens[1..].iter().map(|s| s.to_string()).collect(),
            }),
            None => {
                self.buffer
                    .write(&format!("Unknown command: {}\n", tokens[0]));
                None
            }
        }
    }

    /// Submit the pending input line.
    ///
    /// The editor is reset to empty before dispatch, so a handler that writes
    /// output never races a stale input view.
    pub fn submit(&mut self) -> Option<QueuedCommand> {
        let raw = self.input.text();
        self.input.clear();
        self.dispatch_line(&raw)
    }

    // --- Line editing entry points ---

    /// Type a character at the cursor.
    pub fn type_char(&mut self, c: char) {
        self.input.insert(c);
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        self.input.backspace();
    }

    pub fn cursor_left(&mut self) {
        self.input.move_cursor(-1);
    }

    pub fn cursor_right(&mut self) {
        self.input.move_cursor(1);
    }

    pub fn cursor_home(&mut self) {
        self.input.home();
    }

    pub fn cursor_end(&mut self) {
        self.input.end();
    }

    /// Recall the previous history entry into the input line.
    pub fn history_prev(&mut self) {
        self.history.prev(&mut self.input);
    }

    /// Step forward through history toward the live input line.
    pub fn history_next(&mut self) {
        self.history.next(&mut self.input);
    }

    /// Complete the input at the cursor against the registered command names.
    ///
    /// All names sharing the prefix are collected and their longest common
    /// prefix (case-insensitive) is inserted through the editor. A unique
    /// match also gets a trailing space; an ambiguous one prints each
    /// candidate on its own line and leaves the input at the shared prefix.
    pub fn tab_complete(&mut self) {
        let prefix: String = self.input.chars()[..self.input.cursor()].iter().collect();
        let matches: Vec<String> = self
            .registry
            .matches_prefix(&prefix)
            .into_iter()
            .map(str::to_string)
            .collect();
        if matches.is_empty() {
            return;
        }

        // Fold the LCP over consecutive pairs; the result is order
        // independent because common-prefix length is ultrametric.
        let mut lcp = matches[0].chars().count();
        for pair in matches.windows(2) {
            lcp = lcp.min(common_prefix_len(&pair[0], &pair[1]));
        }

        let best: Vec<char> = matches[0].chars().collect();
        let prefix_len = prefix.chars().count();
        for &c in &best[prefix_len..lcp] {
            self.input.insert(c);
        }

        if matches.len() > 1 {
            for name in &matches {
                self.buffer.write(&format!(" {name}\n"));
            }
        }
        if matches.len() == 1 {
            self.input.insert(' ');
        }
    }

    // --- Viewport entry points ---

    /// Move the viewport by wheel steps; see [`ScrollbackBuffer::scroll`].
    pub fn scroll(&mut self, amount: i32) {
        self.buffer.scroll(amount);
    }

    /// Zero the scrollback cells; row and scroll counters are preserved.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Re-grid the scrollback; old content is discarded.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.buffer.resize(width, height);
    }

    // --- Read-only views for the host renderer ---

    /// The scrollback surface.
    pub fn buffer(&self) -> &ScrollbackBuffer {
        &self.buffer
    }

    /// The pending input line and cursor.
    pub fn input(&self) -> &InputLine {
        &self.input
    }

    /// The registered commands.
    pub fn commands(&self) -> impl Iterator<Item = &CommandMeta> {
        self.registry.iter()
    }

    /// Whether a command name is registered (case-insensitive).
    pub fn has_command(&self, name: &str) -> bool {
        self.registry.contains(name)
    }
}

/// Length in characters of the longest common prefix of two names,
/// compared case-insensitively.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x.eq_ignore_ascii_case(y))
        .count()
}
