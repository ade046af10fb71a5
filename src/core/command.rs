//! Console command handlers and their argument view.
//!
//! A handler receives the ordered string arguments and mutable `World`
//! access, and reports results or failures only by writing lines into the
//! console. Argument validation (count, parse, range) is the handler's job;
//! a malformed argument must never corrupt console state.

use std::collections::HashMap;

use bevy::prelude::*;

/// Arguments passed to a command handler.
#[derive(Debug, Clone)]
pub struct CommandArgs<'a> {
    /// The raw submitted line.
    raw: &'a str,
    /// Parsed arguments (excluding the command name).
    args: Vec<&'a str>,
}

impl<'a> CommandArgs<'a> {
    /// Create command args from a raw line and its parsed arguments.
    pub fn new(raw: &'a str, args: Vec<&'a str>) -> Self {
        Self { raw, args }
    }

    /// The raw submitted line.
    #[inline]
    pub fn raw(&self) -> &str {
        self.raw
    }

    /// The number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether there are no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Get an argument by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.args.get(index).copied()
    }

    /// Try to parse an argument as a specific type.
    pub fn parse<T: std::str::FromStr>(&self, index: usize) -> Option<T> {
        self.get(index).and_then(|s| s.parse().ok())
    }

    /// Iterate over the arguments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.args.iter().copied()
    }

    /// Join all arguments with a separator.
    pub fn join(&self, separator: &str) -> String {
        self.args.join(separator)
    }
}

/// Type alias for command handler functions.
pub type CommandHandler = Box<dyn Fn(&CommandArgs, &mut World) + Send + Sync>;

/// A console command: a name, a human-readable description, and a handler.
///
/// # Examples
///
/// ```ignore
/// let echo = ConsoleCommand::new("echo", |args, world| {
///     let mut console = world.resource_mut::<Console>();
///     console.write_line(&args.join(" "));
/// }).description("Print text to the console");
/// ```
pub struct ConsoleCommand {
    name: Box<str>,
    description: &'static str,
    handler: CommandHandler,
}

impl ConsoleCommand {
    /// Create a new command with the given name and handler.
    pub fn new<F>(name: impl Into<Box<str>>, handler: F) -> Self
    where
        F: Fn(&CommandArgs, &mut World) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: "",
            handler: Box::new(handler),
        }
    }

    /// Set the description shown by `help`.
    pub fn description(mut self, desc: &'static str) -> Self {
        self.description = desc;
        self
    }

    /// The command name as registered.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Split into (name, description, handler) for separate storage.
    pub fn split(self) -> (Box<str>, &'static str, CommandHandler) {
        (self.name, self.description, self.handler)
    }
}

impl std::fmt::Debug for ConsoleCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Stores command handlers separately from the console.
///
/// This separation lets a handler run with full `&mut World` access
/// (including the [`Console`](super::Console) resource) without borrow
/// conflicts: the executor takes the handler out, runs it, and puts it back.
#[derive(Resource, Default)]
pub struct CommandHandlers {
    handlers: HashMap<Box<str>, CommandHandler>,
}

impl CommandHandlers {
    /// Create empty handler storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a handler under a registry key.
    pub fn register(&mut self, key: Box<str>, handler: CommandHandler) {
        self.handlers.insert(key, handler);
    }

    /// Take a handler temporarily for execution. Use `put` to return it.
    pub fn take(&mut self, key: &str) -> Option<CommandHandler> {
        self.handlers.remove(key)
    }

    /// Put a handler back after temporary removal.
    pub fn put(&mut self, key: &str, handler: CommandHandler) {
        self.handlers.insert(key.into(), handler);
    }

    /// Whether a handler is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args_basic() {
        let args = CommandArgs::new("echo hello world", vec!["hello", "world"]);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(0), Some("hello"));
        assert_eq!(args.get(1), Some("world"));
        assert_eq!(args.get(2), None);
        assert_eq!(args.raw(), "echo hello world");
    }

    #[test]
    fn test_command_args_parse() {
        let args = CommandArgs::new("timescale 1.5", vec!["1.5"]);
        assert_eq!(args.parse::<f32>(0), Some(1.5));
        assert_eq!(args.parse::<i32>(0), None);
        assert_eq!(args.parse::<f32>(1), None);
    }

    #[test]
    fn test_command_args_join() {
        let args = CommandArgs::new("echo a b", vec!["a", "b"]);
        assert_eq!(args.join(" "), "a b");
    }

    #[test]
    fn test_console_command_builder() {
        let cmd = ConsoleCommand::new("noop", |_args, _world| {}).description("Does nothing");
        assert_eq!(cmd.name(), "noop");
        let (name, desc, _handler) = cmd.split();
        assert_eq!(&*name, "noop");
        assert_eq!(desc, "Does nothing");
    }

    #[test]
    fn test_handlers_take_put() {
        let mut handlers = CommandHandlers::new();
        handlers.register("noop".into(), Box::new(|_, _| {}));
        assert!(handlers.contains("noop"));

        let taken = handlers.take("noop").unwrap();
        assert!(!handlers.contains("noop"));
        handlers.put("noop", taken);
        assert!(handlers.contains("noop"));
    }
}
