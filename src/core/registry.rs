//! Name → command metadata table with case-insensitive lookup.
//!
//! Handlers live in [`CommandHandlers`](super::CommandHandlers); the registry
//! only knows names and descriptions, so it can serve lookup, `help`
//! enumeration, and tab completion without touching executable code.

use std::collections::HashMap;

/// Metadata for one registered command.
pub struct CommandMeta {
    /// The name as given at registration, used for display.
    pub name: Box<str>,
    /// Human-readable description shown by `help`.
    pub description: &'static str,
}

/// Registered command names and descriptions.
///
/// Lookup is case-insensitive (keys are the ASCII-lowercased names); the
/// display name is stored as given. Enumeration follows registration order.
/// There is no removal: the table is populated once during setup.
#[derive(Default)]
pub struct CommandRegistry {
    /// Lowercased name → index into `entries`.
    index: HashMap<Box<str>, usize>,
    /// Metadata in registration order.
    entries: Vec<CommandMeta>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command name.
    ///
    /// Returns the lowercased lookup key on success. A duplicate (by
    /// case-insensitive name) is rejected with `None` and the existing
    /// registration is retained unchanged; the caller reports the rejection.
    pub fn register(
        &mut self,
        name: impl Into<Box<str>>,
        description: &'static str,
    ) -> Option<Box<str>> {
        let name = name.into();
        let key: Box<str> = name.to_ascii_lowercase().into();
        if self.index.contains_key(&key) {
            return None;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(CommandMeta { name, description });
        Some(key)
    }

    /// Look up a command case-insensitively.
    pub fn lookup(&self, name: &str) -> Option<&CommandMeta> {
        let key = name.to_ascii_lowercase();
        self.index.get(key.as_str()).map(|&i| &self.entries[i])
    }

    /// The lowercased lookup key for a name, if registered.
    pub fn lookup_key(&self, name: &str) -> Option<&str> {
        let key = name.to_ascii_lowercase();
        self.index
            .get_key_value(key.as_str())
            .map(|(k, _)| k.as_ref())
    }

    /// Whether a command is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name.to_ascii_lowercase().as_str())
    }

    /// Iterate the registered commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandMeta> {
        self.entries.iter()
    }

    /// Display names whose lowercase form starts with the lowercased prefix,
    /// in registration order.
    pub fn matches_prefix(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.to_ascii_lowercase();
        self.entries
            .iter()
            .filter(|meta| meta.name.to_ascii_lowercase().starts_with(&prefix))
            .map(|meta| meta.name.as_ref())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
