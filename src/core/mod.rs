//! Core console engine with no optional dependencies.
//!
//! This module provides the fundamental building blocks:
//! - [`Console`] - The engine: scrollback, editor, history, dispatch
//! - [`ScrollbackBuffer`] - Fixed-capacity ring of colored character cells
//! - [`InputLine`] - Cursor-based mutable input line
//! - [`CommandHistory`] - Circular log of submitted lines
//! - [`CommandRegistry`] - Case-insensitive name → description table
//! - [`ConsoleCommand`] - Command builder with its handler
//! - Events for communication between layers

mod buffer;
mod cell;
mod command;
mod console;
mod editor;
mod events;
mod history;
mod registry;

pub use buffer::{ScrollbackBuffer, VisibleRows};
pub use cell::{Cell, DEFAULT_COLOR, palette, parse_color_markup};
pub use command::{CommandArgs, CommandHandler, CommandHandlers, ConsoleCommand};
pub use console::{Console, ConsoleConfig, QueuedCommand};
pub use editor::InputLine;
pub use events::{ConsoleEventsPlugin, ConsoleInputEvent};
pub use history::CommandHistory;
pub use registry::{CommandMeta, CommandRegistry};
