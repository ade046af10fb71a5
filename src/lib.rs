//! An embeddable cell-grid developer console for Bevy.
//!
//! In the style of classic in-game consoles, bevy_grid_console provides:
//!
//! - **Scrollback surface**: a fixed-capacity ring of colored character
//!   cells with `^RGB` inline color markup
//! - **Line editor**: cursor-based input with history recall and prefix
//!   tab completion
//! - **Command shell**: a case-insensitive registry dispatching to handlers
//!   with full `World` access
//! - **Log capture**: `tracing` output drained into the scrollback once per
//!   tick through a bounded queue
//!
//! The host drives the console once per tick and renders it from the
//! read-only views ([`Console::buffer`] and [`Console::input`]); glyph
//! drawing and raw key polling stay on the host side.
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_grid_console::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ConsolePlugin::default())
//!         .add_systems(Startup, setup_console)
//!         .run();
//! }
//!
//! fn setup_console(mut console: ResMut<Console>, mut handlers: ResMut<CommandHandlers>) {
//!     register_command(&mut console, &mut handlers,
//!         ConsoleCommand::new("gravity", |args, world| {
//!             let Some(value) = args.parse::<f32>(0) else {
//!                 let mut console = world.resource_mut::<Console>();
//!                 console.write_line("^F00Expected a number");
//!                 return;
//!             };
//!             // ... mutate the game state ...
//!             world.resource_mut::<Console>()
//!                 .write_line(&format!("^0F0Gravity changed to {value}"));
//!         })
//!         .description("Set world gravity"));
//! }
//! ```

use bevy::prelude::*;

// Core engine (always available, zero optional deps)
pub mod core;

// Log capture into the scrollback
pub mod logging;

// Re-export core types at crate root for convenience
pub use crate::core::{
    Cell, CommandArgs, CommandHandler, CommandHandlers, CommandHistory, CommandMeta,
    CommandRegistry, Console, ConsoleCommand, ConsoleConfig, ConsoleEventsPlugin,
    ConsoleInputEvent, DEFAULT_COLOR, InputLine, QueuedCommand, ScrollbackBuffer, palette,
    parse_color_markup,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::core::{
        Cell, CommandArgs, CommandHandlers, Console, ConsoleCommand, ConsoleConfig,
        ConsoleInputEvent, InputLine, ScrollbackBuffer, palette,
    };
    pub use crate::{ConsolePlugin, PendingCommands, register_command};
}

/// Main console plugin.
///
/// Inserts the [`Console`] resource and wires the two-stage dispatch
/// pipeline: input events are parsed and routed by the console, then queued
/// handlers run with exclusive `World` access.
#[derive(Default)]
pub struct ConsolePlugin {
    /// Dimensions and capacities for the console instance.
    pub config: ConsoleConfig,
}

impl ConsolePlugin {
    /// Create a plugin with the given console configuration.
    pub fn with_config(config: ConsoleConfig) -> Self {
        Self { config }
    }
}

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Console::new(&self.config))
            .init_resource::<CommandHandlers>()
            .init_resource::<PendingCommands>()
            .add_plugins(ConsoleEventsPlugin)
            .add_systems(Startup, register_builtin_commands)
            .add_systems(
                Update,
                (parse_console_input, execute_pending_commands).chain(),
            );
    }
}

/// Register a command's metadata and handler together.
///
/// On a duplicate name the console reports the rejection, the original
/// registration is retained, and the new handler is dropped.
pub fn register_command(
    console: &mut Console,
    handlers: &mut CommandHandlers,
    cmd: ConsoleCommand,
) {
    let (name, description, handler) = cmd.split();
    if let Some(key) = console.register(name, description) {
        handlers.register(key, handler);
    }
}

/// Register the built-in console commands.
fn register_builtin_commands(
    mut console: ResMut<Console>,
    mut handlers: ResMut<CommandHandlers>,
) {
    // help - List all commands with their descriptions
    register_command(
        &mut console,
        &mut handlers,
        ConsoleCommand::new("help", |_args, world| {
            let mut console = world.resource_mut::<Console>();
            let lines: Vec<String> = console
                .commands()
                .map(|meta| {
                    format!(
                        "  {}{:<15} {}{}",
                        palette::PINK,
                        meta.name,
                        palette::YELLOW,
                        meta.description
                    )
                })
                .collect();
            for line in lines {
                console.write_line(&line);
            }
        })
        .description("Show available commands"),
    );

    // clear - Clear the scrollback
    register_command(
        &mut console,
        &mut handlers,
        ConsoleCommand::new("clear", |_args, world| {
            world.resource_mut::<Console>().clear();
        })
        .description("Clear console"),
    );

    // echo - Print text to the console
    register_command(
        &mut console,
        &mut handlers,
        ConsoleCommand::new("echo", |args, world| {
            let text = args.join(" ");
            world.resource_mut::<Console>().write_line(&text);
        })
        .description("Print text to console"),
    );
}

/// Commands parsed this tick, waiting for their handlers to run.
///
/// A host system that drives [`Console::submit`] directly (for example from
/// its own key handling) pushes the result here for execution.
#[derive(Resource, Default)]
pub struct PendingCommands {
    queue: Vec<QueuedCommand>,
}

impl PendingCommands {
    /// Queue a dispatched command for execution this tick.
    pub fn push(&mut self, cmd: QueuedCommand) {
        self.queue.push(cmd);
    }
}

/// System that routes submitted lines through the console dispatcher.
fn parse_console_input(
    mut input_events: MessageReader<ConsoleInputEvent>,
    mut console: ResMut<Console>,
    mut pending: ResMut<PendingCommands>,
) {
    for event in input_events.read() {
        if let Some(cmd) = console.dispatch_line(&event.line) {
            pending.queue.push(cmd);
        }
    }
}

/// Exclusive system that executes queued commands with full `World` access.
///
/// Handlers are taken out of [`CommandHandlers`] for the duration of the
/// call and always put back, and each call runs under `catch_unwind`: a
/// panicking handler is reported as a console error line and never takes
/// down the console.
fn execute_pending_commands(world: &mut World) {
    let queue = std::mem::take(&mut world.resource_mut::<PendingCommands>().queue);
    if queue.is_empty() {
        return;
    }

    for cmd in queue {
        let name = cmd.name.clone();
        let panic_msg = world.resource_scope(|world, mut handlers: Mut<CommandHandlers>| {
            let Some(handler) = handlers.take(&cmd.name) else {
                return None;
            };

            let args_refs: Vec<&str> = cmd.args.iter().map(|s| s.as_str()).collect();
            let cmd_args = CommandArgs::new(&cmd.raw, args_refs);

            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(&cmd_args, world);
            }));

            // Always restore the handler, panic or not.
            handlers.put(&cmd.name, handler);

            match result {
                Ok(()) => None,
                Err(panic_info) => Some(
                    if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "unknown panic".to_string()
                    },
                ),
            }
        });

        if let Some(msg) = panic_msg {
            let mut console = world.resource_mut::<Console>();
            console.write(&format!(
                "{}Command '{}' panicked: {}\n",
                palette::RED,
                name,
                msg
            ));
        }
    }
}
