//! Console events for communication between the host front end and the core.

use bevy::prelude::*;

/// Event carrying a raw line submitted to the console.
///
/// Whatever front end the host wires up (on-screen overlay, terminal,
/// network admin channel) sends this; the dispatch pipeline parses and
/// executes it on the next tick.
///
/// # Examples
///
/// ```ignore
/// fn submit(mut events: MessageWriter<ConsoleInputEvent>) {
///     events.write(ConsoleInputEvent::new("timescale 0.5"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The raw line to dispatch.
    pub line: String,
}

impl ConsoleInputEvent {
    /// Create a new input event.
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }
}

/// Plugin that registers the console events.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>();
    }
}
