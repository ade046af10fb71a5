//! Log capture into the console scrollback.
//!
//! A [`tracing`] layer pushes formatted log lines into a bounded channel from
//! whatever thread emitted them; a system owned by the console drains the
//! channel once per tick and writes each line into the scrollback. Foreign
//! threads never touch the buffer directly.

use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;
use std::sync::mpsc;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::field::Visit;

use crate::core::{Console, palette};

/// Lines queued while the channel is full are dropped rather than blocking
/// the emitting thread.
const LOG_QUEUE_CAPACITY: usize = 1024;

/// A function that wires console log capture into
/// [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer).
///
/// ```ignore
/// App::new().add_plugins(DefaultPlugins.set(bevy::log::LogPlugin {
///     custom_layer: bevy_grid_console::logging::console_log_layer,
///     ..default()
/// }));
/// ```
pub fn console_log_layer(app: &mut App) -> Option<BoxedLayer> {
    Some(Box::new(create_console_log_layer(app)))
}

fn create_console_log_layer(app: &mut App) -> LogCaptureLayer {
    let (sender, receiver) = mpsc::sync_channel(LOG_QUEUE_CAPACITY);
    app.insert_non_send_resource(CapturedLogLines(receiver));
    app.add_systems(PostUpdate, drain_captured_logs);

    LogCaptureLayer { sender }
}

/// A captured log line awaiting the per-tick drain.
struct LogLine {
    message: String,
    level: Level,
}

/// Receiver half of the capture channel, owned by the console thread.
struct CapturedLogLines(mpsc::Receiver<LogLine>);

/// Drain captured log lines into the scrollback, color-tagged by level.
///
/// Runs exactly once per tick on the owning thread; this is the only path
/// from a foreign-thread log event into the buffer.
fn drain_captured_logs(receiver: NonSend<CapturedLogLines>, console: Option<ResMut<Console>>) {
    let Some(mut console) = console else { return };
    for line in receiver.0.try_iter() {
        let tag = match line.level {
            Level::ERROR => palette::RED,
            Level::WARN => palette::YELLOW,
            Level::INFO => palette::WHITE,
            _ => palette::GRAY,
        };
        console.write(&format!("{tag}{}\n", line.message));
    }
}

/// A [`Layer`] that captures log events and queues them for the drain.
struct LogCaptureLayer {
    sender: mpsc::SyncSender<LogLine>,
}

impl<S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>> Layer<S>
    for LogCaptureLayer
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut message = None;
        event.record(&mut LogMessageVisitor(&mut message));
        if let Some(message) = message {
            // try_send: a full queue drops the line instead of blocking the
            // emitting thread.
            let _ = self.sender.try_send(LogLine {
                message,
                level: *event.metadata().level(),
            });
        }
    }
}

/// A [`Visit`]or that extracts the `message` field of a log event.
struct LogMessageVisitor<'a>(&'a mut Option<String>);

impl Visit for LogMessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}
