//! Structured logging helpers. The node never owns process-wide logging
//! state; a [`slog::Logger`] is injected at construction, same as
//! `Channel::new` does in the teacher (`server/lib/neutronium/src/net/channel.rs`),
//! and falls back to a discard logger when none is supplied.

pub use slog::{self, o, Logger};

use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::Severity;
use sloggers::Build;

/// A logger that drops every record. Used whenever the caller doesn't care
/// to wire one up.
pub fn discard() -> Logger {
    Logger::root(slog::Discard, o!())
}

/// A human-readable terminal logger at debug level, for examples and
/// interactive debugging sessions. Not used by the library itself.
pub fn terminal_debug() -> Logger {
    let mut builder = TerminalLoggerBuilder::new();
    builder.level(Severity::Debug);
    builder.destination(Destination::Stderr);
    builder
        .build()
        .unwrap_or_else(|_| Logger::root(slog::Discard, o!()))
}
