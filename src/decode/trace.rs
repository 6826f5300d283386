//! # Decode Trace
//!
//! Human-readable log of what the decoder saw, one event per token.
//! The decoder only writes to a sink; collecting, printing or forwarding
//! the events is up to the caller.

use serde::Serialize;
use std::fmt;

/// One decoded token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    /// 0-based offset of the byte the event is about
    pub position: usize,
    pub message: String,
}

impl TraceEvent {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>6}] {}", self.position, self.message)
    }
}

/// Append-only consumer of trace events.
pub trait TraceSink {
    /// When false the decoder skips formatting messages entirely.
    fn enabled(&self) -> bool {
        true
    }

    fn record(&mut self, event: TraceEvent);

    /// Events to hand back in the decode result, if this sink keeps them.
    fn into_events(self) -> Option<Vec<TraceEvent>>
    where
        Self: Sized,
    {
        None
    }
}

/// Collects events in memory.
impl TraceSink for Vec<TraceEvent> {
    fn record(&mut self, event: TraceEvent) {
        self.push(event);
    }

    fn into_events(self) -> Option<Vec<TraceEvent>> {
        Some(self)
    }
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl TraceSink for Discard {
    fn enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _event: TraceEvent) {}
}

/// Forwards events to the `log` facade at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn enabled(&self) -> bool {
        log::log_enabled!(log::Level::Debug)
    }

    fn record(&mut self, event: TraceEvent) {
        log::debug!("{}", event);
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn enabled(&self) -> bool {
        (**self).enabled()
    }

    fn record(&mut self, event: TraceEvent) {
        (**self).record(event);
    }
}
