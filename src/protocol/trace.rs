//! Optional trace output for decoded parts.
//!
//! Parts take a sink at construction and report each decoded value to it.
//! Without a sink nothing is emitted. Trace output never affects the
//! outcome of a decode.

use std::fmt;
use std::sync::Arc;

/// Receiver of trace events.
pub trait TraceSink: Send + Sync {
    fn trace(&self, event: &dyn fmt::Display);
}

/// Forwards trace events to the `tracing` crate at TRACE level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn trace(&self, event: &dyn fmt::Display) {
        tracing::trace!(target: "hdb_result::protocol", "{}", event);
    }
}

/// Shared handle to a sink, as stored by parts.
pub type SharedTraceSink = Arc<dyn TraceSink>;

pub(crate) fn emit(sink: Option<&SharedTraceSink>, event: &dyn fmt::Display) {
    if let Some(sink) = sink {
        sink.trace(event);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Sink that records events for assertions.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) events: Mutex<Vec<String>>,
    }

    impl TraceSink for RecordingSink {
        fn trace(&self, event: &dyn fmt::Display) {
            self.events.lock().unwrap().push(event.to_string());
        }
    }

    #[test]
    fn test_emit_without_sink_is_silent() {
        emit(None, &"ignored");
    }

    #[test]
    fn test_emit_records() {
        let sink = Arc::new(RecordingSink::default());
        let shared: SharedTraceSink = sink.clone();
        emit(Some(&shared), &format_args!("resultset id: {}", 7));
        assert_eq!(*sink.events.lock().unwrap(), vec!["resultset id: 7"]);
    }
}
