//! Host sink mirroring through the installed global subscriber
//!
//! Lives in its own test binary since `init_logging` installs a
//! process-wide subscriber.

use async_trait::async_trait;
use bridge_traits::error::Result as SinkResult;
use bridge_traits::{LogEntry, LogLevel, LoggerSink};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CollectingSink {
    entries: Mutex<Vec<LogEntry>>,
}

#[async_trait]
impl LoggerSink for CollectingSink {
    async fn log(&self, entry: LogEntry) -> SinkResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Info
    }
}

#[test]
fn test_events_mirrored_to_host_sink() {
    let sink = Arc::new(CollectingSink::default());
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_logger_sink(sink.clone());
    init_logging(config).unwrap();

    // No runtime here, so delivery to the sink is synchronous.
    let span = tracing::info_span!(target: "core_service", "method");
    span.in_scope(|| {
        tracing::debug!(target: "core_service", "below the sink level");
        tracing::warn!(target: "core_service", code = "imgNotFound", "Method call failed");
    });
    tracing::info!(target: "some_dependency", "filtered by the subscriber");

    let entries = sink.entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.level, LogLevel::Warn);
    assert_eq!(entry.target, "core_service");
    assert_eq!(entry.message, "Method call failed");
    assert_eq!(entry.fields.get("code").map(String::as_str), Some("imgNotFound"));
    assert_eq!(entry.span.as_deref(), Some("method"));
}
