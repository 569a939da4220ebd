//! Metrics-sink collaborator.
//!
//! The engine reports operation timings and counters through [`MetricsSink`]
//! so hosts can bridge to their own registry. [`NoopMetrics`] is the default;
//! [`TracingMetrics`] mirrors everything to `tracing` for local debugging.

use std::time::Duration;

use tracing::debug;

/// Sink for operation timings and monotonic counters.
///
/// Implementations must be cheap: these calls sit on every comparison's hot
/// path.
pub trait MetricsSink: Send + Sync {
    /// Records one completed operation with its wall-clock duration.
    fn record_operation(&self, operation: &str, duration: Duration, success: bool);

    /// Increments a named counter.
    fn incr_counter(&self, name: &str, by: u64);
}

/// Discards all metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn record_operation(&self, _operation: &str, _duration: Duration, _success: bool) {}

    fn incr_counter(&self, _name: &str, _by: u64) {}
}

/// Emits every metric as a `tracing` debug event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMetrics;

impl MetricsSink for TracingMetrics {
    fn record_operation(&self, operation: &str, duration: Duration, success: bool) {
        debug!(
            operation,
            duration_ms = duration.as_millis() as u64,
            success,
            "operation completed"
        );
    }

    fn incr_counter(&self, name: &str, by: u64) {
        debug!(counter = name, by, "counter incremented");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingSink {
        operations: Mutex<Vec<(String, bool)>>,
        counters: Mutex<Vec<(String, u64)>>,
    }

    impl MetricsSink for RecordingSink {
        fn record_operation(&self, operation: &str, _duration: Duration, success: bool) {
            self.operations.lock().push((operation.to_owned(), success));
        }

        fn incr_counter(&self, name: &str, by: u64) {
            self.counters.lock().push((name.to_owned(), by));
        }
    }

    #[test]
    fn test_sink_is_object_safe() {
        let recording = Arc::new(RecordingSink::default());
        let sink: Arc<dyn MetricsSink> = recording.clone();

        sink.record_operation("compare", Duration::from_millis(3), true);
        sink.incr_counter("comparisons_total", 1);

        assert_eq!(recording.operations.lock().len(), 1);
        assert_eq!(recording.counters.lock().len(), 1);
    }

    #[test]
    fn test_noop_accepts_everything() {
        let sink = NoopMetrics;
        sink.record_operation("anything", Duration::ZERO, false);
        sink.incr_counter("anything_total", 42);
    }
}
