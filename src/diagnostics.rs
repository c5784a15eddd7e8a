//! Diagnostic sinks
//!
//! Every component receives a shared sink at construction and reports each
//! rejected update to it before returning the fault. The default sink forwards
//! to `tracing`; [`MemorySink`] keeps the reports for later inspection.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use streamstats::diagnostics::MemorySink;
//! use streamstats::stats::MomentTracker;
//!
//! let sink = Arc::new(MemorySink::new());
//! let mut tracker = MomentTracker::with_sink(3, sink.clone()).unwrap();
//!
//! tracker.update(5, 1.0).unwrap();
//! assert!(tracker.update(3, 2.0).is_err()); // earlier timestamp
//! assert_eq!(sink.len(), 1);
//! ```

use std::sync::{Arc, Mutex};

use crate::error::UpdateFault;

/// Receiver for faults raised during stream processing
///
/// Implementations must tolerate concurrent calls: independent streams on
/// separate threads may share a single sink.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, fault: &UpdateFault, context: &str);
}

/// Shared handle to a sink
pub type SharedSink = Arc<dyn DiagnosticSink>;

/// Forwards every fault to `tracing`
///
/// Rejected inputs are logged at WARN, internal faults at ERROR.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    #[inline]
    fn level(fault: &UpdateFault) -> tracing::Level {
        if fault.is_input_fault() {
            tracing::Level::WARN
        } else {
            tracing::Level::ERROR
        }
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&self, fault: &UpdateFault, context: &str) {
        if Self::level(fault) == tracing::Level::ERROR {
            tracing::error!(target: "streamstats", context, %fault, "filter fault");
        } else {
            tracing::warn!(target: "streamstats", context, %fault, "update rejected");
        }
    }
}

/// A reported fault together with its context
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub fault: UpdateFault,
    pub context: String,
}

/// Collects faults in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all reports so far, oldest first
    pub fn records(&self) -> Vec<Diagnostic> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.records.lock() {
            Ok(records) => records.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all collected reports
    pub fn clear(&self) {
        match self.records.lock() {
            Ok(mut records) => records.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, fault: &UpdateFault, context: &str) {
        let record = Diagnostic {
            fault: fault.clone(),
            context: context.to_owned(),
        };
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}

/// Sink used by the plain constructors
#[inline]
pub fn default_sink() -> SharedSink {
    Arc::new(TracingSink)
}

/// Report `fault` and hand it back as an `Err`
#[inline]
pub(crate) fn reject<T>(sink: &SharedSink, fault: UpdateFault, context: &str) -> Result<T, UpdateFault> {
    sink.report(&fault, context);
    Err(fault)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_sink_levels() {
        assert_eq!(
            TracingSink::level(&UpdateFault::OutOfOrder { last: 2, got: 1 }),
            tracing::Level::WARN
        );
        assert_eq!(
            TracingSink::level(&UpdateFault::NotANumber { component: "x" }),
            tracing::Level::WARN
        );
        assert_eq!(
            TracingSink::level(&UpdateFault::Internal("degenerate".into())),
            tracing::Level::ERROR
        );
        // Both paths run without a subscriber installed
        TracingSink.report(&UpdateFault::Internal("degenerate".into()), "test");
        TracingSink.report(&UpdateFault::NotANumber { component: "x" }, "test");
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.report(&UpdateFault::OutOfOrder { last: 2, got: 1 }, "first");
        sink.report(&UpdateFault::NotANumber { component: "x" }, "second");

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].context, "first");
        assert_eq!(records[1].fault, UpdateFault::NotANumber { component: "x" });

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_reject_reports_and_returns_fault() {
        let memory = Arc::new(MemorySink::new());
        let sink: SharedSink = memory.clone();

        let result: Result<(), _> = reject(&sink, UpdateFault::Internal("boom".into()), "ctx");
        assert_eq!(result, Err(UpdateFault::Internal("boom".into())));
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_sink_shared_across_threads() {
        let memory = Arc::new(MemorySink::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sink: SharedSink = memory.clone();
                std::thread::spawn(move || {
                    sink.report(&UpdateFault::OutOfOrder { last: i + 1, got: i }, "thread");
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(memory.len(), 4);
    }
}
