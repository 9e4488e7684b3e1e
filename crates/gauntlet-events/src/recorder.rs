//! Append-only execution recording.
//!
//! The recorder implements the launcher-facing listener interface and keeps
//! a process-wide, time-ordered log for one run. Appends may come from
//! multiple reporting threads; the global order is the append order, and
//! each subject's own events keep their relative order.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::event::{ExecutionEvent, ExecutionOutcome, ReportEntry, Subject};
use crate::query::EventLog;

/// The callback surface the external launcher drives.
pub trait ExecutionListener: Send + Sync {
    fn dynamic_registered(&self, subject: Subject);
    fn skipped(&self, subject: Subject, reason: &str);
    fn started(&self, subject: Subject);
    fn finished(&self, subject: Subject, outcome: ExecutionOutcome);
    fn reporting_entry_published(&self, subject: Subject, entry: ReportEntry);
}

/// Records every listener callback into an append-only log.
///
/// Clones share the same log, so one recorder can be handed to several
/// reporting threads.
#[derive(Debug, Clone, Default)]
pub struct ExecutionRecorder {
    log: Arc<Mutex<Vec<ExecutionEvent>>>,
}

impl ExecutionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event; returns its position in the log.
    pub fn record(&self, event: ExecutionEvent) -> usize {
        let mut log = self.log.lock().unwrap();
        let position = log.len();
        debug!(event = %event, position, "recorded execution event");
        log.push(event);
        position
    }

    pub fn len(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.lock().unwrap().is_empty()
    }

    /// An immutable snapshot of the log so far.
    pub fn snapshot(&self) -> EventLog {
        EventLog::new(self.log.lock().unwrap().clone())
    }
}

impl ExecutionListener for ExecutionRecorder {
    fn dynamic_registered(&self, subject: Subject) {
        self.record(ExecutionEvent::dynamic_registered(subject));
    }

    fn skipped(&self, subject: Subject, reason: &str) {
        self.record(ExecutionEvent::skipped(subject, reason));
    }

    fn started(&self, subject: Subject) {
        self.record(ExecutionEvent::started(subject));
    }

    fn finished(&self, subject: Subject, outcome: ExecutionOutcome) {
        self.record(ExecutionEvent::finished(subject, outcome));
    }

    fn reporting_entry_published(&self, subject: Subject, entry: ReportEntry) {
        self.record(ExecutionEvent::reporting_entry_published(subject, entry));
    }
}
