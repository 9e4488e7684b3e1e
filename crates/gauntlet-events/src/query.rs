//! Queries and statistics over a recorded event log.

use serde::{Deserialize, Serialize};

use gauntlet_core::ElementId;

use crate::event::{EventKind, ExecutionEvent, ExecutionStatus};

/// Immutable snapshot of an execution log, in record order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<ExecutionEvent>,
}

impl EventLog {
    pub fn new(events: Vec<ExecutionEvent>) -> Self {
        EventLog { events }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExecutionEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[ExecutionEvent] {
        &self.events
    }

    /// Sub-log of one lifecycle kind, in record order.
    pub fn by_kind(&self, kind: EventKind) -> EventLog {
        self.filtered(|e| e.kind == kind)
    }

    /// Sub-log of test-subject events.
    pub fn tests(&self) -> EventLog {
        self.filtered(|e| e.subject.is_test())
    }

    /// Sub-log of container-subject events.
    pub fn containers(&self) -> EventLog {
        self.filtered(|e| e.subject.is_container())
    }

    /// Sub-log of one subject's own events, preserving their order.
    pub fn for_subject(&self, id: &ElementId) -> EventLog {
        self.filtered(|e| &e.subject.id == id)
    }

    /// Like [`EventLog::for_subject`], matching on the display name.
    pub fn for_subject_name(&self, display_name: &str) -> EventLog {
        self.filtered(|e| e.subject.display_name == display_name)
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    fn filtered(&self, keep: impl Fn(&ExecutionEvent) -> bool) -> EventLog {
        EventLog {
            events: self.events.iter().filter(|e| keep(e)).cloned().collect(),
        }
    }

    /// Cumulative counts across the whole log.
    pub fn stats(&self) -> ExecutionStats {
        let mut stats = ExecutionStats::default();
        for event in &self.events {
            match event.kind {
                EventKind::DynamicRegistered => stats.dynamically_registered += 1,
                EventKind::Skipped => stats.skipped += 1,
                EventKind::Started => stats.started += 1,
                EventKind::Finished => {
                    stats.finished += 1;
                    if let Some(outcome) = event.outcome() {
                        match outcome.status {
                            ExecutionStatus::Successful => stats.succeeded += 1,
                            ExecutionStatus::Aborted => stats.aborted += 1,
                            ExecutionStatus::Failed => stats.failed += 1,
                        }
                    }
                }
                EventKind::ReportingEntryPublished => stats.reported += 1,
            }
        }
        stats
    }
}

impl IntoIterator for EventLog {
    type Item = ExecutionEvent;
    type IntoIter = std::vec::IntoIter<ExecutionEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

/// Counts derived from one log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStats {
    pub dynamically_registered: usize,
    pub skipped: usize,
    pub started: usize,
    pub finished: usize,
    pub succeeded: usize,
    pub aborted: usize,
    pub failed: usize,
    pub reported: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ExecutionOutcome, ReportEntry, Subject};
    use gauntlet_core::TestElement;

    fn sample_log() -> EventLog {
        let container = Subject::of(&TestElement::container("e/suite", "suite"));
        let t1 = Subject::of(&TestElement::test("e/suite/t1", "t1"));
        let t2 = Subject::of(&TestElement::test("e/suite/t2", "t2"));
        EventLog::new(vec![
            ExecutionEvent::started(container.clone()),
            ExecutionEvent::started(t1.clone()),
            ExecutionEvent::reporting_entry_published(t1.clone(), ReportEntry::single("k", "v")),
            ExecutionEvent::finished(t1, ExecutionOutcome::successful()),
            ExecutionEvent::skipped(t2, "disabled on this platform"),
            ExecutionEvent::finished(container, ExecutionOutcome::successful()),
        ])
    }

    #[test]
    fn test_kind_filter_and_count() {
        let log = sample_log();
        assert_eq!(log.by_kind(EventKind::Started).len(), 2);
        assert_eq!(log.count(EventKind::Skipped), 1);
    }

    #[test]
    fn test_subject_kind_filters() {
        let log = sample_log();
        assert_eq!(log.tests().len(), 4);
        assert_eq!(log.containers().len(), 2);
    }

    #[test]
    fn test_for_subject_preserves_order() {
        let log = sample_log();
        let t1 = log.for_subject(&ElementId::new("e/suite/t1"));
        let kinds: Vec<EventKind> = t1.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Started,
                EventKind::ReportingEntryPublished,
                EventKind::Finished
            ]
        );
    }

    #[test]
    fn test_stats() {
        let stats = sample_log().stats();
        assert_eq!(
            stats,
            ExecutionStats {
                dynamically_registered: 0,
                skipped: 1,
                started: 2,
                finished: 2,
                succeeded: 2,
                aborted: 0,
                failed: 0,
                reported: 1,
            }
        );
    }
}
