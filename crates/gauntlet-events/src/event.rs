//! Execution lifecycle events.
//!
//! Events form an append-only, time-ordered record of what the launcher
//! reported. They are immutable once constructed; the kind/payload pairing
//! is enforced by the constructors.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gauntlet_core::{ElementId, ElementKind, TestElement};

/// A unique event ID (UUID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        EventId(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The element an event is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: ElementId,
    pub display_name: String,
    pub kind: ElementKind,
}

impl Subject {
    pub fn of(element: &TestElement) -> Self {
        Subject {
            id: element.id.clone(),
            display_name: element.display_name.clone(),
            kind: element.kind,
        }
    }

    pub fn is_test(&self) -> bool {
        self.kind == ElementKind::Test
    }

    pub fn is_container(&self) -> bool {
        self.kind == ElementKind::Container
    }
}

/// Terminal status of one executed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Successful,
    Aborted,
    Failed,
}

/// The result reported when an element finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: ExecutionStatus,
    pub error: Option<String>,
}

impl ExecutionOutcome {
    pub fn successful() -> Self {
        ExecutionOutcome {
            status: ExecutionStatus::Successful,
            error: None,
        }
    }

    pub fn aborted(error: impl Into<String>) -> Self {
        ExecutionOutcome {
            status: ExecutionStatus::Aborted,
            error: Some(error.into()),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        ExecutionOutcome {
            status: ExecutionStatus::Failed,
            error: Some(error.into()),
        }
    }
}

/// A key-value report entry published mid-execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub entries: BTreeMap<String, String>,
}

impl ReportEntry {
    pub fn single(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(key.into(), value.into());
        ReportEntry { entries }
    }
}

/// Lifecycle transition kinds, in the order the launcher reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DynamicRegistered,
    Skipped,
    Started,
    Finished,
    ReportingEntryPublished,
}

/// Per-kind payload. The constructors on [`ExecutionEvent`] keep kind and
/// payload consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
    None,
    SkipReason(String),
    Outcome(ExecutionOutcome),
    Report(ReportEntry),
}

/// One recorded lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub event_id: EventId,
    pub kind: EventKind,
    pub subject: Subject,
    pub payload: EventPayload,
    pub timestamp: DateTime<Utc>,
}

impl ExecutionEvent {
    fn new(kind: EventKind, subject: Subject, payload: EventPayload) -> Self {
        ExecutionEvent {
            event_id: EventId::new(),
            kind,
            subject,
            payload,
            timestamp: Utc::now(),
        }
    }

    pub fn dynamic_registered(subject: Subject) -> Self {
        Self::new(EventKind::DynamicRegistered, subject, EventPayload::None)
    }

    pub fn skipped(subject: Subject, reason: impl Into<String>) -> Self {
        Self::new(
            EventKind::Skipped,
            subject,
            EventPayload::SkipReason(reason.into()),
        )
    }

    pub fn started(subject: Subject) -> Self {
        Self::new(EventKind::Started, subject, EventPayload::None)
    }

    pub fn finished(subject: Subject, outcome: ExecutionOutcome) -> Self {
        Self::new(
            EventKind::Finished,
            subject,
            EventPayload::Outcome(outcome),
        )
    }

    pub fn reporting_entry_published(subject: Subject, entry: ReportEntry) -> Self {
        Self::new(
            EventKind::ReportingEntryPublished,
            subject,
            EventPayload::Report(entry),
        )
    }

    /// The skip reason, when this is a skipped event.
    pub fn skip_reason(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::SkipReason(reason) => Some(reason),
            _ => None,
        }
    }

    /// The outcome, when this is a finished event.
    pub fn outcome(&self) -> Option<&ExecutionOutcome> {
        match &self.payload {
            EventPayload::Outcome(outcome) => Some(outcome),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExecutionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} [{}]", self.kind, self.subject.display_name)?;
        match &self.payload {
            EventPayload::None => Ok(()),
            EventPayload::SkipReason(reason) => write!(f, " reason={}", reason),
            EventPayload::Outcome(outcome) => {
                write!(f, " status={:?}", outcome.status)?;
                if let Some(error) = &outcome.error {
                    write!(f, " error={}", error)?;
                }
                Ok(())
            }
            EventPayload::Report(entry) => write!(f, " report={:?}", entry.entries),
        }
    }
}
