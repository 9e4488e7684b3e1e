//! Exact-sequence assertions over an event log.
//!
//! An expectation list is compared position by position against the full
//! (optionally pre-filtered) log. The failure diagnostic names every
//! mismatched position and any length difference, not just the first.

use thiserror::Error;

use crate::event::{EventKind, ExecutionEvent, ExecutionStatus};
use crate::query::EventLog;

/// Composable description of one expected event.
#[derive(Default)]
pub struct EventMatcher {
    kind: Option<EventKind>,
    subject_name: Option<String>,
    status: Option<ExecutionStatus>,
    reason_contains: Option<String>,
    error_contains: Option<String>,
}

impl EventMatcher {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn started() -> Self {
        EventMatcher {
            kind: Some(EventKind::Started),
            ..Self::default()
        }
    }

    pub fn skipped() -> Self {
        EventMatcher {
            kind: Some(EventKind::Skipped),
            ..Self::default()
        }
    }

    pub fn finished() -> Self {
        EventMatcher {
            kind: Some(EventKind::Finished),
            ..Self::default()
        }
    }

    pub fn dynamic_registered() -> Self {
        EventMatcher {
            kind: Some(EventKind::DynamicRegistered),
            ..Self::default()
        }
    }

    pub fn reporting_entry_published() -> Self {
        EventMatcher {
            kind: Some(EventKind::ReportingEntryPublished),
            ..Self::default()
        }
    }

    pub fn subject(mut self, display_name: impl Into<String>) -> Self {
        self.subject_name = Some(display_name.into());
        self
    }

    pub fn successful(mut self) -> Self {
        self.status = Some(ExecutionStatus::Successful);
        self
    }

    pub fn aborted(mut self) -> Self {
        self.status = Some(ExecutionStatus::Aborted);
        self
    }

    pub fn failed(mut self) -> Self {
        self.status = Some(ExecutionStatus::Failed);
        self
    }

    pub fn reason_containing(mut self, fragment: impl Into<String>) -> Self {
        self.reason_contains = Some(fragment.into());
        self
    }

    pub fn error_containing(mut self, fragment: impl Into<String>) -> Self {
        self.error_contains = Some(fragment.into());
        self
    }

    pub fn matches(&self, event: &ExecutionEvent) -> bool {
        if let Some(kind) = self.kind {
            if event.kind != kind {
                return false;
            }
        }
        if let Some(name) = &self.subject_name {
            if &event.subject.display_name != name {
                return false;
            }
        }
        if let Some(status) = self.status {
            match event.outcome() {
                Some(outcome) if outcome.status == status => {}
                _ => return false,
            }
        }
        if let Some(fragment) = &self.reason_contains {
            match event.skip_reason() {
                Some(reason) if reason.contains(fragment.as_str()) => {}
                _ => return false,
            }
        }
        if let Some(fragment) = &self.error_contains {
            match event.outcome().and_then(|o| o.error.as_deref()) {
                Some(error) if error.contains(fragment.as_str()) => {}
                _ => return false,
            }
        }
        true
    }
}

impl std::fmt::Display for EventMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(kind) = self.kind {
            parts.push(format!("{:?}", kind));
        }
        if let Some(name) = &self.subject_name {
            parts.push(format!("[{}]", name));
        }
        if let Some(status) = self.status {
            parts.push(format!("status={:?}", status));
        }
        if let Some(fragment) = &self.reason_contains {
            parts.push(format!("reason~={}", fragment));
        }
        if let Some(fragment) = &self.error_contains {
            parts.push(format!("error~={}", fragment));
        }
        if parts.is_empty() {
            parts.push("any event".to_string());
        }
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ExecutionOutcome, Subject};
    use gauntlet_core::TestElement;

    fn subject(name: &str) -> Subject {
        Subject::of(&TestElement::test(format!("e/{}", name), name))
    }

    fn log() -> EventLog {
        EventLog::new(vec![
            ExecutionEvent::started(subject("t1")),
            ExecutionEvent::finished(subject("t1"), ExecutionOutcome::successful()),
            ExecutionEvent::skipped(subject("t2"), "disabled on windows"),
        ])
    }

    #[test]
    fn test_matching_sequence_passes() {
        log()
            .assert_sequence(&[
                EventMatcher::started().subject("t1"),
                EventMatcher::finished().subject("t1").successful(),
                EventMatcher::skipped()
                    .subject("t2")
                    .reason_containing("windows"),
            ])
            .unwrap();
    }

    #[test]
    fn test_every_mismatched_position_is_reported() {
        let err = log()
            .assert_sequence(&[
                EventMatcher::skipped().subject("t1"),
                EventMatcher::finished().subject("t1").failed(),
                EventMatcher::skipped().subject("t2"),
            ])
            .unwrap_err();
        assert_eq!(err.mismatches.len(), 2);
        assert!(err.mismatches[0].starts_with("position 0"));
        assert!(err.mismatches[1].starts_with("position 1"));
    }

    #[test]
    fn test_length_mismatch_is_reported_alongside_positions() {
        let err = log()
            .assert_sequence(&[EventMatcher::finished()])
            .unwrap_err();
        assert!(err.mismatches[0].contains("expected 1 events but 3 were recorded"));
        assert!(err.mismatches[1].starts_with("position 0"));
    }

    #[test]
    fn test_any_matcher_matches_everything() {
        log()
            .assert_sequence(&[EventMatcher::any(), EventMatcher::any(), EventMatcher::any()])
            .unwrap();
    }

    #[test]
    fn test_matcher_display() {
        let matcher = EventMatcher::finished().subject("t1").failed();
        assert_eq!(matcher.to_string(), "Finished [t1] status=Failed");
        assert_eq!(EventMatcher::any().to_string(), "any event");
    }
}

/// Aggregate sequence-assertion failure.
#[derive(Error, Debug)]
#[error("event sequence mismatch:\n{}", .mismatches.join("\n"))]
pub struct SequenceMismatch {
    pub mismatches: Vec<String>,
}

impl EventLog {
    /// Compare this log position by position against `expected`.
    ///
    /// Collects every mismatched position and any length mismatch into one
    /// aggregate diagnostic.
    pub fn assert_sequence(&self, expected: &[EventMatcher]) -> Result<(), SequenceMismatch> {
        let mut mismatches = Vec::new();

        if self.len() != expected.len() {
            mismatches.push(format!(
                "expected {} events but {} were recorded",
                expected.len(),
                self.len()
            ));
        }
        for (position, (matcher, event)) in expected.iter().zip(self.iter()).enumerate() {
            if !matcher.matches(event) {
                mismatches.push(format!(
                    "position {}: expected <{}> but was <{}>",
                    position, matcher, event
                ));
            }
        }

        if mismatches.is_empty() {
            Ok(())
        } else {
            Err(SequenceMismatch { mismatches })
        }
    }
}
