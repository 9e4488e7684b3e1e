//! Execution-event recording facade
//!
//! An independent observer of the external launcher:
//! - `event`: immutable lifecycle events (registered/skipped/started/
//!   finished/reported) keyed by test-element identity
//! - `recorder`: the listener implementation appending to a process-wide,
//!   concurrency-safe, append-only log
//! - `query`: filters and statistics over a log snapshot
//! - `asserts`: exact-sequence assertions whose diagnostic names every
//!   mismatched position

pub mod asserts;
pub mod event;
pub mod query;
pub mod recorder;

pub use asserts::{EventMatcher, SequenceMismatch};
pub use event::{
    EventId, EventKind, EventPayload, ExecutionEvent, ExecutionOutcome, ExecutionStatus,
    ReportEntry, Subject,
};
pub use query::{EventLog, ExecutionStats};
pub use recorder::{ExecutionListener, ExecutionRecorder};

/// Gauntlet events version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
