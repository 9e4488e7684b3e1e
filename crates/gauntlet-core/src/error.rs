//! Error types shared across the execution core.

use thiserror::Error;

/// A violated precondition: a declaration or configuration mistake.
///
/// This is the single error contract the host launcher maps onto its own
/// error-reporting scheme. It is distinct from a disabled verdict and from
/// an assertion failure, and it is never silently downgraded to an
/// enabled/disabled outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("precondition violated: {0}")]
pub struct PreconditionError(pub String);

impl PreconditionError {
    pub fn new(message: impl Into<String>) -> Self {
        PreconditionError(message.into())
    }

    /// The message without the error-display prefix.
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Fail with a [`PreconditionError`] unless `condition` holds.
pub fn require(condition: bool, message: impl Into<String>) -> Result<(), PreconditionError> {
    if condition {
        Ok(())
    } else {
        Err(PreconditionError::new(message))
    }
}

/// Fail unless `value` contains at least one non-whitespace character.
///
/// `what` names the offending attribute in the error message.
pub fn require_not_blank(value: &str, what: &str) -> Result<(), PreconditionError> {
    require(
        !value.trim().is_empty(),
        format!("the '{}' attribute must not be blank", what),
    )
}
