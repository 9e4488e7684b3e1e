//! Condition evaluation verdicts.

use serde::{Deserialize, Serialize};

/// Immutable outcome of one condition evaluation: enabled or disabled, with
/// the reason always present. Configuration mistakes are not verdicts; they
/// surface as `PreconditionError` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionVerdict {
    disabled: bool,
    reason: String,
}

impl ConditionVerdict {
    pub fn enabled(reason: impl Into<String>) -> Self {
        ConditionVerdict {
            disabled: false,
            reason: reason.into(),
        }
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        ConditionVerdict {
            disabled: true,
            reason: reason.into(),
        }
    }

    /// Append a user-supplied reason after a `" ==> "` separator.
    ///
    /// Only disabling verdicts carry the custom reason; on enabled verdicts
    /// this is a no-op.
    pub fn with_custom_reason(mut self, custom: Option<&str>) -> Self {
        if self.disabled {
            if let Some(custom) = custom {
                self.reason = format!("{} ==> {}", self.reason, custom);
            }
        }
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Whether membership in a declared set/range enables or disables the
/// element. Every membership family comes in both polarities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    EnabledOnMatch,
    DisabledOnMatch,
}

/// Build the verdict for a membership evaluation against `fact`, the literal
/// current fact text (e.g. `toolchain version: 1.82.0`).
pub(crate) fn membership_verdict(
    matched: bool,
    polarity: Polarity,
    fact: &str,
    custom_reason: Option<&str>,
) -> ConditionVerdict {
    let disabled = match polarity {
        Polarity::DisabledOnMatch => matched,
        Polarity::EnabledOnMatch => !matched,
    };
    if disabled {
        ConditionVerdict::disabled(format!("Disabled on {}", fact)).with_custom_reason(custom_reason)
    } else {
        ConditionVerdict::enabled(format!("Enabled on {}", fact))
    }
}
