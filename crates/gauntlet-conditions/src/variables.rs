//! Environment-variable and property pattern conditions.
//!
//! These families are repeatable: all declarations of one family on an
//! element evaluate together, and every one of them must pass for the
//! element to stay enabled (logical AND). The first disabling declaration
//! wins; when none disable, the family reports a single summary verdict.

use gauntlet_core::{require_not_blank, PreconditionError};
use regex::Regex;

use crate::decl::PatternCondition;
use crate::facts::{Environment, OsFamily};
use crate::verdict::{ConditionVerdict, Polarity};

/// Which ambient table the condition reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LookupKind {
    EnvironmentVariable,
    Property,
}

impl LookupKind {
    fn label(self) -> &'static str {
        match self {
            LookupKind::EnvironmentVariable => "Environment variable",
            LookupKind::Property => "Property",
        }
    }

    fn lookup(self, env: &dyn Environment, name: &str) -> Option<String> {
        match self {
            LookupKind::EnvironmentVariable => env.env_var(name),
            LookupKind::Property => env.property(name),
        }
    }
}

/// Compile a full-string (anchored) regular expression.
fn full_match_regex(pattern: &str) -> Result<Regex, PreconditionError> {
    Regex::new(&format!(r"\A(?:{})\z", pattern)).map_err(|e| {
        PreconditionError::new(format!("invalid regular expression [{}]: {}", pattern, e))
    })
}

/// Evaluate every repeated declaration of one pattern family.
pub(crate) fn evaluate_family(
    family: &str,
    decls: &[&PatternCondition],
    kind: LookupKind,
    polarity: Polarity,
    env: &dyn Environment,
) -> Result<ConditionVerdict, PreconditionError> {
    for decl in decls {
        let verdict = evaluate_one(decl, kind, polarity, env)?;
        if verdict.is_disabled() {
            return Ok(verdict);
        }
    }
    Ok(ConditionVerdict::enabled(format!(
        "No {} conditions resulting in 'disabled' execution encountered",
        family
    )))
}

fn evaluate_one(
    decl: &PatternCondition,
    kind: LookupKind,
    polarity: Polarity,
    env: &dyn Environment,
) -> Result<ConditionVerdict, PreconditionError> {
    require_not_blank(&decl.named, "named")?;
    require_not_blank(&decl.matches, "matches")?;
    let pattern = full_match_regex(&decl.matches)?;

    if !decl.on_os.is_empty() {
        let family = OsFamily::detect(env);
        if !decl.on_os.contains(&family) {
            return Ok(ConditionVerdict::enabled(format!(
                "{} [{}] condition does not apply on operating system: {}",
                kind.label(),
                decl.named,
                family
            )));
        }
    }

    let value = kind.lookup(env, &decl.named);
    let (matched, detail) = match &value {
        None => (
            false,
            format!("{} [{}] does not exist", kind.label(), decl.named),
        ),
        Some(v) if pattern.is_match(v) => (
            true,
            format!(
                "{} [{}] with value [{}] matches regular expression [{}]",
                kind.label(),
                decl.named,
                v,
                decl.matches
            ),
        ),
        Some(v) => (
            false,
            format!(
                "{} [{}] with value [{}] does not match regular expression [{}]",
                kind.label(),
                decl.named,
                v,
                decl.matches
            ),
        ),
    };

    let disabled = match polarity {
        Polarity::DisabledOnMatch => matched,
        Polarity::EnabledOnMatch => !matched,
    };
    Ok(if disabled {
        ConditionVerdict::disabled(detail).with_custom_reason(decl.custom_reason.as_deref())
    } else {
        ConditionVerdict::enabled(detail)
    })
}
