//! Operating-system and architecture condition evaluators.

use gauntlet_core::{require, PreconditionError};

use crate::decl::OsSelection;
use crate::facts::{architecture_matches, current_architecture, Environment, OsFamily};
use crate::verdict::{membership_verdict, ConditionVerdict, Polarity};

/// OS family and architecture membership. When both are declared, both must
/// hold for a match.
pub(crate) fn evaluate_os(
    sel: &OsSelection,
    polarity: Polarity,
    env: &dyn Environment,
) -> Result<ConditionVerdict, PreconditionError> {
    require(
        !sel.families.is_empty() || !sel.architectures.is_empty(),
        "an operating system condition must declare at least one OS family or architecture",
    )?;

    let family = OsFamily::detect(env);
    let architecture = current_architecture(env);

    let family_matched = sel.families.is_empty() || sel.families.contains(&family);
    let architecture_matched =
        sel.architectures.is_empty() || architecture_matches(&architecture, &sel.architectures);
    let matched = family_matched && architecture_matched;

    let fact = if sel.architectures.is_empty() {
        format!("operating system: {}", family)
    } else {
        format!("operating system: {} ({})", family, architecture)
    };
    Ok(membership_verdict(
        matched,
        polarity,
        &fact,
        sel.custom_reason.as_deref(),
    ))
}
