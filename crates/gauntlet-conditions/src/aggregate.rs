//! Composite condition aggregation.
//!
//! All conditions declared on one element evaluate in declaration order.
//! The first disabling verdict is returned verbatim; when nothing disables,
//! the element stays enabled with every "why enabled" reason collected.
//! Configuration errors propagate immediately and are never folded into a
//! verdict.

use std::collections::HashSet;

use tracing::debug;

use gauntlet_core::{ExtensionContext, PreconditionError};

use crate::decl::{ConditionDecl, ConditionSet, PatternCondition};
use crate::facts::Environment;
use crate::variables::{self, LookupKind};
use crate::verdict::{ConditionVerdict, Polarity};
use crate::{net, os, predicate, toolchain};

fn pattern_group<'a, F>(decls: &[&'a ConditionDecl], extract: F) -> Vec<&'a PatternCondition>
where
    F: Fn(&'a ConditionDecl) -> Option<&'a PatternCondition>,
{
    decls.iter().copied().filter_map(extract).collect()
}

/// Evaluate every condition attached to `element` and combine the verdicts.
pub fn evaluate_conditions(
    set: &ConditionSet,
    ctx: &ExtensionContext,
    env: &dyn Environment,
) -> Result<ConditionVerdict, PreconditionError> {
    let decls = set.flatten();
    if decls.is_empty() {
        return Ok(ConditionVerdict::enabled(format!(
            "No conditions present on {}; execution enabled",
            ctx.element.display_name
        )));
    }

    let mut enabled_reasons: Vec<String> = Vec::new();
    // Repeatable pattern families evaluate all their declarations together,
    // once, at the position of their first declaration.
    let mut handled_families: HashSet<&'static str> = HashSet::new();

    for decl in &decls {
        let verdict = match decl {
            ConditionDecl::EnabledOnToolchain(sel) => {
                toolchain::evaluate_selection(sel, Polarity::EnabledOnMatch, env)?
            }
            ConditionDecl::DisabledOnToolchain(sel) => {
                toolchain::evaluate_selection(sel, Polarity::DisabledOnMatch, env)?
            }
            ConditionDecl::EnabledForToolchainRange(range) => {
                toolchain::evaluate_range(range, Polarity::EnabledOnMatch, env)?
            }
            ConditionDecl::DisabledForToolchainRange(range) => {
                toolchain::evaluate_range(range, Polarity::DisabledOnMatch, env)?
            }
            ConditionDecl::EnabledOnOs(sel) => os::evaluate_os(sel, Polarity::EnabledOnMatch, env)?,
            ConditionDecl::DisabledOnOs(sel) => {
                os::evaluate_os(sel, Polarity::DisabledOnMatch, env)?
            }
            ConditionDecl::EnabledIfEnvironmentVariable(_) => {
                if !handled_families.insert(decl.family()) {
                    continue;
                }
                let group = pattern_group(&decls, |d| match d {
                    ConditionDecl::EnabledIfEnvironmentVariable(p) => Some(p),
                    _ => None,
                });
                variables::evaluate_family(
                    decl.family(),
                    &group,
                    LookupKind::EnvironmentVariable,
                    Polarity::EnabledOnMatch,
                    env,
                )?
            }
            ConditionDecl::DisabledIfEnvironmentVariable(_) => {
                if !handled_families.insert(decl.family()) {
                    continue;
                }
                let group = pattern_group(&decls, |d| match d {
                    ConditionDecl::DisabledIfEnvironmentVariable(p) => Some(p),
                    _ => None,
                });
                variables::evaluate_family(
                    decl.family(),
                    &group,
                    LookupKind::EnvironmentVariable,
                    Polarity::DisabledOnMatch,
                    env,
                )?
            }
            ConditionDecl::EnabledIfProperty(_) => {
                if !handled_families.insert(decl.family()) {
                    continue;
                }
                let group = pattern_group(&decls, |d| match d {
                    ConditionDecl::EnabledIfProperty(p) => Some(p),
                    _ => None,
                });
                variables::evaluate_family(
                    decl.family(),
                    &group,
                    LookupKind::Property,
                    Polarity::EnabledOnMatch,
                    env,
                )?
            }
            ConditionDecl::DisabledIfProperty(_) => {
                if !handled_families.insert(decl.family()) {
                    continue;
                }
                let group = pattern_group(&decls, |d| match d {
                    ConditionDecl::DisabledIfProperty(p) => Some(p),
                    _ => None,
                });
                variables::evaluate_family(
                    decl.family(),
                    &group,
                    LookupKind::Property,
                    Polarity::DisabledOnMatch,
                    env,
                )?
            }
            ConditionDecl::EnabledIfPredicate(reference) => {
                predicate::evaluate_predicate(reference, Polarity::EnabledOnMatch, ctx)?
            }
            ConditionDecl::DisabledIfPredicate(reference) => {
                predicate::evaluate_predicate(reference, Polarity::DisabledOnMatch, ctx)?
            }
            ConditionDecl::DisabledIfPortAvailable(port) => net::evaluate_port(port)?,
            // flatten() expands composed declarations, so none reach here.
            ConditionDecl::Composed { .. } => continue,
        };

        debug!(
            element = %ctx.element.id,
            family = decl.family(),
            disabled = verdict.is_disabled(),
            reason = verdict.reason(),
            "condition evaluated"
        );

        if verdict.is_disabled() {
            return Ok(verdict);
        }
        enabled_reasons.push(verdict.reason().to_string());
    }

    Ok(ConditionVerdict::enabled(enabled_reasons.join("; ")))
}
