//! Toolchain-version condition evaluators.

use gauntlet_core::{require, PreconditionError};

use crate::decl::{VersionRange, VersionSelection};
use crate::facts::{Environment, ToolchainVersion, PROP_TOOLCHAIN_VERSION};
use crate::verdict::{membership_verdict, ConditionVerdict, Polarity};

fn current_raw(env: &dyn Environment) -> String {
    env.property(PROP_TOOLCHAIN_VERSION)
        .unwrap_or_else(|| "unknown".to_string())
}

/// Exact-set membership over version buckets. `Other` matches only when the
/// declaration names `Other` itself.
pub(crate) fn evaluate_selection(
    sel: &VersionSelection,
    polarity: Polarity,
    env: &dyn Environment,
) -> Result<ConditionVerdict, PreconditionError> {
    require(
        !sel.versions.is_empty(),
        "at least one toolchain version must be declared",
    )?;
    let raw = current_raw(env);
    let current = ToolchainVersion::parse(&raw);
    let matched = sel.versions.contains(&current);
    Ok(membership_verdict(
        matched,
        polarity,
        &format!("toolchain version: {}", raw),
        sel.custom_reason.as_deref(),
    ))
}

/// Inclusive range membership. A current version of `Other` never satisfies
/// a range: it is excluded from ordered comparison.
pub(crate) fn evaluate_range(
    range: &VersionRange,
    polarity: Polarity,
    env: &dyn Environment,
) -> Result<ConditionVerdict, PreconditionError> {
    require(
        range.min.is_some() || range.max.is_some(),
        "a toolchain version range must declare at least one bound",
    )?;
    for bound in [range.min, range.max].into_iter().flatten() {
        require(
            bound != ToolchainVersion::Other,
            "OTHER cannot be used as a toolchain version range bound",
        )?;
    }
    if let (Some(min), Some(max)) = (range.min, range.max) {
        require(
            min.minor() <= max.minor(),
            format!("inverted toolchain version range: min {} is above max {}", min, max),
        )?;
    }

    let raw = current_raw(env);
    let current = ToolchainVersion::parse(&raw);
    let matched = match current.minor() {
        None => false,
        Some(minor) => {
            let above_min = range
                .min
                .and_then(|v| v.minor())
                .map_or(true, |lo| minor >= lo);
            let below_max = range
                .max
                .and_then(|v| v.minor())
                .map_or(true, |hi| minor <= hi);
            above_min && below_max
        }
    };
    Ok(membership_verdict(
        matched,
        polarity,
        &format!("toolchain version: {}", raw),
        range.custom_reason.as_deref(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeEnvironment;

    fn env_with_version(version: &str) -> FakeEnvironment {
        FakeEnvironment::new().with_property(PROP_TOOLCHAIN_VERSION, version)
    }

    #[test]
    fn test_selection_disabled_on_member() {
        let env = env_with_version("1.82.0");
        let sel = VersionSelection::of(&[ToolchainVersion::V1_82]);
        let verdict = evaluate_selection(&sel, Polarity::DisabledOnMatch, &env).unwrap();
        assert!(verdict.is_disabled());
        assert_eq!(verdict.reason(), "Disabled on toolchain version: 1.82.0");
    }

    #[test]
    fn test_selection_reason_carries_custom_text() {
        let env = env_with_version("1.82.0");
        let sel = VersionSelection::of(&[ToolchainVersion::V1_82])
            .with_custom_reason("known miscompilation");
        let verdict = evaluate_selection(&sel, Polarity::DisabledOnMatch, &env).unwrap();
        assert_eq!(
            verdict.reason(),
            "Disabled on toolchain version: 1.82.0 ==> known miscompilation"
        );
    }

    #[test]
    fn test_selection_empty_versions_is_configuration_error() {
        let env = env_with_version("1.82.0");
        let sel = VersionSelection::of(&[]);
        assert!(evaluate_selection(&sel, Polarity::DisabledOnMatch, &env).is_err());
    }

    #[test]
    fn test_selection_other_matches_only_exact_other() {
        let env = env_with_version("2.0.0");
        let sel = VersionSelection::of(&[ToolchainVersion::Other]);
        let verdict = evaluate_selection(&sel, Polarity::DisabledOnMatch, &env).unwrap();
        assert!(verdict.is_disabled());

        let sel = VersionSelection::of(&[ToolchainVersion::V1_82]);
        let verdict = evaluate_selection(&sel, Polarity::DisabledOnMatch, &env).unwrap();
        assert!(verdict.is_enabled());
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let range = VersionRange::between(ToolchainVersion::V1_80, ToolchainVersion::V1_84);
        for (version, inside) in [
            ("1.79.0", false),
            ("1.80.0", true),
            ("1.82.1", true),
            ("1.84.0", true),
            ("1.85.0", false),
        ] {
            let env = env_with_version(version);
            let verdict = evaluate_range(&range, Polarity::DisabledOnMatch, &env).unwrap();
            assert_eq!(verdict.is_disabled(), inside, "version {}", version);
        }
    }

    #[test]
    fn test_range_single_bound() {
        let env = env_with_version("1.90.0");
        let range = VersionRange::at_least(ToolchainVersion::V1_85);
        let verdict = evaluate_range(&range, Polarity::EnabledOnMatch, &env).unwrap();
        assert!(verdict.is_enabled());

        let range = VersionRange::at_most(ToolchainVersion::V1_85);
        let verdict = evaluate_range(&range, Polarity::EnabledOnMatch, &env).unwrap();
        assert!(verdict.is_disabled());
    }

    #[test]
    fn test_range_other_current_never_matches() {
        let env = env_with_version("2.0.0");
        let range = VersionRange::between(ToolchainVersion::V1_70, ToolchainVersion::V1_90);
        let verdict = evaluate_range(&range, Polarity::DisabledOnMatch, &env).unwrap();
        assert!(verdict.is_enabled());
    }

    #[test]
    fn test_range_without_bounds_is_configuration_error() {
        let env = env_with_version("1.82.0");
        let range = VersionRange {
            min: None,
            max: None,
            custom_reason: None,
        };
        let err = evaluate_range(&range, Polarity::DisabledOnMatch, &env).unwrap_err();
        assert!(err.message().contains("at least one bound"));
    }

    #[test]
    fn test_inverted_range_is_configuration_error() {
        let env = env_with_version("1.82.0");
        let range = VersionRange::between(ToolchainVersion::V1_84, ToolchainVersion::V1_80);
        let err = evaluate_range(&range, Polarity::DisabledOnMatch, &env).unwrap_err();
        assert!(err.message().contains("inverted"));
    }

    #[test]
    fn test_other_bound_is_configuration_error() {
        let env = env_with_version("1.82.0");
        let range = VersionRange::at_least(ToolchainVersion::Other);
        assert!(evaluate_range(&range, Polarity::DisabledOnMatch, &env).is_err());
    }
}
