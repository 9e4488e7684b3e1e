//! Declarative condition configuration attached to test elements.
//!
//! Each struct mirrors one condition declaration's attribute set. A
//! [`ConditionSet`] is the declaration-ordered list attached to one element;
//! composed (meta) declarations flatten recursively before evaluation.

use serde::{Deserialize, Serialize};

use crate::facts::{OsFamily, ToolchainVersion};

/// Exact-set selection of toolchain version buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSelection {
    pub versions: Vec<ToolchainVersion>,
    pub custom_reason: Option<String>,
}

impl VersionSelection {
    pub fn of(versions: &[ToolchainVersion]) -> Self {
        VersionSelection {
            versions: versions.to_vec(),
            custom_reason: None,
        }
    }

    pub fn with_custom_reason(mut self, reason: impl Into<String>) -> Self {
        self.custom_reason = Some(reason.into());
        self
    }
}

/// Inclusive toolchain version range. At least one bound must be set;
/// `Other` is not a valid bound; an inverted range (`min > max`) is a
/// configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    pub min: Option<ToolchainVersion>,
    pub max: Option<ToolchainVersion>,
    pub custom_reason: Option<String>,
}

impl VersionRange {
    pub fn at_least(min: ToolchainVersion) -> Self {
        VersionRange {
            min: Some(min),
            max: None,
            custom_reason: None,
        }
    }

    pub fn at_most(max: ToolchainVersion) -> Self {
        VersionRange {
            min: None,
            max: Some(max),
            custom_reason: None,
        }
    }

    pub fn between(min: ToolchainVersion, max: ToolchainVersion) -> Self {
        VersionRange {
            min: Some(min),
            max: Some(max),
            custom_reason: None,
        }
    }

    pub fn with_custom_reason(mut self, reason: impl Into<String>) -> Self {
        self.custom_reason = Some(reason.into());
        self
    }
}

/// OS family and/or architecture selection. At least one of the two must be
/// declared; when both are, both must hold for a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsSelection {
    pub families: Vec<OsFamily>,
    /// Substring-matched, case-insensitive, against the raw architecture.
    pub architectures: Vec<String>,
    pub custom_reason: Option<String>,
}

impl OsSelection {
    pub fn families(families: &[OsFamily]) -> Self {
        OsSelection {
            families: families.to_vec(),
            architectures: Vec::new(),
            custom_reason: None,
        }
    }

    pub fn architectures(architectures: &[&str]) -> Self {
        OsSelection {
            families: Vec::new(),
            architectures: architectures.iter().map(|a| a.to_string()).collect(),
            custom_reason: None,
        }
    }

    pub fn with_architectures(mut self, architectures: &[&str]) -> Self {
        self.architectures = architectures.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_custom_reason(mut self, reason: impl Into<String>) -> Self {
        self.custom_reason = Some(reason.into());
        self
    }
}

/// Full-string pattern condition over one env var or property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCondition {
    /// Name of the variable/property to look up. Must not be blank.
    pub named: String,
    /// Full-string regular expression the value must match. Must not be blank.
    pub matches: String,
    /// Restrict applicability to these OS families; empty applies everywhere.
    pub on_os: Vec<OsFamily>,
    pub custom_reason: Option<String>,
}

impl PatternCondition {
    pub fn new(named: impl Into<String>, matches: impl Into<String>) -> Self {
        PatternCondition {
            named: named.into(),
            matches: matches.into(),
            on_os: Vec::new(),
            custom_reason: None,
        }
    }

    pub fn on_os(mut self, families: &[OsFamily]) -> Self {
        self.on_os = families.to_vec();
        self
    }

    pub fn with_custom_reason(mut self, reason: impl Into<String>) -> Self {
        self.custom_reason = Some(reason.into());
        self
    }
}

/// Reference to a registered no-arg boolean predicate.
///
/// A simple name resolves in the element's local scope first, then the
/// external scope; a `::`-qualified name resolves in the external scope only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateReference {
    pub reference: String,
    pub custom_reason: Option<String>,
}

impl PredicateReference {
    pub fn new(reference: impl Into<String>) -> Self {
        PredicateReference {
            reference: reference.into(),
            custom_reason: None,
        }
    }

    pub fn with_custom_reason(mut self, reason: impl Into<String>) -> Self {
        self.custom_reason = Some(reason.into());
        self
    }
}

/// Loopback port availability condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortCondition {
    pub port: u16,
    pub custom_reason: Option<String>,
}

impl PortCondition {
    pub fn new(port: u16) -> Self {
        PortCondition {
            port,
            custom_reason: None,
        }
    }
}

/// One declared condition. The `Enabled*`/`Disabled*` pairs differ only in
/// polarity: whether a matching fact keeps the element running or stops it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum ConditionDecl {
    EnabledOnToolchain(VersionSelection),
    DisabledOnToolchain(VersionSelection),
    EnabledForToolchainRange(VersionRange),
    DisabledForToolchainRange(VersionRange),
    EnabledOnOs(OsSelection),
    DisabledOnOs(OsSelection),
    EnabledIfEnvironmentVariable(PatternCondition),
    DisabledIfEnvironmentVariable(PatternCondition),
    EnabledIfProperty(PatternCondition),
    DisabledIfProperty(PatternCondition),
    EnabledIfPredicate(PredicateReference),
    DisabledIfPredicate(PredicateReference),
    DisabledIfPortAvailable(PortCondition),
    /// A composed (meta) condition: a named bundle of other conditions,
    /// flattened recursively before evaluation.
    Composed {
        name: String,
        conditions: Vec<ConditionDecl>,
    },
}

impl ConditionDecl {
    /// Family name used in verdict and summary texts.
    pub fn family(&self) -> &'static str {
        match self {
            ConditionDecl::EnabledOnToolchain(_) => "EnabledOnToolchain",
            ConditionDecl::DisabledOnToolchain(_) => "DisabledOnToolchain",
            ConditionDecl::EnabledForToolchainRange(_) => "EnabledForToolchainRange",
            ConditionDecl::DisabledForToolchainRange(_) => "DisabledForToolchainRange",
            ConditionDecl::EnabledOnOs(_) => "EnabledOnOs",
            ConditionDecl::DisabledOnOs(_) => "DisabledOnOs",
            ConditionDecl::EnabledIfEnvironmentVariable(_) => "EnabledIfEnvironmentVariable",
            ConditionDecl::DisabledIfEnvironmentVariable(_) => "DisabledIfEnvironmentVariable",
            ConditionDecl::EnabledIfProperty(_) => "EnabledIfProperty",
            ConditionDecl::DisabledIfProperty(_) => "DisabledIfProperty",
            ConditionDecl::EnabledIfPredicate(_) => "EnabledIfPredicate",
            ConditionDecl::DisabledIfPredicate(_) => "DisabledIfPredicate",
            ConditionDecl::DisabledIfPortAvailable(_) => "DisabledIfPortAvailable",
            ConditionDecl::Composed { .. } => "Composed",
        }
    }
}

/// The declaration-ordered conditions attached to one element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionSet {
    conditions: Vec<ConditionDecl>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(conditions: Vec<ConditionDecl>) -> Self {
        ConditionSet { conditions }
    }

    pub fn with(mut self, condition: ConditionDecl) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Expand composed declarations recursively into base conditions,
    /// preserving declaration order.
    pub fn flatten(&self) -> Vec<&ConditionDecl> {
        fn walk<'a>(decls: &'a [ConditionDecl], out: &mut Vec<&'a ConditionDecl>) {
            for decl in decls {
                match decl {
                    ConditionDecl::Composed { conditions, .. } => walk(conditions, out),
                    leaf => out.push(leaf),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.conditions, &mut out);
        out
    }
}
