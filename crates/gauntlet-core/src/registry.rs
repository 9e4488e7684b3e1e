//! Capability registries: named condition predicates and argument factories.
//!
//! These stand in for reflective method/field lookup. The launcher registers
//! what a test suite declares; evaluators and resolvers look entries up by
//! name and never hold state of their own.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::value::ArgumentValue;

/// A no-arg boolean predicate backing an `EnabledIfPredicate` /
/// `DisabledIfPredicate` condition.
pub type ConditionPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Named condition predicates in two scopes.
///
/// The *local* scope belongs to the element's own suite, the analog of
/// resolving through the test class's loader rather than the evaluator's.
/// The *external* scope holds fully-qualified `module::Type::method`
/// references shared across suites.
#[derive(Clone, Default)]
pub struct PredicateStore {
    local: HashMap<String, ConditionPredicate>,
    external: HashMap<String, ConditionPredicate>,
}

impl PredicateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_local(
        &mut self,
        name: impl Into<String>,
        predicate: impl Fn() -> bool + Send + Sync + 'static,
    ) {
        self.local.insert(name.into(), Arc::new(predicate));
    }

    pub fn register_external(
        &mut self,
        qualified_name: impl Into<String>,
        predicate: impl Fn() -> bool + Send + Sync + 'static,
    ) {
        self.external.insert(qualified_name.into(), Arc::new(predicate));
    }

    pub fn local(&self, name: &str) -> Option<ConditionPredicate> {
        self.local.get(name).cloned()
    }

    pub fn external(&self, qualified_name: &str) -> Option<ConditionPredicate> {
        self.external.get(qualified_name).cloned()
    }
}

impl std::fmt::Debug for PredicateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateStore")
            .field("local", &self.local.keys().collect::<Vec<_>>())
            .field("external", &self.external.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// What kind of member a factory candidate models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryKind {
    /// A factory method; `params` lists declared parameter type names for
    /// overload disambiguation.
    Method { params: Vec<String> },
    /// A factory field.
    Field { is_static: bool },
}

/// The sequence shape a factory yields when invoked or read.
#[derive(Clone)]
pub enum FactorySource {
    /// A materialized sequence (collection or array value).
    Items(Vec<ArgumentValue>),
    /// Produces a fresh sequence on every call (iterator-producing supplier).
    Supplier(Arc<dyn Fn() -> Vec<ArgumentValue> + Send + Sync>),
    /// A sequence that can be consumed at most once (stream/iterator).
    SingleUse(Arc<Mutex<Option<Vec<ArgumentValue>>>>),
    /// A null field value.
    Null,
    /// A value that is not convertible to a sequence.
    Scalar(ArgumentValue),
}

impl FactorySource {
    pub fn single_use(items: Vec<ArgumentValue>) -> Self {
        FactorySource::SingleUse(Arc::new(Mutex::new(Some(items))))
    }

    /// Short shape name used in rejected-candidate diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            FactorySource::Items(_) => "sequence",
            FactorySource::Supplier(_) => "supplier",
            FactorySource::SingleUse(_) => "single-use sequence",
            FactorySource::Null => "null",
            FactorySource::Scalar(_) => "scalar",
        }
    }
}

impl std::fmt::Debug for FactorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FactorySource::{}", self.shape_name())
    }
}

/// One registered factory method or field.
#[derive(Debug, Clone)]
pub struct FactoryCandidate {
    pub name: String,
    /// Qualifying type path, when the factory lives outside the test suite.
    pub owner: Option<String>,
    pub kind: FactoryKind,
    pub source: FactorySource,
}

impl FactoryCandidate {
    pub fn method(name: impl Into<String>, source: FactorySource) -> Self {
        FactoryCandidate {
            name: name.into(),
            owner: None,
            kind: FactoryKind::Method { params: Vec::new() },
            source,
        }
    }

    pub fn method_with_params(
        name: impl Into<String>,
        params: &[&str],
        source: FactorySource,
    ) -> Self {
        FactoryCandidate {
            name: name.into(),
            owner: None,
            kind: FactoryKind::Method {
                params: params.iter().map(|p| p.to_string()).collect(),
            },
            source,
        }
    }

    pub fn field(name: impl Into<String>, is_static: bool, source: FactorySource) -> Self {
        FactoryCandidate {
            name: name.into(),
            owner: None,
            kind: FactoryKind::Field { is_static },
            source,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Candidate description used in resolution diagnostics.
    pub fn describe(&self) -> String {
        let member = match &self.kind {
            FactoryKind::Method { params } if params.is_empty() => format!("method {}()", self.name),
            FactoryKind::Method { params } => format!("method {}({})", self.name, params.join(", ")),
            FactoryKind::Field { is_static: true } => format!("static field {}", self.name),
            FactoryKind::Field { is_static: false } => format!("field {}", self.name),
        };
        match &self.owner {
            Some(owner) => format!("{} in {}", member, owner),
            None => member,
        }
    }
}

/// Ordered registry of factory candidates for one context.
#[derive(Debug, Clone, Default)]
pub struct FactoryRegistry {
    candidates: Vec<FactoryCandidate>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, candidate: FactoryCandidate) {
        self.candidates.push(candidate);
    }

    pub fn with(mut self, candidate: FactoryCandidate) -> Self {
        self.register(candidate);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &FactoryCandidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
