//! Gauntlet core domain model
//!
//! Shared abstractions consumed by the condition-evaluation and
//! argument-resolution crates:
//! - `TestElement` identity (opaque path-like ids, container/test kinds)
//! - `ExtensionContext`: the launcher-supplied view of one element, including
//!   the per-(extension, element) key-value store
//! - `ParameterDeclarations`: the ordered parameter list of a parameterized
//!   test case
//! - `ArgumentValue` / `ArgumentTuple`: the typed value model resolvers emit
//!   and the invocation loop consumes
//! - `PredicateStore` / `FactoryRegistry`: capability registries standing in
//!   for reflective method/field lookup
//! - `PreconditionError`: the distinguished configuration-error type
//!
//! All value types are serializable so verdicts, declarations, and tuples can
//! be reported externally.

pub mod context;
pub mod element;
pub mod error;
pub mod params;
pub mod registry;
pub mod value;

pub use context::{ExtensionContext, Lifecycle, Store};
pub use element::{ElementId, ElementKind, TestElement};
pub use error::{require, require_not_blank, PreconditionError};
pub use params::{EnumShape, ParamType, ParameterDeclaration, ParameterDeclarations};
pub use registry::{
    ConditionPredicate, FactoryCandidate, FactoryKind, FactoryRegistry, FactorySource,
    PredicateStore,
};
pub use value::{ArgumentTuple, ArgumentValue};

/// Gauntlet core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
