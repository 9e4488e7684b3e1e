//! Conditional test enablement
//!
//! Declarative conditions gate whether a test element executes:
//! - `facts`: ambient environment classification (toolchain version buckets,
//!   OS family, architecture) and env-var/property lookup, behind the
//!   substitutable `Environment` capability
//! - `decl`: the condition declarations an element carries, including
//!   composed (meta) declarations
//! - per-family evaluators (`toolchain`, `os`, `variables`, `predicate`,
//!   `net`) producing enabled/disabled verdicts with literal-fact reasons
//! - `aggregate`: first-disabled-wins combination across everything declared
//!   on one element
//!
//! Configuration mistakes never become verdicts; they surface as
//! `PreconditionError` to the caller.

pub mod aggregate;
pub mod decl;
pub mod facts;
pub mod fakes;
pub mod net;
mod os;
mod predicate;
mod toolchain;
mod variables;
pub mod verdict;

pub use aggregate::evaluate_conditions;
pub use decl::{
    ConditionDecl, ConditionSet, OsSelection, PatternCondition, PortCondition,
    PredicateReference, VersionRange, VersionSelection,
};
pub use facts::{
    architecture_matches, current_architecture, Environment, OsFamily, SystemEnvironment,
    ToolchainVersion, PROP_OS_ARCH, PROP_OS_FAMILY, PROP_TOOLCHAIN_VERSION,
};
pub use fakes::FakeEnvironment;
pub use net::loopback_port_bindable;
pub use verdict::{ConditionVerdict, Polarity};

/// Gauntlet conditions version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
