//! Factory-method and factory-field argument sources.
//!
//! A reference names a registered candidate: `name`, `Owner::path::name`,
//! optionally followed by a `(type, list)` qualifier to pick one overload.
//! Resolution must land on exactly one shape-valid candidate; anything else
//! is a configuration error naming every rejected candidate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use gauntlet_core::{
    require_not_blank, ArgumentTuple, ArgumentValue, ExtensionContext, FactoryCandidate,
    FactoryKind, FactorySource, Lifecycle, PreconditionError,
};

use crate::error::Result;
use crate::stream::ArgumentStream;

/// Factory-method source: one or more method references. An empty list
/// defaults to a method named after the context's test case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorySourceDecl {
    pub references: Vec<String>,
}

impl FactorySourceDecl {
    pub fn named(references: &[&str]) -> Self {
        FactorySourceDecl {
            references: references.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Resolve to the factory method named after the test case.
    pub fn default_to_case() -> Self {
        Self::default()
    }
}

/// Factory-field source: one or more field references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSourceDecl {
    pub references: Vec<String>,
}

impl FieldSourceDecl {
    pub fn named(references: &[&str]) -> Self {
        FieldSourceDecl {
            references: references.iter().map(|r| r.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberKind {
    Method,
    Field,
}

impl MemberKind {
    fn label(self) -> &'static str {
        match self {
            MemberKind::Method => "method",
            MemberKind::Field => "field",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct FactoryRef {
    owner: Option<String>,
    name: String,
    params: Option<Vec<String>>,
}

fn parse_reference(raw: &str) -> std::result::Result<FactoryRef, PreconditionError> {
    let raw = raw.trim();
    require_not_blank(raw, "reference")?;

    let (head, params) = match raw.find('(') {
        Some(open) => {
            if !raw.ends_with(')') {
                return Err(PreconditionError::new(format!(
                    "malformed factory reference [{}]: missing closing parenthesis",
                    raw
                )));
            }
            let inner = &raw[open + 1..raw.len() - 1];
            let params = if inner.trim().is_empty() {
                Vec::new()
            } else {
                inner.split(',').map(|p| p.trim().to_string()).collect()
            };
            (&raw[..open], Some(params))
        }
        None => (raw, None),
    };

    let (owner, name) = match head.rfind("::") {
        Some(idx) => (Some(head[..idx].to_string()), head[idx + 2..].to_string()),
        None => (None, head.to_string()),
    };
    require_not_blank(&name, "reference")?;
    Ok(FactoryRef {
        owner,
        name,
        params,
    })
}

/// Find exactly one shape-valid candidate for `raw`.
fn locate<'a>(
    ctx: &'a ExtensionContext,
    raw: &str,
    want: MemberKind,
) -> Result<&'a FactoryCandidate> {
    let fref = parse_reference(raw)?;
    let mut rejected: Vec<String> = Vec::new();
    let mut valid: Vec<&FactoryCandidate> = Vec::new();

    for candidate in ctx.factories.iter() {
        if candidate.name != fref.name {
            continue;
        }
        if let Some(owner) = &fref.owner {
            if candidate.owner.as_deref() != Some(owner.as_str()) {
                continue;
            }
        }

        match (&candidate.kind, want) {
            (FactoryKind::Method { params }, MemberKind::Method) => {
                if let Some(wanted) = &fref.params {
                    if params != wanted {
                        rejected.push(format!(
                            "{}: parameter types do not match ({})",
                            candidate.describe(),
                            wanted.join(", ")
                        ));
                        continue;
                    }
                }
            }
            (FactoryKind::Field { is_static }, MemberKind::Field) => {
                if fref.params.is_some() {
                    rejected.push(format!(
                        "{}: a field reference cannot declare parameter types",
                        candidate.describe()
                    ));
                    continue;
                }
                if !*is_static && ctx.lifecycle != Lifecycle::PerSuite {
                    rejected.push(format!(
                        "{}: must be static unless the suite lifecycle is per-suite",
                        candidate.describe()
                    ));
                    continue;
                }
            }
            _ => {
                rejected.push(format!(
                    "{}: not a {}",
                    candidate.describe(),
                    want.label()
                ));
                continue;
            }
        }

        match &candidate.source {
            FactorySource::Null => {
                rejected.push(format!("{}: its value is null", candidate.describe()));
            }
            FactorySource::Scalar(_) => {
                rejected.push(format!(
                    "{}: its value is not convertible to a sequence of arguments",
                    candidate.describe()
                ));
            }
            FactorySource::SingleUse(_) if want == MemberKind::Field => {
                rejected.push(format!(
                    "{}: holds a single-use sequence; wrap it in a supplier",
                    candidate.describe()
                ));
            }
            _ => valid.push(candidate),
        }
    }

    match valid.len() {
        1 => Ok(valid[0]),
        0 => {
            let detail = if rejected.is_empty() {
                "no candidates registered under that name".to_string()
            } else {
                format!("rejected candidates: [{}]", rejected.join("; "))
            };
            Err(PreconditionError::new(format!(
                "could not find a factory {} [{}] for {}; {}",
                want.label(),
                raw,
                ctx.element.display_name,
                detail
            ))
            .into())
        }
        n => {
            let names: Vec<String> = valid.iter().map(|c| c.describe()).collect();
            Err(PreconditionError::new(format!(
                "{} factory {} candidates match [{}]: [{}]",
                n,
                want.label(),
                raw,
                names.join("; ")
            ))
            .into())
        }
    }
}

/// Produce the items of one located candidate.
fn produce(candidate: &FactoryCandidate, raw: &str) -> Result<Vec<ArgumentValue>> {
    match &candidate.source {
        FactorySource::Items(items) => Ok(items.clone()),
        FactorySource::Supplier(supplier) => Ok(supplier()),
        FactorySource::SingleUse(cell) => {
            cell.lock().unwrap().take().ok_or_else(|| {
                PreconditionError::new(format!(
                    "single-use factory [{}] was already consumed",
                    raw
                ))
                .into()
            })
        }
        // locate() rejects null and scalar shapes before production.
        FactorySource::Null | FactorySource::Scalar(_) => unreachable!("shape-checked candidate"),
    }
}

/// Convert one produced item into a tuple: a one-dimensional array spreads
/// into physical arguments, an array of arrays passes through as one
/// argument, and a named value labels the tuple.
fn tuple_from_item(item: ArgumentValue) -> ArgumentTuple {
    let (label, value) = item.unwrap_named();
    let values = match value {
        ArgumentValue::Array(elems)
            if !elems.iter().any(|e| matches!(e, ArgumentValue::Array(_))) =>
        {
            elems
        }
        other => vec![other],
    };
    match label {
        Some(name) => ArgumentTuple::named(name, values),
        None => ArgumentTuple::of(values),
    }
}

pub(crate) fn resolve_methods(
    decl: &FactorySourceDecl,
    ctx: &ExtensionContext,
) -> Result<ArgumentStream> {
    let references = if decl.references.is_empty() {
        let case = ctx.test_case.clone().ok_or_else(|| {
            PreconditionError::new(format!(
                "no factory reference declared and {} has no test case name",
                ctx.element.display_name
            ))
        })?;
        vec![case]
    } else {
        decl.references.clone()
    };

    let mut tuples = Vec::new();
    for raw in &references {
        let candidate = locate(ctx, raw, MemberKind::Method)?;
        let items = produce(candidate, raw)?;
        debug!(reference = %raw, items = items.len(), "factory method produced arguments");
        tuples.extend(items.into_iter().map(tuple_from_item));
    }
    Ok(ArgumentStream::from_tuples(tuples))
}

pub(crate) fn resolve_fields(
    decl: &FieldSourceDecl,
    ctx: &ExtensionContext,
) -> Result<ArgumentStream> {
    let mut tuples = Vec::new();
    for raw in &decl.references {
        let candidate = locate(ctx, raw, MemberKind::Field)?;
        let items = produce(candidate, raw)?;
        debug!(reference = %raw, items = items.len(), "factory field produced arguments");
        tuples.extend(items.into_iter().map(tuple_from_item));
    }
    Ok(ArgumentStream::from_tuples(tuples))
}
