//! Enum-constant argument source.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use gauntlet_core::{
    require, ArgumentTuple, ArgumentValue, EnumShape, ParamType, ParameterDeclarations,
    PreconditionError,
};

use crate::error::Result;
use crate::stream::ArgumentStream;

/// How the `names` attribute selects constants from the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumSelectionMode {
    /// Keep exactly the named constants (all of them when none are named).
    Include,
    /// Drop the named constants.
    Exclude,
    /// Keep constants matching every pattern.
    MatchAll,
    /// Keep constants matching at least one pattern.
    MatchAny,
    /// Keep constants matching no pattern.
    MatchNone,
}

impl Default for EnumSelectionMode {
    fn default() -> Self {
        EnumSelectionMode::Include
    }
}

/// Enum source declaration. The target shape comes from the declaration
/// itself or, when unset, from the first declared parameter's type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumSourceDecl {
    pub shape: Option<EnumShape>,
    pub names: Vec<String>,
    pub mode: Option<EnumSelectionMode>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl EnumSourceDecl {
    /// Infer the enum type from the first parameter.
    pub fn from_parameter() -> Self {
        Self::default()
    }

    pub fn of_type(shape: EnumShape) -> Self {
        EnumSourceDecl {
            shape: Some(shape),
            ..Self::default()
        }
    }

    pub fn with_names(mut self, names: &[&str]) -> Self {
        self.names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_mode(mut self, mode: EnumSelectionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_range(mut self, from: &str, to: &str) -> Self {
        self.from = Some(from.to_string());
        self.to = Some(to.to_string());
        self
    }
}

fn target_shape(decl: &EnumSourceDecl, params: &ParameterDeclarations) -> Result<EnumShape> {
    if let Some(shape) = &decl.shape {
        return Ok(shape.clone());
    }
    match params.first() {
        Some(param) => match &param.ty {
            ParamType::Enum(shape) => Ok(shape.clone()),
            other => Err(PreconditionError::new(format!(
                "the first parameter of {} is {}, not an enum; declare the enum type explicitly",
                params.source_description(),
                other.describe()
            ))
            .into()),
        },
        None => Err(PreconditionError::new(format!(
            "cannot determine the enum type: {} declares no parameters",
            params.source_description()
        ))
        .into()),
    }
}

fn anchored(pattern: &str) -> Result<Regex> {
    Regex::new(&format!(r"\A(?:{})\z", pattern)).map_err(|e| {
        PreconditionError::new(format!("invalid regular expression [{}]: {}", pattern, e)).into()
    })
}

pub(crate) fn resolve_enum(
    decl: &EnumSourceDecl,
    params: &ParameterDeclarations,
) -> Result<ArgumentStream> {
    let shape = target_shape(decl, params)?;

    if shape.constants.is_empty() {
        require(
            decl.from.is_none() && decl.to.is_none(),
            format!(
                "range bounds declared on enum {} which has no constants",
                shape.type_name
            ),
        )?;
    }

    let bound_index = |bound: &Option<String>, default: usize| -> Result<usize> {
        match bound {
            Some(name) => shape.index_of(name).ok_or_else(|| {
                PreconditionError::new(format!(
                    "[{}] is not a constant of enum {}",
                    name, shape.type_name
                ))
                .into()
            }),
            None => Ok(default),
        }
    };
    let start = bound_index(&decl.from, 0)?;
    let end = bound_index(&decl.to, shape.constants.len().saturating_sub(1))?;
    require(
        shape.constants.is_empty() || start <= end,
        format!(
            "invalid enum range: from [{}] comes after to [{}] in {}",
            shape.constants.get(start).cloned().unwrap_or_default(),
            shape.constants.get(end).cloned().unwrap_or_default(),
            shape.type_name
        ),
    )?;

    let mut working: Vec<String> = if shape.constants.is_empty() {
        Vec::new()
    } else {
        shape.constants[start..=end].to_vec()
    };

    let mut seen = HashSet::new();
    for name in &decl.names {
        require(
            seen.insert(name.as_str()),
            format!("duplicate enum constant name: [{}]", name),
        )?;
    }

    let mode = decl.mode.unwrap_or_default();
    match mode {
        EnumSelectionMode::Include | EnumSelectionMode::Exclude => {
            for name in &decl.names {
                require(
                    shape.index_of(name).is_some(),
                    format!("[{}] is not a constant of enum {}", name, shape.type_name),
                )?;
            }
            if mode == EnumSelectionMode::Include {
                if !decl.names.is_empty() {
                    working.retain(|c| decl.names.iter().any(|n| n == c));
                }
            } else {
                working.retain(|c| !decl.names.iter().any(|n| n == c));
            }
        }
        EnumSelectionMode::MatchAll | EnumSelectionMode::MatchAny | EnumSelectionMode::MatchNone => {
            let patterns = decl
                .names
                .iter()
                .map(|p| anchored(p))
                .collect::<Result<Vec<_>>>()?;
            working.retain(|c| match mode {
                EnumSelectionMode::MatchAll => patterns.iter().all(|p| p.is_match(c)),
                EnumSelectionMode::MatchAny => patterns.iter().any(|p| p.is_match(c)),
                EnumSelectionMode::MatchNone => !patterns.iter().any(|p| p.is_match(c)),
                _ => true,
            });
        }
    }

    let tuples = working
        .into_iter()
        .map(|constant| {
            ArgumentTuple::single(ArgumentValue::EnumConstant {
                type_name: shape.type_name.clone(),
                constant,
            })
        })
        .collect();
    Ok(ArgumentStream::from_tuples(tuples))
}
