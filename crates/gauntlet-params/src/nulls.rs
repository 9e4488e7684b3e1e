//! Null, empty, and blank argument sources.

use gauntlet_core::{
    ArgumentTuple, ArgumentValue, ParamType, ParameterDeclarations, PreconditionError,
};

use crate::error::Result;
use crate::stream::ArgumentStream;

/// The type-appropriate empty instance for a parameter, from the closed set
/// of supported types.
fn empty_value_for(ty: &ParamType) -> std::result::Result<ArgumentValue, PreconditionError> {
    match ty {
        ParamType::Str => Ok(ArgumentValue::Str(String::new())),
        ParamType::List(_) | ParamType::Set(_) | ParamType::Array(_) => {
            Ok(ArgumentValue::Array(Vec::new()))
        }
        ParamType::Map(_, _) => Ok(ArgumentValue::Map(Vec::new())),
        other => Err(PreconditionError::new(format!(
            "no empty instance exists for parameter type [{}]; supported types are string, list, set, map, and array",
            other.describe()
        ))),
    }
}

pub(crate) fn resolve_null(params: &ParameterDeclarations) -> Result<ArgumentStream> {
    if params.is_empty() {
        return Err(PreconditionError::new(format!(
            "a null source needs at least one declared parameter on {}",
            params.source_description()
        ))
        .into());
    }
    Ok(ArgumentStream::from_tuples(vec![ArgumentTuple::single(
        ArgumentValue::Null,
    )]))
}

pub(crate) fn resolve_empty(params: &ParameterDeclarations) -> Result<ArgumentStream> {
    let first = params.first().ok_or_else(|| {
        PreconditionError::new(format!(
            "an empty source needs at least one declared parameter on {}",
            params.source_description()
        ))
    })?;
    let empty = empty_value_for(&first.ty)?;
    Ok(ArgumentStream::from_tuples(vec![ArgumentTuple::single(
        empty,
    )]))
}

/// Null, then empty, then each declared blank-string variant.
pub(crate) fn resolve_null_and_empty(
    params: &ParameterDeclarations,
    blanks: &[String],
) -> Result<ArgumentStream> {
    let mut tuples = resolve_null(params)?.collect_tuples()?;
    tuples.extend(resolve_empty(params)?.collect_tuples()?);
    tuples.extend(
        blanks
            .iter()
            .map(|b| ArgumentTuple::single(ArgumentValue::Str(b.clone()))),
    );
    Ok(ArgumentStream::from_tuples(tuples))
}
