//! Literal-value argument source.

use serde::{Deserialize, Serialize};

use gauntlet_core::{require, ArgumentTuple, ArgumentValue};

use crate::error::Result;
use crate::stream::ArgumentStream;

/// Typed literal arrays. Exactly one array must be non-empty; each literal
/// becomes a single-argument tuple, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueSourceDecl {
    pub i8s: Vec<i8>,
    pub i16s: Vec<i16>,
    pub i32s: Vec<i32>,
    pub i64s: Vec<i64>,
    pub f32s: Vec<f32>,
    pub f64s: Vec<f64>,
    pub chars: Vec<char>,
    pub bools: Vec<bool>,
    pub strings: Vec<String>,
    pub type_refs: Vec<String>,
}

impl ValueSourceDecl {
    pub fn i8s(values: &[i8]) -> Self {
        ValueSourceDecl {
            i8s: values.to_vec(),
            ..Default::default()
        }
    }

    pub fn i16s(values: &[i16]) -> Self {
        ValueSourceDecl {
            i16s: values.to_vec(),
            ..Default::default()
        }
    }

    pub fn i32s(values: &[i32]) -> Self {
        ValueSourceDecl {
            i32s: values.to_vec(),
            ..Default::default()
        }
    }

    pub fn i64s(values: &[i64]) -> Self {
        ValueSourceDecl {
            i64s: values.to_vec(),
            ..Default::default()
        }
    }

    pub fn f32s(values: &[f32]) -> Self {
        ValueSourceDecl {
            f32s: values.to_vec(),
            ..Default::default()
        }
    }

    pub fn f64s(values: &[f64]) -> Self {
        ValueSourceDecl {
            f64s: values.to_vec(),
            ..Default::default()
        }
    }

    pub fn chars(values: &[char]) -> Self {
        ValueSourceDecl {
            chars: values.to_vec(),
            ..Default::default()
        }
    }

    pub fn bools(values: &[bool]) -> Self {
        ValueSourceDecl {
            bools: values.to_vec(),
            ..Default::default()
        }
    }

    pub fn strings(values: &[&str]) -> Self {
        ValueSourceDecl {
            strings: values.iter().map(|v| v.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn type_refs(values: &[&str]) -> Self {
        ValueSourceDecl {
            type_refs: values.iter().map(|v| v.to_string()).collect(),
            ..Default::default()
        }
    }
}

pub(crate) fn resolve_values(decl: &ValueSourceDecl) -> Result<ArgumentStream> {
    let mut sets: Vec<Vec<ArgumentValue>> = Vec::new();
    if !decl.i8s.is_empty() {
        sets.push(decl.i8s.iter().map(|v| ArgumentValue::I8(*v)).collect());
    }
    if !decl.i16s.is_empty() {
        sets.push(decl.i16s.iter().map(|v| ArgumentValue::I16(*v)).collect());
    }
    if !decl.i32s.is_empty() {
        sets.push(decl.i32s.iter().map(|v| ArgumentValue::I32(*v)).collect());
    }
    if !decl.i64s.is_empty() {
        sets.push(decl.i64s.iter().map(|v| ArgumentValue::I64(*v)).collect());
    }
    if !decl.f32s.is_empty() {
        sets.push(decl.f32s.iter().map(|v| ArgumentValue::F32(*v)).collect());
    }
    if !decl.f64s.is_empty() {
        sets.push(decl.f64s.iter().map(|v| ArgumentValue::F64(*v)).collect());
    }
    if !decl.chars.is_empty() {
        sets.push(decl.chars.iter().map(|v| ArgumentValue::Char(*v)).collect());
    }
    if !decl.bools.is_empty() {
        sets.push(decl.bools.iter().map(|v| ArgumentValue::Bool(*v)).collect());
    }
    if !decl.strings.is_empty() {
        sets.push(
            decl.strings
                .iter()
                .map(|v| ArgumentValue::Str(v.clone()))
                .collect(),
        );
    }
    if !decl.type_refs.is_empty() {
        sets.push(
            decl.type_refs
                .iter()
                .map(|v| ArgumentValue::TypeRef(v.clone()))
                .collect(),
        );
    }

    require(
        sets.len() == 1,
        format!(
            "exactly one type of literal values must be declared, but there were {}",
            sets.len()
        ),
    )?;

    let values = sets.pop().unwrap_or_default();
    Ok(ArgumentStream::from_tuples(
        values.into_iter().map(ArgumentTuple::single).collect(),
    ))
}
