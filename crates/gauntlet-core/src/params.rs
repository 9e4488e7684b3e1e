//! Parameter declarations supplied by the discovery/invocation layer.

use serde::{Deserialize, Serialize};

/// Declarative descriptor of an enum type: its name and constants in
/// declaration (natural) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumShape {
    pub type_name: String,
    pub constants: Vec<String>,
}

impl EnumShape {
    pub fn new(type_name: impl Into<String>, constants: &[&str]) -> Self {
        EnumShape {
            type_name: type_name.into(),
            constants: constants.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Position of `name` in natural order, if it is a constant of this enum.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.constants.iter().position(|c| c == name)
    }
}

/// Declared type of one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
    Str,
    TypeRef,
    Enum(EnumShape),
    List(Box<ParamType>),
    Set(Box<ParamType>),
    Map(Box<ParamType>, Box<ParamType>),
    Array(Box<ParamType>),
    Other(String),
}

impl ParamType {
    /// Short name used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            ParamType::Bool => "bool".to_string(),
            ParamType::I8 => "i8".to_string(),
            ParamType::I16 => "i16".to_string(),
            ParamType::I32 => "i32".to_string(),
            ParamType::I64 => "i64".to_string(),
            ParamType::F32 => "f32".to_string(),
            ParamType::F64 => "f64".to_string(),
            ParamType::Char => "char".to_string(),
            ParamType::Str => "string".to_string(),
            ParamType::TypeRef => "type reference".to_string(),
            ParamType::Enum(shape) => format!("enum {}", shape.type_name),
            ParamType::List(inner) => format!("list of {}", inner.describe()),
            ParamType::Set(inner) => format!("set of {}", inner.describe()),
            ParamType::Map(k, v) => format!("map of {} to {}", k.describe(), v.describe()),
            ParamType::Array(inner) => format!("array of {}", inner.describe()),
            ParamType::Other(name) => name.clone(),
        }
    }
}

/// One declared parameter of a parameterized test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub index: usize,
    pub name: Option<String>,
    pub ty: ParamType,
}

/// The ordered parameter list of one test element, plus a human-readable
/// description of the owning element for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDeclarations {
    params: Vec<ParameterDeclaration>,
    source_description: String,
}

impl ParameterDeclarations {
    pub fn new(source_description: impl Into<String>) -> Self {
        ParameterDeclarations {
            params: Vec::new(),
            source_description: source_description.into(),
        }
    }

    pub fn with(mut self, ty: ParamType) -> Self {
        let index = self.params.len();
        self.params.push(ParameterDeclaration {
            index,
            name: None,
            ty,
        });
        self
    }

    pub fn with_named(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        let index = self.params.len();
        self.params.push(ParameterDeclaration {
            index,
            name: Some(name.into()),
            ty,
        });
        self
    }

    /// The first declared parameter, if any.
    pub fn first(&self) -> Option<&ParameterDeclaration> {
        self.params.first()
    }

    pub fn get(&self, index: usize) -> Option<&ParameterDeclaration> {
        self.params.get(index)
    }

    pub fn count(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn source_description(&self) -> &str {
        &self.source_description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_assigned_in_order() {
        let params = ParameterDeclarations::new("case words(str, i32)")
            .with(ParamType::Str)
            .with_named("count", ParamType::I32);
        assert_eq!(params.count(), 2);
        assert_eq!(params.first().unwrap().index, 0);
        assert_eq!(params.get(1).unwrap().name.as_deref(), Some("count"));
    }

    #[test]
    fn test_enum_shape_index_of() {
        let shape = EnumShape::new("Season", &["SPRING", "SUMMER", "FALL", "WINTER"]);
        assert_eq!(shape.index_of("FALL"), Some(2));
        assert_eq!(shape.index_of("MONSOON"), None);
    }

    #[test]
    fn test_param_type_describe() {
        let ty = ParamType::Map(Box::new(ParamType::Str), Box::new(ParamType::I64));
        assert_eq!(ty.describe(), "map of string to i64");
    }
}
