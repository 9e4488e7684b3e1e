//! Argument-source dispatch.

use serde::{Deserialize, Serialize};
use tracing::debug;

use gauntlet_core::{ExtensionContext, ParameterDeclarations};

use crate::booleans::{self, BooleanMatrixDecl};
use crate::csv::source::{self, CsvFileSourceDecl, CsvSourceDecl};
use crate::enums::{self, EnumSourceDecl};
use crate::error::Result;
use crate::factory::{self, FactorySourceDecl, FieldSourceDecl};
use crate::nulls;
use crate::stream::ArgumentStream;
use crate::values::{self, ValueSourceDecl};

/// One declared argument source of a parameterized test element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ArgumentSourceDecl {
    Values(ValueSourceDecl),
    Enum(EnumSourceDecl),
    Csv(CsvSourceDecl),
    CsvFiles(CsvFileSourceDecl),
    FactoryMethods(FactorySourceDecl),
    FactoryFields(FieldSourceDecl),
    BooleanMatrix(BooleanMatrixDecl),
    Null,
    Empty,
    NullAndEmpty { blanks: Vec<String> },
}

impl ArgumentSourceDecl {
    /// Short source name used in logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ArgumentSourceDecl::Values(_) => "values",
            ArgumentSourceDecl::Enum(_) => "enum",
            ArgumentSourceDecl::Csv(_) => "csv",
            ArgumentSourceDecl::CsvFiles(_) => "csv_files",
            ArgumentSourceDecl::FactoryMethods(_) => "factory_methods",
            ArgumentSourceDecl::FactoryFields(_) => "factory_fields",
            ArgumentSourceDecl::BooleanMatrix(_) => "boolean_matrix",
            ArgumentSourceDecl::Null => "null",
            ArgumentSourceDecl::Empty => "empty",
            ArgumentSourceDecl::NullAndEmpty { .. } => "null_and_empty",
        }
    }
}

/// Resolve one declared source into a fresh, single-pass tuple stream.
///
/// Configuration is validated eagerly; row-level CSV parse failures surface
/// lazily, at the offending position of the stream.
pub fn resolve(
    decl: &ArgumentSourceDecl,
    params: &ParameterDeclarations,
    ctx: &ExtensionContext,
) -> Result<ArgumentStream> {
    debug!(
        element = %ctx.element.id,
        source = decl.kind(),
        "resolving argument source"
    );
    match decl {
        ArgumentSourceDecl::Values(decl) => values::resolve_values(decl),
        ArgumentSourceDecl::Enum(decl) => enums::resolve_enum(decl, params),
        ArgumentSourceDecl::Csv(decl) => source::resolve_inline(decl),
        ArgumentSourceDecl::CsvFiles(decl) => source::resolve_files(decl, ctx),
        ArgumentSourceDecl::FactoryMethods(decl) => factory::resolve_methods(decl, ctx),
        ArgumentSourceDecl::FactoryFields(decl) => factory::resolve_fields(decl, ctx),
        ArgumentSourceDecl::BooleanMatrix(decl) => booleans::resolve_booleans(decl),
        ArgumentSourceDecl::Null => nulls::resolve_null(params),
        ArgumentSourceDecl::Empty => nulls::resolve_empty(params),
        ArgumentSourceDecl::NullAndEmpty { blanks } => {
            nulls::resolve_null_and_empty(params, blanks)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauntlet_core::{ArgumentValue, ParamType, TestElement};

    #[test]
    fn test_dispatch_reaches_each_resolver() {
        let ctx = ExtensionContext::new(TestElement::test("e/t", "dispatch"));
        let params = ParameterDeclarations::new("case input(str)").with(ParamType::Str);

        let stream = resolve(
            &ArgumentSourceDecl::Values(ValueSourceDecl::strings(&["a"])),
            &params,
            &ctx,
        )
        .unwrap();
        assert_eq!(stream.collect_tuples().unwrap().len(), 1);

        let stream = resolve(&ArgumentSourceDecl::Null, &params, &ctx).unwrap();
        assert_eq!(
            stream.collect_tuples().unwrap()[0].values,
            vec![ArgumentValue::Null]
        );

        let stream = resolve(
            &ArgumentSourceDecl::BooleanMatrix(BooleanMatrixDecl::new(1)),
            &params,
            &ctx,
        )
        .unwrap();
        assert_eq!(stream.collect_tuples().unwrap().len(), 2);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ArgumentSourceDecl::Empty.kind(), "empty");
        assert_eq!(
            ArgumentSourceDecl::Csv(CsvSourceDecl::rows(&["a"])).kind(),
            "csv"
        );
    }
}
