//! CSV argument sources: inline rows, text blocks, and files.
//!
//! Field semantics after tokenizing:
//! - an unquoted empty field is always null, regardless of the null-value set
//! - a quoted empty field becomes the configured empty value, never null
//! - any other field, trimmed first when unquoted and trimming is on, becomes
//!   null when it matches the null-value set
//!
//! With headers enabled, the first record is consumed as trimmed header
//! names and each data tuple is named `"<header> = <value>"` per column.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use gauntlet_core::{require, ArgumentTuple, ArgumentValue, ExtensionContext, PreconditionError};

use crate::csv::format::{Charset, CsvFormat, CsvFormatDecl};
use crate::csv::parser::{self, RawField};
use crate::error::{CsvTokenError, ResolveError, Result};
use crate::stream::ArgumentStream;

/// Comment prefix for text blocks. File sources configure their own.
const BLOCK_COMMENT_PREFIX: char = '#';

/// Inline CSV declaration: either literal row strings or one multi-line
/// text block (exactly one of the two).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvSourceDecl {
    pub values: Vec<String>,
    pub text_block: String,
    pub format: CsvFormatDecl,
}

impl CsvSourceDecl {
    pub fn rows(values: &[&str]) -> Self {
        CsvSourceDecl {
            values: values.iter().map(|v| v.to_string()).collect(),
            text_block: String::new(),
            format: CsvFormatDecl::default(),
        }
    }

    pub fn text_block(block: impl Into<String>) -> Self {
        CsvSourceDecl {
            values: Vec::new(),
            text_block: block.into(),
            format: CsvFormatDecl::default(),
        }
    }

    pub fn with_format(mut self, format: CsvFormatDecl) -> Self {
        self.format = format;
        self
    }

    /// The declaration's string form, embedded in parse-error messages.
    pub fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

/// File-backed CSV declaration. `paths` resolve against the filesystem,
/// `resources` against the context's resource root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvFileSourceDecl {
    pub paths: Vec<PathBuf>,
    pub resources: Vec<String>,
    pub charset: String,
    pub line_separator: String,
    pub comment_prefix: char,
    pub num_lines_to_skip: usize,
    pub format: CsvFormatDecl,
}

impl CsvFileSourceDecl {
    pub fn paths(paths: &[&str]) -> Self {
        CsvFileSourceDecl {
            paths: paths.iter().map(PathBuf::from).collect(),
            ..Self::empty()
        }
    }

    pub fn resources(resources: &[&str]) -> Self {
        CsvFileSourceDecl {
            resources: resources.iter().map(|r| r.to_string()).collect(),
            ..Self::empty()
        }
    }

    fn empty() -> Self {
        CsvFileSourceDecl {
            paths: Vec::new(),
            resources: Vec::new(),
            charset: "UTF-8".to_string(),
            line_separator: "\n".to_string(),
            comment_prefix: '#',
            num_lines_to_skip: 0,
            format: CsvFormatDecl::default(),
        }
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    pub fn with_line_separator(mut self, separator: impl Into<String>) -> Self {
        self.line_separator = separator.into();
        self
    }

    pub fn skip_lines(mut self, lines: usize) -> Self {
        self.num_lines_to_skip = lines;
        self
    }

    pub fn with_format(mut self, format: CsvFormatDecl) -> Self {
        self.format = format;
        self
    }

    pub fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

/// Resolve an inline declaration into a tuple stream.
pub(crate) fn resolve_inline(decl: &CsvSourceDecl) -> Result<ArgumentStream> {
    let declaration = decl.describe();
    let has_values = !decl.values.is_empty();
    let has_block = !decl.text_block.is_empty();
    require(
        has_values != has_block,
        format!(
            "exactly one of 'values' and 'text_block' must be declared in {}",
            declaration
        ),
    )?;
    let format = decl.format.validate()?;

    let records = if has_values {
        // Inline rows never have comment recognition.
        decl.values.clone()
    } else {
        parser::split_records(&decl.text_block, "\n", format.quote_char)
            .into_iter()
            .filter(|r| !r.is_empty() && !parser::is_comment(r, Some(BLOCK_COMMENT_PREFIX)))
            .collect()
    };
    debug!(records = records.len(), "resolved inline CSV source");
    build_stream(records, format, declaration)
}

/// Resolve a file declaration into a tuple stream spanning every declared
/// file, in declaration order.
pub(crate) fn resolve_files(
    decl: &CsvFileSourceDecl,
    ctx: &ExtensionContext,
) -> Result<ArgumentStream> {
    let declaration = decl.describe();
    require(
        !decl.paths.is_empty() || !decl.resources.is_empty(),
        format!(
            "at least one file or resource must be declared in {}",
            declaration
        ),
    )?;
    require(
        !decl.line_separator.is_empty(),
        "'line_separator' must not be empty",
    )?;
    // Charset and format are validated eagerly, before any file is touched.
    let charset = Charset::parse(&decl.charset)?;
    let format = decl.format.validate()?;

    let mut files = decl.paths.clone();
    for resource in &decl.resources {
        let root = ctx.resource_root.as_ref().ok_or_else(|| {
            PreconditionError::new(format!(
                "resource [{}] declared but the context has no resource root",
                resource
            ))
        })?;
        files.push(root.join(resource));
    }

    let mut streams = Vec::new();
    for path in files {
        let display_path = path.display().to_string();
        // std::fs::read opens, fully consumes, and closes the handle exactly
        // once, on success and failure paths alike.
        let bytes = std::fs::read(&path).map_err(|source| ResolveError::Io {
            path: display_path.clone(),
            source,
        })?;
        let text = charset
            .decode(bytes, &display_path)
            .map_err(|source| ResolveError::Csv {
                declaration: declaration.clone(),
                source,
            })?;
        let records: Vec<String> =
            parser::split_records(&text, &decl.line_separator, format.quote_char)
                .into_iter()
                .skip(decl.num_lines_to_skip)
                .filter(|r| !r.is_empty() && !parser::is_comment(r, Some(decl.comment_prefix)))
                .collect();
        debug!(path = %display_path, records = records.len(), "resolved CSV file source");
        streams.push(build_stream(records, format.clone(), declaration.clone())?);
    }
    Ok(ArgumentStream::from_fallible(
        streams.into_iter().flatten(),
    ))
}

/// Turn records into a lazily parsed tuple stream, extracting headers first
/// when requested.
fn build_stream(
    records: Vec<String>,
    format: CsvFormat,
    declaration: String,
) -> Result<ArgumentStream> {
    let mut records = records.into_iter().enumerate();

    let headers: Option<Vec<String>> = if format.use_headers {
        let (index, record) = records.next().ok_or_else(|| {
            PreconditionError::new(format!(
                "header extraction requested but {} holds no records",
                declaration
            ))
        })?;
        let fields =
            parser::parse_record(&record, index, &format).map_err(|source| ResolveError::Csv {
                declaration: declaration.clone(),
                source,
            })?;
        Some(fields.into_iter().map(|f| f.text.trim().to_string()).collect())
    } else {
        None
    };

    Ok(ArgumentStream::from_fallible(records.map(move |(index, record)| {
        convert_record(&record, index, &format, headers.as_deref(), &declaration)
    })))
}

fn convert_record(
    record: &str,
    index: usize,
    format: &CsvFormat,
    headers: Option<&[String]>,
    declaration: &str,
) -> Result<ArgumentTuple> {
    let fields =
        parser::parse_record(record, index, format).map_err(|source| ResolveError::Csv {
            declaration: declaration.to_string(),
            source,
        })?;

    if let Some(headers) = headers {
        if fields.len() > headers.len() {
            return Err(ResolveError::Csv {
                declaration: declaration.to_string(),
                source: CsvTokenError::TooManyColumns {
                    record: index,
                    columns: fields.len(),
                    headers: headers.len(),
                },
            });
        }
    }

    let values: Vec<ArgumentValue> = fields.iter().map(|f| convert_field(f, format)).collect();
    Ok(match headers {
        Some(headers) => {
            let name = headers
                .iter()
                .zip(values.iter())
                .map(|(header, value)| format!("{} = {}", header, value))
                .collect::<Vec<_>>()
                .join(", ");
            ArgumentTuple::named(name, values)
        }
        None => ArgumentTuple::of(values),
    })
}

fn convert_field(field: &RawField, format: &CsvFormat) -> ArgumentValue {
    if field.quoted {
        if field.text.is_empty() {
            return ArgumentValue::Str(format.empty_value.clone());
        }
        if format.null_values.contains(&field.text) {
            return ArgumentValue::Null;
        }
        ArgumentValue::Str(field.text.clone())
    } else {
        let text = if format.trim_unquoted {
            field.text.trim()
        } else {
            field.text.as_str()
        };
        if text.is_empty() {
            return ArgumentValue::Null;
        }
        if format.null_values.iter().any(|n| n == text) {
            return ArgumentValue::Null;
        }
        ArgumentValue::Str(text.to_string())
    }
}
