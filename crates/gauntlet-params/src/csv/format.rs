//! Validated CSV source configuration.

use serde::{Deserialize, Serialize};

use gauntlet_core::{require, PreconditionError};

use crate::error::CsvTokenError;

/// Default per-column character limit.
pub const DEFAULT_MAX_CHARS_PER_COLUMN: i64 = 4096;

/// The `-1` sentinel meaning "no per-column limit".
pub const UNLIMITED: i64 = -1;

/// Raw declaration knobs shared by inline, block, and file CSV sources.
///
/// `delimiter` and `delimiter_string` are mutually exclusive; declaring both
/// is a configuration error, declaring neither means `,`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvFormatDecl {
    pub delimiter: Option<char>,
    pub delimiter_string: Option<String>,
    pub quote_char: char,
    /// Substitution for a quoted empty field.
    pub empty_value: String,
    /// Literals that convert a field to null.
    pub null_values: Vec<String>,
    /// Positive limit, or [`UNLIMITED`].
    pub max_chars_per_column: i64,
    /// Trim leading/trailing whitespace of unquoted fields.
    pub ignore_leading_and_trailing_whitespace: bool,
    /// Consume the first record as headers and name each tuple
    /// `"<header> = <value>"` per column.
    pub use_headers_in_display_name: bool,
}

impl Default for CsvFormatDecl {
    fn default() -> Self {
        CsvFormatDecl {
            delimiter: None,
            delimiter_string: None,
            quote_char: '\'',
            empty_value: String::new(),
            null_values: Vec::new(),
            max_chars_per_column: DEFAULT_MAX_CHARS_PER_COLUMN,
            ignore_leading_and_trailing_whitespace: true,
            use_headers_in_display_name: false,
        }
    }
}

impl CsvFormatDecl {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_delimiter_string(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter_string = Some(delimiter.into());
        self
    }

    pub fn with_quote_char(mut self, quote: char) -> Self {
        self.quote_char = quote;
        self
    }

    pub fn with_empty_value(mut self, value: impl Into<String>) -> Self {
        self.empty_value = value.into();
        self
    }

    pub fn with_null_values(mut self, values: &[&str]) -> Self {
        self.null_values = values.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn with_max_chars_per_column(mut self, max: i64) -> Self {
        self.max_chars_per_column = max;
        self
    }

    pub fn keep_whitespace(mut self) -> Self {
        self.ignore_leading_and_trailing_whitespace = false;
        self
    }

    pub fn use_headers(mut self) -> Self {
        self.use_headers_in_display_name = true;
        self
    }

    /// Check every knob and produce the validated format.
    pub fn validate(&self) -> Result<CsvFormat, PreconditionError> {
        require(
            self.delimiter.is_none() || self.delimiter_string.is_none(),
            "the 'delimiter' and 'delimiter_string' attributes are mutually exclusive",
        )?;
        let delimiter = match (&self.delimiter, &self.delimiter_string) {
            (Some(c), None) => c.to_string(),
            (None, Some(s)) => {
                require(!s.is_empty(), "'delimiter_string' must not be empty")?;
                s.clone()
            }
            _ => ",".to_string(),
        };
        let max_chars = match self.max_chars_per_column {
            UNLIMITED => None,
            n if n > 0 => Some(n as usize),
            n => {
                return Err(PreconditionError::new(format!(
                    "'max_chars_per_column' must be positive or -1 (unlimited), but was {}",
                    n
                )))
            }
        };
        Ok(CsvFormat {
            delimiter,
            quote_char: self.quote_char,
            empty_value: self.empty_value.clone(),
            null_values: self.null_values.clone(),
            max_chars,
            trim_unquoted: self.ignore_leading_and_trailing_whitespace,
            use_headers: self.use_headers_in_display_name,
        })
    }
}

/// Validated CSV parsing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFormat {
    pub delimiter: String,
    pub quote_char: char,
    pub empty_value: String,
    pub null_values: Vec<String>,
    pub max_chars: Option<usize>,
    pub trim_unquoted: bool,
    pub use_headers: bool,
}

/// Supported charsets for file sources; validated eagerly by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    UsAscii,
    Latin1,
}

impl Charset {
    /// Resolve a charset name. Unknown names are configuration errors.
    pub fn parse(name: &str) -> Result<Self, PreconditionError> {
        match name.trim().to_ascii_uppercase().as_str() {
            "UTF-8" | "UTF8" => Ok(Charset::Utf8),
            "US-ASCII" | "ASCII" => Ok(Charset::UsAscii),
            "ISO-8859-1" | "LATIN1" => Ok(Charset::Latin1),
            _ => Err(PreconditionError::new(format!(
                "unsupported charset [{}]; supported charsets are UTF-8, US-ASCII, and ISO-8859-1",
                name
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::UsAscii => "US-ASCII",
            Charset::Latin1 => "ISO-8859-1",
        }
    }

    /// Decode file bytes. Decoding failures are parse errors, not
    /// configuration errors.
    pub fn decode(self, bytes: Vec<u8>, path: &str) -> Result<String, CsvTokenError> {
        match self {
            Charset::Utf8 => String::from_utf8(bytes).map_err(|_| CsvTokenError::Decode {
                charset: self.name().to_string(),
                path: path.to_string(),
            }),
            Charset::UsAscii => {
                if bytes.iter().all(|b| b.is_ascii()) {
                    Ok(bytes.into_iter().map(|b| b as char).collect())
                } else {
                    Err(CsvTokenError::Decode {
                        charset: self.name().to_string(),
                        path: path.to_string(),
                    })
                }
            }
            Charset::Latin1 => Ok(bytes.into_iter().map(|b| b as char).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_validates() {
        let format = CsvFormatDecl::default().validate().unwrap();
        assert_eq!(format.delimiter, ",");
        assert_eq!(format.quote_char, '\'');
        assert_eq!(format.max_chars, Some(4096));
        assert!(format.trim_unquoted);
        assert!(!format.use_headers);
    }

    #[test]
    fn test_both_delimiters_is_configuration_error() {
        let err = CsvFormatDecl::default()
            .with_delimiter(';')
            .with_delimiter_string("~~~")
            .validate()
            .unwrap_err();
        assert!(err.message().contains("mutually exclusive"));
    }

    #[test]
    fn test_delimiter_string_used_verbatim() {
        let format = CsvFormatDecl::default()
            .with_delimiter_string("~~~")
            .validate()
            .unwrap();
        assert_eq!(format.delimiter, "~~~");
    }

    #[test]
    fn test_unlimited_column_sentinel() {
        let format = CsvFormatDecl::default()
            .with_max_chars_per_column(UNLIMITED)
            .validate()
            .unwrap();
        assert_eq!(format.max_chars, None);
    }

    #[test]
    fn test_non_positive_column_limit_is_configuration_error() {
        let err = CsvFormatDecl::default()
            .with_max_chars_per_column(0)
            .validate()
            .unwrap_err();
        assert!(err.message().contains("max_chars_per_column"));
    }

    #[test]
    fn test_charset_names() {
        assert_eq!(Charset::parse("utf-8").unwrap(), Charset::Utf8);
        assert_eq!(Charset::parse("ISO-8859-1").unwrap(), Charset::Latin1);
        assert!(Charset::parse("EBCDIC").is_err());
    }

    #[test]
    fn test_ascii_decode_rejects_high_bytes() {
        let err = Charset::UsAscii
            .decode(vec![b'a', 0xE9], "data.csv")
            .unwrap_err();
        assert!(matches!(err, CsvTokenError::Decode { .. }));
        assert_eq!(
            Charset::Latin1.decode(vec![b'a', 0xE9], "data.csv").unwrap(),
            "aé"
        );
    }
}
