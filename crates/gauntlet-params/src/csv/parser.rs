//! CSV record reader: record splitting, quoted fields, per-column limits.
//!
//! One record is tokenized into [`RawField`]s. Quoted fields escape the
//! quote character by doubling it; separators inside quotes are literal.
//! Malformed input fails with a [`CsvTokenError`] naming the zero-based
//! record index.

use crate::csv::format::CsvFormat;
use crate::error::CsvTokenError;

/// One tokenized column, before null/empty-value conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    pub text: String,
    pub quoted: bool,
}

/// Split block/file text into records on `line_separator`, keeping
/// separators that appear inside quoted fields.
pub(crate) fn split_records(text: &str, line_separator: &str, quote_char: char) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let sep: Vec<char> = line_separator.chars().collect();
    let mut records = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == quote_char {
            if in_quotes && i + 1 < chars.len() && chars[i + 1] == quote_char {
                current.push(c);
                current.push(c);
                i += 2;
                continue;
            }
            in_quotes = !in_quotes;
            current.push(c);
            i += 1;
        } else if !in_quotes && starts_with(&chars, i, &sep) {
            records.push(std::mem::take(&mut current));
            i += sep.len();
        } else {
            current.push(c);
            i += 1;
        }
    }
    if !current.is_empty() {
        records.push(current);
    }
    records
}

/// Whether a record is a comment under the given prefix.
pub(crate) fn is_comment(record: &str, comment_prefix: Option<char>) -> bool {
    match comment_prefix {
        Some(prefix) => record.starts_with(prefix),
        None => false,
    }
}

fn starts_with(chars: &[char], at: usize, needle: &[char]) -> bool {
    !needle.is_empty() && chars[at..].starts_with(needle)
}

/// Tokenize one record into fields.
pub(crate) fn parse_record(
    text: &str,
    record: usize,
    format: &CsvFormat,
) -> Result<Vec<RawField>, CsvTokenError> {
    let chars: Vec<char> = text.chars().collect();
    let delim: Vec<char> = format.delimiter.chars().collect();
    let mut fields = Vec::new();
    let mut pos = 0;
    loop {
        let (field, next) = parse_field(&chars, pos, record, format, &delim)?;
        fields.push(field);
        match next {
            Some(p) => pos = p,
            None => break,
        }
    }
    Ok(fields)
}

/// Parse one field starting at `start`; returns the field and the position
/// just past the following delimiter, or `None` at end of record.
fn parse_field(
    chars: &[char],
    start: usize,
    record: usize,
    format: &CsvFormat,
    delim: &[char],
) -> Result<(RawField, Option<usize>), CsvTokenError> {
    let len = chars.len();
    let mut i = start;

    // Whitespace may precede an opening quote.
    let mut prefix = String::new();
    while i < len && chars[i].is_whitespace() && !starts_with(chars, i, delim) {
        prefix.push(chars[i]);
        i += 1;
    }

    if i < len && chars[i] == format.quote_char {
        i += 1;
        let mut text = String::new();
        loop {
            if i >= len {
                return Err(CsvTokenError::UnterminatedQuote { record });
            }
            let c = chars[i];
            if c == format.quote_char {
                if i + 1 < len && chars[i + 1] == format.quote_char {
                    text.push(c);
                    i += 2;
                } else {
                    i += 1;
                    break;
                }
            } else {
                text.push(c);
                i += 1;
            }
            check_limit(&text, record, format)?;
        }
        // Only whitespace may separate the closing quote from the delimiter.
        while i < len && !starts_with(chars, i, delim) {
            if !chars[i].is_whitespace() {
                return Err(CsvTokenError::StrayQuote { record });
            }
            i += 1;
        }
        let next = (i < len).then(|| i + delim.len());
        Ok((RawField { text, quoted: true }, next))
    } else {
        let mut text = prefix;
        while i < len && !starts_with(chars, i, delim) {
            text.push(chars[i]);
            i += 1;
            check_limit(&text, record, format)?;
        }
        let next = (i < len).then(|| i + delim.len());
        Ok((
            RawField {
                text,
                quoted: false,
            },
            next,
        ))
    }
}

fn check_limit(text: &str, record: usize, format: &CsvFormat) -> Result<(), CsvTokenError> {
    match format.max_chars {
        Some(limit) if text.chars().count() > limit => {
            Err(CsvTokenError::ColumnTooLong { record, limit })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::format::CsvFormatDecl;

    fn format() -> CsvFormat {
        CsvFormatDecl::default().validate().unwrap()
    }

    fn texts(fields: &[RawField]) -> Vec<&str> {
        fields.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_plain_fields() {
        let fields = parse_record("apple, banana, cherry", 0, &format()).unwrap();
        assert_eq!(texts(&fields), vec!["apple", " banana", " cherry"]);
        assert!(fields.iter().all(|f| !f.quoted));
    }

    #[test]
    fn test_quoted_field_keeps_delimiter() {
        let fields = parse_record("'a, b', c", 0, &format()).unwrap();
        assert_eq!(texts(&fields), vec!["a, b", " c"]);
        assert!(fields[0].quoted);
        assert!(!fields[1].quoted);
    }

    #[test]
    fn test_doubled_quote_escapes() {
        let fields = parse_record("'it''s fine'", 0, &format()).unwrap();
        assert_eq!(texts(&fields), vec!["it's fine"]);
    }

    #[test]
    fn test_whitespace_around_quoted_field() {
        let fields = parse_record("  'padded'  , next", 0, &format()).unwrap();
        assert_eq!(fields[0].text, "padded");
        assert!(fields[0].quoted);
    }

    #[test]
    fn test_unterminated_quote_names_record_index() {
        let err = parse_record("'oops", 7, &format()).unwrap_err();
        assert_eq!(err, CsvTokenError::UnterminatedQuote { record: 7 });
    }

    #[test]
    fn test_text_after_closing_quote_is_malformed() {
        let err = parse_record("'done'oops, b", 2, &format()).unwrap_err();
        assert_eq!(err, CsvTokenError::StrayQuote { record: 2 });
    }

    #[test]
    fn test_column_limit_enforced() {
        let mut format = format();
        format.max_chars = Some(4);
        let err = parse_record("abcdef", 1, &format).unwrap_err();
        assert_eq!(
            err,
            CsvTokenError::ColumnTooLong {
                record: 1,
                limit: 4
            }
        );
        format.max_chars = None;
        assert!(parse_record("abcdef", 1, &format).is_ok());
    }

    #[test]
    fn test_multi_char_delimiter_string() {
        let format = CsvFormatDecl::default()
            .with_delimiter_string("~~~")
            .validate()
            .unwrap();
        let fields = parse_record("a~~~b~~~c", 0, &format).unwrap();
        assert_eq!(texts(&fields), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_fields_tokenize() {
        let fields = parse_record("a,,''", 0, &format()).unwrap();
        assert_eq!(texts(&fields), vec!["a", "", ""]);
        assert!(!fields[1].quoted);
        assert!(fields[2].quoted);
    }

    #[test]
    fn test_split_records_respects_quotes() {
        let records = split_records("a, 'one\ntwo'\nb, c\n", "\n", '\'');
        assert_eq!(records, vec!["a, 'one\ntwo'", "b, c"]);
    }

    #[test]
    fn test_split_records_custom_separator() {
        let records = split_records("a|b;;c|d", ";;", '\'');
        assert_eq!(records, vec!["a|b", "c|d"]);
    }

    #[test]
    fn test_is_comment() {
        assert!(is_comment("# note", Some('#')));
        assert!(!is_comment("value # not a comment", Some('#')));
        assert!(!is_comment("# note", None));
    }
}
