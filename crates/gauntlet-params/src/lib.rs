//! Parameterized-test argument resolution
//!
//! Strategies that convert declarative argument sources into ordered,
//! single-pass streams of typed argument tuples:
//! - `csv`: tokenizer and inline/block/file CSV sources with quoting,
//!   comment, null-sentinel, and header semantics
//! - `values`: typed literal arrays
//! - `enums`: enum-constant ranges with include/exclude/match filtering
//! - `factory`: registered factory methods and fields, with overload
//!   disambiguation and one-level array flattening
//! - `booleans`: the full `2^n` boolean matrix
//! - `nulls`: null/empty/blank sources over the supported parameter types
//!
//! Configuration mistakes surface eagerly as `PreconditionError`; malformed
//! CSV rows surface lazily as wrapped parse errors naming the row index and
//! the declaring source.

pub mod booleans;
pub mod csv;
pub mod enums;
pub mod error;
pub mod factory;
mod nulls;
pub mod resolve;
pub mod stream;
pub mod values;

pub use booleans::BooleanMatrixDecl;
pub use csv::{
    Charset, CsvFileSourceDecl, CsvFormat, CsvFormatDecl, CsvSourceDecl,
    DEFAULT_MAX_CHARS_PER_COLUMN, UNLIMITED,
};
pub use enums::{EnumSelectionMode, EnumSourceDecl};
pub use error::{CsvTokenError, ResolveError};
pub use factory::{FactorySourceDecl, FieldSourceDecl};
pub use resolve::{resolve, ArgumentSourceDecl};
pub use stream::ArgumentStream;
pub use values::ValueSourceDecl;

/// Gauntlet params version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
