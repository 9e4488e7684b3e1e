//! Lazily consumed argument sequences.

use gauntlet_core::ArgumentTuple;

use crate::error::Result;

/// A finite, single-pass sequence of argument tuples.
///
/// A fresh stream is produced per `resolve` call. It is not restartable, and
/// the framework never consumes one twice. Row-level parse failures surface
/// as `Err` items at the offending position.
pub struct ArgumentStream {
    inner: Box<dyn Iterator<Item = Result<ArgumentTuple>> + Send>,
}

impl ArgumentStream {
    pub fn from_tuples(tuples: Vec<ArgumentTuple>) -> Self {
        ArgumentStream {
            inner: Box::new(tuples.into_iter().map(Ok)),
        }
    }

    pub fn from_fallible(iter: impl Iterator<Item = Result<ArgumentTuple>> + Send + 'static) -> Self {
        ArgumentStream {
            inner: Box::new(iter),
        }
    }

    /// Drain the stream, failing on the first malformed row.
    pub fn collect_tuples(self) -> Result<Vec<ArgumentTuple>> {
        self.collect()
    }
}

impl Iterator for ArgumentStream {
    type Item = Result<ArgumentTuple>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl std::fmt::Debug for ArgumentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ArgumentStream")
    }
}
