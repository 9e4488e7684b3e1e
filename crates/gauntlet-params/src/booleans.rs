//! Boolean-combination argument source.

use serde::{Deserialize, Serialize};

use gauntlet_core::{require, ArgumentTuple, ArgumentValue};

use crate::error::Result;
use crate::stream::ArgumentStream;

/// Emits every combination of `count` boolean flags: `2^count` tuples, with
/// the tuple index's binary representation read most-significant-bit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanMatrixDecl {
    pub count: usize,
}

impl BooleanMatrixDecl {
    pub fn new(count: usize) -> Self {
        BooleanMatrixDecl { count }
    }
}

pub(crate) fn resolve_booleans(decl: &BooleanMatrixDecl) -> Result<ArgumentStream> {
    require(
        decl.count >= 1,
        "a boolean matrix needs at least one flag",
    )?;
    require(
        decl.count <= 16,
        format!(
            "a boolean matrix of {} flags would produce 2^{} invocations; the limit is 16 flags",
            decl.count, decl.count
        ),
    )?;

    let n = decl.count;
    let tuples = (0..1usize << n)
        .map(|index| {
            let values = (0..n)
                .map(|bit| ArgumentValue::Bool((index >> (n - 1 - bit)) & 1 == 1))
                .collect();
            ArgumentTuple::of(values)
        })
        .collect();
    Ok(ArgumentStream::from_tuples(tuples))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(tuple: &ArgumentTuple) -> Vec<bool> {
        tuple
            .values
            .iter()
            .map(|v| match v {
                ArgumentValue::Bool(b) => *b,
                other => panic!("expected bool, got {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_two_flags_enumerate_msb_first() {
        let tuples = resolve_booleans(&BooleanMatrixDecl::new(2))
            .unwrap()
            .collect_tuples()
            .unwrap();
        let matrix: Vec<Vec<bool>> = tuples.iter().map(flags).collect();
        assert_eq!(
            matrix,
            vec![
                vec![false, false],
                vec![false, true],
                vec![true, false],
                vec![true, true],
            ]
        );
    }

    #[test]
    fn test_single_flag() {
        let tuples = resolve_booleans(&BooleanMatrixDecl::new(1))
            .unwrap()
            .collect_tuples()
            .unwrap();
        let matrix: Vec<Vec<bool>> = tuples.iter().map(flags).collect();
        assert_eq!(matrix, vec![vec![false], vec![true]]);
    }

    #[test]
    fn test_count_scales_as_power_of_two() {
        let tuples = resolve_booleans(&BooleanMatrixDecl::new(5))
            .unwrap()
            .collect_tuples()
            .unwrap();
        assert_eq!(tuples.len(), 32);
        assert_eq!(tuples[0].len(), 5);
    }

    #[test]
    fn test_zero_flags_is_configuration_error() {
        assert!(resolve_booleans(&BooleanMatrixDecl::new(0)).is_err());
    }

    #[test]
    fn test_oversized_matrix_is_configuration_error() {
        let err = resolve_booleans(&BooleanMatrixDecl::new(17)).unwrap_err();
        assert!(err.to_string().contains("limit is 16"));
    }
}
