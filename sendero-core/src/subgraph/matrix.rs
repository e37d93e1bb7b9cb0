//! Dense, position-keyed distance table.

use crate::error::{Result, SubgraphError};

/// Row-major `stride × stride` table of precomputed distances.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DistanceMatrix {
    values: Vec<f32>,
    stride: usize,
}

impl DistanceMatrix {
    pub(crate) fn new(values: Vec<f32>, stride: usize) -> Self {
        debug_assert_eq!(values.len(), stride * stride, "matrix must be square");
        Self { values, stride }
    }

    pub(crate) fn stride(&self) -> usize {
        self.stride
    }

    pub(crate) fn values(&self) -> &[f32] {
        &self.values
    }

    /// Returns the entry for two positions, or `None` when either lies
    /// outside the table.
    pub(crate) fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.stride || col >= self.stride {
            return None;
        }
        self.values.get(row * self.stride + col).copied()
    }

    pub(crate) fn lookup(&self, row: usize, col: usize) -> Result<f32> {
        let outside = |position| SubgraphError::PositionOutsideMatrix {
            position,
            stride: self.stride,
        };
        if row >= self.stride {
            return Err(outside(row));
        }
        self.get(row, col).ok_or_else(|| outside(col))
    }
}
