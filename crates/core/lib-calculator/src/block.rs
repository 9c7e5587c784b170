// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use crate::operation::error::{OpError, Result};
use ndarray::{Array2, ArrayView2, ArrayViewMut2};

/// Columns per row of every local block.
pub const BLOCK_DIM: usize = 3;

/// One worker's partition of the synthetic workload: a dense row-major
/// `rows x BLOCK_DIM` matrix owned by exactly one worker.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalBlock {
	data: Array2<f32>,
}

impl LocalBlock {
	/// Fills a new block row by row from `fill`.
	///
	/// Allocation is fallible: a worker that cannot get its block reports
	/// [`OpError::AllocationError`] instead of aborting the process.
	pub fn try_from_fn(
		rows: usize,
		rank: usize,
		mut fill: impl FnMut() -> f32,
	) -> Result<Self> {
		let mut data = allocate(rows, rank)?;
		data.extend((0..rows * BLOCK_DIM).map(|_| fill()));
		Ok(Self {
			data: Array2::from_shape_vec((rows, BLOCK_DIM), data)?,
		})
	}

	pub fn try_zeros(
		rows: usize,
		rank: usize,
	) -> Result<Self> {
		let mut data = allocate(rows, rank)?;
		data.resize(rows * BLOCK_DIM, 0.0);
		Ok(Self {
			data: Array2::from_shape_vec((rows, BLOCK_DIM), data)?,
		})
	}

	pub fn from_array(data: Array2<f32>) -> Result<Self> {
		if data.ncols() != BLOCK_DIM {
			return Err(OpError::ShapingError(ndarray::ShapeError::from_kind(
				ndarray::ErrorKind::IncompatibleShape,
			)));
		}
		Ok(Self { data })
	}

	pub fn rows(&self) -> usize {
		self.data.nrows()
	}

	pub fn view(&self) -> ArrayView2<'_, f32> {
		self.data.view()
	}

	pub(crate) fn view_mut(&mut self) -> ArrayViewMut2<'_, f32> {
		self.data.view_mut()
	}

	pub fn byte_size(rows: usize) -> u64 {
		(rows as u64)
			.saturating_mul(BLOCK_DIM as u64)
			.saturating_mul(std::mem::size_of::<f32>() as u64)
	}
}

fn allocate(
	rows: usize,
	rank: usize,
) -> Result<Vec<f32>> {
	let failed = || OpError::AllocationError {
		rank,
		requested_bytes: LocalBlock::byte_size(rows),
	};

	let len = rows.checked_mul(BLOCK_DIM).ok_or_else(failed)?;
	let mut data = Vec::new();
	data.try_reserve_exact(len).map_err(|_| failed())?;
	Ok(data)
}

#[cfg(test)]
mod tests {
	use super::*;
	use ndarray::array;

	#[test]
	fn test_zeros_shape() {
		let block = LocalBlock::try_zeros(4, 0).unwrap();

		assert_eq!(block.rows(), 4);
		assert_eq!(block.view().ncols(), BLOCK_DIM);
		assert!(block.view().iter().all(|&v| v == 0.0));
	}

	#[test]
	fn test_from_fn_row_major() {
		let mut next = 0.0;
		let block = LocalBlock::try_from_fn(2, 0, || {
			next += 1.0;
			next
		})
		.unwrap();

		assert_eq!(block.view(), array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]]);
	}

	#[test]
	fn test_empty_block() {
		let block = LocalBlock::try_zeros(0, 0).unwrap();
		assert_eq!(block.rows(), 0);
	}

	#[test]
	fn test_impossible_allocation_reported() {
		let err = LocalBlock::try_zeros(usize::MAX / 2, 7).unwrap_err();

		match err {
			OpError::AllocationError {
				rank,
				requested_bytes,
			} => {
				assert_eq!(rank, 7);
				assert!(requested_bytes > 0);
			},
			other => panic!("unexpected error {:?}", other),
		}
	}

	#[test]
	fn test_wrong_width_rejected() {
		let result = LocalBlock::from_array(Array2::zeros((3, 2)));
		assert!(matches!(result, Err(OpError::ShapingError(_))));
	}
}
