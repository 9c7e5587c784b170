// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use crate::block::{LocalBlock, BLOCK_DIM};

/// Per-dimension arithmetic mean.
pub type Mean = [f64; BLOCK_DIM];

/// Column means of `block`, accumulated in `f64`.
///
/// An empty block has no mean; it yields zeros so the global reduction can
/// still proceed.
pub fn average(block: &LocalBlock) -> Mean {
	let rows = block.rows();
	if rows == 0 {
		return [0.0; BLOCK_DIM];
	}

	let mut sums = [0.0f64; BLOCK_DIM];
	for row in block.view().rows() {
		for (sum, &v) in sums.iter_mut().zip(row.iter()) {
			*sum += f64::from(v);
		}
	}
	sums.map(|sum| sum / rows as f64)
}
