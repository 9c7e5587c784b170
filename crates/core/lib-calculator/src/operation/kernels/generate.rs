// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use crate::block::LocalBlock;
use crate::operation::error::Result;
use lib_store::WorkloadKind;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const SAMPLE_LOW: f32 = -1000.0;
pub const SAMPLE_HIGH: f32 = 1000.0;

/// Per-rank random stream seeded with `base + rank`.
///
/// Without an explicit base the wall-clock second is used, so ranks that
/// start within the same second get adjacent seeds. That is enough to tell
/// their streams apart for a benchmark; it is not a guarantee of
/// statistical independence.
pub fn worker_rng(
	base: Option<u64>,
	rank: usize,
) -> StdRng {
	let base = base.unwrap_or_else(|| chrono::Utc::now().timestamp().unsigned_abs());
	StdRng::seed_from_u64(base.wrapping_add(rank as u64))
}

pub fn generate(
	kind: WorkloadKind,
	rows: usize,
	rank: usize,
	rng: &mut StdRng,
) -> Result<LocalBlock> {
	match kind {
		WorkloadKind::Uniform => {
			let dist = Uniform::new(SAMPLE_LOW, SAMPLE_HIGH);
			LocalBlock::try_from_fn(rows, rank, || dist.sample(&mut *rng))
		},
		WorkloadKind::Zeros => LocalBlock::try_zeros(rows, rank),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_uniform_range() {
		let mut rng = worker_rng(Some(7), 0);
		let block = generate(WorkloadKind::Uniform, 10_000, 0, &mut rng).unwrap();

		assert_eq!(block.rows(), 10_000);
		assert!(block
			.view()
			.iter()
			.all(|&v| (SAMPLE_LOW..SAMPLE_HIGH).contains(&v)));

		let mean = block.view().iter().map(|&v| f64::from(v)).sum::<f64>() / 30_000.0;
		assert!(mean.abs() < 50.0, "mean {} far from zero", mean);
	}

	#[test]
	fn test_zeros_kind() {
		let mut rng = worker_rng(Some(7), 0);
		let block = generate(WorkloadKind::Zeros, 16, 0, &mut rng).unwrap();

		assert!(block.view().iter().all(|&v| v == 0.0));
	}

	#[test]
	fn test_seeded_streams_reproducible_and_rank_distinct() {
		let draw = |rank| {
			let mut rng = worker_rng(Some(1234), rank);
			generate(WorkloadKind::Uniform, 8, rank, &mut rng).unwrap()
		};

		assert_eq!(draw(0), draw(0));
		assert_ne!(draw(0), draw(1));
	}
}
