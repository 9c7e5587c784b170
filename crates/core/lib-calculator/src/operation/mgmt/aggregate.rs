// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use super::collective::{Communicator, ReduceOp};
use super::error::{Result, ThreadError};
use crate::block::BLOCK_DIM;
use crate::operation::kernels::Mean;
use crate::operation::timer::{Phase, PhaseDurations};

/// Designated aggregator and report writer.
pub const ROOT: usize = 0;

/// Mean of the per-rank means, available on [`ROOT`] only.
///
/// Exact as a global mean only while every rank holds the same row count.
pub fn global_mean(
	comm: &mut Communicator,
	local: &Mean,
) -> Result<Option<Mean>> {
	let size = comm.size() as f64;
	let Some(sums) = comm.reduce(local, ReduceOp::Sum, ROOT)? else {
		return Ok(None);
	};

	let sums: Mean = sums
		.try_into()
		.map_err(|sums: Vec<f64>| ThreadError::LengthMismatch {
			rank: ROOT,
			expected: BLOCK_DIM,
			actual: sums.len(),
		})?;
	Ok(Some(sums.map(|sum| sum / size)))
}

/// Slowest rank per phase, available on [`ROOT`] only.
///
/// Each phase is reduced on its own.
pub fn global_durations(
	comm: &mut Communicator,
	local: &PhaseDurations,
) -> Result<Option<PhaseDurations>> {
	let mut global = Some(PhaseDurations::default());

	for phase in Phase::ALL {
		let max = comm.reduce(&[local.get(phase)], ReduceOp::Max, ROOT)?;
		match (global.as_mut(), max.and_then(|v| v.first().copied())) {
			(Some(global), Some(max)) => global.set(phase, max),
			_ => global = None,
		}
	}

	Ok(global)
}
