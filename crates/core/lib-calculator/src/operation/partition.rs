// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use super::error::{OpError, Result};
use super::mgmt::ThreadError;
use lib_store::BenchConfig;

pub const MEGA_MULTIPLIER: u64 = 1024 * 1024;

/// Rows handed to each rank.
///
/// The division is a plain floor: remainder rows are dropped from every
/// partition rather than redistributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
	pub block_per_rank: u64,
	pub total_rows: u64,
	pub group_size: usize,
}

impl Partition {
	pub fn plan(
		block_count: u32,
		block_size: u32,
		group_size: usize,
	) -> Result<Self> {
		let overflow = || OpError::PartitionOverflow {
			block_count,
			block_size,
		};

		if group_size == 0 {
			return Err(ThreadError::EmptyGroup.into());
		}

		let total_rows = u64::from(block_count)
			.checked_mul(u64::from(block_size))
			.and_then(|n| n.checked_mul(MEGA_MULTIPLIER))
			.ok_or_else(overflow)?;
		let group = u64::try_from(group_size).map_err(|_| overflow())?;

		Ok(Self {
			block_per_rank: total_rows / group,
			total_rows,
			group_size,
		})
	}

	pub fn for_config(
		cfg: &BenchConfig,
		group_size: usize,
	) -> Result<Self> {
		Self::plan(cfg.block_count(), cfg.block_size(), group_size)
	}

	/// Rows of the nominal workload that no rank processes.
	pub fn dropped_rows(&self) -> u64 {
		self.total_rows - self.block_per_rank * self.group_size as u64
	}

	/// Local row count as an in-memory length.
	pub fn rows(&self) -> Result<usize> {
		usize::try_from(self.block_per_rank).map_err(|_| OpError::RowsExceedAddressSpace {
			rows: self.block_per_rank,
		})
	}
}
