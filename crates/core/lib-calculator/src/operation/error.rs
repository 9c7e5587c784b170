// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use super::mgmt::ThreadError;
use lib_store::StoreError;
use ndarray::ShapeError;
use std::sync::PoisonError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, OpError>;

#[derive(Debug, Error)]
pub enum OpError {
	#[error("Rank {rank} couldn't allocate {requested_bytes} bytes for its local block")]
	AllocationError { rank: usize, requested_bytes: u64 },

	#[error("Workload of {block_count} x {block_size} mega-blocks overflows partition arithmetic")]
	PartitionOverflow { block_count: u32, block_size: u32 },

	#[error("{rows} rows per rank don't fit the address space")]
	RowsExceedAddressSpace { rows: u64 },

	#[error("Array shaping Error")]
	ShapingError(#[from] ShapeError),

	#[error("Poisoned lock: {0}")]
	PoisonError(String),

	#[error(transparent)]
	Thread(#[from] ThreadError),

	#[error(transparent)]
	Report(#[from] StoreError),
}

impl<T> From<PoisonError<T>> for OpError {
	fn from(err: PoisonError<T>) -> Self {
		OpError::PoisonError(err.to_string())
	}
}
