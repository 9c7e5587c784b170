// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use lib_calculator::mgmt::ThreadError;
use lib_calculator::OpError;
use lib_store::StoreError;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, ToolError>;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RESOURCE: u8 = 3;
pub const EXIT_REPORT_IO: u8 = 4;

#[derive(Debug, Error)]
pub enum ToolError {
	#[error(transparent)]
	StoreError(#[from] StoreError),
	#[error(transparent)]
	OpError(#[from] OpError),
}

impl ToolError {
	pub fn exit_code(&self) -> u8 {
		match self {
			ToolError::StoreError(e) => store_exit_code(e),
			ToolError::OpError(e) => match e {
				OpError::PartitionOverflow { .. } | OpError::Thread(ThreadError::EmptyGroup) => {
					EXIT_CONFIG
				},
				OpError::AllocationError { .. } | OpError::RowsExceedAddressSpace { .. } => {
					EXIT_RESOURCE
				},
				OpError::Report(e) => store_exit_code(e),
				_ => EXIT_FAILURE,
			},
		}
	}
}

fn store_exit_code(e: &StoreError) -> u8 {
	if e.is_config() {
		EXIT_CONFIG
	} else {
		EXIT_REPORT_IO
	}
}
