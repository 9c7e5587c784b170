// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use thiserror::Error;

pub type Result<T> = core::result::Result<T, ThreadError>;

#[derive(Debug, Error)]
pub enum ThreadError {
	#[error("Worker group must contain at least one worker")]
	EmptyGroup,

	#[error("Invalid root rank: {root}. Available ranks: 0-{max}")]
	InvalidRoot { root: usize, max: usize },

	#[error("Group aborted by rank {rank}: {reason}")]
	GroupAborted { rank: usize, reason: String },

	#[error("Protocol violation on rank {rank}: {detail}")]
	ProtocolError { rank: usize, detail: String },

	#[error("Rank {rank} contributed {actual} values, expected {expected}")]
	LengthMismatch {
		rank: usize,
		expected: usize,
		actual: usize,
	},

	#[error("Failed to send message to rank {to}")]
	SendError { to: usize },

	#[error("Failed to receive message via channel")]
	RecvError,

	#[error("Failed to spawn worker {rank}: {message}")]
	SpawnError { rank: usize, message: String },

	#[error("Worker thread {rank} panicked")]
	WorkerPanic { rank: usize },
}

impl From<crossbeam::channel::RecvError> for ThreadError {
	fn from(_: crossbeam::channel::RecvError) -> Self {
		ThreadError::RecvError
	}
}
