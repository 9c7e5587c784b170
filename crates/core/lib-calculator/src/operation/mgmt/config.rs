// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use super::error::{Result, ThreadError};
use super::group::WorkerGroup;
use std::num::NonZeroUsize;
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConfig {
	workers: Option<usize>,

	pin_cores: bool,

	thread_prefix: String,
}

impl Default for GroupConfig {
	fn default() -> Self {
		Self {
			workers: None,
			pin_cores: false,
			thread_prefix: "bench-worker".to_string(),
		}
	}
}

impl GroupConfig {
	pub fn builder() -> Self {
		Self::default()
	}

	pub fn with_workers(
		mut self,
		count: usize,
	) -> Self {
		self.workers = Some(count);
		self
	}

	pub fn pin_cores(
		mut self,
		enable: bool,
	) -> Self {
		self.pin_cores = enable;
		self
	}

	pub fn with_thread_prefix(
		mut self,
		prefix: &str,
	) -> Self {
		self.thread_prefix = prefix.to_string();
		self
	}

	/// Group size, falling back to the machine's available parallelism.
	pub fn workers(&self) -> usize {
		self.workers.unwrap_or_else(|| {
			thread::available_parallelism()
				.map(NonZeroUsize::get)
				.unwrap_or(1)
		})
	}

	pub fn pinned(&self) -> bool {
		self.pin_cores
	}

	pub fn thread_prefix(&self) -> &str {
		&self.thread_prefix
	}

	pub fn validate(&self) -> Result<()> {
		if self.workers() == 0 {
			return Err(ThreadError::EmptyGroup);
		}
		Ok(())
	}

	pub fn build(self) -> Result<WorkerGroup> {
		self.validate()?;
		Ok(WorkerGroup::new(self))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_builder_pattern() {
		let config = GroupConfig::builder()
			.with_workers(4)
			.pin_cores(true)
			.with_thread_prefix("phase");

		assert_eq!(config.workers(), 4);
		assert!(config.pinned());
		assert_eq!(config.thread_prefix(), "phase");
	}

	#[test]
	fn test_default_uses_available_parallelism() {
		assert!(GroupConfig::builder().workers() >= 1);
	}

	#[test]
	fn test_zero_workers_rejected() {
		let result = GroupConfig::builder().with_workers(0).build();
		assert!(matches!(result, Err(ThreadError::EmptyGroup)));
	}
}
