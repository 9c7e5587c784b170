// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

pub mod mode;

pub use mode::*;

use crate::error::{Result, StoreError};

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const DEFAULT_BLOCK_COUNT: u32 = 16;
pub const DEFAULT_BLOCK_SIZE: u32 = 1;
pub const DEFAULT_REPORT_PATH: &str = "report.json";

/// Raw settings as they arrive from the command line or a config file.
///
/// Nothing here is trusted until [`BenchSettings::validate`] turns it into a
/// [`BenchConfig`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BenchSettings {
	pub block_count: Option<u32>,
	pub block_size: Option<u32>,
	pub node_count: Option<u32>,
	pub core_count: Option<u32>,
	pub report_path: Option<PathBuf>,
	pub displacement: Option<DisplacementMode>,
	pub workload: Option<WorkloadKind>,
	pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
	version: String,
	#[serde(flatten)]
	settings: BenchSettings,
}

impl BenchSettings {
	pub fn cfg_version() -> String {
		"1".to_string()
	}

	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let file = File::open(path).map_err(|source| StoreError::ConfigFile {
			path: path.to_path_buf(),
			source,
		})?;
		let reader = BufReader::new(file);

		let config: ConfigFile = serde_json::from_reader(reader)?;
		if config.version != Self::cfg_version() {
			Err(StoreError::InvalidConfig {
				found: config.version,
				expected: Self::cfg_version(),
			})
		} else {
			Ok(config.settings)
		}
	}

	/// Values present in `overrides` win over the ones in `self`.
	pub fn merge(
		self,
		overrides: BenchSettings,
	) -> Self {
		Self {
			block_count: overrides.block_count.or(self.block_count),
			block_size: overrides.block_size.or(self.block_size),
			node_count: overrides.node_count.or(self.node_count),
			core_count: overrides.core_count.or(self.core_count),
			report_path: overrides.report_path.or(self.report_path),
			displacement: overrides.displacement.or(self.displacement),
			workload: overrides.workload.or(self.workload),
			seed: overrides.seed.or(self.seed),
		}
	}

	pub fn validate(self) -> Result<BenchConfig> {
		let node_count = self.node_count.filter(|&n| n > 0);
		let core_count = self.core_count.filter(|&c| c > 0);
		let (node_count, core_count) = match (node_count, core_count) {
			(Some(nodes), Some(cores)) => (nodes, cores),
			_ => return Err(StoreError::MissingCounts),
		};

		let block_count = positive(
			"block_count",
			self.block_count.unwrap_or(DEFAULT_BLOCK_COUNT),
		)?;
		let block_size = positive(
			"block_size",
			self.block_size.unwrap_or(DEFAULT_BLOCK_SIZE),
		)?;

		let report_path = self
			.report_path
			.unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));
		if report_path.as_os_str().is_empty() {
			return Err(StoreError::InvalidSetting {
				name: "report_path",
				reason: "must not be empty".to_string(),
			});
		}

		let displacement = self.displacement.unwrap_or_default();
		if let DisplacementMode::Fixed(value) = displacement {
			if !value.is_finite() {
				return Err(StoreError::InvalidSetting {
					name: "displacement",
					reason: format!("fixed value {} is not finite", value),
				});
			}
		}

		Ok(BenchConfig {
			block_count,
			block_size,
			node_count,
			core_count,
			report_path,
			displacement,
			workload: self.workload.unwrap_or_default(),
			seed: self.seed,
		})
	}
}

fn positive(
	name: &'static str,
	value: u32,
) -> Result<u32> {
	if value == 0 {
		Err(StoreError::InvalidSetting {
			name,
			reason: "must be a positive integer".to_string(),
		})
	} else {
		Ok(value)
	}
}

/// Validated benchmark configuration.
///
/// Built once at startup and handed by reference to every component.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
	block_count: u32,
	block_size: u32,
	node_count: u32,
	core_count: u32,
	report_path: PathBuf,
	displacement: DisplacementMode,
	workload: WorkloadKind,
	seed: Option<u64>,
}

impl BenchConfig {
	pub fn block_count(&self) -> u32 {
		self.block_count
	}

	pub fn block_size(&self) -> u32 {
		self.block_size
	}

	pub fn node_count(&self) -> u32 {
		self.node_count
	}

	pub fn core_count(&self) -> u32 {
		self.core_count
	}

	pub fn report_path(&self) -> &Path {
		&self.report_path
	}

	pub fn displacement(&self) -> DisplacementMode {
		self.displacement
	}

	pub fn workload(&self) -> WorkloadKind {
		self.workload
	}

	pub fn seed(&self) -> Option<u64> {
		self.seed
	}
}
