// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use serde_json::Error as SerdeError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
	#[error("Node and core counts must be specified!")]
	MissingCounts,
	#[error("Invalid setting '{name}': {reason}")]
	InvalidSetting { name: &'static str, reason: String },
	#[error("Config version '{found}' is not supported, expected '{expected}'")]
	InvalidConfig { found: String, expected: String },
	#[error("Unknown {kind} mode '{value}'")]
	UnknownMode { kind: &'static str, value: String },
	#[error("Couldn't read config file {path}: {source}")]
	ConfigFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error(transparent)]
	SerdeJsonError(#[from] SerdeError),
	#[error("I/O error: {0}")]
	IOError(#[from] std::io::Error),
	#[error("Couldn't persist report to {path}: {source}")]
	ReportPersist {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

impl StoreError {
	/// Configuration problems are detected before any worker starts.
	pub fn is_config(&self) -> bool {
		matches!(
			self,
			StoreError::MissingCounts
				| StoreError::InvalidSetting { .. }
				| StoreError::InvalidConfig { .. }
				| StoreError::UnknownMode { .. }
				| StoreError::ConfigFile { .. }
				| StoreError::SerdeJsonError(_)
		)
	}
}
