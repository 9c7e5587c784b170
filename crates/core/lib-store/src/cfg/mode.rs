// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use crate::error::StoreError;

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// How each worker obtains its displacement vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplacementMode {
	/// Every rank draws its own vector from its own stream.
	#[default]
	Independent,
	/// Rank 0 draws once and broadcasts before the timed phases.
	Shared,
	/// Every component equals the given value on every rank.
	Fixed(f32),
}

/// Content of the local block before the shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadKind {
	/// Uniform samples over `[-1000, 1000)`.
	#[default]
	Uniform,
	/// All-zero block, generation disabled.
	Zeros,
}

impl FromStr for DisplacementMode {
	type Err = StoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let unknown = || StoreError::UnknownMode {
			kind: "displacement",
			value: s.to_string(),
		};

		match s.trim().to_ascii_lowercase().as_str() {
			"independent" => Ok(DisplacementMode::Independent),
			"shared" => Ok(DisplacementMode::Shared),
			other => {
				let value = other.strip_prefix("fixed:").ok_or_else(unknown)?;
				value
					.trim()
					.parse::<f32>()
					.map(DisplacementMode::Fixed)
					.map_err(|_| unknown())
			},
		}
	}
}

impl fmt::Display for DisplacementMode {
	fn fmt(
		&self,
		f: &mut fmt::Formatter<'_>,
	) -> fmt::Result {
		match self {
			DisplacementMode::Independent => write!(f, "independent"),
			DisplacementMode::Shared => write!(f, "shared"),
			DisplacementMode::Fixed(value) => write!(f, "fixed:{}", value),
		}
	}
}

impl FromStr for WorkloadKind {
	type Err = StoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"uniform" => Ok(WorkloadKind::Uniform),
			"zeros" => Ok(WorkloadKind::Zeros),
			_ => Err(StoreError::UnknownMode {
				kind: "workload",
				value: s.to_string(),
			}),
		}
	}
}

impl fmt::Display for WorkloadKind {
	fn fmt(
		&self,
		f: &mut fmt::Formatter<'_>,
	) -> fmt::Result {
		match self {
			WorkloadKind::Uniform => write!(f, "uniform"),
			WorkloadKind::Zeros => write!(f, "zeros"),
		}
	}
}
