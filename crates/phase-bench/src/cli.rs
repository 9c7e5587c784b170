// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use crate::error::Result;
use clap::Parser;
use lib_calculator::mgmt::GroupConfig;
use lib_store::{BenchSettings, DisplacementMode, WorkloadKind};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "phase-bench")]
#[command(about = "Phase-timed SPMD micro-benchmark: generate, shift, average, reduce")]
#[command(version)]
pub struct Args {
	/// Number of mega-blocks in the whole workload
	#[arg(short = 'b', long)]
	pub block_count: Option<u32>,

	/// Size of one block in units of 2^20 rows
	#[arg(short = 'k', long)]
	pub block_size: Option<u32>,

	/// Report destination
	#[arg(short = 'j', long = "json", value_name = "PATH")]
	pub report: Option<PathBuf>,

	/// Node count echoed into the report
	#[arg(short = 'n', long)]
	pub nodes: Option<u32>,

	/// Cores per node echoed into the report
	#[arg(short = 'c', long)]
	pub cores: Option<u32>,

	/// Worker group size [default: available parallelism]
	#[arg(long)]
	pub workers: Option<usize>,

	/// JSON settings file; flags given here override it
	#[arg(long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// independent | shared | fixed:<value>
	#[arg(long)]
	pub displacement: Option<DisplacementMode>,

	/// uniform | zeros
	#[arg(long)]
	pub workload: Option<WorkloadKind>,

	/// Base seed; rank r uses seed + r
	#[arg(long)]
	pub seed: Option<u64>,

	/// Pin rank r to core r mod cores
	#[arg(long)]
	pub pin: bool,
}

impl Args {
	/// Settings from `--config` (if any) with the command-line flags on top.
	pub fn settings(&self) -> Result<BenchSettings> {
		let base = match &self.config {
			Some(path) => BenchSettings::from_file(path)?,
			None => BenchSettings::default(),
		};

		Ok(base.merge(BenchSettings {
			block_count: self.block_count,
			block_size: self.block_size,
			node_count: self.nodes,
			core_count: self.cores,
			report_path: self.report.clone(),
			displacement: self.displacement,
			workload: self.workload,
			seed: self.seed,
		}))
	}

	pub fn group(&self) -> GroupConfig {
		let group = GroupConfig::builder().pin_cores(self.pin);
		match self.workers {
			Some(workers) => group.with_workers(workers),
			None => group,
		}
	}
}
