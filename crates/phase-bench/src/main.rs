// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

mod cli;
mod error;

use clap::Parser;
use cli::Args;
use error::Result;
use lib_calculator::Benchmark;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "phase_bench=info,lib_calculator=info,lib_store=info";

fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
		)
		.with_writer(std::io::stderr)
		.init();

	match run(Args::parse()) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			let code = e.exit_code();
			debug!(exit_code = code, error = ?e, "run failed");
			eprintln!("{}", e);
			ExitCode::from(code)
		},
	}
}

fn run(args: Args) -> Result<()> {
	let cfg = args.settings()?.validate()?;
	let bench = Benchmark::new(cfg, args.group())?;
	bench.run()?;
	Ok(())
}
