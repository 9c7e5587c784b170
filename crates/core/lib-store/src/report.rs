// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

//! Benchmark report document and its single-writer emission.

use crate::cfg::BenchConfig;
use crate::error::{Result, StoreError};

use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const REPORT_DECIMALS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
	pub args: ReportArgs,
	pub performance: Performance,
}

/// Configuration echo. Field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportArgs {
	pub block_size: u32,
	pub block: u32,
	pub block_per_rank: u64,
	pub cores: u32,
	pub nodes: u32,
}

/// Group-wide worst-case phase durations in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Performance {
	pub generate: f64,
	pub shift: f64,
	pub average: f64,
	pub reduce: f64,
	pub overall: f64,
}

impl Report {
	pub fn new(
		cfg: &BenchConfig,
		block_per_rank: u64,
		performance: Performance,
	) -> Self {
		Self {
			args: ReportArgs {
				block_size: cfg.block_size(),
				block: cfg.block_count(),
				block_per_rank,
				cores: cfg.core_count(),
				nodes: cfg.node_count(),
			},
			performance,
		}
	}

	/// Serialized document, tab indented, floats fixed to eight decimals.
	pub fn render(&self) -> Result<Vec<u8>> {
		let mut buf = Vec::with_capacity(512);
		let formatter = FixedPrecision {
			pretty: PrettyFormatter::with_indent(b"\t"),
			decimals: REPORT_DECIMALS,
		};
		let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
		self.serialize(&mut ser)?;
		buf.push(b'\n');
		Ok(buf)
	}

	pub fn write_summary<W: Write>(
		&self,
		out: &mut W,
	) -> io::Result<()> {
		let perf = &self.performance;
		let d = REPORT_DECIMALS;
		writeln!(out, "Generate : {:.*} s", d, perf.generate)?;
		writeln!(out, "Shift    : {:.*} s", d, perf.shift)?;
		writeln!(out, "Average  : {:.*} s", d, perf.average)?;
		writeln!(out, "Reduce   : {:.*} s", d, perf.reduce)?;
		writeln!(out, "Overall  : {:.*} s", d, perf.overall)?;
		Ok(())
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let raw = fs::read(path)?;
		Ok(serde_json::from_slice(&raw)?)
	}
}

/// Prints the summary to `out`, then replaces whatever lives at `path`
/// with the rendered report.
///
/// The document is rendered and staged in a temporary file next to the
/// destination first, then renamed over it. Until that rename the previous
/// report is left alone, so a failure never leaves a half-written or
/// missing report behind.
pub fn emit<W: Write>(
	report: &Report,
	path: &Path,
	out: &mut W,
) -> Result<()> {
	report.write_summary(out)?;

	let bytes = report.render()?;
	let staged = stage(path, &bytes)?;

	if fs::symlink_metadata(path).is_ok() {
		debug!(path = %path.display(), "replacing previous report");
	}

	// The rename swaps the old report out in one step.
	staged
		.persist(path)
		.map_err(|e| StoreError::ReportPersist {
			path: path.to_path_buf(),
			source: e.error,
		})?;

	writeln!(out, "\n--> {}\n", path.display())?;
	out.flush()?;
	info!(path = %path.display(), bytes = bytes.len(), "report written");
	Ok(())
}

fn stage(
	path: &Path,
	bytes: &[u8],
) -> Result<NamedTempFile> {
	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	let mut staged = NamedTempFile::new_in(dir)?;
	staged.write_all(bytes)?;
	staged.as_file().sync_all()?;
	Ok(staged)
}

struct FixedPrecision<'a> {
	pretty: PrettyFormatter<'a>,
	decimals: usize,
}

impl Formatter for FixedPrecision<'_> {
	fn write_f64<W: ?Sized + Write>(
		&mut self,
		writer: &mut W,
		value: f64,
	) -> io::Result<()> {
		write!(writer, "{:.*}", self.decimals, value)
	}

	fn write_f32<W: ?Sized + Write>(
		&mut self,
		writer: &mut W,
		value: f32,
	) -> io::Result<()> {
		write!(writer, "{:.*}", self.decimals, value)
	}

	fn begin_array<W: ?Sized + Write>(
		&mut self,
		writer: &mut W,
	) -> io::Result<()> {
		self.pretty.begin_array(writer)
	}

	fn end_array<W: ?Sized + Write>(
		&mut self,
		writer: &mut W,
	) -> io::Result<()> {
		self.pretty.end_array(writer)
	}

	fn begin_array_value<W: ?Sized + Write>(
		&mut self,
		writer: &mut W,
		first: bool,
	) -> io::Result<()> {
		self.pretty.begin_array_value(writer, first)
	}

	fn end_array_value<W: ?Sized + Write>(
		&mut self,
		writer: &mut W,
	) -> io::Result<()> {
		self.pretty.end_array_value(writer)
	}

	fn begin_object<W: ?Sized + Write>(
		&mut self,
		writer: &mut W,
	) -> io::Result<()> {
		self.pretty.begin_object(writer)
	}

	fn end_object<W: ?Sized + Write>(
		&mut self,
		writer: &mut W,
	) -> io::Result<()> {
		self.pretty.end_object(writer)
	}

	fn begin_object_key<W: ?Sized + Write>(
		&mut self,
		writer: &mut W,
		first: bool,
	) -> io::Result<()> {
		self.pretty.begin_object_key(writer, first)
	}

	fn begin_object_value<W: ?Sized + Write>(
		&mut self,
		writer: &mut W,
	) -> io::Result<()> {
		self.pretty.begin_object_value(writer)
	}

	fn end_object_value<W: ?Sized + Write>(
		&mut self,
		writer: &mut W,
	) -> io::Result<()> {
		self.pretty.end_object_value(writer)
	}
}
