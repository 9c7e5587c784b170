// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use lib_store::Performance;
use std::fmt;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
	Generate,
	Shift,
	Average,
	Reduce,
	Overall,
}

impl Phase {
	pub const ALL: [Phase; 5] = [
		Phase::Generate,
		Phase::Shift,
		Phase::Average,
		Phase::Reduce,
		Phase::Overall,
	];

	pub fn name(&self) -> &'static str {
		match self {
			Phase::Generate => "generate",
			Phase::Shift => "shift",
			Phase::Average => "average",
			Phase::Reduce => "reduce",
			Phase::Overall => "overall",
		}
	}

	fn index(self) -> usize {
		self as usize
	}
}

impl fmt::Display for Phase {
	fn fmt(
		&self,
		f: &mut fmt::Formatter<'_>,
	) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Elapsed seconds per phase.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseDurations([f64; 5]);

impl PhaseDurations {
	pub fn get(
		&self,
		phase: Phase,
	) -> f64 {
		self.0[phase.index()]
	}

	pub fn set(
		&mut self,
		phase: Phase,
		secs: f64,
	) {
		self.0[phase.index()] = secs;
	}

	pub fn from_fn(f: impl FnMut(Phase) -> f64) -> Self {
		Self(Phase::ALL.map(f))
	}
}

impl From<PhaseDurations> for Performance {
	fn from(d: PhaseDurations) -> Self {
		Performance {
			generate: d.get(Phase::Generate),
			shift: d.get(Phase::Shift),
			average: d.get(Phase::Average),
			reduce: d.get(Phase::Reduce),
			overall: d.get(Phase::Overall),
		}
	}
}

/// Wall-clock bracketing for one worker's phases.
///
/// Uses the monotonic clock. Readings are local to the calling worker and
/// never compared across workers.
#[derive(Debug, Default)]
pub struct PhaseTimer {
	started: [Option<Instant>; 5],
	durations: PhaseDurations,
}

impl PhaseTimer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn start(
		&mut self,
		phase: Phase,
	) {
		self.started[phase.index()] = Some(Instant::now());
	}

	/// Records and returns the seconds since `start(phase)`; zero if the
	/// phase was never started.
	pub fn stop(
		&mut self,
		phase: Phase,
	) -> f64 {
		let end = Instant::now();
		let secs = self.started[phase.index()]
			.take()
			.map(|start| end.duration_since(start).as_secs_f64())
			.unwrap_or(0.0);
		self.durations.set(phase, secs);
		secs
	}

	pub fn time<T>(
		&mut self,
		phase: Phase,
		f: impl FnOnce() -> T,
	) -> T {
		self.start(phase);
		let out = f();
		self.stop(phase);
		out
	}

	pub fn durations(&self) -> PhaseDurations {
		self.durations
	}
}
