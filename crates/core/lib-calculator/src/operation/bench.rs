// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use super::error::{OpError, Result};
use super::kernels::{average, generate, resolve_displacement, shift, worker_rng, Displacement, Mean};
use super::mgmt::{
	global_durations, global_mean, Communicator, GroupConfig, ThreadError, WorkerGroup, ROOT,
};
use super::partition::Partition;
use super::timer::{Phase, PhaseDurations, PhaseTimer};
use lib_store::{BenchConfig, Report};
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::{debug, info};

/// What the designated rank ends up holding after aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalResult {
	pub mean: Mean,
	pub durations: PhaseDurations,
	pub report: Report,
}

/// One rank's view of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerOutcome {
	pub rank: usize,
	pub partition: Partition,
	pub displacement: Displacement,
	pub local_mean: Mean,
	pub local_durations: PhaseDurations,
	/// `Some` on [`ROOT`] only.
	pub global: Option<GlobalResult>,
}

/// A validated configuration bound to a worker group.
#[derive(Debug)]
pub struct Benchmark {
	cfg: BenchConfig,
	group: WorkerGroup,
}

impl Benchmark {
	/// Checks the partition arithmetic up front so an impossible workload
	/// fails before any worker starts.
	pub fn new(
		cfg: BenchConfig,
		group: GroupConfig,
	) -> Result<Self> {
		let group = group.build()?;
		let partition = Partition::for_config(&cfg, group.size())?;
		partition.rows()?;

		info!(
			workers = group.size(),
			nodes = cfg.node_count(),
			cores = cfg.core_count(),
			block_per_rank = partition.block_per_rank,
			displacement = %cfg.displacement(),
			workload = %cfg.workload(),
			"benchmark configured"
		);
		Ok(Self { cfg, group })
	}

	/// Runs on stdout.
	pub fn run(&self) -> Result<Vec<WorkerOutcome>> {
		self.run_with(io::stdout())
	}

	/// Runs every rank and returns the outcomes in rank order.
	///
	/// When ranks fail, the error of the rank that caused the abort is
	/// returned rather than what its peers observed.
	pub fn run_with<W: Write + Send>(
		&self,
		out: W,
	) -> Result<Vec<WorkerOutcome>> {
		let out = Mutex::new(out);
		let results = self.group.run(|comm| run_worker(&self.cfg, comm, &out))?;
		root_cause(results)
	}
}

/// How directly an error describes what went wrong. Peers of a failing rank
/// see the abort or, at worst, a closed channel.
fn directness(err: &OpError) -> u8 {
	match err {
		OpError::Thread(ThreadError::GroupAborted { .. }) => 0,
		OpError::Thread(ThreadError::SendError { .. } | ThreadError::RecvError) => 1,
		_ => 2,
	}
}

/// Per-rank results in rank order, or the most direct error among them.
fn root_cause<T>(results: Vec<Result<T>>) -> Result<Vec<T>> {
	let mut values = Vec::with_capacity(results.len());
	let mut cause: Option<OpError> = None;

	for result in results {
		match result {
			Ok(value) => values.push(value),
			Err(e) => {
				if cause.as_ref().map_or(true, |c| directness(&e) > directness(c)) {
					cause = Some(e);
				}
			},
		}
	}

	match cause {
		Some(e) => Err(e),
		None => Ok(values),
	}
}

/// The per-rank program.
///
/// Every rank goes through the same collectives in the same order: the
/// optional displacement broadcast, the mean reduction, five duration
/// reductions and the closing barrier. Only [`ROOT`] touches `out` and the
/// report file.
pub fn run_worker<W: Write>(
	cfg: &BenchConfig,
	comm: &mut Communicator,
	out: &Mutex<W>,
) -> Result<WorkerOutcome> {
	let rank = comm.rank();
	let partition = Partition::for_config(cfg, comm.size())?;
	if rank == ROOT {
		debug!(
			total_rows = partition.total_rows,
			block_per_rank = partition.block_per_rank,
			dropped_rows = partition.dropped_rows(),
			"partition planned"
		);
	}
	let rows = partition.rows()?;

	let mut rng = worker_rng(cfg.seed(), rank);
	let displacement = resolve_displacement(cfg.displacement(), &mut rng, comm)?;

	let mut timer = PhaseTimer::new();
	timer.start(Phase::Overall);

	let mut block = timer.time(Phase::Generate, || {
		generate(cfg.workload(), rows, rank, &mut rng)
	})?;
	timer.time(Phase::Shift, || shift(&mut block, &displacement));
	let local_mean = timer.time(Phase::Average, || average(&block));
	drop(block);

	let mean = timer.time(Phase::Reduce, || global_mean(comm, &local_mean))?;
	timer.stop(Phase::Overall);

	let local_durations = timer.durations();
	debug!(rank, rows, ?local_mean, "local phases done");
	let durations = global_durations(comm, &local_durations)?;

	let global = match (mean, durations) {
		(Some(mean), Some(durations)) => {
			for phase in Phase::ALL {
				info!(%phase, secs = durations.get(phase), "slowest rank");
			}
			info!(x = mean[0], y = mean[1], z = mean[2], "global mean");

			let report = Report::new(cfg, partition.block_per_rank, durations.into());
			let mut out = out.lock()?;
			lib_store::emit(&report, cfg.report_path(), &mut *out)?;

			Some(GlobalResult {
				mean,
				durations,
				report,
			})
		},
		_ => None,
	};

	comm.barrier()?;

	Ok(WorkerOutcome {
		rank,
		partition,
		displacement,
		local_mean,
		local_durations,
		global,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::block::BLOCK_DIM;
	use crate::operation::mgmt::ReduceOp;
	use lib_store::{BenchSettings, DisplacementMode, StoreError, WorkloadKind};
	use std::path::Path;

	fn settings(report: &Path) -> BenchSettings {
		BenchSettings {
			block_count: Some(1),
			block_size: Some(1),
			node_count: Some(1),
			core_count: Some(4),
			report_path: Some(report.to_path_buf()),
			displacement: Some(DisplacementMode::Fixed(50.0)),
			workload: Some(WorkloadKind::Zeros),
			seed: Some(42),
		}
	}

	fn bench(
		settings: BenchSettings,
		workers: usize,
	) -> Benchmark {
		Benchmark::new(
			settings.validate().unwrap(),
			GroupConfig::builder().with_workers(workers),
		)
		.unwrap()
	}

	#[test]
	fn test_zero_workload_fixed_shift() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("report.json");
		let mut out = Vec::new();

		let outcomes = bench(settings(&path), 4).run_with(&mut out).unwrap();

		assert_eq!(outcomes.len(), 4);
		for (rank, outcome) in outcomes.iter().enumerate() {
			assert_eq!(outcome.rank, rank);
			assert_eq!(outcome.partition.block_per_rank, 262_144);
			assert_eq!(outcome.local_mean, [50.0; BLOCK_DIM]);
			assert_eq!(outcome.global.is_some(), rank == ROOT);
		}

		let global = outcomes[ROOT].global.as_ref().unwrap();
		assert_eq!(global.mean, [50.0; BLOCK_DIM]);
		for phase in Phase::ALL {
			let slowest = outcomes
				.iter()
				.map(|o| o.local_durations.get(phase))
				.fold(0.0, f64::max);
			assert_eq!(global.durations.get(phase), slowest);
		}

		let written = Report::load(&path).unwrap();
		assert_eq!(written, global.report);
		assert_eq!(written.args.block_per_rank, 262_144);
		assert_eq!(written.args.cores, 4);
		assert_eq!(written.args.nodes, 1);

		let stdout = String::from_utf8(out).unwrap();
		assert!(stdout.starts_with("Generate : "));
		assert!(stdout.ends_with(&format!("\n--> {}\n\n", path.display())));
	}

	#[test]
	fn test_shared_displacement_everywhere() {
		let dir = tempfile::tempdir().unwrap();
		let mut s = settings(&dir.path().join("report.json"));
		s.displacement = Some(DisplacementMode::Shared);

		let outcomes = bench(s, 3).run_with(io::sink()).unwrap();

		let d = outcomes[ROOT].displacement;
		assert!(outcomes.iter().all(|o| o.displacement == d));
		let expected = d.0.map(f64::from);
		assert_eq!(outcomes[ROOT].global.as_ref().unwrap().mean, expected);
	}

	#[test]
	fn test_uniform_workload_mean_near_displacement() {
		let dir = tempfile::tempdir().unwrap();
		let mut s = settings(&dir.path().join("report.json"));
		s.workload = Some(WorkloadKind::Uniform);

		let outcomes = bench(s, 2).run_with(io::sink()).unwrap();

		let mean = outcomes[ROOT].global.as_ref().unwrap().mean;
		assert!(mean.iter().all(|m| (m - 50.0).abs() < 5.0), "{:?}", mean);
	}

	#[test]
	fn test_remainder_rows_dropped() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("report.json");

		// 2^20 rows over 3 workers drops one row.
		let outcomes = bench(settings(&path), 3).run_with(io::sink()).unwrap();
		assert_eq!(outcomes[0].partition.block_per_rank, 349_525);
		assert_eq!(outcomes[0].partition.dropped_rows(), 1);
	}

	#[test]
	fn test_unwritable_report_aborts_group() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("missing").join("report.json");

		let err = bench(settings(&path), 4).run_with(io::sink()).unwrap_err();

		assert!(matches!(err, OpError::Report(StoreError::IOError(_))), "{:?}", err);
		assert!(!path.exists());
	}

	#[test]
	fn test_partition_overflow_rejected_before_launch() {
		let dir = tempfile::tempdir().unwrap();
		let mut s = settings(&dir.path().join("report.json"));
		s.block_count = Some(u32::MAX);
		s.block_size = Some(u32::MAX);

		let err = Benchmark::new(s.validate().unwrap(), GroupConfig::builder().with_workers(1))
			.unwrap_err();
		assert!(matches!(err, OpError::PartitionOverflow { .. }));
	}

	#[test]
	fn test_failing_rank_reported_over_late_peer() {
		let group = GroupConfig::builder().with_workers(3).build().unwrap();
		let results = group
			.run(|comm| -> Result<()> {
				match comm.rank() {
					2 => Err(OpError::AllocationError {
						rank: 2,
						requested_bytes: 1 << 40,
					}),
					1 => {
						std::thread::sleep(std::time::Duration::from_millis(300));
						comm.reduce(&[1.0], ReduceOp::Sum, ROOT)?;
						Ok(())
					},
					_ => {
						comm.reduce(&[1.0], ReduceOp::Sum, ROOT)?;
						Ok(())
					},
				}
			})
			.unwrap();

		assert!(matches!(
			results[1],
			Err(OpError::Thread(ThreadError::GroupAborted { .. }))
		));
		let err = root_cause(results).unwrap_err();
		assert!(
			matches!(err, OpError::AllocationError { rank: 2, requested_bytes } if requested_bytes == 1 << 40),
			"{:?}",
			err
		);
	}

	#[test]
	fn test_root_cause_ranks_transport_errors_below_origin() {
		let results: Vec<Result<()>> = vec![
			Err(ThreadError::GroupAborted {
				rank: 1,
				reason: "out of memory".to_string(),
			}
			.into()),
			Err(ThreadError::SendError { to: 0 }.into()),
			Err(OpError::RowsExceedAddressSpace { rows: u64::MAX }),
		];
		assert!(matches!(
			root_cause(results).unwrap_err(),
			OpError::RowsExceedAddressSpace { .. }
		));

		let results: Vec<Result<()>> = vec![
			Err(ThreadError::GroupAborted {
				rank: 1,
				reason: "gone".to_string(),
			}
			.into()),
			Err(ThreadError::RecvError.into()),
		];
		assert!(matches!(
			root_cause(results).unwrap_err(),
			OpError::Thread(ThreadError::RecvError)
		));

		assert_eq!(root_cause(vec![Ok(1), Ok(2)]).unwrap(), vec![1, 2]);
	}
}
