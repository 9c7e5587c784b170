// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use super::collective::{AbortHandle, Communicator};
use super::config::GroupConfig;
use super::error::{Result, ThreadError};
use core_affinity::CoreId;
use std::fmt;
use std::thread;
use tracing::{debug, error, warn};

/// A fixed-size SPMD group: every rank runs the same closure on its own
/// thread and meets the others only inside collectives.
#[derive(Debug)]
pub struct WorkerGroup {
	config: GroupConfig,
}

struct AbortOnPanic(AbortHandle);

impl Drop for AbortOnPanic {
	fn drop(&mut self) {
		if thread::panicking() {
			self.0.abort("worker panicked");
		}
	}
}

impl WorkerGroup {
	pub(crate) fn new(config: GroupConfig) -> Self {
		Self { config }
	}

	pub fn size(&self) -> usize {
		self.config.workers()
	}

	/// Runs `work` once per rank and returns the per-rank results in rank
	/// order.
	///
	/// A rank whose `work` fails aborts the whole group, so peers blocked in
	/// a collective return instead of waiting forever.
	pub fn run<T, E, F>(
		&self,
		work: F,
	) -> Result<Vec<core::result::Result<T, E>>>
	where
		T: Send,
		E: fmt::Display + Send,
		F: Fn(&mut Communicator) -> core::result::Result<T, E> + Sync,
	{
		let comms = Communicator::group(self.size())?;
		let cores = self.cores();
		let work = &work;

		thread::scope(|scope| {
			let mut handles = Vec::with_capacity(comms.len());

			for mut comm in comms {
				let rank = comm.rank();
				let abort = comm.abort_handle();
				let core = (!cores.is_empty()).then(|| cores[rank % cores.len()]);

				let spawned = thread::Builder::new()
					.name(format!("{}-{}", self.config.thread_prefix(), rank))
					.spawn_scoped(scope, move || {
						if let Some(core) = core {
							pin(rank, core);
						}

						let _guard = AbortOnPanic(comm.abort_handle());
						let result = work(&mut comm);
						if let Err(e) = &result {
							error!(rank, error = %e, "worker failed, aborting group");
							comm.abort(&e.to_string());
						}
						result
					});

				match spawned {
					Ok(handle) => handles.push(handle),
					Err(e) => {
						abort.abort("worker thread could not be spawned");
						return Err(ThreadError::SpawnError {
							rank,
							message: e.to_string(),
						});
					},
				}
			}

			let mut results = Vec::with_capacity(handles.len());
			let mut panicked = None;
			for (rank, handle) in handles.into_iter().enumerate() {
				match handle.join() {
					Ok(result) => results.push(result),
					Err(_) => {
						panicked.get_or_insert(rank);
					},
				}
			}

			match panicked {
				Some(rank) => Err(ThreadError::WorkerPanic { rank }),
				None => Ok(results),
			}
		})
	}

	fn cores(&self) -> Vec<CoreId> {
		if !self.config.pinned() {
			return Vec::new();
		}

		let cores = core_affinity::get_core_ids().unwrap_or_default();
		if cores.is_empty() {
			warn!("core pinning requested but no core ids are available");
		}
		cores
	}
}

fn pin(
	rank: usize,
	core: CoreId,
) {
	if core_affinity::set_for_current(core) {
		debug!(rank, core = core.id, "worker pinned");
	} else {
		warn!(rank, core = core.id, "worker failed to pin");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::operation::mgmt::ReduceOp;

	fn group(workers: usize) -> WorkerGroup {
		GroupConfig::builder().with_workers(workers).build().unwrap()
	}

	#[test]
	fn test_results_in_rank_order() {
		let results = group(5)
			.run(|comm| Ok::<_, ThreadError>(comm.rank() * 10))
			.unwrap();

		let ranks: Vec<usize> = results.into_iter().map(|r| r.unwrap()).collect();
		assert_eq!(ranks, vec![0, 10, 20, 30, 40]);
	}

	#[test]
	fn test_threads_are_named() {
		let names = GroupConfig::builder()
			.with_workers(2)
			.with_thread_prefix("phase")
			.build()
			.unwrap()
			.run(|_| {
				Ok::<_, ThreadError>(thread::current().name().map(str::to_string))
			})
			.unwrap();

		assert_eq!(names[0].as_ref().unwrap(), &Some("phase-0".to_string()));
		assert_eq!(names[1].as_ref().unwrap(), &Some("phase-1".to_string()));
	}

	#[test]
	fn test_failing_worker_aborts_peers() {
		let results = group(4)
			.run(|comm| {
				if comm.rank() == 3 {
					return Err(ThreadError::ProtocolError {
						rank: 3,
						detail: "out of memory".to_string(),
					});
				}
				comm.reduce(&[1.0], ReduceOp::Sum, 0)?;
				comm.barrier()
			})
			.unwrap();

		assert!(matches!(
			results[3],
			Err(ThreadError::ProtocolError { rank: 3, .. })
		));
		assert!(matches!(
			results[0],
			Err(ThreadError::GroupAborted { rank: 3, .. })
		));
		// Every aborted rank relays the abort, so the rest may hear it second hand.
		for result in &results[1..3] {
			assert!(matches!(
				result,
				Err(ThreadError::GroupAborted { .. })
			));
		}
	}

	#[test]
	fn test_panicking_worker_reported() {
		let result = group(3).run(|comm| {
			if comm.rank() == 1 {
				panic!("boom");
			}
			comm.barrier()
		});

		assert!(matches!(
			result,
			Err(ThreadError::WorkerPanic { rank: 1 })
		));
	}

	#[test]
	fn test_pinned_group_still_runs() {
		let results = GroupConfig::builder()
			.with_workers(2)
			.pin_cores(true)
			.build()
			.unwrap()
			.run(|comm| comm.barrier())
			.unwrap();

		assert!(results.iter().all(|r| r.is_ok()));
	}
}
