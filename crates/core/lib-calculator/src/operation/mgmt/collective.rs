// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use super::error::{Result, ThreadError};
use crossbeam::channel::{unbounded, Receiver, Sender};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
	Sum,
	Max,
}

impl ReduceOp {
	fn combine(
		self,
		acc: &mut [f64],
		other: &[f64],
	) {
		match self {
			ReduceOp::Sum => acc.iter_mut().zip(other).for_each(|(a, b)| *a += b),
			ReduceOp::Max => acc
				.iter_mut()
				.zip(other)
				.for_each(|(a, b)| *a = a.max(*b)),
		}
	}
}

#[derive(Debug)]
enum Envelope {
	Contribute {
		from: usize,
		seq: u64,
		payload: Vec<f64>,
	},
	Release {
		seq: u64,
	},
	Broadcast {
		seq: u64,
		payload: Vec<f64>,
	},
	Abort {
		from: usize,
		reason: String,
	},
}

impl Envelope {
	fn seq(&self) -> Option<u64> {
		match self {
			Envelope::Contribute { seq, .. }
			| Envelope::Release { seq }
			| Envelope::Broadcast { seq, .. } => Some(*seq),
			Envelope::Abort { .. } => None,
		}
	}
}

/// One rank's endpoint into the worker group.
///
/// Collectives must be entered in the same order on every rank. Each call
/// bumps a sequence number carried by every message so that a fast rank's
/// contribution to the next collective is held back instead of being
/// mistaken for the current one.
pub struct Communicator {
	rank: usize,
	size: usize,
	seq: u64,
	peers: Vec<Sender<Envelope>>,
	inbox: Receiver<Envelope>,
	stash: VecDeque<Envelope>,
	aborted: Option<(usize, String)>,
}

/// Detached handle that can tear the group down without borrowing the
/// communicator.
#[derive(Clone)]
pub struct AbortHandle {
	rank: usize,
	peers: Vec<Sender<Envelope>>,
}

impl AbortHandle {
	pub fn abort(
		&self,
		reason: &str,
	) {
		for (to, peer) in self.peers.iter().enumerate() {
			if to == self.rank {
				continue;
			}
			// A peer that already finished has dropped its inbox.
			let _ = peer.send(Envelope::Abort {
				from: self.rank,
				reason: reason.to_string(),
			});
		}
	}
}

impl Communicator {
	/// Wires up `size` communicators, one per rank, in rank order.
	pub fn group(size: usize) -> Result<Vec<Communicator>> {
		if size == 0 {
			return Err(ThreadError::EmptyGroup);
		}

		let (senders, receivers): (Vec<_>, Vec<_>) = (0..size).map(|_| unbounded()).unzip();

		Ok(receivers
			.into_iter()
			.enumerate()
			.map(|(rank, inbox)| Communicator {
				rank,
				size,
				seq: 0,
				peers: senders.clone(),
				inbox,
				stash: VecDeque::new(),
				aborted: None,
			})
			.collect())
	}

	pub fn rank(&self) -> usize {
		self.rank
	}

	pub fn size(&self) -> usize {
		self.size
	}

	pub fn abort_handle(&self) -> AbortHandle {
		AbortHandle {
			rank: self.rank,
			peers: self.peers.clone(),
		}
	}

	/// Tells every other rank to give up on the collective protocol.
	pub fn abort(
		&self,
		reason: &str,
	) {
		self.abort_handle().abort(reason);
	}

	/// Combines one equal-length vector per rank with `op`.
	///
	/// Returns `Some(result)` on `root` and `None` everywhere else. The root
	/// folds contributions in rank order and releases the other ranks only
	/// after every contribution arrived, so the call doubles as a barrier.
	pub fn reduce(
		&mut self,
		values: &[f64],
		op: ReduceOp,
		root: usize,
	) -> Result<Option<Vec<f64>>> {
		self.validate_root(root)?;
		self.check_aborted()?;
		let seq = self.next_seq();

		if self.rank != root {
			self.send(
				root,
				Envelope::Contribute {
					from: self.rank,
					seq,
					payload: values.to_vec(),
				},
			)?;

			return match self.recv_for(seq)? {
				Envelope::Release { .. } => Ok(None),
				other => Err(self.unexpected(&other, "release")),
			};
		}

		let mut slots: Vec<Option<Vec<f64>>> = vec![None; self.size];
		slots[root] = Some(values.to_vec());
		let mut pending = self.size - 1;

		while pending > 0 {
			match self.recv_for(seq)? {
				Envelope::Contribute { from, payload, .. } => {
					if payload.len() != values.len() {
						return Err(ThreadError::LengthMismatch {
							rank: from,
							expected: values.len(),
							actual: payload.len(),
						});
					}
					let slot = slots.get_mut(from).ok_or_else(|| ThreadError::ProtocolError {
						rank: self.rank,
						detail: format!("contribution from unknown rank {}", from),
					})?;
					if slot.replace(payload).is_some() {
						return Err(ThreadError::ProtocolError {
							rank: self.rank,
							detail: format!("rank {} contributed twice", from),
						});
					}
					pending -= 1;
				},
				other => return Err(self.unexpected(&other, "contribution")),
			}
		}

		let mut contributions = slots.into_iter().flatten();
		let mut combined = contributions.next().unwrap_or_default();
		for contribution in contributions {
			op.combine(&mut combined, &contribution);
		}

		for to in (0..self.size).filter(|&to| to != root) {
			self.send(to, Envelope::Release { seq })?;
		}

		Ok(Some(combined))
	}

	/// Replaces `values` on every rank with the root's copy.
	pub fn broadcast(
		&mut self,
		values: &mut Vec<f64>,
		root: usize,
	) -> Result<()> {
		self.validate_root(root)?;
		self.check_aborted()?;
		let seq = self.next_seq();

		if self.rank == root {
			for to in (0..self.size).filter(|&to| to != root) {
				self.send(
					to,
					Envelope::Broadcast {
						seq,
						payload: values.clone(),
					},
				)?;
			}
			return Ok(());
		}

		match self.recv_for(seq)? {
			Envelope::Broadcast { payload, .. } => {
				*values = payload;
				Ok(())
			},
			other => Err(self.unexpected(&other, "broadcast")),
		}
	}

	pub fn barrier(&mut self) -> Result<()> {
		self.reduce(&[], ReduceOp::Sum, 0).map(|_| ())
	}

	fn next_seq(&mut self) -> u64 {
		self.seq += 1;
		self.seq
	}

	fn validate_root(
		&self,
		root: usize,
	) -> Result<()> {
		if root >= self.size {
			return Err(ThreadError::InvalidRoot {
				root,
				max: self.size - 1,
			});
		}
		Ok(())
	}

	/// Fails if the group was torn down, including by an abort notice still
	/// sitting unread in the inbox.
	fn check_aborted(&mut self) -> Result<()> {
		self.drain_pending();
		match &self.aborted {
			Some((rank, reason)) => Err(ThreadError::GroupAborted {
				rank: *rank,
				reason: reason.clone(),
			}),
			None => Ok(()),
		}
	}

	/// Moves everything already delivered into the stash, stopping at the
	/// first abort notice.
	fn drain_pending(&mut self) {
		if self.aborted.is_some() {
			return;
		}
		while let Ok(envelope) = self.inbox.try_recv() {
			match envelope {
				Envelope::Abort { from, reason } => {
					self.aborted = Some((from, reason));
					return;
				},
				other => self.stash.push_back(other),
			}
		}
	}

	/// A peer only drops its inbox after finishing or after notifying the
	/// group, so a failed send is reported as the abort when one is pending.
	fn send(
		&mut self,
		to: usize,
		envelope: Envelope,
	) -> Result<()> {
		if self.peers[to].send(envelope).is_ok() {
			return Ok(());
		}
		match self.check_aborted() {
			Err(aborted) => Err(aborted),
			Ok(()) => Err(ThreadError::SendError { to }),
		}
	}

	fn recv_for(
		&mut self,
		seq: u64,
	) -> Result<Envelope> {
		self.check_aborted()?;

		if let Some(pos) = self.stash.iter().position(|e| e.seq() == Some(seq)) {
			if let Some(envelope) = self.stash.remove(pos) {
				return Ok(envelope);
			}
		}

		loop {
			let envelope = self.inbox.recv()?;
			match envelope.seq() {
				None => {
					if let Envelope::Abort { from, reason } = envelope {
						self.aborted = Some((from, reason.clone()));
						return Err(ThreadError::GroupAborted { rank: from, reason });
					}
				},
				Some(s) if s == seq => return Ok(envelope),
				Some(s) if s > seq => self.stash.push_back(envelope),
				Some(s) => {
					return Err(ThreadError::ProtocolError {
						rank: self.rank,
						detail: format!("stale message for collective {} while in {}", s, seq),
					})
				},
			}
		}
	}

	fn unexpected(
		&self,
		envelope: &Envelope,
		wanted: &str,
	) -> ThreadError {
		ThreadError::ProtocolError {
			rank: self.rank,
			detail: format!("expected {}, got {:?}", wanted, envelope),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::thread;

	fn spawn_all<T, F>(
		size: usize,
		f: F,
	) -> Vec<T>
	where
		T: Send,
		F: Fn(&mut Communicator) -> T + Sync,
	{
		let comms = Communicator::group(size).unwrap();
		let f = &f;
		thread::scope(|scope| {
			let handles: Vec<_> = comms
				.into_iter()
				.map(|mut comm| scope.spawn(move || f(&mut comm)))
				.collect();
			handles.into_iter().map(|h| h.join().unwrap()).collect()
		})
	}

	#[test]
	fn test_empty_group_rejected() {
		assert!(matches!(
			Communicator::group(0),
			Err(ThreadError::EmptyGroup)
		));
	}

	#[test]
	fn test_reduce_sum_on_root_only() {
		let results = spawn_all(4, |comm| {
			let rank = comm.rank() as f64;
			comm.reduce(&[rank, 1.0], ReduceOp::Sum, 0).unwrap()
		});

		assert_eq!(results[0], Some(vec![6.0, 4.0]));
		assert!(results[1..].iter().all(Option::is_none));
	}

	#[test]
	fn test_reduce_max_non_zero_root() {
		let results = spawn_all(3, |comm| {
			let value = [2.5, 7.0, -1.0][comm.rank()];
			comm.reduce(&[value], ReduceOp::Max, 2).unwrap()
		});

		assert_eq!(results[2], Some(vec![7.0]));
		assert!(results[0].is_none());
	}

	#[test]
	fn test_single_worker_group() {
		let results = spawn_all(1, |comm| {
			let sum = comm.reduce(&[3.0], ReduceOp::Sum, 0).unwrap();
			comm.barrier().unwrap();
			sum
		});

		assert_eq!(results, vec![Some(vec![3.0])]);
	}

	#[test]
	fn test_consecutive_collectives_with_changing_roots() {
		let results = spawn_all(4, |comm| {
			let rank = comm.rank() as f64;
			let mut out = Vec::new();
			for root in [0, 3, 1, 0] {
				out.push(comm.reduce(&[rank], ReduceOp::Sum, root).unwrap());
			}
			out
		});

		assert_eq!(results[0][0], Some(vec![6.0]));
		assert_eq!(results[3][1], Some(vec![6.0]));
		assert_eq!(results[1][2], Some(vec![6.0]));
		assert_eq!(results[0][3], Some(vec![6.0]));
		assert_eq!(results[2].iter().flatten().count(), 0);
	}

	#[test]
	fn test_broadcast_copies_root_values() {
		let results = spawn_all(3, |comm| {
			let mut values = if comm.rank() == 1 {
				vec![50.25, 50.5, 50.75]
			} else {
				vec![0.0; 3]
			};
			comm.broadcast(&mut values, 1).unwrap();
			values
		});

		for values in results {
			assert_eq!(values, vec![50.25, 50.5, 50.75]);
		}
	}

	#[test]
	fn test_invalid_root() {
		let results = spawn_all(2, |comm| comm.reduce(&[1.0], ReduceOp::Sum, 5));

		for result in results {
			assert!(matches!(
				result,
				Err(ThreadError::InvalidRoot { root: 5, max: 1 })
			));
		}
	}

	#[test]
	fn test_length_mismatch_detected_on_root() {
		let results = spawn_all(2, |comm| {
			let values = vec![1.0; comm.rank() + 1];
			let result = comm.reduce(&values, ReduceOp::Sum, 0);
			if let Err(e) = &result {
				comm.abort(&e.to_string());
			}
			result
		});

		assert!(matches!(
			results[0],
			Err(ThreadError::LengthMismatch {
				rank: 1,
				expected: 1,
				actual: 2
			})
		));
		assert!(matches!(
			results[1],
			Err(ThreadError::GroupAborted { rank: 0, .. })
		));
	}

	#[test]
	fn test_abort_releases_blocked_ranks() {
		let results = spawn_all(3, |comm| {
			if comm.rank() == 2 {
				comm.abort("allocation failed");
				return Err(ThreadError::GroupAborted {
					rank: 2,
					reason: "self".to_string(),
				});
			}
			let first = comm.reduce(&[1.0], ReduceOp::Sum, 0).map(|_| ());
			let second = comm.barrier();
			first.and(second)
		});

		for result in &results[..2] {
			match result {
				Err(ThreadError::GroupAborted { rank, reason }) => {
					assert_eq!(*rank, 2);
					assert_eq!(reason, "allocation failed");
				},
				other => panic!("expected abort, got {:?}", other),
			}
		}
	}

	#[test]
	fn test_late_rank_sees_abort_after_root_left() {
		let results = spawn_all(3, |comm| match comm.rank() {
			2 => {
				comm.abort("allocation failed");
				Ok(())
			},
			1 => {
				thread::sleep(std::time::Duration::from_millis(300));
				comm.reduce(&[1.0], ReduceOp::Sum, 0).map(|_| ())
			},
			_ => comm.reduce(&[1.0], ReduceOp::Sum, 0).map(|_| ()),
		});

		assert!(matches!(results[0], Err(ThreadError::GroupAborted { rank: 2, .. })));
		assert!(
			matches!(results[1], Err(ThreadError::GroupAborted { rank: 2, .. })),
			"{:?}",
			results[1]
		);
	}
}
