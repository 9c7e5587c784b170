// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

pub mod bench;
pub mod error;
pub mod kernels;
pub mod mgmt;
pub mod partition;
pub mod timer;

pub use bench::{run_worker, Benchmark, GlobalResult, WorkerOutcome};
pub use error::{OpError, Result};
pub use partition::{Partition, MEGA_MULTIPLIER};
pub use timer::{Phase, PhaseDurations, PhaseTimer};
