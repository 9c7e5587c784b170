// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

mod aggregate;
mod collective;
mod config;
mod error;
mod group;

pub use aggregate::{global_durations, global_mean, ROOT};
pub use collective::{AbortHandle, Communicator, ReduceOp};
pub use config::GroupConfig;
pub use error::{Result, ThreadError};
pub use group::WorkerGroup;
