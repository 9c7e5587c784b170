// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

pub mod cfg;
pub mod error;
pub mod report;

pub use cfg::{BenchConfig, BenchSettings, DisplacementMode, WorkloadKind};
pub use error::{Result, StoreError};
pub use report::{emit, Performance, Report, ReportArgs};
