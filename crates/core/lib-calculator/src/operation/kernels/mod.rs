// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

mod average;
mod displacement;
mod generate;
mod shift;

pub use average::{average, Mean};
pub use displacement::{resolve_displacement, Displacement, DISPLACEMENT_BASE};
pub use generate::{generate, worker_rng, SAMPLE_HIGH, SAMPLE_LOW};
pub use shift::shift;
