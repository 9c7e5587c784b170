// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

pub mod block;
pub mod operation;

pub use block::{LocalBlock, BLOCK_DIM};
pub use operation::*;
