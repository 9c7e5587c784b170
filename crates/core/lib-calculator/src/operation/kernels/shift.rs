// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use super::displacement::Displacement;
use crate::block::LocalBlock;
use ndarray::aview1;

/// Adds `displacement` to every row in place.
pub fn shift(
	block: &mut LocalBlock,
	displacement: &Displacement,
) {
	let mut data = block.view_mut();
	data += &aview1(&displacement.0);
}
