// SPDX-License-Identifier: LicenseRef-PolyForm-Perimeter-1.0.1
// Copyright (c) 2026 Use-AI.rs
//
// This file is part of Use-Ai.rs
// See LICENSE for details

use crate::block::BLOCK_DIM;
use crate::operation::error::Result;
use crate::operation::mgmt::{Communicator, ROOT};
use lib_store::DisplacementMode;
use rand::rngs::StdRng;
use rand::Rng;

/// Lower edge of a drawn displacement component; draws land in `[50, 51)`.
pub const DISPLACEMENT_BASE: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displacement(pub [f32; BLOCK_DIM]);

impl Displacement {
	pub fn draw(rng: &mut StdRng) -> Self {
		Self(std::array::from_fn(|_| {
			DISPLACEMENT_BASE + rng.gen_range(0.0f32..1.0)
		}))
	}

	pub fn splat(value: f32) -> Self {
		Self([value; BLOCK_DIM])
	}
}

/// Settles this rank's displacement before the timed phases.
///
/// `Shared` is a collective: every rank must call this in the same order.
pub fn resolve_displacement(
	mode: DisplacementMode,
	rng: &mut StdRng,
	comm: &mut Communicator,
) -> Result<Displacement> {
	match mode {
		DisplacementMode::Independent => Ok(Displacement::draw(rng)),
		DisplacementMode::Fixed(value) => Ok(Displacement::splat(value)),
		DisplacementMode::Shared => {
			let mut wire = if comm.rank() == ROOT {
				Displacement::draw(rng).0.map(f64::from).to_vec()
			} else {
				vec![0.0; BLOCK_DIM]
			};
			comm.broadcast(&mut wire, ROOT)?;
			Ok(Displacement(std::array::from_fn(|j| wire[j] as f32)))
		},
	}
}
