//! Synthetic anchor sets for inspection runs.

use anyhow::{Context, Result};
use glam::DVec3;
use label_hierarchy::AnchorSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{DatasetConfig, Layout};

/// Generate positions and priorities from the dataset section.
pub fn generate(config: &DatasetConfig) -> Result<AnchorSet> {
	let mut rng = StdRng::seed_from_u64(config.seed);
	let extent = config.extent;

	let mut positions: Vec<DVec3> = (0..config.count)
		.map(|_| match config.layout {
			Layout::Cube => DVec3::new(
				rng.random::<f64>() * extent,
				rng.random::<f64>() * extent,
				rng.random::<f64>() * extent,
			),
			Layout::Plane => DVec3::new(rng.random::<f64>() * extent, rng.random::<f64>() * extent, 0.0),
			Layout::Globe => point_on_sphere(&mut rng) * extent,
		})
		.collect();

	if let Some(&first) = positions.first() {
		positions.extend(std::iter::repeat(first).take(config.duplicates));
	}

	let priorities = (0..positions.len()).map(|_| rng.random::<f64>()).collect();

	AnchorSet::new(positions)
		.and_then(|set| set.with_priorities(priorities))
		.context("Failed to build anchor set")
}

/// Uniform unit vector by rejection sampling the unit ball.
fn point_on_sphere(rng: &mut StdRng) -> DVec3 {
	loop {
		let p = DVec3::new(
			rng.random::<f64>() * 2.0 - 1.0,
			rng.random::<f64>() * 2.0 - 1.0,
			rng.random::<f64>() * 2.0 - 1.0,
		);
		let length_squared = p.length_squared();
		if length_squared > 1e-6 && length_squared <= 1.0 {
			return p / length_squared.sqrt();
		}
	}
}
