//! Shared fixtures for unit tests.

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::anchors::AnchorSet;
use crate::config::HierarchyConfig;
use crate::hierarchy::{LabelHierarchy, SpatialIndex};
use crate::view::{Frustum, ViewSnapshot};

/// `count` points uniformly spread in `[0, extent)^3`.
pub fn uniform_points(count: usize, extent: f64, seed: u64) -> Vec<DVec3> {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..count)
    .map(|_| {
      DVec3::new(
        rng.random::<f64>() * extent,
        rng.random::<f64>() * extent,
        rng.random::<f64>() * extent,
      )
    })
    .collect()
}

/// `count` points on the z = 0 plane.
pub fn planar_points(count: usize, extent: f64, seed: u64) -> Vec<DVec3> {
  uniform_points(count, extent, seed)
    .into_iter()
    .map(|p| DVec3::new(p.x, p.y, 0.0))
    .collect()
}

/// Anchors with seeded random priorities.
pub fn anchors_with_priorities(positions: Vec<DVec3>, seed: u64) -> AnchorSet {
  let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
  let priorities = (0..positions.len()).map(|_| rng.random::<f64>()).collect();
  AnchorSet::new(positions)
    .unwrap()
    .with_priorities(priorities)
    .unwrap()
}

pub fn seeded_config(target: usize, depth: u32) -> HierarchyConfig {
  HierarchyConfig {
    target_label_count: target,
    maximum_depth: depth,
    promotion_seed: Some(7),
    ..Default::default()
  }
}

pub fn build(anchors: &mut AnchorSet, config: HierarchyConfig) -> LabelHierarchy {
  let mut hierarchy = LabelHierarchy::new(config).unwrap();
  hierarchy.compute(anchors).unwrap();
  hierarchy
}

/// A camera at `eye` that sees everything.
pub fn open_view(eye: DVec3) -> ViewSnapshot {
  ViewSnapshot::new(eye, 30.0, Frustum::everything())
}

/// Panics unless `total == local + sum(children totals)` everywhere.
pub fn assert_counts_consistent(index: &SpatialIndex) {
  for (id, node) in index.nodes() {
    let children: usize = node
      .children()
      .iter()
      .map(|c| index.node(*c).labels().total_anchor_count())
      .sum();
    assert_eq!(
      node.labels().total_anchor_count(),
      node.labels().local_anchor_count() + children,
      "count mismatch at {:?}",
      id
    );
  }
}

/// How many times each anchor id is stored.
pub fn anchor_occurrences(index: &SpatialIndex, count: usize) -> Vec<usize> {
  let mut seen = vec![0; count];
  for (_, node) in index.nodes() {
    for &id in node.labels().anchors() {
      seen[id] += 1;
    }
  }
  seen
}

/// Level of the node holding each anchor.
pub fn anchor_levels(index: &SpatialIndex, count: usize) -> Vec<u32> {
  let mut levels = vec![u32::MAX; count];
  for (_, node) in index.nodes() {
    for &id in node.labels().anchors() {
      levels[id] = node.level();
    }
  }
  levels
}
