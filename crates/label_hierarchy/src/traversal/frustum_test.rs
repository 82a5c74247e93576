use std::collections::HashSet;

use glam::DVec3;

use super::*;
use crate::config::HierarchyConfig;
use crate::hierarchy::LabelHierarchy;
use crate::test_utils::*;
use crate::traversal::{TraversalOptions, TraversalStrategy};

fn frustum_walk(hierarchy: &LabelHierarchy, eye: DVec3, search: FrustumSearch) -> Vec<NodeId> {
  let mut iter = FrustumIterator::new(
    hierarchy.index(),
    hierarchy.anchor_count(),
    open_view(eye),
    search,
  );
  iter.begin(&[]);
  let mut nodes = Vec::new();
  while !iter.is_at_end() {
    let node = iter.current_node().unwrap();
    if nodes.last() != Some(&node) {
      nodes.push(node);
    }
    iter.advance();
  }
  nodes
}

/// A frustum run never yields the same node twice.
#[test]
fn test_no_node_visited_twice() {
  let mut anchors = anchors_with_priorities(uniform_points(1200, 50.0, 31), 31);
  let hierarchy = build(&mut anchors, seeded_config(6, 5));
  let nodes = frustum_walk(&hierarchy, DVec3::new(12.0, 40.0, 3.0), FrustumSearch::Complete);
  let unique: HashSet<_> = nodes.iter().collect();
  assert_eq!(unique.len(), nodes.len());
}

#[test]
fn test_levels_are_coarse_to_fine() {
  let mut anchors = anchors_with_priorities(uniform_points(900, 10.0, 32), 32);
  let hierarchy = build(&mut anchors, seeded_config(8, 5));
  let nodes = frustum_walk(&hierarchy, DVec3::splat(5.0), FrustumSearch::Complete);
  assert_eq!(nodes.first(), Some(&NodeId::ROOT));
  let levels: Vec<u32> = nodes
    .iter()
    .map(|n| hierarchy.index().node(*n).level())
    .collect();
  assert!(levels.windows(2).all(|w| w[0] <= w[1]));
}

/// Within one level, cells near the camera come first.
#[test]
fn test_nearest_cell_first_within_level() {
  let mut anchors = anchors_with_priorities(uniform_points(2000, 16.0, 33), 33);
  let hierarchy = build(&mut anchors, seeded_config(4, 4));
  let eye = DVec3::new(1.0, 1.0, 1.0);
  let index = hierarchy.index();
  let nodes = frustum_walk(&hierarchy, eye, FrustumSearch::Complete);

  let level_one: Vec<NodeId> = nodes
    .into_iter()
    .filter(|n| index.node(*n).level() == 1)
    .collect();
  assert!(!level_one.is_empty());
  let camera_cell = index.discrete_node_coordinates(eye, 1);
  let first = index.node(level_one[0]).geometry().center;
  let first_cell = index.discrete_node_coordinates(first, 1);
  // the camera's own level-1 cell holds anchors in a dense cloud
  assert_eq!(first_cell, camera_cell);
}

#[test]
fn test_coherent_search_is_subset() {
  let mut anchors = anchors_with_priorities(uniform_points(1500, 100.0, 34), 34);
  // small target pushes anchors to level 4, where the coherent bound bites
  let hierarchy = build(&mut anchors, seeded_config(2, 5));
  let eye = DVec3::new(0.0, 0.0, 0.0);
  let complete: HashSet<_> = frustum_walk(&hierarchy, eye, FrustumSearch::Complete)
    .into_iter()
    .collect();
  let coherent = frustum_walk(&hierarchy, eye, FrustumSearch::Coherent);
  assert!(!coherent.is_empty());
  assert!(coherent.len() < complete.len());
  assert!(coherent.iter().all(|n| complete.contains(n)));
}

#[test]
fn test_quadtree_walk_covers_all_nodes_with_anchors() {
  let mut anchors = anchors_with_priorities(planar_points(600, 30.0, 35), 35);
  let hierarchy = build(&mut anchors, seeded_config(4, 6));
  let nodes = frustum_walk(&hierarchy, DVec3::new(-10.0, 50.0, 8.0), FrustumSearch::Complete);
  let expected = hierarchy
    .index()
    .nodes()
    .filter(|(_, n)| n.labels().local_anchor_count() > 0)
    .count();
  assert_eq!(nodes.len(), expected);
}

#[test]
fn test_strategy_entry_point_builds_frustum_iterator() {
  let mut anchors = anchors_with_priorities(uniform_points(40, 1.0, 36), 36);
  let hierarchy = build(&mut anchors, HierarchyConfig::default());
  let iter = hierarchy.iterator(
    TraversalStrategy::Frustum,
    &open_view(DVec3::ZERO),
    &TraversalOptions::DEFAULT,
  );
  assert_eq!(iter.name(), "frustum");
  assert_eq!(iter.count(), 40);
}

/// One anchor at the origin and a dense cluster in the far corner, so the
/// tree gets deeper than the shared offset table reaches.
fn far_cluster(count: usize, dimension: u32, seed: u64) -> Vec<DVec3> {
  let mut points = vec![DVec3::ZERO];
  points.extend(uniform_points(count, 10.0, seed).into_iter().map(|p| {
    let p = p + DVec3::splat(990.0);
    if dimension == 2 {
      DVec3::new(p.x, p.y, 0.0)
    } else {
      p
    }
  }));
  points
}

fn drain_ids(hierarchy: &LabelHierarchy, eye: DVec3) -> Vec<AnchorId> {
  let mut iter = FrustumIterator::new(
    hierarchy.index(),
    hierarchy.anchor_count(),
    open_view(eye),
    FrustumSearch::Complete,
  );
  iter.begin(&[]);
  let mut ids = Vec::new();
  while let Some(id) = iter.label_id() {
    ids.push(id);
    iter.advance();
  }
  ids
}

#[test]
fn test_complete_search_deep_quadtree_yields_every_anchor() {
  let mut anchors = anchors_with_priorities(far_cluster(400, 2, 37), 37);
  let hierarchy = build(&mut anchors, seeded_config(1, 8));
  assert!(hierarchy.is_quadtree());
  assert_eq!(hierarchy.actual_depth(), 8);

  let ids = drain_ids(&hierarchy, DVec3::ZERO);
  let unique: HashSet<_> = ids.iter().copied().collect();
  assert_eq!(ids.len(), 401);
  assert_eq!(unique.len(), 401);
}

#[test]
fn test_complete_search_deep_octree_yields_every_anchor() {
  let mut anchors = anchors_with_priorities(far_cluster(400, 3, 38), 38);
  let hierarchy = build(&mut anchors, seeded_config(1, 7));
  assert!(!hierarchy.is_quadtree());
  assert_eq!(hierarchy.actual_depth(), 7);

  let ids = drain_ids(&hierarchy, DVec3::ZERO);
  let unique: HashSet<_> = ids.iter().copied().collect();
  assert_eq!(ids.len(), 401);
  assert_eq!(unique.len(), 401);
}
