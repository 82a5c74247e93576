use glam::DVec3;

use super::*;

fn octree(target: usize, max_depth: u32) -> SpatialIndex {
  SpatialIndex::new(
    NodeGeometry {
      center: DVec3::splat(0.5),
      size: 1.0,
    },
    3,
    target,
    max_depth,
  )
}

fn quadtree(target: usize, max_depth: u32) -> SpatialIndex {
  SpatialIndex::new(
    NodeGeometry {
      center: DVec3::new(0.5, 0.5, 0.0),
      size: 1.0,
    },
    2,
    target,
    max_depth,
  )
}

// =========================================================================
// Insertion
// =========================================================================

#[test]
fn test_insert_fills_root_first() {
  let mut index = octree(2, 5);
  let ranking = AnchorRanking::new(None);
  assert_eq!(index.insert(0, DVec3::splat(0.1), &ranking), NodeId::ROOT);
  assert_eq!(index.insert(1, DVec3::splat(0.9), &ranking), NodeId::ROOT);
  assert_eq!(index.node_count(), 1);
  assert_eq!(index.actual_depth(), 0);
}

#[test]
fn test_insert_descends_into_matching_octant() {
  let mut index = octree(1, 5);
  let ranking = AnchorRanking::new(None);
  index.insert(0, DVec3::splat(0.5), &ranking);
  // +x, -y, +z octant -> bits 0 and 2
  let node = index.insert(1, DVec3::new(0.75, 0.25, 0.75), &ranking);
  assert_eq!(index.node_count(), 9);
  assert_eq!(index.path_of(node).as_slice(), &[0b101]);
  assert_eq!(index.node(node).geometry().center, DVec3::new(0.75, 0.25, 0.75));
  assert_eq!(index.root().labels().total_anchor_count(), 2);
  assert_eq!(index.actual_depth(), 1);
}

#[test]
fn test_insert_stops_at_maximum_depth() {
  let mut index = octree(1, 2);
  let ranking = AnchorRanking::new(None);
  for id in 0..10 {
    index.insert(id, DVec3::splat(0.01), &ranking);
  }
  assert_eq!(index.actual_depth(), 2);
  let deepest = index.visit(&[0, 0]).unwrap();
  // over capacity is accepted at the depth limit
  assert_eq!(index.node(deepest).labels().local_anchor_count(), 8);
  assert_eq!(index.root().labels().total_anchor_count(), 10);
}

#[test]
fn test_quadtree_has_four_children() {
  let mut index = quadtree(1, 3);
  let ranking = AnchorRanking::new(None);
  index.insert(0, DVec3::new(0.2, 0.2, 0.0), &ranking);
  index.insert(1, DVec3::new(0.8, 0.8, 0.0), &ranking);
  assert_eq!(index.branching_factor(), 4);
  assert_eq!(index.root().children().len(), 4);
  assert_eq!(index.node_count(), 5);
}

// =========================================================================
// Paths and discrete coordinates
// =========================================================================

#[test]
fn test_visit_missing_path() {
  let index = octree(16, 5);
  assert_eq!(index.visit(&[]), Some(NodeId::ROOT));
  assert_eq!(index.visit(&[3]), None);
}

#[test]
fn test_discrete_coordinates_clamp_into_grid() {
  let index = octree(16, 5);
  assert_eq!(index.discrete_node_coordinates(DVec3::splat(0.3), 2), [1, 1, 1]);
  assert_eq!(index.discrete_node_coordinates(DVec3::splat(-5.0), 2), [0, 0, 0]);
  assert_eq!(index.discrete_node_coordinates(DVec3::splat(5.0), 2), [3, 3, 3]);
  assert_eq!(index.discrete_node_coordinates(DVec3::splat(9.0), 0), [0, 0, 0]);
}

#[test]
fn test_quadtree_discrete_z_is_zero() {
  let index = quadtree(16, 5);
  assert_eq!(
    index.discrete_node_coordinates(DVec3::new(0.9, 0.1, 42.0), 1),
    [1, 0, 0]
  );
}

#[test]
fn test_path_for_nodal_coordinates() {
  let index = octree(16, 5);
  let path = index.path_for_nodal_coordinates([3, 0, 2], 2).unwrap();
  // level 1: x in upper half, z in upper half; level 2: x upper
  assert_eq!(path.as_slice(), &[0b101, 0b001]);
  assert!(index.path_for_nodal_coordinates([4, 0, 0], 2).is_none());
  assert!(index.path_for_nodal_coordinates([-1, 0, 0], 2).is_none());
  assert_eq!(index.path_for_nodal_coordinates([0, 0, 0], 0).unwrap().len(), 0);
}

#[test]
fn test_quadtree_path_rejects_nonzero_z() {
  let index = quadtree(16, 5);
  assert!(index.path_for_nodal_coordinates([1, 1, 1], 2).is_none());
  assert!(index.path_for_nodal_coordinates([1, 1, 0], 2).is_some());
}

#[test]
fn test_path_round_trips_through_inserted_node() {
  let mut index = octree(1, 4);
  let ranking = AnchorRanking::new(None);
  index.insert(0, DVec3::splat(0.5), &ranking);
  index.insert(1, DVec3::splat(0.9), &ranking);
  let node = index.insert(2, DVec3::splat(0.95), &ranking);
  let level = index.node(node).level();
  let center = index.node(node).geometry().center;
  let ijk = index.discrete_node_coordinates(center, level);
  let path = index.path_for_nodal_coordinates(ijk, level).unwrap();
  assert_eq!(index.visit(&path), Some(node));
}

#[test]
fn test_leaves_are_depth_first() {
  let mut index = quadtree(1, 3);
  let ranking = AnchorRanking::new(None);
  index.insert(0, DVec3::new(0.2, 0.2, 0.0), &ranking);
  index.insert(1, DVec3::new(0.1, 0.1, 0.0), &ranking);
  index.insert(2, DVec3::new(0.05, 0.05, 0.0), &ranking);
  let leaves = index.leaves();
  // child 0 split again, so its four children come before root children 1..3
  assert_eq!(leaves.len(), 7);
  assert_eq!(index.node(leaves[0]).level(), 2);
  assert_eq!(index.node(leaves[6]).level(), 1);
}
