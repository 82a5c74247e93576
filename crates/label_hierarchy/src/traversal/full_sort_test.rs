use glam::{DVec3, DVec4};

use super::*;
use crate::test_utils::*;
use crate::view::{Frustum, ViewSnapshot};

fn half_space_view(eye: DVec3, min_x: f64) -> ViewSnapshot {
  let mut planes = [DVec4::new(0.0, 0.0, 0.0, 1.0); 6];
  planes[0] = DVec4::new(1.0, 0.0, 0.0, -min_x);
  ViewSnapshot::new(eye, 30.0, Frustum::from_planes(planes))
}

/// A run visits nodes in non-decreasing (level, distance) order.
#[test]
fn test_sorted_by_level_then_distance() {
  let mut anchors = anchors_with_priorities(uniform_points(1000, 10.0, 41), 41);
  let hierarchy = build(&mut anchors, seeded_config(8, 5));
  let culling = NodeCulling::new(hierarchy.index(), open_view(DVec3::new(2.0, 9.0, 4.0)), 0.0);
  let mut iter = FullSortIterator::new(culling, hierarchy.anchor_count(), usize::MAX, false);
  iter.begin(&[]);

  let nodes = iter.sorted_nodes().to_vec();
  assert_eq!(nodes.len(), hierarchy.index().node_count());
  for pair in nodes.windows(2) {
    let (a, b) = (pair[0], pair[1]);
    assert!(
      a.level < b.level || (a.level == b.level && a.distance_squared <= b.distance_squared),
      "{:?} before {:?}",
      a,
      b
    );
  }

  // yielded nodes follow the same order
  let mut last = None;
  while !iter.is_at_end() {
    let node = iter.current_node().unwrap();
    let position = nodes.iter().position(|n| n.node == node).unwrap();
    if let Some(prev) = last {
      assert!(position >= prev);
    }
    last = Some(position);
    iter.advance();
  }
}

#[test]
fn test_label_budget_stops_walk() {
  let mut anchors = anchors_with_priorities(uniform_points(2000, 10.0, 42), 42);
  let hierarchy = build(&mut anchors, seeded_config(16, 5));
  let culling = NodeCulling::new(hierarchy.index(), open_view(DVec3::ZERO), 0.0);
  let mut iter = FullSortIterator::new(culling, hierarchy.anchor_count(), 100, false);
  iter.begin(&[]);

  let index = hierarchy.index();
  let nodes = iter.sorted_nodes();
  assert!(nodes.len() < index.node_count());
  let locals: Vec<usize> = nodes
    .iter()
    .map(|n| index.node(n.node).labels().local_anchor_count())
    .collect();
  let total: usize = locals.iter().sum();
  // the node crossing the budget is still included
  assert!(total > 100);
  assert!(total - locals.iter().max().unwrap() <= 100);
}

#[test]
fn test_outside_children_pruned() {
  let mut anchors = anchors_with_priorities(uniform_points(1500, 100.0, 43), 43);
  let hierarchy = build(&mut anchors, seeded_config(8, 5));
  let view = half_space_view(DVec3::new(90.0, 50.0, 50.0), 60.0);
  let culling = NodeCulling::new(hierarchy.index(), view, 0.0);
  let mut iter = FullSortIterator::new(culling, hierarchy.anchor_count(), usize::MAX, false);
  iter.begin(&[]);

  let index = hierarchy.index();
  let nodes = iter.sorted_nodes();
  assert!(nodes.len() < index.node_count());
  for n in nodes {
    let bounds = index.node(n.node).geometry().bounds(index.dimension());
    assert!(bounds.max.x >= 60.0, "node {:?} lies outside", n.node);
  }
}

#[test]
fn test_positions_as_normals_hides_far_side() {
  // points on a sphere around the origin
  let points: Vec<DVec3> = uniform_points(1500, 2.0, 44)
    .into_iter()
    .map(|p| (p - DVec3::ONE).normalize_or(DVec3::X) * 10.0)
    .collect();
  let mut anchors = anchors_with_priorities(points, 44);
  let hierarchy = build(&mut anchors, seeded_config(8, 5));
  let eye = DVec3::new(0.0, 0.0, 50.0);
  let culling = NodeCulling::new(hierarchy.index(), open_view(eye), 0.0);

  let mut globe = FullSortIterator::new(culling, hierarchy.anchor_count(), usize::MAX, true);
  globe.begin(&[]);
  let mut flat = FullSortIterator::new(culling, hierarchy.anchor_count(), usize::MAX, false);
  flat.begin(&[]);

  assert!(globe.sorted_nodes().len() < flat.sorted_nodes().len());
  for n in globe.sorted_nodes().iter().skip(1) {
    let center = hierarchy.index().node(n.node).geometry().center;
    assert!(eye.dot(center) >= 0.0);
  }
}
