//! SpatialIndex - arena-backed octree/quadtree of LabelSets.
//!
//! Nodes are created in sibling blocks the first time an insertion needs to
//! descend, and are never removed until the whole index is rebuilt.

use glam::DVec3;
use smallvec::SmallVec;

use super::node::{HierarchyNode, NodeGeometry, NodeId};
use crate::anchors::{AnchorId, AnchorRanking};

/// Root-to-node sequence of child indices.
pub type NodePath = SmallVec<[u8; 16]>;

/// Adaptive tree of LabelSets addressed by [`NodeId`].
#[derive(Clone, Debug)]
pub struct SpatialIndex {
  nodes: Vec<HierarchyNode>,
  dimension: u32,
  target_label_count: usize,
  maximum_depth: u32,
  actual_depth: u32,
}

impl SpatialIndex {
  /// Create a new index holding only an empty root.
  pub fn new(
    root: NodeGeometry,
    dimension: u32,
    target_label_count: usize,
    maximum_depth: u32,
  ) -> Self {
    debug_assert!(dimension == 2 || dimension == 3);
    Self {
      nodes: vec![HierarchyNode::new(root, 0, None)],
      dimension,
      target_label_count,
      maximum_depth,
      actual_depth: 0,
    }
  }

  /// 2 for a quadtree, 3 for an octree.
  #[inline]
  pub fn dimension(&self) -> u32 {
    self.dimension
  }

  #[inline]
  pub fn branching_factor(&self) -> usize {
    1 << self.dimension
  }

  #[inline]
  pub fn target_label_count(&self) -> usize {
    self.target_label_count
  }

  #[inline]
  pub fn maximum_depth(&self) -> u32 {
    self.maximum_depth
  }

  /// Deepest level any node reached.
  #[inline]
  pub fn actual_depth(&self) -> u32 {
    self.actual_depth
  }

  #[inline]
  pub fn root(&self) -> &HierarchyNode {
    &self.nodes[0]
  }

  #[inline]
  pub fn node(&self, id: NodeId) -> &HierarchyNode {
    &self.nodes[id.index()]
  }

  #[inline]
  pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut HierarchyNode {
    &mut self.nodes[id.index()]
  }

  #[inline]
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// Every node with its id, in arena order.
  pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &HierarchyNode)> {
    self
      .nodes
      .iter()
      .enumerate()
      .map(|(i, n)| (NodeId(i as u32), n))
  }

  /// Node ids in depth-first preorder, children in index order.
  pub fn depth_first(&self) -> Vec<NodeId> {
    let mut order = Vec::with_capacity(self.nodes.len());
    let mut stack = vec![NodeId::ROOT];
    while let Some(id) = stack.pop() {
      order.push(id);
      stack.extend(self.node(id).children.iter().rev().copied());
    }
    order
  }

  /// Leaf ids in depth-first order.
  pub fn leaves(&self) -> Vec<NodeId> {
    self
      .depth_first()
      .into_iter()
      .filter(|id| self.node(*id).is_leaf())
      .collect()
  }

  /// Node currently holding `anchor`, if any.
  pub fn locate(&self, anchor: AnchorId) -> Option<NodeId> {
    self
      .nodes()
      .find(|(_, n)| n.labels.anchors().contains(&anchor))
      .map(|(id, _)| id)
  }

  /// Insert an anchor whose position is already normalized to the root
  /// (each axis in `[0, 1]`).
  ///
  /// Descends while the current node is at capacity and above the maximum
  /// depth, creating children on demand. Returns the receiving node.
  pub(crate) fn insert(
    &mut self,
    anchor: AnchorId,
    normalized: DVec3,
    ranking: &AnchorRanking<'_>,
  ) -> NodeId {
    let mut node = NodeId::ROOT;
    let mut coord = normalized;
    let mut threshold = 1.0;

    loop {
      let current = self.node(node);
      if current.labels.local_anchor_count() < self.target_label_count
        || current.level >= self.maximum_depth
      {
        break;
      }

      threshold *= 0.5;
      let mut child = 0u8;
      for axis in 0..self.dimension as usize {
        if coord[axis] >= threshold {
          child |= 1 << axis;
          coord[axis] -= threshold;
        }
      }

      self.ensure_children(node);
      let current = self.node_mut(node);
      current.labels.add_to_total(1);
      node = current.children[child as usize];
    }

    let target = self.node_mut(node);
    target.labels.insert_ranked(anchor, ranking);
    target.labels.add_to_total(1);
    let level = target.level;
    self.actual_depth = self.actual_depth.max(level);
    node
  }

  /// Allocate all children of `id` if it is still a leaf.
  fn ensure_children(&mut self, id: NodeId) {
    if !self.node(id).is_leaf() {
      return;
    }
    let geometry = self.node(id).geometry();
    let level = self.node(id).level + 1;
    let first = self.nodes.len() as u32;
    for index in 0..self.branching_factor() as u8 {
      let child = HierarchyNode::new(geometry.child(index, self.dimension), level, Some(id));
      self.nodes.push(child);
    }
    let count = self.branching_factor() as u32;
    self.node_mut(id).children = (first..first + count).map(NodeId).collect();
  }

  /// Follow a root-to-node path. `None` when any step does not exist.
  pub fn visit(&self, path: &[u8]) -> Option<NodeId> {
    let mut node = NodeId::ROOT;
    for &step in path {
      node = *self.node(node).children.get(step as usize)?;
    }
    Some(node)
  }

  /// Root-to-node path of `id`.
  pub fn path_of(&self, id: NodeId) -> NodePath {
    let mut path = NodePath::new();
    let mut node = id;
    while let Some(parent) = self.node(node).parent {
      let slot = self
        .node(parent)
        .children
        .iter()
        .position(|c| *c == node)
        .unwrap_or(0);
      path.push(slot as u8);
      node = parent;
    }
    path.reverse();
    path
  }

  /// Integer cell of `point` in the `2^level` grid covering the root,
  /// clamped into the grid. The z cell of a quadtree is always 0.
  pub fn discrete_node_coordinates(&self, point: DVec3, level: u32) -> [i32; 3] {
    let root = self.root().geometry();
    let cells = 1i64 << level;
    let cell_size = root.size / cells as f64;
    let origin = root.center - DVec3::splat(root.size * 0.5);

    let mut ijk = [0i32; 3];
    for axis in 0..self.dimension as usize {
      let raw = ((point[axis] - origin[axis]) / cell_size).floor();
      // saturating cast maps NaN to 0
      ijk[axis] = (raw as i64).clamp(0, cells - 1) as i32;
    }
    ijk
  }

  /// Convert an absolute cell coordinate at `level` into a path.
  /// `None` when the cell lies outside the grid.
  pub fn path_for_nodal_coordinates(&self, ijk: [i32; 3], level: u32) -> Option<NodePath> {
    let cells = 1i64 << level;
    for (axis, &c) in ijk.iter().enumerate() {
      let limit = if axis < self.dimension as usize { cells } else { 1 };
      if (c as i64) < 0 || (c as i64) >= limit {
        return None;
      }
    }

    let mut remaining = ijk.map(|c| c as i64);
    let mut half = cells >> 1;
    let mut path = NodePath::new();
    for _ in 0..level {
      let mut child = 0u8;
      for axis in 0..self.dimension as usize {
        if remaining[axis] >= half {
          child |= 1 << axis;
          remaining[axis] -= half;
        }
      }
      path.push(child);
      half >>= 1;
    }
    Some(path)
  }
}

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;
