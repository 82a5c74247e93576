//! Tree nodes and their LabelSet payloads.
//!
//! Child indices use one bit per axis:
//! - bit 0: +X half
//! - bit 1: +Y half
//! - bit 2: +Z half (octree only)

use glam::DVec3;
use smallvec::SmallVec;

use super::bounds::DAabb3;
use crate::anchors::{AnchorId, AnchorRanking};

/// Stable handle of a node in the hierarchy arena.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
  pub const ROOT: Self = Self(0);

  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// Center and edge length of a square/cubic node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeGeometry {
  pub center: DVec3,
  /// Edge length.
  pub size: f64,
}

impl NodeGeometry {
  /// Geometry of child `index`: half the edge, center shifted by a quarter
  /// edge along every axis in play. Quadtree children keep the parent's z.
  pub fn child(&self, index: u8, dimension: u32) -> Self {
    let quarter = self.size * 0.25;
    let mut center = self.center;
    for axis in 0..dimension as usize {
      let sign = if index & (1 << axis) != 0 { 1.0 } else { -1.0 };
      center[axis] += sign * quarter;
    }
    Self {
      center,
      size: self.size * 0.5,
    }
  }

  /// Box covering the node. Quadtree nodes are flat at their center z.
  pub fn bounds(&self, dimension: u32) -> DAabb3 {
    let half = self.size * 0.5;
    let half_extents = if dimension == 2 {
      DVec3::new(half, half, 0.0)
    } else {
      DVec3::splat(half)
    };
    DAabb3::from_center_half_extents(self.center, half_extents)
  }
}

/// Priority-ordered anchor multiset plus node geometry and counts.
#[derive(Clone, Debug)]
pub struct LabelSet {
  anchors: Vec<AnchorId>,
  geometry: NodeGeometry,
  total_anchor_count: usize,
}

impl LabelSet {
  /// Create a new empty set covering `geometry`.
  pub fn new(geometry: NodeGeometry) -> Self {
    Self {
      anchors: Vec::new(),
      geometry,
      total_anchor_count: 0,
    }
  }

  /// Anchors held directly by this node, best ranked first.
  #[inline]
  pub fn anchors(&self) -> &[AnchorId] {
    &self.anchors
  }

  #[inline]
  pub fn local_anchor_count(&self) -> usize {
    self.anchors.len()
  }

  /// Anchors in this node's whole subtree.
  #[inline]
  pub fn total_anchor_count(&self) -> usize {
    self.total_anchor_count
  }

  #[inline]
  pub fn geometry(&self) -> NodeGeometry {
    self.geometry
  }

  #[inline]
  pub fn center(&self) -> DVec3 {
    self.geometry.center
  }

  #[inline]
  pub fn size(&self) -> f64 {
    self.geometry.size
  }

  /// Insert keeping ranking order. Does not touch the subtree total.
  pub(crate) fn insert_ranked(&mut self, id: AnchorId, ranking: &AnchorRanking<'_>) {
    let at = self
      .anchors
      .partition_point(|&other| ranking.compare(other, id).is_lt());
    self.anchors.insert(at, id);
  }

  /// Remove and return the `n` best ranked anchors.
  pub(crate) fn take_best(&mut self, n: usize) -> Vec<AnchorId> {
    let n = n.min(self.anchors.len());
    self.anchors.drain(..n).collect()
  }

  #[inline]
  pub(crate) fn add_to_total(&mut self, n: usize) {
    self.total_anchor_count += n;
  }

  #[inline]
  pub(crate) fn remove_from_total(&mut self, n: usize) {
    debug_assert!(n <= self.total_anchor_count, "subtree total underflow");
    self.total_anchor_count -= n;
  }
}

/// One arena entry.
#[derive(Clone, Debug)]
pub struct HierarchyNode {
  pub(crate) labels: LabelSet,
  pub(crate) level: u32,
  pub(crate) parent: Option<NodeId>,
  /// Empty for a leaf, otherwise all 4 or 8 children.
  pub(crate) children: SmallVec<[NodeId; 8]>,
}

impl HierarchyNode {
  pub(crate) fn new(geometry: NodeGeometry, level: u32, parent: Option<NodeId>) -> Self {
    Self {
      labels: LabelSet::new(geometry),
      level,
      parent,
      children: SmallVec::new(),
    }
  }

  #[inline]
  pub fn labels(&self) -> &LabelSet {
    &self.labels
  }

  #[inline]
  pub fn level(&self) -> u32 {
    self.level
  }

  #[inline]
  pub fn parent(&self) -> Option<NodeId> {
    self.parent
  }

  #[inline]
  pub fn children(&self) -> &[NodeId] {
    &self.children
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_empty()
  }

  #[inline]
  pub fn geometry(&self) -> NodeGeometry {
    self.labels.geometry
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
