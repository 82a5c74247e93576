//! FullSortIterator - breadth-first collection, then a global sort by
//! `(level, distance to camera)`.

use std::collections::VecDeque;

use super::seeds::SeedReplay;
use super::NodeCulling;
use crate::anchors::AnchorId;
use crate::hierarchy::{NodeGeometry, NodeId, SpatialIndex};
use crate::view::Containment;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SortedNode {
  pub node: NodeId,
  pub level: u32,
  pub distance_squared: f64,
}

#[derive(Clone, Debug)]
pub struct FullSortIterator<'h> {
  index: &'h SpatialIndex,
  culling: NodeCulling<'h>,
  anchor_count: usize,
  label_budget: usize,
  positions_as_normals: bool,
  seeds: SeedReplay,
  order: Vec<SortedNode>,
  position: usize,
  slot: usize,
}

impl<'h> FullSortIterator<'h> {
  pub(crate) fn new(
    culling: NodeCulling<'h>,
    anchor_count: usize,
    label_budget: usize,
    positions_as_normals: bool,
  ) -> Self {
    Self {
      index: culling.index(),
      culling,
      anchor_count,
      label_budget,
      positions_as_normals,
      seeds: SeedReplay::default(),
      order: Vec::new(),
      position: 0,
      slot: 0,
    }
  }

  pub fn begin(&mut self, seeds: &[AnchorId]) {
    self.seeds = SeedReplay::new(seeds, self.anchor_count);
    self.order = self.collect();
    self.position = 0;
    self.slot = 0;
    self.skip_empty();
  }

  pub fn advance(&mut self) {
    if self.seeds.is_active() {
      self.seeds.advance();
      return;
    }
    if self.position >= self.order.len() {
      return;
    }
    self.slot += 1;
    if self.slot >= self.local_count(self.position) {
      self.position += 1;
      self.slot = 0;
      self.skip_empty();
    }
  }

  #[inline]
  pub fn is_at_end(&self) -> bool {
    !self.seeds.is_active() && self.position >= self.order.len()
  }

  pub fn label_id(&self) -> Option<AnchorId> {
    if self.seeds.is_active() {
      return self.seeds.current();
    }
    let entry = self.order.get(self.position)?;
    self.index.node(entry.node).labels().anchors().get(self.slot).copied()
  }

  pub fn node_geometry(&self) -> Option<NodeGeometry> {
    if self.seeds.is_active() {
      return None;
    }
    let entry = self.order.get(self.position)?;
    Some(self.index.node(entry.node).geometry())
  }

  pub fn current_node(&self) -> Option<NodeId> {
    if self.seeds.is_active() {
      return None;
    }
    self.order.get(self.position).map(|e| e.node)
  }

  /// Nodes gathered by the last `begin`, in visiting order.
  pub fn sorted_nodes(&self) -> &[SortedNode] {
    &self.order
  }

  fn local_count(&self, position: usize) -> usize {
    self.index.node(self.order[position].node).labels().local_anchor_count()
  }

  fn skip_empty(&mut self) {
    while self.position < self.order.len() && self.local_count(self.position) == 0 {
      self.position += 1;
    }
  }

  /// Breadth-first walk capped by the label budget. The node that crosses
  /// the budget is kept.
  fn collect(&self) -> Vec<SortedNode> {
    let mut order = Vec::new();
    let root_inside = match self.culling.classify(NodeId::ROOT) {
      Containment::Outside => return order,
      Containment::Inside => true,
      Containment::Intersecting => false,
    };

    let eye = self.culling.eye();
    let mut queue = VecDeque::from([(NodeId::ROOT, root_inside)]);
    let mut labels = 0usize;
    while let Some((id, inside)) = queue.pop_front() {
      let node = self.index.node(id);
      order.push(SortedNode {
        node: id,
        level: node.level(),
        distance_squared: self.culling.distance_squared(id),
      });
      labels += node.labels().local_anchor_count();
      if labels > self.label_budget {
        break;
      }

      for &child in node.children() {
        // back-facing holds whether or not the node is inside the frustum
        if self.positions_as_normals && eye.dot(self.index.node(child).geometry().center) < 0.0 {
          continue;
        }
        let mut child_inside = inside;
        if !inside {
          match self.culling.classify(child) {
            Containment::Outside => continue,
            Containment::Inside => child_inside = true,
            Containment::Intersecting => {}
          }
        }
        queue.push_back((child, child_inside));
      }
    }

    order.sort_by(|a, b| {
      a.level
        .cmp(&b.level)
        .then(a.distance_squared.total_cmp(&b.distance_squared))
    });
    tracing::debug!(nodes = order.len(), labels, "full sort collected");
    order
  }
}

#[cfg(test)]
#[path = "full_sort_test.rs"]
mod full_sort_test;
