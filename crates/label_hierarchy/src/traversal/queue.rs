//! QueueIterator - budgeted breadth-first walk, nearest children first.
//!
//! Serves both the quadtree and octree variants; the only difference is the
//! box handed to the frustum test (flat at the root z for a quadtree).

use std::collections::VecDeque;

use super::seeds::SeedReplay;
use super::NodeCulling;
use crate::anchors::AnchorId;
use crate::hierarchy::{NodeGeometry, NodeId, SpatialIndex};

#[derive(Clone, Debug)]
pub struct QueueIterator<'h> {
  index: &'h SpatialIndex,
  culling: NodeCulling<'h>,
  anchor_count: usize,
  node_budget: usize,
  seeds: SeedReplay,
  queue: VecDeque<NodeId>,
  current: Option<(NodeId, usize)>,
  nodes_queued: usize,
  nodes_visited: usize,
}

impl<'h> QueueIterator<'h> {
  pub(crate) fn new(culling: NodeCulling<'h>, anchor_count: usize, node_budget: usize) -> Self {
    Self {
      index: culling.index(),
      culling,
      anchor_count,
      node_budget,
      seeds: SeedReplay::default(),
      queue: VecDeque::new(),
      current: None,
      nodes_queued: 0,
      nodes_visited: 0,
    }
  }

  pub fn begin(&mut self, seeds: &[AnchorId]) {
    self.seeds = SeedReplay::new(seeds, self.anchor_count);
    self.queue.clear();
    self.current = None;
    self.nodes_queued = 0;
    self.nodes_visited = 0;

    if self.node_budget == 0 || !self.culling.accepts(NodeId::ROOT) {
      return;
    }
    self.nodes_queued = 1;
    self.take_node(NodeId::ROOT);
    if self.current.is_none() {
      self.next_node();
    }
  }

  pub fn advance(&mut self) {
    if self.seeds.is_active() {
      self.seeds.advance();
      return;
    }
    let Some((node, slot)) = self.current else {
      return;
    };
    if slot + 1 < self.index.node(node).labels().local_anchor_count() {
      self.current = Some((node, slot + 1));
    } else {
      self.next_node();
    }
  }

  #[inline]
  pub fn is_at_end(&self) -> bool {
    !self.seeds.is_active() && self.current.is_none()
  }

  pub fn label_id(&self) -> Option<AnchorId> {
    if self.seeds.is_active() {
      return self.seeds.current();
    }
    let (node, slot) = self.current?;
    self.index.node(node).labels().anchors().get(slot).copied()
  }

  pub fn node_geometry(&self) -> Option<NodeGeometry> {
    self.current_node().map(|node| self.index.node(node).geometry())
  }

  pub fn current_node(&self) -> Option<NodeId> {
    if self.seeds.is_active() {
      return None;
    }
    self.current.map(|(node, _)| node)
  }

  /// Nodes enqueued since `begin`, root included.
  #[inline]
  pub fn nodes_queued(&self) -> usize {
    self.nodes_queued
  }

  #[inline]
  pub fn nodes_visited(&self) -> usize {
    self.nodes_visited
  }

  /// Pop nodes until one has local anchors.
  fn next_node(&mut self) {
    self.current = None;
    while let Some(id) = self.queue.pop_front() {
      self.take_node(id);
      if self.current.is_some() {
        return;
      }
    }
  }

  fn take_node(&mut self, id: NodeId) {
    self.nodes_visited += 1;
    self.queue_children(id);
    if self.index.node(id).labels().local_anchor_count() > 0 {
      self.current = Some((id, 0));
    }
  }

  /// Enqueue visible children nearest first while budget remains.
  fn queue_children(&mut self, id: NodeId) {
    if self.nodes_queued >= self.node_budget {
      return;
    }
    let mut children: Vec<(f64, NodeId)> = self
      .index
      .node(id)
      .children()
      .iter()
      .filter(|c| self.culling.accepts(**c))
      .map(|c| (self.culling.distance_squared(*c), *c))
      .collect();
    children.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    for (_, child) in children {
      if self.nodes_queued >= self.node_budget {
        break;
      }
      self.queue.push_back(child);
      self.nodes_queued += 1;
    }
  }
}

#[cfg(test)]
#[path = "queue_test.rs"]
mod queue_test;
