//! DepthFirstIterator - preorder walk, nearest child first, with culled
//! subtrees skipped entirely.

use smallvec::SmallVec;

use super::seeds::SeedReplay;
use super::NodeCulling;
use crate::anchors::AnchorId;
use crate::hierarchy::{NodeGeometry, NodeId, SpatialIndex};

#[derive(Clone, Debug)]
pub struct DepthFirstIterator<'h> {
  index: &'h SpatialIndex,
  culling: NodeCulling<'h>,
  anchor_count: usize,
  seeds: SeedReplay,
  /// Slot into `orders` at each level below the root.
  path: Vec<usize>,
  /// Children of each node on the path, sorted by distance once.
  orders: Vec<SmallVec<[NodeId; 8]>>,
  node: NodeId,
  slot: usize,
  /// The current node passed culling, so its children are candidates.
  descend: bool,
  done: bool,
  nodes_visited: usize,
}

impl<'h> DepthFirstIterator<'h> {
  pub(crate) fn new(culling: NodeCulling<'h>, anchor_count: usize) -> Self {
    Self {
      index: culling.index(),
      culling,
      anchor_count,
      seeds: SeedReplay::default(),
      path: Vec::new(),
      orders: Vec::new(),
      node: NodeId::ROOT,
      slot: 0,
      descend: false,
      done: true,
      nodes_visited: 0,
    }
  }

  pub fn begin(&mut self, seeds: &[AnchorId]) {
    self.seeds = SeedReplay::new(seeds, self.anchor_count);
    self.path.clear();
    self.orders.clear();
    self.node = NodeId::ROOT;
    self.slot = 0;
    self.nodes_visited = 0;

    self.descend = self.culling.accepts(NodeId::ROOT);
    if !self.descend {
      self.done = true;
      return;
    }
    self.done = false;
    self.nodes_visited = 1;
    if self.local_count() == 0 {
      self.next_node();
    }
  }

  pub fn advance(&mut self) {
    if self.seeds.is_active() {
      self.seeds.advance();
      return;
    }
    if self.done {
      return;
    }
    self.slot += 1;
    if self.slot >= self.local_count() {
      self.next_node();
    }
  }

  #[inline]
  pub fn is_at_end(&self) -> bool {
    !self.seeds.is_active() && self.done
  }

  pub fn label_id(&self) -> Option<AnchorId> {
    if self.seeds.is_active() {
      return self.seeds.current();
    }
    if self.done {
      return None;
    }
    self.index.node(self.node).labels().anchors().get(self.slot).copied()
  }

  pub fn node_geometry(&self) -> Option<NodeGeometry> {
    self.current_node().map(|node| self.index.node(node).geometry())
  }

  pub fn current_node(&self) -> Option<NodeId> {
    if self.seeds.is_active() || self.done {
      return None;
    }
    Some(self.node)
  }

  #[inline]
  pub fn nodes_visited(&self) -> usize {
    self.nodes_visited
  }

  fn local_count(&self) -> usize {
    self.index.node(self.node).labels().local_anchor_count()
  }

  /// Step to the next accepted node with local anchors, in preorder.
  fn next_node(&mut self) {
    loop {
      let children = self.index.node(self.node).children();
      if self.descend && !children.is_empty() {
        let mut order: SmallVec<[NodeId; 8]> = children.iter().copied().collect();
        order.sort_by(|a, b| {
          self
            .culling
            .distance_squared(*a)
            .total_cmp(&self.culling.distance_squared(*b))
            .then(a.cmp(b))
        });
        self.node = order[0];
        self.orders.push(order);
        self.path.push(0);
      } else {
        loop {
          let Some(slot) = self.path.last_mut() else {
            self.done = true;
            return;
          };
          *slot += 1;
          match self.orders.last() {
            Some(order) if *slot < order.len() => {
              self.node = order[*slot];
              break;
            }
            _ => {
              self.path.pop();
              self.orders.pop();
            }
          }
        }
      }

      self.descend = self.culling.accepts(self.node);
      if self.descend {
        self.nodes_visited += 1;
        if self.local_count() > 0 {
          self.slot = 0;
          return;
        }
      }
    }
  }
}

#[cfg(test)]
#[path = "depth_first_test.rs"]
mod depth_first_test;
