//! CompositeIterator - round-robin over several strategies.
//!
//! Each part yields up to its repeat count of consecutive labels before the
//! next part takes over. Exhausted parts are skipped.

use super::LabelIterator;
use crate::anchors::AnchorId;
use crate::hierarchy::NodeGeometry;

#[derive(Clone, Debug)]
pub struct CompositeIterator<'h> {
  parts: Vec<(LabelIterator<'h>, usize)>,
  active: usize,
  taken: usize,
  done: bool,
}

impl<'h> CompositeIterator<'h> {
  /// A repeat count of 0 is treated as 1.
  pub fn new(parts: Vec<(LabelIterator<'h>, usize)>) -> Self {
    Self {
      parts: parts
        .into_iter()
        .map(|(iter, repeat)| (iter, repeat.max(1)))
        .collect(),
      active: 0,
      taken: 0,
      done: true,
    }
  }

  pub fn begin(&mut self, seeds: &[AnchorId]) {
    for (part, _) in &mut self.parts {
      part.begin(seeds);
    }
    self.active = 0;
    self.taken = 0;
    self.done = false;
    self.seek_live_part();
  }

  pub fn advance(&mut self) {
    if self.done {
      return;
    }
    let (part, repeat) = &mut self.parts[self.active];
    part.advance();
    self.taken += 1;
    if self.taken >= *repeat {
      self.rotate();
    }
    self.seek_live_part();
  }

  #[inline]
  pub fn is_at_end(&self) -> bool {
    self.done
  }

  pub fn label_id(&self) -> Option<AnchorId> {
    if self.done {
      return None;
    }
    self.parts[self.active].0.label_id()
  }

  pub fn node_geometry(&self) -> Option<NodeGeometry> {
    if self.done {
      return None;
    }
    self.parts[self.active].0.node_geometry()
  }

  /// Index of the part currently yielding.
  pub fn active_part(&self) -> Option<usize> {
    (!self.done).then_some(self.active)
  }

  pub fn nodes_visited(&self) -> usize {
    self.parts.iter().map(|(p, _)| p.nodes_visited()).sum()
  }

  fn rotate(&mut self) {
    self.active = (self.active + 1) % self.parts.len();
    self.taken = 0;
  }

  /// Make sure the active part still has labels, trying each part once
  /// plus the starting one again.
  fn seek_live_part(&mut self) {
    if self.parts.is_empty() {
      self.done = true;
      return;
    }
    for _ in 0..=self.parts.len() {
      if !self.parts[self.active].0.is_at_end() {
        return;
      }
      self.rotate();
    }
    self.done = true;
  }
}

#[cfg(test)]
#[path = "composite_test.rs"]
mod composite_test;
