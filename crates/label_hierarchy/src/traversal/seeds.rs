//! Replay of the previous frame's placed labels.

use crate::anchors::AnchorId;

/// Yields seed ids verbatim, skipping ids the current build does not know.
#[derive(Clone, Debug, Default)]
pub(crate) struct SeedReplay {
  ids: Vec<AnchorId>,
  cursor: usize,
}

impl SeedReplay {
  pub(crate) fn new(seeds: &[AnchorId], anchor_count: usize) -> Self {
    Self {
      ids: seeds.iter().copied().filter(|id| *id < anchor_count).collect(),
      cursor: 0,
    }
  }

  #[inline]
  pub(crate) fn is_active(&self) -> bool {
    self.cursor < self.ids.len()
  }

  #[inline]
  pub(crate) fn current(&self) -> Option<AnchorId> {
    self.ids.get(self.cursor).copied()
  }

  #[inline]
  pub(crate) fn advance(&mut self) {
    if self.is_active() {
      self.cursor += 1;
    }
  }
}
