//! Anchor promotion - moving a level-dependent share of each leaf's best
//! anchors toward the root.
//!
//! A leaf at level `L` gives up
//!
//! ```text
//! t * (2^(dL) - 1) / 2^(dL) / (2^d - 1)
//! ```
//!
//! anchors (stochastically rounded), where `t` is the target label count and
//! `d` the dimensionality. The batch climbs the ancestor chain: each
//! ancestor keeps its own share from the best-ranked end and the root keeps
//! whatever is left.

use rand::Rng;

use super::index::SpatialIndex;
use crate::anchors::AnchorRanking;

/// Floor `value`, then add one with probability equal to the remainder.
pub(crate) fn round_probabilistic<R: Rng + ?Sized>(value: f64, rng: &mut R) -> usize {
  let floor = value.floor();
  let mut n = floor as usize;
  let remainder = value - floor;
  if remainder > 0.0 && rng.random::<f64>() < remainder {
    n += 1;
  }
  n
}

/// Anchors a node at `level` should take, capped at `available`.
pub(crate) fn promotion_count<R: Rng + ?Sized>(
  target: usize,
  level: u32,
  dimension: u32,
  available: usize,
  rng: &mut R,
) -> usize {
  let cells = 2f64.powi((dimension * level) as i32);
  let siblings = ((1u32 << dimension) - 1) as f64;
  let share = target as f64 * (cells - 1.0) / cells / siblings;
  round_probabilistic(share, rng).min(available)
}

/// Promote anchors from every leaf. Returns how many anchors moved.
pub(crate) fn promote_anchors<R: Rng + ?Sized>(
  index: &mut SpatialIndex,
  ranking: &AnchorRanking<'_>,
  rng: &mut R,
) -> usize {
  let target = index.target_label_count();
  let dimension = index.dimension();
  let mut moved = 0;

  for leaf in index.leaves() {
    let leaf_level = index.node(leaf).level();
    if leaf_level == 0 {
      continue;
    }
    let available = index.node(leaf).labels().local_anchor_count();
    let count = promotion_count(target, leaf_level, dimension, available, rng);
    if count == 0 {
      continue;
    }

    let batch = {
      let node = index.node_mut(leaf);
      let batch = node.labels.take_best(count);
      node.labels.remove_from_total(batch.len());
      batch
    };
    moved += batch.len();

    let mut settled = 0;
    let mut cursor = leaf;
    while settled < batch.len() {
      let Some(parent) = index.node(cursor).parent() else {
        break;
      };
      let remaining = batch.len() - settled;
      let level = index.node(parent).level();
      let keep = if level == 0 {
        remaining
      } else {
        promotion_count(target, level, dimension, remaining, rng)
      };

      let node = index.node_mut(parent);
      for &id in &batch[settled..settled + keep] {
        node.labels.insert_ranked(id, ranking);
      }
      settled += keep;
      // what keeps climbing leaves this node's subtree
      node.labels.remove_from_total(batch.len() - settled);
      cursor = parent;
    }
  }

  tracing::trace!(moved, "anchors promoted");
  moved
}
