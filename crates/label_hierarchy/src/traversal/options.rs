//! Per-frame traversal budgets and culling knobs.

/// Cumulative enqueue budget of the queue iterators, root included.
pub const MAXIMUM_NODES_QUEUED: usize = 128;

/// Label budget of the full-sort walk.
pub const FULL_SORT_LABEL_BUDGET: usize = 10_000;

/// How far the frustum iterator searches each level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FrustumSearch {
  /// Every radius in the offset table. Complete, but slower and labels may
  /// pop as the camera moves.
  #[default]
  Complete,
  /// Stop a level once the radius exceeds a view-angle dependent bound.
  Coherent,
}

/// Options shared by all traversal strategies.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TraversalOptions {
  /// Reject nodes whose `(size/2)²` is below `distance² * size_limit`.
  /// 0 keeps every node regardless of apparent size.
  pub size_limit: f64,
  /// Treat node centers as surface normals (globe views) and skip nodes
  /// facing away from the camera. Full-sort only.
  pub positions_as_normals: bool,
  pub full_sort_label_budget: usize,
  pub queue_node_budget: usize,
  pub frustum_search: FrustumSearch,
}

impl TraversalOptions {
  /// Default limits for interactive use.
  pub const DEFAULT: Self = Self {
    size_limit: 0.0,
    positions_as_normals: false,
    full_sort_label_budget: FULL_SORT_LABEL_BUDGET,
    queue_node_budget: MAXIMUM_NODES_QUEUED,
    frustum_search: FrustumSearch::Complete,
  };

  /// No budgets. For tests and offline processing.
  pub const UNLIMITED: Self = Self {
    size_limit: 0.0,
    positions_as_normals: false,
    full_sort_label_budget: usize::MAX,
    queue_node_budget: usize::MAX,
    frustum_search: FrustumSearch::Complete,
  };
}

impl Default for TraversalOptions {
  fn default() -> Self {
    Self::DEFAULT
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_options() {
    let options = TraversalOptions::default();
    assert_eq!(options.queue_node_budget, 128);
    assert_eq!(options.full_sort_label_budget, 10_000);
    assert_eq!(options.size_limit, 0.0);
    assert_eq!(options.frustum_search, FrustumSearch::Complete);
  }

  #[test]
  fn test_unlimited_options() {
    let options = TraversalOptions::UNLIMITED;
    assert_eq!(options.queue_node_budget, usize::MAX);
    assert_eq!(options.full_sort_label_budget, usize::MAX);
  }
}
