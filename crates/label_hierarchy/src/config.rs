//! HierarchyConfig - knobs that shape how anchors are distributed in the tree.

use crate::error::HierarchyError;

/// Deepest tree the builder will create. Grid coordinates at this level still
/// fit comfortably in `i32`.
pub const MAX_SUPPORTED_DEPTH: u32 = 20;

/// Configuration for building a label hierarchy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HierarchyConfig {
  /// Anchors a node may hold before insertions spill into its children.
  pub target_label_count: usize,

  /// Deepest level a node may live at. The root is level 0.
  pub maximum_depth: u32,

  /// Move a level-dependent share of leaf anchors toward the root after
  /// insertion.
  pub promote_anchors: bool,

  /// Spread anchors sharing a coordinate along a small spiral.
  pub perturb_coincident: bool,

  /// Seed for the stochastic rounding used during promotion.
  /// `None` draws a fresh seed per build.
  pub promotion_seed: Option<u64>,
}

impl HierarchyConfig {
  /// Reject configurations the builder cannot honour.
  pub fn validate(&self) -> Result<(), HierarchyError> {
    if self.target_label_count == 0 {
      return Err(HierarchyError::ZeroTargetLabelCount);
    }
    if self.maximum_depth > MAX_SUPPORTED_DEPTH {
      return Err(HierarchyError::DepthTooLarge {
        requested: self.maximum_depth,
        limit: MAX_SUPPORTED_DEPTH,
      });
    }
    Ok(())
  }
}

impl Default for HierarchyConfig {
  fn default() -> Self {
    Self {
      target_label_count: 16,
      maximum_depth: 5,
      promote_anchors: true,
      perturb_coincident: true,
      promotion_seed: None,
    }
  }
}
