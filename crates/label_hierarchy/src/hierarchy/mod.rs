//! Label hierarchy - an adaptive octree/quadtree of prioritized anchors.
//!
//! The tree is rebuilt wholesale whenever the anchor set changes. Upper
//! levels hold the highest-priority anchors so that a coarse-to-fine walk
//! surfaces important labels first.
//!
//! # Module Structure
//!
//! - [`bounds`]: `DAabb3` - anchor bounds and traversal boxes
//! - [`node`]: `LabelSet`, `HierarchyNode`, `NodeId`
//! - [`index`]: `SpatialIndex` - node arena, insertion and path math
//! - `builder`: `LabelHierarchy::compute` / `refresh`
//! - `promotion`: moving leaf anchors toward the root

pub mod bounds;
mod builder;
pub mod index;
pub mod node;
mod promotion;

use std::time::Duration;

pub use bounds::DAabb3;
pub use index::{NodePath, SpatialIndex};
pub use node::{HierarchyNode, LabelSet, NodeGeometry, NodeId};

use crate::anchors::AnchorStamp;
use crate::coincident::CoincidentGroup;
use crate::config::HierarchyConfig;
use crate::error::HierarchyError;

/// Summary of one build.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuildStats {
  pub anchor_count: usize,
  pub node_count: usize,
  pub leaf_count: usize,
  pub actual_depth: u32,
  /// Average level of the leaves holding at least one anchor.
  pub mean_leaf_depth: f64,
  /// Anchors moved toward the root during promotion.
  pub promoted_anchors: usize,
  pub coincident_groups: usize,
  pub build_time: Duration,
}

/// Built hierarchy plus the bookkeeping needed to know when it is stale.
#[derive(Clone, Debug)]
pub struct LabelHierarchy {
  config: HierarchyConfig,
  index: SpatialIndex,
  anchor_count: usize,
  built_from: Option<AnchorStamp>,
  coincident_groups: Vec<CoincidentGroup>,
  stats: BuildStats,
}

impl LabelHierarchy {
  /// Create a new, empty hierarchy. Call [`LabelHierarchy::compute`] to fill
  /// it.
  pub fn new(config: HierarchyConfig) -> Result<Self, HierarchyError> {
    config.validate()?;
    let index = SpatialIndex::new(
      NodeGeometry {
        center: glam::DVec3::ZERO,
        size: 1.0,
      },
      2,
      config.target_label_count,
      config.maximum_depth,
    );
    Ok(Self {
      config,
      index,
      anchor_count: 0,
      built_from: None,
      coincident_groups: Vec::new(),
      stats: BuildStats::default(),
    })
  }

  #[inline]
  pub fn config(&self) -> &HierarchyConfig {
    &self.config
  }

  #[inline]
  pub fn index(&self) -> &SpatialIndex {
    &self.index
  }

  #[inline]
  pub fn target_label_count(&self) -> usize {
    self.config.target_label_count
  }

  #[inline]
  pub fn maximum_depth(&self) -> u32 {
    self.config.maximum_depth
  }

  #[inline]
  pub fn actual_depth(&self) -> u32 {
    self.index.actual_depth()
  }

  /// 2 when every anchor shares one z, otherwise 3.
  #[inline]
  pub fn dimension(&self) -> u32 {
    self.index.dimension()
  }

  #[inline]
  pub fn is_quadtree(&self) -> bool {
    self.index.dimension() == 2
  }

  /// Anchors indexed by the last build. Ids at or above this are stale.
  #[inline]
  pub fn anchor_count(&self) -> usize {
    self.anchor_count
  }

  /// Groups that shared a coordinate before perturbation, with their
  /// original center.
  #[inline]
  pub fn coincident_groups(&self) -> &[CoincidentGroup] {
    &self.coincident_groups
  }

  #[inline]
  pub fn stats(&self) -> &BuildStats {
    &self.stats
  }

  /// Stamp of the anchor set state the tree reflects.
  #[inline]
  pub fn built_from(&self) -> Option<AnchorStamp> {
    self.built_from
  }
}
