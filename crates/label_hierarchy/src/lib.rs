//! label_hierarchy - spatial index for interactive label decluttering
//!
//! Stores a large set of prioritized label anchors in an adaptive
//! octree/quadtree and pulls a budgeted, camera-ordered stream of anchor ids
//! out of it every frame. The placer downstream decides which labels
//! actually fit on screen.
//!
//! # Features
//!
//! - **Adaptive tree**: nodes split once they hold `target_label_count`
//!   anchors, up to `maximum_depth`; flat inputs get a quadtree
//! - **Promotion**: high-priority anchors migrate toward the root so coarse
//!   levels carry the most important labels
//! - **Traversal strategies**: frustum radius search, full sort, budgeted
//!   queues, depth-first, and round-robin composites of those
//! - **Frame coherence**: each walk first replays last frame's placed labels
//!
//! # Example
//!
//! ```ignore
//! use label_hierarchy::{AnchorSet, HierarchyConfig, LabelHierarchy};
//! use label_hierarchy::{TraversalOptions, TraversalStrategy, ViewSnapshot};
//!
//! let mut anchors = AnchorSet::new(positions)?.with_priorities(priorities)?;
//! let mut hierarchy = LabelHierarchy::new(HierarchyConfig::default())?;
//! hierarchy.compute(&mut anchors)?;
//!
//! let view = ViewSnapshot::look_at(eye, target, up, 30.0, aspect, 0.1, 1e4);
//! let mut labels = hierarchy.iterator(TraversalStrategy::Queue, &view, &TraversalOptions::DEFAULT);
//! labels.begin(&placed_last_frame);
//! while let Some(id) = labels.label_id() {
//!   // try to place `id`
//!   labels.advance();
//! }
//! ```

pub mod anchors;
pub mod coincident;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod traversal;
pub mod view;

#[cfg(test)]
mod test_utils;

// Re-export commonly used items
pub use anchors::{AnchorId, AnchorRanking, AnchorSet, AnchorStamp};
pub use coincident::{find_coincident, spiral_offsets, CoincidentGroup};
pub use config::{HierarchyConfig, MAX_SUPPORTED_DEPTH};
pub use error::HierarchyError;
pub use hierarchy::{BuildStats, LabelHierarchy, LabelSet, NodeGeometry, NodeId, SpatialIndex};
pub use traversal::{
  FrustumSearch, LabelIterator, TraversalOptions, TraversalState, TraversalStrategy,
  MAXIMUM_NODES_QUEUED,
};
pub use view::{Containment, Frustum, ViewSnapshot};
