//! HierarchyBuilder - populating a [`LabelHierarchy`] from an [`AnchorSet`].

use glam::DVec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use web_time::Instant;

use super::bounds::DAabb3;
use super::index::SpatialIndex;
use super::node::NodeGeometry;
use super::promotion::promote_anchors;
use super::{BuildStats, LabelHierarchy};
use crate::anchors::AnchorSet;
use crate::coincident::{find_coincident, spiral_offsets};
use crate::error::HierarchyError;

impl LabelHierarchy {
  /// Rebuild the tree from `anchors`.
  ///
  /// Anchors are inserted best ranked first, then promoted toward the root,
  /// then anchors sharing a coordinate are spread along a spiral. The
  /// spiral offsets are written back into `anchors` without bumping its
  /// generation.
  #[tracing::instrument(skip_all, name = "hierarchy::compute", fields(anchors = anchors.len()))]
  pub fn compute(&mut self, anchors: &mut AnchorSet) -> Result<BuildStats, HierarchyError> {
    self.config.validate()?;
    let start = Instant::now();

    let (root, dimension) = root_geometry(anchors.positions());
    let mut index = SpatialIndex::new(
      root,
      dimension,
      self.config.target_label_count,
      self.config.maximum_depth,
    );

    let ranking = anchors.ranking();
    for id in ranking.sorted_ids(anchors.len()) {
      let normalized = (anchors.positions()[id] - root.center) / root.size + DVec3::splat(0.5);
      index.insert(id, normalized, &ranking);
    }

    let promoted_anchors = if self.config.promote_anchors {
      let mut rng = match self.config.promotion_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
      };
      promote_anchors(&mut index, &ranking, &mut rng)
    } else {
      0
    };

    let coincident_groups = if self.config.perturb_coincident {
      let groups = find_coincident(anchors.positions());
      let scale = root.size / 2f64.powi(self.config.maximum_depth as i32);
      let positions = anchors.positions_mut_untracked();
      for group in &groups {
        let offsets = spiral_offsets(group.ids.len() + 1);
        for (slot, &id) in group.ids.iter().enumerate() {
          let offset = offsets[slot + 1] * scale;
          positions[id] += DVec3::new(offset.x, offset.y, 0.0);
        }
      }
      groups
    } else {
      Vec::new()
    };

    let leaf_depths: Vec<u32> = index
      .leaves()
      .into_iter()
      .map(|id| index.node(id))
      .filter(|n| n.labels().local_anchor_count() > 0)
      .map(|n| n.level())
      .collect();
    let mean_leaf_depth = if leaf_depths.is_empty() {
      0.0
    } else {
      leaf_depths.iter().map(|d| *d as f64).sum::<f64>() / leaf_depths.len() as f64
    };

    let stats = BuildStats {
      anchor_count: anchors.len(),
      node_count: index.node_count(),
      leaf_count: index.leaves().len(),
      actual_depth: index.actual_depth(),
      mean_leaf_depth,
      promoted_anchors,
      coincident_groups: coincident_groups.len(),
      build_time: start.elapsed(),
    };

    tracing::debug!(
      anchors = stats.anchor_count,
      nodes = stats.node_count,
      depth = stats.actual_depth,
      promoted = stats.promoted_anchors,
      coincident = stats.coincident_groups,
      "label hierarchy built"
    );

    self.index = index;
    self.anchor_count = anchors.len();
    self.coincident_groups = coincident_groups;
    self.built_from = Some(anchors.stamp());
    self.stats = stats;
    Ok(stats)
  }

  /// Rebuild only when `anchors` is not the set state last built from.
  /// Returns the new stats when a rebuild happened.
  pub fn refresh(&mut self, anchors: &mut AnchorSet) -> Result<Option<BuildStats>, HierarchyError> {
    if self.built_from == Some(anchors.stamp()) {
      return Ok(None);
    }
    self.compute(anchors).map(Some)
  }
}

/// Root geometry and dimensionality for a point cloud.
///
/// The edge is the largest extent, or 1 when all points coincide. A zero z
/// extent selects a quadtree.
fn root_geometry(positions: &[DVec3]) -> (NodeGeometry, u32) {
  let Some(bounds) = DAabb3::enclosing(positions) else {
    return (
      NodeGeometry {
        center: DVec3::ZERO,
        size: 1.0,
      },
      2,
    );
  };
  let extent = bounds.size();
  let largest = extent.max_element();
  let size = if largest > 0.0 { largest } else { 1.0 };
  let dimension = if extent.z == 0.0 { 2 } else { 3 };
  (
    NodeGeometry {
      center: bounds.center(),
      size,
    },
    dimension,
  )
}
