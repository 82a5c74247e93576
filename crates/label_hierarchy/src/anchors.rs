//! AnchorSet - caller-owned parallel arrays describing label anchors.
//!
//! The hierarchy only ever stores anchor ids. Positions, priorities and the
//! remaining per-label attributes stay here, indexed by id.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use glam::DVec3;

use crate::error::HierarchyError;

/// Index of an anchor in its [`AnchorSet`].
pub type AnchorId = usize;

static NEXT_SET_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one state of one anchor set.
///
/// Two stamps compare equal only when they come from the same set and no
/// modification happened in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnchorStamp {
  pub set_id: u64,
  pub generation: u64,
}

/// Label anchors as parallel attribute arrays.
///
/// Every optional array must have exactly one entry per position.
#[derive(Debug)]
pub struct AnchorSet {
  set_id: u64,
  generation: u64,
  positions: Vec<DVec3>,
  priorities: Option<Vec<f64>>,
  sizes: Option<Vec<[f64; 2]>>,
  orientations: Option<Vec<f64>>,
  icon_indices: Option<Vec<i32>>,
  labels: Option<Vec<String>>,
}

impl AnchorSet {
  /// Create a new anchor set from positions only.
  ///
  /// Fails when a coordinate is NaN or infinite.
  pub fn new(positions: Vec<DVec3>) -> Result<Self, HierarchyError> {
    if let Some(id) = positions.iter().position(|p| !p.is_finite()) {
      return Err(HierarchyError::NonFiniteCoordinate { id });
    }
    Ok(Self {
      set_id: NEXT_SET_ID.fetch_add(1, AtomicOrdering::Relaxed),
      generation: 0,
      positions,
      priorities: None,
      sizes: None,
      orientations: None,
      icon_indices: None,
      labels: None,
    })
  }

  pub fn with_priorities(mut self, priorities: Vec<f64>) -> Result<Self, HierarchyError> {
    self.check_len("priority", priorities.len())?;
    self.priorities = Some(priorities);
    Ok(self)
  }

  /// Label extents in screen units (width, height).
  pub fn with_sizes(mut self, sizes: Vec<[f64; 2]>) -> Result<Self, HierarchyError> {
    self.check_len("size", sizes.len())?;
    self.sizes = Some(sizes);
    Ok(self)
  }

  /// Label orientation in degrees.
  pub fn with_orientations(mut self, orientations: Vec<f64>) -> Result<Self, HierarchyError> {
    self.check_len("orientation", orientations.len())?;
    self.orientations = Some(orientations);
    Ok(self)
  }

  pub fn with_icon_indices(mut self, icon_indices: Vec<i32>) -> Result<Self, HierarchyError> {
    self.check_len("icon_index", icon_indices.len())?;
    self.icon_indices = Some(icon_indices);
    Ok(self)
  }

  pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self, HierarchyError> {
    self.check_len("label", labels.len())?;
    self.labels = Some(labels);
    Ok(self)
  }

  fn check_len(&self, name: &'static str, actual: usize) -> Result<(), HierarchyError> {
    if actual != self.positions.len() {
      return Err(HierarchyError::AttributeLength {
        name,
        expected: self.positions.len(),
        actual,
      });
    }
    Ok(())
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.positions.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  #[inline]
  pub fn positions(&self) -> &[DVec3] {
    &self.positions
  }

  #[inline]
  pub fn position(&self, id: AnchorId) -> Option<DVec3> {
    self.positions.get(id).copied()
  }

  #[inline]
  pub fn priorities(&self) -> Option<&[f64]> {
    self.priorities.as_deref()
  }

  pub fn priority(&self, id: AnchorId) -> Option<f64> {
    self.priorities.as_ref().and_then(|p| p.get(id).copied())
  }

  pub fn size(&self, id: AnchorId) -> Option<[f64; 2]> {
    self.sizes.as_ref().and_then(|s| s.get(id).copied())
  }

  pub fn orientation(&self, id: AnchorId) -> Option<f64> {
    self.orientations.as_ref().and_then(|o| o.get(id).copied())
  }

  pub fn icon_index(&self, id: AnchorId) -> Option<i32> {
    self.icon_indices.as_ref().and_then(|i| i.get(id).copied())
  }

  pub fn label(&self, id: AnchorId) -> Option<&str> {
    self.labels.as_ref().and_then(|l| l.get(id).map(String::as_str))
  }

  /// Move one anchor. Bumps the generation so a hierarchy built from this
  /// set knows it is stale.
  pub fn set_position(&mut self, id: AnchorId, position: DVec3) -> Result<(), HierarchyError> {
    if !position.is_finite() {
      return Err(HierarchyError::NonFiniteCoordinate { id });
    }
    let count = self.positions.len();
    let slot = self
      .positions
      .get_mut(id)
      .ok_or(HierarchyError::AnchorOutOfRange { id, count })?;
    *slot = position;
    self.mark_modified();
    Ok(())
  }

  /// Replace the priority array. Bumps the generation.
  pub fn set_priorities(&mut self, priorities: Vec<f64>) -> Result<(), HierarchyError> {
    self.check_len("priority", priorities.len())?;
    self.priorities = Some(priorities);
    self.mark_modified();
    Ok(())
  }

  /// Flag the set as changed after an external edit.
  pub fn mark_modified(&mut self) {
    self.generation += 1;
  }

  #[inline]
  pub fn generation(&self) -> u64 {
    self.generation
  }

  #[inline]
  pub fn stamp(&self) -> AnchorStamp {
    AnchorStamp {
      set_id: self.set_id,
      generation: self.generation,
    }
  }

  /// Ranking context used for every ordered insert.
  #[inline]
  pub fn ranking(&self) -> AnchorRanking<'_> {
    AnchorRanking {
      priorities: self.priorities.as_deref(),
    }
  }

  /// Positions writable without bumping the generation. Used by the builder
  /// to apply coincident-point offsets as part of the build itself.
  pub(crate) fn positions_mut_untracked(&mut self) -> &mut [DVec3] {
    &mut self.positions
  }
}

impl Clone for AnchorSet {
  fn clone(&self) -> Self {
    Self {
      set_id: NEXT_SET_ID.fetch_add(1, AtomicOrdering::Relaxed),
      generation: self.generation,
      positions: self.positions.clone(),
      priorities: self.priorities.clone(),
      sizes: self.sizes.clone(),
      orientations: self.orientations.clone(),
      icon_indices: self.icon_indices.clone(),
      labels: self.labels.clone(),
    }
  }
}

/// Orders anchors by descending priority, then ascending id.
///
/// Without priorities the order is ascending id. NaN priorities follow IEEE
/// total order.
#[derive(Clone, Copy, Debug)]
pub struct AnchorRanking<'a> {
  priorities: Option<&'a [f64]>,
}

impl<'a> AnchorRanking<'a> {
  pub fn new(priorities: Option<&'a [f64]>) -> Self {
    Self { priorities }
  }

  /// `Less` means `a` ranks ahead of `b`.
  #[inline]
  pub fn compare(&self, a: AnchorId, b: AnchorId) -> Ordering {
    let by_priority = match self.priorities {
      Some(p) => match (p.get(a), p.get(b)) {
        (Some(pa), Some(pb)) => pb.total_cmp(pa),
        _ => Ordering::Equal,
      },
      None => Ordering::Equal,
    };
    by_priority.then(a.cmp(&b))
  }

  /// All ids `0..count` in ranking order.
  pub fn sorted_ids(&self, count: usize) -> Vec<AnchorId> {
    let mut ids: Vec<AnchorId> = (0..count).collect();
    ids.sort_by(|&a, &b| self.compare(a, b));
    ids
  }
}

#[cfg(test)]
#[path = "anchors_test.rs"]
mod anchors_test;
