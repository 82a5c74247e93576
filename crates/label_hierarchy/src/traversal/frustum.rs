//! FrustumIterator - approximate front-to-back walk outward from the camera.
//!
//! Per level, cells are visited in order of integer distance from the
//! camera's cell by walking the quadruple table and expanding each entry
//! into its distinct permutations and sign flips. Levels wider than the
//! shared table generate their quadruples on the fly.

use std::f64::consts::FRAC_PI_2;

use smallvec::SmallVec;

use super::options::FrustumSearch;
use super::quadruples::{
  apply_sign_flip, distinct_permutations, quadruples, Quadruple, QuadrupleStream,
  QUADRUPLE_COMPONENT_LIMIT,
};
use super::seeds::SeedReplay;
use crate::anchors::AnchorId;
use crate::hierarchy::{NodeGeometry, NodeId, SpatialIndex};
use crate::view::ViewSnapshot;

/// Where the current level reads its quadruples from.
#[derive(Clone, Debug)]
enum OffsetSource {
  /// Position in the shared table.
  Table(usize),
  /// Levels whose grid is wider than the shared table.
  Stream(QuadrupleStream),
}

impl OffsetSource {
  fn peek(&self) -> Option<Quadruple> {
    match self {
      OffsetSource::Table(next) => quadruples().get(*next).copied(),
      OffsetSource::Stream(stream) => stream.peek(),
    }
  }

  fn skip(&mut self) {
    match self {
      OffsetSource::Table(next) => *next += 1,
      OffsetSource::Stream(stream) => {
        stream.next();
      }
    }
  }
}

#[derive(Clone, Debug)]
pub struct FrustumIterator<'h> {
  index: &'h SpatialIndex,
  view: ViewSnapshot,
  search: FrustumSearch,
  anchor_count: usize,
  seeds: SeedReplay,

  level: Option<u32>,
  camera_cell: [i32; 3],
  source: OffsetSource,
  /// Largest useful squared radius at the current level.
  radius_squared_limit: i64,
  /// Exclusive radius bound of the coherent search.
  coherent_radius: Option<f64>,
  permutations: SmallVec<[[i32; 3]; 6]>,
  permutation: usize,
  sign_flip: u8,

  current: Option<(NodeId, usize)>,
  structural_started: bool,
  at_end: bool,
  cells_tried: usize,
  nodes_visited: usize,
}

impl<'h> FrustumIterator<'h> {
  pub fn new(
    index: &'h SpatialIndex,
    anchor_count: usize,
    view: ViewSnapshot,
    search: FrustumSearch,
  ) -> Self {
    Self {
      index,
      view,
      search,
      anchor_count,
      seeds: SeedReplay::default(),
      level: None,
      camera_cell: [0; 3],
      source: OffsetSource::Table(0),
      radius_squared_limit: 0,
      coherent_radius: None,
      permutations: SmallVec::new(),
      permutation: 0,
      sign_flip: 0,
      current: None,
      structural_started: false,
      at_end: false,
      cells_tried: 0,
      nodes_visited: 0,
    }
  }

  pub fn begin(&mut self, seeds: &[AnchorId]) {
    self.seeds = SeedReplay::new(seeds, self.anchor_count);
    self.level = None;
    self.permutations.clear();
    self.current = None;
    self.structural_started = false;
    self.at_end = false;
    self.cells_tried = 0;
    self.nodes_visited = 0;
    if !self.seeds.is_active() {
      self.start_structural();
    }
  }

  pub fn advance(&mut self) {
    if self.at_end {
      return;
    }
    if self.seeds.is_active() {
      self.seeds.advance();
      if !self.seeds.is_active() {
        self.start_structural();
      }
      return;
    }
    if let Some((node, slot)) = self.current {
      if slot + 1 < self.index.node(node).labels().local_anchor_count() {
        self.current = Some((node, slot + 1));
        return;
      }
    }
    self.next_node();
  }

  #[inline]
  pub fn is_at_end(&self) -> bool {
    self.at_end
  }

  pub fn label_id(&self) -> Option<AnchorId> {
    if self.at_end {
      return None;
    }
    if self.seeds.is_active() {
      return self.seeds.current();
    }
    let (node, slot) = self.current?;
    self.index.node(node).labels().anchors().get(slot).copied()
  }

  pub fn node_geometry(&self) -> Option<NodeGeometry> {
    if self.seeds.is_active() {
      return None;
    }
    self.current.map(|(node, _)| self.index.node(node).geometry())
  }

  /// Node currently being drained.
  pub fn current_node(&self) -> Option<NodeId> {
    if self.seeds.is_active() {
      return None;
    }
    self.current.map(|(node, _)| node)
  }

  #[inline]
  pub fn nodes_visited(&self) -> usize {
    self.nodes_visited
  }

  /// Grid cells examined, hit or miss.
  #[inline]
  pub fn cells_tried(&self) -> usize {
    self.cells_tried
  }

  fn start_structural(&mut self) {
    if !self.structural_started {
      self.structural_started = true;
      self.next_node();
    }
  }

  /// Move to the next cell that holds local anchors.
  fn next_node(&mut self) {
    while let Some(offset) = self.next_offset() {
      let Some(level) = self.level else {
        break;
      };
      let cell = [
        self.camera_cell[0] + offset[0],
        self.camera_cell[1] + offset[1],
        self.camera_cell[2] + offset[2],
      ];
      let Some(path) = self.index.path_for_nodal_coordinates(cell, level) else {
        continue;
      };
      self.cells_tried += 1;
      let Some(node) = self.index.visit(&path) else {
        continue;
      };
      if self.index.node(node).labels().local_anchor_count() > 0 {
        self.nodes_visited += 1;
        self.current = Some((node, 0));
        return;
      }
    }
    self.current = None;
    self.at_end = true;
  }

  /// Next cell offset from the camera cell, moving to the next level when
  /// the current one is exhausted. `None` past the deepest level.
  fn next_offset(&mut self) -> Option<[i32; 3]> {
    loop {
      if let Some(&base) = self.permutations.get(self.permutation) {
        while self.sign_flip < 8 {
          let flip = self.sign_flip;
          self.sign_flip += 1;
          if let Some(offset) = apply_sign_flip(base, flip) {
            return Some(offset);
          }
        }
        self.permutation += 1;
        self.sign_flip = 0;
        continue;
      }

      if let Some(level) = self.level {
        if self.load_next_quadruple(level) {
          continue;
        }
      }

      let next_level = self.level.map_or(0, |l| l + 1);
      if next_level > self.index.actual_depth() {
        return None;
      }
      self.enter_level(next_level);
    }
  }

  fn enter_level(&mut self, level: u32) {
    self.level = Some(level);
    self.camera_cell = self.index.discrete_node_coordinates(self.view.eye, level);
    let max_component = (1i32 << level) - 1;
    self.source = if max_component <= QUADRUPLE_COMPONENT_LIMIT {
      OffsetSource::Table(0)
    } else {
      OffsetSource::Stream(QuadrupleStream::new(max_component, self.index.dimension() == 2))
    };
    self.permutations.clear();
    self.permutation = 0;
    self.sign_flip = 0;

    let cells = 1i64 << level;
    // no offset beyond the far corner of the grid can land inside it
    let reach = cells - 1;
    self.radius_squared_limit = reach * reach * self.index.dimension() as i64;
    self.coherent_radius = match self.search {
      FrustumSearch::Complete => None,
      FrustumSearch::Coherent => {
        let view_angle = self.view.view_angle.to_radians();
        let cell_size = self.index.root().geometry().size / cells as f64;
        Some(cell_size * (FRAC_PI_2 - 0.2 * view_angle).atan())
      }
    };
  }

  /// Load the permutations of the next usable quadruple. `false` once the
  /// level has nothing left within reach.
  fn load_next_quadruple(&mut self, level: u32) -> bool {
    let max_component = (1i32 << level) - 1;
    while let Some(q) = self.source.peek() {
      if q.radius_squared > self.radius_squared_limit {
        return false;
      }
      if let Some(radius) = self.coherent_radius {
        if (q.radius_squared as f64).sqrt() >= radius {
          return false;
        }
      }
      self.source.skip();
      if q.ijk[0] > max_component {
        continue;
      }
      let mut permutations = distinct_permutations(q.ijk);
      if self.index.dimension() == 2 {
        permutations.retain(|p| p[2] == 0);
      }
      if permutations.is_empty() {
        continue;
      }
      self.permutations = permutations;
      self.permutation = 0;
      self.sign_flip = 0;
      return true;
    }
    false
  }
}

#[cfg(test)]
#[path = "frustum_test.rs"]
mod frustum_test;
