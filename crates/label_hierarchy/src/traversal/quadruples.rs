//! Pseudo-Pythagorean quadruples `(i² + j² + k², i, j, k)` with
//! `i ≥ j ≥ k ≥ 0`, sorted by radius.
//!
//! Each entry stands for every cell offset obtained by permuting and
//! sign-flipping `(i, j, k)`, so walking the table enumerates grid cells in
//! order of distance from a center cell.
//!
//! Shallow levels read a shared precomputed table. Deeper levels, whose
//! grids outgrow it, draw from a [`QuadrupleStream`] bounded by the grid.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use once_cell::sync::Lazy;

/// Largest component in the shared table. Covers every offset of a level-6
/// grid.
pub const QUADRUPLE_COMPONENT_LIMIT: i32 = 63;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quadruple {
  pub radius_squared: i64,
  pub ijk: [i32; 3],
}

impl Quadruple {
  fn new(i: i32, j: i32, k: i32) -> Self {
    let (a, b, c) = (i as i64, j as i64, k as i64);
    Self {
      radius_squared: a * a + b * b + c * c,
      ijk: [i, j, k],
    }
  }
}

static QUADRUPLES: Lazy<Vec<Quadruple>> = Lazy::new(|| {
  let limit = QUADRUPLE_COMPONENT_LIMIT;
  let mut table = Vec::new();
  for i in 0..=limit {
    for j in 0..=i {
      for k in 0..=j {
        table.push(Quadruple::new(i, j, k));
      }
    }
  }
  table.sort();
  table
});

/// The shared table, ascending by radius.
pub fn quadruples() -> &'static [Quadruple] {
  &QUADRUPLES
}

/// Quadruples in table order, generated on demand up to a component bound.
///
/// Every entry has one predecessor: `(i, j, k)` with `k > 0` comes from
/// `(i, j, k - 1)`, `(i, j, 0)` with `j > 0` from `(i, j - 1, 0)`, and
/// `(i, 0, 0)` from `(i - 1, 0, 0)`. Successors never have a smaller radius,
/// so popping the heap yields the same order as the sorted table.
#[derive(Clone, Debug)]
pub struct QuadrupleStream {
  heap: BinaryHeap<Reverse<Quadruple>>,
  max_component: i32,
  /// Only `k == 0` entries, for quadtrees.
  flat: bool,
}

impl QuadrupleStream {
  pub fn new(max_component: i32, flat: bool) -> Self {
    let mut heap = BinaryHeap::new();
    if max_component >= 0 {
      heap.push(Reverse(Quadruple::new(0, 0, 0)));
    }
    Self {
      heap,
      max_component,
      flat,
    }
  }

  /// Next entry without consuming it.
  pub fn peek(&self) -> Option<Quadruple> {
    self.heap.peek().map(|Reverse(q)| *q)
  }
}

impl Iterator for QuadrupleStream {
  type Item = Quadruple;

  fn next(&mut self) -> Option<Quadruple> {
    let Reverse(q) = self.heap.pop()?;
    let [i, j, k] = q.ijk;
    if j == 0 && k == 0 && i < self.max_component {
      self.heap.push(Reverse(Quadruple::new(i + 1, 0, 0)));
    }
    if k == 0 && j < i {
      self.heap.push(Reverse(Quadruple::new(i, j + 1, 0)));
    }
    if !self.flat && k < j {
      self.heap.push(Reverse(Quadruple::new(i, j, k + 1)));
    }
    Some(q)
  }
}

/// Distinct permutations of `ijk`.
pub(crate) fn distinct_permutations(ijk: [i32; 3]) -> smallvec::SmallVec<[[i32; 3]; 6]> {
  const ORDERS: [[usize; 3]; 6] = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
  let mut out = smallvec::SmallVec::new();
  for order in ORDERS {
    let p = [ijk[order[0]], ijk[order[1]], ijk[order[2]]];
    if !out.contains(&p) {
      out.push(p);
    }
  }
  out
}

/// Apply sign pattern `flip` (bit n negates component n). `None` when the
/// pattern negates a zero, which would repeat an earlier offset.
#[inline]
pub(crate) fn apply_sign_flip(ijk: [i32; 3], flip: u8) -> Option<[i32; 3]> {
  let mut out = ijk;
  for (axis, c) in out.iter_mut().enumerate() {
    if flip & (1 << axis) != 0 {
      if *c == 0 {
        return None;
      }
      *c = -*c;
    }
  }
  Some(out)
}
