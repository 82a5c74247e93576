//! Coincident points - grouping exact duplicates and spreading them apart.

use std::collections::HashMap;
use std::f64::consts::PI;

use glam::{DVec2, DVec3};

use crate::anchors::AnchorId;

/// Anchors that shared one coordinate before perturbation.
#[derive(Clone, Debug, PartialEq)]
pub struct CoincidentGroup {
  /// The shared coordinate.
  pub center: DVec3,
  /// Member ids, ascending.
  pub ids: Vec<AnchorId>,
}

/// Group ids whose coordinates are bit-identical.
///
/// Only groups with two or more members are returned, ordered by their first
/// id.
pub fn find_coincident(positions: &[DVec3]) -> Vec<CoincidentGroup> {
  let mut by_coord: HashMap<[u64; 3], Vec<AnchorId>> = HashMap::new();
  for (id, p) in positions.iter().enumerate() {
    // -0.0 and 0.0 are the same place
    let key = [
      (p.x + 0.0).to_bits(),
      (p.y + 0.0).to_bits(),
      (p.z + 0.0).to_bits(),
    ];
    by_coord.entry(key).or_default().push(id);
  }

  let mut groups: Vec<CoincidentGroup> = by_coord
    .into_values()
    .filter(|ids| ids.len() > 1)
    .map(|ids| CoincidentGroup {
      center: positions[ids[0]],
      ids,
    })
    .collect();
  groups.sort_by_key(|g| g.ids[0]);
  groups
}

const NEWTON_ITERATIONS: usize = 10;

/// `count` points spaced one unit of arc length apart along the spiral
/// `(t cos 2πt, t sin 2πt)`, starting at the origin.
pub fn spiral_offsets(count: usize) -> Vec<DVec2> {
  // arc length s(t) = π (t r + a² ln(t + r)) - π a² ln(a), r = sqrt(t² + a²)
  let a = 1.0 / (2.0 * PI);
  let a2 = a * a;
  let s0 = PI * a2 * a.ln();

  let mut out = Vec::with_capacity(count);
  for i in 0..count {
    if i == 0 {
      out.push(DVec2::ZERO);
      continue;
    }
    let target = 2.0 * i as f64 / 3.0_f64.sqrt();
    // empirical fit, close enough for Newton to converge in a few steps
    let mut t = 0.553 * target.powf(0.502);
    for _ in 0..NEWTON_ITERATIONS {
      let r = (t * t + a2).sqrt();
      let f = PI * (t * r + a2 * (t + r).ln()) - s0 - target;
      let df = 2.0 * PI * r;
      t -= f / df;
    }
    let angle = 2.0 * PI * t;
    out.push(DVec2::new(t * angle.cos(), t * angle.sin()));
  }
  out
}
