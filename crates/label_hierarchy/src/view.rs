//! Camera snapshot consumed by every traversal strategy.
//!
//! Only the eye position, the view angle and six clip planes are needed;
//! projection setup belongs to the renderer.

use glam::{DMat4, DVec3, DVec4};

use crate::hierarchy::bounds::DAabb3;

/// Result of testing a box against the frustum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Containment {
  Outside,
  Intersecting,
  Inside,
}

/// Six clip planes `(a, b, c, d)`; a point is inside a plane when
/// `a·x + b·y + c·z + d ≥ 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
  pub planes: [DVec4; 6],
}

impl Frustum {
  pub fn from_planes(planes: [DVec4; 6]) -> Self {
    Self { planes }
  }

  /// Extract planes from a view-projection matrix with a `[0, 1]` depth range
  /// (the convention of `DMat4::perspective_rh`).
  pub fn from_view_projection(m: &DMat4) -> Self {
    let r0 = m.row(0);
    let r1 = m.row(1);
    let r2 = m.row(2);
    let r3 = m.row(3);
    let planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2].map(normalize_plane);
    Self { planes }
  }

  /// A frustum that accepts every point. Handy for exhaustive walks.
  pub fn everything() -> Self {
    Self {
      planes: [DVec4::new(0.0, 0.0, 0.0, 1.0); 6],
    }
  }

  #[inline]
  pub fn contains_point(&self, p: DVec3) -> bool {
    self.planes.iter().all(|pl| signed_distance(*pl, p) >= 0.0)
  }

  /// Classify an axis-aligned box against all six planes.
  pub fn classify(&self, aabb: &DAabb3) -> Containment {
    let mut inside = true;
    for plane in &self.planes {
      let normal = plane.truncate();
      // corner furthest along the normal, and its opposite
      let far = DVec3::select(normal.cmpge(DVec3::ZERO), aabb.max, aabb.min);
      let near = DVec3::select(normal.cmpge(DVec3::ZERO), aabb.min, aabb.max);
      if signed_distance(*plane, far) < 0.0 {
        return Containment::Outside;
      }
      if signed_distance(*plane, near) < 0.0 {
        inside = false;
      }
    }
    if inside {
      Containment::Inside
    } else {
      Containment::Intersecting
    }
  }
}

#[inline]
fn signed_distance(plane: DVec4, p: DVec3) -> f64 {
  plane.truncate().dot(p) + plane.w
}

fn normalize_plane(plane: DVec4) -> DVec4 {
  let len = plane.truncate().length();
  if len > 0.0 {
    plane / len
  } else {
    plane
  }
}

/// Camera state copied into an iterator when it is prepared.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewSnapshot {
  /// Eye position in world space.
  pub eye: DVec3,
  /// Vertical view angle in degrees.
  pub view_angle: f64,
  pub frustum: Frustum,
}

impl ViewSnapshot {
  pub fn new(eye: DVec3, view_angle: f64, frustum: Frustum) -> Self {
    Self {
      eye,
      view_angle,
      frustum,
    }
  }

  /// Build a perspective camera looking from `eye` toward `target`.
  pub fn look_at(
    eye: DVec3,
    target: DVec3,
    up: DVec3,
    view_angle: f64,
    aspect: f64,
    near: f64,
    far: f64,
  ) -> Self {
    let view = DMat4::look_at_rh(eye, target, up);
    let proj = DMat4::perspective_rh(view_angle.to_radians(), aspect, near, far);
    Self {
      eye,
      view_angle,
      frustum: Frustum::from_view_projection(&(proj * view)),
    }
  }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;
