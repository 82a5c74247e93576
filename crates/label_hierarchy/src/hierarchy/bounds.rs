//! Axis-aligned bounding box with double precision.

use glam::DVec3;

/// Double-precision axis-aligned bounding box.
///
/// Used for the anchor bounds that size the root and for the boxes handed to
/// the frustum test during traversal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DAabb3 {
	/// Minimum corner (inclusive).
	pub min: DVec3,
	/// Maximum corner (inclusive).
	pub max: DVec3,
}

impl DAabb3 {
	/// Create a new AABB from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: DVec3, max: DVec3) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y && min.z <= max.z,
			"AABB min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Create a new AABB from center and half-extents.
	pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
		Self {
			min: center - half_extents,
			max: center + half_extents,
		}
	}

	/// Smallest box enclosing every point, or `None` for an empty slice.
	pub fn enclosing(points: &[DVec3]) -> Option<Self> {
		let first = *points.first()?;
		let (min, max) = points
			.iter()
			.fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
		Some(Self { min, max })
	}

	/// Get the size of the AABB (max - min).
	#[inline]
	pub fn size(&self) -> DVec3 {
		self.max - self.min
	}

	/// Get the center of the AABB.
	#[inline]
	pub fn center(&self) -> DVec3 {
		(self.min + self.max) * 0.5
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_center_half_extents() {
		let aabb = DAabb3::from_center_half_extents(DVec3::ZERO, DVec3::splat(10.0));
		assert_eq!(aabb.min, DVec3::splat(-10.0));
		assert_eq!(aabb.max, DVec3::splat(10.0));
	}

	#[test]
	fn test_enclosing() {
		let points = [
			DVec3::new(1.0, -2.0, 0.0),
			DVec3::new(-4.0, 3.0, 0.0),
			DVec3::new(0.0, 0.0, 0.0),
		];
		let aabb = DAabb3::enclosing(&points).unwrap();
		assert_eq!(aabb.min, DVec3::new(-4.0, -2.0, 0.0));
		assert_eq!(aabb.max, DVec3::new(1.0, 3.0, 0.0));
		assert_eq!(aabb.size().z, 0.0);
	}

	#[test]
	fn test_enclosing_empty() {
		assert!(DAabb3::enclosing(&[]).is_none());
	}

	#[test]
	fn test_center_and_size() {
		let aabb = DAabb3::new(DVec3::new(-1.0, -2.0, -3.0), DVec3::new(1.0, 2.0, 3.0));
		assert_eq!(aabb.center(), DVec3::ZERO);
		assert_eq!(aabb.size(), DVec3::new(2.0, 4.0, 6.0));
	}
}
