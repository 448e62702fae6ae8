//! Axis-aligned bounds: a tight box for measuring the cloud and the cube
//! that octree nodes subdivide.

use glam::{BVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box, grown point by point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb3 {
	/// Minimum corner (inclusive).
	pub min: Vec3,
	/// Maximum corner (inclusive).
	pub max: Vec3,
}

impl Aabb3 {
	/// An inverted box that any `extend` call replaces.
	pub const EMPTY: Self = Self {
		min: Vec3::INFINITY,
		max: Vec3::NEG_INFINITY,
	};

	/// Create a new AABB from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: Vec3, max: Vec3) -> Self {
		debug_assert!(
			min.cmple(max).all(),
			"AABB min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Tight bounds over a sequence of positions.
	pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
		let mut aabb = Self::EMPTY;
		for p in points {
			aabb.extend(p);
		}
		aabb
	}

	/// True until the first point is added.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.min.cmpgt(self.max).any()
	}

	/// Grow to include `point`.
	#[inline]
	pub fn extend(&mut self, point: Vec3) {
		self.min = self.min.min(point);
		self.max = self.max.max(point);
	}

	/// Get the size of the AABB (max - min).
	#[inline]
	pub fn size(&self) -> Vec3 {
		self.max - self.min
	}

	/// Get the center of the AABB.
	#[inline]
	pub fn centroid(&self) -> Vec3 {
		(self.min + self.max) * 0.5
	}
}


/// Axis-aligned cube stored as its two corners.
///
/// Corners are kept explicitly rather than derived from an edge length, so a
/// child shares its parent's center plane and outer faces bit for bit and the
/// octant test never routes a point outside the child it picks. Away from f32
/// rounding all three extents are equal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingCube {
	/// Minimum corner (inclusive).
	pub min: Vec3,
	/// Maximum corner (inclusive).
	pub max: Vec3,
}

impl BoundingCube {
	/// Create a cube from its minimum corner and edge length.
	///
	/// # Panics
	/// Debug-asserts that `edge > 0`.
	pub fn new(min: Vec3, edge: f32) -> Self {
		debug_assert!(edge > 0.0, "cube edge must be positive, got {edge}");
		Self {
			min,
			max: min + Vec3::splat(edge),
		}
	}

	/// Create a cube from both corners.
	pub fn from_corners(min: Vec3, max: Vec3) -> Self {
		debug_assert!(min.cmple(max).all(), "cube min must be <= max on all axes");
		Self { min, max }
	}

	/// Smallest cube centered on `aabb` that contains it.
	///
	/// The largest extent becomes the edge; shorter axes are expanded
	/// symmetrically. A zero-extent box (single point) gets edge 1.0.
	pub fn enclosing(aabb: &Aabb3) -> Self {
		let extent = aabb.size().max_element();
		let edge = if extent > 0.0 { extent } else { 1.0 };
		let half = Vec3::splat(edge * 0.5);
		let center = aabb.centroid();
		// Rounding in the centroid can shift a corner by an ulp; never cut
		// the original box off.
		Self {
			min: (center - half).min(aabb.min),
			max: (center + half).max(aabb.max),
		}
	}

	/// True when both corners are finite.
	#[inline]
	pub fn is_finite(&self) -> bool {
		self.min.is_finite() && self.max.is_finite()
	}

	/// Largest extent.
	#[inline]
	pub fn edge(&self) -> f32 {
		(self.max - self.min).max_element()
	}

	/// Center point; the split plane on every axis.
	#[inline]
	pub fn center(&self) -> Vec3 {
		let center = self.min + (self.max - self.min) * 0.5;
		center.clamp(self.min, self.max)
	}

	/// Boundary-inclusive containment test.
	#[inline]
	pub fn contains(&self, point: Vec3) -> bool {
		point.cmpge(self.min).all() && point.cmple(self.max).all()
	}

	/// True when f32 can no longer split the cube: on every axis the center
	/// rounds onto one of the faces, so halving makes no progress.
	pub fn is_indivisible(&self) -> bool {
		let center = self.center();
		(center.cmpeq(self.min) | center.cmpeq(self.max)).all()
	}

	/// Octant index of `point` relative to this cube's center.
	///
	/// Bit 0 = X, bit 1 = Y, bit 2 = Z. A bit is set only when the coordinate
	/// is strictly above the center, so ties go to the lower side.
	#[inline]
	pub fn octant_of(&self, point: Vec3) -> u8 {
		let center = self.center();
		let mut octant = 0u8;
		if point.x > center.x {
			octant |= 1;
		}
		if point.y > center.y {
			octant |= 2;
		}
		if point.z > center.z {
			octant |= 4;
		}
		octant
	}

	/// Child cube for `octant`: the half between a face and the center on
	/// each axis.
	pub fn child(&self, octant: u8) -> Self {
		debug_assert!(octant < 8, "octant out of range: {octant}");
		let center = self.center();
		let upper = BVec3::new(octant & 1 != 0, octant & 2 != 0, octant & 4 != 0);
		Self {
			min: Vec3::select(upper, center, self.min),
			max: Vec3::select(upper, self.max, center),
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::rngs::StdRng;
	use rand::{Rng, SeedableRng};

	use super::*;

	#[test]
	fn test_aabb_from_points() {
		let aabb = Aabb3::from_points([
			Vec3::new(1.0, -2.0, 3.0),
			Vec3::new(-1.0, 2.0, 0.0),
			Vec3::new(0.0, 0.0, 6.0),
		]);
		assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
		assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 6.0));
		assert_eq!(aabb.size(), Vec3::new(2.0, 4.0, 6.0));
		assert_eq!(aabb.centroid(), Vec3::new(0.0, 0.0, 3.0));
	}

	#[test]
	fn test_aabb_empty() {
		let mut aabb = Aabb3::EMPTY;
		assert!(aabb.is_empty());
		aabb.extend(Vec3::ONE);
		assert!(!aabb.is_empty());
		assert_eq!(aabb.size(), Vec3::ZERO);
	}

	#[test]
	fn test_enclosing_uses_largest_extent() {
		let aabb = Aabb3::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
		let cube = BoundingCube::enclosing(&aabb);
		assert_eq!(cube.edge(), 6.0);
		assert_eq!(cube.min, Vec3::splat(-3.0));
		assert_eq!(cube.max, Vec3::splat(3.0));
		assert_eq!(cube.center(), Vec3::ZERO);
	}

	#[test]
	fn test_enclosing_expands_short_axes_symmetrically() {
		let aabb = Aabb3::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(8.0, 2.0, 4.0));
		let cube = BoundingCube::enclosing(&aabb);
		assert_eq!(cube.edge(), 8.0);
		assert_eq!(cube.min, Vec3::new(0.0, -3.0, -2.0));
		assert_eq!(cube.max, Vec3::new(8.0, 5.0, 6.0));
		assert_eq!(cube.center(), aabb.centroid());
	}

	#[test]
	fn test_enclosing_degenerate_box() {
		let aabb = Aabb3::from_points([Vec3::new(5.0, 5.0, 5.0)]);
		let cube = BoundingCube::enclosing(&aabb);
		assert_eq!(cube.edge(), 1.0);
		assert!(cube.contains(Vec3::splat(5.0)));
	}

	#[test]
	fn test_enclosing_contains_awkward_bounds() {
		let aabb = Aabb3::new(
			Vec3::new(-0.1, 0.3, 1.7),
			Vec3::new(0.7000001, 0.9, 2.3333333),
		);
		let cube = BoundingCube::enclosing(&aabb);
		assert!(cube.contains(aabb.min));
		assert!(cube.contains(aabb.max));
	}

	#[test]
	fn test_contains_point() {
		let cube = BoundingCube::new(Vec3::ZERO, 10.0);

		// Inside
		assert!(cube.contains(Vec3::splat(5.0)));

		// On boundary
		assert!(cube.contains(Vec3::ZERO));
		assert!(cube.contains(Vec3::splat(10.0)));

		// Outside
		assert!(!cube.contains(Vec3::splat(-1.0)));
		assert!(!cube.contains(Vec3::new(5.0, 5.0, 10.5)));
	}

	#[test]
	fn test_octant_bits() {
		let cube = BoundingCube::new(Vec3::splat(-1.0), 2.0);
		assert_eq!(cube.octant_of(Vec3::new(-0.5, -0.5, -0.5)), 0);
		assert_eq!(cube.octant_of(Vec3::new(0.5, -0.5, -0.5)), 1);
		assert_eq!(cube.octant_of(Vec3::new(-0.5, 0.5, -0.5)), 2);
		assert_eq!(cube.octant_of(Vec3::new(-0.5, -0.5, 0.5)), 4);
		assert_eq!(cube.octant_of(Vec3::new(0.5, 0.5, 0.5)), 7);
	}

	/// A coordinate exactly on the center plane goes to the lower octant.
	#[test]
	fn test_octant_tie_goes_low() {
		let cube = BoundingCube::new(Vec3::splat(-1.0), 2.0);
		assert_eq!(cube.octant_of(Vec3::ZERO), 0);
		assert_eq!(cube.octant_of(Vec3::new(0.0, 0.5, 0.0)), 2);
		assert_eq!(cube.octant_of(Vec3::new(0.5, 0.0, 0.0)), 1);
	}

	#[test]
	fn test_children_tile_parent() {
		let parent = BoundingCube::new(Vec3::new(-4.0, 0.0, 2.0), 8.0);
		let volume: f32 = (0..8u8).map(|o| parent.child(o).edge().powi(3)).sum();
		assert_eq!(volume, parent.edge().powi(3));

		for octant in 0..8u8 {
			let child = parent.child(octant);
			assert_eq!(child.edge(), 4.0);
			assert!(parent.contains(child.min));
			assert!(parent.contains(child.max));
			// The child's own center classifies back into its octant.
			assert_eq!(parent.octant_of(child.center()), octant);
		}
	}

	/// Children reuse the parent's faces and center exactly, whatever the
	/// rounding of the corners.
	#[test]
	fn test_children_share_parent_faces() {
		let parent = BoundingCube::enclosing(&Aabb3::new(
			Vec3::new(-1000.3, -0.1, 3.3),
			Vec3::new(1777.7, 0.7000001, 91.17),
		));
		let center = parent.center();

		assert_eq!(parent.child(0).min, parent.min);
		assert_eq!(parent.child(0).max, center);
		assert_eq!(parent.child(7).min, center);
		assert_eq!(parent.child(7).max, parent.max);
	}

	/// Points routed by `octant_of` land inside that child, ties included.
	#[test]
	fn test_octant_child_containment() {
		let parent = BoundingCube::new(Vec3::ZERO, 4.0);
		let samples = [
			Vec3::ZERO,
			Vec3::splat(2.0),
			Vec3::splat(4.0),
			Vec3::new(2.0, 4.0, 0.0),
			Vec3::new(3.9, 0.1, 2.0),
		];
		for p in samples {
			let child = parent.child(parent.octant_of(p));
			assert!(child.contains(p), "{p:?} not inside {child:?}");
		}
	}

	/// Following a point down many levels of awkward, non-power-of-two cubes
	/// never leaves it outside the chosen child.
	#[test]
	fn test_descent_keeps_point_contained() {
		let mut rng = StdRng::seed_from_u64(17);
		let aabb = Aabb3::new(Vec3::new(-1000.3, -1000.3, -1000.3), Vec3::new(1777.7, 1777.7, 1777.7));
		let root = BoundingCube::enclosing(&aabb);

		for _ in 0..2_000 {
			let p = Vec3::new(
				rng.random_range(-1000.3..1777.7),
				rng.random_range(-1000.3..1777.7),
				rng.random_range(-1000.3..1777.7),
			);
			let mut cube = root;
			for depth in 0..40 {
				cube = cube.child(cube.octant_of(p));
				assert!(cube.contains(p), "{p:?} escaped at depth {depth}: {cube:?}");
			}
		}
	}

	#[test]
	fn test_indivisible_cube() {
		assert!(BoundingCube::from_corners(Vec3::ONE, Vec3::ONE).is_indivisible());
		assert!(!BoundingCube::new(Vec3::ZERO, 1.0).is_indivisible());

		// Halving toward a point reaches the f32 floor within a few dozen levels.
		let p = Vec3::ONE;
		let mut cube = BoundingCube::enclosing(&Aabb3::from_points([p]));
		let mut depth = 0;
		while !cube.is_indivisible() {
			cube = cube.child(cube.octant_of(p));
			depth += 1;
			assert!(depth < 64, "no progress: {cube:?}");
		}
		assert!(cube.contains(p));
	}
}
