//! PointBuffer - owned, ordered collection of points with bulk transforms.
//!
//! The buffer is moved (never cloned) from ingestion through preparation into
//! the builder. All transforms operate in place.

use glam::Vec3;

use crate::octree::Aabb3;
use crate::types::Point;

/// Ordered, resizable point collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointBuffer {
  points: Vec<Point>,
}

impl PointBuffer {
  pub fn new() -> Self {
    Self { points: Vec::new() }
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      points: Vec::with_capacity(capacity),
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.points.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  #[inline]
  pub fn push(&mut self, point: Point) {
    self.points.push(point);
  }

  #[inline]
  pub fn as_slice(&self) -> &[Point] {
    &self.points
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Point> {
    self.points.iter()
  }

  /// Give up the underlying storage.
  pub fn into_vec(self) -> Vec<Point> {
    self.points
  }

  /// Drop all points and return their memory to the allocator.
  pub fn release(&mut self) {
    self.points = Vec::new();
  }

  /// Tight bounds over all positions, or `None` when empty.
  pub fn bounds(&self) -> Option<Aabb3> {
    if self.points.is_empty() {
      return None;
    }
    Some(Aabb3::from_points(self.points.iter().map(|p| p.position)))
  }

  /// Keep every `stride`-th point, starting with the first.
  ///
  /// Stable: surviving points keep their relative order. A stride of 0 or 1
  /// is a no-op.
  pub fn decimate(&mut self, stride: usize) {
    if stride <= 1 {
      return;
    }
    let mut index = 0;
    self.points.retain(|_| {
      let keep = index % stride == 0;
      index += 1;
      keep
    });
    self.points.shrink_to_fit();
  }

  /// Stride-decimate so that at most `max_points` remain.
  ///
  /// Returns the stride used (1 when the buffer already fits).
  pub fn resample_to(&mut self, max_points: usize) -> usize {
    let len = self.points.len();
    if max_points == 0 || len <= max_points {
      return 1;
    }
    let stride = len.div_ceil(max_points);
    self.decimate(stride);
    stride
  }

  /// Add `offset` to every position.
  pub fn translate(&mut self, offset: Vec3) {
    for p in &mut self.points {
      p.position += offset;
    }
  }

  /// Move the bounding-box centroid to the origin.
  ///
  /// Returns the centroid that was subtracted, or `None` when empty.
  pub fn recenter(&mut self) -> Option<Vec3> {
    let centroid = self.bounds()?.centroid();
    self.translate(-centroid);
    Some(centroid)
  }

  /// Negate Y on every point.
  pub fn flip_y(&mut self) {
    for p in &mut self.points {
      p.position.y = -p.position.y;
    }
  }

  /// Convert a left-handed Y/Z layout to OpenGL: `(x, y, z) -> (x, z, -y)`.
  pub fn flip_yz(&mut self) {
    for p in &mut self.points {
      let y = p.position.y;
      p.position.y = p.position.z;
      p.position.z = -y;
    }
  }
}

impl From<Vec<Point>> for PointBuffer {
  fn from(points: Vec<Point>) -> Self {
    Self { points }
  }
}

impl FromIterator<Point> for PointBuffer {
  fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
    Self {
      points: iter.into_iter().collect(),
    }
  }
}

impl IntoIterator for PointBuffer {
  type Item = Point;
  type IntoIter = std::vec::IntoIter<Point>;

  fn into_iter(self) -> Self::IntoIter {
    self.points.into_iter()
  }
}

impl<'a> IntoIterator for &'a PointBuffer {
  type Item = &'a Point;
  type IntoIter = std::slice::Iter<'a, Point>;

  fn into_iter(self) -> Self::IntoIter {
    self.points.iter()
  }
}

#[cfg(test)]
#[path = "buffer_test.rs"]
mod buffer_test;
