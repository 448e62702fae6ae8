//! Core point record shared by memory, node files and blob input.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Size in bytes of one [`Point`] record, in memory and on disk.
///
/// Every reader and writer uses this constant; it matches the renderer's
/// `POINT_SIZE = 4*4` (three floats followed by four bytes).
pub const POINT_RECORD_SIZE: usize = std::mem::size_of::<Point>();

const _: () = assert!(POINT_RECORD_SIZE == 16);

/// RGB color, one byte per channel.
pub type Color = [u8; 3];

/// A colored point sample.
///
/// Plain-old-data so node files can be written and memory-mapped as a flat
/// `[Point]` without any encoding step. Byte order is the host's; node files
/// are produced on little-endian targets.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Point {
  /// Position in scan units.
  pub position: Vec3,
  /// Color channels.
  pub color: Color,
  /// Always zero. Makes the record padding explicit.
  pub pad: u8,
}

impl Point {
  /// Create a point at `position` with the given color.
  #[inline]
  pub const fn new(position: Vec3, color: Color) -> Self {
    Self {
      position,
      color,
      pad: 0,
    }
  }

  /// Shorthand for tests and tooling: position from components, black color.
  #[inline]
  pub fn at(x: f32, y: f32, z: f32) -> Self {
    Self::new(Vec3::new(x, y, z), [0; 3])
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
