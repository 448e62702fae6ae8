//! Whole-cloud preparation before the build: resampling, axis correction and
//! recentering, driven by an explicit [`PrepareConfig`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::buffer::PointBuffer;

/// Default cap on total points after resampling.
pub const DEFAULT_MAX_POINTS: usize = 100_000_000;

/// Coordinate convention of the source scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
  /// AGI Photoscan export: Y is negated.
  #[default]
  #[serde(alias = "agi")]
  Photoscan,
  /// Left-handed scene export: `(x, y, z) -> (x, z, -y)`.
  Scene,
}

impl ReadMode {
  /// Convert `points` to the renderer's convention in place.
  pub fn apply(self, points: &mut PointBuffer) {
    match self {
      Self::Photoscan => points.flip_y(),
      Self::Scene => points.flip_yz(),
    }
  }
}

/// Preparation settings. Passed explicitly; there is no global state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrepareConfig {
  pub read_mode: ReadMode,
  /// Resample down to at most this many points.
  pub max_points: usize,
  /// Move the bounding-box centroid to the origin.
  pub center: bool,
}

impl Default for PrepareConfig {
  fn default() -> Self {
    Self {
      read_mode: ReadMode::default(),
      max_points: DEFAULT_MAX_POINTS,
      center: true,
    }
  }
}

/// What preparation did, for logging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrepareReport {
  pub input_count: usize,
  pub output_count: usize,
  /// Stride used by resampling; 1 when nothing was dropped.
  pub stride: usize,
  /// Centroid that was subtracted, if centering ran.
  pub offset: Option<Vec3>,
}

/// Resample, correct axes, then recenter, in that order.
pub fn prepare(points: &mut PointBuffer, config: &PrepareConfig) -> PrepareReport {
  let input_count = points.len();

  let stride = points.resample_to(config.max_points);
  if stride > 1 {
    info!(stride, points = points.len(), "resampled point cloud");
  }

  config.read_mode.apply(points);

  let offset = if config.center {
    points.recenter()
  } else {
    None
  };
  if let Some(offset) = offset {
    info!(offset = ?offset, "centered point cloud");
  }

  PrepareReport {
    input_count,
    output_count: points.len(),
    stride,
    offset,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Point;

  fn cloud() -> PointBuffer {
    (0..10).map(|i| Point::at(i as f32, 2.0 * i as f32, 5.0)).collect()
  }

  #[test]
  fn test_default_config() {
    let config = PrepareConfig::default();
    assert_eq!(config.read_mode, ReadMode::Photoscan);
    assert_eq!(config.max_points, DEFAULT_MAX_POINTS);
    assert!(config.center);
  }

  #[test]
  fn test_prepare_resamples_flips_and_centers() {
    let mut points = cloud();
    let config = PrepareConfig {
      read_mode: ReadMode::Photoscan,
      max_points: 5,
      center: true,
    };

    let report = prepare(&mut points, &config);

    assert_eq!(report.input_count, 10);
    assert_eq!(report.stride, 2);
    assert_eq!(report.output_count, 5);
    assert_eq!(points.len(), 5);
    // x: 0,2,4,6,8 -> centroid 4; y flipped: 0,-4,...,-16 -> centroid -8.
    assert_eq!(report.offset, Some(Vec3::new(4.0, -8.0, 5.0)));
    assert_eq!(points.bounds().unwrap().centroid(), Vec3::ZERO);
  }

  #[test]
  fn test_scene_mode_without_centering() {
    let mut points: PointBuffer = vec![Point::at(1.0, 2.0, 3.0)].into();
    let config = PrepareConfig {
      read_mode: ReadMode::Scene,
      max_points: 10,
      center: false,
    };

    let report = prepare(&mut points, &config);

    assert_eq!(report.offset, None);
    assert_eq!(report.stride, 1);
    assert_eq!(points.as_slice()[0].position, Vec3::new(1.0, 3.0, -2.0));
  }

  #[test]
  fn test_read_mode_serde_names() {
    let mode: ReadMode = serde_json::from_str("\"agi\"").unwrap();
    assert_eq!(mode, ReadMode::Photoscan);
    let mode: ReadMode = serde_json::from_str("\"scene\"").unwrap();
    assert_eq!(mode, ReadMode::Scene);
  }
}
