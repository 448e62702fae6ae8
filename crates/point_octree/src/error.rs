//! Error types for building, ingesting and reading back octrees.

use std::io;
use std::path::PathBuf;

use glam::Vec3;
use thiserror::Error;

/// Failure of an octree build. Every variant is fatal to the build call.
#[derive(Debug, Error)]
pub enum BuildError {
  /// Split policy violates `0 < min_node_size <= max_node_size`.
  #[error("invalid split policy: min node size {min}, max node size {max}")]
  InvalidPolicy { min: usize, max: usize },

  /// The point buffer handed to the builder was empty.
  #[error("cannot build an octree from an empty point buffer")]
  EmptyInput,

  /// A point has a NaN or infinite coordinate.
  #[error("point {index} has a non-finite coordinate")]
  NonFinitePoint { index: usize },

  /// The cloud's extent is too large for an f32 cube.
  #[error("point cloud bounds {min} .. {max} overflow f32")]
  BoundsOverflow { min: Vec3, max: Vec3 },

  /// A node file or the hierarchy descriptor could not be written.
  /// Output already on disk is incomplete and must not be used.
  #[error("failed to write {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The hierarchy descriptor could not be serialized.
  #[error("failed to encode hierarchy descriptor {}: {source}", path.display())]
  Descriptor {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

/// Failure while reading a source point cloud.
#[derive(Debug, Error)]
pub enum IngestError {
  #[error("failed to read {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The first line of an XYZ file has a token count we do not understand.
  #[error("unrecognized XYZ layout: {tokens} tokens per line (expected 6 or 10)")]
  UnrecognizedLayout { tokens: usize },

  #[error("line {line}: {message}")]
  Parse { line: usize, message: String },

  /// A binary record holds a NaN or infinite coordinate.
  #[error("{}: record {record} has a non-finite coordinate", path.display())]
  NonFinite { path: PathBuf, record: usize },
}

/// Failure while reading back a written hierarchy.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("failed to read {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("malformed hierarchy descriptor {}: {source}", path.display())]
  Descriptor {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// Node file length is not a whole number of point records.
  #[error("{} is {len} bytes, not a multiple of the point record size", path.display())]
  RecordSize { path: PathBuf, len: u64 },

  /// Descriptor declares a record size this build does not use.
  #[error("descriptor record size {found} does not match {expected}")]
  RecordLayout { expected: usize, found: usize },

  #[error("node {name}: descriptor lists {expected} points, file holds {found}")]
  CountMismatch {
    name: String,
    expected: usize,
    found: usize,
  },

  #[error("hierarchy totals {found} points across nodes, descriptor declares {expected}")]
  TotalMismatch { expected: usize, found: usize },
}
