//! Source point cloud readers.
//!
//! Two inputs are supported, chosen by file extension:
//!
//! - `.blob`: flat array of 16-byte [`Point`](crate::Point) records, the same
//!   layout the node files use.
//! - anything else: whitespace-separated XYZ text, `x y z r g b` per line,
//!   optionally followed by `nx ny nz intensity` (AGI Photoscan exports).

pub mod blob;
pub mod xyz;

use std::path::Path;

pub use blob::read_blob;
pub use xyz::{read_xyz, XyzLayout};

use crate::buffer::PointBuffer;
use crate::error::IngestError;

/// Input file kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
  Blob,
  Xyz,
}

impl SourceFormat {
  /// Classify by extension: `.blob` (any case) is binary, everything else
  /// is treated as XYZ text.
  pub fn from_path(path: &Path) -> Self {
    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) if ext.eq_ignore_ascii_case("blob") => Self::Blob,
      _ => Self::Xyz,
    }
  }
}

/// Read a point cloud, picking the reader from the file extension.
pub fn load(path: impl AsRef<Path>) -> Result<PointBuffer, IngestError> {
  let path = path.as_ref();
  match SourceFormat::from_path(path) {
    SourceFormat::Blob => read_blob(path),
    SourceFormat::Xyz => read_xyz(path),
  }
}
