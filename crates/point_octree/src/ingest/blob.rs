//! Binary blob reader: raw point records, no header.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::buffer::PointBuffer;
use crate::error::IngestError;
use crate::types::{Point, POINT_RECORD_SIZE};

/// Read a flat array of [`Point`] records.
///
/// Trailing bytes that do not make up a whole record are ignored. The fourth
/// color byte (alpha in some exporters) is cleared.
pub fn read_blob(path: &Path) -> Result<PointBuffer, IngestError> {
  let bytes = fs::read(path).map_err(|source| IngestError::Io {
    path: path.to_path_buf(),
    source,
  })?;

  let whole = bytes.len() - bytes.len() % POINT_RECORD_SIZE;
  if whole != bytes.len() {
    warn!(
      path = %path.display(),
      trailing = bytes.len() - whole,
      "ignoring bytes after the last whole point record"
    );
  }

  let mut points: Vec<Point> = bytemuck::pod_collect_to_vec(&bytes[..whole]);
  if let Some(record) = points.iter().position(|p| !p.position.is_finite()) {
    return Err(IngestError::NonFinite {
      path: path.to_path_buf(),
      record,
    });
  }
  for p in &mut points {
    p.pad = 0;
  }
  info!(path = %path.display(), bytes = bytes.len(), points = points.len(), "read blob");
  Ok(points.into())
}
