//! Read-back of persisted hierarchies, for verification and tooling.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::format::HierarchyDescriptor;
use crate::buffer::PointBuffer;
use crate::error::StorageError;
use crate::types::{Point, POINT_RECORD_SIZE};

/// Parse a hierarchy descriptor and check its record layout.
pub fn read_hierarchy(path: impl AsRef<Path>) -> Result<HierarchyDescriptor, StorageError> {
  let path = path.as_ref();
  let bytes = fs::read(path).map_err(|source| StorageError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  let descriptor: HierarchyDescriptor =
    serde_json::from_slice(&bytes).map_err(|source| StorageError::Descriptor {
      path: path.to_path_buf(),
      source,
    })?;

  if descriptor.record_size != POINT_RECORD_SIZE {
    return Err(StorageError::RecordLayout {
      expected: POINT_RECORD_SIZE,
      found: descriptor.record_size,
    });
  }
  Ok(descriptor)
}

/// Load one node file into memory.
pub fn read_node(path: impl AsRef<Path>) -> Result<PointBuffer, StorageError> {
  let path = path.as_ref();
  let bytes = fs::read(path).map_err(|source| StorageError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  if bytes.len() % POINT_RECORD_SIZE != 0 {
    return Err(StorageError::RecordSize {
      path: path.to_path_buf(),
      len: bytes.len() as u64,
    });
  }
  Ok(PointBuffer::from(bytemuck::pod_collect_to_vec::<u8, Point>(&bytes)))
}

/// Re-read a whole hierarchy and check it against its descriptor.
///
/// Every listed node file must hold exactly the listed number of records,
/// and the records must add up to the declared total.
pub fn verify(hierarchy_path: impl AsRef<Path>) -> Result<HierarchyDescriptor, StorageError> {
  let hierarchy_path = hierarchy_path.as_ref();
  let descriptor = read_hierarchy(hierarchy_path)?;
  let dir = hierarchy_path.parent().map(Path::to_path_buf).unwrap_or_else(PathBuf::new);

  let mut total = 0;
  for entry in &descriptor.nodes {
    let path = dir.join(&entry.file);
    let len = fs::metadata(&path)
      .map_err(|source| StorageError::Io {
        path: path.clone(),
        source,
      })?
      .len();
    if len % POINT_RECORD_SIZE as u64 != 0 {
      return Err(StorageError::RecordSize { path, len });
    }
    let found = (len / POINT_RECORD_SIZE as u64) as usize;
    if found != entry.points {
      return Err(StorageError::CountMismatch {
        name: entry.name.clone(),
        expected: entry.points,
        found,
      });
    }
    total += found;
  }

  if total != descriptor.point_count {
    return Err(StorageError::TotalMismatch {
      expected: descriptor.point_count,
      found: total,
    });
  }

  debug!(
    nodes = descriptor.nodes.len(),
    points = total,
    "hierarchy verified"
  );
  Ok(descriptor)
}
