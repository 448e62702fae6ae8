//! Persistence of built octrees.
//!
//! Every node gets its own data file holding only its LOD sample as raw
//! [`Point`](crate::Point) records, so a reader can memory-map a node without
//! decoding. One JSON descriptor per build lists the topology.
//!
//! ```text
//! <stem>.hierarchy      descriptor (JSON)
//! <stem>.r.blob         root sample
//! <stem>.r04.blob       sample of root -> octant 0 -> octant 4
//! ```
//!
//! There is no multi-file commit: when a build fails midway, whatever was
//! already written is incomplete and must not be read.

pub mod format;
pub mod reader;
pub mod writer;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use format::{HierarchyDescriptor, NodeEntry, FORMAT_VERSION};
pub use reader::{read_hierarchy, read_node, verify};
pub use writer::NodeFileWriter;

use crate::error::BuildError;
use crate::octree::{NodePath, OctreeNode};

/// Receives each node as soon as the builder finalizes it.
///
/// Called once per node, parents before children. With a parallel build,
/// calls for different nodes may run concurrently, so implementations take
/// `&self` and must not share per-node state.
pub trait NodeSink: Sync {
  fn write_node(&self, node: &OctreeNode) -> Result<(), BuildError>;
}

/// Discards every node. Used for in-memory builds.
impl NodeSink for () {
  fn write_node(&self, _node: &OctreeNode) -> Result<(), BuildError> {
    Ok(())
  }
}

/// File names derived from an output stem such as `out/scan`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
  stem: PathBuf,
}

impl OutputLayout {
  pub fn new(stem: impl Into<PathBuf>) -> Self {
    Self { stem: stem.into() }
  }

  #[inline]
  pub fn stem(&self) -> &Path {
    &self.stem
  }

  /// `<stem>.hierarchy`
  pub fn hierarchy_path(&self) -> PathBuf {
    self.with_suffix(".hierarchy")
  }

  /// `<stem>.<node name>.blob`
  pub fn node_path(&self, path: &NodePath) -> PathBuf {
    self.with_suffix(&format!(".{path}.blob"))
  }

  /// Node file name relative to the descriptor's directory.
  pub fn node_file_name(&self, path: &NodePath) -> String {
    self
      .node_path(path)
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default()
  }

  fn with_suffix(&self, suffix: &str) -> PathBuf {
    let mut name = OsString::from(self.stem.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
  }
}
