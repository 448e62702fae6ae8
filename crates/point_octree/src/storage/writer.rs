//! Node file and descriptor writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::format::HierarchyDescriptor;
use super::{NodeSink, OutputLayout};
use crate::error::BuildError;
use crate::octree::{HierarchySummary, NodeSummary, OctreeNode, SplitPolicy};

/// Writes one data file per node and the hierarchy descriptor.
///
/// Holds no mutable state; concurrent `write_node` calls for distinct nodes
/// touch distinct files.
#[derive(Clone, Debug)]
pub struct NodeFileWriter {
  layout: OutputLayout,
}

impl NodeFileWriter {
  pub fn new(layout: OutputLayout) -> Self {
    Self { layout }
  }

  #[inline]
  pub fn layout(&self) -> &OutputLayout {
    &self.layout
  }

  /// Write `<stem>.hierarchy` listing every node. Returns the path written.
  pub fn write_hierarchy(
    &self,
    policy: &SplitPolicy,
    summary: &HierarchySummary,
    nodes: &[NodeSummary],
  ) -> Result<PathBuf, BuildError> {
    let path = self.layout.hierarchy_path();
    let descriptor = HierarchyDescriptor::new(policy, summary, nodes, &self.layout);

    write_descriptor(create(&path)?, &path, &descriptor)?;

    debug!(path = %path.display(), nodes = nodes.len(), "wrote hierarchy");
    Ok(path)
  }
}

impl NodeSink for NodeFileWriter {
  fn write_node(&self, node: &OctreeNode) -> Result<(), BuildError> {
    let path = self.layout.node_path(node.path());
    let mut out = create(&path)?;
    out
      .write_all(bytemuck::cast_slice(node.sample().as_slice()))
      .and_then(|()| out.flush())
      .map_err(|source| io_error(&path, source))
  }
}

/// Serialize `descriptor` into `out`. Failures of the underlying writer are
/// reported as I/O errors, not as encoding errors.
fn write_descriptor<W: Write>(
  mut out: W,
  path: &Path,
  descriptor: &HierarchyDescriptor,
) -> Result<(), BuildError> {
  serde_json::to_writer_pretty(&mut out, descriptor).map_err(|source| {
    if source.is_io() {
      io_error(path, source.into())
    } else {
      BuildError::Descriptor {
        path: path.to_path_buf(),
        source,
      }
    }
  })?;
  out.flush().map_err(|source| io_error(path, source))
}

fn create(path: &Path) -> Result<BufWriter<File>, BuildError> {
  File::create(path)
    .map(BufWriter::new)
    .map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> BuildError {
  BuildError::Io {
    path: path.to_path_buf(),
    source,
  }
}
