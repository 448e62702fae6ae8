//! Streaming build: octree construction with node files written during the
//! traversal and the hierarchy descriptor written at the end.

use std::path::Path;

use tracing::{info, warn};
use web_time::Instant;

use crate::buffer::PointBuffer;
use crate::error::BuildError;
use crate::octree::{BuildOptions, HierarchySummary, Octree, SplitPolicy};
use crate::storage::{NodeFileWriter, OutputLayout};

/// Build and persist an octree under names derived from `stem`.
///
/// Writes `<stem>.hierarchy` plus one `<stem>.<node>.blob` per node. Each
/// node's sample is dropped from memory right after its file is written.
/// Fails with [`BuildError::EmptyInput`] without touching the filesystem when
/// `points` is empty.
pub fn build(
  points: PointBuffer,
  policy: &SplitPolicy,
  stem: impl AsRef<Path>,
) -> Result<HierarchySummary, BuildError> {
  build_with_options(points, policy, stem, &BuildOptions::STREAMING)
}

/// [`build`] with explicit options (e.g. parallel sibling builds).
#[tracing::instrument(skip_all, name = "octree::build")]
pub fn build_with_options(
  points: PointBuffer,
  policy: &SplitPolicy,
  stem: impl AsRef<Path>,
  options: &BuildOptions,
) -> Result<HierarchySummary, BuildError> {
  if points.is_empty() {
    return Err(BuildError::EmptyInput);
  }

  let input_count = points.len();
  let writer = NodeFileWriter::new(OutputLayout::new(stem.as_ref()));
  let started = Instant::now();

  let tree = Octree::build_with(points, policy, options, &writer)?;
  let summary = tree.summary();
  let nodes = tree.node_summaries();
  drop(tree);

  let hierarchy = writer.write_hierarchy(policy, &summary, &nodes)?;
  debug_assert_eq!(summary.point_count, input_count);

  info!(
    nodes = summary.node_count,
    leaves = summary.leaf_count,
    max_depth = summary.max_depth,
    points = summary.point_count,
    elapsed_ms = started.elapsed().as_millis() as u64,
    hierarchy = %hierarchy.display(),
    "octree built"
  );
  if summary.undersized_leaves > 0 {
    warn!(
      count = summary.undersized_leaves,
      min_node_size = policy.min_node_size(),
      "leaves below the node size target"
    );
  }

  Ok(summary)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
