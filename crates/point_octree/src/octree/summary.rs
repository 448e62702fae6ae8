//! Build statistics and per-node topology records.

use super::bounds::BoundingCube;
use super::config::SplitPolicy;
use super::node::{ChildMask, NodePath, OctreeNode};

/// Topology of one node, without its points.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSummary {
  pub path: NodePath,
  pub point_count: usize,
  pub child_mask: ChildMask,
  pub cube: BoundingCube,
}

/// Result of a build: enough to sanity-check the output without reading
/// every node file back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HierarchySummary {
  /// Total nodes written.
  pub node_count: usize,
  /// Nodes without children.
  pub leaf_count: usize,
  /// Depth of the deepest node (root = 0).
  pub max_depth: usize,
  /// Points stored across all nodes; equals the input size.
  pub point_count: usize,
  /// Leaves holding fewer points than the policy's size target.
  pub undersized_leaves: usize,
  /// Cube of the root node.
  pub root_cube: BoundingCube,
}

impl HierarchySummary {
  /// Walk a built tree and tally its shape.
  pub fn from_tree(root: &OctreeNode, policy: &SplitPolicy) -> Self {
    let mut summary = Self {
      node_count: 0,
      leaf_count: 0,
      max_depth: 0,
      point_count: 0,
      undersized_leaves: 0,
      root_cube: *root.cube(),
    };
    for node in root.iter() {
      summary.node_count += 1;
      summary.point_count += node.point_count();
      summary.max_depth = summary.max_depth.max(node.depth());
      if node.is_leaf() {
        summary.leaf_count += 1;
        if policy.is_undersized(node.point_count()) {
          summary.undersized_leaves += 1;
        }
      }
    }
    summary
  }

  /// Nodes with children.
  #[inline]
  pub fn internal_count(&self) -> usize {
    self.node_count - self.leaf_count
  }
}
