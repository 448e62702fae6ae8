//! Hierarchy descriptor: JSON topology of a persisted octree.

use serde::{Deserialize, Serialize};

use super::OutputLayout;
use crate::octree::{
  BoundingCube, HierarchySummary, NodePath, NodeSummary, ParseNodePathError, SplitPolicy,
};
use crate::types::POINT_RECORD_SIZE;

/// Bumped whenever the descriptor or node file layout changes.
pub const FORMAT_VERSION: u32 = 1;

/// Contents of `<stem>.hierarchy`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HierarchyDescriptor {
  pub version: u32,
  /// Bytes per point record in every node file.
  pub record_size: usize,
  pub policy: SplitPolicy,
  pub node_count: usize,
  pub point_count: usize,
  pub max_depth: usize,
  pub root: BoundingCube,
  /// One entry per node, depth-first pre-order.
  pub nodes: Vec<NodeEntry>,
}

/// One node in the descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
  /// Path name: `r` followed by octant digits.
  pub name: String,
  /// Data file, relative to the descriptor.
  pub file: String,
  pub depth: usize,
  /// Points stored in this node's file.
  pub points: usize,
  /// Bit `i` set when the child in octant `i` exists.
  pub child_mask: u8,
  pub cube: BoundingCube,
}

impl HierarchyDescriptor {
  pub fn new(
    policy: &SplitPolicy,
    summary: &HierarchySummary,
    nodes: &[NodeSummary],
    layout: &OutputLayout,
  ) -> Self {
    Self {
      version: FORMAT_VERSION,
      record_size: POINT_RECORD_SIZE,
      policy: *policy,
      node_count: summary.node_count,
      point_count: summary.point_count,
      max_depth: summary.max_depth,
      root: summary.root_cube,
      nodes: nodes.iter().map(|node| NodeEntry::new(node, layout)).collect(),
    }
  }
}

impl NodeEntry {
  pub fn new(node: &NodeSummary, layout: &OutputLayout) -> Self {
    Self {
      name: node.path.to_string(),
      file: layout.node_file_name(&node.path),
      depth: node.path.depth(),
      points: node.point_count,
      child_mask: node.child_mask.bits(),
      cube: node.cube,
    }
  }

  pub fn path(&self) -> Result<NodePath, ParseNodePathError> {
    self.name.parse()
  }
}
