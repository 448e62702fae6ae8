//! OctreeNode - one level-of-detail sample plus its owned children.
//!
//! Nodes are identified by their path from the root: the sequence of octant
//! digits taken at each level. Ownership runs strictly downward; there are no
//! parent references.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use super::bounds::BoundingCube;
use super::summary::NodeSummary;
use crate::buffer::PointBuffer;

/// Path from the root to a node, one octant digit (0-7) per level.
///
/// Displayed as `r` followed by the digits: `r`, `r0`, `r04`. The derived
/// ordering is lexicographic on digits, i.e. depth-first pre-order.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath {
  digits: SmallVec<[u8; 16]>,
}

impl NodePath {
  /// The root path (no digits).
  pub fn root() -> Self {
    Self::default()
  }

  /// Path of the child in `octant`.
  pub fn child(&self, octant: u8) -> Self {
    debug_assert!(octant < 8, "octant out of range: {octant}");
    let mut digits = self.digits.clone();
    digits.push(octant);
    Self { digits }
  }

  /// Path of the parent, or `None` at the root.
  pub fn parent(&self) -> Option<Self> {
    let (_, rest) = self.digits.split_last()?;
    Some(Self {
      digits: SmallVec::from_slice(rest),
    })
  }

  /// Number of levels below the root.
  #[inline]
  pub fn depth(&self) -> usize {
    self.digits.len()
  }

  #[inline]
  pub fn is_root(&self) -> bool {
    self.digits.is_empty()
  }

  /// Octant digits from the root downward.
  #[inline]
  pub fn digits(&self) -> &[u8] {
    &self.digits
  }

  /// Octant of this node within its parent.
  pub fn octant(&self) -> Option<u8> {
    self.digits.last().copied()
  }
}

impl fmt::Display for NodePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("r")?;
    for digit in &self.digits {
      write!(f, "{digit}")?;
    }
    Ok(())
  }
}

impl fmt::Debug for NodePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "NodePath({self})")
  }
}

/// Error parsing a node name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid node name {0:?}")]
pub struct ParseNodePathError(pub String);

impl FromStr for NodePath {
  type Err = ParseNodePathError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let rest = s
      .strip_prefix('r')
      .ok_or_else(|| ParseNodePathError(s.to_owned()))?;
    let digits = rest
      .bytes()
      .map(|b| match b {
        b'0'..=b'7' => Ok(b - b'0'),
        _ => Err(ParseNodePathError(s.to_owned())),
      })
      .collect::<Result<SmallVec<_>, _>>()?;
    Ok(Self { digits })
  }
}

/// Child-existence bitmask; bit `i` set means the child in octant `i` exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChildMask(u8);

impl ChildMask {
  pub const EMPTY: Self = Self(0);

  #[inline]
  pub const fn from_bits(bits: u8) -> Self {
    Self(bits)
  }

  #[inline]
  pub const fn bits(self) -> u8 {
    self.0
  }

  #[inline]
  pub fn insert(&mut self, octant: u8) {
    debug_assert!(octant < 8);
    self.0 |= 1 << octant;
  }

  #[inline]
  pub fn contains(self, octant: u8) -> bool {
    octant < 8 && self.0 & (1 << octant) != 0
  }

  #[inline]
  pub fn count(self) -> usize {
    self.0.count_ones() as usize
  }

  #[inline]
  pub fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Present octants in ascending order.
  pub fn iter(self) -> impl Iterator<Item = u8> {
    (0..8u8).filter(move |&octant| self.contains(octant))
  }
}

/// A built octree node.
///
/// Holds the LOD sample retained at this level (which may already have been
/// released after persisting), the child mask, and the present children in
/// ascending octant order.
#[derive(Clone, Debug)]
pub struct OctreeNode {
  path: NodePath,
  cube: BoundingCube,
  sample: PointBuffer,
  point_count: usize,
  child_mask: ChildMask,
  children: Vec<OctreeNode>,
}

impl OctreeNode {
  /// Create a node before its children are attached.
  pub(crate) fn new(
    path: NodePath,
    cube: BoundingCube,
    sample: PointBuffer,
    child_mask: ChildMask,
  ) -> Self {
    let point_count = sample.len();
    Self {
      path,
      cube,
      sample,
      point_count,
      child_mask,
      children: Vec::new(),
    }
  }

  /// Attach the built children; must match the mask, in octant order.
  pub(crate) fn set_children(&mut self, children: Vec<OctreeNode>) {
    debug_assert_eq!(children.len(), self.child_mask.count());
    debug_assert!(children
      .iter()
      .zip(self.child_mask.iter())
      .all(|(child, octant)| child.path.octant() == Some(octant)));
    self.children = children;
  }

  /// Drop the in-memory sample once it has been persisted.
  ///
  /// `point_count` keeps reporting the stored count.
  pub fn release_sample(&mut self) {
    self.sample.release();
  }

  #[inline]
  pub fn path(&self) -> &NodePath {
    &self.path
  }

  #[inline]
  pub fn depth(&self) -> usize {
    self.path.depth()
  }

  #[inline]
  pub fn cube(&self) -> &BoundingCube {
    &self.cube
  }

  /// Points retained at this level. Empty after [`release_sample`].
  ///
  /// [`release_sample`]: OctreeNode::release_sample
  #[inline]
  pub fn sample(&self) -> &PointBuffer {
    &self.sample
  }

  /// Number of points stored at this node.
  #[inline]
  pub fn point_count(&self) -> usize {
    self.point_count
  }

  #[inline]
  pub fn child_mask(&self) -> ChildMask {
    self.child_mask
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.child_mask.is_empty()
  }

  /// Present children in ascending octant order.
  #[inline]
  pub fn children(&self) -> &[OctreeNode] {
    &self.children
  }

  /// Child in `octant`, if present.
  pub fn child(&self, octant: u8) -> Option<&OctreeNode> {
    if !self.child_mask.contains(octant) {
      return None;
    }
    let index = (self.child_mask.bits() & ((1u8 << octant) - 1)).count_ones() as usize;
    self.children.get(index)
  }

  /// This node and all descendants in depth-first pre-order.
  pub fn iter(&self) -> Nodes<'_> {
    Nodes { stack: vec![self] }
  }

  /// Topology record for the hierarchy descriptor.
  pub fn summary(&self) -> NodeSummary {
    NodeSummary {
      path: self.path.clone(),
      point_count: self.point_count,
      child_mask: self.child_mask,
      cube: self.cube,
    }
  }
}

/// Depth-first pre-order iterator over a subtree.
pub struct Nodes<'a> {
  stack: Vec<&'a OctreeNode>,
}

impl<'a> Iterator for Nodes<'a> {
  type Item = &'a OctreeNode;

  fn next(&mut self) -> Option<Self::Item> {
    let node = self.stack.pop()?;
    self.stack.extend(node.children.iter().rev());
    Some(node)
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
