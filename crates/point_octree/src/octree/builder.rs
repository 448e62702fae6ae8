//! Recursive partition-and-sample octree construction.
//!
//! # Algorithm
//!
//! 1. The root cube encloses the tight bounds of the whole cloud.
//! 2. A node whose input fits in `max_node_size` becomes a leaf holding all
//!    of it.
//! 3. Otherwise the node keeps exactly `max_node_size` points, chosen by an
//!    evenly spaced stride over its input order, and hands the remainder to
//!    its octants by comparing each point against the cube center. Octants
//!    that receive nothing get no child.
//! 4. Each node is handed to the [`NodeSink`] as soon as its sample and child
//!    mask are known, before descending, so its sample can be released and
//!    peak memory stays near one root-to-leaf path of buffers.
//! 5. Once f32 can no longer split a cube (see
//!    [`BoundingCube::is_indivisible`]), the octant test separates nothing.
//!    The remainder is then dealt round-robin to the eight children, which
//!    inherit the parent's cube. Coincident points therefore fan out instead
//!    of forming one chain per `max_node_size` points, and depth stays
//!    bounded by f32 precision plus `log8(n / max_node_size)`.
//!
//! Every input point ends up in exactly one node. With `parallel` set,
//! sibling subtrees are built on the rayon pool; children are still collected
//! in octant order, so the tree is identical to a serial build.

use rayon::prelude::*;
use tracing::debug;

use super::bounds::BoundingCube;
use super::config::SplitPolicy;
use super::node::{ChildMask, NodePath, OctreeNode};
use super::summary::{HierarchySummary, NodeSummary};
use crate::buffer::PointBuffer;
use crate::error::BuildError;
use crate::storage::NodeSink;
use crate::types::Point;

/// Knobs that change how a build runs, not what it produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildOptions {
  /// Build sibling subtrees concurrently.
  pub parallel: bool,
  /// Keep each node's sample in memory after it was handed to the sink.
  pub retain_samples: bool,
}

impl BuildOptions {
  /// In-memory build: serial, samples kept.
  pub const IN_MEMORY: Self = Self {
    parallel: false,
    retain_samples: true,
  };

  /// Streaming build: serial, samples dropped once persisted.
  pub const STREAMING: Self = Self {
    parallel: false,
    retain_samples: false,
  };

  /// Same options with sibling parallelism switched on or off.
  pub const fn with_parallel(self, parallel: bool) -> Self {
    Self { parallel, ..self }
  }
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self::STREAMING
  }
}

/// A built octree: the root node and the policy it was built with.
#[derive(Clone, Debug)]
pub struct Octree {
  root: OctreeNode,
  policy: SplitPolicy,
}

impl Octree {
  /// Build entirely in memory, keeping every sample. Writes nothing.
  pub fn build(points: PointBuffer, policy: &SplitPolicy) -> Result<Self, BuildError> {
    Self::build_with(points, policy, &BuildOptions::IN_MEMORY, &())
  }

  /// Build, handing each finalized node to `sink`.
  ///
  /// Fails before the sink sees anything with [`BuildError::EmptyInput`]
  /// when `points` is empty, or [`BuildError::NonFinitePoint`] when a
  /// coordinate is NaN or infinite.
  pub fn build_with<S: NodeSink + ?Sized>(
    points: PointBuffer,
    policy: &SplitPolicy,
    options: &BuildOptions,
    sink: &S,
  ) -> Result<Self, BuildError> {
    let bounds = points.bounds().ok_or(BuildError::EmptyInput)?;
    if let Some(index) = points.iter().position(|p| !p.position.is_finite()) {
      return Err(BuildError::NonFinitePoint { index });
    }
    let cube = BoundingCube::enclosing(&bounds);
    if !cube.is_finite() {
      return Err(BuildError::BoundsOverflow {
        min: bounds.min,
        max: bounds.max,
      });
    }
    debug!(
      points = points.len(),
      edge = cube.edge(),
      min = ?cube.min,
      "root cube"
    );

    let builder = Builder {
      policy,
      options,
      sink,
    };
    let root = builder.split(NodePath::root(), cube, points.into_vec())?;
    Ok(Self {
      root,
      policy: *policy,
    })
  }

  #[inline]
  pub fn root(&self) -> &OctreeNode {
    &self.root
  }

  #[inline]
  pub fn policy(&self) -> &SplitPolicy {
    &self.policy
  }

  /// All nodes in depth-first pre-order.
  pub fn nodes(&self) -> super::node::Nodes<'_> {
    self.root.iter()
  }

  pub fn node_count(&self) -> usize {
    self.nodes().count()
  }

  /// Topology of every node in pre-order, for the hierarchy descriptor.
  pub fn node_summaries(&self) -> Vec<NodeSummary> {
    self.nodes().map(OctreeNode::summary).collect()
  }

  pub fn summary(&self) -> HierarchySummary {
    HierarchySummary::from_tree(&self.root, &self.policy)
  }

  pub fn into_root(self) -> OctreeNode {
    self.root
  }
}

struct Builder<'a, S: ?Sized> {
  policy: &'a SplitPolicy,
  options: &'a BuildOptions,
  sink: &'a S,
}

impl<S: NodeSink + ?Sized> Builder<'_, S> {
  fn split(
    &self,
    path: NodePath,
    cube: BoundingCube,
    points: Vec<Point>,
  ) -> Result<OctreeNode, BuildError> {
    if self.policy.fits(points.len()) {
      if self.policy.is_undersized(points.len()) {
        debug!(node = %path, points = points.len(), "undersized leaf");
      }
      let node = OctreeNode::new(path, cube, points.into(), ChildMask::EMPTY);
      return self.finalize(node);
    }

    let (sample, remainder) = stride_sample(points, self.policy.max_node_size());
    let indivisible = cube.is_indivisible();
    let buckets = if indivisible {
      debug!(node = %path, points = remainder.len(), "indivisible cube, dealing remainder");
      deal(remainder)
    } else {
      partition(&cube, remainder)
    };

    let mut child_mask = ChildMask::EMPTY;
    for (octant, bucket) in buckets.iter().enumerate() {
      if !bucket.is_empty() {
        child_mask.insert(octant as u8);
      }
    }
    debug!(
      node = %path,
      sample = sample.len(),
      children = child_mask.count(),
      "split node"
    );

    let node = OctreeNode::new(path, cube, sample.into(), child_mask);
    let mut node = self.finalize(node)?;

    let jobs: Vec<(u8, Vec<Point>)> = buckets
      .into_iter()
      .enumerate()
      .filter(|(_, bucket)| !bucket.is_empty())
      .map(|(octant, bucket)| (octant as u8, bucket))
      .collect();

    let build_child = |(octant, bucket): (u8, Vec<Point>)| {
      let child_cube = if indivisible { cube } else { cube.child(octant) };
      self.split(node.path().child(octant), child_cube, bucket)
    };
    let children = if self.options.parallel {
      jobs
        .into_par_iter()
        .map(build_child)
        .collect::<Result<Vec<_>, _>>()?
    } else {
      jobs
        .into_iter()
        .map(build_child)
        .collect::<Result<Vec<_>, _>>()?
    };

    node.set_children(children);
    Ok(node)
  }

  /// Persist the node, then drop its sample unless asked to keep it.
  fn finalize(&self, mut node: OctreeNode) -> Result<OctreeNode, BuildError> {
    self.sink.write_node(&node)?;
    if !self.options.retain_samples {
      node.release_sample();
    }
    Ok(node)
  }
}

/// Split `points` into exactly `count` evenly spaced samples and the rest.
///
/// Sample `k` is taken from index `floor(k * n / count)`, which is a stride of
/// roughly `n / count` over the input order. Both halves keep input order.
/// Requires `count < points.len()`.
pub(crate) fn stride_sample(points: Vec<Point>, count: usize) -> (Vec<Point>, Vec<Point>) {
  let n = points.len();
  debug_assert!(count > 0 && count < n);

  let mut sample = Vec::with_capacity(count);
  let mut remainder = Vec::with_capacity(n - count);
  let mut next_index = 0usize;

  for (index, point) in points.into_iter().enumerate() {
    if sample.len() < count && index == next_index {
      sample.push(point);
      next_index = ((sample.len() as u128 * n as u128) / count as u128) as usize;
    } else {
      remainder.push(point);
    }
  }

  (sample, remainder)
}

/// Distribute points into the eight octants of `cube`, keeping input order.
pub(crate) fn partition(cube: &BoundingCube, points: Vec<Point>) -> [Vec<Point>; 8] {
  let mut buckets: [Vec<Point>; 8] = Default::default();
  for point in points {
    buckets[cube.octant_of(point.position) as usize].push(point);
  }
  buckets
}

/// Spread points over the eight octants round-robin, keeping input order.
///
/// Used when the cube is too small to split; every child keeps the parent's
/// cube, so containment holds for any assignment.
pub(crate) fn deal(points: Vec<Point>) -> [Vec<Point>; 8] {
  let mut buckets: [Vec<Point>; 8] = Default::default();
  for (index, point) in points.into_iter().enumerate() {
    buckets[index % 8].push(point);
  }
  buckets
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
