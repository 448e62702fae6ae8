//! SplitPolicy - node size limits that drive octree subdivision.

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Default soft lower bound on points per node.
pub const DEFAULT_MIN_NODE_SIZE: usize = 100;

/// Default hard upper bound on points per node.
pub const DEFAULT_MAX_NODE_SIZE: usize = 50_000;

/// Minimum and maximum number of points a node may hold.
///
/// `max_node_size` is a hard limit: no built node stores more. `min_node_size`
/// is a target only; the builder accepts smaller leaves rather than merge or
/// loop, and reports how many it produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSplitPolicy")]
pub struct SplitPolicy {
  min_node_size: usize,
  max_node_size: usize,
}

impl SplitPolicy {
  /// Validate and create a policy.
  ///
  /// Fails with [`BuildError::InvalidPolicy`] when either bound is zero or
  /// `min > max`.
  pub fn new(min_node_size: usize, max_node_size: usize) -> Result<Self, BuildError> {
    if min_node_size == 0 || max_node_size == 0 || min_node_size > max_node_size {
      return Err(BuildError::InvalidPolicy {
        min: min_node_size,
        max: max_node_size,
      });
    }
    Ok(Self {
      min_node_size,
      max_node_size,
    })
  }

  /// Policy with the default minimum and the given maximum, clamping the
  /// minimum down when `max_node_size` is smaller than it.
  pub fn with_max(max_node_size: usize) -> Result<Self, BuildError> {
    Self::new(DEFAULT_MIN_NODE_SIZE.min(max_node_size.max(1)), max_node_size)
  }

  #[inline]
  pub fn min_node_size(&self) -> usize {
    self.min_node_size
  }

  #[inline]
  pub fn max_node_size(&self) -> usize {
    self.max_node_size
  }

  /// True when `count` points fit in one node without splitting.
  #[inline]
  pub fn fits(&self, count: usize) -> bool {
    count <= self.max_node_size
  }

  /// True when a leaf of `count` points falls short of the size target.
  #[inline]
  pub fn is_undersized(&self, count: usize) -> bool {
    count < self.min_node_size
  }
}

impl Default for SplitPolicy {
  fn default() -> Self {
    Self {
      min_node_size: DEFAULT_MIN_NODE_SIZE,
      max_node_size: DEFAULT_MAX_NODE_SIZE,
    }
  }
}

/// Unvalidated form used when reading a policy back from a descriptor.
#[derive(Deserialize)]
struct RawSplitPolicy {
  min_node_size: usize,
  max_node_size: usize,
}

impl TryFrom<RawSplitPolicy> for SplitPolicy {
  type Error = BuildError;

  fn try_from(raw: RawSplitPolicy) -> Result<Self, Self::Error> {
    Self::new(raw.min_node_size, raw.max_node_size)
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
