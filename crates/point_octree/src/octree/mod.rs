//! Octree module: bounded-size spatial hierarchy with per-level LOD samples.
//!
//! # Node Layout
//!
//! Every node covers a cube. Internal nodes keep exactly `max_node_size`
//! points as their level-of-detail sample and pass the rest down; leaves keep
//! everything they receive. Each input point is stored in exactly one node.
//!
//! ```text
//! octant = (x > cx) | (y > cy) << 1 | (z > cz) << 2
//! child edge = parent edge / 2
//! ```
//!
//! # Module Structure
//!
//! - [`bounds`]: `Aabb3` and `BoundingCube`
//! - [`config`]: `SplitPolicy` - node size limits
//! - [`node`]: `NodePath`, `ChildMask`, `OctreeNode`
//! - [`builder`]: `Octree` and the recursive split
//! - [`summary`]: `NodeSummary` and `HierarchySummary`

pub mod bounds;
pub mod builder;
pub mod config;
pub mod node;
pub mod summary;

// Re-exports
pub use bounds::{Aabb3, BoundingCube};
pub use builder::{BuildOptions, Octree};
pub use config::{SplitPolicy, DEFAULT_MAX_NODE_SIZE, DEFAULT_MIN_NODE_SIZE};
pub use node::{ChildMask, NodePath, Nodes, OctreeNode, ParseNodePathError};
pub use summary::{HierarchySummary, NodeSummary};
