//! point_octree - Out-of-core LOD octree builder for colored point clouds
//!
//! Turns a large scan into a hierarchy of small node files that a viewer can
//! stream by level of detail. Every node stores a bounded, evenly spread
//! sample of the points in its cube; the remainder is pushed into its eight
//! children until a node is small enough to keep everything.
//!
//! # Features
//!
//! - **Bounded nodes**: internal nodes hold exactly `max_node_size` points,
//!   leaves at most that many
//! - **Streaming output**: node files are written as soon as a node is
//!   finalized and its sample is released right after
//! - **Parallel siblings**: optional rayon fan-out with byte-identical output
//! - **Ingest**: ASCII XYZ (plain or with normals) and raw binary blobs
//!
//! # Example
//!
//! ```ignore
//! use point_octree::{ingest, prepare, PrepareConfig, SplitPolicy};
//!
//! let mut points = ingest::load("scan.xyz")?;
//! prepare(&mut points, &PrepareConfig::default());
//!
//! let policy = SplitPolicy::new(100, 50_000)?;
//! let summary = point_octree::build(points, &policy, "out/scan")?;
//!
//! println!("{} nodes, depth {}", summary.node_count, summary.max_depth);
//! ```

pub mod buffer;
pub mod error;
pub mod ingest;
pub mod octree;
pub mod pipeline;
pub mod prepare;
pub mod storage;
pub mod types;

// Re-export commonly used items
pub use buffer::PointBuffer;
pub use error::{BuildError, IngestError, StorageError};
pub use octree::{
  BoundingCube, BuildOptions, HierarchySummary, NodePath, Octree, OctreeNode, SplitPolicy,
};
pub use pipeline::{build, build_with_options};
pub use prepare::{prepare, PrepareConfig, PrepareReport, ReadMode};
pub use storage::{NodeFileWriter, NodeSink, OutputLayout};
pub use types::{Color, Point, POINT_RECORD_SIZE};
