//! Settings for a conversion run.
//!
//! Every field may come from the command line or from an optional TOML file.
//! Command-line values win, then the file, then the built-in defaults.
//!
//! ```toml
//! mode = "scene"
//! max_points = 20000000
//! node_size = 32768
//! min_node_size = 100
//! output_dir = "out"
//! center = true
//! parallel = true
//! verify = false
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use point_octree::octree::{DEFAULT_MAX_NODE_SIZE, DEFAULT_MIN_NODE_SIZE};
use point_octree::prepare::DEFAULT_MAX_POINTS;
use point_octree::{BuildOptions, PrepareConfig, ReadMode, SplitPolicy};

/// Partial settings: what one source (file or command line) specifies.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
	/// Source coordinate convention (`agi`/`photoscan` or `scene`).
	pub mode: Option<ReadMode>,
	/// Resample the input down to at most this many points.
	pub max_points: Option<usize>,
	/// Maximum points per node.
	pub node_size: Option<usize>,
	/// Target minimum points per leaf.
	pub min_node_size: Option<usize>,
	/// Directory for the hierarchy and node files.
	pub output_dir: Option<PathBuf>,
	/// Move the cloud's centroid to the origin.
	pub center: Option<bool>,
	/// Build sibling subtrees in parallel.
	pub parallel: Option<bool>,
	/// Read the written files back and check them.
	pub verify: Option<bool>,
}

impl FileConfig {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		toml::from_str(&content)
			.with_context(|| format!("Failed to parse config TOML: {}", path.display()))
	}

	/// Fill every unset field from `fallback`.
	pub fn or(self, fallback: FileConfig) -> FileConfig {
		FileConfig {
			mode: self.mode.or(fallback.mode),
			max_points: self.max_points.or(fallback.max_points),
			node_size: self.node_size.or(fallback.node_size),
			min_node_size: self.min_node_size.or(fallback.min_node_size),
			output_dir: self.output_dir.or(fallback.output_dir),
			center: self.center.or(fallback.center),
			parallel: self.parallel.or(fallback.parallel),
			verify: self.verify.or(fallback.verify),
		}
	}

	/// Apply defaults to unset fields and validate the node size policy.
	pub fn resolve(self) -> Result<Settings> {
		let min = self.min_node_size.unwrap_or(DEFAULT_MIN_NODE_SIZE);
		let max = self.node_size.unwrap_or(DEFAULT_MAX_NODE_SIZE);
		let policy = SplitPolicy::new(min, max).context("Invalid node size settings")?;

		Ok(Settings {
			prepare: PrepareConfig {
				read_mode: self.mode.unwrap_or_default(),
				max_points: self.max_points.unwrap_or(DEFAULT_MAX_POINTS),
				center: self.center.unwrap_or(true),
			},
			policy,
			options: BuildOptions::STREAMING.with_parallel(self.parallel.unwrap_or(false)),
			output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
			verify: self.verify.unwrap_or(false),
		})
	}
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
	pub prepare: PrepareConfig,
	pub policy: SplitPolicy,
	pub options: BuildOptions,
	pub output_dir: PathBuf,
	pub verify: bool,
}
