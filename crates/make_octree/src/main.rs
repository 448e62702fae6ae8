//! Point cloud to LOD octree converter.
//!
//! Reads an XYZ text or binary blob scan, prepares it (resample, axis flip,
//! recenter) and writes a streamable octree next to the chosen output
//! directory:
//! - <stem>.hierarchy: JSON descriptor of every node
//! - <stem>.<node>.blob: raw point records of one node's LOD sample

mod config;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use web_time::Instant;

use config::{FileConfig, Settings};
use point_octree::{build_with_options, ingest, prepare, storage, OutputLayout, ReadMode};

/// Coordinate convention of the input scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
	/// AGI Photoscan export (negate Y).
	Agi,
	/// Left-handed scene export ((x, y, z) -> (x, z, -y)).
	Scene,
}

impl From<Mode> for ReadMode {
	fn from(mode: Mode) -> Self {
		match mode {
			Mode::Agi => ReadMode::Photoscan,
			Mode::Scene => ReadMode::Scene,
		}
	}
}

/// Builds a level-of-detail octree from a point cloud.
#[derive(Parser, Debug)]
#[command(name = "make_octree")]
#[command(about = "Converts XYZ or blob point clouds into streamable LOD octree files")]
struct Args {
	/// Input point cloud (`.blob` for raw records, anything else is XYZ text).
	input: PathBuf,

	/// Source coordinate convention [default: agi].
	#[arg(short, long, value_enum)]
	mode: Option<Mode>,

	/// Resample the input down to at most this many points.
	#[arg(long)]
	max_points: Option<usize>,

	/// Maximum points per node.
	#[arg(short, long)]
	node_size: Option<usize>,

	/// Target minimum points per leaf.
	#[arg(long)]
	min_node_size: Option<usize>,

	/// Directory for the output files [default: current directory].
	#[arg(short, long)]
	output_dir: Option<PathBuf>,

	/// Optional TOML file with any of the settings above.
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Keep the original coordinates instead of centering on the origin.
	#[arg(long)]
	no_center: bool,

	/// Build sibling subtrees in parallel.
	#[arg(short, long)]
	parallel: bool,

	/// Read the written files back and check them against the descriptor.
	#[arg(long)]
	verify: bool,

	/// More logging (-v debug, -vv trace).
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

impl Args {
	/// Settings given on the command line. Switches only count when set.
	fn overrides(&self) -> FileConfig {
		FileConfig {
			mode: self.mode.map(ReadMode::from),
			max_points: self.max_points,
			node_size: self.node_size,
			min_node_size: self.min_node_size,
			output_dir: self.output_dir.clone(),
			center: self.no_center.then_some(false),
			parallel: self.parallel.then_some(true),
			verify: self.verify.then_some(true),
		}
	}
}

fn main() -> Result<()> {
	let args = Args::parse();

	let level = match args.verbose {
		0 => Level::INFO,
		1 => Level::DEBUG,
		_ => Level::TRACE,
	};
	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_target(false)
		.init();

	let file = match &args.config {
		Some(path) => {
			info!(path = %path.display(), "loading config");
			FileConfig::load(path)?
		}
		None => FileConfig::default(),
	};
	let settings = args.overrides().or(file).resolve()?;

	run(&args.input, &settings)?;
	Ok(())
}

/// Convert one input file. Returns the hierarchy descriptor path.
fn run(input: &Path, settings: &Settings) -> Result<PathBuf> {
	let started = Instant::now();

	let mut points = ingest::load(input)
		.with_context(|| format!("Failed to read point cloud: {}", input.display()))?;
	if points.is_empty() {
		anyhow::bail!("No points in {}", input.display());
	}

	let report = prepare(&mut points, &settings.prepare);
	info!(
		input = report.input_count,
		kept = report.output_count,
		mode = ?settings.prepare.read_mode,
		"prepared point cloud"
	);

	std::fs::create_dir_all(&settings.output_dir).with_context(|| {
		format!(
			"Failed to create output dir: {}",
			settings.output_dir.display()
		)
	})?;
	let stem = settings.output_dir.join(output_stem(input)?);
	let layout = OutputLayout::new(&stem);

	let summary = build_with_options(points, &settings.policy, &stem, &settings.options)
		.context("Octree build failed")?;

	let hierarchy = layout.hierarchy_path();
	if settings.verify {
		let descriptor = storage::verify(&hierarchy)
			.with_context(|| format!("Verification failed: {}", hierarchy.display()))?;
		info!(nodes = descriptor.node_count, points = descriptor.point_count, "verified");
	}

	info!(
		nodes = summary.node_count,
		depth = summary.max_depth,
		elapsed_ms = started.elapsed().as_millis() as u64,
		"done, output written to {}",
		hierarchy.display()
	);
	Ok(hierarchy)
}

/// Input file name without directory or extension.
fn output_stem(input: &Path) -> Result<&std::ffi::OsStr> {
	input
		.file_stem()
		.with_context(|| format!("Input has no file name: {}", input.display()))
}
