//! Octree build benchmarks.
//!
//! - **in_memory**: serial vs parallel split, no files
//! - **streaming**: full build into a temp directory, node files included
//! - **ingest**: XYZ text parsing throughput

use std::io::Cursor;

use criterion::{
  black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use glam::Vec3;
use point_octree::{
  build_with_options, ingest::xyz::parse_xyz, BuildOptions, Octree, Point, PointBuffer,
  SplitPolicy,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// Synthetic clouds
// =============================================================================

/// Uniform cube with random colors.
fn uniform_cloud(count: usize, seed: u64) -> PointBuffer {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..count)
    .map(|_| {
      let position = Vec3::new(
        rng.random_range(-50.0..50.0),
        rng.random_range(-50.0..50.0),
        rng.random_range(-50.0..50.0),
      );
      Point::new(position, [rng.random(), rng.random(), rng.random()])
    })
    .collect()
}

/// Points on a sphere shell: deep, uneven trees.
fn shell_cloud(count: usize, seed: u64) -> PointBuffer {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..count)
    .map(|_| {
      let dir = Vec3::new(
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
      )
      .normalize_or(Vec3::X);
      Point::new(dir * 40.0, [200, 200, 200])
    })
    .collect()
}

fn policy() -> SplitPolicy {
  SplitPolicy::new(64, 4_096).unwrap()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_in_memory(c: &mut Criterion) {
  let mut group = c.benchmark_group("build/in_memory");
  let policy = policy();

  for &count in &[100_000usize, 1_000_000] {
    let uniform = uniform_cloud(count, 7);
    let shell = shell_cloud(count, 7);
    group.throughput(Throughput::Elements(count as u64));

    for (name, cloud) in [("uniform", &uniform), ("shell", &shell)] {
      for (mode, options) in [
        ("serial", BuildOptions::IN_MEMORY),
        ("parallel", BuildOptions::IN_MEMORY.with_parallel(true)),
      ] {
        group.bench_with_input(
          BenchmarkId::new(format!("{name}/{mode}"), count),
          &count,
          |b, _| {
            b.iter_batched(
              || cloud.clone(),
              |points| black_box(Octree::build_with(points, &policy, &options, &()).unwrap()),
              BatchSize::LargeInput,
            )
          },
        );
      }
    }
  }

  group.finish();
}

fn bench_streaming(c: &mut Criterion) {
  let mut group = c.benchmark_group("build/streaming");
  group.sample_size(10);
  let policy = policy();
  let dir = tempfile::tempdir().unwrap();
  let stem = dir.path().join("bench");
  let count = 1_000_000;
  let cloud = uniform_cloud(count, 11);
  group.throughput(Throughput::Elements(count as u64));

  for (mode, options) in [
    ("serial", BuildOptions::STREAMING),
    ("parallel", BuildOptions::STREAMING.with_parallel(true)),
  ] {
    group.bench_function(mode, |b| {
      b.iter_batched(
        || cloud.clone(),
        |points| black_box(build_with_options(points, &policy, &stem, &options).unwrap()),
        BatchSize::LargeInput,
      )
    });
  }

  group.finish();
}

fn bench_parse_xyz(c: &mut Criterion) {
  let mut group = c.benchmark_group("ingest/xyz");
  let count = 200_000;
  let text: String = uniform_cloud(count, 3)
    .iter()
    .map(|p| {
      let [r, g, b] = p.color;
      format!(
        "{} {} {} {r} {g} {b}\n",
        p.position.x, p.position.y, p.position.z
      )
    })
    .collect();
  group.throughput(Throughput::Bytes(text.len() as u64));

  group.bench_function("plain", |b| {
    b.iter(|| black_box(parse_xyz(Cursor::new(text.as_bytes())).unwrap()))
  });

  group.finish();
}

criterion_group!(build, bench_in_memory, bench_streaming);
criterion_group!(ingest, bench_parse_xyz);
criterion_main!(build, ingest);
