//! ASCII XYZ reader.
//!
//! One point per line, whitespace separated. The layout is classified once,
//! from the token count of the first non-empty line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use glam::Vec3;
use tracing::{debug, info};

use crate::buffer::PointBuffer;
use crate::error::IngestError;
use crate::types::Point;

/// Log progress every this many points.
const PROGRESS_INTERVAL: usize = 1_000_000;

/// Per-line token layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XyzLayout {
  /// `x y z r g b`
  Plain,
  /// `x y z r g b nx ny nz intensity`; normal and intensity are skipped.
  WithNormals,
}

impl XyzLayout {
  /// Tokens per line for this layout.
  pub const fn tokens(self) -> usize {
    match self {
      Self::Plain => 6,
      Self::WithNormals => 10,
    }
  }

  /// Classify a line by its token count.
  pub fn detect(line: &str) -> Result<Self, IngestError> {
    match line.split_whitespace().count() {
      6 => Ok(Self::Plain),
      10 => Ok(Self::WithNormals),
      tokens => Err(IngestError::UnrecognizedLayout { tokens }),
    }
  }
}

/// Read an XYZ text file.
pub fn read_xyz(path: &Path) -> Result<PointBuffer, IngestError> {
  let file = File::open(path).map_err(|source| IngestError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  let points = parse_xyz(BufReader::new(file)).map_err(|err| match err {
    IngestError::Io { source, .. } => IngestError::Io {
      path: path.to_path_buf(),
      source,
    },
    other => other,
  })?;
  info!(path = %path.display(), points = points.len(), "read xyz");
  Ok(points)
}

/// Parse XYZ text from any buffered reader.
pub fn parse_xyz<R: BufRead>(reader: R) -> Result<PointBuffer, IngestError> {
  let mut points = PointBuffer::new();
  let mut layout = None;

  for (index, line) in reader.lines().enumerate() {
    let line_no = index + 1;
    let line = line.map_err(|source| IngestError::Io {
      path: Default::default(),
      source,
    })?;
    let line = line.trim();
    if line.is_empty() {
      continue;
    }

    let line_layout = match layout {
      Some(known) => known,
      None => {
        let detected = XyzLayout::detect(line)?;
        debug!(layout = ?detected, tokens = detected.tokens(), "classified xyz layout");
        layout = Some(detected);
        detected
      }
    };

    points.push(parse_line(line, line_layout, line_no)?);

    if points.len() % PROGRESS_INTERVAL == 0 {
      debug!(points = points.len(), "parsing");
    }
  }

  Ok(points)
}

fn parse_line(line: &str, layout: XyzLayout, line_no: usize) -> Result<Point, IngestError> {
  let mut tokens = Tokens {
    inner: line.split_whitespace(),
    line_no,
  };

  let position = Vec3::new(tokens.next()?, tokens.next()?, tokens.next()?);
  if !position.is_finite() {
    return Err(IngestError::Parse {
      line: line_no,
      message: format!("non-finite coordinate {position}"),
    });
  }
  let color = [
    channel(tokens.next()?),
    channel(tokens.next()?),
    channel(tokens.next()?),
  ];

  if layout == XyzLayout::WithNormals {
    // Normal and intensity are validated but unused.
    let _normal: [f32; 3] = [tokens.next()?, tokens.next()?, tokens.next()?];
    let _intensity: f64 = tokens.next()?;
  }

  if tokens.inner.next().is_some() {
    return Err(IngestError::Parse {
      line: line_no,
      message: format!("expected {} tokens", layout.tokens()),
    });
  }

  Ok(Point::new(position, color))
}

/// Clamp an integer color value into one byte.
fn channel(value: i64) -> u8 {
  value.clamp(0, 255) as u8
}

struct Tokens<'a> {
  inner: SplitWhitespace<'a>,
  line_no: usize,
}

impl Tokens<'_> {
  fn next<T: FromStr>(&mut self) -> Result<T, IngestError>
  where
    T::Err: std::fmt::Display,
  {
    let token = self.inner.next().ok_or_else(|| IngestError::Parse {
      line: self.line_no,
      message: "missing value".to_owned(),
    })?;
    token.parse().map_err(|err| IngestError::Parse {
      line: self.line_no,
      message: format!("{token:?}: {err}"),
    })
  }
}

#[cfg(test)]
#[path = "xyz_test.rs"]
mod xyz_test;
