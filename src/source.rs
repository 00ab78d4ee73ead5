//! Where piece shapes come from.
//!
//! A shape file is plain text: `shape_side * slab_rows` whitespace-separated
//! integers, each between `0` and the configured highest tag. Values fill
//! the center slab of the piece's local grid, X outer and Y inner.

use crate::config::{ConfigError, PuzzleConfig};
use crate::piece::PieceId;
use crate::shape::{Shape, Tag};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeParseError {
    #[error("value #{position} ({token:?}) is not an integer")]
    NotAnInteger { position: usize, token: String },
    #[error("value #{position} ({value}) is outside 0..={max}")]
    OutOfRange { position: usize, value: i64, max: Tag },
    #[error("expected {expected} values, found {found}")]
    TooFewValues { expected: usize, found: usize },
    #[error("expected {expected} values, found more")]
    TooManyValues { expected: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Shape for piece {piece} not found at {}", .path.display())]
    Missing { piece: PieceId, path: PathBuf },
    #[error("Shape for piece {piece} not available")]
    Absent { piece: PieceId },
    #[error("IO error reading piece {piece}: {source}")]
    Io {
        piece: PieceId,
        #[source]
        source: io::Error,
    },
    #[error("Shape for piece {piece} is malformed: {reason}")]
    Malformed {
        piece: PieceId,
        #[source]
        reason: ShapeParseError,
    },
    #[error("Piece {piece} starts with cell {cell:?} outside the volume")]
    OutOfVolume {
        piece: PieceId,
        cell: (i32, i32, i32),
    },
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl LoadError {
    /// The piece whose shape failed, if the error concerns one.
    pub fn piece(&self) -> Option<PieceId> {
        match self {
            LoadError::Missing { piece, .. }
            | LoadError::Absent { piece }
            | LoadError::Io { piece, .. }
            | LoadError::Malformed { piece, .. }
            | LoadError::OutOfVolume { piece, .. } => Some(*piece),
            LoadError::Config(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;

/// Supplies the raw text of each piece's shape.
pub trait ShapeSource {
    fn read(&self, piece: PieceId) -> Result<String>;
}

/// Reads `<dir>/<prefix><id>.<extension>`, e.g. `data/block_3.txt`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    prefix: String,
    extension: String,
}

impl DirectorySource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            prefix: "block_".to_string(),
            extension: "txt".to_string(),
        }
    }

    pub fn from_config(config: &PuzzleConfig) -> Self {
        Self {
            dir: config.data_dir.clone(),
            prefix: config.file_prefix.clone(),
            extension: config.file_extension.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, piece: PieceId) -> PathBuf {
        let name = if self.extension.is_empty() {
            format!("{}{}", self.prefix, piece)
        } else {
            format!("{}{}.{}", self.prefix, piece, self.extension)
        };
        self.dir.join(name)
    }
}

impl ShapeSource for DirectorySource {
    fn read(&self, piece: PieceId) -> Result<String> {
        let path = self.path_for(piece);
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LoadError::Missing { piece, path },
            _ => LoadError::Io { piece, source },
        })
    }
}

/// Shapes held in memory, keyed by piece id.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    shapes: HashMap<PieceId, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, piece: PieceId, text: impl Into<String>) {
        self.shapes.insert(piece, text.into());
    }

    pub fn with(mut self, piece: PieceId, text: impl Into<String>) -> Self {
        self.insert(piece, text);
        self
    }
}

impl ShapeSource for MemorySource {
    fn read(&self, piece: PieceId) -> Result<String> {
        self.shapes
            .get(&piece)
            .cloned()
            .ok_or(LoadError::Absent { piece })
    }
}

/// Parse exactly `expected` tags in `0..=max_tag` from whitespace-separated text.
pub fn parse_slab(
    text: &str,
    expected: usize,
    max_tag: Tag,
) -> std::result::Result<Vec<Tag>, ShapeParseError> {
    let mut values = Vec::with_capacity(expected);
    for (position, token) in text.split_whitespace().enumerate() {
        if position == expected {
            return Err(ShapeParseError::TooManyValues { expected });
        }
        let value: i64 = token
            .parse()
            .map_err(|_| ShapeParseError::NotAnInteger {
                position,
                token: token.to_string(),
            })?;
        if !(0..=max_tag as i64).contains(&value) {
            return Err(ShapeParseError::OutOfRange {
                position,
                value,
                max: max_tag,
            });
        }
        values.push(value as Tag);
    }
    if values.len() < expected {
        return Err(ShapeParseError::TooFewValues {
            expected,
            found: values.len(),
        });
    }
    Ok(values)
}

/// Read and parse one piece's shape.
pub fn load_shape(
    source: &impl ShapeSource,
    piece: PieceId,
    config: &PuzzleConfig,
) -> Result<Shape> {
    let text = source.read(piece)?;
    let values = parse_slab(&text, config.values_per_shape(), config.max_tag)
        .map_err(|reason| LoadError::Malformed { piece, reason })?;
    Shape::from_center_slab(config.shape_side, config.slab_rows, &values)
        .ok_or_else(|| ConfigError::SlabTooTall {
            rows: config.slab_rows,
            side: config.shape_side,
        })
        .map_err(LoadError::from)
}
