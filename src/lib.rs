//! Placement engine for a 3D block-packing puzzle.
//!
//! A fixed set of pieces, each drawn on a small odd-sided grid, is moved and
//! quarter-turned inside a shared cubic volume. The [`PlacementEngine`]
//! refuses any move or turn that would push a filled cell out of the volume
//! or onto a cell held by another piece, and never leaves a piece half-moved.

pub mod config;
pub mod engine;
pub mod grid;
pub mod occupancy;
pub mod palette;
pub mod piece;
pub mod session;
pub mod shape;
pub mod source;

pub use config::{ConfigError, PuzzleConfig};
pub use engine::{EngineError, Outcome, PlacementEngine};
pub use grid::Grid3;
pub use occupancy::{Claim, Obstruction, Occupancy, Overlap};
pub use palette::{Palette, Rgb};
pub use piece::{Anchor, Piece, PieceId};
pub use session::{Command, CommandParseError, Direction, Feedback, Session};
pub use shape::{rotate_shape, Axis, ParseRotationError, Shape, Tag, Turn};
pub use source::{DirectorySource, LoadError, MemorySource, ShapeParseError, ShapeSource};
