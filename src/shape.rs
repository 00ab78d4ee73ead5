//! Piece shapes on a small odd-sided local grid, and quarter-turn rotation.

use crate::grid::Grid3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Material/colour tag of a filled cell. `0` means empty.
pub type Tag = u8;

pub const EMPTY: Tag = 0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseRotationError {
    #[error("unknown axis: {0}")]
    UnknownAxis(String),
    #[error("unknown turn direction: {0}")]
    UnknownTurn(String),
}

/// Axis a quarter turn is made about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// About the vertical (Y) axis; rotates the X-Z plane.
    Yaw,
    /// About the X axis; rotates the Y-Z plane.
    Pitch,
    /// About the Z axis; rotates the X-Y plane.
    Roll,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Yaw, Axis::Pitch, Axis::Roll];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Yaw => "yaw",
            Axis::Pitch => "pitch",
            Axis::Roll => "roll",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Axis {
    type Err = ParseRotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaw" | "y" => Ok(Axis::Yaw),
            "pitch" | "x" => Ok(Axis::Pitch),
            "roll" | "z" => Ok(Axis::Roll),
            _ => Err(ParseRotationError::UnknownAxis(s.to_string())),
        }
    }
}

/// Direction of a quarter turn, `+1` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    Positive,
    Negative,
}

impl Turn {
    pub fn from_sign(sign: i32) -> Option<Turn> {
        match sign {
            1 => Some(Turn::Positive),
            -1 => Some(Turn::Negative),
            _ => None,
        }
    }

    pub fn sign(self) -> i32 {
        match self {
            Turn::Positive => 1,
            Turn::Negative => -1,
        }
    }

    pub fn inverse(self) -> Turn {
        match self {
            Turn::Positive => Turn::Negative,
            Turn::Negative => Turn::Positive,
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Turn::Positive => write!(f, "+"),
            Turn::Negative => write!(f, "-"),
        }
    }
}

impl FromStr for Turn {
    type Err = ParseRotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" | "+1" | "1" => Ok(Turn::Positive),
            "-" | "-1" => Ok(Turn::Negative),
            _ => Err(ParseRotationError::UnknownTurn(s.to_string())),
        }
    }
}

/// The local grid of a piece.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    grid: Grid3<Tag>,
}

impl Shape {
    pub fn empty(side: usize) -> Self {
        Self {
            grid: Grid3::new(side),
        }
    }

    /// A shape with every cell set to `tag`.
    pub fn solid(side: usize, tag: Tag) -> Self {
        Self {
            grid: Grid3::from_fn(side, |_, _, _| tag),
        }
    }

    /// Lay `values` into the center Z plane, `rows` rows tall around the
    /// center Y row, read with X as the outer loop and Y as the inner loop.
    ///
    /// Returns `None` when `values` is not exactly `side * rows` long or the
    /// slab does not fit.
    pub fn from_center_slab(side: usize, rows: usize, values: &[Tag]) -> Option<Self> {
        if rows > side || values.len() != side * rows {
            return None;
        }
        let center = side / 2;
        let first_row = center - rows / 2;
        let mut shape = Shape::empty(side);
        let mut values = values.iter().copied();
        for x in 0..side {
            for y in first_row..first_row + rows {
                shape.grid[(x, y, center)] = values.next()?;
            }
        }
        Some(shape)
    }

    pub fn side(&self) -> usize {
        self.grid.side()
    }

    /// Index of the center cell on each axis. Rotations pivot here.
    pub fn center(&self) -> usize {
        self.grid.side() / 2
    }

    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<Tag> {
        self.grid.get(x, y, z).copied()
    }

    pub fn set(&mut self, x: i32, y: i32, z: i32, tag: Tag) -> bool {
        self.grid.set(x, y, z, tag)
    }

    /// Non-empty cells as local coordinates and tags.
    pub fn cells(&self) -> impl Iterator<Item = ((i32, i32, i32), Tag)> + '_ {
        self.grid
            .iter()
            .filter(|(_, &tag)| tag != EMPTY)
            .map(|((x, y, z), &tag)| ((x as i32, y as i32, z as i32), tag))
    }

    pub fn cell_count(&self) -> usize {
        self.grid.as_slice().iter().filter(|&&t| t != EMPTY).count()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.as_slice().iter().all(|&t| t == EMPTY)
    }

    pub fn grid(&self) -> &Grid3<Tag> {
        &self.grid
    }
}

/// Rotate a shape a quarter turn about its center. The input is untouched.
///
/// With `m = side - 1`, each output cell reads from:
///
/// | axis  | `+1`                 | `-1`                 |
/// |-------|----------------------|----------------------|
/// | pitch | `(x, m - z, y)`      | `(x, z, m - y)`      |
/// | yaw   | `(m - z, y, x)`      | `(z, y, m - x)`      |
/// | roll  | `(y, m - x, z)`      | `(m - y, x, z)`      |
pub fn rotate_shape(shape: &Shape, axis: Axis, turn: Turn) -> Shape {
    let side = shape.side();
    let m = side.saturating_sub(1);
    let old = &shape.grid;
    let grid = Grid3::from_fn(side, |x, y, z| {
        let source = match (axis, turn) {
            (Axis::Pitch, Turn::Positive) => (x, m - z, y),
            (Axis::Pitch, Turn::Negative) => (x, z, m - y),
            (Axis::Yaw, Turn::Positive) => (m - z, y, x),
            (Axis::Yaw, Turn::Negative) => (z, y, m - x),
            (Axis::Roll, Turn::Positive) => (y, m - x, z),
            (Axis::Roll, Turn::Negative) => (m - y, x, z),
        };
        old[source]
    });
    Shape { grid }
}
