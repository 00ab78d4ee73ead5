//! The shared volume as the pieces currently fill it.
//!
//! An [`Occupancy`] is always derived from a piece list and never edited in
//! place by the engine; every check and every snapshot rebuilds it.

use crate::grid::Grid3;
use crate::piece::{place, Anchor, Piece, PieceId};
use crate::shape::{Shape, Tag, EMPTY};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which piece fills a volume cell, and with what tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    pub piece: PieceId,
    pub tag: Tag,
}

/// Why a candidate placement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Obstruction {
    /// A filled cell would land outside the volume.
    OutOfBounds { cell: (i32, i32, i32) },
    /// A filled cell would land on a cell another piece holds.
    Collision { cell: (i32, i32, i32), other: PieceId },
}

impl fmt::Display for Obstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Obstruction::OutOfBounds { cell } => {
                write!(f, "cell {:?} is outside the volume", cell)
            }
            Obstruction::Collision { cell, other } => {
                write!(f, "cell {:?} is held by piece {}", cell, other)
            }
        }
    }
}

/// A cell claimed by more than one piece at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlap {
    pub cell: (i32, i32, i32),
    pub pieces: Vec<PieceId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    grid: Grid3<Option<Claim>>,
}

impl Occupancy {
    pub fn empty(side: usize) -> Self {
        Self {
            grid: Grid3::new(side),
        }
    }

    /// Stamp every piece into a fresh volume of `side³` cells.
    pub fn rebuild(side: usize, pieces: &[Piece]) -> Self {
        let mut occupancy = Self::empty(side);
        for piece in pieces {
            occupancy.stamp(piece);
        }
        occupancy
    }

    /// The volume as every piece except `excluded` sees it.
    pub fn rebuild_excluding(side: usize, pieces: &[Piece], excluded: PieceId) -> Self {
        let mut occupancy = Self::empty(side);
        for piece in pieces.iter().filter(|p| p.id() != excluded) {
            occupancy.stamp(piece);
        }
        occupancy
    }

    /// Cells outside the volume are skipped.
    fn stamp(&mut self, piece: &Piece) {
        let id = piece.id();
        for ((x, y, z), tag) in piece.world_cells() {
            self.grid.set(x, y, z, Some(Claim { piece: id, tag }));
        }
    }

    /// Test whether `shape` at `anchor` fits, on behalf of piece `piece`.
    ///
    /// Reports the first offending cell in the shape's storage order.
    pub fn check(
        &self,
        piece: PieceId,
        anchor: Anchor,
        shape: &Shape,
    ) -> Result<(), Obstruction> {
        for (cell, _) in place(anchor, shape) {
            let (x, y, z) = cell;
            match self.grid.get(x, y, z) {
                None => return Err(Obstruction::OutOfBounds { cell }),
                Some(Some(claim)) if claim.piece != piece => {
                    return Err(Obstruction::Collision {
                        cell,
                        other: claim.piece,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn side(&self) -> usize {
        self.grid.side()
    }

    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<Claim> {
        self.grid.get(x, y, z).copied().flatten()
    }

    /// Tag at a cell, `0` when empty or outside the volume.
    pub fn tag_at(&self, x: i32, y: i32, z: i32) -> Tag {
        self.get(x, y, z).map_or(EMPTY, |claim| claim.tag)
    }

    pub fn owner_at(&self, x: i32, y: i32, z: i32) -> Option<PieceId> {
        self.get(x, y, z).map(|claim| claim.piece)
    }

    pub fn is_occupied(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z).is_some()
    }

    /// Occupied cells with their claims, in storage order.
    pub fn occupied(&self) -> impl Iterator<Item = ((i32, i32, i32), Claim)> + '_ {
        self.grid.iter().filter_map(|((x, y, z), cell)| {
            cell.map(|claim| ((x as i32, y as i32, z as i32), claim))
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.grid.as_slice().iter().filter(|c| c.is_some()).count()
    }

    /// Occupied cells shifted so the volume is centered on the origin,
    /// which is how a renderer places unit cubes around its camera target.
    pub fn centered_cells(&self) -> impl Iterator<Item = ((i32, i32, i32), Claim)> + '_ {
        let half = (self.side() / 2) as i32;
        self.occupied()
            .map(move |((x, y, z), claim)| ((x - half, y - half, z - half), claim))
    }

    /// Plain tag lattice, `0` for empty cells.
    pub fn tags(&self) -> Grid3<Tag> {
        self.grid.map(|cell| cell.map_or(EMPTY, |claim| claim.tag))
    }

    /// One horizontal layer as rows of tags, indexed `[z][x]`.
    pub fn layer(&self, y: i32) -> Vec<Vec<Tag>> {
        let side = self.side() as i32;
        (0..side)
            .map(|z| (0..side).map(|x| self.tag_at(x, y, z)).collect())
            .collect()
    }
}

/// List every in-volume cell that two or more pieces claim.
pub fn find_overlaps(side: usize, pieces: &[Piece]) -> Vec<Overlap> {
    let mut claims: Grid3<Vec<PieceId>> = Grid3::new(side);
    for piece in pieces {
        for ((x, y, z), _) in piece.world_cells() {
            if let Some(owners) = claims.get_mut(x, y, z) {
                if !owners.contains(&piece.id()) {
                    owners.push(piece.id());
                }
            }
        }
    }
    claims
        .iter()
        .filter(|(_, owners)| owners.len() > 1)
        .map(|((x, y, z), owners)| Overlap {
            cell: (x as i32, y as i32, z as i32),
            pieces: owners.clone(),
        })
        .collect()
}
