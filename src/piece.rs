use crate::shape::{Shape, Tag};
use serde::{Deserialize, Serialize};

/// Index of a piece within its engine.
pub type PieceId = usize;

/// World position of a piece's local origin.
pub type Anchor = (i32, i32, i32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    anchor: Anchor,
    shape: Shape,
}

impl Piece {
    pub fn new(id: PieceId, anchor: Anchor, shape: Shape) -> Self {
        Self { id, anchor, shape }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Non-empty cells in world coordinates at the current anchor.
    pub fn world_cells(&self) -> impl Iterator<Item = ((i32, i32, i32), Tag)> + '_ {
        place(self.anchor, &self.shape)
    }

    pub(crate) fn set_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
    }

    pub(crate) fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    pub(crate) fn into_parts(self) -> (Anchor, Shape) {
        (self.anchor, self.shape)
    }
}

/// Non-empty cells of `shape` translated by `anchor`.
///
/// Coordinates saturate instead of wrapping, so a cell pushed past the `i32`
/// range stays far outside any volume.
pub(crate) fn place(
    anchor: Anchor,
    shape: &Shape,
) -> impl Iterator<Item = ((i32, i32, i32), Tag)> + '_ {
    shape.cells().map(move |((x, y, z), tag)| {
        (
            (
                anchor.0.saturating_add(x),
                anchor.1.saturating_add(y),
                anchor.2.saturating_add(z),
            ),
            tag,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_cells_follow_anchor() {
        let mut shape = Shape::empty(3);
        shape.set(0, 0, 0, 1);
        shape.set(2, 1, 0, 4);
        let piece = Piece::new(2, (5, 6, 7), shape);

        let mut cells: Vec<_> = piece.world_cells().collect();
        cells.sort();
        assert_eq!(cells, vec![((5, 6, 7), 1), ((7, 7, 7), 4)]);
    }

    #[test]
    fn test_place_saturates() {
        let mut shape = Shape::empty(3);
        shape.set(2, 0, 0, 1);
        let cells: Vec<_> = place((i32::MAX, 0, 0), &shape).collect();
        assert_eq!(cells, vec![((i32::MAX, 0, 0), 1)]);
    }
}
