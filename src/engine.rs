use crate::config::PuzzleConfig;
use crate::occupancy::{find_overlaps, Obstruction, Occupancy, Overlap};
use crate::piece::{Anchor, Piece, PieceId};
use crate::shape::{rotate_shape, Axis, Shape, Turn};
use crate::source::{load_shape, LoadError, ShapeSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid piece id {id}: engine holds {count} pieces")]
    InvalidPieceId { id: PieceId, count: usize },
    #[error("Piece {piece} starts with cell {cell:?} outside the volume")]
    OutOfVolume {
        piece: PieceId,
        cell: (i32, i32, i32),
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Result of a move or rotation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The piece now sits at its new position or orientation.
    Applied,
    /// Nothing changed.
    Blocked(Obstruction),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub fn obstruction(&self) -> Option<Obstruction> {
        match self {
            Outcome::Applied => None,
            Outcome::Blocked(obstruction) => Some(*obstruction),
        }
    }
}

/// Owns every piece and the volume they share.
///
/// Moves and rotations are all-or-nothing: a candidate anchor or shape is
/// checked against the volume as the other pieces fill it, and only
/// written back once every cell fits. Callers see pieces through shared
/// references and occupancy through fresh snapshots.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    volume_side: usize,
    pieces: Vec<Piece>,
}

impl PlacementEngine {
    /// An engine with an empty volume and no pieces.
    pub fn new(volume_side: usize) -> Self {
        Self {
            volume_side,
            pieces: Vec::new(),
        }
    }

    /// Load `config.piece_count` shapes from `source`.
    ///
    /// Piece `i` starts at anchor `(0, 0, 2 * i)`. Fails on the first piece
    /// whose shape is missing or malformed, or whose starting cells leave
    /// the volume; no engine is built in that case.
    pub fn init(
        config: &PuzzleConfig,
        source: &impl ShapeSource,
    ) -> std::result::Result<Self, LoadError> {
        config.validate()?;

        let mut engine = Self::new(config.volume_side);
        for id in 0..config.piece_count {
            let shape = load_shape(source, id, config)?;
            debug!(piece = id, cells = shape.cell_count(), "loaded shape");
            let z = i32::try_from(2 * id).unwrap_or(i32::MAX);
            engine.add_piece((0, 0, z), shape);
        }

        if let Some((piece, cell)) = engine.first_out_of_volume() {
            return Err(LoadError::OutOfVolume { piece, cell });
        }
        engine.report_start();
        Ok(engine)
    }

    /// Build an engine around pieces constructed by the caller.
    ///
    /// Pieces are renumbered by position, so the `i`-th piece gets id `i`
    /// whatever id it carried. Every filled cell must start inside the
    /// volume; overlapping starts are accepted and logged.
    pub fn from_pieces(
        volume_side: usize,
        pieces: impl IntoIterator<Item = Piece>,
    ) -> Result<Self> {
        let mut engine = Self::new(volume_side);
        for piece in pieces {
            let (anchor, shape) = piece.into_parts();
            engine.add_piece(anchor, shape);
        }

        if let Some((piece, cell)) = engine.first_out_of_volume() {
            return Err(EngineError::OutOfVolume { piece, cell });
        }
        engine.report_start();
        Ok(engine)
    }

    /// Add a piece and return its id. Placement is not checked.
    pub fn add_piece(&mut self, anchor: Anchor, shape: Shape) -> PieceId {
        let id = self.pieces.len();
        self.pieces.push(Piece::new(id, anchor, shape));
        id
    }

    pub fn volume_side(&self) -> usize {
        self.volume_side
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Shift piece `id` by `(dx, dy, dz)` if every filled cell stays inside
    /// the volume and clear of other pieces.
    pub fn translate(&mut self, id: PieceId, dx: i32, dy: i32, dz: i32) -> Result<Outcome> {
        let piece = self.get_piece(id)?;
        let (x, y, z) = piece.anchor();

        let outcome = match (x.checked_add(dx), y.checked_add(dy), z.checked_add(dz)) {
            (Some(nx), Some(ny), Some(nz)) => {
                let anchor = (nx, ny, nz);
                match self.check_placement(id, anchor, piece.shape()) {
                    Ok(()) => {
                        self.pieces[id].set_anchor(anchor);
                        Outcome::Applied
                    }
                    Err(obstruction) => Outcome::Blocked(obstruction),
                }
            }
            _ => Outcome::Blocked(Obstruction::OutOfBounds {
                cell: (
                    x.saturating_add(dx),
                    y.saturating_add(dy),
                    z.saturating_add(dz),
                ),
            }),
        };

        match outcome {
            Outcome::Applied => debug!(piece = id, dx, dy, dz, "translated"),
            Outcome::Blocked(obstruction) => {
                trace!(piece = id, dx, dy, dz, %obstruction, "translation blocked")
            }
        }
        Ok(outcome)
    }

    /// Turn piece `id` a quarter turn about its local center. The anchor
    /// does not move.
    pub fn rotate(&mut self, id: PieceId, axis: Axis, turn: Turn) -> Result<Outcome> {
        let piece = self.get_piece(id)?;
        let candidate = rotate_shape(piece.shape(), axis, turn);

        let outcome = match self.check_placement(id, piece.anchor(), &candidate) {
            Ok(()) => {
                self.pieces[id].set_shape(candidate);
                debug!(piece = id, %axis, %turn, "rotated");
                Outcome::Applied
            }
            Err(obstruction) => {
                trace!(piece = id, %axis, %turn, %obstruction, "rotation blocked");
                Outcome::Blocked(obstruction)
            }
        };
        Ok(outcome)
    }

    /// Freshly rebuilt occupancy of the whole volume.
    pub fn snapshot(&self) -> Occupancy {
        Occupancy::rebuild(self.volume_side, &self.pieces)
    }

    /// Cells claimed by more than one piece. Empty in any state reached
    /// only through `translate` and `rotate` from an overlap-free start.
    pub fn overlaps(&self) -> Vec<Overlap> {
        find_overlaps(self.volume_side, &self.pieces)
    }

    fn first_out_of_volume(&self) -> Option<(PieceId, (i32, i32, i32))> {
        let empty = Occupancy::empty(self.volume_side);
        self.pieces.iter().find_map(|piece| {
            match empty.check(piece.id(), piece.anchor(), piece.shape()) {
                Err(Obstruction::OutOfBounds { cell }) => Some((piece.id(), cell)),
                _ => None,
            }
        })
    }

    fn report_start(&self) {
        let overlaps = self.overlaps();
        if !overlaps.is_empty() {
            warn!(
                cells = overlaps.len(),
                "initial layout has pieces sharing cells"
            );
        }
        info!(
            pieces = self.piece_count(),
            volume_side = self.volume_side,
            "placement engine ready"
        );
    }

    fn get_piece(&self, id: PieceId) -> Result<&Piece> {
        self.pieces.get(id).ok_or(EngineError::InvalidPieceId {
            id,
            count: self.pieces.len(),
        })
    }

    fn check_placement(
        &self,
        id: PieceId,
        anchor: Anchor,
        shape: &Shape,
    ) -> std::result::Result<(), Obstruction> {
        Occupancy::rebuild_excluding(self.volume_side, &self.pieces, id)
            .check(id, anchor, shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn unit_shape(tag: u8) -> Shape {
        let mut shape = Shape::empty(1);
        shape.set(0, 0, 0, tag);
        shape
    }

    #[test]
    fn test_translate_into_neighbour_is_blocked() {
        let mut engine = PlacementEngine::new(16);
        let a = engine.add_piece((0, 0, 0), unit_shape(1));
        engine.add_piece((1, 0, 0), unit_shape(2));

        let outcome = engine.translate(a, 1, 0, 0).unwrap();
        assert_eq!(
            outcome,
            Outcome::Blocked(Obstruction::Collision {
                cell: (1, 0, 0),
                other: 1
            })
        );
        assert_eq!(engine.piece(a).unwrap().anchor(), (0, 0, 0));
    }

    #[test]
    fn test_translate_commits_anchor() {
        let mut engine = PlacementEngine::new(16);
        let a = engine.add_piece((0, 0, 0), unit_shape(1));

        assert!(engine.translate(a, 3, 4, 5).unwrap().is_applied());
        assert_eq!(engine.piece(a).unwrap().anchor(), (3, 4, 5));
        assert_eq!(engine.snapshot().owner_at(3, 4, 5), Some(a));
    }

    #[test]
    fn test_translate_overflow_is_blocked() {
        let mut engine = PlacementEngine::new(16);
        let a = engine.add_piece((5, 0, 0), Shape::empty(1));

        let outcome = engine.translate(a, i32::MAX, 0, 0).unwrap();
        assert!(matches!(
            outcome,
            Outcome::Blocked(Obstruction::OutOfBounds { .. })
        ));
        assert_eq!(engine.piece(a).unwrap().anchor(), (5, 0, 0));
    }

    #[test]
    fn test_invalid_piece_id() {
        let mut engine = PlacementEngine::new(16);
        engine.add_piece((0, 0, 0), unit_shape(1));

        assert_eq!(
            engine.translate(1, 0, 0, 0),
            Err(EngineError::InvalidPieceId { id: 1, count: 1 })
        );
        assert_eq!(
            engine.rotate(7, Axis::Yaw, Turn::Positive),
            Err(EngineError::InvalidPieceId { id: 7, count: 1 })
        );
    }

    #[test]
    fn test_rotation_blocked_by_bounds_keeps_shape() {
        let mut engine = PlacementEngine::new(16);
        let mut shape = Shape::empty(7);
        // A bar along +X from the center; a positive yaw swings it toward local z = 0
        for x in 3..7 {
            shape.set(x, 3, 3, 1);
        }
        let a = engine.add_piece((0, 0, -3), shape.clone());
        // Bar sits at world z = 0, so the turn would reach z = -3
        let outcome = engine.rotate(a, Axis::Yaw, Turn::Positive).unwrap();
        assert!(matches!(
            outcome,
            Outcome::Blocked(Obstruction::OutOfBounds { .. })
        ));
        assert!(!outcome.is_applied());
        assert_eq!(engine.piece(a).unwrap().shape(), &shape);
    }

    #[test]
    fn test_init_places_pieces_on_staggered_planes() {
        let row = "1 2 3 4 5 ";
        let text = row.repeat(7);
        let mut source = MemorySource::new();
        for id in 0..6 {
            source.insert(id, text.clone());
        }

        let engine = PlacementEngine::init(&PuzzleConfig::default(), &source).unwrap();
        assert_eq!(engine.piece_count(), 6);
        for (id, piece) in engine.pieces().iter().enumerate() {
            assert_eq!(piece.id(), id);
            assert_eq!(piece.anchor(), (0, 0, 2 * id as i32));
        }
        assert!(engine.overlaps().is_empty());
        assert_eq!(engine.snapshot().occupied_count(), 6 * 35);
    }

    #[test]
    fn test_init_fails_when_any_piece_is_missing() {
        let text = "1 ".repeat(35);
        let source = MemorySource::new()
            .with(0, text.clone())
            .with(1, text.clone())
            .with(3, text);
        let config = PuzzleConfig {
            piece_count: 4,
            ..PuzzleConfig::default()
        };

        let err = PlacementEngine::init(&config, &source).unwrap_err();
        assert!(matches!(err, LoadError::Absent { piece: 2 }));
    }

    #[test]
    fn test_init_rejects_pieces_starting_outside_volume() {
        let text = "1 ".repeat(35);
        let mut source = MemorySource::new();
        for id in 0..8 {
            source.insert(id, text.clone());
        }
        let config = PuzzleConfig {
            piece_count: 8,
            ..PuzzleConfig::default()
        };

        // Piece 7 sits at z = 14, so its center slab lands on z = 17
        let err = PlacementEngine::init(&config, &source).unwrap_err();
        assert!(matches!(
            err,
            LoadError::OutOfVolume {
                piece: 7,
                cell: (_, _, 17)
            }
        ));
        assert_eq!(err.piece(), Some(7));
    }

    #[test]
    fn test_init_accepts_pieces_touching_far_wall() {
        let text = "1 ".repeat(35);
        let mut source = MemorySource::new();
        for id in 0..7 {
            source.insert(id, text.clone());
        }
        let config = PuzzleConfig {
            piece_count: 7,
            ..PuzzleConfig::default()
        };

        let mut engine = PlacementEngine::init(&config, &source).unwrap();
        assert!(engine.translate(6, 0, 0, 0).unwrap().is_applied());
    }

    #[test]
    fn test_from_pieces_renumbers_by_position() {
        let pieces = vec![
            Piece::new(9, (0, 0, 0), unit_shape(1)),
            Piece::new(4, (2, 0, 0), unit_shape(2)),
        ];
        let engine = PlacementEngine::from_pieces(4, pieces).unwrap();

        assert_eq!(engine.piece_count(), 2);
        assert_eq!(engine.piece(0).unwrap().id(), 0);
        assert_eq!(engine.piece(1).unwrap().id(), 1);
        assert_eq!(engine.snapshot().owner_at(2, 0, 0), Some(1));
    }

    #[test]
    fn test_from_pieces_rejects_cells_outside_volume() {
        let pieces = vec![
            Piece::new(0, (0, 0, 0), unit_shape(1)),
            Piece::new(1, (0, 4, 0), unit_shape(1)),
        ];
        assert_eq!(
            PlacementEngine::from_pieces(4, pieces).unwrap_err(),
            EngineError::OutOfVolume {
                piece: 1,
                cell: (0, 4, 0)
            }
        );
    }

    #[test]
    fn test_from_pieces_keeps_overlapping_start() {
        let pieces = vec![
            Piece::new(0, (1, 1, 1), unit_shape(1)),
            Piece::new(1, (1, 1, 1), unit_shape(2)),
        ];
        let engine = PlacementEngine::from_pieces(4, pieces).unwrap();
        assert_eq!(engine.overlaps().len(), 1);
    }
}
