//! Discrete player commands and the selection cursor that routes them.

use crate::engine::PlacementEngine;
use crate::piece::PieceId;
use crate::shape::{Axis, ParseRotationError, Turn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A unit step along one world axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Direction {
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Direction::PosX => (1, 0, 0),
            Direction::NegX => (-1, 0, 0),
            Direction::PosY => (0, 1, 0),
            Direction::NegY => (0, -1, 0),
            Direction::PosZ => (0, 0, 1),
            Direction::NegZ => (0, 0, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::PosX => "+x",
            Direction::NegX => "-x",
            Direction::PosY => "+y",
            Direction::NegY => "-y",
            Direction::PosZ => "+z",
            Direction::NegZ => "-z",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Direction {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "+x" | "x" => Ok(Direction::PosX),
            "-x" => Ok(Direction::NegX),
            "+y" | "y" => Ok(Direction::PosY),
            "-y" => Ok(Direction::NegY),
            "+z" | "z" => Ok(Direction::PosZ),
            "-z" => Ok(Direction::NegZ),
            _ => Err(CommandParseError::BadArgument(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    UnknownVerb(String),
    #[error("bad argument: {0}")]
    BadArgument(String),
    #[error(transparent)]
    BadRotation(#[from] ParseRotationError),
    #[error("{verb} expects {expected} argument(s)")]
    WrongArity { verb: String, expected: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    Rotate(Axis, Turn),
    SelectNext,
    SelectPrevious,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move(direction) => write!(f, "move {}", direction),
            Command::Rotate(axis, turn) => write!(f, "rotate {} {}", axis, turn),
            Command::SelectNext => write!(f, "next"),
            Command::SelectPrevious => write!(f, "prev"),
        }
    }
}

/// Parses `move <dir>`, `rotate <axis> <+|->`, `next` and `prev`.
impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let (verb, args) = words.split_first().ok_or(CommandParseError::Empty)?;
        let verb = verb.to_ascii_lowercase();

        let arity = |expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(CommandParseError::WrongArity {
                    verb: verb.clone(),
                    expected,
                })
            }
        };

        match verb.as_str() {
            "move" | "m" => {
                arity(1)?;
                Ok(Command::Move(args[0].parse()?))
            }
            "rotate" | "r" => {
                arity(2)?;
                Ok(Command::Rotate(args[0].parse()?, args[1].parse()?))
            }
            "next" | "n" => {
                arity(0)?;
                Ok(Command::SelectNext)
            }
            "prev" | "p" => {
                arity(0)?;
                Ok(Command::SelectPrevious)
            }
            _ => Err(CommandParseError::UnknownVerb(verb.clone())),
        }
    }
}

/// Whether a command took effect. Renderers turn this into a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    Accepted,
    Rejected,
}

/// An engine plus the piece the player currently controls.
#[derive(Debug, Clone)]
pub struct Session {
    engine: PlacementEngine,
    selected: PieceId,
}

impl Session {
    pub fn new(engine: PlacementEngine) -> Self {
        Self {
            engine,
            selected: 0,
        }
    }

    pub fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    pub fn into_engine(self) -> PlacementEngine {
        self.engine
    }

    pub fn selected(&self) -> PieceId {
        self.selected
    }

    /// Select a piece directly. Returns `false` for an id the engine lacks.
    pub fn select(&mut self, id: PieceId) -> bool {
        if id < self.engine.piece_count() {
            self.selected = id;
            true
        } else {
            false
        }
    }

    pub fn apply(&mut self, command: Command) -> Feedback {
        let count = self.engine.piece_count();
        let result = match command {
            Command::SelectNext | Command::SelectPrevious if count == 0 => {
                return Feedback::Rejected;
            }
            Command::SelectNext => {
                self.selected = (self.selected + 1) % count;
                return Feedback::Accepted;
            }
            Command::SelectPrevious => {
                self.selected = (self.selected + count - 1) % count;
                return Feedback::Accepted;
            }
            Command::Move(direction) => {
                let (dx, dy, dz) = direction.offset();
                self.engine.translate(self.selected, dx, dy, dz)
            }
            Command::Rotate(axis, turn) => self.engine.rotate(self.selected, axis, turn),
        };

        let feedback = match result {
            Ok(outcome) if outcome.is_applied() => Feedback::Accepted,
            Ok(_) => Feedback::Rejected,
            Err(err) => {
                debug!(%err, "command dropped");
                Feedback::Rejected
            }
        };
        debug!(piece = self.selected, %command, ?feedback, "command applied");
        feedback
    }
}
