use thiserror::Error;

use crate::maze::{CellId, Coord, Direction};

/// Invalid maze configuration. Fatal to the request, never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: usize },

    #[error("no generation algorithm configured")]
    EmptyAlgorithm,

    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("room size must be at least 2, got {0}")]
    RoomSizeTooSmall(usize),

    #[error("orphan {coord} lies outside the {rows}x{columns} grid")]
    OrphanOutOfBounds {
        coord: Coord,
        rows: usize,
        columns: usize,
    },

    #[error("orphan mask removes every cell of the grid")]
    NoPlayableCells,

    #[error("cannot orphan {0} once links have been carved")]
    GridAlreadyCarved(Coord),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Unknown names and out-of-range cell references.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("unknown algorithm: {0:?}")]
    UnknownAlgorithm(String),

    #[error("coordinate {coord} is outside the {rows}x{columns} grid")]
    OutOfRange {
        coord: Coord,
        rows: usize,
        columns: usize,
    },

    #[error("no cell with id {0:?}")]
    NoSuchCell(CellId),

    #[error("cells {from} and {to} are not adjacent")]
    NotAdjacent { from: Coord, to: Coord },

    #[error("cells {from} and {to} are not linked")]
    NotLinked { from: Coord, to: Coord },
}

/// Failure while carving a maze. The grid is unusable afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("stop requested")]
    StopRequested,

    #[error("grid has no playable cells")]
    NoCells,

    #[error("playable cells are not structurally connected")]
    DisconnectedGrid,

    #[error("{algorithm} requires a full rectangle, but {orphans} cells are orphaned")]
    UnsupportedShape {
        algorithm: &'static str,
        orphans: usize,
    },

    #[error("cannot divide a {width}x{height} region")]
    RegionTooSmall { width: usize, height: usize },

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// A structural rule violated by a generated grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("cell {0} has no linked neighbors")]
    NoLinks(Coord),

    #[error("cell {coord} has {count} neighbors, expected 2, 3 or 4")]
    NeighborCount { coord: Coord, count: usize },

    #[error("cell {0} has 3 neighbors but is not on a non-corner edge")]
    NotWallCell(Coord),

    #[error("cell {0} has 2 neighbors but is not a corner")]
    NotCorner(Coord),

    #[error("cell {coord} has {count} neighbors, its position admits {expected}")]
    ShapeMismatch {
        coord: Coord,
        count: usize,
        expected: usize,
    },

    #[error("cell {coord} has an incorrect {direction} neighbor")]
    WrongNeighbor { coord: Coord, direction: Direction },

    #[error("link {direction} of cell {coord} is not mirrored")]
    AsymmetricLink { coord: Coord, direction: Direction },
}

/// Malformed textual maze encoding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("encoded maze has length {actual}, expected {expected}")]
    Length { expected: usize, actual: usize },

    #[error("row {row} has {actual} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid hex digit {digit:?} at {coord}")]
    InvalidDigit { digit: char, coord: Coord },

    #[error("orphaned cell {0} carries links")]
    LinkedOrphan(Coord),

    #[error("link {direction} of cell {coord} has no matching link")]
    Inconsistent { coord: Coord, direction: Direction },

    #[error(transparent)]
    Shape(#[from] ConfigError),
}

/// Any failure of the end-to-end build pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MazeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}
