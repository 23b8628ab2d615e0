pub mod cell;
pub mod grid;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use cell::{Cell, CellId};
pub use grid::Grid;

/// Position of a cell in the grid. `x` is the column, `y` the row, row 0 being the northern edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Coord { x, y }
    }
}

/// The four cardinal directions, in the fixed order used by link flags and the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Slot of this direction in per-cell neighbor and link arrays.
    pub const fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Bit of this direction in an encoded nibble: N=8, S=4, E=2, W=1.
    pub const fn bit(self) -> u8 {
        0b1000 >> self.index()
    }

    /// The axis a move in this direction runs along.
    pub const fn orientation(self) -> Orientation {
        match self {
            Direction::North | Direction::South => Orientation::Vertical,
            Direction::East | Direction::West => Orientation::Horizontal,
        }
    }

    /// Applies this direction to a coordinate, returning `None` when it leaves the grid.
    pub fn step(self, coord: Coord, rows: usize, columns: usize) -> Option<Coord> {
        let Coord { x, y } = coord;
        let next = match self {
            Direction::North => Coord::new(x, y.checked_sub(1)?),
            Direction::South => Coord::new(x, y + 1),
            Direction::East => Coord::new(x + 1, y),
            Direction::West => Coord::new(x.checked_sub(1)?, y),
        };
        (next.x < columns && next.y < rows).then_some(next)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        };
        write!(f, "{}", name)
    }
}

/// Orientation of a corridor or a wall line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The two directions running along this orientation.
    pub const fn directions(self) -> [Direction; 2] {
        match self {
            Orientation::Horizontal => [Direction::West, Direction::East],
            Orientation::Vertical => [Direction::North, Direction::South],
        }
    }

    pub const fn perpendicular(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}
