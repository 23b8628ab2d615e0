use crate::maze::{Coord, Direction};

/// Stable index of a cell in the grid's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) usize);

impl CellId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Which level of the maze a cell sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layer {
    /// A grid position, possibly with a tunnel passing underneath it.
    Surface { under: Option<CellId> },
    /// A tunnel cell beneath a crossing.
    Under { over: CellId },
}

/// A single maze position.
///
/// Neighbor relations are structural and fixed once the grid is built. Link flags say
/// whether there is a passage (no wall) towards the neighbor in that direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub(crate) coord: Coord,
    pub(crate) neighbors: [Option<CellId>; 4],
    pub(crate) links: [bool; 4],
    pub(crate) visits: u32,
    pub(crate) weight: u32,
    pub(crate) orphaned: bool,
    pub(crate) layer: Layer,
}

impl Cell {
    pub(crate) fn new(coord: Coord) -> Self {
        Cell {
            coord,
            neighbors: [None; 4],
            links: [false; 4],
            visits: 0,
            weight: 0,
            orphaned: false,
            layer: Layer::Surface { under: None },
        }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Structural neighbor in `direction`, ignoring link state.
    pub fn neighbor(&self, direction: Direction) -> Option<CellId> {
        self.neighbors[direction.index()]
    }

    /// Number of structural neighbors.
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.iter().flatten().count()
    }

    pub fn is_linked(&self, direction: Direction) -> bool {
        self.links[direction.index()]
    }

    pub fn has_links(&self) -> bool {
        self.links.iter().any(|&linked| linked)
    }

    pub fn link_count(&self) -> usize {
        self.links.iter().filter(|&&linked| linked).count()
    }

    /// Link flags packed as a nibble, north in the high bit.
    pub fn link_bits(&self) -> u8 {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.is_linked(dir))
            .fold(0, |bits, dir| bits | dir.bit())
    }

    pub fn visits(&self) -> u32 {
        self.visits
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn is_orphaned(&self) -> bool {
        self.orphaned
    }

    /// Whether this is a tunnel cell created by weaving.
    pub fn is_under(&self) -> bool {
        matches!(self.layer, Layer::Under { .. })
    }

    /// The tunnel cell below this one, if a passage crosses underneath.
    pub fn under(&self) -> Option<CellId> {
        match self.layer {
            Layer::Surface { under } => under,
            Layer::Under { .. } => None,
        }
    }

    /// The crossing cell above a tunnel cell.
    pub fn over(&self) -> Option<CellId> {
        match self.layer {
            Layer::Surface { .. } => None,
            Layer::Under { over } => Some(over),
        }
    }

    /// A dead end has exactly one passage.
    pub fn is_dead_end(&self) -> bool {
        self.link_count() == 1
    }
}
