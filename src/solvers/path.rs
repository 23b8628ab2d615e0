use crate::error::LookupError;
use crate::maze::{CellId, Direction, Grid};

/// One step of a walk: the cell and the direction the walker faces on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub cell: CellId,
    /// Direction of travel into this cell. The first segment faces its successor.
    pub facing: Direction,
}

/// A walk through linked cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `cell`, which must be linked to the current tail.
    pub fn push(&mut self, grid: &Grid, cell: CellId) -> Result<(), LookupError> {
        let target = grid.get(cell).ok_or(LookupError::NoSuchCell(cell))?;
        let Some(tail) = self.segments.last().map(|s| s.cell) else {
            self.segments.push(Segment {
                cell,
                facing: Direction::North,
            });
            return Ok(());
        };

        let facing = grid
            .direction_between(tail, cell)
            .filter(|&dir| grid[tail].is_linked(dir))
            .ok_or_else(|| LookupError::NotLinked {
                from: grid[tail].coord(),
                to: target.coord(),
            })?;
        if self.segments.len() == 1 {
            self.segments[0].facing = facing;
        }
        self.segments.push(Segment { cell, facing });
        Ok(())
    }

    /// Removes the tail segment.
    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Number of segments (cells) on the path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of moves along the path.
    pub fn distance(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    pub fn contains(&self, cell: CellId) -> bool {
        self.segments.iter().any(|s| s.cell == cell)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        self.segments.iter().map(|s| s.cell)
    }

    /// Reverses the walk in place, flipping facings to match the new direction of travel.
    pub fn reverse(&mut self) {
        let n = self.segments.len();
        if n < 2 {
            return;
        }
        // Facing into cell i (i > 0) of the reversed walk is the opposite of the original
        // facing into its successor.
        let facings = (0..n)
            .map(|i| {
                let original = n - 1 - i;
                if i == 0 {
                    self.segments[original].facing.opposite()
                } else {
                    self.segments[original + 1].facing.opposite()
                }
            })
            .collect::<Vec<_>>();
        self.segments.reverse();
        for (segment, facing) in self.segments.iter_mut().zip(facings) {
            segment.facing = facing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Coord;

    /// 2x2 grid carved as a U: (0,0) - (0,1) - (1,1) - (1,0)
    fn u_shape() -> (Grid, [CellId; 4]) {
        let mut grid = Grid::new(2, 2, &[]).unwrap();
        let cells = [(0, 0), (0, 1), (1, 1), (1, 0)].map(|c| grid.id(Coord::from(c)).unwrap());
        for pair in cells.windows(2) {
            grid.link(pair[0], pair[1]).unwrap();
        }
        (grid, cells)
    }

    #[test]
    fn test_push_requires_links() {
        let (grid, [a, b, c, d]) = u_shape();
        let mut path = Path::new();
        path.push(&grid, a).unwrap();
        assert!(matches!(
            path.push(&grid, d),
            Err(LookupError::NotLinked { .. })
        ));
        path.push(&grid, b).unwrap();
        path.push(&grid, c).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.distance(), 2);
        assert!(path.contains(b));
        assert!(!path.contains(d));
        assert_eq!(path.pop().map(|s| s.cell), Some(c));
        assert_eq!(path.last().map(|s| s.cell), Some(b));
    }

    #[test]
    fn test_facings() {
        let (grid, cells) = u_shape();
        let mut path = Path::new();
        for cell in cells {
            path.push(&grid, cell).unwrap();
        }
        let facings = path.segments().iter().map(|s| s.facing).collect::<Vec<_>>();
        assert_eq!(
            facings,
            vec![
                Direction::South,
                Direction::South,
                Direction::East,
                Direction::North
            ]
        );
    }

    #[test]
    fn test_reverse_matches_walking_backwards() {
        let (grid, cells) = u_shape();
        let mut forward = Path::new();
        let mut backward = Path::new();
        for cell in cells {
            forward.push(&grid, cell).unwrap();
        }
        for cell in cells.into_iter().rev() {
            backward.push(&grid, cell).unwrap();
        }
        forward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_empty_and_single() {
        let (grid, [a, ..]) = u_shape();
        let mut path = Path::new();
        assert!(path.is_empty());
        assert_eq!(path.distance(), 0);
        path.push(&grid, a).unwrap();
        path.reverse();
        assert_eq!(path.len(), 1);
        assert_eq!(path.distance(), 0);
    }
}
