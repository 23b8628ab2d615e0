use std::collections::VecDeque;
use std::fmt;

use rand::Rng;

use crate::config::MazeConfig;
use crate::error::{ConfigError, LookupError};
use crate::maze::cell::Layer;
use crate::maze::{Cell, CellId, Coord, Direction, Orientation};

/// A rectangular maze grid.
///
/// Cells live in an arena addressed by [`CellId`]. The first `rows * columns` slots hold the
/// grid positions in row-major order; tunnel cells created by weaving are appended after them.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    pub(crate) cells: Vec<Cell>,
    /// Non-orphaned grid positions, row-major.
    playable: Vec<CellId>,
    orphans: Vec<CellId>,
    under: Vec<CellId>,
    /// Bumped on every link change, used to invalidate derived data.
    version: u64,
}

impl Grid {
    /// Creates a grid of unlinked cells, removing every coordinate in `orphan_mask` from play.
    pub fn new(rows: usize, columns: usize, orphan_mask: &[Coord]) -> Result<Self, ConfigError> {
        if rows == 0 {
            return Err(ConfigError::NonPositiveDimension {
                name: "rows",
                value: rows,
            });
        }
        if columns == 0 {
            return Err(ConfigError::NonPositiveDimension {
                name: "columns",
                value: columns,
            });
        }

        let mut cells = (0..rows)
            .flat_map(|y| (0..columns).map(move |x| Cell::new(Coord::new(x, y))))
            .collect::<Vec<_>>();
        for cell in cells.iter_mut() {
            for dir in Direction::ALL {
                cell.neighbors[dir.index()] = dir
                    .step(cell.coord, rows, columns)
                    .map(|c| CellId(c.y * columns + c.x));
            }
        }

        let mut grid = Grid {
            rows,
            columns,
            cells,
            playable: Vec::new(),
            orphans: Vec::new(),
            under: Vec::new(),
            version: 0,
        };
        for &coord in orphan_mask {
            let id = grid
                .id(coord)
                .map_err(|_| ConfigError::OrphanOutOfBounds {
                    coord,
                    rows,
                    columns,
                })?;
            grid.sever(id);
        }
        grid.rebuild_cell_lists();
        if grid.playable.is_empty() {
            return Err(ConfigError::NoPlayableCells);
        }
        Ok(grid)
    }

    /// Validates the config and builds its grid shape.
    pub fn from_config(config: &MazeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Grid::new(config.rows, config.columns, &config.orphan_mask)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of grid positions, orphans included.
    pub fn size(&self) -> usize {
        self.rows * self.columns
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn ravel_index(&self, coord: Coord) -> usize {
        coord.y * self.columns + coord.x
    }

    /// Looks up the cell at a grid position.
    pub fn id(&self, coord: Coord) -> Result<CellId, LookupError> {
        if coord.x >= self.columns || coord.y >= self.rows {
            return Err(LookupError::OutOfRange {
                coord,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(CellId(self.ravel_index(coord)))
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    /// Number of arena slots, tunnel cells included.
    pub fn arena_len(&self) -> usize {
        self.cells.len()
    }

    /// Playable cells in row-major order, orphans excluded.
    pub fn cells(&self) -> &[CellId] {
        &self.playable
    }

    pub fn orphans(&self) -> &[CellId] {
        &self.orphans
    }

    /// Tunnel cells created by weaving.
    pub fn under_cells(&self) -> &[CellId] {
        &self.under
    }

    /// Grid positions row by row, orphans included.
    pub fn each_row(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells[..self.size()].chunks(self.columns)
    }

    pub fn neighbor(&self, id: CellId, direction: Direction) -> Option<CellId> {
        self.cells[id.0].neighbor(direction)
    }

    /// Structurally adjacent cells, regardless of walls.
    pub fn neighbors(&self, id: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.cells[id.0].neighbors.iter().flatten().copied()
    }

    /// The cell a passage in `direction` leads to.
    ///
    /// Same as [`Grid::neighbor`], except that moving into a crossing along its tunnel axis
    /// ends up in the tunnel cell underneath.
    pub fn passage(&self, id: CellId, direction: Direction) -> Option<CellId> {
        let next = self.cells[id.0].neighbor(direction)?;
        if self.cells[id.0].is_under() {
            return Some(next);
        }
        match self.cells[next.0].under() {
            Some(under) if self.cells[under.0].neighbor(direction.opposite()) == Some(id) => {
                Some(under)
            }
            _ => Some(next),
        }
    }

    /// Direction of the passage from `from` to `to`, if they are adjacent.
    pub fn direction_between(&self, from: CellId, to: CellId) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&dir| self.passage(from, dir) == Some(to))
    }

    /// Cells reachable through a passage from `id`.
    pub fn links(&self, id: CellId) -> impl Iterator<Item = CellId> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |&dir| self.cells[id.0].is_linked(dir))
            .filter_map(move |dir| self.passage(id, dir))
    }

    pub fn is_linked(&self, a: CellId, b: CellId) -> bool {
        self.direction_between(a, b)
            .is_some_and(|dir| self.cells[a.0].is_linked(dir))
    }

    /// Opens a passage between two adjacent cells, on both sides.
    pub fn link(&mut self, a: CellId, b: CellId) -> Result<(), LookupError> {
        self.set_link(a, b, true)
    }

    /// Puts a wall back between two adjacent cells, on both sides.
    pub fn unlink(&mut self, a: CellId, b: CellId) -> Result<(), LookupError> {
        self.set_link(a, b, false)
    }

    fn set_link(&mut self, a: CellId, b: CellId, linked: bool) -> Result<(), LookupError> {
        if a.0 >= self.cells.len() {
            return Err(LookupError::NoSuchCell(a));
        }
        if b.0 >= self.cells.len() {
            return Err(LookupError::NoSuchCell(b));
        }
        let dir = self
            .direction_between(a, b)
            .ok_or(LookupError::NotAdjacent {
                from: self.cells[a.0].coord,
                to: self.cells[b.0].coord,
            })?;
        self.cells[a.0].links[dir.index()] = linked;
        self.cells[b.0].links[dir.opposite().index()] = linked;
        self.version += 1;
        Ok(())
    }

    /// Links every pair of structurally adjacent grid positions.
    pub fn link_all(&mut self) {
        for cell in self.cells.iter_mut() {
            for dir in Direction::ALL {
                cell.links[dir.index()] = cell.neighbor(dir).is_some();
            }
        }
        self.version += 1;
    }

    /// Restores the freshly built state: no links, no tunnels, zeroed visits and weights.
    pub fn clear_links(&mut self) {
        let size = self.size();
        self.cells.truncate(size);
        self.under.clear();
        for cell in self.cells.iter_mut() {
            cell.links = [false; 4];
            cell.visits = 0;
            cell.weight = 0;
            cell.layer = Layer::Surface { under: None };
        }
        self.version += 1;
    }

    /// Number of passages in the maze.
    pub fn link_count(&self) -> usize {
        self.cells.iter().map(Cell::link_count).sum::<usize>() / 2
    }

    /// Playable cells with exactly one passage.
    pub fn dead_ends(&self) -> Vec<CellId> {
        self.playable
            .iter()
            .copied()
            .filter(|id| self.cells[id.0].is_dead_end())
            .collect()
    }

    /// Whether every playable cell and tunnel is reachable through passages.
    pub fn is_connected(&self) -> bool {
        let reached = self.flood(|grid, id| grid.links(id).collect());
        reached == self.playable.len() + self.under.len()
    }

    /// Whether every playable cell is reachable through structural adjacency.
    pub fn is_structurally_connected(&self) -> bool {
        let reached = self.flood(|grid, id| grid.neighbors(id).collect());
        reached == self.playable.len()
    }

    fn flood(&self, next: impl Fn(&Grid, CellId) -> Vec<CellId>) -> usize {
        let Some(&start) = self.playable.first() else {
            return 0;
        };
        let mut seen = vec![false; self.cells.len()];
        seen[start.0] = true;
        let mut queue = VecDeque::from([start]);
        let mut count = 1;
        while let Some(id) = queue.pop_front() {
            for n in next(self, id) {
                if !seen[n.0] {
                    seen[n.0] = true;
                    count += 1;
                    queue.push_back(n);
                }
            }
        }
        count
    }

    /// A uniformly random playable cell.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> CellId {
        self.playable[rng.random_range(0..self.playable.len())]
    }

    pub(crate) fn visit(&mut self, id: CellId) {
        let cell = &mut self.cells[id.0];
        cell.visits = cell.visits.saturating_add(1);
    }

    pub(crate) fn set_weight(&mut self, id: CellId, weight: u32) {
        self.cells[id.0].weight = weight;
    }

    /// Removes a grid position from play. Only allowed before any passage is carved.
    pub fn orphan(&mut self, coord: Coord) -> Result<(), ConfigError> {
        let id = self.id(coord).map_err(|_| ConfigError::OrphanOutOfBounds {
            coord,
            rows: self.rows,
            columns: self.columns,
        })?;
        if self.cells.iter().any(Cell::has_links) {
            return Err(ConfigError::GridAlreadyCarved(coord));
        }
        if self.playable == [id] {
            return Err(ConfigError::NoPlayableCells);
        }
        self.sever(id);
        self.rebuild_cell_lists();
        Ok(())
    }

    fn sever(&mut self, id: CellId) {
        for dir in Direction::ALL {
            if let Some(n) = self.cells[id.0].neighbors[dir.index()].take() {
                self.cells[n.0].neighbors[dir.opposite().index()] = None;
            }
        }
        self.cells[id.0].orphaned = true;
    }

    fn rebuild_cell_lists(&mut self) {
        let (orphans, playable): (Vec<CellId>, Vec<CellId>) =
            (0..self.size()).map(CellId).partition(|id| self.cells[id.0].orphaned);
        self.playable = playable;
        self.orphans = orphans;
    }

    /// Creates a tunnel cell beneath `over`, running along `orientation`.
    ///
    /// The tunnel's structural neighbors are the crossing's neighbors on that axis; passages
    /// towards `over` along the axis resolve to the tunnel from then on.
    pub(crate) fn add_under(
        &mut self,
        over: CellId,
        orientation: Orientation,
    ) -> Result<CellId, LookupError> {
        let crossing = &self.cells[over.0];
        let mut tunnel = Cell::new(crossing.coord);
        for dir in orientation.directions() {
            let n = crossing.neighbor(dir).ok_or(LookupError::NotAdjacent {
                from: crossing.coord,
                to: crossing.coord,
            })?;
            tunnel.neighbors[dir.index()] = Some(n);
        }
        tunnel.layer = Layer::Under { over };

        let id = CellId(self.cells.len());
        self.cells.push(tunnel);
        self.cells[over.0].layer = Layer::Surface { under: Some(id) };
        self.under.push(id);
        self.version += 1;
        Ok(id)
    }

    /// Raw link flag write used by the decoder, which restores symmetry itself.
    pub(crate) fn set_link_flag(&mut self, id: CellId, direction: Direction, linked: bool) {
        self.cells[id.0].links[direction.index()] = linked;
        self.version += 1;
    }
}

impl std::ops::Index<CellId> for Grid {
    type Output = Cell;

    fn index(&self, id: CellId) -> &Self::Output {
        &self.cells[id.0]
    }
}

impl std::ops::Index<Coord> for Grid {
    type Output = Cell;

    /// Panics when `coord` lies outside the grid.
    fn index(&self, coord: Coord) -> &Self::Output {
        match self.id(coord) {
            Ok(id) => &self.cells[id.0],
            Err(err) => panic!("{err}"),
        }
    }
}

/// Plain-text wall drawing. Orphans are drawn solid, crossings marked with `x`.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+{}", "---+".repeat(self.columns))?;
        for row in self.each_row() {
            let mut top = String::from("|");
            let mut bottom = String::from("+");
            for cell in row {
                let body = if cell.is_orphaned() {
                    "###"
                } else if cell.under().is_some() {
                    " x "
                } else {
                    "   "
                };
                top.push_str(body);
                top.push(if cell.is_linked(Direction::East) { ' ' } else { '|' });
                bottom.push_str(if cell.is_linked(Direction::South) {
                    "   "
                } else {
                    "---"
                });
                bottom.push('+');
            }
            writeln!(f, "{top}")?;
            writeln!(f, "{bottom}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(grid: &Grid, x: usize, y: usize) -> CellId {
        grid.id(Coord::new(x, y)).unwrap()
    }

    #[test]
    fn test_rejects_empty_dimensions() {
        assert_eq!(
            Grid::new(0, 3, &[]),
            Err(ConfigError::NonPositiveDimension {
                name: "rows",
                value: 0
            })
        );
        assert!(matches!(
            Grid::new(3, 0, &[]),
            Err(ConfigError::NonPositiveDimension { name: "columns", .. })
        ));
    }

    #[test]
    fn test_neighbor_pointers_match_adjacency() {
        let grid = Grid::new(3, 4, &[]).unwrap();
        let corner = at(&grid, 0, 0);
        assert_eq!(grid.neighbors(corner).count(), 2);
        assert_eq!(grid.neighbor(corner, Direction::East), Some(at(&grid, 1, 0)));
        assert_eq!(grid.neighbor(corner, Direction::South), Some(at(&grid, 0, 1)));
        assert_eq!(grid.neighbors(at(&grid, 1, 0)).count(), 3);
        assert_eq!(grid.neighbors(at(&grid, 1, 1)).count(), 4);
    }

    #[test]
    fn test_link_is_symmetric() {
        let mut grid = Grid::new(2, 2, &[]).unwrap();
        let a = at(&grid, 0, 0);
        let b = at(&grid, 1, 0);
        grid.link(a, b).unwrap();
        assert!(grid.is_linked(a, b));
        assert!(grid.is_linked(b, a));
        assert!(grid[a].is_linked(Direction::East));
        assert!(grid[b].is_linked(Direction::West));
        assert_eq!(grid.links(a).collect::<Vec<_>>(), vec![b]);
        assert_eq!(grid.link_count(), 1);

        grid.unlink(b, a).unwrap();
        assert!(!grid.is_linked(a, b));
        assert_eq!(grid.link_count(), 0);
    }

    #[test]
    fn test_link_rejects_non_adjacent_cells() {
        let mut grid = Grid::new(3, 3, &[]).unwrap();
        let a = at(&grid, 0, 0);
        let b = at(&grid, 2, 2);
        assert!(matches!(
            grid.link(a, b),
            Err(LookupError::NotAdjacent { .. })
        ));
        assert_eq!(grid.link_count(), 0);
    }

    #[test]
    fn test_orphans_are_severed() {
        let grid = Grid::new(3, 3, &[Coord::new(1, 1)]).unwrap();
        let hole = at(&grid, 1, 1);
        assert_eq!(grid.neighbors(hole).count(), 0);
        assert!(grid[hole].is_orphaned());
        assert!(!grid.cells().contains(&hole));
        assert_eq!(grid.orphans(), &[hole]);
        assert_eq!(grid.cells().len(), 8);
        // Neighbors of the hole lose the edge on their side too
        assert_eq!(grid.neighbor(at(&grid, 1, 0), Direction::South), None);
        assert!(grid.is_structurally_connected());
    }

    #[test]
    fn test_orphan_mask_out_of_bounds() {
        assert!(matches!(
            Grid::new(2, 2, &[Coord::new(2, 0)]),
            Err(ConfigError::OrphanOutOfBounds { .. })
        ));
        assert_eq!(
            Grid::new(1, 1, &[Coord::new(0, 0)]),
            Err(ConfigError::NoPlayableCells)
        );
    }

    #[test]
    fn test_orphan_after_carving_is_rejected() {
        let mut grid = Grid::new(2, 2, &[]).unwrap();
        let (a, b) = (at(&grid, 0, 0), at(&grid, 0, 1));
        grid.link(a, b).unwrap();
        assert_eq!(
            grid.orphan(Coord::new(1, 1)),
            Err(ConfigError::GridAlreadyCarved(Coord::new(1, 1)))
        );
        grid.clear_links();
        assert!(grid.orphan(Coord::new(1, 1)).is_ok());
        assert_eq!(grid.orphans().len(), 1);
    }

    #[test]
    fn test_lookup_out_of_range() {
        let grid = Grid::new(2, 3, &[]).unwrap();
        assert!(grid.id(Coord::new(2, 1)).is_ok());
        assert_eq!(
            grid.id(Coord::new(3, 0)),
            Err(LookupError::OutOfRange {
                coord: Coord::new(3, 0),
                rows: 2,
                columns: 3
            })
        );
    }

    #[test]
    #[should_panic(expected = "coordinate (5, 0) is outside the 3x3 grid")]
    fn test_index_by_coord_out_of_range_panics() {
        let grid = Grid::new(3, 3, &[]).unwrap();
        let _ = &grid[Coord::new(5, 0)];
    }

    #[test]
    fn test_visits_saturate() {
        let mut grid = Grid::new(1, 2, &[]).unwrap();
        let id = at(&grid, 1, 0);
        grid.visit(id);
        assert_eq!(grid[id].visits(), 1);
        grid.cells[id.0].visits = u32::MAX;
        grid.visit(id);
        assert_eq!(grid[id].visits(), u32::MAX);
    }

    #[test]
    fn test_tunnel_resolves_passages() {
        let mut grid = Grid::new(3, 3, &[]).unwrap();
        let center = at(&grid, 1, 1);
        let (north, south) = (at(&grid, 1, 0), at(&grid, 1, 2));
        let (west, east) = (at(&grid, 0, 1), at(&grid, 2, 1));

        let under = grid.add_under(center, Orientation::Vertical).unwrap();
        grid.link(west, center).unwrap();
        grid.link(center, east).unwrap();
        grid.link(north, under).unwrap();
        grid.link(under, south).unwrap();

        assert_eq!(grid.passage(north, Direction::South), Some(under));
        assert_eq!(grid.passage(west, Direction::East), Some(center));
        assert!(!grid[center].is_linked(Direction::North));
        assert!(grid[north].is_linked(Direction::South));
        assert!(!grid.is_linked(north, center));
        assert_eq!(grid.links(under).collect::<Vec<_>>(), vec![north, south]);
        assert_eq!(grid.link_count(), 4);

        grid.clear_links();
        assert!(grid.under_cells().is_empty());
        assert_eq!(grid.arena_len(), 9);
        assert_eq!(grid.passage(north, Direction::South), Some(center));
    }

    #[test]
    fn test_display_draws_walls() {
        let mut grid = Grid::new(1, 2, &[]).unwrap();
        let (a, b) = (at(&grid, 0, 0), at(&grid, 1, 0));
        grid.link(a, b).unwrap();
        assert_eq!(grid.to_string(), "+---+---+\n|       |\n+---+---+\n");
    }
}
