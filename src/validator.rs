//! Structural checks on generated grids.

use crate::error::ValidationError;
use crate::maze::{CellId, Coord, Direction, Grid};

/// Checks the topology of every playable cell and the symmetry of every link.
///
/// A playable cell must have at least one passage (unless it is the only cell), and its
/// structural neighbors must be exactly the in-bounds, non-orphaned positions around it.
/// On a plain rectangle that means 4 neighbors inside, 3 on an edge and 2 in a corner.
pub fn check_grid(grid: &Grid) -> Result<(), ValidationError> {
    check_cells(grid)
        .and_then(|()| check_links(grid))
        .inspect_err(|err| tracing::warn!(%err, "grid failed structural check"))
}

/// Whether the passages form a spanning tree over all playable and tunnel cells.
pub fn is_spanning_tree(grid: &Grid) -> bool {
    let nodes = grid.cells().len() + grid.under_cells().len();
    grid.link_count() + 1 == nodes && grid.is_connected()
}

fn check_cells(grid: &Grid) -> Result<(), ValidationError> {
    let lone_cell = grid.cells().len() == 1 && grid.under_cells().is_empty();
    for &id in grid.cells() {
        let cell = &grid[id];
        let coord = cell.coord();
        if !lone_cell && !cell.has_links() {
            return Err(ValidationError::NoLinks(coord));
        }

        let expected = expected_neighbors(grid, id);
        let count = cell.neighbor_count();
        let admitted = expected.iter().flatten().count();
        if count != admitted {
            return Err(match count {
                3 => ValidationError::NotWallCell(coord),
                2 => ValidationError::NotCorner(coord),
                0 | 1 if admitted >= 2 => ValidationError::NeighborCount { coord, count },
                _ => ValidationError::ShapeMismatch {
                    coord,
                    count,
                    expected: admitted,
                },
            });
        }
        if let Some(direction) = Direction::ALL
            .into_iter()
            .find(|&dir| cell.neighbor(dir) != expected[dir.index()])
        {
            return Err(ValidationError::WrongNeighbor { coord, direction });
        }
    }
    Ok(())
}

/// Neighbors a playable cell should have, from its position alone.
fn expected_neighbors(grid: &Grid, id: CellId) -> [Option<CellId>; 4] {
    let coord = grid[id].coord();
    Direction::ALL.map(|dir| {
        dir.step(coord, grid.rows(), grid.columns())
            .and_then(|c| grid.id(c).ok())
            .filter(|&n| !grid[n].is_orphaned())
    })
}

fn check_links(grid: &Grid) -> Result<(), ValidationError> {
    match one_sided_link(grid) {
        Some((coord, direction)) => Err(ValidationError::AsymmetricLink { coord, direction }),
        None => Ok(()),
    }
}

/// First link flag, in arena order, that is not mirrored by the cell it leads to.
pub(crate) fn one_sided_link(grid: &Grid) -> Option<(Coord, Direction)> {
    let all = grid
        .cells()
        .iter()
        .chain(grid.orphans())
        .chain(grid.under_cells());
    for &id in all {
        let cell = &grid[id];
        for direction in Direction::ALL.into_iter().filter(|&dir| cell.is_linked(dir)) {
            let mirrored = grid.passage(id, direction).is_some_and(|other| {
                grid[other].is_linked(direction.opposite())
                    && grid.passage(other, direction.opposite()) == Some(id)
            });
            if !mirrored {
                return Some((cell.coord(), direction));
            }
        }
    }
    None
}
