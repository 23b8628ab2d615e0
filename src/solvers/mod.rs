mod distances;
mod path;

pub use distances::{DistanceCache, Distances};
pub use path::{Path, Segment};

use crate::maze::{CellId, Grid};

/// Shortest walk from `from` to `to`, or `None` if no passage connects them.
pub fn shortest_path(grid: &Grid, from: CellId, to: CellId) -> Option<Path> {
    grid.get(from)?;
    grid.get(to)?;
    Distances::new(grid, from).path_to(grid, to)
}

/// The longest shortest path in the maze, found with two breadth-first sweeps.
///
/// Exact on spanning trees. On braided mazes it is a long path, not necessarily the longest.
pub fn longest_path(grid: &Grid) -> Option<Path> {
    let &start = grid.cells().first()?;
    let (from, _) = Distances::new(grid, start).furthest_cell();
    let distances = Distances::new(grid, from);
    let (to, distance) = distances.furthest_cell();
    tracing::debug!(
        from = %grid[from].coord(),
        to = %grid[to].coord(),
        distance,
        "longest path"
    );
    distances.path_to(grid, to)
}
