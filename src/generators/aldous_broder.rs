use rand::Rng;

use crate::error::GenerationError;
use crate::generators::GenContext;
use crate::maze::Grid;

/// Uniform spanning tree by random walk. Links a cell the first time the walk enters it.
///
/// Expected running time is quadratic in the number of cells on most shapes.
pub fn aldous_broder(grid: &mut Grid, ctx: &mut GenContext) -> Result<(), GenerationError> {
    let mut visited = vec![false; grid.arena_len()];
    let mut current = grid.random_cell(ctx.rng());
    visited[current.index()] = true;
    grid.visit(current);

    let mut unvisited = grid.cells().len() - 1;
    while unvisited > 0 {
        ctx.checkpoint()?;
        let neighbors = grid.neighbors(current).collect::<Vec<_>>();
        let next = neighbors[ctx.rng().random_range(0..neighbors.len())];

        if !visited[next.index()] {
            grid.link(current, next)?;
            visited[next.index()] = true;
            unvisited -= 1;
            ctx.step(grid)?;
        }
        grid.visit(next);
        current = next;
    }
    Ok(())
}
