use rand::Rng;

use crate::error::GenerationError;
use crate::generators::GenContext;
use crate::maze::Grid;

/// Depth-first carving with an explicit stack.
pub fn recursive_backtrack(grid: &mut Grid, ctx: &mut GenContext) -> Result<(), GenerationError> {
    let mut visited = vec![false; grid.arena_len()];

    // Initialize the starting point
    let start = grid.random_cell(ctx.rng());
    visited[start.index()] = true;
    grid.visit(start);

    // The stack keeps the cells of the current corridor
    let mut stack = vec![start];

    while let Some(&cell) = stack.last() {
        ctx.checkpoint()?;
        let neighbors = grid
            .neighbors(cell)
            .filter(|n| !visited[n.index()])
            .collect::<Vec<_>>();

        if neighbors.is_empty() {
            // Dead end, back up to look at another neighbor of the previous cell
            stack.pop();
            continue;
        }

        let neighbor = neighbors[ctx.rng().random_range(0..neighbors.len())];
        visited[neighbor.index()] = true;
        grid.visit(neighbor);
        grid.link(cell, neighbor)?;
        ctx.step(grid)?;
        // Carve the maze in that neighbor's direction
        stack.push(neighbor);
    }
    Ok(())
}
