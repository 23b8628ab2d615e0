use rand::Rng;

use crate::error::GenerationError;
use crate::generators::GenContext;
use crate::maze::{CellId, Grid};

/// Random walk into unvisited cells until stuck, then hunt row by row for an unvisited
/// cell bordering the maze and resume from there.
pub fn hunt_and_kill(grid: &mut Grid, ctx: &mut GenContext) -> Result<(), GenerationError> {
    let mut visited = vec![false; grid.arena_len()];
    let start = grid.random_cell(ctx.rng());
    visited[start.index()] = true;
    grid.visit(start);

    let mut current = Some(start);
    while let Some(cell) = current {
        ctx.checkpoint()?;
        let unvisited = grid
            .neighbors(cell)
            .filter(|n| !visited[n.index()])
            .collect::<Vec<_>>();

        if !unvisited.is_empty() {
            let next = unvisited[ctx.rng().random_range(0..unvisited.len())];
            grid.link(cell, next)?;
            visited[next.index()] = true;
            grid.visit(next);
            ctx.step(grid)?;
            current = Some(next);
            continue;
        }

        current = None;
        if let Some((target, visited_neighbors)) = hunt(grid, &visited) {
            let neighbor = visited_neighbors[ctx.rng().random_range(0..visited_neighbors.len())];
            grid.link(target, neighbor)?;
            visited[target.index()] = true;
            grid.visit(target);
            ctx.step(grid)?;
            current = Some(target);
        }
    }
    Ok(())
}

/// First unvisited cell in row-major order with at least one visited neighbor.
fn hunt(grid: &Grid, visited: &[bool]) -> Option<(CellId, Vec<CellId>)> {
    grid.cells()
        .iter()
        .copied()
        .filter(|id| !visited[id.index()])
        .find_map(|id| {
            let visited_neighbors = grid
                .neighbors(id)
                .filter(|n| visited[n.index()])
                .collect::<Vec<_>>();
            (!visited_neighbors.is_empty()).then_some((id, visited_neighbors))
        })
}
