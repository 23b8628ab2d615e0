use rand::Rng;

use crate::error::GenerationError;
use crate::generators::GenContext;
use crate::maze::Grid;

/// Uniform spanning tree by loop-erased random walks.
///
/// Each walk starts on a cell outside the maze and wanders until it hits the maze. Whenever
/// the walk crosses itself the loop is erased, so the committed path is always simple.
pub fn wilsons(grid: &mut Grid, ctx: &mut GenContext) -> Result<(), GenerationError> {
    let mut in_maze = vec![false; grid.arena_len()];
    // Index of each cell in the current walk
    let mut position: Vec<Option<usize>> = vec![None; grid.arena_len()];

    let first = grid.random_cell(ctx.rng());
    in_maze[first.index()] = true;
    grid.visit(first);

    let mut pending = grid
        .cells()
        .iter()
        .copied()
        .filter(|&id| id != first)
        .collect::<Vec<_>>();

    while !pending.is_empty() {
        let idx = ctx.rng().random_range(0..pending.len());
        let start = pending[idx];
        if in_maze[start.index()] {
            pending.swap_remove(idx);
            continue;
        }

        let mut walk = vec![start];
        position[start.index()] = Some(0);
        let mut current = start;
        while !in_maze[current.index()] {
            ctx.checkpoint()?;
            let neighbors = grid.neighbors(current).collect::<Vec<_>>();
            let next = neighbors[ctx.rng().random_range(0..neighbors.len())];
            grid.visit(next);
            match position[next.index()] {
                Some(at) => {
                    for erased in walk.drain(at + 1..) {
                        position[erased.index()] = None;
                    }
                }
                None => {
                    position[next.index()] = Some(walk.len());
                    walk.push(next);
                }
            }
            current = next;
        }

        for pair in walk.windows(2) {
            grid.link(pair[0], pair[1])?;
            ctx.step(grid)?;
        }
        for id in walk {
            position[id.index()] = None;
            in_maze[id.index()] = true;
        }
        pending.swap_remove(idx);
    }
    Ok(())
}
