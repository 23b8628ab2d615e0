use std::{cmp::Reverse, collections::BinaryHeap};

use rand::Rng;

use crate::error::GenerationError;
use crate::generators::GenContext;
use crate::maze::{CellId, Grid};

/// Weighted Prim: every cell gets a random weight, and the maze always grows from the
/// lightest active cell towards its lightest unvisited neighbor.
pub fn randomized_prim(grid: &mut Grid, ctx: &mut GenContext) -> Result<(), GenerationError> {
    for id in grid.cells().to_vec() {
        let weight = ctx.rng().random();
        grid.set_weight(id, weight);
    }

    let mut in_maze = vec![false; grid.arena_len()];
    let start = grid.random_cell(ctx.rng());
    in_maze[start.index()] = true;
    grid.visit(start);

    // Min-heaps keyed by weight, ties broken by cell id
    let mut active: BinaryHeap<Reverse<(u32, CellId)>> =
        BinaryHeap::from([Reverse((grid[start].weight(), start))]);

    while let Some(&Reverse((_, cell))) = active.peek() {
        ctx.checkpoint()?;
        let available = grid
            .neighbors(cell)
            .filter(|n| !in_maze[n.index()])
            .map(|n| Reverse((grid[n].weight(), n)))
            .collect::<BinaryHeap<_>>();

        match available.peek() {
            Some(&Reverse((weight, neighbor))) => {
                grid.link(cell, neighbor)?;
                in_maze[neighbor.index()] = true;
                grid.visit(neighbor);
                ctx.step(grid)?;
                active.push(Reverse((weight, neighbor)));
            }
            None => {
                // Fully surrounded by the maze, nothing left to grow from here
                active.pop();
            }
        }
    }
    Ok(())
}
