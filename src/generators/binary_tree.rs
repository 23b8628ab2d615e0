use rand::Rng;

use crate::error::GenerationError;
use crate::generators::GenContext;
use crate::maze::{Direction, Grid};

/// Links every cell to its north or east neighbor, picked at random among those that exist.
pub fn binary_tree(grid: &mut Grid, ctx: &mut GenContext) -> Result<(), GenerationError> {
    for cell in grid.cells().to_vec() {
        ctx.checkpoint()?;
        grid.visit(cell);
        let candidates = [Direction::North, Direction::East]
            .into_iter()
            .filter_map(|dir| grid.neighbor(cell, dir))
            .collect::<Vec<_>>();
        if candidates.is_empty() {
            // North-east corner
            continue;
        }
        let neighbor = candidates[ctx.rng().random_range(0..candidates.len())];
        grid.link(cell, neighbor)?;
        ctx.step(grid)?;
    }
    Ok(())
}
