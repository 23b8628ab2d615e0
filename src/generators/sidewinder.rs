use rand::Rng;

use crate::error::GenerationError;
use crate::generators::GenContext;
use crate::maze::{Coord, Direction, Grid};

/// Sidewinder: grows horizontal runs west to east, closing each run by opening north from
/// one of its cells.
///
/// Runs on the northern row never close, runs at the eastern edge always do.
pub fn sidewinder(grid: &mut Grid, ctx: &mut GenContext) -> Result<(), GenerationError> {
    let (rows, columns) = (grid.rows(), grid.columns());
    for y in 0..rows {
        let mut run = Vec::new();
        for x in 0..columns {
            ctx.checkpoint()?;
            let cell = grid.id(Coord::new(x, y))?;
            grid.visit(cell);
            run.push(cell);

            let at_eastern_edge = x + 1 == columns;
            let at_northern_edge = y == 0;
            let close_out = at_eastern_edge || (!at_northern_edge && ctx.rng().random_bool(0.5));

            if close_out {
                let member = run[ctx.rng().random_range(0..run.len())];
                if let Some(north) = grid.neighbor(member, Direction::North) {
                    grid.link(member, north)?;
                    ctx.step(grid)?;
                }
                run.clear();
            } else if let Some(east) = grid.neighbor(cell, Direction::East) {
                grid.link(cell, east)?;
                ctx.step(grid)?;
            }
        }
    }
    Ok(())
}
