use rand::{Rng, seq::SliceRandom};

use crate::error::GenerationError;
use crate::generators::GenContext;
use crate::maze::{Direction, Grid};

/// Removes dead ends by opening an extra passage from each one with the given probability.
///
/// Dead ends are visited in random order. A dead end prefers to connect to a neighbor that
/// is itself a dead end, which clears two at once. Returns the number of passages added.
pub fn braid(
    grid: &mut Grid,
    probability: f64,
    ctx: &mut GenContext,
) -> Result<usize, GenerationError> {
    let probability = if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    };
    let mut dead_ends = grid.dead_ends();
    dead_ends.shuffle(ctx.rng());

    let mut added = 0;
    for cell in dead_ends {
        ctx.checkpoint()?;
        if !grid[cell].is_dead_end() || !ctx.rng().random_bool(probability) {
            continue;
        }

        let closed = Direction::ALL
            .into_iter()
            .filter(|&dir| !grid[cell].is_linked(dir))
            .filter_map(|dir| grid.passage(cell, dir))
            .collect::<Vec<_>>();
        let preferred = closed
            .iter()
            .copied()
            .filter(|&n| grid[n].is_dead_end())
            .collect::<Vec<_>>();
        let pool = if preferred.is_empty() { closed } else { preferred };
        if pool.is_empty() {
            continue;
        }

        let neighbor = pool[ctx.rng().random_range(0..pool.len())];
        grid.link(cell, neighbor)?;
        added += 1;
        ctx.step(grid)?;
    }
    tracing::debug!(added, "braided maze");
    Ok(added)
}
