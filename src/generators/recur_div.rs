use rand::Rng;

use crate::error::GenerationError;
use crate::generators::GenContext;
use crate::maze::{Coord, Grid, Orientation};

/// Recursive division: open the whole grid, then split it with walls that each keep a
/// single passage.
///
/// With a non-zero room probability, small regions may be left undivided as rooms, which
/// makes the maze braided.
pub fn recursive_division(grid: &mut Grid, ctx: &mut GenContext) -> Result<(), GenerationError> {
    // Clear all walls in the maze, except the boundary walls
    grid.link_all();
    ctx.step(grid)?;

    // Start the recursive division
    let (width, height) = (grid.columns(), grid.rows());
    divide(grid, ctx, (0, 0), width, height)
}

fn divide(
    grid: &mut Grid,
    ctx: &mut GenContext,
    top_left: (usize, usize),
    width: usize,
    height: usize,
) -> Result<(), GenerationError> {
    if width == 0 || height == 0 {
        return Err(GenerationError::RegionTooSmall { width, height });
    }
    if width < 2 || height < 2 {
        return Ok(());
    }

    let options = *ctx.options();
    if width < options.room_size
        && height < options.room_size
        && ctx.rng().random_bool(options.room_probability)
    {
        return Ok(());
    }

    let (x, y) = top_left;

    let orientation = match width.cmp(&height) {
        std::cmp::Ordering::Less => Orientation::Horizontal,
        std::cmp::Ordering::Greater => Orientation::Vertical,
        std::cmp::Ordering::Equal => {
            if ctx.rng().random_bool(0.5) {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            }
        }
    };

    match orientation {
        Orientation::Horizontal => {
            // Randomly choose the row the wall goes under
            let diff = ctx.rng().random_range(0..height - 1);
            let y_wall = y + diff;

            // Randomly choose a position for the hole in the wall
            let x_hole = x + ctx.rng().random_range(0..width);

            for cx in (x..x + width).filter(|&cx| cx != x_hole) {
                let above = grid.id(Coord::new(cx, y_wall))?;
                let below = grid.id(Coord::new(cx, y_wall + 1))?;
                grid.unlink(above, below)?;
            }
            ctx.step(grid)?;

            let upper_height = diff + 1;
            let lower_height = height - upper_height;

            // Recursively divide the regions above and below the wall
            divide(grid, ctx, (x, y), width, upper_height)?;
            divide(grid, ctx, (x, y_wall + 1), width, lower_height)
        }
        Orientation::Vertical => {
            // Choose the column the wall goes after
            let diff = ctx.rng().random_range(0..width - 1);
            let x_wall = x + diff;

            // Randomly choose a position for the hole in the wall
            let y_hole = y + ctx.rng().random_range(0..height);

            for cy in (y..y + height).filter(|&cy| cy != y_hole) {
                let left = grid.id(Coord::new(x_wall, cy))?;
                let right = grid.id(Coord::new(x_wall + 1, cy))?;
                grid.unlink(left, right)?;
            }
            ctx.step(grid)?;

            let left_width = diff + 1;
            let right_width = width - left_width;

            // Recursively divide the regions left and right of the wall
            divide(grid, ctx, (x, y), left_width, height)?;
            divide(grid, ctx, (x_wall + 1, y), right_width, height)
        }
    }
}
