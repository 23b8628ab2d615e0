use crate::error::GenerationError;
use crate::generators::GenContext;
use crate::maze::Grid;

/// Opens every passage.
pub fn empty(grid: &mut Grid, ctx: &mut GenContext) -> Result<(), GenerationError> {
    grid.link_all();
    for cell in grid.cells().to_vec() {
        grid.visit(cell);
    }
    ctx.step(grid)
}

/// Leaves every wall standing.
pub fn full(grid: &mut Grid, ctx: &mut GenContext) -> Result<(), GenerationError> {
    ctx.step(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_full() {
        let mut grid = Grid::new(3, 4, &[]).unwrap();
        let mut ctx = GenContext::new(Some(0));
        empty(&mut grid, &mut ctx).unwrap();
        // 3 rows of 3 horizontal links, 2 rows of 4 vertical links
        assert_eq!(grid.link_count(), 17);

        grid.clear_links();
        full(&mut grid, &mut ctx).unwrap();
        assert_eq!(grid.link_count(), 0);
    }
}
