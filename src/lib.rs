//! Maze graph engine: grids of linked cells, generation algorithms, distance queries, a
//! structural validator and a compact text codec.

pub mod codec;
pub mod config;
pub mod error;
pub mod generators;
pub mod maze;
pub mod solvers;
pub mod validator;

pub use config::MazeConfig;
pub use error::{CodecError, ConfigError, GenerationError, LookupError, MazeError, ValidationError};
pub use generators::{CancelToken, GenContext, Generator, Registry};
pub use maze::{Cell, CellId, Coord, Direction, Grid};

/// Builds a maze end to end: grid shape, generation, optional braiding and the structural
/// check.
pub fn build_maze(
    config: &MazeConfig,
    registry: &Registry,
    cancel: CancelToken,
) -> Result<Grid, MazeError> {
    let mut ctx = GenContext::new(config.seed)
        .with_cancel(cancel)
        .with_options(config.generation_options());
    build_maze_with(config, registry, &mut ctx)
}

/// Same as [`build_maze`], with a caller-supplied context, e.g. one publishing snapshots.
pub fn build_maze_with(
    config: &MazeConfig,
    registry: &Registry,
    ctx: &mut GenContext,
) -> Result<Grid, MazeError> {
    let mut grid = Grid::from_config(config)?;
    let generator = registry.lookup(&config.algorithm)?;
    generators::generate_maze(&mut grid, generator, ctx)?;

    if config.braid_probability > 0.0 {
        generators::braid(&mut grid, config.braid_probability, ctx)?;
    }

    if config.skip_grid_check || !generator.checks_structure() {
        tracing::debug!(algorithm = generator.name(), "skipping structural check");
    } else {
        validator::check_grid(&grid)?;
    }
    tracing::info!(
        algorithm = generator.name(),
        rows = grid.rows(),
        columns = grid.columns(),
        links = grid.link_count(),
        dead_ends = grid.dead_ends().len(),
        "maze built"
    );
    Ok(grid)
}
