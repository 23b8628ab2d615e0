mod aldous_broder;
mod binary_tree;
mod braid;
mod context;
mod ellers;
mod hunt_and_kill;
mod kruskal;
mod prim;
mod recur_backtrack;
mod recur_div;
mod sidewinder;
mod trivial;
mod wilsons;

use std::collections::BTreeMap;

use aldous_broder::aldous_broder;
use binary_tree::binary_tree;
use ellers::ellers;
use hunt_and_kill::hunt_and_kill;
use kruskal::randomized_kruskal;
use prim::randomized_prim;
use recur_backtrack::recursive_backtrack;
use recur_div::recursive_division;
use sidewinder::sidewinder;
use trivial::{empty, full};
use wilsons::wilsons;

pub use braid::braid;
pub use context::{CancelToken, GenContext, GenOptions, Snapshot};

use crate::error::{GenerationError, LookupError};
use crate::maze::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    AldousBroder,
    Wilsons,
    HuntAndKill,
    RecurBacktrack,
    Kruskal,
    Prim,
    Ellers,
    RecurDiv,
    BinaryTree,
    Sidewinder,
    /// Every neighbor linked, no walls inside the grid
    Empty,
    /// No passages at all
    Full,
}

impl Generator {
    pub const ALL: [Generator; 12] = [
        Generator::AldousBroder,
        Generator::Wilsons,
        Generator::HuntAndKill,
        Generator::RecurBacktrack,
        Generator::Kruskal,
        Generator::Prim,
        Generator::Ellers,
        Generator::RecurDiv,
        Generator::BinaryTree,
        Generator::Sidewinder,
        Generator::Empty,
        Generator::Full,
    ];

    /// Name the generator is registered under.
    pub const fn name(self) -> &'static str {
        match self {
            Generator::AldousBroder => "aldous-broder",
            Generator::Wilsons => "wilsons",
            Generator::HuntAndKill => "hunt-and-kill",
            Generator::RecurBacktrack => "recursive-backtracker",
            Generator::Kruskal => "kruskal",
            Generator::Prim => "prim",
            Generator::Ellers => "ellers",
            Generator::RecurDiv => "recursive-division",
            Generator::BinaryTree => "binary-tree",
            Generator::Sidewinder => "sidewinder",
            Generator::Empty => "empty",
            Generator::Full => "full",
        }
    }

    /// Whether the result should pass the structural check. `Full` leaves every cell
    /// without passages on purpose.
    pub const fn checks_structure(self) -> bool {
        !matches!(self, Generator::Full)
    }

    /// Row-oriented algorithms rely on every grid position being playable.
    pub const fn needs_full_rectangle(self) -> bool {
        matches!(
            self,
            Generator::Ellers | Generator::RecurDiv | Generator::BinaryTree | Generator::Sidewinder
        )
    }

    /// Whether a run without weaving, braiding or rooms yields a spanning tree.
    pub const fn is_perfect(self) -> bool {
        !matches!(self, Generator::Empty | Generator::Full)
    }
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::AldousBroder => write!(f, "Aldous-Broder Algorithm"),
            Generator::Wilsons => write!(f, "Wilson's Algorithm"),
            Generator::HuntAndKill => write!(f, "Hunt-and-Kill"),
            Generator::RecurBacktrack => write!(f, "Recursive Backtracker"),
            Generator::Kruskal => write!(f, "Kruskal's Algorithm"),
            Generator::Prim => write!(f, "Prim's Algorithm"),
            Generator::Ellers => write!(f, "Eller's Algorithm"),
            Generator::RecurDiv => write!(f, "Recursive Division"),
            Generator::BinaryTree => write!(f, "Binary Tree"),
            Generator::Sidewinder => write!(f, "Sidewinder"),
            Generator::Empty => write!(f, "Empty Grid"),
            Generator::Full => write!(f, "Full Grid"),
        }
    }
}

/// Name to generator lookup. Built once and handed to whoever needs it.
#[derive(Debug, Clone)]
pub struct Registry {
    generators: BTreeMap<String, Generator>,
}

impl Default for Registry {
    /// A registry holding every generator under its own name.
    fn default() -> Self {
        let mut registry = Registry::empty();
        for generator in Generator::ALL {
            registry.register(generator.name(), generator);
        }
        registry
    }
}

impl Registry {
    pub fn empty() -> Self {
        Registry {
            generators: BTreeMap::new(),
        }
    }

    /// Registers `generator` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, generator: Generator) {
        self.generators.insert(name.into(), generator);
    }

    pub fn lookup(&self, name: &str) -> Result<Generator, LookupError> {
        self.generators
            .get(name)
            .copied()
            .ok_or_else(|| LookupError::UnknownAlgorithm(name.to_string()))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }
}

/// Carves `grid` with `generator`, starting from a grid with no links.
///
/// On error the grid is left partially carved and must be regenerated before use.
pub fn generate_maze(
    grid: &mut Grid,
    generator: Generator,
    ctx: &mut GenContext,
) -> Result<(), GenerationError> {
    ctx.checkpoint()?;
    grid.clear_links();

    if grid.cells().is_empty() {
        return Err(GenerationError::NoCells);
    }
    if !grid.is_structurally_connected() {
        return Err(GenerationError::DisconnectedGrid);
    }
    if generator.needs_full_rectangle() && !grid.orphans().is_empty() {
        return Err(GenerationError::UnsupportedShape {
            algorithm: generator.name(),
            orphans: grid.orphans().len(),
        });
    }

    tracing::debug!(
        algorithm = generator.name(),
        rows = grid.rows(),
        columns = grid.columns(),
        "generating maze"
    );
    match generator {
        Generator::AldousBroder => aldous_broder(grid, ctx),
        Generator::Wilsons => wilsons(grid, ctx),
        Generator::HuntAndKill => hunt_and_kill(grid, ctx),
        Generator::RecurBacktrack => recursive_backtrack(grid, ctx),
        Generator::Kruskal => randomized_kruskal(grid, ctx),
        Generator::Prim => randomized_prim(grid, ctx),
        Generator::Ellers => ellers(grid, ctx),
        Generator::RecurDiv => recursive_division(grid, ctx),
        Generator::BinaryTree => binary_tree(grid, ctx),
        Generator::Sidewinder => sidewinder(grid, ctx),
        Generator::Empty => empty(grid, ctx),
        Generator::Full => full(grid, ctx),
    }?;
    ctx.publish(grid)?;
    tracing::debug!(
        algorithm = generator.name(),
        links = grid.link_count(),
        "maze generated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Coord;
    use crate::validator::{check_grid, is_spanning_tree};
    use std::sync::mpsc;
    use std::thread;

    fn generate(generator: Generator, rows: usize, columns: usize, seed: u64) -> Grid {
        let mut grid = Grid::new(rows, columns, &[]).unwrap();
        let mut ctx = GenContext::new(Some(seed));
        generate_maze(&mut grid, generator, &mut ctx).unwrap();
        grid
    }

    #[test]
    fn test_registry_lookup() {
        let registry = Registry::default();
        assert_eq!(registry.lookup("wilsons"), Ok(Generator::Wilsons));
        assert_eq!(
            registry.lookup("recursive-backtracker"),
            Ok(Generator::RecurBacktrack)
        );
        assert_eq!(
            registry.lookup("bogus"),
            Err(LookupError::UnknownAlgorithm(String::from("bogus")))
        );
        assert_eq!(registry.names().count(), Generator::ALL.len());
    }

    #[test]
    fn test_registry_custom_alias() {
        let mut registry = Registry::empty();
        assert!(registry.lookup("kruskal").is_err());
        registry.register("weave", Generator::Kruskal);
        assert_eq!(registry.lookup("weave"), Ok(Generator::Kruskal));
    }

    #[test]
    fn test_perfect_generators_build_spanning_trees() {
        for generator in Generator::ALL.into_iter().filter(|g| g.is_perfect()) {
            for (rows, columns) in [(1, 1), (1, 7), (6, 1), (5, 8), (9, 9)] {
                let grid = generate(generator, rows, columns, 42);
                assert_eq!(
                    grid.link_count(),
                    rows * columns - 1,
                    "{generator} on {rows}x{columns}"
                );
                assert!(is_spanning_tree(&grid), "{generator} on {rows}x{columns}");
            }
            let grid = generate(generator, 7, 5, 3);
            assert_eq!(check_grid(&grid), Ok(()), "{generator}");
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        for generator in Generator::ALL {
            let a = generate(generator, 8, 8, 99);
            let b = generate(generator, 8, 8, 99);
            assert_eq!(a, b, "{generator}");
        }
    }

    #[test]
    fn test_cancelled_token_stops_every_generator() {
        for generator in Generator::ALL {
            let mut grid = Grid::new(10, 10, &[]).unwrap();
            let token = CancelToken::new();
            token.cancel();
            let mut ctx = GenContext::new(Some(1)).with_cancel(token);
            assert_eq!(
                generate_maze(&mut grid, generator, &mut ctx),
                Err(GenerationError::StopRequested),
                "{generator}"
            );
        }
    }

    #[test]
    fn test_cancel_mid_run_stops_every_generator() {
        for generator in Generator::ALL {
            // The trivial generators only publish twice
            let cancel_after = match generator {
                Generator::Empty | Generator::Full => 1,
                _ => 3,
            };
            let token = CancelToken::new();
            let (snapshot_tx, snapshot_rx) = mpsc::sync_channel::<Snapshot>(0);
            let consumer_token = token.clone();
            let consumer = thread::spawn(move || {
                let seen = snapshot_rx.iter().take(cancel_after).count();
                consumer_token.cancel();
                // Hand the receiver back so the channel stays open but undrained
                (seen, snapshot_rx)
            });

            let mut grid = Grid::new(12, 12, &[]).unwrap();
            let mut ctx = GenContext::new(Some(1))
                .with_cancel(token)
                .with_publisher(snapshot_tx);
            assert_eq!(
                generate_maze(&mut grid, generator, &mut ctx),
                Err(GenerationError::StopRequested),
                "{generator}"
            );
            let (seen, _snapshot_rx) = consumer.join().unwrap();
            assert_eq!(seen, cancel_after, "{generator}");
        }
    }

    #[test]
    fn test_row_generators_reject_orphans() {
        for generator in Generator::ALL.into_iter().filter(|g| g.needs_full_rectangle()) {
            let mut grid = Grid::new(4, 4, &[Coord::new(0, 0)]).unwrap();
            let mut ctx = GenContext::new(Some(1));
            assert!(matches!(
                generate_maze(&mut grid, generator, &mut ctx),
                Err(GenerationError::UnsupportedShape { orphans: 1, .. })
            ));
        }
    }

    #[test]
    fn test_walk_generators_handle_orphans() {
        let mask = [Coord::new(1, 1), Coord::new(2, 1), Coord::new(0, 3)];
        for generator in [
            Generator::AldousBroder,
            Generator::Wilsons,
            Generator::HuntAndKill,
            Generator::RecurBacktrack,
            Generator::Kruskal,
            Generator::Prim,
        ] {
            let mut grid = Grid::new(4, 4, &mask).unwrap();
            let mut ctx = GenContext::new(Some(5));
            generate_maze(&mut grid, generator, &mut ctx).unwrap();
            assert_eq!(grid.link_count(), 16 - mask.len() - 1, "{generator}");
            assert!(grid.is_connected(), "{generator}");
            for &orphan in grid.orphans() {
                assert!(!grid[orphan].has_links());
            }
        }
    }

    #[test]
    fn test_disconnected_mask_is_rejected() {
        // Column 1 cuts the grid in two
        let mask = [Coord::new(1, 0), Coord::new(1, 1), Coord::new(1, 2)];
        let mut grid = Grid::new(3, 3, &mask).unwrap();
        let mut ctx = GenContext::new(Some(1));
        assert_eq!(
            generate_maze(&mut grid, Generator::AldousBroder, &mut ctx),
            Err(GenerationError::DisconnectedGrid)
        );
    }

    #[test]
    fn test_regeneration_starts_from_scratch() {
        let mut grid = Grid::new(5, 5, &[]).unwrap();
        let mut ctx = GenContext::new(Some(11));
        generate_maze(&mut grid, Generator::Empty, &mut ctx).unwrap();
        generate_maze(&mut grid, Generator::Prim, &mut ctx).unwrap();
        assert_eq!(grid.link_count(), 24);
        assert!(is_spanning_tree(&grid));
    }
}
