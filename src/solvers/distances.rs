use std::{cell::OnceCell, collections::HashMap};

use crate::maze::{CellId, Grid};
use crate::solvers::Path;

/// Breadth-first distances from a root cell, following passages only.
///
/// Ties in [`Distances::furthest_cell`] and [`Distances::path_to`] are broken by arena order
/// (row-major, tunnel cells last) and by the fixed north, south, east, west neighbor order.
#[derive(Debug, Clone)]
pub struct Distances {
    root: CellId,
    distances: Vec<Option<usize>>,
    /// Grid link version the field was computed against
    version: u64,
    furthest: OnceCell<(CellId, usize)>,
}

impl Distances {
    pub fn new(grid: &Grid, root: CellId) -> Self {
        let mut distances = vec![None; grid.arena_len()];
        // A root outside the arena reaches nothing
        let mut frontier = match distances.get_mut(root.index()) {
            Some(slot) => {
                *slot = Some(0);
                vec![root]
            }
            None => Vec::new(),
        };
        let mut distance = 0;
        while !frontier.is_empty() {
            distance += 1;
            let mut next_frontier = Vec::new();
            for &cell in &frontier {
                for linked in grid.links(cell) {
                    if distances[linked.index()].is_none() {
                        distances[linked.index()] = Some(distance);
                        next_frontier.push(linked);
                    }
                }
            }
            frontier = next_frontier;
        }

        Distances {
            root,
            distances,
            version: grid.version(),
            furthest: OnceCell::new(),
        }
    }

    pub fn root(&self) -> CellId {
        self.root
    }

    /// Distance from the root, `None` when `cell` cannot be reached.
    pub fn get(&self, cell: CellId) -> Option<usize> {
        self.distances.get(cell.index()).copied().flatten()
    }

    /// Whether the grid's links changed since this field was computed.
    pub fn is_stale(&self, grid: &Grid) -> bool {
        self.version != grid.version()
    }

    /// Every reachable cell with its distance, in arena order.
    pub fn reachable(&self) -> impl Iterator<Item = (CellId, usize)> + '_ {
        self.distances
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.map(|d| (CellId(i), d)))
    }

    /// The reachable cell furthest from the root, computed once.
    pub fn furthest_cell(&self) -> (CellId, usize) {
        *self.furthest.get_or_init(|| {
            self.reachable()
                .fold((self.root, 0), |best, (cell, d)| {
                    if d > best.1 { (cell, d) } else { best }
                })
        })
    }

    /// Shortest path from the root to `goal`, found by stepping back to ever closer linked
    /// neighbors.
    pub fn path_to(&self, grid: &Grid, goal: CellId) -> Option<Path> {
        let mut current = goal;
        let mut distance = self.get(goal)?;
        let mut trail = vec![goal];
        while current != self.root {
            let (d, next) = grid
                .links(current)
                .filter_map(|n| self.get(n).map(|d| (d, n)))
                .filter(|&(d, _)| d < distance)
                .min_by_key(|&(d, _)| d)?;
            trail.push(next);
            distance = d;
            current = next;
        }

        let mut path = Path::new();
        for cell in trail.into_iter().rev() {
            path.push(grid, cell).ok()?;
        }
        Some(path)
    }
}

/// Distance fields of one grid, keyed by root.
///
/// Every field is dropped as soon as the grid's links change.
#[derive(Debug, Default)]
pub struct DistanceCache {
    version: Option<u64>,
    fields: HashMap<CellId, Distances>,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distances from `root`, computed on first request.
    pub fn distances(&mut self, grid: &Grid, root: CellId) -> &Distances {
        if self.version != Some(grid.version()) {
            self.fields.clear();
            self.version = Some(grid.version());
        }
        self.fields
            .entry(root)
            .or_insert_with(|| Distances::new(grid, root))
    }

    pub fn shortest_path(&mut self, grid: &Grid, from: CellId, to: CellId) -> Option<Path> {
        self.distances(grid, from).path_to(grid, to)
    }

    /// Number of cached fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
