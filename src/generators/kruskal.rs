use std::{cmp::Reverse, collections::BinaryHeap};

use rand::Rng;

use crate::error::GenerationError;
use crate::generators::GenContext;
use crate::maze::{CellId, Coord, Direction, Grid, Orientation};

/// Disjoint sets over grid positions, with path compression and union by rank.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    /// Merges the sets of `x` and `y`. Returns false if they were already one set.
    fn unite(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return false; // Already in same set
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Greater => {
                self.parent[root_y] = root_x;
            }
            std::cmp::Ordering::Less => {
                self.parent[root_x] = root_y;
            }
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
        true
    }
}

/// Wall between two adjacent cells, with its random processing cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Edge {
    cost: u32,
    cell1: CellId,
    cell2: CellId,
}

/// Randomized Kruskal: walls are removed in random order whenever they separate two
/// different sets.
///
/// With a non-zero weave probability, a pre-pass first tries to place crossings on interior
/// cells, where one corridor passes over the cell and another tunnels beneath it.
pub fn randomized_kruskal(grid: &mut Grid, ctx: &mut GenContext) -> Result<(), GenerationError> {
    let mut sets = UnionFind::new(grid.size());

    // Collect all walls between adjacent cells
    let view: &Grid = grid;
    let pairs = view
        .cells()
        .iter()
        .flat_map(|&cell| {
            [Direction::East, Direction::South]
                .into_iter()
                .filter_map(move |dir| view.neighbor(cell, dir).map(|n| (cell, n)))
        })
        .collect::<Vec<_>>();
    let mut edges = pairs
        .into_iter()
        .map(|(cell1, cell2)| Edge {
            cost: ctx.rng().random(),
            cell1,
            cell2,
        })
        .collect::<Vec<_>>();

    let weave = ctx.options().weave_probability;
    if weave > 0.0 && grid.rows() >= 3 && grid.columns() >= 3 {
        let mut crossed = vec![false; grid.arena_len()];
        for _ in 0..grid.size() {
            ctx.checkpoint()?;
            let x = ctx.rng().random_range(1..grid.columns() - 1);
            let y = ctx.rng().random_range(1..grid.rows() - 1);
            let cell = grid.id(Coord::new(x, y))?;
            if ctx.rng().random_bool(weave) && add_crossing(grid, &mut sets, cell, ctx)? {
                crossed[cell.index()] = true;
                ctx.step(grid)?;
            }
        }
        // Crossings are fully carved, their walls are out of the pool
        edges.retain(|e| !crossed[e.cell1.index()] && !crossed[e.cell2.index()]);
        tracing::debug!(
            crossings = grid.under_cells().len(),
            "weave pass finished"
        );
    }

    let mut heap = edges.into_iter().map(Reverse).collect::<BinaryHeap<_>>();
    while let Some(Reverse(edge)) = heap.pop() {
        ctx.checkpoint()?;
        // If cells are not yet connected, remove the wall between them
        if sets.unite(edge.cell1.index(), edge.cell2.index()) {
            grid.link(edge.cell1, edge.cell2)?;
            grid.visit(edge.cell1);
            grid.visit(edge.cell2);
            ctx.step(grid)?;
        }
    }
    Ok(())
}

/// Turns an unlinked 4-way cell into a crossing if its four neighbors sit in four
/// distinct sets, so neither corridor can close a loop.
fn add_crossing(
    grid: &mut Grid,
    sets: &mut UnionFind,
    cell: CellId,
    ctx: &mut GenContext,
) -> Result<bool, GenerationError> {
    if grid[cell].has_links() || grid[cell].is_orphaned() {
        return Ok(false);
    }
    let [Some(north), Some(south), Some(east), Some(west)] =
        Direction::ALL.map(|dir| grid.neighbor(cell, dir))
    else {
        return Ok(false);
    };

    let roots = [north, south, east, west].map(|id| sets.find(id.index()));
    let distinct = (0..4).all(|i| (i + 1..4).all(|j| roots[i] != roots[j]));
    if !distinct {
        return Ok(false);
    }

    let over = if ctx.rng().random_bool(0.5) {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    };
    let (over_ends, under_ends) = match over {
        Orientation::Horizontal => ([west, east], [north, south]),
        Orientation::Vertical => ([north, south], [west, east]),
    };

    let under = grid.add_under(cell, over.perpendicular())?;
    grid.link(over_ends[0], cell)?;
    grid.link(cell, over_ends[1])?;
    grid.link(under_ends[0], under)?;
    grid.link(under, under_ends[1])?;
    for id in [cell, over_ends[0], over_ends[1], under_ends[0], under_ends[1]] {
        grid.visit(id);
    }

    sets.unite(over_ends[0].index(), cell.index());
    sets.unite(cell.index(), over_ends[1].index());
    sets.unite(under_ends[0].index(), under_ends[1].index());
    Ok(true)
}
