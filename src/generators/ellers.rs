use std::collections::BTreeMap;

use rand::{Rng, seq::SliceRandom};

use crate::error::GenerationError;
use crate::generators::GenContext;
use crate::maze::{Coord, Grid};

/// Set membership for the cells of a single row.
///
/// Only one row is tracked at a time. Merging relabels every member of the losing set,
/// which stays cheap because sets never outgrow a row.
struct RowState {
    set_for_column: Vec<Option<usize>>,
    columns_in_set: BTreeMap<usize, Vec<usize>>,
    next_set: usize,
}

impl RowState {
    fn new(columns: usize, next_set: usize) -> Self {
        RowState {
            set_for_column: vec![None; columns],
            columns_in_set: BTreeMap::new(),
            next_set,
        }
    }

    fn record(&mut self, set: usize, column: usize) {
        self.set_for_column[column] = Some(set);
        self.columns_in_set.entry(set).or_default().push(column);
    }

    /// Set of the cell in `column`, opening a fresh set if it has none yet.
    fn set_for(&mut self, column: usize) -> usize {
        match self.set_for_column[column] {
            Some(set) => set,
            None => {
                let set = self.next_set;
                self.next_set += 1;
                self.record(set, column);
                set
            }
        }
    }

    fn merge(&mut self, winner: usize, loser: usize) {
        let moved = self.columns_in_set.remove(&loser).unwrap_or_default();
        for &column in &moved {
            self.set_for_column[column] = Some(winner);
        }
        self.columns_in_set.entry(winner).or_default().extend(moved);
    }

    /// Empty state for the next row, continuing the set numbering.
    fn next(&self) -> RowState {
        RowState::new(self.set_for_column.len(), self.next_set)
    }
}

/// Eller's algorithm: carve row by row, keeping only the current row's sets in memory.
///
/// Adjacent cells in different sets are joined at random (always on the last row), then
/// each set sends at least one passage south so no set is left behind.
pub fn ellers(grid: &mut Grid, ctx: &mut GenContext) -> Result<(), GenerationError> {
    let (rows, columns) = (grid.rows(), grid.columns());
    let mut state = RowState::new(columns, 0);

    for y in 0..rows {
        let last_row = y + 1 == rows;
        for x in 0..columns {
            state.set_for(x);
        }

        for x in 1..columns {
            ctx.checkpoint()?;
            let west_set = state.set_for(x - 1);
            let set = state.set_for(x);
            if west_set != set && (last_row || ctx.rng().random_bool(0.5)) {
                let west = grid.id(Coord::new(x - 1, y))?;
                let cell = grid.id(Coord::new(x, y))?;
                grid.link(west, cell)?;
                grid.visit(west);
                grid.visit(cell);
                ctx.step(grid)?;
                state.merge(west_set, set);
            }
        }

        if last_row {
            break;
        }

        let mut next = state.next();
        for (&set, members) in &state.columns_in_set {
            let mut members = members.clone();
            members.shuffle(ctx.rng());
            let carved = 1 + ctx.rng().random_range(0..members.len());
            for &x in &members[..carved] {
                ctx.checkpoint()?;
                let cell = grid.id(Coord::new(x, y))?;
                let south = grid.id(Coord::new(x, y + 1))?;
                grid.link(cell, south)?;
                grid.visit(cell);
                ctx.step(grid)?;
                next.record(set, x);
            }
        }
        state = next;
    }
    Ok(())
}
