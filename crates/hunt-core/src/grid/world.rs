use super::{Grid, GridBuilder, GridError};
use crate::model::cell::{Cell, CellId};
use rand::Rng;

const MAX_GENERATION_ATTEMPTS: usize = 1_000;

/// Ground truth for one hunt: the agent's grid plus where it starts and where the target hides.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    grid: Grid,
    start: CellId,
    target: CellId,
}

impl World {
    pub fn new(grid: Grid, start: CellId, target: CellId) -> Result<Self, GridError> {
        for id in [start, target] {
            if grid.get(id).is_none() {
                return Err(GridError::UnknownCell { id });
            }
        }
        let start_cell = grid.cell(start);
        if !start_cell.terrain().is_passable() {
            return Err(GridError::BlockedStart {
                position: start_cell.position(),
            });
        }
        let target_cell = grid.cell(target);
        if !target_cell.terrain().is_passable() {
            return Err(GridError::BlockedTarget {
                position: target_cell.position(),
            });
        }
        Ok(Self {
            grid,
            start,
            target,
        })
    }

    /// Samples grids until a random open start can reach a random open target.
    pub fn generate<R: Rng + ?Sized>(builder: &GridBuilder, rng: &mut R) -> Result<Self, GridError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let grid = builder.build(rng);
            let open: Vec<CellId> = grid
                .iter()
                .filter(|(_, cell)| cell.terrain().is_passable())
                .map(|(id, _)| id)
                .collect();
            if open.is_empty() {
                continue;
            }

            let start = open[rng.gen_range(0..open.len())];
            let target = open[rng.gen_range(0..open.len())];
            if grid.connected(start, target, |cell: &Cell| cell.terrain().is_passable()) {
                return Ok(Self {
                    grid,
                    start,
                    target,
                });
            }
        }

        Err(GridError::NoConnectedWorld {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn start(&self) -> CellId {
        self.start
    }

    pub fn target(&self) -> CellId {
        self.target
    }

    /// Searches `id` once. Succeeds only on the target cell, and only when the terrain's
    /// false-negative draw does not hide it.
    pub fn examine<R: Rng + ?Sized>(&self, id: CellId, rng: &mut R) -> bool {
        if id != self.target {
            return false;
        }
        let miss_rate = self.grid.cell(id).terrain().false_negative_rate();
        rng.gen_range(0.0..1.0) >= miss_rate
    }
}
