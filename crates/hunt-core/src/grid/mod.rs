//! Arena of cells addressed by [`CellId`].
//!
//! - `builder`: random and layout-driven grid construction.
//! - `world`: ground truth (start, hidden target) for a simulated hunt.
//! - `snapshot`: JSON capture/restore of a world.

mod builder;
mod snapshot;
mod world;

pub use builder::GridBuilder;
pub use snapshot::GridSnapshot;
pub use world::World;

use crate::model::cell::{Cell, CellId};
use crate::model::position::Position;
use crate::model::terrain::TerrainError;
use std::collections::VecDeque;
use std::fmt;

/// Square grid stored row-major; `CellId(y * dim + x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    dim: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub(crate) fn from_cells(dim: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), dim * dim);
        Self { dim, cells }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn id_of(&self, position: Position) -> Option<CellId> {
        let dim = self.dim as i64;
        let (x, y) = (position.x as i64, position.y as i64);
        if x < 0 || y < 0 || x >= dim || y >= dim {
            return None;
        }
        Some(CellId((y * dim + x) as usize))
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index())
    }

    /// Panics when `id` does not belong to this grid.
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    pub fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.index()]
    }

    pub fn cell_at(&self, position: Position) -> Option<&Cell> {
        self.id_of(position).map(|id| self.cell(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = CellId> + use<> {
        (0..self.cells.len()).map(CellId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| (CellId(index), cell))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (CellId, &mut Cell)> {
        self.cells
            .iter_mut()
            .enumerate()
            .map(|(index, cell)| (CellId(index), cell))
    }

    /// In-bounds 4-connected neighbours of `id`.
    pub fn neighbors(&self, id: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.cell(id)
            .position()
            .cardinal_neighbors()
            .into_iter()
            .filter_map(|position| self.id_of(position))
    }

    /// Clears cost, heuristic and predecessor on every cell before a new planning pass.
    pub fn reset_planning(&mut self) {
        for cell in &mut self.cells {
            cell.reset_planning();
        }
    }

    /// Walks predecessor links from `id` back to a root and returns the path root-first.
    pub fn path_to(&self, id: CellId) -> Result<Vec<CellId>, GridError> {
        if self.get(id).is_none() {
            return Err(GridError::UnknownCell { id });
        }

        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.cell(current).predecessor() {
            if self.get(parent).is_none() {
                return Err(GridError::UnknownCell { id: parent });
            }
            if path.len() > self.cells.len() {
                return Err(GridError::PredecessorCycle { start: id });
            }
            path.push(parent);
            current = parent;
        }
        path.reverse();
        Ok(path)
    }

    /// Sum of containment beliefs; stays at 1.0 while updates are normalised.
    pub fn total_belief(&self) -> f64 {
        self.cells.iter().map(Cell::prob_contain).sum()
    }

    /// Breadth-first reachability through cells accepted by `passable`.
    pub fn connected<F>(&self, from: CellId, to: CellId, passable: F) -> bool
    where
        F: Fn(&Cell) -> bool,
    {
        if from == to {
            return true;
        }
        if !passable(self.cell(from)) || !passable(self.cell(to)) {
            return false;
        }

        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::from([from]);
        seen[from.index()] = true;
        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if seen[next.index()] || !passable(self.cell(next)) {
                    continue;
                }
                if next == to {
                    return true;
                }
                seen[next.index()] = true;
                queue.push_back(next);
            }
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    Empty,
    NotSquare { row: usize, len: usize, dim: usize },
    RowCount { rows: usize, dim: usize },
    InvalidDensity { density: f64 },
    Terrain(TerrainError),
    UnknownCell { id: CellId },
    OutOfBounds { position: Position },
    BlockedStart { position: Position },
    BlockedTarget { position: Position },
    PredecessorCycle { start: CellId },
    NoConnectedWorld { attempts: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::Empty => write!(f, "grid must contain at least one cell"),
            GridError::NotSquare { row, len, dim } => {
                write!(f, "row {row} has {len} cells, expected {dim}")
            }
            GridError::RowCount { rows, dim } => {
                write!(f, "grid has {rows} rows, expected {dim}")
            }
            GridError::InvalidDensity { density } => {
                write!(f, "blocked density {density} must lie in [0, 1)")
            }
            GridError::Terrain(err) => write!(f, "{err}"),
            GridError::UnknownCell { id } => write!(f, "cell {id} is not part of the grid"),
            GridError::OutOfBounds { position } => {
                write!(f, "position {position} lies outside the grid")
            }
            GridError::BlockedStart { position } => {
                write!(f, "start at {position} sits on a blocked cell")
            }
            GridError::BlockedTarget { position } => {
                write!(f, "target at {position} sits on a blocked cell")
            }
            GridError::PredecessorCycle { start } => {
                write!(f, "predecessor links from {start} form a cycle")
            }
            GridError::NoConnectedWorld { attempts } => write!(
                f,
                "no world with connected start and target after {attempts} attempts"
            ),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GridError::Terrain(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TerrainError> for GridError {
    fn from(err: TerrainError) -> Self {
        GridError::Terrain(err)
    }
}
