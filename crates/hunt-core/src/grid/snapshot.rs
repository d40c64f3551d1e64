use super::{GridBuilder, GridError, World};
use crate::model::position::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridSnapshot {
    pub dim: usize,
    pub terrain: Vec<Vec<u8>>,
    pub start: Position,
    pub target: Position,
}

impl GridSnapshot {
    /// Captures the layout and ground truth. Beliefs and planning state are not kept.
    pub fn capture(world: &World) -> Self {
        let grid = world.grid();
        let dim = grid.dim();
        let mut terrain = vec![Vec::with_capacity(dim); dim];
        for (_, cell) in grid.iter() {
            terrain[cell.position().y as usize].push(cell.terrain().code());
        }

        Self {
            dim,
            terrain,
            start: grid.cell(world.start()).position(),
            target: grid.cell(world.target()).position(),
        }
    }

    pub fn restore(&self) -> Result<World, GridError> {
        if self.terrain.len() != self.dim {
            return Err(GridError::RowCount {
                rows: self.terrain.len(),
                dim: self.dim,
            });
        }
        let rows: Vec<Vec<i32>> = self
            .terrain
            .iter()
            .map(|row| row.iter().map(|&code| i32::from(code)).collect())
            .collect();
        let grid = GridBuilder::from_layout(&rows)?;

        let start = grid
            .id_of(self.start)
            .ok_or(GridError::OutOfBounds {
                position: self.start,
            })?;
        let target = grid
            .id_of(self.target)
            .ok_or(GridError::OutOfBounds {
                position: self.target,
            })?;
        World::new(grid, start, target)
    }

    pub fn to_json(world: &World) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&Self::capture(world))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
