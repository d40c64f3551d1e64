use super::{Grid, GridError};
use crate::model::cell::Cell;
use crate::model::position::Position;
use crate::model::terrain::Terrain;
use rand::Rng;

pub const DEFAULT_DIM: usize = 50;
pub const DEFAULT_BLOCKED_DENSITY: f64 = 0.3;

/// Builds grids with a uniform containment prior over every cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBuilder {
    dim: usize,
    blocked_density: f64,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_DIM,
            blocked_density: DEFAULT_BLOCKED_DENSITY,
        }
    }
}

impl GridBuilder {
    pub fn new(dim: usize, blocked_density: f64) -> Result<Self, GridError> {
        if dim == 0 {
            return Err(GridError::Empty);
        }
        if !(0.0..1.0).contains(&blocked_density) {
            return Err(GridError::InvalidDensity {
                density: blocked_density,
            });
        }
        Ok(Self {
            dim,
            blocked_density,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn blocked_density(&self) -> f64 {
        self.blocked_density
    }

    /// Samples terrain per cell: blocked with `blocked_density`, otherwise flat, hilly or
    /// forest with equal odds.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Grid {
        let prior = uniform_prior(self.dim);
        let mut cells = Vec::with_capacity(self.dim * self.dim);
        for y in 0..self.dim {
            for x in 0..self.dim {
                let terrain = if rng.gen_bool(self.blocked_density) {
                    Terrain::Blocked
                } else {
                    Terrain::OPEN[rng.gen_range(0..Terrain::OPEN.len())]
                };
                cells.push(Cell::with_terrain(
                    Position::new(x as i32, y as i32),
                    terrain,
                    prior,
                ));
            }
        }
        Grid::from_cells(self.dim, cells)
    }

    /// Builds a grid from rows of terrain codes, rejecting anything outside 0..=3.
    pub fn from_layout(rows: &[Vec<i32>]) -> Result<Grid, GridError> {
        let dim = rows.len();
        if dim == 0 {
            return Err(GridError::Empty);
        }

        let prior = uniform_prior(dim);
        let mut cells = Vec::with_capacity(dim * dim);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(GridError::NotSquare {
                    row: y,
                    len: row.len(),
                    dim,
                });
            }
            for (x, &code) in row.iter().enumerate() {
                let terrain = Terrain::try_from(code)?;
                cells.push(Cell::with_terrain(
                    Position::new(x as i32, y as i32),
                    terrain,
                    prior,
                ));
            }
        }
        Ok(Grid::from_cells(dim, cells))
    }
}

fn uniform_prior(dim: usize) -> f64 {
    1.0 / (dim * dim) as f64
}
