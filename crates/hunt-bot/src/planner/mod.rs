mod astar;
mod distance;

pub use astar::{AStarPlanner, Plan, PlanStats};
pub use distance::reachable_distances;

use hunt_core::model::cell::Cell;

/// Freespace assumption: anything not yet seen blocked is treated as walkable.
pub fn believed_passable(cell: &Cell) -> bool {
    !cell.is_visited() || cell.terrain().is_passable()
}
