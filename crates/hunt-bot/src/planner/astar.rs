use super::believed_passable;
use hunt_core::grid::Grid;
use hunt_core::model::cell::CellId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Unit step cost between 4-connected cells.
const STEP_COST: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanStats {
    pub expanded: usize,
    pub path_len: usize,
}

/// A planned route, origin first and destination last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub path: Vec<CellId>,
    pub stats: PlanStats,
}

impl Plan {
    pub fn destination(&self) -> Option<CellId> {
        self.path.last().copied()
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f64,
    g: f64,
    id: CellId,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap: smaller f wins, then larger g, then smaller id.
impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| self.g.total_cmp(&other.g))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// A* over the agent's current knowledge of the grid.
///
/// Each call starts a fresh planning pass: the planning half of every cell is reset, then
/// cost-so-far, heuristic and predecessor are written as edges are relaxed.
#[derive(Debug, Default, Clone, Copy)]
pub struct AStarPlanner;

impl AStarPlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn plan(&self, grid: &mut Grid, start: CellId, goal: CellId) -> Option<Plan> {
        grid.reset_planning();
        if !believed_passable(grid.cell(goal)) {
            return None;
        }

        let goal_position = grid.cell(goal).position();
        let heuristic = |grid: &Grid, id: CellId| {
            f64::from(grid.cell(id).position().manhattan_distance(goal_position))
        };

        let mut discovered = vec![false; grid.len()];
        let mut closed = vec![false; grid.len()];
        let mut open = BinaryHeap::new();
        let mut expanded = 0usize;

        let start_h = heuristic(grid, start);
        let start_cell = grid.cell_mut(start);
        start_cell.set_cost_so_far(0.0);
        start_cell.set_heuristic(start_h);
        start_cell.set_predecessor(None);
        discovered[start.index()] = true;
        open.push(OpenEntry {
            f: start_h,
            g: 0.0,
            id: start,
        });

        while let Some(entry) = open.pop() {
            let current = entry.id;
            if closed[current.index()] {
                continue;
            }
            closed[current.index()] = true;
            expanded += 1;

            if current == goal {
                let path = grid.path_to(goal).ok()?;
                let path_len = path.len().saturating_sub(1);
                return Some(Plan {
                    path,
                    stats: PlanStats { expanded, path_len },
                });
            }

            let current_g = grid.cell(current).cost_so_far();
            let neighbors: Vec<CellId> = grid.neighbors(current).collect();
            for next in neighbors {
                if closed[next.index()] || !believed_passable(grid.cell(next)) {
                    continue;
                }

                let tentative = current_g + STEP_COST;
                if discovered[next.index()] && tentative >= grid.cell(next).cost_so_far() {
                    continue;
                }

                let h = heuristic(grid, next);
                let cell = grid.cell_mut(next);
                cell.set_cost_so_far(tentative);
                cell.set_heuristic(h);
                cell.set_predecessor(Some(current));
                discovered[next.index()] = true;
                open.push(OpenEntry {
                    f: cell.combined_score(),
                    g: tentative,
                    id: next,
                });
            }
        }

        None
    }
}
