mod params;

pub use params::{AgentParams, DEFAULT_MAX_ACTIONS};

use crate::belief::BeliefUpdater;
use crate::planner::{AStarPlanner, reachable_distances};
use crate::policy::Ranker;
use hunt_core::grid::{Grid, World};
use hunt_core::model::cell::CellId;
use rand::Rng;
use serde::Serialize;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HuntOutcome {
    pub found: bool,
    pub movements: u64,
    pub examinations: u64,
    pub blocked_hits: u64,
    pub plans: u64,
    pub replans: u64,
}

impl HuntOutcome {
    /// Movements plus examinations; bumping into a wall is not an action.
    pub fn actions(&self) -> u64 {
        self.movements + self.examinations
    }
}

/// Plan, travel, examine, update: repeated until the target turns up.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchAgent {
    params: AgentParams,
    planner: AStarPlanner,
    ranker: Ranker,
}

impl SearchAgent {
    pub fn new(params: AgentParams) -> Self {
        Self {
            params,
            planner: AStarPlanner::new(),
            ranker: Ranker::new(params.strategy),
        }
    }

    pub fn params(&self) -> AgentParams {
        self.params
    }

    pub fn run<R: Rng + ?Sized>(&self, world: &mut World, rng: &mut R) -> HuntOutcome {
        let mut outcome = HuntOutcome::default();
        let mut position = world.start();
        visit(world.grid_mut(), position);

        // Destination kept across a wall bump that happened short of it.
        let mut detour_to: Option<CellId> = None;

        while outcome.actions() < self.params.max_actions {
            let replanned = detour_to.take().and_then(|destination| {
                self.planner
                    .plan(world.grid_mut(), position, destination)
                    .map(|plan| (destination, plan))
            });
            let (destination, plan) = match replanned {
                Some(found) => {
                    outcome.replans += 1;
                    found
                }
                None => {
                    let distances = reachable_distances(world.grid(), position);
                    let Some(destination) =
                        self.ranker.choose(world.grid_mut(), &distances, rng)
                    else {
                        tracing::warn!(
                            position = %world.grid().cell(position).position(),
                            "no reachable destination left"
                        );
                        break;
                    };
                    let Some(plan) = self.planner.plan(world.grid_mut(), position, destination)
                    else {
                        tracing::warn!(
                            destination = %world.grid().cell(destination).position(),
                            "ranked destination could not be planned to"
                        );
                        break;
                    };
                    (destination, plan)
                }
            };
            outcome.plans += 1;
            log_plan(world.grid(), position, destination, plan.stats.path_len, plan.stats.expanded);

            let mut arrived = true;
            for &next in plan.path.iter().skip(1) {
                if outcome.actions() >= self.params.max_actions {
                    break;
                }
                let grid = world.grid_mut();
                if !grid.cell(next).terrain().is_passable() {
                    grid.cell_mut(next).mark_visited();
                    if let Err(err) = BeliefUpdater::on_blocked(grid, next) {
                        tracing::warn!(%err, "belief update after blocked cell skipped");
                    }
                    outcome.blocked_hits += 1;
                    if next != destination {
                        detour_to = Some(destination);
                    }
                    log_blocked(grid, next);
                    arrived = false;
                    break;
                }
                position = next;
                outcome.movements += 1;
                visit(grid, next);
            }

            if !arrived || position != destination {
                continue;
            }
            if outcome.actions() >= self.params.max_actions {
                break;
            }

            outcome.examinations += 1;
            if world.examine(position, rng) {
                outcome.found = true;
                break;
            }
            if let Err(err) = BeliefUpdater::on_failed_examination(world.grid_mut(), position) {
                tracing::warn!(%err, "belief update after failed examination skipped");
            }
            log_examination(world.grid(), position);
        }

        if tracing::enabled!(Level::INFO) {
            event!(
                target: "hunt_bot::hunt",
                Level::INFO,
                strategy = %self.params.strategy,
                found = outcome.found,
                movements = outcome.movements,
                examinations = outcome.examinations,
                blocked_hits = outcome.blocked_hits,
                plans = outcome.plans,
                replans = outcome.replans
            );
        }

        outcome
    }
}

/// Entering a cell reveals its terrain; the detection belief is refreshed right away.
fn visit(grid: &mut Grid, id: CellId) {
    grid.cell_mut(id).mark_visited();
    BeliefUpdater::sync(grid, id);
}

fn log_plan(grid: &Grid, from: CellId, to: CellId, path_len: usize, expanded: usize) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    let target = grid.cell(to);
    event!(
        target: "hunt_bot::plan",
        Level::DEBUG,
        from = %grid.cell(from).position(),
        to = %target.position(),
        rank_score = target.rank_score(),
        prob_find = target.prob_find(),
        path_len = path_len as u64,
        expanded = expanded as u64
    );
}

fn log_blocked(grid: &Grid, id: CellId) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    event!(
        target: "hunt_bot::blocked",
        Level::DEBUG,
        cell = %grid.cell(id).position(),
        total_belief = grid.total_belief()
    );
}

fn log_examination(grid: &Grid, id: CellId) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    let cell = grid.cell(id);
    event!(
        target: "hunt_bot::examine",
        Level::DEBUG,
        cell = %cell.position(),
        terrain = %cell.terrain(),
        prob_contain = cell.prob_contain(),
        prob_find = cell.prob_find()
    );
}
