//! Per-cell search state: terrain, visitation, belief and A* bookkeeping.
//!
//! A [`Cell`] keeps two independently resettable halves:
//! - [`BeliefState`]: containment/detection beliefs, persistent across planning passes.
//! - [`PlanningState`]: cost-so-far, heuristic and predecessor, reset before every pass.

use super::position::Position;
use super::terrain::Terrain;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Detection multiplier applied to cells whose terrain has not been observed yet.
pub const UNVISITED_MULTIPLIER: f64 = 0.5;

/// Stable index of a cell inside its owning grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellId(pub usize);

impl CellId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Transient A* bookkeeping for the current planning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanningState {
    pub cost_so_far: f64,
    pub heuristic: f64,
    pub predecessor: Option<CellId>,
}

impl PlanningState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn combined_score(&self) -> f64 {
        self.cost_so_far + self.heuristic
    }
}

/// Belief that the target is here and that examining the cell now would find it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeliefState {
    prob_contain: f64,
    prob_find: f64,
    multiplier: f64,
}

impl BeliefState {
    fn with_prior(prior: f64) -> Self {
        Self {
            prob_contain: prior,
            prob_find: prior * UNVISITED_MULTIPLIER,
            multiplier: UNVISITED_MULTIPLIER,
        }
    }

    pub fn prob_contain(&self) -> f64 {
        self.prob_contain
    }

    pub fn prob_find(&self) -> f64 {
        self.prob_find
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    position: Position,
    terrain: Terrain,
    visited: bool,
    planning: PlanningState,
    belief: BeliefState,
    rank_score: f64,
}

impl Cell {
    /// Creates an unvisited cell. Terrain codes other than 0, 1 and 2 are read as `Blocked`.
    pub fn new(position: Position, terrain_code: i32, prior: f64) -> Self {
        Self::with_terrain(position, Terrain::from_code(terrain_code), prior)
    }

    pub fn with_terrain(position: Position, terrain: Terrain, prior: f64) -> Self {
        Self {
            position,
            terrain,
            visited: false,
            planning: PlanningState::default(),
            belief: BeliefState::with_prior(prior),
            rank_score: 0.0,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// True terrain of the cell. Search code should only rely on it once visited.
    pub fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub fn cost_so_far(&self) -> f64 {
        self.planning.cost_so_far
    }

    pub fn heuristic(&self) -> f64 {
        self.planning.heuristic
    }

    pub fn combined_score(&self) -> f64 {
        self.planning.combined_score()
    }

    pub fn predecessor(&self) -> Option<CellId> {
        self.planning.predecessor
    }

    pub fn planning(&self) -> &PlanningState {
        &self.planning
    }

    pub fn belief(&self) -> &BeliefState {
        &self.belief
    }

    pub fn prob_contain(&self) -> f64 {
        self.belief.prob_contain
    }

    pub fn prob_find(&self) -> f64 {
        self.belief.prob_find
    }

    pub fn multiplier(&self) -> f64 {
        self.belief.multiplier
    }

    pub fn rank_score(&self) -> f64 {
        self.rank_score
    }

    /// Records that the agent has entered (or bumped into) this cell.
    ///
    /// The multiplier switches to the terrain's visited value; `prob_find` keeps its old
    /// value until the next [`Cell::update_belief`].
    pub fn mark_visited(&mut self) {
        self.visited = true;
        self.belief.multiplier = self.terrain.visited_multiplier();
    }

    pub fn set_cost_so_far(&mut self, g: f64) {
        self.planning.cost_so_far = g;
    }

    pub fn set_heuristic(&mut self, h: f64) {
        self.planning.heuristic = h;
    }

    /// Overwrites the planned-path parent. Cycles are the caller's problem.
    pub fn set_predecessor(&mut self, predecessor: Option<CellId>) {
        self.planning.predecessor = predecessor;
    }

    /// Replaces the containment belief and recomputes `prob_find` from the current multiplier.
    pub fn update_belief(&mut self, prob_contain: f64) {
        self.belief.prob_contain = prob_contain;
        self.belief.prob_find = prob_contain * self.belief.multiplier;
    }

    pub fn set_rank_score(&mut self, score: f64) {
        self.rank_score = score;
    }

    pub fn reset_planning(&mut self) {
        self.planning.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn cell(code: i32, prior: f64) -> Cell {
        Cell::new(Position::new(2, 3), code, prior)
    }

    #[test]
    fn construction_maps_terrain_codes() {
        assert_eq!(cell(0, 0.1).terrain(), Terrain::Flat);
        assert_eq!(cell(1, 0.1).terrain(), Terrain::Hilly);
        assert_eq!(cell(2, 0.1).terrain(), Terrain::Forest);
        for code in [3, -1, 5, 99] {
            assert_eq!(cell(code, 0.1).terrain(), Terrain::Blocked);
        }
    }

    #[test]
    fn new_cell_has_default_state() {
        let c = cell(1, 0.25);
        assert_eq!(c.position(), Position::new(2, 3));
        assert!(!c.is_visited());
        assert_eq!(c.multiplier(), 0.5);
        assert_eq!(c.prob_contain(), 0.25);
        assert_eq!(c.prob_find(), 0.125);
        assert_eq!(c.cost_so_far(), 0.0);
        assert_eq!(c.heuristic(), 0.0);
        assert_eq!(c.predecessor(), None);
        assert_eq!(c.rank_score(), 0.0);
    }

    #[test]
    fn mark_visited_sets_terrain_multiplier() {
        let expected = [(0, 0.8), (1, 0.5), (2, 0.2), (3, 0.0)];
        for (code, multiplier) in expected {
            let mut c = cell(code, 0.4);
            let before = c.prob_find();
            c.mark_visited();
            assert!(c.is_visited());
            assert_eq!(c.multiplier(), multiplier);
            assert_eq!(c.prob_find(), before, "prob_find must stay stale");
        }
    }

    #[test]
    fn mark_visited_is_one_way() {
        let mut c = cell(0, 0.4);
        c.mark_visited();
        c.mark_visited();
        assert!(c.is_visited());
        assert_eq!(c.multiplier(), 0.8);
    }

    #[test]
    fn update_belief_restores_detection_invariant() {
        let mut c = cell(0, 0.3);
        for p in [0.0, 0.1, 0.77, 1.0] {
            c.update_belief(p);
            assert_eq!(c.prob_find(), c.prob_contain() * c.multiplier());
        }
        c.mark_visited();
        c.update_belief(0.6);
        assert_eq!(c.prob_contain(), 0.6);
        assert_eq!(c.prob_find(), 0.6 * 0.8);
    }

    #[test]
    fn combined_score_is_sum_of_cost_and_heuristic() {
        let mut c = cell(0, 0.1);
        for (g, h) in [(0.0, 0.0), (3.0, 4.5), (2.0, -1.0), (-2.5, 0.0)] {
            c.set_cost_so_far(g);
            c.set_heuristic(h);
            assert_eq!(c.combined_score(), g + h);
        }
    }

    #[test]
    fn rank_score_is_returned_verbatim() {
        let mut c = cell(2, 0.1);
        for x in [1.5, -3.0, 0.0, f64::MAX, f64::NEG_INFINITY] {
            c.set_rank_score(x);
            assert_eq!(c.rank_score(), x);
        }
    }

    #[test]
    fn forest_scenario_keeps_stale_detection_until_update() {
        let mut c = Cell::new(Position::new(2, 3), 2, 0.01);
        assert!((c.prob_find() - 0.005).abs() < EPS);

        c.mark_visited();
        assert_eq!(c.multiplier(), 0.2);
        assert!((c.prob_find() - 0.005).abs() < EPS);

        c.update_belief(0.02);
        assert_eq!(c.prob_contain(), 0.02);
        assert!((c.prob_find() - 0.004).abs() < EPS);
    }

    #[test]
    fn unknown_code_scenario_reads_blocked_with_zero_multiplier() {
        let mut c = cell(5, 0.2);
        assert_eq!(c.terrain(), Terrain::Blocked);
        c.mark_visited();
        assert_eq!(c.multiplier(), 0.0);
    }

    #[test]
    fn reset_planning_leaves_belief_untouched() {
        let mut c = cell(0, 0.3);
        c.mark_visited();
        c.update_belief(0.4);
        c.set_cost_so_far(7.0);
        c.set_heuristic(2.0);
        c.set_predecessor(Some(CellId(9)));
        c.set_rank_score(0.25);

        c.reset_planning();

        assert_eq!(c.planning(), &PlanningState::default());
        assert_eq!(c.prob_contain(), 0.4);
        assert_eq!(c.prob_find(), 0.4 * 0.8);
        assert_eq!(c.rank_score(), 0.25);
        assert!(c.is_visited());
    }

    #[test]
    fn predecessor_overwrites_unconditionally() {
        let mut c = cell(0, 0.3);
        c.set_predecessor(Some(CellId(1)));
        c.set_predecessor(Some(CellId(4)));
        assert_eq!(c.predecessor(), Some(CellId(4)));
        c.set_predecessor(None);
        assert_eq!(c.predecessor(), None);
    }
}
