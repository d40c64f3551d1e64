//! Bayesian revision of containment beliefs after observations.
//!
//! Every update finishes by calling `update_belief` on each touched cell, so
//! `prob_find == prob_contain * multiplier` holds on return.

use hunt_core::grid::Grid;
use hunt_core::model::cell::CellId;
use std::fmt;

#[derive(Debug, Default, Clone, Copy)]
pub struct BeliefUpdater;

impl BeliefUpdater {
    /// Re-derives `prob_find` for a cell whose multiplier just changed.
    pub fn sync(grid: &mut Grid, id: CellId) {
        let cell = grid.cell_mut(id);
        let prob_contain = cell.prob_contain();
        cell.update_belief(prob_contain);
    }

    /// Conditions every belief on "examined `id` and did not find the target".
    ///
    /// The cell's current multiplier is used as the detection probability.
    pub fn on_failed_examination(grid: &mut Grid, id: CellId) -> Result<(), BeliefError> {
        let cell = grid.cell(id);
        let prior = cell.prob_contain();
        let detection = cell.multiplier();
        let evidence = 1.0 - prior * detection;
        check_evidence(id, evidence)?;

        for (other, cell) in grid.iter_mut() {
            let q = cell.prob_contain();
            let posterior = if other == id {
                q * (1.0 - detection) / evidence
            } else {
                q / evidence
            };
            cell.update_belief(posterior);
        }
        Ok(())
    }

    /// Conditions every belief on "`id` is blocked, so the target cannot be there".
    pub fn on_blocked(grid: &mut Grid, id: CellId) -> Result<(), BeliefError> {
        let evidence = 1.0 - grid.cell(id).prob_contain();
        check_evidence(id, evidence)?;

        for (other, cell) in grid.iter_mut() {
            let posterior = if other == id {
                0.0
            } else {
                cell.prob_contain() / evidence
            };
            cell.update_belief(posterior);
        }
        Ok(())
    }
}

fn check_evidence(id: CellId, evidence: f64) -> Result<(), BeliefError> {
    if evidence > 0.0 && evidence.is_finite() {
        Ok(())
    } else {
        Err(BeliefError::Degenerate { id, evidence })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BeliefError {
    /// The observation had zero (or undefined) probability under the current beliefs.
    Degenerate { id: CellId, evidence: f64 },
}

impl fmt::Display for BeliefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeliefError::Degenerate { id, evidence } => write!(
                f,
                "observation at {id} has probability {evidence}; beliefs left unchanged"
            ),
        }
    }
}

impl std::error::Error for BeliefError {}

#[cfg(test)]
mod tests {
    use super::*;
    use hunt_core::grid::GridBuilder;

    const EPS: f64 = 1e-12;

    fn open_grid() -> Grid {
        GridBuilder::from_layout(&[vec![0, 1], vec![2, 3]]).expect("layout")
    }

    fn assert_invariant(grid: &Grid) {
        for (_, cell) in grid.iter() {
            assert_eq!(cell.prob_find(), cell.prob_contain() * cell.multiplier());
        }
    }

    #[test]
    fn sync_refreshes_stale_detection() {
        let mut grid = open_grid();
        let id = CellId(0);
        grid.cell_mut(id).mark_visited();
        assert_eq!(grid.cell(id).prob_find(), 0.25 * 0.5);

        BeliefUpdater::sync(&mut grid, id);

        assert_eq!(grid.cell(id).prob_contain(), 0.25);
        assert!((grid.cell(id).prob_find() - 0.2).abs() < EPS);
    }

    #[test]
    fn failed_flat_examination_moves_mass_elsewhere() {
        let mut grid = open_grid();
        let id = CellId(0);
        grid.cell_mut(id).mark_visited();

        BeliefUpdater::on_failed_examination(&mut grid, id).expect("update");

        // evidence = 1 - 0.25 * 0.8 = 0.8
        assert!((grid.cell(id).prob_contain() - 0.0625).abs() < EPS);
        for other in [CellId(1), CellId(2), CellId(3)] {
            assert!((grid.cell(other).prob_contain() - 0.3125).abs() < EPS);
        }
        assert!((grid.total_belief() - 1.0).abs() < EPS);
        assert_invariant(&grid);
    }

    #[test]
    fn failed_examination_of_unvisited_cell_uses_default_multiplier() {
        let mut grid = open_grid();
        BeliefUpdater::on_failed_examination(&mut grid, CellId(2)).expect("update");
        // evidence = 1 - 0.25 * 0.5 = 0.875
        assert!((grid.cell(CellId(2)).prob_contain() - 0.125 / 0.875).abs() < EPS);
        assert!((grid.total_belief() - 1.0).abs() < EPS);
    }

    #[test]
    fn blocked_cell_loses_all_mass() {
        let mut grid = open_grid();
        let wall = CellId(3);
        grid.cell_mut(wall).mark_visited();

        BeliefUpdater::on_blocked(&mut grid, wall).expect("update");

        assert_eq!(grid.cell(wall).prob_contain(), 0.0);
        assert_eq!(grid.cell(wall).prob_find(), 0.0);
        for other in [CellId(0), CellId(1), CellId(2)] {
            assert!((grid.cell(other).prob_contain() - 1.0 / 3.0).abs() < EPS);
        }
        assert_invariant(&grid);
    }

    #[test]
    fn degenerate_evidence_is_rejected_without_changes() {
        let mut grid = open_grid();
        grid.cell_mut(CellId(0)).update_belief(1.0);
        for other in [CellId(1), CellId(2), CellId(3)] {
            grid.cell_mut(other).update_belief(0.0);
        }
        let before = grid.clone();

        let err = BeliefUpdater::on_blocked(&mut grid, CellId(0)).expect_err("degenerate");

        assert!(matches!(err, BeliefError::Degenerate { id, .. } if id == CellId(0)));
        assert_eq!(grid, before);
    }

    #[test]
    fn repeated_failures_in_forest_decay_slowly() {
        let mut grid = open_grid();
        let forest = CellId(2);
        grid.cell_mut(forest).mark_visited();
        let mut last = grid.cell(forest).prob_contain();
        for _ in 0..5 {
            BeliefUpdater::on_failed_examination(&mut grid, forest).expect("update");
            let now = grid.cell(forest).prob_contain();
            assert!(now < last);
            last = now;
        }
        assert!(last > 0.05, "forest keeps meaningful mass: {last}");
        assert!((grid.total_belief() - 1.0).abs() < 1e-9);
    }
}
