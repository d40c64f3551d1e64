use hunt_bot::{AStarPlanner, BeliefUpdater, reachable_distances};
use hunt_core::grid::{Grid, GridBuilder};
use hunt_core::model::cell::CellId;
use hunt_core::model::position::Position;

fn open_grid(dim: usize) -> Grid {
    GridBuilder::from_layout(&vec![vec![0; dim]; dim]).expect("layout")
}

fn id(grid: &Grid, x: i32, y: i32) -> CellId {
    grid.id_of(Position::new(x, y)).expect("in bounds")
}

#[test]
fn consecutive_passes_do_not_leak_predecessors() {
    let mut grid = open_grid(6);
    let planner = AStarPlanner::new();

    let first_goal = id(&grid, 5, 5);
    let origin = id(&grid, 0, 0);
    planner.plan(&mut grid, origin, first_goal).expect("first plan");
    assert!(grid.cell(first_goal).predecessor().is_some());

    let second_start = id(&grid, 3, 0);
    let second_goal = id(&grid, 5, 0);
    let plan = planner
        .plan(&mut grid, second_start, second_goal)
        .expect("second plan");

    assert_eq!(plan.path.first(), Some(&second_start));
    assert_eq!(plan.stats.path_len, 2);
    // Cells the second pass never touched carry no bookkeeping from the first one.
    assert_eq!(grid.cell(first_goal).predecessor(), None);
    assert_eq!(grid.cell(first_goal).cost_so_far(), 0.0);
    assert_eq!(grid.cell(origin).predecessor(), None);
}

#[test]
fn every_planned_cell_walks_back_to_the_start() {
    let mut grid = open_grid(8);
    let start = id(&grid, 2, 3);
    let goal = id(&grid, 7, 7);
    AStarPlanner::new().plan(&mut grid, start, goal).expect("plan");

    for (cell_id, cell) in grid.iter() {
        if cell.predecessor().is_none() {
            continue;
        }
        let path = grid.path_to(cell_id).expect("no cycles");
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.len() as f64 - 1.0, cell.cost_so_far());
    }
}

#[test]
fn belief_updates_persist_across_planning_passes() {
    let mut grid = open_grid(4);
    let examined = id(&grid, 1, 1);
    grid.cell_mut(examined).mark_visited();
    BeliefUpdater::sync(&mut grid, examined);
    BeliefUpdater::on_failed_examination(&mut grid, examined).expect("update");
    let belief = grid.cell(examined).prob_contain();

    let (start, goal) = (id(&grid, 0, 0), id(&grid, 3, 3));
    AStarPlanner::new()
        .plan(&mut grid, start, goal)
        .expect("plan");

    assert_eq!(grid.cell(examined).prob_contain(), belief);
    assert!(grid.cell(examined).is_visited());
    let distances = reachable_distances(&grid, examined);
    assert!(distances.iter().all(Option::is_some));
}
