use super::believed_passable;
use hunt_core::grid::Grid;
use hunt_core::model::cell::CellId;
use std::collections::VecDeque;

/// Step counts from `origin` to every cell the agent believes it can reach.
///
/// Indexed by `CellId`; `None` marks cells cut off by known walls. The origin is always
/// reachable at distance zero, even when it is the blocked cell the agent just bumped.
pub fn reachable_distances(grid: &Grid, origin: CellId) -> Vec<Option<u32>> {
    let mut distances = vec![None; grid.len()];
    distances[origin.index()] = Some(0);
    let mut queue = VecDeque::from([origin]);

    while let Some(current) = queue.pop_front() {
        let next_distance = distances[current.index()].map_or(0, |d| d + 1);
        for next in grid.neighbors(current) {
            if distances[next.index()].is_some() || !believed_passable(grid.cell(next)) {
                continue;
            }
            distances[next.index()] = Some(next_distance);
            queue.push_back(next);
        }
    }

    distances
}

#[cfg(test)]
mod tests {
    use super::*;
    use hunt_core::grid::GridBuilder;

    #[test]
    fn distances_match_manhattan_on_open_grid() {
        let grid = GridBuilder::from_layout(&vec![vec![0; 4]; 4]).expect("layout");
        let origin = CellId(0);
        let distances = reachable_distances(&grid, origin);
        for (id, cell) in grid.iter() {
            let expected = cell
                .position()
                .manhattan_distance(grid.cell(origin).position());
            assert_eq!(distances[id.index()], Some(expected));
        }
    }

    #[test]
    fn known_walls_cut_off_cells() {
        let mut grid =
            GridBuilder::from_layout(&[vec![0, 3, 0], vec![3, 3, 0], vec![0, 0, 0]]).expect("layout");
        for id in [CellId(1), CellId(3), CellId(4)] {
            grid.cell_mut(id).mark_visited();
        }
        let distances = reachable_distances(&grid, CellId(0));
        assert_eq!(distances[0], Some(0));
        assert!(distances[1..].iter().all(Option::is_none));
    }

    #[test]
    fn unseen_walls_count_as_open() {
        let grid =
            GridBuilder::from_layout(&[vec![0, 3, 0], vec![3, 3, 0], vec![0, 0, 0]]).expect("layout");
        let distances = reachable_distances(&grid, CellId(0));
        assert_eq!(distances[2], Some(2));
        assert_eq!(distances[8], Some(4));
    }
}
