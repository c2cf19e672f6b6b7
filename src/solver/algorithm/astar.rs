use super::construct_path;
use crate::common::{Cell, Path};
use crate::map::Map;
use crate::stat::Stats;

use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SearchNode {
    // Field order matters: the BTreeSet frontier pops the lowest f first;
    // remaining ties resolve on g and then on position.
    f_cost: usize,
    g_cost: usize,
    position: Cell,
}

/// A* over passable 4-neighbors with unit move cost and a Manhattan
/// heuristic. Returns `None` when the frontier empties without reaching the
/// goal (goal unreachable, blocked, or out of bounds).
#[instrument(skip_all, name = "a_star", fields(start = %start, goal = %goal), level = "debug")]
pub(crate) fn a_star_search(map: &Map, start: Cell, goal: Cell, stats: &mut Stats) -> Option<Path> {
    // A start or goal that is blocked or out of bounds is simply unreachable.
    if !map.is_passable(start) || !map.is_passable(goal) {
        return None;
    }

    let mut open_list = BTreeSet::new();
    let mut closed_list = HashSet::new();
    let mut trace_map: HashMap<Cell, Cell> = HashMap::new();
    let mut g_cost_map: HashMap<Cell, usize> = HashMap::new();

    open_list.insert(SearchNode {
        f_cost: start.manhattan(goal),
        g_cost: 0,
        position: start,
    });
    g_cost_map.insert(start, 0);

    while let Some(current) = open_list.pop_first() {
        stats.low_level_expand_nodes += 1;

        if current.position == goal {
            debug!("reached goal with cost {}", current.g_cost);
            return Some(construct_path(&trace_map, goal));
        }

        closed_list.insert(current.position);

        // Uniform cost grid.
        let tentative_g_cost = current.g_cost + 1;

        for neighbor in map.get_neighbors(current.position) {
            if closed_list.contains(&neighbor) {
                continue;
            }

            let old_g_cost = *g_cost_map.get(&neighbor).unwrap_or(&usize::MAX);
            if tentative_g_cost < old_g_cost {
                trace_map.insert(neighbor, current.position);
                g_cost_map.insert(neighbor, tentative_g_cost);

                let h_cost = neighbor.manhattan(goal);

                // Decrease-key: drop the stale frontier entry before
                // inserting the cheaper one, so no cell ever has two live
                // entries with different costs.
                if old_g_cost != usize::MAX {
                    open_list.remove(&SearchNode {
                        f_cost: old_g_cost + h_cost,
                        g_cost: old_g_cost,
                        position: neighbor,
                    });
                }

                open_list.insert(SearchNode {
                    f_cost: tentative_g_cost + h_cost,
                    g_cost: tentative_g_cost,
                    position: neighbor,
                });
            }
        }
        trace!("open list {open_list:?}");
    }

    None
}

/// Path of exactly `max_cost` moves, or `None` when the goal is not reachable
/// within that budget. Costs above the minimum are absorbed by waiting at the
/// goal; no same-length detours are searched.
pub(crate) fn a_star_search_with_cost(
    map: &Map,
    start: Cell,
    goal: Cell,
    max_cost: usize,
    stats: &mut Stats,
) -> Option<Path> {
    let mut path = a_star_search(map, start, goal, stats)?;
    let min_cost = path.len() - 1;

    if min_cost > max_cost {
        return None;
    }

    for _ in min_cost..max_cost {
        path.push(goal);
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn shortest(map: &Map, start: Cell, goal: Cell) -> Option<Path> {
        a_star_search(map, start, goal, &mut Stats::default())
    }

    /// Brute-force BFS oracle for small grids.
    fn bfs_distance(map: &Map, start: Cell, goal: Cell) -> Option<usize> {
        let mut queue = VecDeque::from([(start, 0)]);
        let mut seen = HashSet::from([start]);
        while let Some((cell, dist)) = queue.pop_front() {
            if cell == goal {
                return Some(dist);
            }
            for neighbor in map.get_neighbors(cell) {
                if seen.insert(neighbor) {
                    queue.push_back((neighbor, dist + 1));
                }
            }
        }
        None
    }

    #[test]
    fn straight_line_on_open_map() {
        let map = Map::open(5, 5);
        let path = shortest(&map, Cell::new(0, 0), Cell::new(4, 0)).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], Cell::new(0, 0));
        assert_eq!(path[4], Cell::new(4, 0));
    }

    #[test]
    fn routes_around_a_wall() {
        let map = Map::from_ascii(
            ".....
             .@@@.
             .....",
        );
        let path = shortest(&map, Cell::new(2, 0), Cell::new(2, 2)).unwrap();
        assert_eq!(path.len() - 1, bfs_distance(&map, Cell::new(2, 0), Cell::new(2, 2)).unwrap());
    }

    #[test]
    fn matches_bfs_on_every_reachable_pair() {
        let map = Map::from_ascii(
            "..@..
             ..@..
             .....
             .@@@.
             .....",
        );
        for sy in 0..map.height {
            for sx in 0..map.width {
                for gy in 0..map.height {
                    for gx in 0..map.width {
                        let (start, goal) = (Cell::new(sx, sy), Cell::new(gx, gy));
                        if !map.is_passable(start) || !map.is_passable(goal) {
                            continue;
                        }
                        let expected = bfs_distance(&map, start, goal);
                        let found = shortest(&map, start, goal).map(|p| p.len() - 1);
                        assert_eq!(found, expected, "start {start} goal {goal}");
                    }
                }
            }
        }
    }

    #[test]
    fn blocked_or_out_of_range_goal_fails() {
        let map = Map::from_ascii(
            "...
             .@.
             ...",
        );
        assert!(shortest(&map, Cell::new(0, 0), Cell::new(1, 1)).is_none());
        assert!(shortest(&map, Cell::new(0, 0), Cell::new(7, 7)).is_none());
    }

    #[test]
    fn walled_off_goal_is_unreachable() {
        let map = Map::from_ascii(
            "..@.
             ..@.
             @@@.",
        );
        assert!(shortest(&map, Cell::new(0, 0), Cell::new(3, 2)).is_none());
    }

    #[test]
    fn bounded_cost_exact_and_padded() {
        let map = Map::open(4, 1);
        let stats = &mut Stats::default();
        let (start, goal) = (Cell::new(0, 0), Cell::new(3, 0));

        // Below the minimum: infeasible.
        assert!(a_star_search_with_cost(&map, start, goal, 2, stats).is_none());

        // Exactly the minimum: the shortest path unchanged.
        let exact = a_star_search_with_cost(&map, start, goal, 3, stats).unwrap();
        assert_eq!(exact.len() - 1, 3);

        // Above the minimum: padded by waiting at the goal.
        let padded = a_star_search_with_cost(&map, start, goal, 6, stats).unwrap();
        assert_eq!(padded.len() - 1, 6);
        assert_eq!(&padded[4..], &[goal, goal, goal]);
    }

    #[test]
    fn zero_cost_when_already_at_goal() {
        let map = Map::open(2, 2);
        let stats = &mut Stats::default();
        let path =
            a_star_search_with_cost(&map, Cell::new(1, 1), Cell::new(1, 1), 0, stats).unwrap();
        assert_eq!(path, vec![Cell::new(1, 1)]);
    }
}
