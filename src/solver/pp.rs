use super::algorithm::a_star_search;
use super::comm::first_conflict;
use super::{SolveOutcome, Solver};
use crate::common::{Agent, Path, Solution};
use crate::config::Config;
use crate::map::Map;
use crate::stat::Stats;

use std::time::Instant;
use tracing::debug;

/// Pairwise conflict resolver. Every agent starts on its individually
/// shortest path; as long as some pair conflicts, the whole current path of
/// the lower-indexed agent is overlaid as a static obstacle and the
/// higher-indexed agent replans around it. Blocking the full path rather
/// than the conflicting cell alone can over-constrain and leave the later
/// agent without a path; that case is reported as an empty path, not an
/// error.
pub struct PP {
    agents: Vec<Agent>,
    map: Map,
    stats: Stats,
}

impl PP {
    pub fn new(agents: Vec<Agent>, map: &Map) -> Self {
        PP {
            agents,
            map: map.clone(),
            stats: Stats::default(),
        }
    }

    fn initial_paths(&mut self) -> Vec<Path> {
        self.agents
            .iter()
            .map(|agent| {
                a_star_search(&self.map, agent.start, agent.goal, &mut self.stats)
                    .unwrap_or_default()
            })
            .collect()
    }
}

impl Solver for PP {
    fn solve(&mut self, config: &Config) -> SolveOutcome {
        let total_solve_start_time = Instant::now();
        let agents = self.agents.clone();
        let mut paths = self.initial_paths();

        for iteration in 0..config.pairwise_iteration_cap {
            let Some(conflict) = first_conflict(&paths) else {
                self.stats.time_ms = total_solve_start_time.elapsed().as_micros() as usize;
                let solution = Solution { paths };
                self.stats.costs = solution.total_cost();
                self.stats.print("PP", config);
                return SolveOutcome::Solved(solution);
            };

            debug!("iteration {iteration}: {conflict:?}");
            self.stats.high_level_expand_nodes += 1;

            // The earlier agent's entire path becomes a static obstacle on an
            // independent copy of the base map; the later agent replans
            // against it. An unreachable replan clears the path.
            let blocker = &paths[conflict.agent_1];
            let overlay = self.map.with_blocked(blocker);
            let loser = &agents[conflict.agent_2];
            paths[conflict.agent_2] =
                a_star_search(&overlay, loser.start, loser.goal, &mut self.stats)
                    .unwrap_or_default();
        }

        // Budget spent without a clean pass; hand back whatever exists.
        self.stats.time_ms = total_solve_start_time.elapsed().as_micros() as usize;
        let solution = Solution { paths };
        self.stats.costs = solution.total_cost();
        self.stats.print("PP (best effort)", config);
        SolveOutcome::BestEffort(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Cell;
    use crate::solver::comm::has_conflict;

    fn agent(id: usize, start: (usize, usize), goal: (usize, usize)) -> Agent {
        Agent {
            id,
            start: Cell::new(start.0, start.1),
            goal: Cell::new(goal.0, goal.1),
        }
    }

    #[test]
    fn crossing_pair_ends_up_conflict_free() {
        // Minimum paths cross at (2, 2) at the same step; the map leaves room
        // to detour around the first agent's blocked path.
        let map = Map::open(7, 5);
        let agents = vec![agent(0, (0, 2), (4, 2)), agent(1, (2, 0), (2, 4))];
        let mut solver = PP::new(agents.clone(), &map);

        let SolveOutcome::Solved(solution) = solver.solve(&Config::default()) else {
            panic!("expected a solved outcome");
        };
        assert!(!has_conflict(&solution.paths));
        assert!(solution.paths.iter().all(|p| !p.is_empty()));
        assert!(solution.verify(&map, &agents));
    }

    #[test]
    fn disjoint_agents_keep_their_shortest_paths() {
        let map = Map::open(4, 4);
        let agents = vec![agent(0, (0, 0), (3, 0)), agent(1, (0, 3), (3, 3))];
        let mut solver = PP::new(agents, &map);

        let SolveOutcome::Solved(solution) = solver.solve(&Config::default()) else {
            panic!("expected a solved outcome");
        };
        assert_eq!(solution.paths[0].len() - 1, 3);
        assert_eq!(solution.paths[1].len() - 1, 3);
    }

    #[test]
    fn over_constrained_agent_is_left_without_a_path() {
        // One-cell-wide corridor swap: blocking agent 0's full path walls off
        // agent 1 entirely. Best-effort means an empty path, not a panic.
        let map = Map::from_ascii("....");
        let agents = vec![agent(0, (0, 0), (3, 0)), agent(1, (3, 0), (0, 0))];
        let mut solver = PP::new(agents, &map);

        let SolveOutcome::Solved(solution) = solver.solve(&Config::default()) else {
            panic!("expected a solved outcome");
        };
        assert!(!solution.paths[0].is_empty());
        assert!(solution.paths[1].is_empty());
    }

    #[test]
    fn iteration_cap_yields_best_effort() {
        let map = Map::open(5, 5);
        let agents = vec![agent(0, (0, 2), (4, 2)), agent(1, (2, 0), (2, 4))];
        let config = Config {
            pairwise_iteration_cap: 0,
            ..Config::default()
        };
        let mut solver = PP::new(agents, &map);

        match solver.solve(&config) {
            SolveOutcome::BestEffort(solution) => {
                // Paths exist but were never deconflicted.
                assert!(solution.paths.iter().all(|p| !p.is_empty()));
                assert!(has_conflict(&solution.paths));
            }
            other => panic!("expected best effort, got {other:?}"),
        }
    }
}
