use super::algorithm::{a_star_search, a_star_search_with_cost};
use super::comm::has_conflict;
use super::{SolveOutcome, Solver};
use crate::common::{Agent, Solution};
use crate::config::Config;
use crate::map::Map;
use crate::stat::Stats;

use std::collections::BTreeSet;
use std::time::Instant;
use tracing::debug;

/// One node of the increasing cost tree: a per-agent cost budget plus the
/// cached total. Ordered by ascending total so a `BTreeSet` frontier pops the
/// cheapest vector first; a child differs from its parent by +1 in exactly
/// one entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct CostVector {
    total: usize,
    costs: Vec<usize>,
}

impl CostVector {
    fn new(costs: Vec<usize>) -> Self {
        CostVector {
            total: costs.iter().sum(),
            costs,
        }
    }

    fn child(&self, agent: usize) -> Self {
        let mut costs = self.costs.clone();
        costs[agent] += 1;
        CostVector {
            total: self.total + 1,
            costs,
        }
    }
}

/// Increasing-cost-tree solver. Seeds the frontier with each agent's minimum
/// individual cost and tests cost combinations lowest total first. Exhaustion
/// (cap hit, empty frontier, or an agent with no path at all) is reported as
/// `Exhausted` so the planner can run the mandatory pairwise fallback.
pub struct ICTS {
    agents: Vec<Agent>,
    map: Map,
    stats: Stats,
}

impl ICTS {
    pub fn new(agents: Vec<Agent>, map: &Map) -> Self {
        ICTS {
            agents,
            map: map.clone(),
            stats: Stats::default(),
        }
    }
}

impl Solver for ICTS {
    fn solve(&mut self, config: &Config) -> SolveOutcome {
        let total_solve_start_time = Instant::now();

        // Per-agent minimum costs seed the root vector; every later vector
        // entry stays at or above them.
        let mut min_costs = Vec::with_capacity(self.agents.len());
        for agent in &self.agents {
            match a_star_search(&self.map, agent.start, agent.goal, &mut self.stats) {
                Some(path) => min_costs.push(path.len() - 1),
                None => {
                    debug!("agent {} has no path at all", agent.id);
                    return SolveOutcome::Exhausted;
                }
            }
        }

        let mut open = BTreeSet::new();
        open.insert(CostVector::new(min_costs));

        for _ in 0..config.cost_tree_iteration_cap {
            let Some(vector) = open.pop_first() else {
                break;
            };
            debug!("testing cost vector {vector:?}");
            self.stats.high_level_expand_nodes += 1;

            // Every agent must fit its budget exactly; otherwise the vector
            // is infeasible and generates no children.
            let mut paths = Vec::with_capacity(self.agents.len());
            let mut feasible = true;
            for (agent, &budget) in self.agents.iter().zip(&vector.costs) {
                match a_star_search_with_cost(
                    &self.map,
                    agent.start,
                    agent.goal,
                    budget,
                    &mut self.stats,
                ) {
                    Some(path) => paths.push(path),
                    None => {
                        feasible = false;
                        break;
                    }
                }
            }
            if !feasible {
                continue;
            }

            if !has_conflict(&paths) {
                self.stats.time_ms = total_solve_start_time.elapsed().as_micros() as usize;
                let solution = Solution { paths };
                self.stats.costs = solution.total_cost();
                self.stats.print("ICTS", config);
                return SolveOutcome::Solved(solution);
            }

            for agent in 0..self.agents.len() {
                open.insert(vector.child(agent));
            }
        }

        SolveOutcome::Exhausted
    }
}
