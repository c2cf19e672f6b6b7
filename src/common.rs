use crate::map::Map;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A grid cell. Ordered lexicographically by x then y so it can key
/// `BTreeSet`/`BTreeMap` frontiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Cell { x, y }
    }

    /// Manhattan distance, admissible and consistent on a 4-connected
    /// unit-cost grid.
    pub fn manhattan(&self, other: Cell) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Ordered cell sequence from start to goal, start included. An empty path
/// means "no path found".
pub type Path = Vec<Cell>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: usize,
    pub start: Cell,
    pub goal: Cell,
}

impl Agent {
    /// Start and goal must be in bounds and on passable cells. Violations are
    /// tolerated by the planner (the agent simply fails to path), but callers
    /// usually want to know up front.
    pub fn verify(&self, map: &Map) -> bool {
        map.is_passable(self.start) && map.is_passable(self.goal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// One path per agent, in agent-id order. Empty for unreachable agents.
    pub paths: Vec<Path>,
}

impl Solution {
    /// Sum of per-agent traversal costs (path length minus one).
    pub fn total_cost(&self) -> usize {
        self.paths
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.len() - 1)
            .sum()
    }

    /// Longest path length minus one; the step at which every agent that has
    /// a path is settled on its final cell.
    pub fn makespan(&self) -> usize {
        self.paths
            .iter()
            .map(|p| p.len().saturating_sub(1))
            .max()
            .unwrap_or(0)
    }

    /// Position of an agent at a discrete step. Agents that have finished
    /// stay at their final cell; agents without a path have no position.
    pub fn position_at(&self, agent: usize, step: usize) -> Option<Cell> {
        let path = self.paths.get(agent)?;
        match path.get(step) {
            Some(cell) => Some(*cell),
            None => path.last().copied(),
        }
    }

    /// Frozen per-step position table implied by the paths, one row per step
    /// from 0 through the makespan.
    pub fn timeline(&self) -> Vec<Vec<Option<Cell>>> {
        (0..=self.makespan())
            .map(|step| {
                (0..self.paths.len())
                    .map(|agent| self.position_at(agent, step))
                    .collect()
            })
            .collect()
    }

    /// Every non-empty path must start at the agent's start, end at its goal,
    /// and only ever move between passable 4-neighbors (or stay put).
    pub fn verify(&self, map: &Map, agents: &[Agent]) -> bool {
        if self.paths.len() != agents.len() {
            return false;
        }
        for (agent, path) in agents.iter().zip(&self.paths) {
            if path.is_empty() {
                continue;
            }
            if path[0] != agent.start || *path.last().unwrap() != agent.goal {
                return false;
            }
            for window in path.windows(2) {
                let (from, to) = (window[0], window[1]);
                if !map.is_passable(to) {
                    return false;
                }
                if from.manhattan(to) > 1 {
                    return false;
                }
            }
        }
        true
    }
}
