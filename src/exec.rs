use crate::common::{Agent, Cell, Solution};

use std::collections::HashSet;
use tracing::debug;

/// Execution view of one agent: its planned path, how far along it is, and
/// whether it has arrived. The progress index only ever moves forward.
#[derive(Debug, Clone)]
pub struct AgentRun {
    pub id: usize,
    pub path: Vec<Cell>,
    pub progress: usize,
    pub reached: bool,
}

impl AgentRun {
    pub fn position(&self) -> Option<Cell> {
        self.path.get(self.progress).copied()
    }
}

/// Advances agents one step per tick along their precomputed paths. An agent
/// whose next cell is held by an already-finished agent waits; the
/// occupied-target set is rebuilt at the start of each tick from agents that
/// had finished by the end of the previous one, so same-tick arrivals never
/// block anyone until the following tick.
///
/// Two agents that only ever wait on each other deadlock here; residual
/// conflicts from best-effort planning are tolerated, not retried.
#[derive(Debug, Clone)]
pub struct Execution {
    runs: Vec<AgentRun>,
    occupied_targets: HashSet<Cell>,
}

impl Execution {
    pub fn new(agents: &[Agent], solution: &Solution) -> Self {
        let runs = agents
            .iter()
            .map(|agent| {
                let path = solution.paths.get(agent.id).cloned().unwrap_or_default();
                // A single-cell path starts on its goal.
                let reached = path.len() == 1;
                AgentRun {
                    id: agent.id,
                    path,
                    progress: 0,
                    reached,
                }
            })
            .collect();
        Execution {
            runs,
            occupied_targets: HashSet::new(),
        }
    }

    /// One tick: fold the previous tick's arrivals into the occupied-target
    /// set, then move every unfinished agent at most one step. Returns the
    /// "all agents reached" aggregate.
    pub fn advance(&mut self) -> bool {
        for run in &self.runs {
            if run.reached {
                if let Some(&target) = run.path.last() {
                    self.occupied_targets.insert(target);
                }
            }
        }

        for run in &mut self.runs {
            if run.reached || run.path.is_empty() {
                continue;
            }

            let next = run.path[run.progress + 1];
            if self.occupied_targets.contains(&next) {
                debug!("agent {} waits: {next} is an occupied target", run.id);
                continue;
            }

            run.progress += 1;
            if run.progress == run.path.len() - 1 {
                run.reached = true;
            }
        }

        self.all_reached()
    }

    /// True once every agent sits on its target. Agents without a path keep
    /// this false forever.
    pub fn all_reached(&self) -> bool {
        self.runs.iter().all(|run| run.reached)
    }

    pub fn runs(&self) -> &[AgentRun] {
        &self.runs
    }

    pub fn positions(&self) -> Vec<Option<Cell>> {
        self.runs.iter().map(AgentRun::position).collect()
    }
}
