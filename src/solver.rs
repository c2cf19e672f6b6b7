mod algorithm;
mod comm;
mod icts;
mod pp;

pub use icts::ICTS;
pub use pp::PP;

use crate::common::{Agent, Solution};
use crate::config::Config;
use crate::map::Map;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// What a resolution strategy produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Conflict-free paths for every agent that could be pathed.
    Solved(Solution),
    /// Iteration budget spent; the paths may still conflict (or be empty).
    BestEffort(Solution),
    /// Frontier emptied or budget spent without any usable combination.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum Strategy {
    /// Iterative pairwise replanning: the lower-indexed agent's path becomes
    /// a static obstacle for the higher-indexed one.
    Pp,
    /// Increasing-cost-tree search over per-agent cost budgets, falling back
    /// to pairwise replanning on exhaustion.
    Icts,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Pp => "pp",
            Strategy::Icts => "icts",
        })
    }
}

pub trait Solver {
    fn solve(&mut self, config: &Config) -> SolveOutcome;
}

/// Final planner verdict handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanResult {
    pub solution: Solution,
    /// False when the paths are best-effort and may still conflict.
    pub solved: bool,
    /// True when the cost-tree search exhausted and pairwise replanning ran.
    pub fell_back: bool,
}

/// Planner as a small state machine so the ICTS → PP fallback transition is
/// observable on its own rather than buried in a nested call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerState {
    Attempt(Strategy),
    Done,
}

pub struct Planner<'a> {
    agents: &'a [Agent],
    map: &'a Map,
    pub state: PlannerState,
    fell_back: bool,
    result: Option<PlanResult>,
}

impl<'a> Planner<'a> {
    pub fn new(agents: &'a [Agent], map: &'a Map, strategy: Strategy) -> Self {
        Planner {
            agents,
            map,
            state: PlannerState::Attempt(strategy),
            fell_back: false,
            result: None,
        }
    }

    /// Runs one attempt and advances the state machine.
    pub fn step(&mut self, config: &Config) {
        let PlannerState::Attempt(strategy) = self.state else {
            return;
        };

        let outcome = match strategy {
            Strategy::Pp => PP::new(self.agents.to_vec(), self.map).solve(config),
            Strategy::Icts => ICTS::new(self.agents.to_vec(), self.map).solve(config),
        };
        debug!("strategy {strategy:?} finished");

        match outcome {
            SolveOutcome::Solved(solution) => {
                self.result = Some(PlanResult {
                    solution,
                    solved: true,
                    fell_back: self.fell_back,
                });
                self.state = PlannerState::Done;
            }
            SolveOutcome::BestEffort(solution) => {
                self.result = Some(PlanResult {
                    solution,
                    solved: false,
                    fell_back: self.fell_back,
                });
                self.state = PlannerState::Done;
            }
            SolveOutcome::Exhausted => {
                // Mandatory fallback: whatever partial assignment the cost
                // tree made is discarded and pairwise replanning starts over.
                info!("cost-tree search exhausted, falling back to pairwise replanning");
                self.fell_back = true;
                self.state = PlannerState::Attempt(Strategy::Pp);
            }
        }
    }

    /// Drives the state machine to completion.
    pub fn run(mut self, config: &Config) -> PlanResult {
        while self.state != PlannerState::Done {
            self.step(config);
        }
        self.result
            .unwrap_or_else(|| unreachable!("planner reached Done without a result"))
    }
}

/// Plans paths for every agent with the selected strategy.
pub fn plan(agents: &[Agent], map: &Map, strategy: Strategy, config: &Config) -> PlanResult {
    Planner::new(agents, map, strategy).run(config)
}
