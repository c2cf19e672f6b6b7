use crate::solver::Strategy;

use anyhow::anyhow;
use clap::Parser;

/// Pairwise replanning gives up after this many replans.
pub const PAIRWISE_ITERATION_CAP: usize = 1000;
/// The cost-tree search tests at most this many cost vectors before the
/// pairwise fallback takes over.
pub const COST_TREE_ITERATION_CAP: usize = 100;

#[derive(Parser, Debug)]
#[command(
    name = "mapf_grid",
    about = "Multi-agent path planning on occupancy grids.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to the map file", default_value = "maps/cross.map")]
    pub map_path: String,

    #[arg(
        long,
        help = "Path to the YAML scenario file with start/goal routes",
        default_value = "scenarios/cross.yaml"
    )]
    pub scenario_path: String,

    #[arg(long, help = "Write a JSON run summary to this path")]
    pub output_path: Option<String>,

    #[arg(long, help = "Number of agents", default_value_t = 2)]
    pub num_agents: usize,

    #[arg(
        long,
        help = "Generate agents randomly instead of reading the scenario",
        default_value_t = false
    )]
    pub random_agents: bool,

    #[arg(long, help = "Seed for random agent generation", default_value_t = 0)]
    pub seed: usize,

    #[arg(long, value_enum, help = "Resolution strategy", default_value_t = Strategy::Icts)]
    pub strategy: Strategy,

    #[arg(long, help = "Iteration cap for pairwise replanning", default_value_t = PAIRWISE_ITERATION_CAP)]
    pub pairwise_iteration_cap: usize,

    #[arg(long, help = "Iteration cap for the cost-tree search", default_value_t = COST_TREE_ITERATION_CAP)]
    pub cost_tree_iteration_cap: usize,

    #[arg(
        long,
        help = "Maximum execution ticks before declaring a stall",
        default_value_t = 10_000
    )]
    pub max_ticks: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub map_path: String,
    pub scenario_path: String,
    pub output_path: Option<String>,
    pub num_agents: usize,
    pub random_agents: bool,
    pub seed: usize,
    pub strategy: Strategy,
    pub pairwise_iteration_cap: usize,
    pub cost_tree_iteration_cap: usize,
    pub max_ticks: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            map_path: String::new(),
            scenario_path: String::new(),
            output_path: None,
            num_agents: 0,
            random_agents: false,
            seed: 0,
            strategy: Strategy::Icts,
            pairwise_iteration_cap: PAIRWISE_ITERATION_CAP,
            cost_tree_iteration_cap: COST_TREE_ITERATION_CAP,
            max_ticks: 10_000,
        }
    }
}

impl Config {
    pub fn new(cli: &Cli) -> Self {
        Self {
            map_path: cli.map_path.clone(),
            scenario_path: cli.scenario_path.clone(),
            output_path: cli.output_path.clone(),
            num_agents: cli.num_agents,
            random_agents: cli.random_agents,
            seed: cli.seed,
            strategy: cli.strategy,
            pairwise_iteration_cap: cli.pairwise_iteration_cap,
            cost_tree_iteration_cap: cli.cost_tree_iteration_cap,
            max_ticks: cli.max_ticks,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.num_agents == 0 {
            return Err(anyhow!("at least one agent is required"));
        }
        if self.pairwise_iteration_cap == 0 {
            return Err(anyhow!("pairwise iteration cap must be at least 1"));
        }
        if self.cost_tree_iteration_cap == 0 {
            return Err(anyhow!("cost-tree iteration cap must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_caps_match_policy_values() {
        let config = Config::default();
        assert_eq!(config.pairwise_iteration_cap, 1000);
        assert_eq!(config.cost_tree_iteration_cap, 100);
    }

    #[test]
    fn zero_caps_are_rejected() {
        let config = Config {
            num_agents: 2,
            cost_tree_iteration_cap: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
