use mapf_grid::common::Agent;
use mapf_grid::config::{Cli, Config};
use mapf_grid::exec::Execution;
use mapf_grid::map::Map;
use mapf_grid::scenario::Scenario;
use mapf_grid::solver::plan;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct RunSummary<'a> {
    strategy: mapf_grid::solver::Strategy,
    solved: bool,
    fell_back: bool,
    total_cost: usize,
    makespan: usize,
    ticks: usize,
    all_reached: bool,
    agents: &'a [Agent],
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::new(&cli);
    config.validate()?;

    let map = Map::from_file(&config.map_path)
        .with_context(|| format!("error loading map {}", config.map_path))?;

    let agents = if config.random_agents {
        let mut rng = StdRng::seed_from_u64(config.seed as u64);
        Scenario::generate_random(&map, config.num_agents, &mut rng)?
    } else {
        let scenario = Scenario::load_from_yaml(&config.scenario_path)
            .with_context(|| format!("error loading scenario {}", config.scenario_path))?;
        scenario.to_agents(config.num_agents)?
    };
    for agent in &agents {
        if !agent.verify(&map) {
            warn!("agent {} start or goal is blocked; it will not path", agent.id);
        }
    }

    let result = plan(&agents, &map, config.strategy, &config);
    if !result.solution.verify(&map, &agents) {
        warn!("solution failed verification");
    }
    info!(
        "planned with {:?}: solved {}, fell back {}, total cost {}, makespan {}",
        config.strategy,
        result.solved,
        result.fell_back,
        result.solution.total_cost(),
        result.solution.makespan()
    );

    // Drive execution to completion or a stall. Rendering and tick pacing
    // belong to the caller layer; here every tick is immediate.
    let mut execution = Execution::new(&agents, &result.solution);
    let mut ticks = 0;
    while !execution.all_reached() && ticks < config.max_ticks {
        execution.advance();
        ticks += 1;
    }
    if execution.all_reached() {
        info!("all agents reached their targets after {ticks} ticks");
    } else {
        warn!("execution stalled after {ticks} ticks");
    }

    if let Some(output_path) = &config.output_path {
        let summary = RunSummary {
            strategy: config.strategy,
            solved: result.solved,
            fell_back: result.fell_back,
            total_cost: result.solution.total_cost(),
            makespan: result.solution.makespan(),
            ticks,
            all_reached: execution.all_reached(),
            agents: &agents,
        };
        std::fs::write(output_path, serde_json::to_string_pretty(&summary)?)
            .with_context(|| format!("error writing summary {output_path}"))?;
        info!("wrote run summary to {output_path}");
    }

    Ok(())
}
