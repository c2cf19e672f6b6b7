use crate::common::{Agent, Cell};
use crate::map::Map;

use anyhow::{anyhow, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub start: [usize; 2],
    pub goal: [usize; 2],
}

/// Caller-side description of a planning run: an ordered list of start/goal
/// routes, loaded from YAML or generated randomly on a map. The planner
/// itself never touches files or randomness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub routes: Vec<Route>,
}

impl Scenario {
    pub fn load_from_yaml(path: &str) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let scenario = serde_yaml::from_reader(reader)?;
        Ok(scenario)
    }

    /// The first `num_agents` routes, in file order, as agents.
    pub fn to_agents(&self, num_agents: usize) -> Result<Vec<Agent>> {
        if self.routes.len() < num_agents {
            return Err(anyhow!(
                "scenario has {} routes, {} agents requested",
                self.routes.len(),
                num_agents
            ));
        }
        Ok(self
            .routes
            .iter()
            .take(num_agents)
            .enumerate()
            .map(|(id, route)| Agent {
                id,
                start: Cell::new(route.start[0], route.start[1]),
                goal: Cell::new(route.goal[0], route.goal[1]),
            })
            .collect())
    }

    /// Random distinct passable starts and goals. Determinism comes from the
    /// caller's seeded RNG.
    pub fn generate_random<R: Rng + ?Sized>(
        map: &Map,
        num_agents: usize,
        rng: &mut R,
    ) -> Result<Vec<Agent>> {
        let free_cells: Vec<Cell> = (0..map.height)
            .flat_map(|y| (0..map.width).map(move |x| Cell::new(x, y)))
            .filter(|&cell| map.is_passable(cell))
            .collect();

        if free_cells.len() < num_agents * 2 {
            return Err(anyhow!(
                "map has {} free cells, {} agents need {}",
                free_cells.len(),
                num_agents,
                num_agents * 2
            ));
        }

        let mut taken = HashSet::new();
        let mut pick = |rng: &mut R| loop {
            let cell = *free_cells.choose(rng).unwrap();
            if taken.insert(cell) {
                return cell;
            }
        };

        let agents: Vec<Agent> = (0..num_agents)
            .map(|id| {
                let start = pick(rng);
                let goal = pick(rng);
                Agent { id, start, goal }
            })
            .collect();

        info!("generated agents: {agents:?}");
        Ok(agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn yaml_round_trip() {
        let scenario = Scenario {
            routes: vec![
                Route {
                    start: [0, 2],
                    goal: [4, 2],
                },
                Route {
                    start: [2, 0],
                    goal: [2, 4],
                },
            ],
        };
        let text = serde_yaml::to_string(&scenario).unwrap();
        let parsed: Scenario = serde_yaml::from_str(&text).unwrap();
        let agents = parsed.to_agents(2).unwrap();
        assert_eq!(agents[0].start, Cell::new(0, 2));
        assert_eq!(agents[1].goal, Cell::new(2, 4));
    }

    #[test]
    fn requesting_more_agents_than_routes_fails() {
        let scenario = Scenario { routes: vec![] };
        assert!(scenario.to_agents(1).is_err());
    }

    #[test]
    fn random_generation_is_seed_deterministic() {
        let map = Map::open(8, 8);
        let first = Scenario::generate_random(&map, 4, &mut StdRng::seed_from_u64(7)).unwrap();
        let second = Scenario::generate_random(&map, 4, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);

        let mut cells = HashSet::new();
        for agent in &first {
            assert!(agent.verify(&map));
            assert!(cells.insert(agent.start));
            assert!(cells.insert(agent.goal));
        }
    }
}
