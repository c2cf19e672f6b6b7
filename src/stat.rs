use crate::config::Config;

use serde::Serialize;
use tracing::info;

/// Counters for one solve. Low level counts A* node expansions, high level
/// counts resolver iterations (replans or cost vectors tested).
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub costs: usize,
    pub time_ms: usize,
    pub low_level_expand_nodes: usize,
    pub high_level_expand_nodes: usize,
}

impl Stats {
    pub(crate) fn print(&self, solver: &str, config: &Config) {
        info!(
            "{solver} on {:?}: cost {:?} time(us) {:?} high level expansions {:?} low level expansions {:?}",
            config.map_path,
            self.costs,
            self.time_ms,
            self.high_level_expand_nodes,
            self.low_level_expand_nodes
        );
    }
}
