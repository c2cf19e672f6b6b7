mod astar;

pub(crate) use astar::{a_star_search, a_star_search_with_cost};

use crate::common::{Cell, Path};
use std::collections::HashMap;

/// Walks predecessor links back from the goal and reverses. Predecessors are
/// stored as cells and re-looked-up in the trace map, so the search tree
/// never holds references into itself.
pub(crate) fn construct_path(trace: &HashMap<Cell, Cell>, goal: Cell) -> Path {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&previous) = trace.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}
