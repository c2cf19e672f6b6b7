use crate::common::{Cell, Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum ConflictType {
    /// Two agents on the same cell at the same step.
    Vertex { position: Cell, time_step: usize },
    /// Two agents swapping cells between consecutive steps.
    Edge { u: Cell, v: Cell, time_step: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Conflict {
    pub(crate) agent_1: usize,
    pub(crate) agent_2: usize,
    pub(crate) conflict_type: ConflictType,
}

/// Position of an agent at a discrete step: its path cell while en route, its
/// final cell once finished. `None` for agents without a path; they hold no
/// cell and cannot conflict.
pub(crate) fn position_at(path: &Path, step: usize) -> Option<Cell> {
    match path.get(step) {
        Some(cell) => Some(*cell),
        None => path.last().copied(),
    }
}

/// Earliest conflict between any pair of paths: pairs scanned in (i, j) index
/// order with i < j, steps from 0 through the longest path's last step.
pub(crate) fn first_conflict(paths: &[Path]) -> Option<Conflict> {
    let max_length = paths.iter().map(Vec::len).max().unwrap_or(0);

    for i in 0..paths.len() {
        for j in (i + 1)..paths.len() {
            let (path1, path2) = (&paths[i], &paths[j]);

            for step in 0..max_length {
                let (Some(pos1), Some(pos2)) = (position_at(path1, step), position_at(path2, step))
                else {
                    continue;
                };

                if pos1 == pos2 {
                    return Some(Conflict {
                        agent_1: i,
                        agent_2: j,
                        conflict_type: ConflictType::Vertex {
                            position: pos1,
                            time_step: step,
                        },
                    });
                }

                // A finished agent stays put and cannot take part in a swap.
                if step == 0 || step >= path1.len() || step >= path2.len() {
                    continue;
                }
                if path1[step - 1] == pos2 && path2[step - 1] == pos1 {
                    return Some(Conflict {
                        agent_1: i,
                        agent_2: j,
                        conflict_type: ConflictType::Edge {
                            u: pos1,
                            v: pos2,
                            time_step: step,
                        },
                    });
                }
            }
        }
    }

    None
}

pub(crate) fn has_conflict(paths: &[Path]) -> bool {
    first_conflict(paths).is_some()
}
