//! Dead code elimination (level 1)
//!
//! BFS reachability from the program's entry points following outgoing
//! edges; every node and edge not reached is removed. Idempotent: a second
//! run over the result is a no-op.

use crate::{Pass, PassParams};
use flowc_ir::IrProgram;
use std::collections::{HashSet, VecDeque};

pub struct DeadCodeElimination;

impl Pass for DeadCodeElimination {
    fn name(&self) -> &'static str {
        "dead-code-elimination"
    }

    fn level(&self) -> u8 {
        1
    }

    fn run(&self, program: &mut IrProgram, _params: &PassParams) -> Result<usize, String> {
        let mut reached: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = program.entry_points.iter().cloned().collect();

        while let Some(id) = queue.pop_front() {
            if !reached.insert(id.clone()) {
                continue;
            }
            for edge in program.outgoing_edges(&id) {
                if !reached.contains(&edge.to) {
                    queue.push_back(edge.to.clone());
                }
            }
        }

        let before = program.nodes.len();
        program.nodes.retain(|n| reached.contains(&n.id));
        program
            .edges
            .retain(|e| reached.contains(&e.from) && reached.contains(&e.to));
        program.exit_points.retain(|id| reached.contains(id));

        Ok(before - program.nodes.len())
    }
}
