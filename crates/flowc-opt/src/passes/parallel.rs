//! Parallelism detection (level 2)
//!
//! Promotes a node's kind to `parallel` when the step marked it
//! parallelizable and nothing blocks it: at most one incoming edge and
//! only `void` outgoing edges. Any non-void outgoing edge or a second
//! incoming edge keeps the node as-is.

use crate::{Pass, PassParams};
use flowc_ir::{IrProgram, NodeKind};

pub struct ParallelDetection;

impl Pass for ParallelDetection {
    fn name(&self) -> &'static str {
        "parallel-detection"
    }

    fn level(&self) -> u8 {
        2
    }

    fn run(&self, program: &mut IrProgram, _params: &PassParams) -> Result<usize, String> {
        let candidates: Vec<String> = program
            .nodes
            .iter()
            .filter(|n| n.parallelizable && n.kind != NodeKind::Parallel)
            .filter(|n| program.incoming_edges(&n.id).count() <= 1)
            .filter(|n| program.outgoing_edges(&n.id).all(|e| e.data_type.is_void()))
            .map(|n| n.id.clone())
            .collect();

        for id in &candidates {
            if let Some(node) = program.get_node_mut(id) {
                node.kind = NodeKind::Parallel;
            }
        }
        Ok(candidates.len())
    }
}
