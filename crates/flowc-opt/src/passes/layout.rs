//! Memory layout (level 3)
//!
//! Stable-sorts the node list by (operation, memory footprint) so nodes
//! with the same operation and similar footprints land adjacently in
//! generated code. Ids and edges are untouched; only the listing order
//! changes.

use crate::{Pass, PassParams};
use flowc_ir::IrProgram;
use std::cmp::Ordering;

pub struct MemoryLayout;

impl Pass for MemoryLayout {
    fn name(&self) -> &'static str {
        "memory-layout"
    }

    fn level(&self) -> u8 {
        3
    }

    fn run(&self, program: &mut IrProgram, _params: &PassParams) -> Result<usize, String> {
        let before: Vec<String> = program.nodes.iter().map(|n| n.id.clone()).collect();

        program.nodes.sort_by(|a, b| {
            match a.operation.cmp(&b.operation) {
                Ordering::Equal => a.metadata.memory.total_cmp(&b.metadata.memory),
                other => other,
            }
        });

        let moved = program
            .nodes
            .iter()
            .zip(before.iter())
            .filter(|(node, old_id)| node.id != **old_id)
            .count();
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_ir::{DataType, IrEdge, IrNode, NodeKind};

    fn node(id: &str, operation: &str, memory: f64) -> IrNode {
        let mut n = IrNode::new(id, NodeKind::Operation, operation);
        n.metadata.memory = memory;
        n
    }

    #[test]
    fn test_sorts_by_operation_then_memory() {
        let mut program = IrProgram::new("layout", "1.0.0");
        program.add_node(node("n0", "store", 64.0));
        program.add_node(node("n1", "fetch", 128.0));
        program.add_node(node("n2", "fetch", 32.0));
        program.add_edge(IrEdge::new("e0", "n0", "n1", DataType::Void, 1.0));

        let moved = MemoryLayout.run(&mut program, &PassParams::new()).unwrap();

        let order: Vec<&str> = program.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["n2", "n1", "n0"]);
        assert_eq!(moved, 3);
        // Edges are untouched
        assert_eq!(program.edges[0].from, "n0");
    }

    #[test]
    fn test_sorted_input_reports_zero_impact() {
        let mut program = IrProgram::new("layout", "1.0.0");
        program.add_node(node("n0", "fetch", 32.0));
        program.add_node(node("n1", "fetch", 128.0));
        program.add_node(node("n2", "store", 64.0));

        let moved = MemoryLayout.run(&mut program, &PassParams::new()).unwrap();
        assert_eq!(moved, 0);
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let mut program = IrProgram::new("layout", "1.0.0");
        program.add_node(node("n0", "fetch", 64.0));
        program.add_node(node("n1", "fetch", 64.0));

        MemoryLayout.run(&mut program, &PassParams::new()).unwrap();
        let order: Vec<&str> = program.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["n0", "n1"]);
    }
}
