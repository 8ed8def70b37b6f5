//! NodeJS Backend - generic host-runtime JavaScript
//!
//! Emits a plain CommonJS module: one async function per node plus an
//! `execute` driver that walks the edges from the entry points.

use crate::{identifier, CodeGen};
use flowc_ir::{IrProgram, NodeKind};
use std::fmt::Write;

/// JavaScript host-runtime backend
#[derive(Debug, Default)]
pub struct NodeJsBackend;

impl NodeJsBackend {
    pub fn new() -> Self {
        Self
    }

    fn emit_node_fn(&self, out: &mut String, program: &IrProgram, index: usize) {
        let node = &program.nodes[index];
        let name = format!("{}_{}", identifier(&node.operation), index);

        let _ = writeln!(out, "/** {} `{}` (cost {}) */", node.kind, node.operation, node.metadata.cost);
        let _ = writeln!(out, "async function {}(input) {{", name);
        match node.kind {
            NodeKind::Condition => {
                let _ = writeln!(out, "  return {{ branch: Boolean(input) ? 'true' : 'false', value: input }};");
            }
            NodeKind::Loop => {
                let _ = writeln!(out, "  const results = [];");
                let _ = writeln!(out, "  for (const item of input ?? []) {{");
                let _ = writeln!(out, "    results.push(await processItem(item));");
                let _ = writeln!(out, "  }}");
                let _ = writeln!(out, "  return results;");
            }
            NodeKind::Parallel | NodeKind::Split => {
                let branches = node.outputs.len().max(1);
                let _ = writeln!(out, "  return Promise.all(Array.from({{ length: {} }}, () => input));", branches);
            }
            NodeKind::Merge => {
                let _ = writeln!(out, "  return [].concat(...arguments);");
            }
            _ => {
                if let Some(value) = node.outputs.iter().find_map(|o| o.value.as_ref()) {
                    let _ = writeln!(out, "  return {};", value);
                } else {
                    let _ = writeln!(out, "  return runtime.invoke('{}', input);", node.operation);
                }
            }
        }
        let _ = writeln!(out, "}}");
        let _ = writeln!(out);
    }
}

impl CodeGen for NodeJsBackend {
    fn target(&self) -> &'static str {
        "nodejs"
    }

    fn emit(&self, program: &IrProgram) -> Result<String, String> {
        let mut out = String::new();
        let _ = writeln!(out, "// Generated by flowc");
        let _ = writeln!(out, "// program: {} v{}", program.name, program.version);
        let _ = writeln!(out, "// nodes:");
        for node in &program.nodes {
            let _ = writeln!(out, "//   {} {}", node.kind, node.operation);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "'use strict';");
        let _ = writeln!(out, "const runtime = require('./runtime');");
        let _ = writeln!(out);

        for index in 0..program.nodes.len() {
            self.emit_node_fn(&mut out, program, index);
        }

        let _ = writeln!(out, "async function execute(input) {{");
        let _ = writeln!(out, "  const graph = {{");
        for node in &program.nodes {
            let next: Vec<String> = program
                .outgoing_edges(&node.id)
                .map(|e| format!("'{}'", e.to))
                .collect();
            let _ = writeln!(out, "    '{}': [{}],", node.id, next.join(", "));
        }
        let _ = writeln!(out, "  }};");
        let entries: Vec<String> = program
            .entry_points
            .iter()
            .map(|id| format!("'{}'", id))
            .collect();
        let _ = writeln!(out, "  return runtime.walk(graph, [{}], input);", entries.join(", "));
        let _ = writeln!(out, "}}");
        let _ = writeln!(out);
        let _ = writeln!(out, "module.exports = {{ execute }};");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_ir::{DataType, IrEdge, IrNode, IrOutput};
    use serde_json::json;

    #[test]
    fn test_emit_lists_program_and_nodes() {
        let mut program = IrProgram::new("orders", "2.0.0");
        program.add_node(IrNode::new("n0", NodeKind::Operation, "fetch-orders"));
        program.add_node(IrNode::new("n1", NodeKind::Condition, "gate"));
        program.add_edge(IrEdge::new("e0", "n0", "n1", DataType::Void, 1.0));
        program.entry_points.push("n0".into());

        let source = NodeJsBackend::new().emit(&program).unwrap();
        assert!(source.contains("// program: orders v2.0.0"));
        assert!(source.contains("//   operation fetch-orders"));
        assert!(source.contains("async function fetch_orders_0"));
        assert!(source.contains("'n0': ['n1'],"));
    }

    #[test]
    fn test_folded_constant_is_inlined() {
        let mut program = IrProgram::new("consts", "1.0.0");
        let mut node = IrNode::new("n0", NodeKind::Operation, "constant");
        node.outputs
            .push(IrOutput::new("p0", "value", DataType::Int).with_value(json!(5)));
        program.add_node(node);

        let source = NodeJsBackend::new().emit(&program).unwrap();
        assert!(source.contains("return 5;"));
    }
}
