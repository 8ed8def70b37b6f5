//! Rust Backend - statically-typed output
//!
//! Emits self-contained Rust source: a typed function per node and an
//! `execute` driver following the edge order. Port types map onto Rust
//! types via [`rust_type`].

use crate::{identifier, CodeGen};
use flowc_ir::{DataType, IrProgram, NodeKind};
use std::fmt::Write;

/// Statically-typed Rust backend
#[derive(Debug, Default)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

fn rust_type(ty: DataType) -> &'static str {
    match ty {
        DataType::Void => "()",
        DataType::Bool => "bool",
        DataType::Int => "i64",
        DataType::Float => "f64",
        DataType::String => "String",
        DataType::Array => "Vec<Value>",
        // Semantic-layer and domain values stay dynamically typed
        _ => "Value",
    }
}

impl CodeGen for RustBackend {
    fn target(&self) -> &'static str {
        "rust"
    }

    fn emit(&self, program: &IrProgram) -> Result<String, String> {
        let mut out = String::new();
        let _ = writeln!(out, "//! Generated by flowc");
        let _ = writeln!(out, "//! program: {} v{}", program.name, program.version);
        let _ = writeln!(out, "//! nodes:");
        for node in &program.nodes {
            let _ = writeln!(out, "//!   {} {}", node.kind, node.operation);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "use serde_json::Value;");
        let _ = writeln!(out);

        for (index, node) in program.nodes.iter().enumerate() {
            let name = format!("{}_{}", identifier(&node.operation), index);
            let ret = node
                .outputs
                .first()
                .map(|o| rust_type(o.data_type))
                .unwrap_or("()");

            let _ = writeln!(out, "/// {} `{}`", node.kind, node.operation);
            let _ = writeln!(out, "pub async fn {}(input: Value) -> {} {{", name, ret);
            match node.kind {
                NodeKind::Condition => {
                    let _ = writeln!(out, "    input.as_bool().unwrap_or(false)");
                }
                NodeKind::Loop => {
                    let _ = writeln!(out, "    let items = input.as_array().cloned().unwrap_or_default();");
                    let _ = writeln!(out, "    items.into_iter().collect()");
                }
                _ => {
                    if let Some(value) = node.outputs.iter().find_map(|o| o.value.as_ref()) {
                        match ret {
                            "i64" | "f64" | "bool" => {
                                let _ = writeln!(out, "    {}", value);
                            }
                            "String" => {
                                let _ = writeln!(out, "    {}.to_string()", value);
                            }
                            _ => {
                                let _ = writeln!(out, "    serde_json::json!({})", value);
                            }
                        }
                    } else if ret == "()" {
                        let _ = writeln!(out, "    let _ = input;");
                    } else {
                        let _ = writeln!(out, "    todo!(\"bind `{}` to the host\")", node.operation);
                    }
                }
            }
            let _ = writeln!(out, "}}");
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "/// Edge order: {} edges", program.edges.len());
        let _ = writeln!(out, "pub async fn execute(input: Value) -> Value {{");
        let _ = writeln!(out, "    let mut current = input;");
        for edge in &program.edges {
            let _ = writeln!(
                out,
                "    // {} -> {} ({})",
                edge.from, edge.to, edge.data_type
            );
        }
        let _ = writeln!(out, "    current.take()");
        let _ = writeln!(out, "}}");
        Ok(out)
    }
}
