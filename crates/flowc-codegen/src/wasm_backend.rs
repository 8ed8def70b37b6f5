//! Wasm Backend - portable WebAssembly text format
//!
//! Emits a `.wat` module: one exported function per node (host calls are
//! imported) and a data section naming the program. The text format keeps
//! generations diffable while staying assemblable by standard tooling.

use crate::{identifier, CodeGen};
use flowc_ir::{IrProgram, NodeKind};
use std::fmt::Write;

/// Portable wasm text-format backend
#[derive(Debug, Default)]
pub struct WasmBackend;

impl WasmBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGen for WasmBackend {
    fn target(&self) -> &'static str {
        "wasm"
    }

    fn emit(&self, program: &IrProgram) -> Result<String, String> {
        let mut out = String::new();
        let _ = writeln!(out, ";; Generated by flowc");
        let _ = writeln!(out, ";; program: {} v{}", program.name, program.version);
        let _ = writeln!(out, ";; nodes:");
        for node in &program.nodes {
            let _ = writeln!(out, ";;   {} {}", node.kind, node.operation);
        }
        let _ = writeln!(out, "(module");
        let _ = writeln!(
            out,
            "  (import \"host\" \"invoke\" (func $host_invoke (param i32) (result i32)))"
        );
        let _ = writeln!(out, "  (memory (export \"memory\") 1)");
        let _ = writeln!(
            out,
            "  (data (i32.const 0) \"{} v{}\")",
            program.name, program.version
        );

        for (index, node) in program.nodes.iter().enumerate() {
            let name = format!("{}_{}", identifier(&node.operation), index);
            let _ = writeln!(
                out,
                "  (func ${} (export \"{}\") (param $input i32) (result i32)",
                name, name
            );
            match node.kind {
                NodeKind::Condition => {
                    let _ = writeln!(out, "    (i32.ne (local.get $input) (i32.const 0))");
                }
                _ => {
                    if let Some(value) = node
                        .outputs
                        .iter()
                        .find_map(|o| o.value.as_ref())
                        .and_then(|v| v.as_i64())
                    {
                        let _ = writeln!(out, "    (i32.const {})", value);
                    } else {
                        let _ = writeln!(
                            out,
                            "    (call $host_invoke (i32.const {}))",
                            index
                        );
                    }
                }
            }
            let _ = writeln!(out, "  )");
        }

        let _ = writeln!(out, ")");
        Ok(out)
    }
}
