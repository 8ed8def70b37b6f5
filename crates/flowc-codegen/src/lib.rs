//! flowc-codegen - Code generation for compiled workflow programs
//!
//! Supports multiple backends, selected by exact target name:
//! - **nodejs**: generic host-runtime JavaScript module
//! - **rust**: statically-typed Rust source
//! - **wasm**: portable WebAssembly text format
//!
//! Each backend emits the program name, version, and an ordered node
//! listing, so downstream tooling can diff generations. Output is wrapped
//! in [`GeneratedCode`] with size/checksum/timestamp metadata.

pub mod nodejs_backend;
pub mod rust_backend;
pub mod wasm_backend;

pub use nodejs_backend::NodeJsBackend;
pub use rust_backend::RustBackend;
pub use wasm_backend::WasmBackend;

use flowc_error::EngineError;
use flowc_ir::IrProgram;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for code generation backends
pub trait CodeGen: Send + Sync {
    /// Target name this backend serves (exact match)
    fn target(&self) -> &'static str;

    /// Renders the program source; deterministic for a given program
    fn emit(&self, program: &IrProgram) -> Result<String, String>;

    /// Renders and wraps the source with generation metadata
    fn generate(&self, program: &IrProgram) -> Result<GeneratedCode, EngineError> {
        let source = self
            .emit(program)
            .map_err(|message| EngineError::Generation {
                target: self.target().to_string(),
                message,
            })?;
        let metadata = CodeMetadata {
            target: self.target().to_string(),
            size: source.len(),
            checksum: checksum(&source),
            timestamp: unix_millis(),
        };
        Ok(GeneratedCode { source, metadata })
    }
}

/// Generated source plus generation metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCode {
    pub source: String,
    pub metadata: CodeMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeMetadata {
    pub target: String,
    /// Source size in bytes
    pub size: usize,
    /// FNV-1a hash of the source, hex-encoded
    pub checksum: String,
    /// Generation time, unix milliseconds
    pub timestamp: u64,
}

/// Registry of backends, selected by exact target string
#[derive(Default)]
pub struct BackendRegistry {
    backends: Vec<Box<dyn CodeGen>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the three builtin backends
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(NodeJsBackend::new()));
        registry.register(Box::new(RustBackend::new()));
        registry.register(Box::new(WasmBackend::new()));
        registry
    }

    pub fn register(&mut self, backend: Box<dyn CodeGen>) {
        self.backends.push(backend);
    }

    pub fn get(&self, target: &str) -> Option<&dyn CodeGen> {
        self.backends
            .iter()
            .find(|b| b.target() == target)
            .map(|b| b.as_ref())
    }

    pub fn targets(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.target()).collect()
    }
}

/// FNV-1a over the source bytes
fn checksum(source: &str) -> String {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;
    let mut hash = FNV_OFFSET;
    for byte in source.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    format!("{:016x}", hash)
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Sanitizes an operation name into a host-language identifier
pub(crate) fn identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if i == 0 && c.is_ascii_digit() {
                out.push('_');
            }
            out.push(c);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_ir::{IrNode, NodeKind};

    fn program() -> IrProgram {
        let mut p = IrProgram::new("demo", "1.0.0");
        p.add_node(IrNode::new("n0", NodeKind::Operation, "fetch"));
        p.target_platforms = vec!["nodejs".into(), "rust".into(), "wasm".into()];
        p
    }

    #[test]
    fn test_builtin_registry_targets() {
        let registry = BackendRegistry::builtin();
        assert_eq!(registry.targets(), vec!["nodejs", "rust", "wasm"]);
        assert!(registry.get("nodejs").is_some());
        assert!(registry.get("jvm").is_none());
    }

    #[test]
    fn test_generate_fills_metadata() {
        let registry = BackendRegistry::builtin();
        let code = registry.get("nodejs").unwrap().generate(&program()).unwrap();
        assert_eq!(code.metadata.target, "nodejs");
        assert_eq!(code.metadata.size, code.source.len());
        assert_eq!(code.metadata.checksum.len(), 16);
        assert!(code.metadata.timestamp > 0);
    }

    #[test]
    fn test_checksum_is_content_addressed() {
        assert_eq!(checksum("abc"), checksum("abc"));
        assert_ne!(checksum("abc"), checksum("abd"));
    }

    #[test]
    fn test_source_is_deterministic_per_program() {
        let registry = BackendRegistry::builtin();
        let p = program();
        for target in ["nodejs", "rust", "wasm"] {
            let a = registry.get(target).unwrap().generate(&p).unwrap();
            let b = registry.get(target).unwrap().generate(&p).unwrap();
            assert_eq!(a.source, b.source, "target {}", target);
            assert_eq!(a.metadata.checksum, b.metadata.checksum);
        }
    }

    #[test]
    fn test_identifier_sanitization() {
        assert_eq!(identifier("fetch-orders"), "fetch_orders");
        assert_eq!(identifier("2fast"), "_2fast");
        assert_eq!(identifier(""), "_");
    }
}
