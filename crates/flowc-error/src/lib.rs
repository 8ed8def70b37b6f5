//! flowc-error - Error taxonomy for the flowc workflow compiler
//!
//! Every crate in the workspace reports failures through the two enums
//! defined here:
//! - [`CompileError`] for failures while lowering a `WorkflowSpec` to IR
//! - [`EngineError`] for failures at the engine surface (lookup, codegen,
//!   optimization)
//!
//! Compilation is atomic: a `CompileError` means nothing was stored.

use thiserror::Error;

/// Default Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised while compiling a workflow spec into an IR program
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompileError {
    /// A flow connection names a step that does not exist
    #[error("flow connection references unknown step `{0}`")]
    UnknownFlowReference(String),

    /// Two nodes ended up with the same id
    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),

    /// An edge refers to a node id that is not in the program
    #[error("edge `{edge}` references missing node `{node}`")]
    DanglingEdge { edge: String, node: String },

    /// A step kind has no registered node factory
    #[error("no node factory registered for step kind `{0}`")]
    UnknownStepKind(String),
}

/// Errors raised at the engine surface
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Workflow compilation failed; nothing was stored
    #[error(transparent)]
    Compilation(#[from] CompileError),

    /// No program stored under the given id
    #[error("program `{0}` not found")]
    UnknownProgram(String),

    /// No code generation backend registered for the target
    #[error("no backend registered for target `{0}`")]
    UnknownTarget(String),

    /// The target is not declared by the program's `target_platforms`
    #[error("target `{target}` is not declared by program `{program}`")]
    UnsupportedTarget { program: String, target: String },

    /// A backend failed internally; no partial output is returned
    #[error("code generation for target `{target}` failed: {message}")]
    Generation { target: String, message: String },

    /// An optimization pass failed; the whole optimize call is aborted
    #[error("optimization pass `{pass}` failed: {message}")]
    Optimization { pass: String, message: String },
}

impl EngineError {
    /// True if the error is a lookup miss (program or target)
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownProgram(_) | EngineError::UnknownTarget(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_display() {
        let err = CompileError::UnknownFlowReference("step_9".to_string());
        assert_eq!(
            err.to_string(),
            "flow connection references unknown step `step_9`"
        );
    }

    #[test]
    fn test_compile_error_converts_to_engine_error() {
        let err: EngineError = CompileError::DuplicateNode("n0".to_string()).into();
        assert!(matches!(err, EngineError::Compilation(_)));
        assert!(!err.is_lookup());
    }

    #[test]
    fn test_lookup_classification() {
        assert!(EngineError::UnknownProgram("p".into()).is_lookup());
        assert!(EngineError::UnknownTarget("wasm".into()).is_lookup());
        let unsupported = EngineError::UnsupportedTarget {
            program: "p".into(),
            target: "wasm".into(),
        };
        assert!(!unsupported.is_lookup());
    }
}
