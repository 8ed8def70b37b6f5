//! flowc-opt - Optimization pipeline
//!
//! A registry of named, leveled graph-rewriting passes. Optimizing never
//! mutates the input program: the pipeline works on a structural fork
//! under a fresh id and returns it together with per-pass impact reports.
//! Passes run in ascending level order; a single failing pass aborts the
//! whole run (all-or-nothing).
//!
//! Builtin passes:
//!
//! | name                   | level | rewrite                            |
//! |------------------------|-------|------------------------------------|
//! | dead-code-elimination  | 1     | drop nodes unreachable from entries|
//! | constant-folding       | 1     | fold const-only add/multiply/concat|
//! | semantic-optimization  | 2     | specialize high-confidence aggregates |
//! | parallel-detection     | 2     | promote unblocked parallelizable nodes |
//! | loop-optimization      | 3     | unroll small / vectorize parallel loops |
//! | memory-layout          | 3     | stable sort nodes for locality     |

pub mod passes;
pub mod pipeline;
pub mod registry;

use flowc_ir::IrProgram;
use serde_json::Value;
use std::collections::HashMap;

pub use pipeline::{OptimizationPipeline, PassReport};
pub use registry::{PassEntry, PassRegistry};

/// Free-form per-pass parameters
pub type PassParams = HashMap<String, Value>;

/// A single graph-rewriting optimization step
pub trait Pass: Send + Sync {
    /// Stable pass name, used for selection and reporting
    fn name(&self) -> &'static str;

    /// Gating level; the pass runs only when the requested level is >= this
    fn level(&self) -> u8;

    /// Rewrites the program in place, returning an impact count (nodes
    /// removed, values folded, nodes re-typed). An `Err` aborts the whole
    /// optimize call.
    fn run(&self, program: &mut IrProgram, params: &PassParams) -> Result<usize, String>;
}
