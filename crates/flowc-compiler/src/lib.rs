//! flowc-compiler - Lowering WorkflowSpec → IR
//!
//! Converts the declarative workflow description to the typed node/edge
//! graph. Each step kind lowers through an exhaustive match:
//! - `task` → one operation node
//! - `condition` → a condition node (true/false outputs) plus a merge node
//! - `loop` → one loop node (iterator + condition inputs, array output)
//! - `parallel` → a split node fanning out to N branches plus a merge node
//! - `transform` → one transform node
//!
//! Edges come from the explicit `flow` section when present, otherwise a
//! linear chain over consecutively compiled nodes. Entry and exit points
//! are a structural heuristic: a node with no inputs is an entry, a node
//! with no outputs is an exit. Disconnected graphs can therefore report
//! several entries; that is policy, not a defect.

pub mod annotate;
pub mod lower;

pub use annotate::SemanticAnnotator;
pub use lower::WorkflowCompiler;
