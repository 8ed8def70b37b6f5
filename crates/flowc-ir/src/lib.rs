//! flowc-ir - Intermediate representation of compiled workflows
//!
//! The flowc IR is a typed node/edge graph:
//! - every workflow step lowers to one or more [`IrNode`]s
//! - control/data flow is a set of directed [`IrEdge`]s
//! - nodes carry a cost model and semantic annotations that drive the
//!   optimization pipeline
//!
//! # Architecture
//!
//! ```text
//! WorkflowSpec (flowc-spec)
//!         ↓
//!    [Compilation]
//!         ↓
//!    IrProgram
//!    ├── Nodes (kind, operation, ports, metadata)
//!    ├── Edges (typed, weighted, optionally guarded)
//!    ├── Entry / exit points
//!    └── Semantic context back-reference
//!         ↓
//!    [Optimization]  (flowc-opt, fork-then-mutate)
//!         ↓
//!    [Codegen]       (flowc-codegen)
//! ```

pub mod factory;
pub mod node;
pub mod program;
pub mod types;

pub use factory::{
    base_cost, kind_defaults, MetadataDefaults, NodeDraft, NodeFactory, NodeFactoryRegistry,
};
pub use node::{IrEdge, IrInput, IrMetadata, IrNode, IrOutput, NodeKind, SemanticAnnotation};
pub use program::{ComplexityAnalysis, IrProgram};
pub use types::DataType;
