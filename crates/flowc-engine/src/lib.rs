//! flowc-engine - Async engine facade
//!
//! Ties the pipeline stages together behind one async surface:
//! - **Program Store**: keyed map of immutable compiled programs
//! - **Compile**: WorkflowSpec + semantic context → stored IrProgram
//! - **Optimize**: fork-then-mutate through the leveled pass pipeline
//! - **Generate**: target-selected code generation
//! - **Events**: broadcast observability stream mirrored to `tracing`
//!
//! All operations are async and sequentialized per caller; programs under
//! different ids never interfere because every stored artifact is
//! immutable.

pub mod engine;
pub mod events;
pub mod provider;
pub mod store;

pub use engine::IrEngine;
pub use events::{EngineEvent, EventBus};
pub use provider::{NullProvider, SemanticProvider, StaticProvider};
pub use store::ProgramStore;

/// Installs the global tracing subscriber
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}
