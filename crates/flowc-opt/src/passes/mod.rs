//! Builtin optimization passes

mod const_fold;
mod dead_code;
mod layout;
mod loops;
mod parallel;
mod semantic;

pub use const_fold::ConstantFolding;
pub use dead_code::DeadCodeElimination;
pub use layout::MemoryLayout;
pub use loops::LoopOptimization;
pub use parallel::ParallelDetection;
pub use semantic::SemanticOptimization;
