//! Optimization pipeline
//!
//! Fork-then-mutate: the stored program is never touched. A fresh
//! structural clone receives every selected pass in ascending level order;
//! the fork is only handed back if all passes succeed.

use crate::registry::{PassEntry, PassRegistry};
use flowc_error::EngineError;
use flowc_ir::IrProgram;

/// Outcome of one pass over one program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub pass: &'static str,
    pub level: u8,
    /// Pass-specific count: nodes removed, values folded, nodes re-typed
    pub impact: usize,
}

/// Executes an ordered subset of registered passes against program forks
pub struct OptimizationPipeline {
    registry: PassRegistry,
}

impl OptimizationPipeline {
    pub fn new(registry: PassRegistry) -> Self {
        Self { registry }
    }

    /// Pipeline over the six builtin passes
    pub fn builtin() -> Self {
        Self::new(PassRegistry::builtin())
    }

    pub fn registry(&self) -> &PassRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PassRegistry {
        &mut self.registry
    }

    /// Snapshot of the passes a run at `level` would execute, in order.
    /// Lets a caller drive the pass loop itself (the engine yields between
    /// passes) without holding the registry across the run.
    pub fn plan(&self, level: u8) -> Vec<PassEntry> {
        self.registry.select(level).into_iter().cloned().collect()
    }

    /// Applies one planned pass to the program, recording it in
    /// `optimization_passes`. A pass error aborts with no report.
    pub fn apply(entry: &PassEntry, program: &mut IrProgram) -> Result<PassReport, EngineError> {
        let impact = entry
            .pass
            .run(program, &entry.params)
            .map_err(|message| EngineError::Optimization {
                pass: entry.pass.name().to_string(),
                message,
            })?;
        program
            .optimization_passes
            .push(entry.pass.name().to_string());
        Ok(PassReport {
            pass: entry.pass.name(),
            level: entry.pass.level(),
            impact,
        })
    }

    /// Runs all enabled passes with `pass.level <= level` against a fork of
    /// `source`. Returns the fork (new id) and one report per executed pass.
    pub fn optimize(
        &self,
        source: &IrProgram,
        level: u8,
    ) -> Result<(IrProgram, Vec<PassReport>), EngineError> {
        let mut program = source.fork();
        let mut reports = Vec::new();
        for entry in self.plan(level) {
            reports.push(Self::apply(&entry, &mut program)?);
        }
        Ok((program, reports))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Pass, PassParams};
    use flowc_ir::{IrNode, NodeKind};
    use std::sync::Arc;

    struct FailingPass;

    impl Pass for FailingPass {
        fn name(&self) -> &'static str {
            "failing-pass"
        }
        fn level(&self) -> u8 {
            1
        }
        fn run(&self, _program: &mut IrProgram, _params: &PassParams) -> Result<usize, String> {
            Err("boom".to_string())
        }
    }

    fn two_node_program() -> IrProgram {
        let mut program = IrProgram::new("p", "1.0.0");
        program.add_node(IrNode::new("n0", NodeKind::Operation, "a"));
        program.add_node(IrNode::new("n1", NodeKind::Operation, "b"));
        program.entry_points.push("n0".to_string());
        program
    }

    #[test]
    fn test_optimize_forks_and_keeps_source_intact() {
        let source = two_node_program();
        let before = source.clone();
        let pipeline = OptimizationPipeline::builtin();

        let (optimized, reports) = pipeline.optimize(&source, 1).unwrap();

        assert_ne!(optimized.id, source.id);
        assert_eq!(source.nodes, before.nodes);
        assert_eq!(source.optimization_passes, before.optimization_passes);
        assert_eq!(
            optimized.optimization_passes,
            vec!["dead-code-elimination", "constant-folding"]
        );
        assert_eq!(reports.len(), 2);
    }

    #[test]
    fn test_level_gating_excludes_higher_passes() {
        let pipeline = OptimizationPipeline::builtin();
        let (_, reports) = pipeline.optimize(&two_node_program(), 1).unwrap();
        assert!(reports.iter().all(|r| r.level <= 1));
    }

    #[test]
    fn test_plan_then_apply_matches_optimize() {
        let pipeline = OptimizationPipeline::builtin();
        let source = two_node_program();

        let mut program = source.fork();
        let plan = pipeline.plan(2);
        let mut reports = Vec::new();
        for entry in &plan {
            reports.push(OptimizationPipeline::apply(entry, &mut program).unwrap());
        }

        let (direct, direct_reports) = pipeline.optimize(&source, 2).unwrap();
        assert_eq!(program.optimization_passes, direct.optimization_passes);
        assert_eq!(reports, direct_reports);
    }

    #[test]
    fn test_failing_pass_aborts_whole_run() {
        let mut registry = PassRegistry::new();
        registry.register(Arc::new(FailingPass));
        let pipeline = OptimizationPipeline::new(registry);

        let err = pipeline.optimize(&two_node_program(), 3).unwrap_err();
        assert!(matches!(err, EngineError::Optimization { .. }));
    }
}
