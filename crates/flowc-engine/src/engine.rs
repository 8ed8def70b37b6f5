//! Engine facade
//!
//! One `IrEngine` owns the store, the compiler, the optimization pipeline,
//! the backend registry and the event bus. Compilation is atomic: the
//! store only ever contains fully-formed programs. Optimization is
//! all-or-nothing: a failing pass leaves no partial artifact behind.

use crate::events::{EngineEvent, EventBus};
use crate::provider::{NullProvider, SemanticProvider};
use crate::store::ProgramStore;
use flowc_codegen::{BackendRegistry, GeneratedCode};
use flowc_compiler::WorkflowCompiler;
use flowc_error::{EngineError, Result};
use flowc_ir::{ComplexityAnalysis, IrProgram};
use flowc_opt::{OptimizationPipeline, PassRegistry};
use flowc_spec::WorkflowSpec;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

pub struct IrEngine {
    store: ProgramStore,
    compiler: WorkflowCompiler,
    pipeline: RwLock<OptimizationPipeline>,
    backends: BackendRegistry,
    semantics: Arc<dyn SemanticProvider>,
    events: EventBus,
}

impl IrEngine {
    /// Engine with builtin factories, passes and backends and no semantic
    /// provider
    pub fn new() -> Self {
        Self::with_provider(Arc::new(NullProvider))
    }

    pub fn with_provider(semantics: Arc<dyn SemanticProvider>) -> Self {
        Self {
            store: ProgramStore::new(),
            compiler: WorkflowCompiler::new(),
            pipeline: RwLock::new(OptimizationPipeline::builtin()),
            backends: BackendRegistry::builtin(),
            semantics,
            events: EventBus::default(),
        }
    }

    /// Subscribes to the observability event stream
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Reconfigures the pass registry (enable/disable, parameters)
    pub fn configure_passes(&self, configure: impl FnOnce(&mut PassRegistry)) {
        configure(self.pipeline.write().registry_mut());
    }

    /// Compiles a workflow spec and stores the resulting program.
    ///
    /// The semantic context lookup is the one real suspension point; the
    /// provider may be backed by a slow external service.
    pub async fn compile_workflow(&self, spec: &WorkflowSpec) -> Result<Arc<IrProgram>> {
        let context = self.semantics.context_for(spec).await;
        match self.compiler.compile(spec, context) {
            Ok(program) => {
                let program = self.store.insert(program);
                info!(
                    program_id = %program.id,
                    workflow = %spec.name,
                    nodes = program.nodes.len(),
                    edges = program.edges.len(),
                    "workflow compiled"
                );
                self.events.publish(EngineEvent::WorkflowCompiled {
                    program_id: program.id.clone(),
                    workflow: spec.name.clone(),
                    node_count: program.nodes.len(),
                });
                Ok(program)
            }
            Err(err) => {
                warn!(workflow = %spec.name, error = %err, "compilation failed");
                self.events.publish(EngineEvent::CompilationFailed {
                    workflow: spec.name.clone(),
                    message: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    /// Optimizes a stored program at the given level, storing the result
    /// under a new id. The source program is never mutated.
    pub async fn optimize_program(&self, id: &str, level: u8) -> Result<Arc<IrProgram>> {
        let source = self.store.require(id)?;

        // Pass selection is cheap; the snapshot keeps the lock out of the
        // pass bodies.
        let plan = self.pipeline.read().plan(level);

        // One yield per pass keeps long plans from starving other callers.
        // The fork only reaches the store if every pass succeeds.
        let mut optimized = source.fork();
        let mut reports = Vec::new();
        for entry in &plan {
            reports.push(OptimizationPipeline::apply(entry, &mut optimized)?);
            tokio::task::yield_now().await;
        }

        let optimized = self.store.insert(optimized);
        for report in &reports {
            info!(
                program_id = %optimized.id,
                pass = report.pass,
                impact = report.impact,
                "optimization applied"
            );
            self.events.publish(EngineEvent::OptimizationApplied {
                program_id: optimized.id.clone(),
                pass: report.pass.to_string(),
                impact: report.impact,
            });
            if let Some(event) = EngineEvent::for_pass(&optimized.id, report.pass, report.impact) {
                self.events.publish(event);
            }
        }
        info!(
            program_id = %optimized.id,
            source_id = %source.id,
            passes = reports.len(),
            "program optimized"
        );
        self.events.publish(EngineEvent::ProgramOptimized {
            program_id: optimized.id.clone(),
            source_id: source.id.clone(),
            passes: reports.len(),
        });
        Ok(optimized)
    }

    /// Generates code for a stored program on a declared target platform
    pub async fn generate_code(&self, id: &str, target: &str) -> Result<GeneratedCode> {
        let program = self.store.require(id)?;
        if !program.target_platforms.iter().any(|t| t == target) {
            return Err(EngineError::UnsupportedTarget {
                program: id.to_string(),
                target: target.to_string(),
            });
        }
        let backend = self
            .backends
            .get(target)
            .ok_or_else(|| EngineError::UnknownTarget(target.to_string()))?;

        let code = backend.generate(&program)?;
        info!(
            program_id = %program.id,
            target,
            size = code.metadata.size,
            checksum = %code.metadata.checksum,
            "code generated"
        );
        self.events.publish(EngineEvent::CodeGenerated {
            program_id: program.id.clone(),
            target: target.to_string(),
            size: code.metadata.size,
        });
        Ok(code)
    }

    pub async fn get_program(&self, id: &str) -> Option<Arc<IrProgram>> {
        self.store.get(id)
    }

    pub async fn list_programs(&self) -> Vec<Arc<IrProgram>> {
        self.store.list()
    }

    /// Deletes a stored program; returns whether one was removed
    pub async fn delete_program(&self, id: &str) -> bool {
        self.store.delete(id)
    }

    pub async fn analyze_complexity(&self, id: &str) -> Result<ComplexityAnalysis> {
        self.store.analyze(id)
    }
}

impl Default for IrEngine {
    fn default() -> Self {
        Self::new()
    }
}
