//! Lowering WorkflowSpec → IrProgram

use crate::annotate::SemanticAnnotator;
use flowc_error::CompileError;
use flowc_ir::{
    DataType, IrEdge, IrInput, IrOutput, IrProgram, NodeDraft, NodeFactoryRegistry, NodeKind,
};
use flowc_spec::{PortSpec, SemanticContext, Step, StepKind, WorkflowSpec};
use std::collections::HashMap;
use std::sync::Arc;

const DEFAULT_VERSION: &str = "1.0.0";
const DEFAULT_TARGET: &str = "nodejs";

/// Compilation state accumulated while lowering one workflow
struct LoweringContext {
    node_counter: u32,
    edge_counter: u32,
    port_counter: u32,
    /// Node ids in construction order, for the linear fallback chain
    order: Vec<String>,
    /// Step key → first node of the step (edge destinations)
    heads: HashMap<String, String>,
    /// Step key → last node of the step (edge sources)
    tails: HashMap<String, String>,
    /// Node id → step text, for semantic matching
    texts: HashMap<String, String>,
}

impl LoweringContext {
    fn new() -> Self {
        Self {
            node_counter: 0,
            edge_counter: 0,
            port_counter: 0,
            order: Vec::new(),
            heads: HashMap::new(),
            tails: HashMap::new(),
            texts: HashMap::new(),
        }
    }

    fn new_node_id(&mut self) -> String {
        let id = format!("n{}", self.node_counter);
        self.node_counter += 1;
        id
    }

    fn new_edge_id(&mut self) -> String {
        let id = format!("e{}", self.edge_counter);
        self.edge_counter += 1;
        id
    }

    fn new_port_id(&mut self) -> String {
        let id = format!("p{}", self.port_counter);
        self.port_counter += 1;
        id
    }
}

/// Compiles workflow specs into IR programs
pub struct WorkflowCompiler {
    factories: NodeFactoryRegistry,
    annotator: SemanticAnnotator,
}

impl WorkflowCompiler {
    pub fn new() -> Self {
        Self::with_registry(NodeFactoryRegistry::builtin())
    }

    /// Uses an injected factory registry (tests, custom node kinds)
    pub fn with_registry(factories: NodeFactoryRegistry) -> Self {
        Self {
            factories,
            annotator: SemanticAnnotator::new(),
        }
    }

    /// Lowers a workflow spec to a validated, annotated IR program.
    ///
    /// Fails without side effects: a `CompileError` means no program exists.
    pub fn compile(
        &self,
        spec: &WorkflowSpec,
        context: Option<Arc<SemanticContext>>,
    ) -> Result<IrProgram, CompileError> {
        let version = spec.version.as_deref().unwrap_or(DEFAULT_VERSION);
        let mut program = IrProgram::new(&spec.name, version);
        program.target_platforms = spec
            .target_platforms
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_TARGET.to_string()]);

        let mut cx = LoweringContext::new();
        for (index, step) in spec.steps.iter().enumerate() {
            let key = step
                .id
                .clone()
                .unwrap_or_else(|| format!("step_{}", index));
            self.compile_step(&mut program, &mut cx, &key, step)?;
        }

        match &spec.flow {
            None => self.chain_linear(&mut program, &mut cx),
            Some(flow) => {
                for conn in &flow.connections {
                    let from = cx
                        .tails
                        .get(&conn.from)
                        .ok_or_else(|| CompileError::UnknownFlowReference(conn.from.clone()))?
                        .clone();
                    let to = cx
                        .heads
                        .get(&conn.to)
                        .ok_or_else(|| CompileError::UnknownFlowReference(conn.to.clone()))?
                        .clone();
                    let mut edge = IrEdge::new(
                        cx.new_edge_id(),
                        from,
                        to,
                        DataType::parse_or(conn.data_type.as_deref(), DataType::Void),
                        conn.weight.unwrap_or(1.0),
                    );
                    edge.condition = conn.condition.clone();
                    program.add_edge(edge);
                }
            }
        }

        compute_entry_exit(&mut program);
        program.validate()?;

        self.annotator
            .annotate(&mut program, &cx.texts, context.as_deref());
        program.semantic_context = context;
        Ok(program)
    }

    fn compile_step(
        &self,
        program: &mut IrProgram,
        cx: &mut LoweringContext,
        key: &str,
        step: &Step,
    ) -> Result<(), CompileError> {
        match step.kind {
            StepKind::Task => {
                let id = self.emit_node(program, cx, NodeKind::Operation, step, |cx, draft| {
                    draft.inputs = convert_inputs(cx, &step.inputs);
                    draft.outputs = convert_outputs(cx, &step.outputs);
                })?;
                self.bind_step(cx, key, step, &id, &id);
            }
            StepKind::Condition => {
                let cond_id =
                    self.emit_node(program, cx, NodeKind::Condition, step, |cx, draft| {
                        let mut inputs = convert_inputs(cx, &step.inputs);
                        if let Some(expr) = &step.condition {
                            inputs.push(
                                IrInput::new(cx.new_port_id(), "condition", DataType::Bool)
                                    .with_source(expr.clone()),
                            );
                        }
                        draft.inputs = inputs;
                        draft.outputs = vec![
                            IrOutput::new(cx.new_port_id(), "true", DataType::Bool),
                            IrOutput::new(cx.new_port_id(), "false", DataType::Bool),
                        ];
                    })?;
                let merge_id = self.emit_merge(program, cx, step, &["true", "false"])?;
                self.bind_step(cx, key, step, &cond_id, &merge_id);
            }
            StepKind::Loop => {
                let id = self.emit_node(program, cx, NodeKind::Loop, step, |cx, draft| {
                    let mut inputs = Vec::new();
                    if let Some(iterator) = &step.iterator {
                        inputs.push(
                            IrInput::new(cx.new_port_id(), "iterator", DataType::Int)
                                .with_source(iterator.clone()),
                        );
                    }
                    if let Some(condition) = &step.condition {
                        inputs.push(
                            IrInput::new(cx.new_port_id(), "condition", DataType::Bool)
                                .with_source(condition.clone()),
                        );
                    }
                    draft.inputs = inputs;
                    draft.outputs =
                        vec![IrOutput::new(cx.new_port_id(), "result", DataType::Array)];
                    // Loops only parallelize when the step says so explicitly
                    draft.parallelizable = step.parallelizable == Some(true);
                })?;
                self.bind_step(cx, key, step, &id, &id);
            }
            StepKind::Parallel => {
                let branches = step.parallel.clone().unwrap_or_default();
                let split_id = self.emit_node(program, cx, NodeKind::Split, step, |cx, draft| {
                    draft.inputs = convert_inputs(cx, &step.inputs);
                    draft.outputs = branches
                        .iter()
                        .map(|label| IrOutput::new(cx.new_port_id(), label, DataType::Object))
                        .collect();
                    draft.parallelizable = true;
                })?;
                let labels: Vec<&str> = branches.iter().map(String::as_str).collect();
                let merge_id = self.emit_merge(program, cx, step, &labels)?;
                self.bind_step(cx, key, step, &split_id, &merge_id);
            }
            StepKind::Transform => {
                let id = self.emit_node(program, cx, NodeKind::Transform, step, |cx, draft| {
                    let mut inputs = convert_inputs(cx, &step.inputs);
                    if let Some(source) = &step.input {
                        inputs.push(
                            IrInput::new(cx.new_port_id(), "input", DataType::Object)
                                .with_source(source.clone()),
                        );
                    }
                    draft.inputs = inputs;
                    let out_type =
                        DataType::parse_or(step.output_type.as_deref(), DataType::Object);
                    draft.outputs = vec![IrOutput::new(cx.new_port_id(), "output", out_type)];
                })?;
                self.bind_step(cx, key, step, &id, &id);
            }
        }
        Ok(())
    }

    /// Builds one node through the factory registry and records it
    fn emit_node(
        &self,
        program: &mut IrProgram,
        cx: &mut LoweringContext,
        kind: NodeKind,
        step: &Step,
        fill: impl FnOnce(&mut LoweringContext, &mut NodeDraft),
    ) -> Result<String, CompileError> {
        let id = cx.new_node_id();
        let mut draft = NodeDraft::new(&id, &step.operation);
        draft.complexity = step.complexity.unwrap_or(1.0);
        draft.reliability = step.reliability;
        draft.latency = step.estimated_latency;
        draft.memory = step.estimated_memory;
        draft.cpu = step.estimated_cpu;
        draft.dependencies = step.dependencies.clone();
        draft.parallelizable = step.parallelizable.unwrap_or(false);
        fill(cx, &mut draft);
        let node = self.factories.build(kind, draft)?;
        cx.order.push(id.clone());
        cx.texts.insert(id.clone(), step_text(step));
        program.add_node(node);
        Ok(id)
    }

    /// Companion merge node for condition and parallel steps
    fn emit_merge(
        &self,
        program: &mut IrProgram,
        cx: &mut LoweringContext,
        step: &Step,
        input_names: &[&str],
    ) -> Result<String, CompileError> {
        let id = cx.new_node_id();
        let mut draft = NodeDraft::new(&id, format!("{}_merge", step.operation));
        draft.inputs = input_names
            .iter()
            .map(|name| IrInput::new(cx.new_port_id(), *name, DataType::Object))
            .collect();
        draft.outputs = vec![IrOutput::new(cx.new_port_id(), "result", DataType::Object)];
        let node = self.factories.build(NodeKind::Merge, draft)?;
        cx.order.push(id.clone());
        cx.texts.insert(id.clone(), step_text(step));
        program.add_node(node);
        Ok(id)
    }

    fn bind_step(&self, cx: &mut LoweringContext, key: &str, step: &Step, head: &str, tail: &str) {
        cx.heads.insert(key.to_string(), head.to_string());
        cx.tails.insert(key.to_string(), tail.to_string());
        // Connections may also reference the step by operation name
        if !cx.heads.contains_key(&step.operation) {
            cx.heads.insert(step.operation.clone(), head.to_string());
            cx.tails.insert(step.operation.clone(), tail.to_string());
        }
    }

    /// Linear fallback: connect consecutively compiled nodes
    fn chain_linear(&self, program: &mut IrProgram, cx: &mut LoweringContext) {
        for pair in cx.order.clone().windows(2) {
            let edge = IrEdge::new(
                cx.new_edge_id(),
                pair[0].clone(),
                pair[1].clone(),
                DataType::Void,
                1.0,
            );
            program.add_edge(edge);
        }
    }
}

impl Default for WorkflowCompiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry points: entry kind or no inputs. Exit points: exit kind or no
/// outputs. Structural heuristic, kept as documented policy.
fn compute_entry_exit(program: &mut IrProgram) {
    program.entry_points = program
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Entry || n.inputs.is_empty())
        .map(|n| n.id.clone())
        .collect();
    program.exit_points = program
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Exit || n.outputs.is_empty())
        .map(|n| n.id.clone())
        .collect();
}

fn step_text(step: &Step) -> String {
    match &step.description {
        Some(desc) => format!("{} {}", step.operation, desc),
        None => step.operation.clone(),
    }
}

fn convert_inputs(cx: &mut LoweringContext, ports: &[PortSpec]) -> Vec<IrInput> {
    ports
        .iter()
        .map(|p| {
            let mut input = IrInput::new(
                cx.new_port_id(),
                &p.name,
                DataType::parse_or(p.data_type.as_deref(), DataType::Object),
            );
            input.optional = p.optional;
            input.constraints = p.constraints.clone();
            input.source = p.source.clone();
            input
        })
        .collect()
}

fn convert_outputs(cx: &mut LoweringContext, ports: &[PortSpec]) -> Vec<IrOutput> {
    ports
        .iter()
        .map(|p| {
            let mut output = IrOutput::new(
                cx.new_port_id(),
                &p.name,
                DataType::parse_or(p.data_type.as_deref(), DataType::Object),
            );
            output.constraints = p.constraints.clone();
            output.targets = p.targets.clone();
            output.cacheable = p.cacheable;
            output
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_spec::{Connection, FlowSpec, PortSpec};

    fn task(op: &str) -> Step {
        Step::new(StepKind::Task, op)
    }

    #[test]
    fn test_linear_three_task_chain() {
        let spec = WorkflowSpec::new("linear")
            .with_step(task("extract"))
            .with_step(task("enrich"))
            .with_step(task("load"));
        let program = WorkflowCompiler::new().compile(&spec, None).unwrap();

        assert_eq!(program.nodes.len(), 3);
        assert_eq!(program.edges.len(), 2);
        for edge in &program.edges {
            assert_eq!(edge.data_type, DataType::Void);
            assert_eq!(edge.weight, 1.0);
        }
        assert_eq!(program.edges[0].from, program.nodes[0].id);
        assert_eq!(program.edges[1].to, program.nodes[2].id);
    }

    #[test]
    fn test_entry_exit_heuristic() {
        let spec = WorkflowSpec::new("hx")
            .with_step(task("start").with_output(PortSpec::new("data")))
            .with_step(
                task("mid")
                    .with_input(PortSpec::new("data"))
                    .with_output(PortSpec::new("data")),
            )
            .with_step(task("finish").with_input(PortSpec::new("data")));
        let program = WorkflowCompiler::new().compile(&spec, None).unwrap();

        assert_eq!(program.entry_points, vec![program.nodes[0].id.clone()]);
        assert_eq!(program.exit_points, vec![program.nodes[2].id.clone()]);
    }

    #[test]
    fn test_condition_lowers_to_branch_plus_merge() {
        let mut step = Step::new(StepKind::Condition, "check_total");
        step.condition = Some("total > 100".to_string());
        let spec = WorkflowSpec::new("cond").with_step(step);
        let program = WorkflowCompiler::new().compile(&spec, None).unwrap();

        assert_eq!(program.nodes.len(), 2);
        let cond = &program.nodes[0];
        assert_eq!(cond.kind, NodeKind::Condition);
        assert!(cond.output("true").is_some());
        assert!(cond.output("false").is_some());
        assert_eq!(cond.input("condition").unwrap().source.as_deref(), Some("total > 100"));
        let merge = &program.nodes[1];
        assert_eq!(merge.kind, NodeKind::Merge);
        assert_eq!(merge.operation, "check_total_merge");
        assert_eq!(merge.inputs.len(), 2);
    }

    #[test]
    fn test_loop_step_shape() {
        let mut step = Step::new(StepKind::Loop, "per_item");
        step.iterator = Some("const:5".to_string());
        step.condition = Some("i < items.length".to_string());
        let spec = WorkflowSpec::new("loop").with_step(step);
        let program = WorkflowCompiler::new().compile(&spec, None).unwrap();

        let node = &program.nodes[0];
        assert_eq!(node.kind, NodeKind::Loop);
        assert_eq!(node.input("iterator").unwrap().const_value(), Some("5"));
        assert!(node.input("condition").is_some());
        assert_eq!(node.outputs[0].data_type, DataType::Array);
        // Not marked parallelizable → stays sequential
        assert!(!node.parallelizable);
        assert_eq!(node.metadata.cost, 10.0);
    }

    #[test]
    fn test_parallel_fans_out_per_declared_branch() {
        let mut step = Step::new(StepKind::Parallel, "fan");
        step.parallel = Some(vec!["a".into(), "b".into(), "c".into()]);
        let spec = WorkflowSpec::new("par").with_step(step);
        let program = WorkflowCompiler::new().compile(&spec, None).unwrap();

        let split = &program.nodes[0];
        assert_eq!(split.kind, NodeKind::Split);
        assert_eq!(split.outputs.len(), 3);
        assert!(split.parallelizable);
        let merge = &program.nodes[1];
        assert_eq!(merge.kind, NodeKind::Merge);
        assert_eq!(merge.inputs.len(), 3);
        assert_eq!(merge.metadata.reliability, 1.0);
    }

    #[test]
    fn test_declared_flow_builds_declared_edges() {
        let spec = WorkflowSpec {
            flow: Some(FlowSpec {
                connections: vec![Connection {
                    from: "a".into(),
                    to: "b".into(),
                    data_type: Some("array".into()),
                    weight: Some(3.0),
                    condition: Some("len > 0".into()),
                }],
            }),
            ..WorkflowSpec::new("flow")
                .with_step(task("first").with_id("a"))
                .with_step(task("second").with_id("b"))
        };
        let program = WorkflowCompiler::new().compile(&spec, None).unwrap();

        assert_eq!(program.edges.len(), 1);
        let edge = &program.edges[0];
        assert_eq!(edge.data_type, DataType::Array);
        assert_eq!(edge.weight, 3.0);
        assert_eq!(edge.condition.as_deref(), Some("len > 0"));
    }

    #[test]
    fn test_unknown_flow_reference_fails() {
        let spec = WorkflowSpec {
            flow: Some(FlowSpec {
                connections: vec![Connection {
                    from: "a".into(),
                    to: "ghost".into(),
                    data_type: None,
                    weight: None,
                    condition: None,
                }],
            }),
            ..WorkflowSpec::new("bad").with_step(task("first").with_id("a"))
        };
        let err = WorkflowCompiler::new().compile(&spec, None).unwrap_err();
        assert_eq!(err, CompileError::UnknownFlowReference("ghost".to_string()));
    }

    #[test]
    fn test_flow_targets_condition_head_and_tail() {
        let mut cond = Step::new(StepKind::Condition, "gate").with_id("gate");
        cond.condition = Some("x > 0".to_string());
        let spec = WorkflowSpec {
            flow: Some(FlowSpec {
                connections: vec![
                    Connection {
                        from: "in".into(),
                        to: "gate".into(),
                        data_type: None,
                        weight: None,
                        condition: None,
                    },
                    Connection {
                        from: "gate".into(),
                        to: "out".into(),
                        data_type: None,
                        weight: None,
                        condition: None,
                    },
                ],
            }),
            ..WorkflowSpec::new("cond-flow")
                .with_step(task("in").with_id("in"))
                .with_step(cond)
                .with_step(task("out").with_id("out"))
        };
        let program = WorkflowCompiler::new().compile(&spec, None).unwrap();

        // Into the condition node, out of its merge node
        let cond_node = program
            .nodes
            .iter()
            .find(|n| n.kind == NodeKind::Condition)
            .unwrap();
        let merge_node = program
            .nodes
            .iter()
            .find(|n| n.kind == NodeKind::Merge)
            .unwrap();
        assert!(program.edges.iter().any(|e| e.to == cond_node.id));
        assert!(program.edges.iter().any(|e| e.from == merge_node.id));
    }

    #[test]
    fn test_default_target_platform() {
        let spec = WorkflowSpec::new("defaults").with_step(task("noop"));
        let program = WorkflowCompiler::new().compile(&spec, None).unwrap();
        assert_eq!(program.target_platforms, vec!["nodejs".to_string()]);
        assert_eq!(program.version, "1.0.0");
    }

    #[test]
    fn test_cost_model_applies_complexity() {
        let spec = WorkflowSpec::new("cost").with_step(task("heavy").with_complexity(4.0));
        let program = WorkflowCompiler::new().compile(&spec, None).unwrap();
        assert_eq!(program.nodes[0].metadata.cost, 20.0);
    }

    // Known policy: disconnected branches each contribute an entry point.
    #[test]
    fn test_multiple_entries_on_disconnected_graph() {
        let spec = WorkflowSpec {
            flow: Some(FlowSpec {
                connections: vec![],
            }),
            ..WorkflowSpec::new("islands")
                .with_step(task("island_a"))
                .with_step(task("island_b"))
        };
        let program = WorkflowCompiler::new().compile(&spec, None).unwrap();
        assert_eq!(program.entry_points.len(), 2);
        assert_eq!(program.exit_points.len(), 2);
    }
}
