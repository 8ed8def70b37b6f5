//! Integration tests for the flowc workflow compiler
//!
//! This crate exercises the complete pipeline end to end:
//! WorkflowSpec → Compile → Optimize → Codegen, through the engine facade.

use flowc_engine::IrEngine;
use flowc_ir::IrProgram;
use flowc_spec::{Step, StepKind, WorkflowSpec};
use std::sync::Arc;

/// A three-task linear extract/enrich/load workflow with both builtin
/// backends declared
pub fn etl_workflow() -> WorkflowSpec {
    WorkflowSpec::new("etl")
        .with_step(Step::new(StepKind::Task, "extract"))
        .with_step(Step::new(StepKind::Task, "enrich"))
        .with_step(Step::new(StepKind::Task, "load"))
        .with_targets(vec!["nodejs".into(), "rust".into(), "wasm".into()])
}

/// Parses a workflow from its JSON wire format
pub fn workflow_from_json(json: &str) -> WorkflowSpec {
    serde_json::from_str(json).expect("workflow JSON should parse")
}

/// Compiles a workflow on a fresh engine, returning both
pub async fn compile(spec: &WorkflowSpec) -> (IrEngine, Arc<IrProgram>) {
    let engine = IrEngine::new();
    let program = engine
        .compile_workflow(spec)
        .await
        .expect("workflow should compile");
    (engine, program)
}

/// Asserts that the program's IR dump contains a specific string
pub fn assert_ir_contains(program: &IrProgram, expected: &str) {
    let dump = format!("{}", program);
    if !dump.contains(expected) {
        panic!(
            "Expected IR to contain '{}', but it didn't.\n\nIR dump:\n{}",
            expected, dump
        );
    }
}

/// Asserts that generated code for a target contains a specific string
pub async fn assert_code_contains(engine: &IrEngine, id: &str, target: &str, expected: &str) {
    let code = engine
        .generate_code(id, target)
        .await
        .expect("code generation should succeed");
    if !code.source.contains(expected) {
        panic!(
            "Expected {} output to contain '{}', but it didn't.\n\nGenerated code:\n{}",
            target, expected, code.source
        );
    }
}


#[cfg(test)]
mod optimization_tests {
    use super::*;
    use flowc_spec::PortSpec;
    use serde_json::json;

    fn const_add_workflow() -> WorkflowSpec {
        WorkflowSpec::new("arith").with_step(
            Step::new(StepKind::Task, "add")
                .with_input(PortSpec::constant("a", "2"))
                .with_input(PortSpec::constant("b", "3")),
        )
    }

    #[tokio::test]
    async fn test_constant_folding_end_to_end() {
        let (engine, program) = compile(&const_add_workflow()).await;
        let optimized = engine.optimize_program(&program.id, 1).await.unwrap();

        let node = &optimized.nodes[0];
        assert_eq!(node.operation, "constant");
        assert_eq!(node.outputs[0].value, Some(json!(5)));
        assert_eq!(node.metadata.cost, 0.0);
    }

    #[tokio::test]
    async fn test_optimization_never_mutates_the_source() {
        let (engine, program) = compile(&const_add_workflow()).await;
        let optimized = engine.optimize_program(&program.id, 3).await.unwrap();
        assert_ne!(optimized.id, program.id);

        let original = engine.get_program(&program.id).await.unwrap();
        assert_eq!(original.nodes[0].operation, "add");
        assert!(original.optimization_passes.is_empty());
    }

    #[tokio::test]
    async fn test_dead_step_is_eliminated() {
        let spec = workflow_from_json(
            r#"{
                "name": "with-island",
                "steps": [
                    {"id": "a", "type": "task", "operation": "extract"},
                    {"id": "b", "type": "task", "operation": "load",
                     "inputs": [{"name": "data", "type": "object", "source": "a.result"}]},
                    {"id": "c", "type": "task", "operation": "orphan",
                     "inputs": [{"name": "data", "type": "object", "source": "nowhere"}]}
                ],
                "flow": {"connections": [{"from": "a", "to": "b"}]}
            }"#,
        );
        let (engine, program) = compile(&spec).await;
        assert_eq!(program.nodes.len(), 3);

        let optimized = engine.optimize_program(&program.id, 1).await.unwrap();
        assert_eq!(optimized.nodes.len(), 2);
        assert!(optimized.get_node("n2").is_none());
        // Idempotent: optimizing the result again removes nothing
        let again = engine.optimize_program(&optimized.id, 1).await.unwrap();
        assert_eq!(again.nodes.len(), 2);
    }

    #[tokio::test]
    async fn test_loop_unrolling_respects_the_limit() {
        let spec = workflow_from_json(
            r#"{
                "name": "loops",
                "steps": [
                    {"type": "loop", "operation": "small", "iterator": "const:10"},
                    {"type": "loop", "operation": "large", "iterator": "const:11"}
                ]
            }"#,
        );
        let (engine, program) = compile(&spec).await;
        let optimized = engine.optimize_program(&program.id, 3).await.unwrap();

        assert_eq!(optimized.get_node("n0").unwrap().operation, "unrolled_loop");
        assert_eq!(optimized.get_node("n0").unwrap().optimization_level, 2);
        assert_eq!(optimized.get_node("n1").unwrap().operation, "large");
    }

    #[tokio::test]
    async fn test_unroll_limit_is_configurable() {
        let spec = workflow_from_json(
            r#"{
                "name": "loops",
                "steps": [{"type": "loop", "operation": "small", "iterator": "const:5"}]
            }"#,
        );
        let (engine, program) = compile(&spec).await;
        engine.configure_passes(|registry| {
            registry.set_param("loop-optimization", "unrollLimit", json!(4));
        });

        let optimized = engine.optimize_program(&program.id, 3).await.unwrap();
        assert_eq!(optimized.get_node("n0").unwrap().operation, "small");
    }

    #[tokio::test]
    async fn test_level_gates_the_pass_list() {
        let (engine, program) = compile(&etl_workflow()).await;

        let level1 = engine.optimize_program(&program.id, 1).await.unwrap();
        assert_eq!(
            level1.optimization_passes,
            vec!["dead-code-elimination", "constant-folding"]
        );

        let level3 = engine.optimize_program(&program.id, 3).await.unwrap();
        assert_eq!(level3.optimization_passes.len(), 6);
        assert_eq!(level3.optimization_passes[5], "memory-layout");
    }

    #[tokio::test]
    async fn test_memory_layout_orders_by_operation_then_memory() {
        let spec = workflow_from_json(
            r#"{
                "name": "layout",
                "steps": [
                    {"type": "task", "operation": "write", "estimatedMemory": 8},
                    {"type": "task", "operation": "read", "estimatedMemory": 4},
                    {"type": "task", "operation": "read", "estimatedMemory": 2}
                ]
            }"#,
        );
        let (engine, program) = compile(&spec).await;
        let optimized = engine.optimize_program(&program.id, 3).await.unwrap();

        let order: Vec<(&str, f64)> = optimized
            .nodes
            .iter()
            .map(|n| (n.operation.as_str(), n.metadata.memory))
            .collect();
        assert_eq!(order, vec![("read", 2.0), ("read", 4.0), ("write", 8.0)]);
    }
}
