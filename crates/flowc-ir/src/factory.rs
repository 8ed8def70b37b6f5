//! Node factory registry
//!
//! Builtin constructors for each node kind. The registry is an explicit
//! value constructed once and injected into the compiler; there is no
//! process-wide singleton. Factories are pure: the same draft always
//! produces the same node.

use crate::node::{IrInput, IrMetadata, IrNode, IrOutput, NodeKind};
use flowc_error::CompileError;
use std::collections::HashMap;

/// Base execution cost per node kind, before the complexity multiplier
pub fn base_cost(kind: NodeKind) -> f64 {
    match kind {
        NodeKind::Operation => 5.0,
        NodeKind::Condition => 1.0,
        NodeKind::Loop => 10.0,
        NodeKind::Parallel | NodeKind::Split => 8.0,
        NodeKind::Transform => 3.0,
        NodeKind::Validate => 2.0,
        NodeKind::Aggregate => 4.0,
        _ => 1.0,
    }
}

/// Resource defaults applied when the step does not declare estimates
#[derive(Debug, Clone, Copy)]
pub struct MetadataDefaults {
    pub reliability: f64,
    pub latency: f64,
    pub memory: f64,
    pub cpu: f64,
}

/// Per-kind metadata defaults. Pure bookkeeping kinds (condition, merge,
/// entry, exit) are modeled as free and fully reliable.
pub fn kind_defaults(kind: NodeKind) -> MetadataDefaults {
    match kind {
        NodeKind::Condition | NodeKind::Merge | NodeKind::Entry | NodeKind::Exit => {
            MetadataDefaults {
                reliability: 1.0,
                latency: 1.0,
                memory: 8.0,
                cpu: 5.0,
            }
        }
        NodeKind::Loop => MetadataDefaults {
            reliability: 0.9,
            latency: 50.0,
            memory: 128.0,
            cpu: 60.0,
        },
        NodeKind::Parallel | NodeKind::Split => MetadataDefaults {
            reliability: 0.92,
            latency: 5.0,
            memory: 96.0,
            cpu: 80.0,
        },
        NodeKind::Transform => MetadataDefaults {
            reliability: 0.97,
            latency: 8.0,
            memory: 48.0,
            cpu: 20.0,
        },
        NodeKind::Validate => MetadataDefaults {
            reliability: 0.99,
            latency: 3.0,
            memory: 16.0,
            cpu: 10.0,
        },
        NodeKind::Aggregate => MetadataDefaults {
            reliability: 0.95,
            latency: 15.0,
            memory: 80.0,
            cpu: 40.0,
        },
        _ => MetadataDefaults {
            reliability: 0.95,
            latency: 10.0,
            memory: 64.0,
            cpu: 25.0,
        },
    }
}

/// Everything a factory needs to build a node of its kind
#[derive(Debug, Clone, Default)]
pub struct NodeDraft {
    pub id: String,
    pub operation: String,
    pub inputs: Vec<IrInput>,
    pub outputs: Vec<IrOutput>,
    /// Complexity multiplier (defaults to 1)
    pub complexity: f64,
    pub reliability: Option<f64>,
    pub latency: Option<f64>,
    pub memory: Option<f64>,
    pub cpu: Option<f64>,
    pub dependencies: Vec<String>,
    pub parallelizable: bool,
}

impl NodeDraft {
    pub fn new(id: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            operation: operation.into(),
            complexity: 1.0,
            ..Self::default()
        }
    }
}

/// A builtin node constructor
pub type NodeFactory = fn(NodeDraft) -> IrNode;

fn build_node(kind: NodeKind, draft: NodeDraft) -> IrNode {
    let defaults = kind_defaults(kind);
    let complexity = if draft.complexity > 0.0 { draft.complexity } else { 1.0 };
    let mut node = IrNode::new(draft.id, kind, draft.operation);
    node.inputs = draft.inputs;
    node.outputs = draft.outputs;
    node.metadata = IrMetadata {
        cost: base_cost(kind) * complexity,
        complexity,
        reliability: draft.reliability.unwrap_or(defaults.reliability),
        latency: draft.latency.unwrap_or(defaults.latency),
        memory: draft.memory.unwrap_or(defaults.memory),
        cpu: draft.cpu.unwrap_or(defaults.cpu),
    };
    node.dependencies = draft.dependencies;
    node.parallelizable = draft.parallelizable;
    node
}

macro_rules! factory_for {
    ($kind:expr) => {{
        fn factory(draft: NodeDraft) -> IrNode {
            build_node($kind, draft)
        }
        factory as NodeFactory
    }};
}

/// Registry of node constructors, keyed by kind
#[derive(Debug, Clone)]
pub struct NodeFactoryRegistry {
    factories: HashMap<NodeKind, NodeFactory>,
}

impl NodeFactoryRegistry {
    /// Empty registry; most callers want [`NodeFactoryRegistry::builtin`]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with constructors for every builtin node kind
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(NodeKind::Entry, factory_for!(NodeKind::Entry));
        registry.register(NodeKind::Exit, factory_for!(NodeKind::Exit));
        registry.register(NodeKind::Operation, factory_for!(NodeKind::Operation));
        registry.register(NodeKind::Condition, factory_for!(NodeKind::Condition));
        registry.register(NodeKind::Loop, factory_for!(NodeKind::Loop));
        registry.register(NodeKind::Parallel, factory_for!(NodeKind::Parallel));
        registry.register(NodeKind::Merge, factory_for!(NodeKind::Merge));
        registry.register(NodeKind::Split, factory_for!(NodeKind::Split));
        registry.register(NodeKind::Transform, factory_for!(NodeKind::Transform));
        registry.register(NodeKind::Validate, factory_for!(NodeKind::Validate));
        registry.register(NodeKind::Aggregate, factory_for!(NodeKind::Aggregate));
        registry.register(NodeKind::Emit, factory_for!(NodeKind::Emit));
        registry
    }

    pub fn register(&mut self, kind: NodeKind, factory: NodeFactory) {
        self.factories.insert(kind, factory);
    }

    /// Builds a node of the given kind from the draft
    pub fn build(&self, kind: NodeKind, draft: NodeDraft) -> Result<IrNode, CompileError> {
        let factory = self
            .factories
            .get(&kind)
            .ok_or_else(|| CompileError::UnknownStepKind(kind.as_str().to_string()))?;
        Ok(factory(draft))
    }
}

impl Default for NodeFactoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_cost_table() {
        assert_eq!(base_cost(NodeKind::Operation), 5.0);
        assert_eq!(base_cost(NodeKind::Loop), 10.0);
        assert_eq!(base_cost(NodeKind::Merge), 1.0);
        assert_eq!(base_cost(NodeKind::Emit), 1.0);
    }

    #[test]
    fn test_builtin_registry_covers_all_kinds() {
        let registry = NodeFactoryRegistry::builtin();
        for kind in [
            NodeKind::Entry,
            NodeKind::Exit,
            NodeKind::Operation,
            NodeKind::Condition,
            NodeKind::Loop,
            NodeKind::Parallel,
            NodeKind::Merge,
            NodeKind::Split,
            NodeKind::Transform,
            NodeKind::Validate,
            NodeKind::Aggregate,
            NodeKind::Emit,
        ] {
            let node = registry.build(kind, NodeDraft::new("n0", "op")).unwrap();
            assert_eq!(node.kind, kind);
        }
    }

    #[test]
    fn test_cost_scales_with_complexity() {
        let registry = NodeFactoryRegistry::builtin();
        let mut draft = NodeDraft::new("n0", "heavy");
        draft.complexity = 3.0;
        let node = registry.build(NodeKind::Operation, draft).unwrap();
        assert_eq!(node.metadata.cost, 15.0);
        assert_eq!(node.metadata.complexity, 3.0);
    }

    #[test]
    fn test_condition_defaults_are_free() {
        let registry = NodeFactoryRegistry::builtin();
        let node = registry
            .build(NodeKind::Condition, NodeDraft::new("n0", "check"))
            .unwrap();
        assert_eq!(node.metadata.reliability, 1.0);
        assert_eq!(node.metadata.latency, 1.0);
        assert_eq!(node.metadata.cost, 1.0);
    }

    #[test]
    fn test_step_estimates_override_defaults() {
        let registry = NodeFactoryRegistry::builtin();
        let mut draft = NodeDraft::new("n0", "risky");
        draft.reliability = Some(0.5);
        draft.latency = Some(200.0);
        let node = registry.build(NodeKind::Operation, draft).unwrap();
        assert_eq!(node.metadata.reliability, 0.5);
        assert_eq!(node.metadata.latency, 200.0);
    }

    #[test]
    fn test_empty_registry_rejects_unregistered_kind() {
        let registry = NodeFactoryRegistry::new();
        let err = registry.build(NodeKind::Loop, NodeDraft::new("n0", "op"));
        assert_eq!(
            err,
            Err(CompileError::UnknownStepKind("loop".to_string()))
        );
    }
}
