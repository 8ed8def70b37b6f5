//! IR nodes, ports and edges

use crate::types::DataType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Node kinds in the IR graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Entry,
    Exit,
    /// A plain unit of work (lowered from a task step)
    Operation,
    Condition,
    Loop,
    Parallel,
    /// Joins branch results back into one value
    Merge,
    /// Fans a value out to parallel branches
    Split,
    Transform,
    Validate,
    Aggregate,
    Emit,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Entry => "entry",
            NodeKind::Exit => "exit",
            NodeKind::Operation => "operation",
            NodeKind::Condition => "condition",
            NodeKind::Loop => "loop",
            NodeKind::Parallel => "parallel",
            NodeKind::Merge => "merge",
            NodeKind::Split => "split",
            NodeKind::Transform => "transform",
            NodeKind::Validate => "validate",
            NodeKind::Aggregate => "aggregate",
            NodeKind::Emit => "emit",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cost and resource estimates attached to every node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrMetadata {
    /// Estimated execution cost (base cost × complexity)
    pub cost: f64,
    /// Complexity multiplier from the step
    pub complexity: f64,
    /// Reliability in [0, 1]
    pub reliability: f64,
    /// Estimated latency (ms)
    pub latency: f64,
    /// Estimated memory footprint (KB)
    pub memory: f64,
    /// Estimated CPU share (%)
    pub cpu: f64,
}

impl Default for IrMetadata {
    fn default() -> Self {
        Self {
            cost: 1.0,
            complexity: 1.0,
            reliability: 0.95,
            latency: 10.0,
            memory: 64.0,
            cpu: 25.0,
        }
    }
}

/// A declared node input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrInput {
    pub id: String,
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub optional: bool,
    /// Value source; the `const:` prefix marks a compile-time constant
    #[serde(default)]
    pub source: Option<String>,
}

impl IrInput {
    pub fn new(id: impl Into<String>, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data_type,
            constraints: Vec::new(),
            optional: false,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the literal when the source is `const:`-tagged
    pub fn const_value(&self) -> Option<&str> {
        self.source.as_deref().and_then(|s| s.strip_prefix("const:"))
    }
}

/// A declared node output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrOutput {
    pub id: String,
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Node ids this output feeds
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub cacheable: bool,
    /// Folded compile-time value, when constant folding replaced the node
    #[serde(default)]
    pub value: Option<Value>,
}

impl IrOutput {
    pub fn new(id: impl Into<String>, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data_type,
            constraints: Vec::new(),
            targets: Vec::new(),
            cacheable: false,
            value: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

/// A confidence-scored association between a node and a domain concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticAnnotation {
    pub concept: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Relationship labels related to the concept
    #[serde(default)]
    pub relationships: Vec<String>,
    /// Constraint labels related to the concept
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl SemanticAnnotation {
    pub fn new(concept: impl Into<String>, confidence: f64) -> Self {
        Self {
            concept: concept.into(),
            confidence,
            relationships: Vec::new(),
            constraints: Vec::new(),
        }
    }
}

/// One node of the IR graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrNode {
    pub id: String,
    pub kind: NodeKind,
    pub operation: String,
    #[serde(default)]
    pub inputs: Vec<IrInput>,
    #[serde(default)]
    pub outputs: Vec<IrOutput>,
    pub metadata: IrMetadata,
    /// Highest optimization level applied; monotone once raised
    #[serde(default)]
    pub optimization_level: u8,
    #[serde(default)]
    pub semantic_annotations: Vec<SemanticAnnotation>,
    /// Node ids this node depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub parallelizable: bool,
}

impl IrNode {
    pub fn new(id: impl Into<String>, kind: NodeKind, operation: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            operation: operation.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            metadata: IrMetadata::default(),
            optimization_level: 0,
            semantic_annotations: Vec::new(),
            dependencies: Vec::new(),
            parallelizable: false,
        }
    }

    /// Finds an input by name
    pub fn input(&self, name: &str) -> Option<&IrInput> {
        self.inputs.iter().find(|i| i.name == name)
    }

    /// Finds an output by name
    pub fn output(&self, name: &str) -> Option<&IrOutput> {
        self.outputs.iter().find(|o| o.name == name)
    }

    pub fn is_annotated(&self) -> bool {
        !self.semantic_annotations.is_empty()
    }

    /// True if every input is `const:`-tagged (and there is at least one)
    pub fn all_inputs_const(&self) -> bool {
        !self.inputs.is_empty() && self.inputs.iter().all(|i| i.const_value().is_some())
    }

    /// Raises the optimization level; never lowers it
    pub fn raise_optimization_level(&mut self, level: u8) {
        if level > self.optimization_level {
            self.optimization_level = level;
        }
    }
}

/// A directed, typed link between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub data_type: DataType,
    pub weight: f64,
    /// Guard condition expression
    #[serde(default)]
    pub condition: Option<String>,
}

impl IrEdge {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        data_type: DataType,
        weight: f64,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            data_type,
            weight,
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}
