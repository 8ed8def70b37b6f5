//! flowc-spec - Workflow specification types
//!
//! The declarative input of the compiler. A `WorkflowSpec` is produced by
//! the authoring layer (CLI, API, tooling) and describes steps plus an
//! optional explicit flow between them. Field names follow the camelCase
//! wire format.

use serde::{Deserialize, Serialize};

/// A complete declarative workflow description
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSpec {
    /// Workflow name
    pub name: String,
    /// Workflow version (defaults to "1.0.0" at compile time)
    #[serde(default)]
    pub version: Option<String>,
    /// Ordered steps
    pub steps: Vec<Step>,
    /// Explicit control/data flow; absent means a linear chain
    #[serde(default)]
    pub flow: Option<FlowSpec>,
    /// Platforms code may be generated for
    #[serde(default)]
    pub target_platforms: Option<Vec<String>>,
}

impl WorkflowSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            steps: Vec::new(),
            flow: None,
            target_platforms: None,
        }
    }

    /// Adds a step (builder style, used by tests and tooling)
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_targets(mut self, targets: Vec<String>) -> Self {
        self.target_platforms = Some(targets);
        self
    }
}

/// Closed set of step kinds the compiler accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Task,
    Condition,
    Loop,
    Parallel,
    Transform,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Task => "task",
            StepKind::Condition => "condition",
            StepKind::Loop => "loop",
            StepKind::Parallel => "parallel",
            StepKind::Transform => "transform",
        }
    }
}

/// One workflow step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Step id; generated positionally when absent
    #[serde(default)]
    pub id: Option<String>,
    /// Step kind
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Operation name (e.g. "fetch_orders", "add")
    pub operation: String,
    /// Free-text description, used for semantic matching
    #[serde(default)]
    pub description: Option<String>,
    /// Declared inputs
    #[serde(default)]
    pub inputs: Vec<PortSpec>,
    /// Declared outputs
    #[serde(default)]
    pub outputs: Vec<PortSpec>,
    /// Step ids this step depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Whether the step may run in parallel
    #[serde(default)]
    pub parallelizable: Option<bool>,
    /// Complexity multiplier for the cost model
    #[serde(default)]
    pub complexity: Option<f64>,
    /// Reliability estimate in [0, 1]
    #[serde(default)]
    pub reliability: Option<f64>,
    #[serde(default)]
    pub estimated_latency: Option<f64>,
    #[serde(default)]
    pub estimated_memory: Option<f64>,
    #[serde(default)]
    pub estimated_cpu: Option<f64>,
    /// Authoring-layer source location, carried for diagnostics
    #[serde(default)]
    pub source_location: Option<String>,

    // Kind-specific fields
    /// Guard expression (condition steps, loop exit condition)
    #[serde(default)]
    pub condition: Option<String>,
    /// Loop flavor ("for", "while", "foreach")
    #[serde(default)]
    pub loop_type: Option<String>,
    /// Iterator expression (loop steps); `const:`-taggable
    #[serde(default)]
    pub iterator: Option<String>,
    /// Branch labels (parallel steps)
    #[serde(default)]
    pub parallel: Option<Vec<String>>,
    /// Input expression (transform steps)
    #[serde(default)]
    pub input: Option<String>,
    /// Transform flavor ("map", "filter", ...)
    #[serde(default)]
    pub transform_type: Option<String>,
    /// Output type name (transform steps)
    #[serde(default)]
    pub output_type: Option<String>,
}

impl Step {
    pub fn new(kind: StepKind, operation: impl Into<String>) -> Self {
        Self {
            id: None,
            kind,
            operation: operation.into(),
            description: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            dependencies: Vec::new(),
            parallelizable: None,
            complexity: None,
            reliability: None,
            estimated_latency: None,
            estimated_memory: None,
            estimated_cpu: None,
            source_location: None,
            condition: None,
            loop_type: None,
            iterator: None,
            parallel: None,
            input: None,
            transform_type: None,
            output_type: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_input(mut self, port: PortSpec) -> Self {
        self.inputs.push(port);
        self
    }

    pub fn with_output(mut self, port: PortSpec) -> Self {
        self.outputs.push(port);
        self
    }

    pub fn parallelizable(mut self, value: bool) -> Self {
        self.parallelizable = Some(value);
        self
    }

    pub fn with_complexity(mut self, value: f64) -> Self {
        self.complexity = Some(value);
        self
    }
}

/// A declared input or output port on a step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortSpec {
    /// Port name
    pub name: String,
    /// Data type name ("void", "int", "string", "semantic", ...)
    #[serde(rename = "type", default)]
    pub data_type: Option<String>,
    /// Value source; `const:<literal>` marks a compile-time constant
    #[serde(default)]
    pub source: Option<String>,
    /// Whether the input may be absent at runtime
    #[serde(default)]
    pub optional: bool,
    /// Constraint labels
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Whether the produced value may be cached (outputs)
    #[serde(default)]
    pub cacheable: bool,
    /// Step ids the output feeds (outputs)
    #[serde(default)]
    pub targets: Vec<String>,
}

impl PortSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
            source: None,
            optional: false,
            constraints: Vec::new(),
            cacheable: false,
            targets: Vec::new(),
        }
    }

    pub fn typed(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    pub fn from_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Shorthand for a `const:`-tagged port
    pub fn constant(name: impl Into<String>, literal: impl Into<String>) -> Self {
        Self::new(name).from_source(format!("const:{}", literal.into()))
    }
}

/// Explicit flow section of a workflow spec
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSpec {
    pub connections: Vec<Connection>,
}

/// A declared connection between two steps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Source step id
    pub from: String,
    /// Destination step id
    pub to: String,
    /// Data type carried by the edge (defaults to "void")
    #[serde(default)]
    pub data_type: Option<String>,
    /// Edge weight (defaults to 1)
    #[serde(default)]
    pub weight: Option<f64>,
    /// Guard condition expression
    #[serde(default)]
    pub condition: Option<String>,
}

/// Semantic context supplied by an external reasoning provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticContext {
    /// Domain concept names
    #[serde(default)]
    pub concepts: Vec<String>,
    /// Concept relationships
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    /// Property constraints
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

/// A predicate/object relationship in the semantic context
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub predicate: String,
    pub object: String,
}

/// A property constraint in the semantic context
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub property: String,
    #[serde(rename = "type")]
    pub kind: String,
}
