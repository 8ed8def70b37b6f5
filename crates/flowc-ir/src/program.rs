//! IR Program - the complete compiled graph
//!
//! An `IrProgram` is created once by the compiler and is immutable after it
//! is stored. Optimization never touches a stored program: it works on a
//! [`IrProgram::fork`], which is an explicit structural clone under a fresh
//! id. The semantic context is a shared read-only back-reference and is not
//! deep-cloned.

use crate::node::{IrEdge, IrNode};
use flowc_error::CompileError;
use flowc_spec::SemanticContext;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A compiled workflow as a typed node/edge graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrProgram {
    /// Unique program id (uuid v4)
    pub id: String,
    pub name: String,
    pub version: String,
    pub nodes: Vec<IrNode>,
    pub edges: Vec<IrEdge>,
    /// Nodes where execution may begin (structural heuristic, see compiler)
    pub entry_points: Vec<String>,
    /// Nodes where execution may end
    pub exit_points: Vec<String>,
    /// Global constants
    #[serde(default)]
    pub constants: BTreeMap<String, Value>,
    /// Read-only back-reference to the semantic context used at compile time
    #[serde(skip)]
    pub semantic_context: Option<Arc<SemanticContext>>,
    /// Names of optimization passes applied, in order
    #[serde(default)]
    pub optimization_passes: Vec<String>,
    /// Platforms code may be generated for
    #[serde(default)]
    pub target_platforms: Vec<String>,
}

impl IrProgram {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            version: version.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            entry_points: Vec::new(),
            exit_points: Vec::new(),
            constants: BTreeMap::new(),
            semantic_context: None,
            optimization_passes: Vec::new(),
            target_platforms: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: IrNode) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: IrEdge) {
        self.edges.push(edge);
    }

    /// Finds a node by id
    pub fn get_node(&self, id: &str) -> Option<&IrNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Finds a mutable node by id
    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut IrNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Edges arriving at the node
    pub fn incoming_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a IrEdge> {
        self.edges.iter().filter(move |e| e.to == node_id)
    }

    /// Edges leaving the node
    pub fn outgoing_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a IrEdge> {
        self.edges.iter().filter(move |e| e.from == node_id)
    }

    /// Checks the structural invariants: unique node ids, no dangling edges
    pub fn validate(&self) -> Result<(), CompileError> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(CompileError::DuplicateNode(node.id.clone()));
            }
        }
        for edge in &self.edges {
            for endpoint in [&edge.from, &edge.to] {
                if !seen.contains(endpoint.as_str()) {
                    return Err(CompileError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Structural clone under a fresh id, for fork-then-mutate optimization.
    /// The semantic context reference is shared, not deep-cloned.
    pub fn fork(&self) -> Self {
        let mut clone = self.clone();
        clone.id = Uuid::new_v4().to_string();
        clone
    }

    /// Derives cost/complexity aggregates over the whole graph
    pub fn analyze(&self) -> ComplexityAnalysis {
        let node_count = self.nodes.len();
        let total_cost = self.nodes.iter().map(|n| n.metadata.cost).sum();
        let max_complexity = self
            .nodes
            .iter()
            .map(|n| n.metadata.complexity)
            .fold(0.0_f64, f64::max);
        let avg_reliability = if node_count == 0 {
            0.0
        } else {
            self.nodes.iter().map(|n| n.metadata.reliability).sum::<f64>() / node_count as f64
        };
        let parallelizability = if node_count == 0 {
            0.0
        } else {
            self.nodes.iter().filter(|n| n.parallelizable).count() as f64 / node_count as f64
        };

        ComplexityAnalysis {
            total_cost,
            max_complexity,
            avg_reliability,
            parallelizability,
            node_count,
            edge_count: self.edges.len(),
            entry_count: self.entry_points.len(),
            exit_count: self.exit_points.len(),
        }
    }
}

impl fmt::Display for IrProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; Program: {} v{} ({})", self.name, self.version, self.id)?;
        if !self.target_platforms.is_empty() {
            writeln!(f, "; Targets: {}", self.target_platforms.join(", "))?;
        }
        if !self.optimization_passes.is_empty() {
            writeln!(f, "; Passes: {}", self.optimization_passes.join(", "))?;
        }
        writeln!(f)?;

        for node in &self.nodes {
            write!(
                f,
                "%{} = {} \"{}\" cost={} level={}",
                node.id, node.kind, node.operation, node.metadata.cost, node.optimization_level
            )?;
            if node.parallelizable {
                write!(f, " parallelizable")?;
            }
            writeln!(f)?;
            for input in &node.inputs {
                match &input.source {
                    Some(source) => {
                        writeln!(f, "  in  {}: {} <- {}", input.name, input.data_type, source)?
                    }
                    None => writeln!(f, "  in  {}: {}", input.name, input.data_type)?,
                }
            }
            for output in &node.outputs {
                writeln!(f, "  out {}: {}", output.name, output.data_type)?;
            }
        }

        if !self.edges.is_empty() {
            writeln!(f)?;
            for edge in &self.edges {
                write!(
                    f,
                    "%{} -> %{} ({}, w={})",
                    edge.from, edge.to, edge.data_type, edge.weight
                )?;
                if let Some(cond) = &edge.condition {
                    write!(f, " if {}", cond)?;
                }
                writeln!(f)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "; Entries: {}", self.entry_points.join(", "))?;
        writeln!(f, "; Exits: {}", self.exit_points.join(", "))
    }
}

/// Aggregate complexity metrics derived from a program (not stored)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityAnalysis {
    pub total_cost: f64,
    pub max_complexity: f64,
    pub avg_reliability: f64,
    /// Fraction of nodes marked parallelizable
    pub parallelizability: f64,
    pub node_count: usize,
    pub edge_count: usize,
    pub entry_count: usize,
    pub exit_count: usize,
}
