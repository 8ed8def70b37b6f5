//! IR data types
//!
//! Types carried by ports and edges. These are coarser than a real type
//! system: the engine only needs enough typing to gate optimizations
//! (void edges, array loop outputs) and to render codegen signatures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Data type tag for ports and edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataType {
    /// No payload; pure control flow
    Void,
    Bool,
    Int,
    Float,
    String,
    /// Homogeneous collection (loop outputs)
    Array,
    /// Untyped structured value
    Object,
    /// Semantic-layer value
    Semantic,
    /// OWL ontology entity reference
    OwlEntity,
    /// A nested workflow
    Workflow,
    /// A schedulable task handle
    Task,
}

impl DataType {
    /// Parses a wire-format type name; unrecognized names degrade to `Object`
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "void" => DataType::Void,
            "bool" | "boolean" => DataType::Bool,
            "int" | "integer" | "number" => DataType::Int,
            "float" | "double" => DataType::Float,
            "string" | "text" => DataType::String,
            "array" | "list" => DataType::Array,
            "semantic" => DataType::Semantic,
            "owl-entity" | "owlentity" => DataType::OwlEntity,
            "workflow" => DataType::Workflow,
            "task" => DataType::Task,
            _ => DataType::Object,
        }
    }

    /// Parses an optional wire name with a fallback
    pub fn parse_or(name: Option<&str>, default: DataType) -> Self {
        name.map(DataType::parse).unwrap_or(default)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Void => "void",
            DataType::Bool => "bool",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::Array => "array",
            DataType::Object => "object",
            DataType::Semantic => "semantic",
            DataType::OwlEntity => "owl-entity",
            DataType::Workflow => "workflow",
            DataType::Task => "task",
        }
    }

    /// Checks if the type carries no payload
    pub fn is_void(&self) -> bool {
        matches!(self, DataType::Void)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
