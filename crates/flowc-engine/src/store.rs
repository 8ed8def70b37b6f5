//! Program store
//!
//! Keyed in-memory registry of every compiled and optimized program.
//! Values are `Arc<IrProgram>`: stored programs are immutable, so lookups
//! hand out shared references and concurrent readers never block writers
//! for long. A concurrent delete+get on the same id resolves to
//! `UnknownProgram`, never to a torn read.

use dashmap::DashMap;
use flowc_error::{EngineError, Result};
use flowc_ir::{ComplexityAnalysis, IrProgram};
use std::sync::Arc;

#[derive(Default)]
pub struct ProgramStore {
    programs: DashMap<String, Arc<IrProgram>>,
}

impl ProgramStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a program under its own id
    pub fn insert(&self, program: IrProgram) -> Arc<IrProgram> {
        let program = Arc::new(program);
        self.programs
            .insert(program.id.clone(), Arc::clone(&program));
        program
    }

    pub fn get(&self, id: &str) -> Option<Arc<IrProgram>> {
        self.programs.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Like `get`, but with the store's lookup error
    pub fn require(&self, id: &str) -> Result<Arc<IrProgram>> {
        self.get(id)
            .ok_or_else(|| EngineError::UnknownProgram(id.to_string()))
    }

    /// Every stored program, in no particular order
    pub fn list(&self) -> Vec<Arc<IrProgram>> {
        self.programs
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Removes a program; returns whether one was removed
    pub fn delete(&self, id: &str) -> bool {
        self.programs.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Derives complexity aggregates for a stored program
    pub fn analyze(&self, id: &str) -> Result<ComplexityAnalysis> {
        Ok(self.require(id)?.analyze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_ir::{IrNode, NodeKind};

    fn program(name: &str) -> IrProgram {
        let mut p = IrProgram::new(name, "1.0.0");
        let mut node = IrNode::new("n0", NodeKind::Operation, "work");
        node.metadata.cost = 5.0;
        p.add_node(node);
        p
    }

    #[test]
    fn test_insert_get_list_delete() {
        let store = ProgramStore::new();
        let stored = store.insert(program("a"));
        store.insert(program("b"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&stored.id).unwrap().name, "a");
        assert_eq!(store.list().len(), 2);

        assert!(store.delete(&stored.id));
        assert!(!store.delete(&stored.id));
        assert!(store.get(&stored.id).is_none());
    }

    #[test]
    fn test_require_unknown_id() {
        let store = ProgramStore::new();
        let err = store.require("ghost").unwrap_err();
        assert!(matches!(err, EngineError::UnknownProgram(_)));
    }

    #[test]
    fn test_analyze_uses_stored_program() {
        let store = ProgramStore::new();
        let stored = store.insert(program("a"));
        let analysis = store.analyze(&stored.id).unwrap();
        assert_eq!(analysis.total_cost, 5.0);
        assert_eq!(analysis.node_count, 1);
    }
}
