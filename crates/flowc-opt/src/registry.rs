//! Pass registry
//!
//! An explicit value constructed once and injected into the pipeline; no
//! process-wide singleton. Each entry carries an enabled flag and free-form
//! parameters forwarded to the pass.

use crate::passes::{
    ConstantFolding, DeadCodeElimination, LoopOptimization, MemoryLayout, ParallelDetection,
    SemanticOptimization,
};
use crate::{Pass, PassParams};
use serde_json::Value;
use std::sync::Arc;

/// A registered pass with its configuration
#[derive(Clone)]
pub struct PassEntry {
    pub pass: Arc<dyn Pass>,
    pub enabled: bool,
    pub params: PassParams,
}

impl PassEntry {
    fn new(pass: Arc<dyn Pass>) -> Self {
        Self {
            pass,
            enabled: true,
            params: PassParams::new(),
        }
    }
}

/// Registry of optimization passes
#[derive(Clone, Default)]
pub struct PassRegistry {
    entries: Vec<PassEntry>,
}

impl PassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the six builtin passes, all enabled
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DeadCodeElimination));
        registry.register(Arc::new(ConstantFolding));
        registry.register(Arc::new(SemanticOptimization));
        registry.register(Arc::new(ParallelDetection));
        registry.register(Arc::new(LoopOptimization));
        registry.register(Arc::new(MemoryLayout));
        registry
    }

    pub fn register(&mut self, pass: Arc<dyn Pass>) {
        self.entries.push(PassEntry::new(pass));
    }

    /// Enables or disables a pass; returns false for unknown names
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.pass.name() == name) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Sets a free-form parameter on a pass; returns false for unknown names
    pub fn set_param(&mut self, name: &str, key: impl Into<String>, value: Value) -> bool {
        match self.entries.iter_mut().find(|e| e.pass.name() == name) {
            Some(entry) => {
                entry.params.insert(key.into(), value);
                true
            }
            None => false,
        }
    }

    pub fn entry(&self, name: &str) -> Option<&PassEntry> {
        self.entries.iter().find(|e| e.pass.name() == name)
    }

    /// Enabled passes gated at or below `level`, stable-sorted ascending
    pub fn select(&self, level: u8) -> Vec<&PassEntry> {
        let mut selected: Vec<&PassEntry> = self
            .entries
            .iter()
            .filter(|e| e.enabled && e.pass.level() <= level)
            .collect();
        selected.sort_by_key(|e| e.pass.level());
        selected
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.pass.name()).collect()
    }
}
