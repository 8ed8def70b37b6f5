//! Observability events
//!
//! Every engine operation emits one or more events on a broadcast channel;
//! per-pass events carry the pass's impact count. Consumers subscribe with
//! [`tokio::sync::broadcast::Receiver`]; a lagging consumer drops events
//! rather than backpressuring the engine.

use tokio::sync::broadcast;

/// Events published by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    WorkflowCompiled {
        program_id: String,
        workflow: String,
        node_count: usize,
    },
    CompilationFailed {
        workflow: String,
        message: String,
    },
    /// One event per executed pass
    OptimizationApplied {
        program_id: String,
        pass: String,
        impact: usize,
    },
    ProgramOptimized {
        program_id: String,
        source_id: String,
        passes: usize,
    },
    CodeGenerated {
        program_id: String,
        target: String,
        size: usize,
    },
    DeadCodeEliminated {
        program_id: String,
        removed: usize,
    },
    ConstantsFolded {
        program_id: String,
        folded: usize,
    },
    SemanticsOptimized {
        program_id: String,
        rewritten: usize,
    },
    ParallelismDetected {
        program_id: String,
        promoted: usize,
    },
    LoopsOptimized {
        program_id: String,
        rewritten: usize,
    },
    MemoryLayoutOptimized {
        program_id: String,
        moved: usize,
    },
}

impl EngineEvent {
    /// The pass-specific event for a completed pass, if the pass has one
    pub fn for_pass(program_id: &str, pass: &str, impact: usize) -> Option<Self> {
        let program_id = program_id.to_string();
        match pass {
            "dead-code-elimination" => Some(EngineEvent::DeadCodeEliminated {
                program_id,
                removed: impact,
            }),
            "constant-folding" => Some(EngineEvent::ConstantsFolded {
                program_id,
                folded: impact,
            }),
            "semantic-optimization" => Some(EngineEvent::SemanticsOptimized {
                program_id,
                rewritten: impact,
            }),
            "parallel-detection" => Some(EngineEvent::ParallelismDetected {
                program_id,
                promoted: impact,
            }),
            "loop-optimization" => Some(EngineEvent::LoopsOptimized {
                program_id,
                rewritten: impact,
            }),
            "memory-layout" => Some(EngineEvent::MemoryLayoutOptimized {
                program_id,
                moved: impact,
            }),
            _ => None,
        }
    }
}

/// Broadcast hub for engine events
pub struct EventBus {
    sender: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event; dropped silently when nobody listens
    pub fn publish(&self, event: EngineEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
