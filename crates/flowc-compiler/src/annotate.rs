//! Semantic annotation
//!
//! Runs program-wide after node construction and only touches nodes that
//! have no annotations yet (attachment is idempotent). With a semantic
//! context, concepts are matched case-insensitively against the step's
//! operation/description text at confidence 0.8; without a match the
//! static kind table applies at confidence 0.6.

use flowc_ir::{IrProgram, NodeKind, SemanticAnnotation};
use flowc_spec::SemanticContext;
use std::collections::HashMap;

/// Confidence for a concept matched from the supplied context
const CONTEXT_CONFIDENCE: f64 = 0.8;
/// Confidence for the static fallback table
const FALLBACK_CONFIDENCE: f64 = 0.6;

/// Maps nodes to domain concepts
#[derive(Debug, Default)]
pub struct SemanticAnnotator;

impl SemanticAnnotator {
    pub fn new() -> Self {
        Self
    }

    /// Annotates every node that has no annotations yet.
    ///
    /// `texts` carries the originating step text per node id; nodes without
    /// an entry fall back to their operation name.
    pub fn annotate(
        &self,
        program: &mut IrProgram,
        texts: &HashMap<String, String>,
        context: Option<&SemanticContext>,
    ) {
        for node in &mut program.nodes {
            if node.is_annotated() {
                continue;
            }
            let text = texts
                .get(&node.id)
                .cloned()
                .unwrap_or_else(|| node.operation.clone())
                .to_lowercase();

            let mut annotations = Vec::new();
            if let Some(ctx) = context {
                annotations = match_context(&text, ctx);
            }
            if annotations.is_empty() {
                annotations = fallback_annotations(node.kind);
            }
            node.semantic_annotations = annotations;
        }
    }
}

/// Case-insensitive substring match of context concepts against step text
fn match_context(text: &str, ctx: &SemanticContext) -> Vec<SemanticAnnotation> {
    let mut annotations = Vec::new();
    for concept in &ctx.concepts {
        let needle = concept.to_lowercase();
        if needle.is_empty() || !text.contains(&needle) {
            continue;
        }
        let mut annotation = SemanticAnnotation::new(concept.clone(), CONTEXT_CONFIDENCE);
        annotation.relationships = ctx
            .relationships
            .iter()
            .filter(|r| r.object.to_lowercase().contains(&needle))
            .map(|r| r.predicate.clone())
            .collect();
        annotation.constraints = ctx
            .constraints
            .iter()
            .filter(|c| c.property.to_lowercase().contains(&needle))
            .map(|c| c.property.clone())
            .collect();
        annotations.push(annotation);
    }
    annotations
}

/// Static operation → concept table
fn fallback_concepts(kind: NodeKind) -> &'static [&'static str] {
    match kind {
        NodeKind::Operation => &["execution", "process", "action"],
        NodeKind::Condition => &["decision", "branch", "logic"],
        NodeKind::Loop => &["iteration", "repetition", "cycle"],
        NodeKind::Parallel | NodeKind::Split => &["concurrency", "parallelism", "distribution"],
        NodeKind::Transform => &["transformation", "mapping", "conversion"],
        NodeKind::Validate => &["validation", "verification", "check"],
        NodeKind::Aggregate => &["aggregation", "collection", "summarization"],
        _ => &[],
    }
}

fn fallback_annotations(kind: NodeKind) -> Vec<SemanticAnnotation> {
    fallback_concepts(kind)
        .iter()
        .map(|concept| SemanticAnnotation::new(*concept, FALLBACK_CONFIDENCE))
        .collect()
}
