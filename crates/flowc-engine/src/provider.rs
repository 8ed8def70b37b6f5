//! Semantic context providers
//!
//! The semantic-reasoning algorithm lives outside this system; the engine
//! only depends on this boundary trait. Lookups are async because real
//! providers may sit behind a slow external service.

use async_trait::async_trait;
use flowc_spec::{SemanticContext, WorkflowSpec};
use std::sync::Arc;

/// Supplies the semantic context for a workflow being compiled
#[async_trait]
pub trait SemanticProvider: Send + Sync {
    async fn context_for(&self, spec: &WorkflowSpec) -> Option<Arc<SemanticContext>>;
}

/// Provider that never supplies a context; the annotator falls back to its
/// static concept table
#[derive(Debug, Default)]
pub struct NullProvider;

#[async_trait]
impl SemanticProvider for NullProvider {
    async fn context_for(&self, _spec: &WorkflowSpec) -> Option<Arc<SemanticContext>> {
        None
    }
}

/// Provider backed by one fixed context, shared across compilations
pub struct StaticProvider {
    context: Arc<SemanticContext>,
}

impl StaticProvider {
    pub fn new(context: SemanticContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }
}

#[async_trait]
impl SemanticProvider for StaticProvider {
    async fn context_for(&self, _spec: &WorkflowSpec) -> Option<Arc<SemanticContext>> {
        Some(Arc::clone(&self.context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_provider_yields_nothing() {
        let spec = WorkflowSpec::new("w");
        assert!(NullProvider.context_for(&spec).await.is_none());
    }

    #[tokio::test]
    async fn test_static_provider_shares_one_context() {
        let provider = StaticProvider::new(SemanticContext {
            concepts: vec!["order".into()],
            ..SemanticContext::default()
        });
        let spec = WorkflowSpec::new("w");
        let a = provider.context_for(&spec).await.unwrap();
        let b = provider.context_for(&spec).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.concepts, vec!["order".to_string()]);
    }
}
