use crate::error::{InsightError, Result};
use async_trait::async_trait;

/// Text-completion collaborator: prompt in, free text out.
#[async_trait]
pub trait CompletionService: Send + Sync {
    fn provider(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Completion backend used when AI is disabled. Every call fails, so callers
/// always land on their fallback content.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCompletion;

#[async_trait]
impl CompletionService for OfflineCompletion {
    fn provider(&self) -> &str {
        "offline"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(InsightError::Offline)
    }
}
