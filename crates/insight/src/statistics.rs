use crate::completion::CompletionService;
use crate::error::Result;
use crate::history::HistorySnapshot;
use crate::outcome::Augmentation;
use crate::payload::decode_payload;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PatternInsight {
    #[serde(default)]
    pub common_contexts: Vec<String>,
    #[serde(default)]
    pub related_errors: Vec<String>,
}

fn insight_prompt(error_type: &str, snapshot: &HistorySnapshot) -> Result<String> {
    let history = serde_json::to_string(&snapshot.recent)?;
    Ok(format!(
        r#"Analyze these {count} instances of {error_type} errors in a Python project.

Error history:
{history}

Based on these patterns, answer in JSON format:
{{
    "common_contexts": [list of 2-3 coding patterns or contexts where this error occurs most frequently],
    "related_errors": [list of 2-3 other error types that might occur in similar situations]
}}

Be specific about the patterns you observe."#,
        count = snapshot.frequency
    ))
}

/// Ask the model what a project's repeated occurrences of one error have in
/// common. Only a history with more than one occurrence is worth a call.
pub async fn pattern_insight(
    service: &dyn CompletionService,
    error_type: &str,
    snapshot: &HistorySnapshot,
) -> Augmentation<PatternInsight> {
    if snapshot.frequency <= 1 {
        return Augmentation::Skipped;
    }

    let result = match insight_prompt(error_type, snapshot) {
        Ok(prompt) => match service.complete(&prompt).await {
            Ok(text) => decode_payload::<PatternInsight>(&text),
            Err(err) => Err(err),
        },
        Err(err) => Err(err),
    };
    if let Err(err) = &result {
        log::warn!("Pattern analysis unavailable for {error_type}: {err}");
    }
    Augmentation::from_result(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::OfflineCompletion;
    use crate::history::{HistoryRecord, HistoryStore};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct Recording {
        reply: &'static str,
        prompts: Mutex<Vec<String>>,
    }

    impl Recording {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionService for Recording {
        fn provider(&self) -> &str {
            "recording"
        }

        async fn complete(&self, prompt: &str) -> crate::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.to_string())
        }
    }

    fn snapshot_with(count: usize) -> HistorySnapshot {
        let store = HistoryStore::new();
        let mut snapshot = None;
        for i in 0..count {
            snapshot = Some(store.record(
                "proj",
                "KeyError",
                HistoryRecord::now(format!("KeyError: 'k{i}'"), None),
            ));
        }
        snapshot.unwrap()
    }

    #[tokio::test]
    async fn single_occurrence_skips_the_model() {
        let service = Recording::new("{}");
        let outcome = pattern_insight(&service, "KeyError", &snapshot_with(1)).await;
        assert!(matches!(outcome, Augmentation::Skipped));
        assert!(service.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_errors_are_analyzed() {
        let service = Recording::new(
            "```json\n{\"common_contexts\": [\"dict lookups\"], \"related_errors\": [\"IndexError\"]}\n```",
        );
        let insight = pattern_insight(&service, "KeyError", &snapshot_with(7))
            .await
            .generated()
            .unwrap();
        assert_eq!(insight.common_contexts, vec!["dict lookups".to_string()]);
        assert_eq!(insight.related_errors, vec!["IndexError".to_string()]);

        let prompts = service.prompts.lock().unwrap();
        assert!(prompts[0].starts_with("Analyze these 7 instances of KeyError errors"));
        // Only the five latest records are sent.
        assert!(!prompts[0].contains("KeyError: 'k1'"));
        assert!(prompts[0].contains("KeyError: 'k2'"));
        assert!(prompts[0].contains("KeyError: 'k6'"));
    }

    #[tokio::test]
    async fn missing_keys_default_to_empty_lists() {
        let service = Recording::new("{}");
        let insight = pattern_insight(&service, "KeyError", &snapshot_with(2))
            .await
            .generated()
            .unwrap();
        assert_eq!(insight, PatternInsight::default());
    }

    #[tokio::test]
    async fn failures_are_reported_not_raised() {
        let outcome = pattern_insight(&OfflineCompletion, "KeyError", &snapshot_with(3)).await;
        assert!(matches!(outcome, Augmentation::Failed(_)));

        let service = Recording::new("[\"not\", \"an object\"]");
        let outcome = pattern_insight(&service, "KeyError", &snapshot_with(3)).await;
        assert!(matches!(outcome, Augmentation::Failed(_)));
    }
}
