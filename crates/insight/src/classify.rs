use crate::completion::CompletionService;
use crate::error::Result;
use crate::payload::decode_payload;
use errlens_protocol::{ErrorInput, Solution};
use serde::Deserialize;

pub const UNKNOWN_ERROR_TYPE: &str = "Unknown Error";

fn unknown_error_type() -> String {
    UNKNOWN_ERROR_TYPE.to_string()
}

/// Model-produced classification of an error the catalog does not know.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Classification {
    #[serde(default = "unknown_error_type")]
    pub error_type: String,
    #[serde(default)]
    pub solutions: Vec<Solution>,
    #[serde(default)]
    pub concepts: Vec<String>,
}

fn classify_prompt(input: &ErrorInput) -> String {
    let context = input
        .context()
        .map(|ctx| format!("Code context: {ctx}"))
        .unwrap_or_default();
    format!(
        r#"Analyze this Python error message that doesn't match our standard patterns:

Error message: {message}

{context}

Provide a JSON response with:
{{
    "error_type": "The likely error type",
    "solutions": [
        {{
            "fix": "Suggested fix",
            "explanation": "Why this error happens",
            "confidence": 0.7,
            "code_example": "Example code showing the fix"
        }}
    ],
    "concepts": ["concept1", "concept2"]
}}"#,
        message = input.error_message
    )
}

pub async fn classify_unknown(
    service: &dyn CompletionService,
    input: &ErrorInput,
) -> Result<Classification> {
    let text = service.complete(&classify_prompt(input)).await?;
    let classification: Classification = decode_payload(&text)?;
    log::debug!(
        "AI classified unknown error as {} ({} solutions)",
        classification.error_type,
        classification.solutions.len()
    );
    Ok(classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::OfflineCompletion;
    use crate::error::InsightError;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct Canned(&'static str);

    #[async_trait]
    impl CompletionService for Canned {
        fn provider(&self) -> &str {
            "canned"
        }

        async fn complete(&self, _prompt: &str) -> crate::Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn prompt_includes_context_only_when_present() {
        let bare = classify_prompt(&ErrorInput::new("RecursionError: too deep"));
        assert!(bare.contains("Error message: RecursionError: too deep"));
        assert!(!bare.contains("Code context:"));

        let with_ctx =
            classify_prompt(&ErrorInput::new("RecursionError").with_context("def f(): f()"));
        assert!(with_ctx.contains("Code context: def f(): f()"));
    }

    #[tokio::test]
    async fn fenced_classification_is_decoded() {
        let service = Canned(
            r#"```json
{
  "error_type": "RecursionError",
  "solutions": [
    {"fix": "Add a base case", "explanation": "Unbounded recursion", "confidence": 0.8, "code_example": "def f(n):\n    if n == 0: return"}
  ],
  "concepts": ["recursion"]
}
```"#,
        );
        let classification = classify_unknown(&service, &ErrorInput::new("RecursionError"))
            .await
            .unwrap();
        assert_eq!(classification.error_type, "RecursionError");
        assert_eq!(classification.solutions.len(), 1);
        assert_eq!(classification.solutions[0].confidence, 0.8);
        assert_eq!(classification.concepts, vec!["recursion".to_string()]);
    }

    #[tokio::test]
    async fn missing_fields_take_defaults() {
        let classification = classify_unknown(&Canned("{}"), &ErrorInput::new("???"))
            .await
            .unwrap();
        assert_eq!(classification.error_type, UNKNOWN_ERROR_TYPE);
        assert!(classification.solutions.is_empty());
        assert!(classification.concepts.is_empty());
    }

    #[tokio::test]
    async fn incomplete_solution_is_an_error() {
        let service = Canned(r#"{"error_type": "X", "solutions": [{"fix": "only a fix"}]}"#);
        let err = classify_unknown(&service, &ErrorInput::new("X")).await.unwrap_err();
        assert!(matches!(err, InsightError::Decode(_)));
    }

    #[tokio::test]
    async fn service_failure_propagates() {
        let err = classify_unknown(&OfflineCompletion, &ErrorInput::new("X"))
            .await
            .unwrap_err();
        assert!(matches!(err, InsightError::Offline));
    }
}
