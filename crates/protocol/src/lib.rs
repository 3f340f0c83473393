use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "python";

/// Language tags advertised by `GET /supported_languages`.
pub const SUPPORTED_LANGUAGES: [&str; 4] = ["python", "javascript", "java", "csharp"];

/// Confidence assigned to solutions derived from the caller's own code.
pub const CONTEXT_SOLUTION_CONFIDENCE: f64 = 0.95;

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct ErrorInput {
    pub error_message: String,
    #[serde(default)]
    pub code_context: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl ErrorInput {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
            code_context: None,
            language: default_language(),
            project_id: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, code_context: impl Into<String>) -> Self {
        self.code_context = Some(code_context.into());
        self
    }

    #[must_use]
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Project identifier, with blank values treated as absent.
    pub fn project(&self) -> Option<&str> {
        self.project_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Code context, with blank values treated as absent.
    pub fn context(&self) -> Option<&str> {
        self.code_context.as_deref().filter(|ctx| !ctx.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct Solution {
    pub fix: String,
    pub explanation: String,
    pub confidence: f64,
    pub code_example: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct LearningResource {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    /// article, video, tutorial, guide, ...
    pub resource_type: String,
}

impl LearningResource {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        resource_type: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: None,
            resource_type: resource_type.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct ErrorStatistics {
    pub frequency: Option<usize>,
    pub common_contexts: Option<Vec<String>>,
    pub related_errors: Option<Vec<String>>,
    pub last_occurrence: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct ErrorResponse {
    pub error_type: String,
    pub solutions: Vec<Solution>,
    pub concepts: Vec<String>,
    #[serde(default)]
    pub learning_resources: Option<Vec<LearningResource>>,
    #[serde(default)]
    pub statistics: Option<ErrorStatistics>,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// JSON Schemas of the request and response bodies, keyed by type name.
pub fn api_schemas() -> serde_json::Value {
    serde_json::json!({
        "ErrorInput": schemars::schema_for!(ErrorInput),
        "ErrorResponse": schemars::schema_for!(ErrorResponse),
        "ErrorEnvelope": schemars::schema_for!(ErrorEnvelope),
    })
}
