use errlens_catalog::{analyze_context, PatternCatalog};
use errlens_insight::{
    classify_unknown, fallback_resources, learning_resources, pattern_insight, Augmentation,
    CompletionService, HistoryRecord, HistoryStore, InsightError,
};
use errlens_protocol::{ErrorInput, ErrorResponse, ErrorStatistics, Solution};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Error pattern not recognized and AI analysis failed: {0}")]
    NotRecognized(#[source] InsightError),
}

/// Request handler: catalog match, context enrichment, AI augmentation.
///
/// Only a catalog miss followed by a failed AI classification is an error;
/// every augmentation failure degrades to fallback or absent content.
pub struct Analyzer {
    catalog: &'static PatternCatalog,
    history: Arc<HistoryStore>,
    completion: Arc<dyn CompletionService>,
}

impl Analyzer {
    pub fn new(completion: Arc<dyn CompletionService>, history: Arc<HistoryStore>) -> Self {
        Self {
            catalog: PatternCatalog::builtin(),
            history,
            completion,
        }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        self.catalog
    }

    pub async fn analyze(&self, input: &ErrorInput) -> Result<ErrorResponse, AnalyzeError> {
        if let Some(entry) = self.catalog.match_message(&input.error_message) {
            let mut solutions = entry.solutions();
            if let Some(context) = input.context() {
                if let Some(finding) = analyze_context(entry.label(), &input.error_message, context)
                {
                    solutions.insert(0, finding.into_solution(context));
                }
            }
            return Ok(self
                .augment(input, entry.label().to_string(), solutions, entry.concepts())
                .await);
        }

        let classification = classify_unknown(self.completion.as_ref(), input)
            .await
            .map_err(|err| {
                log::warn!("Failed to analyze unknown error: {err}");
                AnalyzeError::NotRecognized(err)
            })?;
        Ok(self
            .augment(
                input,
                classification.error_type,
                classification.solutions,
                classification.concepts,
            )
            .await)
    }

    async fn augment(
        &self,
        input: &ErrorInput,
        error_type: String,
        solutions: Vec<Solution>,
        concepts: Vec<String>,
    ) -> ErrorResponse {
        // The current occurrence is recorded before statistics are read.
        let snapshot = input.project().map(|project| {
            self.history.record(
                project,
                &error_type,
                HistoryRecord::now(input.error_message.clone(), input.code_context.clone()),
            )
        });

        let service = self.completion.as_ref();
        let insight = async {
            match &snapshot {
                Some(snapshot) => pattern_insight(service, &error_type, snapshot).await,
                None => Augmentation::Skipped,
            }
        };
        let (resources, insight) =
            tokio::join!(learning_resources(service, &error_type, &concepts), insight);

        let learning_resources = match resources {
            Augmentation::Generated(resources) => resources,
            Augmentation::Skipped | Augmentation::Failed(_) => {
                fallback_resources(&error_type, &concepts)
            }
        };

        let mut statistics = ErrorStatistics {
            frequency: snapshot.as_ref().map(|s| s.frequency),
            last_occurrence: snapshot
                .as_ref()
                .and_then(|s| s.last_occurrence)
                .map(|ts| ts.to_rfc3339()),
            ..ErrorStatistics::default()
        };
        if let Augmentation::Generated(insight) = insight {
            statistics.common_contexts = Some(insight.common_contexts);
            statistics.related_errors = Some(insight.related_errors);
        }

        ErrorResponse {
            error_type,
            solutions,
            concepts,
            learning_resources: Some(learning_resources),
            statistics: Some(statistics),
        }
    }
}
