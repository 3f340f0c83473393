use crate::completion::CompletionService;
use crate::error::Result;
use crate::outcome::Augmentation;
use crate::payload::decode_payload;
use errlens_protocol::LearningResource;

pub const RESOURCE_COUNT: usize = 3;

fn resources_prompt(error_type: &str, concepts: &[String]) -> String {
    format!(
        r#"As a programming educator, recommend THREE specific learning resources for someone who encountered
a {error_type} error in Python. The error involves these concepts: {concepts}.

For each resource, provide:
1. A descriptive title
2. A brief description of what they'll learn
3. The type of resource (article, video, tutorial, etc.)

Format as JSON with structure:
[
    {{
        "title": "Resource title",
        "description": "Brief description of what they'll learn",
        "resource_type": "article/video/tutorial/etc"
    }},
    ...
]

Focus on high-quality, beginner-friendly resources that specifically address common mistakes."#,
        concepts = concepts.join(", ")
    )
}

fn parse_resources(text: &str) -> Result<Vec<LearningResource>> {
    let entries: Vec<serde_json::Value> = decode_payload(text)?;
    entries
        .into_iter()
        .take(RESOURCE_COUNT)
        .map(|entry| serde_json::from_value(entry).map_err(Into::into))
        .collect()
}

pub async fn learning_resources(
    service: &dyn CompletionService,
    error_type: &str,
    concepts: &[String],
) -> Augmentation<Vec<LearningResource>> {
    let prompt = resources_prompt(error_type, concepts);
    let result = match service.complete(&prompt).await {
        Ok(text) => parse_resources(&text),
        Err(err) => Err(err),
    };
    if let Err(err) = &result {
        log::warn!("Learning resources unavailable for {error_type}: {err}");
    }
    Augmentation::from_result(result)
}

/// Static resources used when the model cannot supply any.
pub fn fallback_resources(error_type: &str, concepts: &[String]) -> Vec<LearningResource> {
    let topic = concepts.first().map_or("errors", String::as_str);
    vec![
        LearningResource::new(
            format!("Understanding {error_type} in Python"),
            format!("Learn how to debug and prevent {error_type} errors"),
            "article",
        ),
        LearningResource::new(
            format!("Common causes of {error_type}"),
            format!("Explore the most frequent mistakes that lead to {error_type}"),
            "tutorial",
        ),
        LearningResource::new(
            format!("Best practices to avoid {topic}"),
            "Preventive techniques for writing more robust code",
            "guide",
        ),
    ]
}
