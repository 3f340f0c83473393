use crate::error::{InsightError, Result};
use serde::de::DeserializeOwned;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Locate the JSON payload in free-form model output.
///
/// A "```json" fence takes priority over a bare "```" fence; the payload runs
/// to the next fence or the end of the text. Unfenced text is used as is.
pub fn extract_json_payload(text: &str) -> Result<&str> {
    let body = if let Some(start) = text.find(JSON_FENCE) {
        until_fence(&text[start + JSON_FENCE.len()..])
    } else if let Some(start) = text.find(FENCE) {
        until_fence(&text[start + FENCE.len()..])
    } else {
        text
    };

    let body = body.trim();
    if body.is_empty() {
        return Err(InsightError::MissingPayload);
    }
    Ok(body)
}

fn until_fence(rest: &str) -> &str {
    rest.find(FENCE).map_or(rest, |end| &rest[..end])
}

pub fn decode_payload<T: DeserializeOwned>(text: &str) -> Result<T> {
    let payload = extract_json_payload(text)?;
    serde_json::from_str(payload).map_err(Into::into)
}
