mod classify;
mod completion;
mod error;
mod gemini;
mod history;
mod outcome;
mod payload;
mod resources;
mod statistics;

pub use classify::{classify_unknown, Classification, UNKNOWN_ERROR_TYPE};
pub use completion::{CompletionService, OfflineCompletion};
pub use error::{InsightError, Result};
pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
pub use history::{HistoryRecord, HistorySnapshot, HistoryStore, RECENT_HISTORY_LIMIT};
pub use outcome::Augmentation;
pub use payload::{decode_payload, extract_json_payload};
pub use resources::{fallback_resources, learning_resources, RESOURCE_COUNT};
pub use statistics::{pattern_insight, PatternInsight};
