use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// How many of the latest occurrences are handed to pattern analysis.
pub const RECENT_HISTORY_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: DateTime<Utc>,
    pub error_message: String,
    pub code_context: Option<String>,
}

impl HistoryRecord {
    pub fn now(error_message: impl Into<String>, code_context: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            error_message: error_message.into(),
            code_context,
        }
    }
}

/// Consistent view of one (project, error type) history, taken in the same
/// critical section as the append it follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    /// Number of recorded occurrences, the current one included.
    pub frequency: usize,
    /// The occurrence before the current one, if any.
    pub last_occurrence: Option<DateTime<Utc>>,
    pub recent: Vec<HistoryRecord>,
}

type ProjectHistory = HashMap<String, Vec<HistoryRecord>>;

/// Process-lifetime error history: project id -> error type -> occurrences.
///
/// Records are append-only and nothing is evicted.
#[derive(Debug, Default)]
pub struct HistoryStore {
    projects: Mutex<HashMap<String, ProjectHistory>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &self,
        project_id: &str,
        error_type: &str,
        record: HistoryRecord,
    ) -> HistorySnapshot {
        let mut projects = self.projects.lock().unwrap_or_else(PoisonError::into_inner);
        let records = projects
            .entry(project_id.to_string())
            .or_default()
            .entry(error_type.to_string())
            .or_default();
        records.push(record);

        let frequency = records.len();
        let last_occurrence = frequency.checked_sub(2).map(|idx| records[idx].timestamp);
        let recent = records[frequency.saturating_sub(RECENT_HISTORY_LIMIT)..].to_vec();
        HistorySnapshot {
            frequency,
            last_occurrence,
            recent,
        }
    }

    pub fn records(&self, project_id: &str, error_type: &str) -> Vec<HistoryRecord> {
        let projects = self.projects.lock().unwrap_or_else(PoisonError::into_inner);
        projects
            .get(project_id)
            .and_then(|errors| errors.get(error_type))
            .cloned()
            .unwrap_or_default()
    }
}
