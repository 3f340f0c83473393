use crate::error::InsightError;

/// Result of a best-effort AI augmentation call.
///
/// Augmentation never fails a request: the caller decides what to put in the
/// response for `Skipped` and `Failed`.
#[derive(Debug)]
pub enum Augmentation<T> {
    Generated(T),
    /// Preconditions for the call were not met; no request was sent.
    Skipped,
    Failed(InsightError),
}

impl<T> Augmentation<T> {
    pub fn from_result(result: crate::Result<T>) -> Self {
        match result {
            Ok(value) => Self::Generated(value),
            Err(err) => Self::Failed(err),
        }
    }

    pub fn generated(self) -> Option<T> {
        match self {
            Self::Generated(value) => Some(value),
            Self::Skipped | Self::Failed(_) => None,
        }
    }
}
