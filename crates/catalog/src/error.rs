use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid pattern for {label}: {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("Duplicate error type label: {0}")]
    DuplicateLabel(String),

    #[error("Pattern {0} has no solutions")]
    NoSolutions(String),
}
