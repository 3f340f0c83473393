mod error;
pub mod heuristics;
mod patterns;

pub use error::{CatalogError, Result};
pub use heuristics::{analyze_context, ContextFinding};
pub use patterns::{EntrySpec, PatternCatalog, PatternEntry, SolutionSpec, BUILTIN_SPECS};
