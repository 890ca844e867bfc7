// Core algorithm exports
pub mod extractor;
pub mod filters;
pub mod pipeline;
pub mod scoring;
pub mod trace;

pub use extractor::{Extraction, TextExtractor};
pub use filters::{check_constraints, ConstraintCheck, LocationRule};
pub use pipeline::{SearchError, SearchOutcome, SearchPipeline, SearchState};
pub use scoring::{calculate_utility, explain_utility, UtilityRanker};
pub use trace::{Trace, TraceEntry, TraceTag};
