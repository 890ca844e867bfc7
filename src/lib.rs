//! Dining Agent - rule-based restaurant recommendation service
//!
//! This library turns a free-text dining request into structured constraints,
//! filters a venue catalog against them and ranks the survivors by utility,
//! recording a trace of every decision along the way.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{SearchError, SearchOutcome, SearchPipeline, SearchState, TextExtractor, Trace, UtilityRanker};
pub use models::{Constraints, RankedVenue, ScoringWeights, Venue, Weekday};
pub use services::{BuiltinCatalog, CatalogProvider, JsonCatalog};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let pipeline = SearchPipeline::with_catalog(Arc::new(BuiltinCatalog));
        let outcome = pipeline.search("Turkish restaurant").unwrap();
        assert!(!outcome.results.is_empty());
    }
}
