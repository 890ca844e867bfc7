use crate::core::{
    extractor::TextExtractor,
    filters::{check_constraints, ConstraintCheck, LocationRule, FAIL_MARK, PASS_MARK},
    scoring::UtilityRanker,
    trace::{Trace, TraceTag},
};
use crate::models::{ConstraintError, Constraints, RankedVenue, Venue};
use crate::services::catalog::{CatalogError, CatalogProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

const BANNER: &str =
    "================================================================================";

/// Errors that abort a search
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid constraints: {0}")]
    InvalidConstraints(#[from] ConstraintError),

    #[error("Catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),
}

/// Stage of a search; transitions are strictly linear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    Initial,
    NlpParsing,
    ConstraintExtraction,
    DataRetrieval,
    Filtering,
    Ranking,
    Complete,
}

impl SearchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchState::Initial => "initial",
            SearchState::NlpParsing => "nlp_parsing",
            SearchState::ConstraintExtraction => "constraint_extraction",
            SearchState::DataRetrieval => "data_retrieval",
            SearchState::Filtering => "filtering",
            SearchState::Ranking => "ranking",
            SearchState::Complete => "complete",
        }
    }

    /// The following state, or `None` once complete
    pub fn next(self) -> Option<SearchState> {
        match self {
            SearchState::Initial => Some(SearchState::NlpParsing),
            SearchState::NlpParsing => Some(SearchState::ConstraintExtraction),
            SearchState::ConstraintExtraction => Some(SearchState::DataRetrieval),
            SearchState::DataRetrieval => Some(SearchState::Filtering),
            SearchState::Filtering => Some(SearchState::Ranking),
            SearchState::Ranking => Some(SearchState::Complete),
            SearchState::Complete => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == SearchState::Complete
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a finished search produced
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub query: String,
    pub constraints: Constraints,
    pub results: Vec<RankedVenue>,
    pub trace: Trace,
}

/// Working data of a single search, owned by one `search` call
#[derive(Debug)]
struct SearchRun {
    state: SearchState,
    trace: Trace,
    constraints: Constraints,
    candidates: Vec<Venue>,
    filtered: Vec<Venue>,
    ranked: Vec<RankedVenue>,
}

impl SearchRun {
    fn new() -> Self {
        Self {
            state: SearchState::Initial,
            trace: Trace::new(),
            constraints: Constraints::default(),
            candidates: Vec::new(),
            filtered: Vec::new(),
            ranked: Vec::new(),
        }
    }

    /// Move to the next state and record the transition
    fn advance(&mut self) -> SearchState {
        let Some(next) = self.state.next() else {
            return self.state;
        };
        self.trace.record(
            TraceTag::State,
            format!("State transition: {} → {}", self.state, next),
        );
        self.state = next;
        next
    }
}

/// Search orchestrator
///
/// # Pipeline Stages
/// 1. NLP parsing of the raw query
/// 2. Constraint extraction summary
/// 3. Catalog retrieval
/// 4. Constraint filtering
/// 5. Utility ranking
///
/// The pipeline holds only immutable collaborators; each `search` call owns
/// its working data, so one instance can serve repeated and concurrent
/// searches.
#[derive(Clone)]
pub struct SearchPipeline {
    extractor: TextExtractor,
    location_rule: LocationRule,
    ranker: UtilityRanker,
    catalog: Arc<dyn CatalogProvider>,
}

impl fmt::Debug for SearchPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchPipeline")
            .field("extractor", &self.extractor)
            .field("location_rule", &self.location_rule)
            .field("ranker", &self.ranker)
            .finish_non_exhaustive()
    }
}

impl SearchPipeline {
    pub fn new(
        extractor: TextExtractor,
        location_rule: LocationRule,
        ranker: UtilityRanker,
        catalog: Arc<dyn CatalogProvider>,
    ) -> Self {
        Self {
            extractor,
            location_rule,
            ranker,
            catalog,
        }
    }

    /// Pipeline with default extraction, location and scoring settings
    pub fn with_catalog(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self::new(
            TextExtractor::default(),
            LocationRule::default(),
            UtilityRanker::default(),
            catalog,
        )
    }

    /// Every venue the catalog provider currently offers
    pub fn venues(&self) -> Result<Vec<Venue>, CatalogError> {
        self.catalog.get_catalog()
    }

    /// Check a venue against constraints with this pipeline's location rule
    pub fn check(&self, venue: &Venue, constraints: &Constraints) -> ConstraintCheck {
        check_constraints(venue, constraints, &self.location_rule)
    }

    /// Run the full pipeline for one query
    pub fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let mut run = SearchRun::new();

        run.trace.record(TraceTag::System, BANNER);
        run.trace.record(TraceTag::System, "RESTAURANT RECOMMENDATION AGENT STARTED");
        run.trace.record(TraceTag::System, BANNER);

        while !run.state.is_terminal() {
            match run.advance() {
                SearchState::NlpParsing => self.parse(&mut run, query),
                SearchState::ConstraintExtraction => Self::summarize_constraints(&mut run)?,
                SearchState::DataRetrieval => self.retrieve(&mut run)?,
                SearchState::Filtering => self.filter(&mut run),
                SearchState::Ranking => self.rank(&mut run),
                SearchState::Complete => Self::complete(&mut run),
                SearchState::Initial => {}
            }
        }

        tracing::info!(
            "Search complete: {} of {} venues ranked for query {:?}",
            run.ranked.len(),
            run.candidates.len(),
            query
        );

        Ok(SearchOutcome {
            query: query.to_string(),
            constraints: run.constraints,
            results: run.ranked,
            trace: run.trace,
        })
    }

    fn parse(&self, run: &mut SearchRun, query: &str) {
        let extraction = self.extractor.extract(query);
        run.constraints = extraction.constraints;
        run.trace.absorb(extraction.trace);
    }

    fn summarize_constraints(run: &mut SearchRun) -> Result<(), SearchError> {
        run.constraints.validate()?;
        run.trace.record(
            TraceTag::Constraint,
            format!("Extracted constraints: {}", run.constraints),
        );
        Ok(())
    }

    fn retrieve(&self, run: &mut SearchRun) -> Result<(), SearchError> {
        run.candidates = self.catalog.get_catalog()?;
        run.trace.record(
            TraceTag::Data,
            format!("Retrieved {} restaurants from database", run.candidates.len()),
        );
        Ok(())
    }

    fn filter(&self, run: &mut SearchRun) {
        run.trace.record(TraceTag::Filter, "Starting constraint satisfaction filtering...");

        let mut filtered = Vec::new();
        for venue in &run.candidates {
            let check = self.check(venue, &run.constraints);
            run.trace.record(TraceTag::Filter, format!("Evaluating: {}", venue.name));
            for reason in &check.reasons {
                run.trace.record(TraceTag::Filter, format!("  {}", reason));
            }

            if check.matched {
                run.trace.record(
                    TraceTag::Filter,
                    format!("  {} PASS: All constraints satisfied", PASS_MARK),
                );
                filtered.push(venue.clone());
            } else {
                run.trace.record(
                    TraceTag::Filter,
                    format!("  {} FAIL: Some constraints not met", FAIL_MARK),
                );
            }
        }

        run.trace.record(
            TraceTag::Filter,
            format!(
                "Filtering complete: {}/{} restaurants passed",
                filtered.len(),
                run.candidates.len()
            ),
        );
        run.filtered = filtered;
    }

    fn rank(&self, run: &mut SearchRun) {
        run.trace.record(TraceTag::Rank, "Applying utility-based ranking...");

        let ranked = self
            .ranker
            .rank(std::mem::take(&mut run.filtered), &run.constraints);
        for result in &ranked {
            run.trace.record(TraceTag::Rank, format!("{}:", result.venue.name));
            run.trace.record(
                TraceTag::Rank,
                format!("  Total Utility Score: {:.2}", result.utility_score),
            );
            for explanation in &result.explanations {
                run.trace.record(TraceTag::Rank, format!("  {}", explanation));
            }
        }
        run.ranked = ranked;
    }

    fn complete(run: &mut SearchRun) {
        run.trace.record(TraceTag::System, BANNER);
        run.trace.record(TraceTag::System, "SEARCH COMPLETE");
        run.trace.record(TraceTag::System, BANNER);
    }
}
