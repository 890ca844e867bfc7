// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Budget, ConstraintError, Constraints, RankedVenue, ScoringWeights, Venue, Weekday};
pub use requests::SearchRequest;
pub use responses::{
    CatalogEntry, CatalogResponse, ErrorResponse, HealthResponse, SearchResponse, VenueResult,
};
