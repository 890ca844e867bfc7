use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use crate::models::domain::{RankedVenue, Venue, Weekday};

/// One ranked venue as returned by the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueResult {
    pub name: String,
    pub cuisine: String,
    pub location: String,
    pub rating: f64,
    pub price_per_person: f64,
    pub price_range: String,
    pub utility_score: f64,
    pub has_window_seating: bool,
    pub window_view: BTreeSet<String>,
    pub distance_from_center: f64,
    pub availability: BTreeMap<Weekday, BTreeSet<String>>,
    pub explanations: Vec<String>,
    pub constraint_matches: Vec<String>,
}

impl VenueResult {
    pub fn new(ranked: RankedVenue, constraint_matches: Vec<String>) -> Self {
        let RankedVenue { venue, utility_score, explanations } = ranked;
        Self {
            name: venue.name,
            cuisine: venue.cuisine,
            location: venue.location,
            rating: venue.rating,
            price_per_person: venue.avg_price_per_person,
            price_range: venue.price_range,
            utility_score,
            has_window_seating: venue.has_window_seating,
            window_view: venue.window_view,
            distance_from_center: venue.distance_from_center,
            availability: venue.availability,
            explanations,
            constraint_matches,
        }
    }
}

/// Response for the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub constraints: String,
    pub total_results: usize,
    pub results: Vec<VenueResult>,
    pub logs: Vec<String>,
}

/// Catalog entry as listed by the restaurants endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub cuisine: String,
    pub location: String,
    pub rating: f64,
    pub price_per_person: f64,
    pub has_window_seating: bool,
    pub window_view: BTreeSet<String>,
}

impl From<Venue> for CatalogEntry {
    fn from(venue: Venue) -> Self {
        Self {
            name: venue.name,
            cuisine: venue.cuisine,
            location: venue.location,
            rating: venue.rating,
            price_per_person: venue.avg_price_per_person,
            has_window_seating: venue.has_window_seating,
            window_view: venue.window_view,
        }
    }
}

/// Response for the restaurants endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub total: usize,
    pub restaurants: Vec<CatalogEntry>,
}

impl CatalogResponse {
    pub fn new(venues: Vec<Venue>) -> Self {
        let restaurants: Vec<CatalogEntry> = venues.into_iter().map(CatalogEntry::from).collect();
        Self {
            total: restaurants.len(),
            restaurants,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response; `results` is always empty so clients can read it uniformly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub results: Vec<VenueResult>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            results: Vec::new(),
        }
    }
}
