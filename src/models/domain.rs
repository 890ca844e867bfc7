use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Day of the week as it appears in queries and venue availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Parse a full weekday name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when a constraint set breaks its invariants
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    #[error("price_max must be a finite number greater than zero, got {0}")]
    InvalidPrice(f64),

    #[error("party_size must be greater than zero")]
    EmptyParty,
}

/// Constraints extracted from a dining request
///
/// Every field is optional; an unset field disables the matching check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    pub cuisine: Option<String>,
    pub location: Option<String>,
    pub price_max: Option<f64>,
    pub party_size: Option<u32>,
    pub day: Option<Weekday>,
    pub time: Option<String>,
    #[serde(default)]
    pub special_requests: Vec<String>,
}

/// Price ceiling and party size, present only when both are set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Budget {
    pub price_max: f64,
    pub party_size: u32,
}

impl Budget {
    /// Total cost of feeding the whole party at the given per-person price
    #[inline]
    pub fn total_cost(&self, avg_price_per_person: f64) -> f64 {
        avg_price_per_person * self.party_size as f64
    }
}

impl Constraints {
    /// Check the numeric invariants relied on by filtering and scoring
    pub fn validate(&self) -> Result<(), ConstraintError> {
        if let Some(price) = self.price_max {
            if !price.is_finite() || price <= 0.0 {
                return Err(ConstraintError::InvalidPrice(price));
            }
        }
        if self.party_size == Some(0) {
            return Err(ConstraintError::EmptyParty);
        }
        Ok(())
    }

    /// Budget used by the price check and the price efficiency term
    pub fn budget(&self) -> Option<Budget> {
        match (self.price_max, self.party_size) {
            (Some(price_max), Some(party_size))
                if price_max.is_finite() && price_max > 0.0 && party_size > 0 =>
            {
                Some(Budget { price_max, party_size })
            }
            _ => None,
        }
    }

    /// Day and time slot, present only when both are set
    pub fn slot(&self) -> Option<(Weekday, &str)> {
        match (self.day, self.time.as_deref()) {
            (Some(day), Some(time)) => Some((day, time)),
            _ => None,
        }
    }

    pub fn wants_window(&self) -> bool {
        self.special_requests
            .iter()
            .any(|request| request.to_lowercase().contains("window"))
    }

    pub fn is_unconstrained(&self) -> bool {
        *self == Constraints::default()
    }
}

fn or_none<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "None".to_string())
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cuisine={}, Location={}, Price≤${}, Party={}, Time={} {}, Special={:?}",
            or_none(&self.cuisine),
            or_none(&self.location),
            or_none(&self.price_max),
            or_none(&self.party_size),
            or_none(&self.day),
            or_none(&self.time),
            self.special_requests,
        )
    }
}

/// A bookable dining venue from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub cuisine: String,
    pub location: String,
    pub price_range: String,
    pub avg_price_per_person: f64,
    pub rating: f64,
    /// Bookable time slots per day, e.g. "7:30 pm"
    #[serde(default)]
    pub availability: BTreeMap<Weekday, BTreeSet<String>>,
    #[serde(default)]
    pub has_window_seating: bool,
    #[serde(default)]
    pub window_view: BTreeSet<String>,
    /// Distance in miles from the downtown reference point
    pub distance_from_center: f64,
}

impl Venue {
    pub fn is_available(&self, day: Weekday, time: &str) -> bool {
        self.availability
            .get(&day)
            .is_some_and(|slots| slots.contains(time))
    }

    pub fn has_view(&self, tag: &str) -> bool {
        self.window_view.contains(tag)
    }

    pub fn view_summary(&self) -> String {
        self.window_view
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A venue that survived filtering, with its utility score and explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedVenue {
    pub venue: Venue,
    pub utility_score: f64,
    pub explanations: Vec<String>,
}

/// Utility scoring coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Points per rating star
    pub rating: f64,
    /// Points for a venue that costs nothing relative to the budget
    pub price: f64,
    /// Distance points at the reference point
    pub distance_base: f64,
    /// Distance points lost per mile
    pub distance_decay: f64,
    pub window: f64,
    pub garden_view: f64,
    pub street_view: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rating: 6.0,
            price: 20.0,
            distance_base: 20.0,
            distance_decay: 10.0,
            window: 15.0,
            garden_view: 10.0,
            street_view: 5.0,
        }
    }
}
