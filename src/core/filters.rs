use crate::models::{Constraints, Venue};

/// Marker prefixed to a passing check's reason
pub const PASS_MARK: &str = "✓";
/// Marker prefixed to a failing check's reason
pub const FAIL_MARK: &str = "✗";

/// Location keywords every matching venue address must contain
///
/// The default targets Downtown Baltimore regardless of the parsed location
/// string; deployments for another area configure their own keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRule {
    keywords: Vec<String>,
}

impl LocationRule {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    #[inline]
    pub fn accepts(&self, location: &str) -> bool {
        let location = location.to_lowercase();
        self.keywords.iter().all(|k| location.contains(k.as_str()))
    }
}

impl Default for LocationRule {
    fn default() -> Self {
        Self::new(["downtown", "baltimore"])
    }
}

/// Outcome of checking one venue against a constraint set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintCheck {
    pub matched: bool,
    /// One entry per evaluated check, in evaluation order
    pub reasons: Vec<String>,
}

impl ConstraintCheck {
    fn new() -> Self {
        Self {
            matched: true,
            reasons: Vec::new(),
        }
    }

    fn pass(&mut self, reason: String) {
        self.reasons.push(format!("{} {}", PASS_MARK, reason));
    }

    fn fail(&mut self, reason: String) {
        self.matched = false;
        self.reasons.push(format!("{} {}", FAIL_MARK, reason));
    }
}

/// Evaluate every set constraint against a venue
///
/// Checks run in a fixed order: cuisine, location, price, availability,
/// window seating. Unset constraints are skipped, so an empty constraint
/// set matches every venue.
pub fn check_constraints(
    venue: &Venue,
    constraints: &Constraints,
    location_rule: &LocationRule,
) -> ConstraintCheck {
    let mut check = ConstraintCheck::new();

    if let Some(cuisine) = &constraints.cuisine {
        if venue.cuisine.to_lowercase() == cuisine.to_lowercase() {
            check.pass(format!("Cuisine: {}", venue.cuisine));
        } else {
            check.fail(format!("Cuisine: {} (need {})", venue.cuisine, cuisine));
        }
    }

    if constraints.location.is_some() {
        if location_rule.accepts(&venue.location) {
            check.pass(format!("Location: {}", venue.location));
        } else {
            check.fail(format!("Location: {}", venue.location));
        }
    }

    if let Some(budget) = constraints.budget() {
        let total_cost = budget.total_cost(venue.avg_price_per_person);
        if total_cost <= budget.price_max {
            check.pass(format!(
                "Price: ${:.2} for {} ≤ ${}",
                total_cost, budget.party_size, budget.price_max
            ));
        } else {
            check.fail(format!(
                "Price: ${:.2} for {} > ${}",
                total_cost, budget.party_size, budget.price_max
            ));
        }
    }

    if let Some((day, time)) = constraints.slot() {
        if venue.is_available(day, time) {
            check.pass(format!("Available: {} at {}", day, time));
        } else {
            check.fail(format!("Not available: {} at {}", day, time));
        }
    }

    if constraints.wants_window() {
        if venue.has_window_seating && !venue.window_view.is_empty() {
            check.pass(format!("Window seating: View of {}", venue.view_summary()));
        } else {
            check.fail("No window seating or view available".to_string());
        }
    }

    check
}

impl Venue {
    /// Check this venue against a constraint set with the default location rule
    ///
    /// The rule is always `LocationRule::default()`, whatever
    /// `matching.location_keywords` is configured to. Use
    /// `SearchPipeline::check` to apply a pipeline's own rule.
    pub fn matches_constraints(&self, constraints: &Constraints) -> (bool, Vec<String>) {
        let check = check_constraints(self, constraints, &LocationRule::default());
        (check.matched, check.reasons)
    }
}
