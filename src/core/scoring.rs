use crate::models::{Constraints, RankedVenue, ScoringWeights, Venue};
use std::cmp::Ordering;

/// Calculate the utility score for a venue that passed filtering
///
/// Scoring formula (default weights):
/// score = (
///     rating * 6 +                                  # 0-5 stars -> 0-30
///     (price_max - total_cost) / price_max * 20 +   # only with a budget
///     max(0, 20 - distance * 10) +                  # nothing past 2 miles
///     15 if window seating (+10 garden, +5 street)
/// )
/// rounded to two decimals.
pub fn calculate_utility(
    venue: &Venue,
    constraints: &Constraints,
    weights: &ScoringWeights,
) -> f64 {
    let score = venue.rating * weights.rating
        + price_efficiency_score(venue, constraints, weights)
        + distance_score(venue.distance_from_center, weights)
        + window_bonus(venue, weights);

    round_to_cents(score)
}

/// Savings relative to the budget, scaled by the price weight
#[inline]
fn price_efficiency_score(venue: &Venue, constraints: &Constraints, weights: &ScoringWeights) -> f64 {
    match constraints.budget() {
        Some(budget) => {
            let total_cost = budget.total_cost(venue.avg_price_per_person);
            (budget.price_max - total_cost) / budget.price_max * weights.price
        }
        None => 0.0,
    }
}

#[inline]
fn distance_score(distance: f64, weights: &ScoringWeights) -> f64 {
    (weights.distance_base - distance * weights.distance_decay).max(0.0)
}

#[inline]
fn window_bonus(venue: &Venue, weights: &ScoringWeights) -> f64 {
    if !venue.has_window_seating {
        return 0.0;
    }

    let mut bonus = weights.window;
    if venue.has_view("garden") {
        bonus += weights.garden_view;
    }
    if venue.has_view("street") {
        bonus += weights.street_view;
    }
    bonus
}

/// Two-decimal rounding of the exact binary value, ties to even
#[inline]
fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Human-readable breakdown of a venue's score
pub fn explain_utility(
    venue: &Venue,
    constraints: &Constraints,
    weights: &ScoringWeights,
) -> Vec<String> {
    let mut explanations = vec![format!(
        "Rating: {}⭐ (contributes {:.1} points)",
        venue.rating,
        venue.rating * weights.rating
    )];

    if let Some(budget) = constraints.budget() {
        let total_cost = budget.total_cost(venue.avg_price_per_person);
        explanations.push(format!(
            "Price: ${:.2} for {} (${:.2} under budget)",
            total_cost,
            budget.party_size,
            budget.price_max - total_cost
        ));
    }

    explanations.push(format!(
        "Distance: {} miles from downtown center",
        venue.distance_from_center
    ));

    if venue.has_window_seating {
        explanations.push(format!("Window view: {}", venue.view_summary()));
    }

    explanations
}

/// Scores and orders venues that passed filtering
#[derive(Debug, Clone, Default)]
pub struct UtilityRanker {
    weights: ScoringWeights,
}

impl UtilityRanker {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank venues by descending utility
    ///
    /// The sort is stable, so venues with equal scores keep their input order.
    pub fn rank(&self, venues: Vec<Venue>, constraints: &Constraints) -> Vec<RankedVenue> {
        let mut ranked: Vec<RankedVenue> = venues
            .into_iter()
            .map(|venue| {
                let utility_score = calculate_utility(&venue, constraints, &self.weights);
                let explanations = explain_utility(&venue, constraints, &self.weights);
                RankedVenue {
                    venue,
                    utility_score,
                    explanations,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.utility_score
                .partial_cmp(&a.utility_score)
                .unwrap_or(Ordering::Equal)
        });

        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    fn create_test_venue(name: &str, rating: f64, distance: f64, views: &[&str]) -> Venue {
        Venue {
            name: name.to_string(),
            cuisine: "Turkish".to_string(),
            location: "Downtown Baltimore, MD".to_string(),
            price_range: "$$".to_string(),
            avg_price_per_person: 28.0,
            rating,
            availability: BTreeMap::new(),
            has_window_seating: !views.is_empty(),
            window_view: views.iter().map(|v| v.to_string()).collect::<BTreeSet<_>>(),
            distance_from_center: distance,
        }
    }

    fn budget_constraints() -> Constraints {
        Constraints {
            price_max: Some(65.0),
            party_size: Some(2),
            ..Default::default()
        }
    }

    #[test]
    fn test_round_to_cents_uses_exact_value() {
        assert_eq!(round_to_cents(66.76923076923077), 66.77);
        // exact binary ties go to the even cent
        assert_eq!(round_to_cents(0.125), 0.12);
        assert_eq!(round_to_cents(0.375), 0.38);
        // 2.675 is stored just below the tie
        assert_eq!(round_to_cents(2.675), 2.67);
    }

    #[test]
    fn test_calculate_utility() {
        let venue = create_test_venue("Istanbul Grill", 4.5, 0.3, &["street"]);
        let score = calculate_utility(&venue, &budget_constraints(), &ScoringWeights::default());

        // 27 + 9/65*20 + 17 + 15 + 5
        assert_eq!(score, 66.77);
    }

    #[test]
    fn test_distance_score_floors_at_zero() {
        let weights = ScoringWeights::default();
        assert_eq!(distance_score(0.0, &weights), 20.0);
        assert_eq!(distance_score(2.0, &weights), 0.0);
        assert_eq!(distance_score(5.0, &weights), 0.0);
    }

    #[test]
    fn test_window_bonus_stacks() {
        let weights = ScoringWeights::default();
        assert_eq!(window_bonus(&create_test_venue("a", 4.0, 0.0, &[]), &weights), 0.0);
        assert_eq!(window_bonus(&create_test_venue("b", 4.0, 0.0, &["harbor"]), &weights), 15.0);
        assert_eq!(
            window_bonus(&create_test_venue("c", 4.0, 0.0, &["garden", "street"]), &weights),
            30.0
        );
    }

    #[test]
    fn test_no_price_term_without_budget() {
        let venue = create_test_venue("a", 4.0, 3.0, &[]);
        let score = calculate_utility(&venue, &Constraints::default(), &ScoringWeights::default());
        assert_eq!(score, 24.0);
        assert_eq!(explain_utility(&venue, &Constraints::default(), &ScoringWeights::default()).len(), 2);
    }

    #[test]
    fn test_explanations() {
        let venue = create_test_venue("a", 4.5, 0.3, &["street"]);
        let explanations = explain_utility(&venue, &budget_constraints(), &ScoringWeights::default());

        assert_eq!(
            explanations,
            vec![
                "Rating: 4.5⭐ (contributes 27.0 points)",
                "Price: $56.00 for 2 ($9.00 under budget)",
                "Distance: 0.3 miles from downtown center",
                "Window view: street",
            ]
        );
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let ranker = UtilityRanker::default();
        let venues = vec![
            create_test_venue("first", 4.0, 1.0, &[]),
            create_test_venue("best", 5.0, 0.0, &["garden"]),
            create_test_venue("second", 4.0, 1.0, &[]),
        ];
        let ranked = ranker.rank(venues, &Constraints::default());
        let names: Vec<&str> = ranked.iter().map(|r| r.venue.name.as_str()).collect();

        assert_eq!(names, vec!["best", "first", "second"]);
    }
}
