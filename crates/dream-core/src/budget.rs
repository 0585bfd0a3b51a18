//! Budget allocation
//!
//! Distributes a total budget across milestones using fixed category
//! weights matched against milestone titles. Weights are not normalized
//! against the milestone set, so allocations need not sum to the total.

use crate::types::{BudgetAllocation, Milestone, MilestoneAllocation};
use indexmap::IndexMap;

/// Message returned when no budget was stated
pub const NO_BUDGET_MESSAGE: &str = "No budget specified";

/// Weight applied to titles matching no category
pub const DEFAULT_WEIGHT: f64 = 0.10;

/// Ordered category weights; first substring match wins
pub const CATEGORY_WEIGHTS: [(&str, f64); 8] = [
    ("venue", 0.30),
    ("catering", 0.25),
    ("photography", 0.12),
    ("dress", 0.08),
    ("flowers", 0.05),
    ("music", 0.08),
    ("invitations", 0.02),
    ("planning", 0.10),
];

/// Weight for a milestone title
#[must_use]
pub fn category_weight(title: &str) -> f64 {
    let lower = title.to_lowercase();
    CATEGORY_WEIGHTS
        .iter()
        .find(|(category, _)| lower.contains(category))
        .map_or(DEFAULT_WEIGHT, |(_, weight)| *weight)
}

/// Distribute a budget across milestones, keyed by title
#[must_use]
pub fn allocate(
    milestones: &[Milestone],
    total_budget: Option<f64>,
    currency: &str,
) -> BudgetAllocation {
    let Some(total) = total_budget else {
        return BudgetAllocation {
            total: 0.0,
            by_milestone: IndexMap::new(),
            currency: None,
            message: Some(NO_BUDGET_MESSAGE.to_string()),
        };
    };

    let by_milestone = milestones
        .iter()
        .map(|milestone| {
            let weight = category_weight(&milestone.title);
            let allocation = MilestoneAllocation {
                amount: round_cents(total * weight),
                percentage: round_cents(weight * 100.0),
            };
            (milestone.title.clone(), allocation)
        })
        .collect();

    BudgetAllocation {
        total,
        by_milestone,
        currency: Some(currency.to_string()),
        message: None,
    }
}

/// Copy allocated amounts onto the milestones' estimated costs
pub fn apply_estimated_costs(milestones: &mut [Milestone], allocation: &BudgetAllocation) {
    for milestone in milestones.iter_mut() {
        if let Some(share) = allocation.by_milestone.get(&milestone.title) {
            milestone.estimated_cost = share.amount;
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::enrich;

    fn milestones(entries: &[&str]) -> Vec<Milestone> {
        let sequence: Vec<String> = entries.iter().map(|s| (*s).to_string()).collect();
        enrich(&sequence, false)
    }

    #[test]
    fn venue_outweighs_invitations() {
        let ms = milestones(&["venue_booking", "invitations"]);
        let allocation = allocate(&ms, Some(30000.0), "USD");

        let venue = allocation.by_milestone["Venue Booking"];
        let invitations = allocation.by_milestone["Invitations"];
        assert!(venue.amount > invitations.amount);
        assert_eq!(venue.amount, 9000.0);
        assert_eq!(venue.percentage, 30.0);
        assert_eq!(invitations.amount, 600.0);
        assert_eq!(allocation.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn missing_budget_yields_zero_total() {
        let ms = milestones(&["venue_booking"]);
        let allocation = allocate(&ms, None, "USD");

        assert_eq!(allocation.total, 0.0);
        assert!(allocation.by_milestone.is_empty());
        assert_eq!(allocation.message.as_deref(), Some(NO_BUDGET_MESSAGE));
    }

    #[test]
    fn first_category_match_wins_and_default_applies() {
        // venue precedes planning in the table
        assert_eq!(category_weight("Venue Planning"), 0.30);
        assert_eq!(category_weight("Honeymoon Planning"), 0.10);
        assert_eq!(category_weight("Guest List Creation"), DEFAULT_WEIGHT);
        assert_eq!(category_weight("PHOTOGRAPHY and music"), 0.12);
    }

    #[test]
    fn allocations_are_not_normalized() {
        let ms = milestones(&["venue_booking", "catering", "venue_decor"]);
        let allocation = allocate(&ms, Some(10000.0), "USD");
        let sum: f64 = allocation.by_milestone.values().map(|a| a.amount).sum();
        assert_eq!(sum, 8500.0);
    }

    #[test]
    fn estimated_costs_follow_allocation() {
        let mut ms = milestones(&["venue_booking", "guest_list"]);
        let allocation = allocate(&ms, Some(20000.0), "EUR");
        apply_estimated_costs(&mut ms, &allocation);

        assert_eq!(ms[0].estimated_cost, 6000.0);
        assert_eq!(ms[1].estimated_cost, 2000.0);
    }
}
