//! Confidence scoring
//!
//! A 0-1 measure of how much of a roadmap rests on explicit user input.
//! Each signal contributes at most its weight, so richer input can only
//! raise the score.

use crate::types::{Milestone, UserContext};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Milestone count rewarded by the extended model
pub const IDEAL_MILESTONE_COUNT: RangeInclusive<usize> = 6..=12;

/// Description length counted as descriptive detail
pub const MIN_DESCRIPTION_LEN: usize = 20;

/// Confidence scoring parameterization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceModel {
    /// Four input signals
    Simple,
    /// Input signals plus output quality
    #[default]
    Extended,
}

/// Per-signal weights
#[derive(Debug, Clone, Copy, PartialEq)]
struct Weights {
    budget: f64,
    timeline: f64,
    location: f64,
    preferences: f64,
    milestone_count: f64,
    descriptions: f64,
}

impl ConfidenceModel {
    fn weights(self) -> Weights {
        match self {
            Self::Simple => Weights {
                budget: 0.3,
                timeline: 0.3,
                location: 0.2,
                preferences: 0.2,
                milestone_count: 0.0,
                descriptions: 0.0,
            },
            Self::Extended => Weights {
                budget: 0.2,
                timeline: 0.2,
                location: 0.15,
                preferences: 0.15,
                milestone_count: 0.15,
                descriptions: 0.15,
            },
        }
    }

    /// Score a roadmap
    #[must_use]
    pub fn score(self, context: &UserContext, milestones: &[Milestone]) -> f64 {
        let w = self.weights();
        let mut score = 0.0;

        if context.budget.is_some() {
            score += w.budget;
        }
        if context.timeline.is_some() {
            score += w.timeline;
        }
        if context.location.is_some() {
            score += w.location;
        }
        if !context.preferences.is_empty() {
            score += w.preferences;
        }
        if IDEAL_MILESTONE_COUNT.contains(&milestones.len()) {
            score += w.milestone_count;
        }
        if !milestones.is_empty()
            && milestones
                .iter()
                .all(|m| m.description.trim().len() >= MIN_DESCRIPTION_LEN)
        {
            score += w.descriptions;
        }

        round_score(score.clamp(0.0, 1.0))
    }
}

fn round_score(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::enrichment::enrich;
    use crate::types::GoalType;

    fn full_context() -> UserContext {
        UserContext::new()
            .with_budget(25000.0, 0.9)
            .with_timeline("in 8 months", 0.8)
            .with_location("Lisbon", 0.7)
            .with_preference("style", "rustic", 0.6)
    }

    #[test]
    fn empty_context_simple_scores_zero() {
        assert_eq!(ConfidenceModel::Simple.score(&UserContext::new(), &[]), 0.0);
    }

    #[test]
    fn full_context_simple_scores_one() {
        assert_eq!(ConfidenceModel::Simple.score(&full_context(), &[]), 1.0);
    }

    #[test]
    fn extended_rewards_output_quality() {
        let milestones = enrich(&catalog::lookup(&GoalType::Wedding), false);
        assert_eq!(ConfidenceModel::Extended.score(&UserContext::new(), &milestones), 0.3);
        assert_eq!(ConfidenceModel::Extended.score(&full_context(), &milestones), 1.0);
    }

    #[test]
    fn extended_without_ideal_count() {
        let milestones = enrich(&catalog::generic_sequence(), false);
        // five milestones fall outside 6..=12
        assert_eq!(ConfidenceModel::Extended.score(&full_context(), &milestones), 0.85);
    }

    #[test]
    fn richer_context_never_lowers_score() {
        let milestones = enrich(&catalog::lookup(&GoalType::Home), false);
        let steps = [
            UserContext::new(),
            UserContext::new().with_budget(1.0, 0.1),
            UserContext::new().with_budget(1.0, 0.1).with_timeline("soon", 0.1),
            UserContext::new()
                .with_budget(1.0, 0.1)
                .with_timeline("soon", 0.1)
                .with_location("Oslo", 0.1),
            full_context(),
        ];

        for model in [ConfidenceModel::Simple, ConfidenceModel::Extended] {
            let scores: Vec<f64> = steps.iter().map(|c| model.score(c, &milestones)).collect();
            assert!(scores.windows(2).all(|w| w[0] <= w[1]), "{model:?}: {scores:?}");
            assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
        }
    }
}
