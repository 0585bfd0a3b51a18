//! Constraint adjustment
//!
//! Reshapes a catalog sequence according to the user's declared constraints:
//! - `time_constraint` keeps only the critical stages
//! - `budget_constraint` adds financial checkpoints
//!
//! An adjustment that leaves fewer than [`MIN_SEQUENCE_LEN`] entries is
//! discarded in favour of the unmodified sequence.

use crate::catalog;
use crate::types::{has_constraint, Constraint, ConstraintKind, GoalType, SequenceEntry};

/// Minimum viable roadmap length
pub const MIN_SEQUENCE_LEN: usize = 3;

/// Inserted after the first planning/budget stage under a budget constraint
pub const BUDGET_CHECKPOINT: &str = "budget_checkpoint_and_review";

/// Inserted at the sequence midpoint under a budget constraint
pub const FINANCIAL_HEALTH_CHECK: &str = "financial_health_check";

/// Substrings marking the stages that survive a time constraint
#[must_use]
pub fn critical_patterns(goal: &GoalType) -> Option<&'static [&'static str]> {
    let patterns: &'static [&'static str] = match goal {
        GoalType::Wedding => &["budget", "venue", "vendor", "invitations", "wedding_day"],
        GoalType::Home => &["financial", "mortgage", "house_hunting", "offer", "closing"],
        GoalType::Baby => &["healthcare", "prenatal", "nursery", "birth", "hospital"],
        GoalType::Business => &["validation", "plan", "legal", "launch"],
        GoalType::Vacation => &["budget", "booking", "documents", "trip"],
        GoalType::Relocation => &["budget", "housing", "moving"],
        _ => return None,
    };
    Some(patterns)
}

/// Apply constraint adjustments to a base sequence
#[must_use]
pub fn adjust(
    goal: &GoalType,
    sequence: &[SequenceEntry],
    constraints: &[Constraint],
) -> Vec<SequenceEntry> {
    let mut adjusted = sequence.to_vec();

    if has_constraint(constraints, &ConstraintKind::Time) {
        adjusted = keep_critical(goal, &adjusted);
        tracing::debug!(
            goal_type = %goal,
            before = sequence.len(),
            after = adjusted.len(),
            "applied time constraint"
        );
    }

    if has_constraint(constraints, &ConstraintKind::Budget) {
        insert_budget_checkpoints(&mut adjusted);
        tracing::debug!(goal_type = %goal, len = adjusted.len(), "applied budget constraint");
    }

    if adjusted.len() < MIN_SEQUENCE_LEN {
        tracing::debug!(
            goal_type = %goal,
            len = adjusted.len(),
            "adjusted sequence too short, keeping base sequence"
        );
        return sequence.to_vec();
    }

    adjusted
}

/// Catalog lookup followed by constraint adjustment
#[must_use]
pub fn determine_milestone_sequence(
    goal: &GoalType,
    constraints: &[Constraint],
) -> Vec<SequenceEntry> {
    let base = catalog::lookup(goal);
    adjust(goal, &base, constraints)
}

fn keep_critical(goal: &GoalType, sequence: &[SequenceEntry]) -> Vec<SequenceEntry> {
    match critical_patterns(goal) {
        Some(patterns) => sequence
            .iter()
            .filter(|entry| patterns.iter().any(|p| entry.contains(p)))
            .cloned()
            .collect(),
        None => {
            let last = sequence.len().saturating_sub(1);
            sequence
                .iter()
                .enumerate()
                .filter(|(i, _)| i % 2 == 0 || *i == last)
                .map(|(_, entry)| entry.clone())
                .collect()
        }
    }
}

fn insert_budget_checkpoints(sequence: &mut Vec<SequenceEntry>) {
    if let Some(pos) = sequence
        .iter()
        .position(|e| e.contains("planning") || e.contains("budget"))
    {
        sequence.insert(pos + 1, BUDGET_CHECKPOINT.to_string());
    }

    let mid = sequence.len() / 2;
    sequence.insert(mid, FINANCIAL_HEALTH_CHECK.to_string());
}
