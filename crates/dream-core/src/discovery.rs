//! Goal discovery
//!
//! Keyword extraction of a goal type and partial [`UserContext`] from a
//! free-text message. Explicit numeric statements score
//! [`EXPLICIT_CONFIDENCE`], vague phrases [`VAGUE_CONFIDENCE`].

use crate::types::{
    BudgetHint, Constraint, GoalType, LocationHint, Preference, TimelineHint, UserContext,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// Confidence of an explicit numeric match
pub const EXPLICIT_CONFIDENCE: f64 = 0.9;

/// Confidence of a vague phrase
pub const VAGUE_CONFIDENCE: f64 = 0.6;

// =============================================================================
// PATTERNS
// =============================================================================

/// "$25,000", "$1500", "$30k"
static DOLLAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\s?(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)(\s?[kK]\b)?").expect("valid regex")
});

/// "25k", "2.5K"
static THOUSANDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s?k\b").expect("valid regex"));

/// "25000 dollars", "5,000 usd"
static CURRENCY_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)\s*(?:dollars|usd|bucks)\b")
        .expect("valid regex")
});

/// "in 6 months", "within 2 years"
static TIMELINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:in|within)\s+(\d+)\s+(day|week|month|year)s?\b").expect("valid regex")
});

/// "next year", "this summer"
static VAGUE_TIMELINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:next|this)\s+(year|month|spring|summer|fall|autumn|winter)\b")
        .expect("valid regex")
});

/// "in Lisbon", "to New York"
static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:in|to)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)").expect("valid regex")
});

static SEASON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(spring|summer|fall|autumn|winter)\b").expect("valid regex"));

static TIME_CONSTRAINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:asap|as soon as possible|quickly|urgent(?:ly)?|tight deadline)\b")
        .expect("valid regex")
});

static BUDGET_CONSTRAINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:tight budget|affordable|cheap|on a budget|low budget)\b")
        .expect("valid regex")
});

/// Goal keywords in priority order; first match wins
static GOAL_KEYWORDS: Lazy<Vec<(GoalType, Regex)>> = Lazy::new(|| {
    let table: [(GoalType, &[&str]); 10] = [
        (GoalType::Wedding, &["wedding", "married", "marry", "engaged", "elope"]),
        (GoalType::EmergencyFund, &["emergency fund", "rainy day", "safety net"]),
        (GoalType::Baby, &["baby", "pregnant", "expecting", "newborn"]),
        (GoalType::Home, &["house", "home", "condo", "mortgage"]),
        (GoalType::Relocation, &["relocate", "relocation", "move to", "moving to"]),
        (GoalType::Business, &["business", "startup", "company", "shop"]),
        (GoalType::Career, &["career", "promotion", "new job", "job"]),
        (GoalType::Education, &["degree", "college", "university", "school", "course"]),
        (GoalType::Vacation, &["vacation", "trip", "travel", "holiday", "getaway"]),
        (GoalType::Financial, &["invest", "investing", "retirement", "debt", "savings"]),
    ];
    table
        .into_iter()
        .map(|(goal, words)| {
            let pattern = format!(r"(?i)\b(?:{})\b", words.join("|"));
            (goal, Regex::new(&pattern).expect("valid regex"))
        })
        .collect()
});

/// Capitalized words after "in" that name a time, not a place
const NOT_PLACES: [&str; 13] = [
    "I", "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

// =============================================================================
// DISCOVERY
// =============================================================================

/// Goal type and context found in a message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveredGoal {
    /// Goal type, when a keyword matched
    pub goal_type: Option<GoalType>,
    /// Extracted context
    pub context: UserContext,
}

impl DiscoveredGoal {
    /// Merge into an existing context, keeping higher-confidence fields
    #[must_use]
    pub fn merge_into(&self, existing: &UserContext) -> UserContext {
        merge(existing, &self.context)
    }
}

/// Extract goal type and context from a message
#[must_use]
pub fn discover(message: &str) -> DiscoveredGoal {
    let mut context = UserContext::new();
    context.budget = detect_budget(message);
    context.timeline = detect_timeline(message);
    context.location = detect_location(message);

    if let Some(season) = SEASON_RE.captures(message).and_then(|c| c.get(1)) {
        context.preferences.push(Preference {
            category: "season".to_string(),
            value: season.as_str().to_lowercase(),
            confidence: VAGUE_CONFIDENCE,
        });
    }
    if TIME_CONSTRAINT_RE.is_match(message) {
        context.constraints.push(Constraint::time());
    }
    if BUDGET_CONSTRAINT_RE.is_match(message) {
        context.constraints.push(Constraint::budget());
    }

    let goal_type = detect_goal_type(message);
    tracing::debug!(
        goal_type = ?goal_type,
        budget = context.budget.is_some(),
        timeline = context.timeline.is_some(),
        location = context.location.is_some(),
        constraints = context.constraints.len(),
        "goal discovery"
    );

    DiscoveredGoal { goal_type, context }
}

/// Goal type named by the message, if any
#[must_use]
pub fn detect_goal_type(message: &str) -> Option<GoalType> {
    GOAL_KEYWORDS
        .iter()
        .find(|(_, re)| re.is_match(message))
        .map(|(goal, _)| goal.clone())
}

fn detect_budget(message: &str) -> Option<BudgetHint> {
    let amount = DOLLAR_RE
        .captures(message)
        .and_then(|c| {
            let base = parse_amount(c.get(1)?.as_str())?;
            Some(if c.get(2).is_some() { base * 1000.0 } else { base })
        })
        .or_else(|| {
            THOUSANDS_RE
                .captures(message)
                .and_then(|c| parse_amount(c.get(1)?.as_str()))
                .map(|v| v * 1000.0)
        })
        .or_else(|| {
            CURRENCY_WORD_RE
                .captures(message)
                .and_then(|c| parse_amount(c.get(1)?.as_str()))
        })?;

    Some(BudgetHint {
        amount,
        confidence: EXPLICIT_CONFIDENCE,
    })
}

fn parse_amount(digits: &str) -> Option<f64> {
    digits.replace(',', "").parse().ok()
}

fn detect_timeline(message: &str) -> Option<TimelineHint> {
    if let Some(c) = TIMELINE_RE.captures(message) {
        return Some(TimelineHint {
            text: c.get(0)?.as_str().to_string(),
            unit: c.get(2).map(|u| format!("{}s", u.as_str().to_lowercase())),
            confidence: EXPLICIT_CONFIDENCE,
        });
    }

    let c = VAGUE_TIMELINE_RE.captures(message)?;
    let unit = c.get(1).and_then(|u| match u.as_str().to_lowercase().as_str() {
        "year" => Some("years".to_string()),
        "month" => Some("months".to_string()),
        _ => None,
    });
    Some(TimelineHint {
        text: c.get(0)?.as_str().to_string(),
        unit,
        confidence: VAGUE_CONFIDENCE,
    })
}

fn detect_location(message: &str) -> Option<LocationHint> {
    LOCATION_RE
        .captures_iter(message)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .find(|place| {
            let first = place.split_whitespace().next().unwrap_or_default();
            !NOT_PLACES.contains(&first)
        })
        .map(|place| LocationHint {
            text: place.to_string(),
            confidence: VAGUE_CONFIDENCE,
        })
}

// =============================================================================
// MERGE
// =============================================================================

/// Combine a new discovery into an existing context
///
/// Scalar hints are replaced only when the incoming confidence is at least
/// the existing one. Preferences merge per category under the same rule;
/// constraints are unioned.
#[must_use]
pub fn merge(existing: &UserContext, incoming: &UserContext) -> UserContext {
    let mut merged = existing.clone();

    merged.budget = pick(existing.budget.as_ref(), incoming.budget.as_ref(), |b| b.confidence);
    merged.timeline = pick(existing.timeline.as_ref(), incoming.timeline.as_ref(), |t| {
        t.confidence
    });
    merged.location = pick(existing.location.as_ref(), incoming.location.as_ref(), |l| {
        l.confidence
    });

    for preference in &incoming.preferences {
        match merged
            .preferences
            .iter_mut()
            .find(|p| p.category == preference.category)
        {
            Some(current) if preference.confidence >= current.confidence => {
                *current = preference.clone();
            }
            Some(_) => {}
            None => merged.preferences.push(preference.clone()),
        }
    }

    for constraint in &incoming.constraints {
        if !merged.constraints.contains(constraint) {
            merged.constraints.push(constraint.clone());
        }
    }

    merged
}

fn pick<T: Clone>(
    existing: Option<&T>,
    incoming: Option<&T>,
    confidence: impl Fn(&T) -> f64,
) -> Option<T> {
    match (existing, incoming) {
        (Some(current), Some(new)) if confidence(new) < confidence(current) => {
            Some(current.clone())
        }
        (_, Some(new)) => Some(new.clone()),
        (current, None) => current.cloned(),
    }
}
