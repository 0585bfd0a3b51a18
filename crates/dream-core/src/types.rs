//! Core types for Dream Planner
//!
//! Defines the fundamental records of the pipeline:
//! - User context (budget, timeline, location, preferences, constraints)
//! - Goal types and sequence entries
//! - Milestones, tasks and the generated roadmap
//! - Budget allocation and generation options

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Snake-case identifier naming one journey stage before enrichment
pub type SequenceEntry = String;

/// Unique milestone identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MilestoneId(pub Ulid);

impl MilestoneId {
    /// Generate new milestone ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for MilestoneId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique task identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub Ulid);

impl TaskId {
    /// Generate new task ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of dream being planned
///
/// Known kinds map to curated catalog sequences; anything else is carried
/// verbatim as [`GoalType::Other`] and planned with the generic sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GoalType {
    Wedding,
    Home,
    Baby,
    Business,
    Vacation,
    EmergencyFund,
    Relocation,
    Career,
    Education,
    Financial,
    /// Unrecognized goal type
    Other(String),
}

impl GoalType {
    /// Every known goal type, in catalog order
    pub const KNOWN: [GoalType; 10] = [
        GoalType::Wedding,
        GoalType::Home,
        GoalType::Baby,
        GoalType::Business,
        GoalType::Vacation,
        GoalType::EmergencyFund,
        GoalType::Relocation,
        GoalType::Career,
        GoalType::Education,
        GoalType::Financial,
    ];

    /// Parse a goal type, accepting common aliases
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
            .collect();

        match key.as_str() {
            "wedding" => Self::Wedding,
            "home" | "house" | "home_purchase" => Self::Home,
            "baby" => Self::Baby,
            "business" => Self::Business,
            "vacation" | "travel" => Self::Vacation,
            "emergency_fund" | "emergency" => Self::EmergencyFund,
            "relocation" | "moving" => Self::Relocation,
            "career" => Self::Career,
            "education" => Self::Education,
            "financial" | "finance" | "finances" => Self::Financial,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Canonical name
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Wedding => "wedding",
            Self::Home => "home",
            Self::Baby => "baby",
            Self::Business => "business",
            Self::Vacation => "vacation",
            Self::EmergencyFund => "emergency_fund",
            Self::Relocation => "relocation",
            Self::Career => "career",
            Self::Education => "education",
            Self::Financial => "financial",
            Self::Other(raw) => raw,
        }
    }

    /// Check if this goal type has a curated sequence
    #[inline]
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for GoalType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for GoalType {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<GoalType> for String {
    fn from(goal: GoalType) -> Self {
        goal.as_str().to_string()
    }
}

impl std::fmt::Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Budget hint extracted from the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetHint {
    /// Total amount in the planner currency
    pub amount: f64,
    /// Extraction confidence (0.0 - 1.0)
    pub confidence: f64,
}

/// Timeline hint extracted from the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineHint {
    /// Free text as stated ("in 6 months")
    pub text: String,
    /// Normalized unit, if recognized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Extraction confidence (0.0 - 1.0)
    pub confidence: f64,
}

/// Location hint extracted from the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationHint {
    /// Free text place name
    pub text: String,
    /// Extraction confidence (0.0 - 1.0)
    pub confidence: f64,
}

/// A stated preference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    /// Preference category ("style", "season", ...)
    pub category: String,
    /// Preference value
    pub value: String,
    /// Extraction confidence (0.0 - 1.0)
    pub confidence: f64,
}

/// Constraint kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConstraintKind {
    /// User is short on time
    Time,
    /// User is short on money
    Budget,
    /// Carried but ignored by the pipeline
    Other(String),
}

impl From<String> for ConstraintKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "time_constraint" => Self::Time,
            "budget_constraint" => Self::Budget,
            _ => Self::Other(raw),
        }
    }
}

impl From<ConstraintKind> for String {
    fn from(kind: ConstraintKind) -> Self {
        match kind {
            ConstraintKind::Time => "time_constraint".to_string(),
            ConstraintKind::Budget => "budget_constraint".to_string(),
            ConstraintKind::Other(raw) => raw,
        }
    }
}

/// A user-declared limiting factor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint {
    /// Constraint kind
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
}

impl Constraint {
    /// Time constraint
    #[inline]
    #[must_use]
    pub fn time() -> Self {
        Self {
            kind: ConstraintKind::Time,
        }
    }

    /// Budget constraint
    #[inline]
    #[must_use]
    pub fn budget() -> Self {
        Self {
            kind: ConstraintKind::Budget,
        }
    }
}

/// Check whether a constraint list contains a kind
#[inline]
#[must_use]
pub fn has_constraint(constraints: &[Constraint], kind: &ConstraintKind) -> bool {
    constraints.iter().any(|c| &c.kind == kind)
}

/// Partial user context gathered before planning
///
/// Immutable input: the pipeline only ever reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationHint>,
    #[serde(default)]
    pub preferences: Vec<Preference>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl UserContext {
    /// Create empty context
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With budget
    #[inline]
    #[must_use]
    pub fn with_budget(mut self, amount: f64, confidence: f64) -> Self {
        self.budget = Some(BudgetHint { amount, confidence });
        self
    }

    /// With timeline
    #[inline]
    #[must_use]
    pub fn with_timeline(mut self, text: impl Into<String>, confidence: f64) -> Self {
        self.timeline = Some(TimelineHint {
            text: text.into(),
            unit: None,
            confidence,
        });
        self
    }

    /// With location
    #[inline]
    #[must_use]
    pub fn with_location(mut self, text: impl Into<String>, confidence: f64) -> Self {
        self.location = Some(LocationHint {
            text: text.into(),
            confidence,
        });
        self
    }

    /// With preference
    #[inline]
    #[must_use]
    pub fn with_preference(
        mut self,
        category: impl Into<String>,
        value: impl Into<String>,
        confidence: f64,
    ) -> Self {
        self.preferences.push(Preference {
            category: category.into(),
            value: value.into(),
            confidence,
        });
        self
    }

    /// With constraint
    #[inline]
    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Check for an active time constraint
    #[inline]
    #[must_use]
    pub fn is_time_constrained(&self) -> bool {
        has_constraint(&self.constraints, &ConstraintKind::Time)
    }

    /// Total budget, if stated
    #[inline]
    #[must_use]
    pub fn budget_amount(&self) -> Option<f64> {
        self.budget.as_ref().map(|b| b.amount)
    }
}

/// Partner a task is suggested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignee {
    PartnerA,
    PartnerB,
}

impl Assignee {
    /// Alternating assignment by task index
    #[inline]
    #[must_use]
    pub fn alternating(index: usize) -> Self {
        if index % 2 == 0 {
            Self::PartnerA
        } else {
            Self::PartnerB
        }
    }

    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PartnerA => "partner_a",
            Self::PartnerB => "partner_b",
        }
    }
}

/// Actionable task within a milestone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    pub suggested_assignee: Assignee,
    pub estimated_time: String,
    pub assignment_reason: String,
}

/// One stage of a dream journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: MilestoneId,
    pub title: String,
    pub description: String,
    #[serde(rename = "estimatedCost")]
    pub estimated_cost: f64,
    pub duration: String,
    pub timeline_months: u32,
    pub tasks: Vec<Task>,
    pub depends_on: Vec<SequenceEntry>,
    pub estimated_duration: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Which generation layer produced the final sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    /// Catalog sequence used as-is
    Template,
    /// Generator approved the catalog sequence
    TemplateValidated,
    /// Generator rewrote the catalog sequence
    TemplateCustomized,
    /// Generator produced the sequence from scratch
    ClaudeGenerated,
    /// Every generation layer failed
    Fallback,
}

impl GenerationMethod {
    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::TemplateValidated => "template_validated",
            Self::TemplateCustomized => "template_customized",
            Self::ClaudeGenerated => "claude_generated",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roadmap summary metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapMetadata {
    pub total_milestones: usize,
    pub total_duration: String,
    pub estimated_cost: f64,
    pub generation_method: GenerationMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_insights: Option<String>,
    pub confidence: f64,
}

/// Generated roadmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub goal: String,
    pub milestones: Vec<Milestone>,
    pub metadata: RoadmapMetadata,
}

/// Budget share of one milestone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MilestoneAllocation {
    pub amount: f64,
    pub percentage: f64,
}

/// Budget distributed across milestones, keyed by milestone title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAllocation {
    pub total: f64,
    pub by_milestone: IndexMap<String, MilestoneAllocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of one generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapGenerationResult {
    pub roadmap: Roadmap,
    pub budget_allocation: BudgetAllocation,
}

impl RoadmapGenerationResult {
    /// Generation method recorded in the metadata
    #[inline]
    #[must_use]
    pub fn method(&self) -> GenerationMethod {
        self.roadmap.metadata.generation_method
    }
}

/// Per-call generation options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    /// Ask the generator to validate/customize the catalog sequence
    #[serde(default)]
    pub use_claude_validation: bool,
    /// Allow any call to the external generator
    #[serde(default = "default_true")]
    pub allow_generation: bool,
}

fn default_true() -> bool {
    true
}

impl GenerationOptions {
    /// Default options: generation allowed, validation off
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With validation enabled
    #[inline]
    #[must_use]
    pub fn with_validation(mut self) -> Self {
        self.use_claude_validation = true;
        self
    }

    /// Catalog only, never call the generator
    #[inline]
    #[must_use]
    pub fn template_only() -> Self {
        Self {
            use_claude_validation: false,
            allow_generation: false,
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            use_claude_validation: false,
            allow_generation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_type_aliases() {
        assert_eq!(GoalType::parse("Wedding"), GoalType::Wedding);
        assert_eq!(GoalType::parse("home_purchase"), GoalType::Home);
        assert_eq!(GoalType::parse("moving"), GoalType::Relocation);
        assert_eq!(GoalType::parse("Emergency-Fund"), GoalType::EmergencyFund);
        assert_eq!(
            GoalType::parse("space_tourism"),
            GoalType::Other("space_tourism".to_string())
        );
    }

    #[test]
    fn goal_type_serde_uses_canonical_name() {
        let json = serde_json::to_string(&GoalType::EmergencyFund).unwrap();
        assert_eq!(json, "\"emergency_fund\"");

        let parsed: GoalType = serde_json::from_str("\"travel\"").unwrap();
        assert_eq!(parsed, GoalType::Vacation);
    }

    #[test]
    fn constraint_wire_format() {
        let json = serde_json::to_string(&Constraint::time()).unwrap();
        assert_eq!(json, r#"{"type":"time_constraint"}"#);

        let parsed: Vec<Constraint> =
            serde_json::from_str(r#"[{"type":"budget_constraint"},{"type":"weather"}]"#).unwrap();
        assert_eq!(parsed[0], Constraint::budget());
        assert_eq!(parsed[1].kind, ConstraintKind::Other("weather".to_string()));
    }

    #[test]
    fn user_context_deserializes_partial_input() {
        let ctx: UserContext =
            serde_json::from_str(r#"{"budget":{"amount":30000,"confidence":0.9}}"#).unwrap();
        assert_eq!(ctx.budget_amount(), Some(30000.0));
        assert!(ctx.timeline.is_none());
        assert!(ctx.preferences.is_empty());
        assert!(!ctx.is_time_constrained());
    }

    #[test]
    fn assignee_alternates() {
        assert_eq!(Assignee::alternating(0), Assignee::PartnerA);
        assert_eq!(Assignee::alternating(1), Assignee::PartnerB);
        assert_eq!(Assignee::alternating(4), Assignee::PartnerA);
    }

    #[test]
    fn generation_method_wire_names() {
        let json = serde_json::to_string(&GenerationMethod::ClaudeGenerated).unwrap();
        assert_eq!(json, "\"claude_generated\"");
        assert_eq!(GenerationMethod::TemplateValidated.as_str(), "template_validated");
    }

    #[test]
    fn options_default_allows_generation() {
        let opts: GenerationOptions = serde_json::from_str("{}").unwrap();
        assert!(opts.allow_generation);
        assert!(!opts.use_claude_validation);
        assert!(!GenerationOptions::template_only().allow_generation);
    }
}
