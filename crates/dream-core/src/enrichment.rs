//! Milestone enrichment
//!
//! Expands each sequence entry into a full [`Milestone`]:
//! - human-readable title
//! - linear dependency on the previous entry
//! - duration estimate from an ordered substring table
//! - stage-appropriate tasks with a suggested partner

use crate::types::{Assignee, Milestone, MilestoneId, SequenceEntry, Task, TaskId};
use chrono::{DateTime, Utc};

/// Average weeks per month used for month conversions
pub const WEEKS_PER_MONTH: f64 = 4.33;

const WEEKS_PER_YEAR: f64 = 52.0;

const CREATIVE_KEYWORDS: [&str; 5] = ["design", "style", "decor", "flowers", "aesthetic"];
const LOGISTICAL_KEYWORDS: [&str; 5] = ["book", "schedule", "coordinate", "confirm", "budget"];

/// Duration unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Day,
    Week,
}

impl DurationUnit {
    fn weeks(self) -> f64 {
        match self {
            Self::Day => 1.0 / 7.0,
            Self::Week => 1.0,
        }
    }

    fn label(self, value: f64) -> &'static str {
        match (self, value > 1.0) {
            (Self::Day, false) => "day",
            (Self::Day, true) => "days",
            (Self::Week, false) => "week",
            (Self::Week, true) => "weeks",
        }
    }
}

/// Estimated duration range of one milestone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationRange {
    pub low: f64,
    pub low_unit: DurationUnit,
    pub high: f64,
    pub high_unit: DurationUnit,
}

impl DurationRange {
    const fn weeks(low: f64, high: f64) -> Self {
        Self {
            low,
            low_unit: DurationUnit::Week,
            high,
            high_unit: DurationUnit::Week,
        }
    }

    /// Both numeric bounds halved
    #[must_use]
    pub fn halved(self) -> Self {
        Self {
            low: self.low / 2.0,
            high: self.high / 2.0,
            ..self
        }
    }

    /// Midpoint of the range in weeks
    #[must_use]
    pub fn midpoint_weeks(&self) -> f64 {
        (self.low * self.low_unit.weeks() + self.high * self.high_unit.weeks()) / 2.0
    }

    /// Display form ("1-2 weeks", "1 day-1 week", "1 week")
    #[must_use]
    pub fn render(&self) -> String {
        let low = format_number(self.low);
        let high = format_number(self.high);
        if self.low_unit == self.high_unit {
            if self.low == self.high {
                format!("{high} {}", self.high_unit.label(self.high))
            } else {
                format!("{low}-{high} {}", self.high_unit.label(self.high))
            }
        } else {
            format!(
                "{low} {}-{high} {}",
                self.low_unit.label(self.low),
                self.high_unit.label(self.high)
            )
        }
    }
}

/// Ordered duration table; first substring match wins
const DURATION_TABLE: [(&str, DurationRange); 7] = [
    ("research", DurationRange::weeks(1.0, 2.0)),
    ("planning", DurationRange::weeks(2.0, 3.0)),
    ("booking", DurationRange::weeks(1.0, 2.0)),
    ("shopping", DurationRange::weeks(2.0, 4.0)),
    ("preparation", DurationRange::weeks(3.0, 6.0)),
    (
        "execution",
        DurationRange {
            low: 1.0,
            low_unit: DurationUnit::Day,
            high: 1.0,
            high_unit: DurationUnit::Week,
        },
    ),
    ("review", DurationRange::weeks(1.0, 1.0)),
];

const DEFAULT_DURATION: DurationRange = DurationRange::weeks(1.0, 2.0);

/// Estimate the duration of one sequence entry
#[must_use]
pub fn estimate_duration(entry: &str, time_constrained: bool) -> DurationRange {
    let range = DURATION_TABLE
        .iter()
        .find(|(pattern, _)| entry.contains(pattern))
        .map_or(DEFAULT_DURATION, |(_, range)| *range);

    if time_constrained {
        range.halved()
    } else {
        range
    }
}

/// Total roadmap duration rendered in weeks, months or years
#[must_use]
pub fn total_duration(sequence: &[SequenceEntry], time_constrained: bool) -> String {
    let weeks: f64 = sequence
        .iter()
        .map(|entry| estimate_duration(entry, time_constrained).midpoint_weeks())
        .sum();
    render_total(weeks)
}

fn render_total(weeks: f64) -> String {
    if weeks < 4.0 {
        let n = weeks.round().max(1.0);
        format!("{} {}", format_number(n), if n > 1.0 { "weeks" } else { "week" })
    } else if weeks < WEEKS_PER_YEAR {
        let n = (weeks / WEEKS_PER_MONTH).round().max(1.0);
        format!("{} {}", format_number(n), if n > 1.0 { "months" } else { "month" })
    } else {
        let n = (weeks / WEEKS_PER_YEAR * 10.0).round() / 10.0;
        format!("{} {}", format_number(n), if n > 1.0 { "years" } else { "year" })
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let s = format!("{value:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Human-readable title from a snake_case entry
#[must_use]
pub fn title_from_entry(entry: &str) -> String {
    entry
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Stage kind driving descriptions and task templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageKind {
    Research,
    Planning,
    Booking,
    Shopping,
    Preparation,
    Execution,
    Review,
    Design,
    Financial,
    General,
}

impl StageKind {
    fn classify(entry: &str) -> Self {
        const KINDS: [(&[&str], StageKind); 9] = [
            (&["research", "analysis"], StageKind::Research),
            (&["planning", "plan"], StageKind::Planning),
            (&["booking", "selection"], StageKind::Booking),
            (&["shopping"], StageKind::Shopping),
            (&["preparation", "setup"], StageKind::Preparation),
            (&["execution", "launch", "day"], StageKind::Execution),
            (&["review", "checkpoint"], StageKind::Review),
            (&["design", "decor"], StageKind::Design),
            (&["budget", "financial", "savings", "fund"], StageKind::Financial),
        ];

        KINDS
            .iter()
            .find(|(patterns, _)| patterns.iter().any(|p| entry.contains(p)))
            .map_or(StageKind::General, |(_, kind)| *kind)
    }

    fn summary(self) -> &'static str {
        match self {
            Self::Research => "Gather information and compare the options before committing.",
            Self::Planning => "Turn priorities into a concrete plan with owners and dates.",
            Self::Booking => "Secure the providers and reservations this stage depends on.",
            Self::Shopping => "Choose and purchase what you need while staying on budget.",
            Self::Preparation => "Get everything ready so the next stages run smoothly.",
            Self::Execution => "Carry out the plan and enjoy the moment you worked toward.",
            Self::Review => "Look back at progress and adjust the plan where needed.",
            Self::Design => "Shape the look and feel so it reflects what you both love.",
            Self::Financial => "Make sure the money side supports the rest of the journey.",
            Self::General => "Work through this stage step by step toward your dream.",
        }
    }

    fn task_templates(self) -> [&'static str; 3] {
        match self {
            Self::Research => [
                "Research options for {}",
                "Compare top choices for {}",
                "Share findings and agree on a shortlist",
            ],
            Self::Planning => [
                "Draft a plan for {}",
                "Set the budget for {}",
                "Schedule a check-in to review the plan",
            ],
            Self::Booking => [
                "Shortlist providers for {}",
                "Book {}",
                "Confirm details and deposits",
            ],
            Self::Shopping => [
                "Create a shopping list for {}",
                "Choose a style direction",
                "Purchase items for {}",
            ],
            Self::Preparation => [
                "List everything needed for {}",
                "Prepare materials for {}",
                "Coordinate final preparations",
            ],
            Self::Execution => [
                "Confirm the timeline for {}",
                "Carry out {}",
                "Capture memories and celebrate",
            ],
            Self::Review => [
                "Gather results from {}",
                "Review what worked",
                "Schedule next steps",
            ],
            Self::Design => [
                "Collect design inspiration for {}",
                "Choose the aesthetic",
                "Finalize details for {}",
            ],
            Self::Financial => [
                "Review current finances for {}",
                "Set a savings target",
                "Automate monthly contributions",
            ],
            Self::General => [
                "Define what done looks like for {}",
                "Break {} into weekly steps",
                "Track progress on {}",
            ],
        }
    }

    fn task_time(self) -> &'static str {
        match self {
            Self::Research => "3-4 hours",
            Self::Planning => "2-3 hours",
            Self::Booking | Self::Review | Self::Financial => "1-2 hours",
            Self::Shopping => "4-6 hours",
            Self::Preparation => "3-5 hours",
            Self::Execution => "1 day",
            Self::Design => "2-4 hours",
            Self::General => "2-3 hours",
        }
    }
}

/// Suggest a partner for a task title
///
/// Alternates by index unless the title reads as creative (`partner_b`)
/// or logistical (`partner_a`); creative keywords are checked first.
#[must_use]
pub fn assign_partner(title: &str, index: usize) -> (Assignee, String) {
    let lower = title.to_lowercase();

    if CREATIVE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        (
            Assignee::PartnerB,
            "Creative task suited to partner_b".to_string(),
        )
    } else if LOGISTICAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        (
            Assignee::PartnerA,
            "Logistics task suited to partner_a".to_string(),
        )
    } else {
        let assignee = Assignee::alternating(index);
        (
            assignee,
            format!("Alternating assignment to {} to balance workload", assignee.as_str()),
        )
    }
}

fn build_tasks(entry: &str, title: &str) -> Vec<Task> {
    let kind = StageKind::classify(entry);
    let subject = title.to_lowercase();

    kind.task_templates()
        .iter()
        .enumerate()
        .map(|(index, template)| {
            let task_title = template.replace("{}", &subject);
            let (suggested_assignee, assignment_reason) = assign_partner(&task_title, index);
            Task {
                id: TaskId::new(),
                title: task_title,
                completed: false,
                suggested_assignee,
                estimated_time: kind.task_time().to_string(),
                assignment_reason,
            }
        })
        .collect()
}

/// Expand a sequence into milestones
///
/// Estimated costs start at zero; the budget allocator fills them in.
#[must_use]
pub fn enrich(sequence: &[SequenceEntry], time_constrained: bool) -> Vec<Milestone> {
    enrich_at(sequence, time_constrained, Utc::now())
}

fn enrich_at(
    sequence: &[SequenceEntry],
    time_constrained: bool,
    created_at: DateTime<Utc>,
) -> Vec<Milestone> {
    sequence
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let title = title_from_entry(entry);
            let range = estimate_duration(entry, time_constrained);
            let estimated_duration = range.render();
            let timeline_months = (range.midpoint_weeks() / WEEKS_PER_MONTH).ceil().max(1.0) as u32;
            let depends_on = if i == 0 {
                Vec::new()
            } else {
                vec![sequence[i - 1].clone()]
            };

            Milestone {
                id: MilestoneId::new(),
                description: format!("{title}: {}", StageKind::classify(entry).summary()),
                tasks: build_tasks(entry, &title),
                title,
                estimated_cost: 0.0,
                duration: estimated_duration.clone(),
                timeline_months,
                depends_on,
                estimated_duration,
                created_at,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seq(entries: &[&str]) -> Vec<SequenceEntry> {
        entries.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn titles_capitalize_each_word() {
        assert_eq!(
            title_from_entry("mortgage_preapproval_process"),
            "Mortgage Preapproval Process"
        );
        assert_eq!(title_from_entry("venue__booking_"), "Venue Booking");
    }

    #[test]
    fn dependency_chain_is_linear() {
        let sequence = seq(&["first_step", "second_step", "third_step"]);
        let milestones = enrich(&sequence, false);

        assert!(milestones[0].depends_on.is_empty());
        for i in 1..milestones.len() {
            assert_eq!(milestones[i].depends_on, vec![sequence[i - 1].clone()]);
        }
    }

    #[test]
    fn duration_table_order_and_default() {
        assert_eq!(estimate_duration("venue_research", false).render(), "1-2 weeks");
        assert_eq!(estimate_duration("trip_planning", false).render(), "2-3 weeks");
        // research precedes booking in the table
        assert_eq!(estimate_duration("research_and_booking", false).render(), "1-2 weeks");
        assert_eq!(estimate_duration("attire_shopping", false).render(), "2-4 weeks");
        assert_eq!(estimate_duration("bag_preparation", false).render(), "3-6 weeks");
        assert_eq!(estimate_duration("wedding_day_execution", false).render(), "1 day-1 week");
        assert_eq!(estimate_duration("post_trip_review", false).render(), "1 week");
        assert_eq!(estimate_duration("guest_list", false).render(), "1-2 weeks");
    }

    #[test]
    fn time_constraint_halves_bounds() {
        assert_eq!(estimate_duration("trip_planning", true).render(), "1-1.5 weeks");
        assert_eq!(estimate_duration("guest_list", true).render(), "0.5-1 week");
        assert_eq!(
            estimate_duration("launch_execution", true).render(),
            "0.5 day-0.5 week"
        );
    }

    #[test]
    fn total_duration_units() {
        assert_eq!(render_total(2.6), "3 weeks");
        assert_eq!(render_total(0.4), "1 week");
        assert_eq!(render_total(20.57), "5 months");
        assert_eq!(render_total(78.0), "1.5 years");
        assert_eq!(render_total(104.0), "2 years");
    }

    #[test]
    fn total_duration_sums_midpoints() {
        // 1.5 + 2.5 + 1.5 = 5.5 weeks -> 1 month
        let sequence = seq(&["venue_research", "budget_planning", "venue_booking"]);
        assert_eq!(total_duration(&sequence, false), "1 month");
        // halved: 2.75 weeks
        assert_eq!(total_duration(&sequence, true), "3 weeks");
    }

    #[test]
    fn partner_assignment_rules() {
        assert_eq!(assign_partner("Choose the aesthetic", 0).0, Assignee::PartnerB);
        assert_eq!(assign_partner("Book the photographer", 1).0, Assignee::PartnerA);
        // creative wins over logistical
        assert_eq!(assign_partner("Schedule flowers tasting", 0).0, Assignee::PartnerB);
        assert_eq!(assign_partner("Gather results", 0).0, Assignee::PartnerA);
        assert_eq!(assign_partner("Gather results", 1).0, Assignee::PartnerB);
    }

    #[test]
    fn milestones_carry_tasks_and_descriptions() {
        let milestones = enrich(&seq(&["flowers_and_decor_design"]), false);
        let milestone = &milestones[0];

        assert_eq!(milestone.title, "Flowers And Decor Design");
        assert_eq!(milestone.tasks.len(), 3);
        assert!(milestone.description.len() >= 20);
        assert!(milestone
            .tasks
            .iter()
            .all(|t| t.suggested_assignee == Assignee::PartnerB && !t.completed));
        assert_eq!(milestone.timeline_months, 1);
        assert_eq!(milestone.duration, milestone.estimated_duration);
    }

    #[test]
    fn milestones_are_fresh_each_call() {
        let sequence = seq(&["a_stage", "b_stage"]);
        let first = enrich(&sequence, false);
        let second = enrich(&sequence, false);
        assert_ne!(first[0].id, second[0].id);
    }
}
