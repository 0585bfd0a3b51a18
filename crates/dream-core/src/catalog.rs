//! Sequence catalog
//!
//! Curated, hand-ordered milestone sequences for every known goal type.
//! Unknown goal types get the generic five-stage sequence, which the
//! orchestrator treats as a low-quality signal worth customizing.

use crate::types::{GoalType, SequenceEntry};

/// Generic sequence for unrecognized goal types
pub const GENERIC_SEQUENCE: [&str; 5] = [
    "goal_definition_and_research",
    "comprehensive_planning",
    "budget_and_resource_allocation",
    "execution_and_implementation",
    "completion_and_celebration",
];

const WEDDING: &[&str] = &[
    "budget_and_priorities_planning",
    "guest_list_creation",
    "venue_research_and_booking",
    "vendor_research_and_selection",
    "wedding_attire_shopping",
    "catering_and_menu_tasting",
    "photography_and_music_booking",
    "flowers_and_decor_design",
    "invitations_design_and_mailing",
    "final_vendor_confirmations",
    "wedding_day_execution",
    "honeymoon_planning_and_booking",
];

const HOME: &[&str] = &[
    "financial_health_assessment",
    "credit_score_optimization",
    "down_payment_savings_plan",
    "mortgage_preapproval_process",
    "real_estate_agent_selection",
    "neighborhood_research",
    "house_hunting_and_tours",
    "offer_and_negotiation",
    "home_inspection_and_appraisal",
    "mortgage_finalization",
    "closing_and_possession",
    "moving_and_settling_in",
];

const BABY: &[&str] = &[
    "financial_planning_for_baby",
    "healthcare_provider_selection",
    "prenatal_care_schedule",
    "parental_leave_planning",
    "nursery_design_and_setup",
    "baby_gear_shopping",
    "childcare_research",
    "birth_plan_preparation",
    "hospital_bag_preparation",
    "insurance_and_legal_updates",
    "postpartum_support_planning",
];

const BUSINESS: &[&str] = &[
    "business_idea_validation",
    "market_research_and_analysis",
    "business_plan_development",
    "legal_structure_and_registration",
    "funding_and_budget_planning",
    "brand_identity_design",
    "product_development",
    "operations_setup",
    "marketing_strategy_planning",
    "soft_launch_execution",
    "official_launch",
    "growth_review_and_iteration",
];

const VACATION: &[&str] = &[
    "destination_research",
    "travel_budget_planning",
    "travel_dates_selection",
    "flight_booking",
    "accommodation_booking",
    "travel_documents_preparation",
    "itinerary_planning",
    "activities_booking",
    "packing_preparation",
    "trip_execution",
    "post_trip_review",
];

const EMERGENCY_FUND: &[&str] = &[
    "expense_tracking_and_analysis",
    "target_amount_calculation",
    "budget_planning_and_cuts",
    "savings_account_research",
    "high_yield_account_opening",
    "automatic_transfer_setup",
    "debt_payment_planning",
    "first_month_progress_review",
    "quarterly_checkpoint_review",
    "fund_completion_and_maintenance",
];

const RELOCATION: &[&str] = &[
    "destination_city_research",
    "relocation_budget_planning",
    "job_and_income_planning",
    "housing_search_and_booking",
    "moving_company_research",
    "moving_company_booking",
    "belongings_decluttering",
    "packing_preparation",
    "address_and_utilities_transfer",
    "moving_day_execution",
    "settling_in_and_exploration",
];

const CAREER: &[&str] = &[
    "skills_assessment_and_research",
    "career_goal_definition",
    "skill_gap_analysis",
    "learning_plan_preparation",
    "certification_and_training",
    "portfolio_development",
    "resume_and_profile_update",
    "professional_networking",
    "job_application_execution",
    "interview_preparation",
    "offer_negotiation_review",
    "career_transition_execution",
];

const EDUCATION: &[&str] = &[
    "program_research",
    "admission_requirements_review",
    "financial_aid_and_budget_planning",
    "standardized_test_preparation",
    "application_materials_preparation",
    "application_submission",
    "scholarship_applications",
    "acceptance_review_and_decision",
    "enrollment_and_registration",
    "housing_and_relocation_planning",
    "study_plan_execution",
];

const FINANCIAL: &[&str] = &[
    "financial_health_assessment",
    "net_worth_calculation",
    "financial_goals_definition",
    "budget_planning",
    "debt_reduction_strategy",
    "emergency_savings_setup",
    "retirement_account_review",
    "investment_strategy_research",
    "insurance_coverage_review",
    "tax_optimization_planning",
    "automated_savings_execution",
    "quarterly_progress_review",
];

/// Static catalog entries for a goal type
#[must_use]
pub fn catalog_entries(goal: &GoalType) -> &'static [&'static str] {
    match goal {
        GoalType::Wedding => WEDDING,
        GoalType::Home => HOME,
        GoalType::Baby => BABY,
        GoalType::Business => BUSINESS,
        GoalType::Vacation => VACATION,
        GoalType::EmergencyFund => EMERGENCY_FUND,
        GoalType::Relocation => RELOCATION,
        GoalType::Career => CAREER,
        GoalType::Education => EDUCATION,
        GoalType::Financial => FINANCIAL,
        GoalType::Other(_) => &GENERIC_SEQUENCE,
    }
}

/// Look up the base sequence for a goal type
#[must_use]
pub fn lookup(goal: &GoalType) -> Vec<SequenceEntry> {
    catalog_entries(goal).iter().map(|s| (*s).to_string()).collect()
}

/// Look up the base sequence for a raw goal type name
#[inline]
#[must_use]
pub fn lookup_str(goal_type: &str) -> Vec<SequenceEntry> {
    lookup(&GoalType::parse(goal_type))
}

/// Generic fallback sequence
#[inline]
#[must_use]
pub fn generic_sequence() -> Vec<SequenceEntry> {
    GENERIC_SEQUENCE.iter().map(|s| (*s).to_string()).collect()
}

/// Check if a sequence is exactly the generic fallback
#[must_use]
pub fn is_generic(sequence: &[SequenceEntry]) -> bool {
    sequence.len() == GENERIC_SEQUENCE.len()
        && sequence.iter().zip(GENERIC_SEQUENCE).all(|(a, b)| a == b)
}
