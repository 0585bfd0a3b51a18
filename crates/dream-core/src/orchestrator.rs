//! Generation orchestrator
//!
//! Runs the layered sequence strategy as an explicit state machine:
//!
//! ```text
//! Template ──► ValidatingCustomizing ──► PureGenerating ──► Fallback
//!    │                 │                       │               │
//!    └─────────────────┴──────────► Done ◄─────┴───────────────┘
//! ```
//!
//! Every path ends in `Done` with a non-empty sequence; generator failures
//! are logged and move the machine to the next layer.

use crate::boundary::{DisabledGenerator, GenerationBoundary, TextGenerator};
use crate::budget;
use crate::catalog;
use crate::config::PlannerConfig;
use crate::constraints;
use crate::enrichment;
use crate::store::{RoadmapId, RoadmapStore};
use crate::types::{
    GenerationMethod, GenerationOptions, GoalType, Milestone, Roadmap, RoadmapGenerationResult,
    RoadmapMetadata, SequenceEntry, UserContext,
};

/// State kind, used for the transition table and tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Template,
    ValidatingCustomizing,
    PureGenerating,
    Fallback,
    Done,
}

/// States reachable from a state kind
#[must_use]
pub fn allowed_transitions(from: StateKind) -> Vec<StateKind> {
    use StateKind::*;
    match from {
        Template => vec![ValidatingCustomizing, Done],
        ValidatingCustomizing => vec![PureGenerating, Done],
        PureGenerating => vec![Fallback, Done],
        Fallback => vec![Done],
        Done => vec![],
    }
}

fn allowed(from: StateKind, to: StateKind) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}

/// Winning sequence and the layer that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceOutcome {
    pub sequence: Vec<SequenceEntry>,
    pub method: GenerationMethod,
    pub insights: Option<String>,
}

/// Orchestrator state
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationState {
    Template,
    ValidatingCustomizing,
    PureGenerating,
    Fallback,
    Done(SequenceOutcome),
}

impl GenerationState {
    /// State kind
    #[must_use]
    pub fn kind(&self) -> StateKind {
        match self {
            Self::Template => StateKind::Template,
            Self::ValidatingCustomizing => StateKind::ValidatingCustomizing,
            Self::PureGenerating => StateKind::PureGenerating,
            Self::Fallback => StateKind::Fallback,
            Self::Done(_) => StateKind::Done,
        }
    }
}

/// Result of running the state machine
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSelection {
    /// Winning sequence
    pub outcome: SequenceOutcome,
    /// States visited, in order, ending with `Done`
    pub path: Vec<StateKind>,
}

/// Immutable inputs of one generation call
#[derive(Debug)]
pub struct GenerationRun<'a> {
    goal: &'a GoalType,
    description: Option<&'a str>,
    context: &'a UserContext,
    options: GenerationOptions,
    catalog_sequence: Vec<SequenceEntry>,
    template_sequence: Vec<SequenceEntry>,
}

impl<'a> GenerationRun<'a> {
    /// Prepare a run: catalog lookup plus constraint adjustment
    #[must_use]
    pub fn new(
        goal: &'a GoalType,
        description: Option<&'a str>,
        context: &'a UserContext,
        options: GenerationOptions,
    ) -> Self {
        let catalog_sequence = catalog::lookup(goal);
        let template_sequence = constraints::adjust(goal, &catalog_sequence, &context.constraints);
        Self {
            goal,
            description: description.map(str::trim).filter(|d| !d.is_empty()),
            context,
            options,
            catalog_sequence,
            template_sequence,
        }
    }

    /// Constraint-adjusted catalog sequence
    #[inline]
    #[must_use]
    pub fn template_sequence(&self) -> &[SequenceEntry] {
        &self.template_sequence
    }

    fn done(&self, sequence: Vec<SequenceEntry>, method: GenerationMethod) -> GenerationState {
        GenerationState::Done(SequenceOutcome {
            sequence,
            method,
            insights: None,
        })
    }

    /// `Template` transition
    #[must_use]
    pub fn on_template(&self) -> GenerationState {
        if self.description.is_none() || !self.options.allow_generation {
            return self.done(self.template_sequence.clone(), GenerationMethod::Template);
        }

        let force_customization = catalog::is_generic(&self.catalog_sequence);
        if self.options.use_claude_validation || force_customization {
            if force_customization {
                tracing::debug!(goal_type = %self.goal, "generic sequence, forcing customization");
            }
            GenerationState::ValidatingCustomizing
        } else {
            self.done(self.template_sequence.clone(), GenerationMethod::Template)
        }
    }

    /// `ValidatingCustomizing` transition
    pub async fn on_validating<G: TextGenerator>(
        &self,
        boundary: &GenerationBoundary<G>,
    ) -> GenerationState {
        let description = self.description.unwrap_or_default();
        match boundary
            .validate_and_customize(&self.template_sequence, self.goal, description, self.context)
            .await
        {
            Ok(customization) if !customization.customized_sequence.is_empty() => {
                let method = if customization.approved {
                    GenerationMethod::TemplateValidated
                } else {
                    GenerationMethod::TemplateCustomized
                };
                let insights = Some(customization.insights).filter(|i| !i.trim().is_empty());
                GenerationState::Done(SequenceOutcome {
                    sequence: customization.customized_sequence,
                    method,
                    insights,
                })
            }
            Ok(_) => {
                tracing::warn!(goal_type = %self.goal, "customization returned an empty sequence");
                GenerationState::PureGenerating
            }
            Err(e) => {
                tracing::warn!(
                    goal_type = %self.goal,
                    error = %e,
                    transport = e.is_transport(),
                    "validate/customize layer failed"
                );
                GenerationState::PureGenerating
            }
        }
    }

    /// `PureGenerating` transition
    pub async fn on_pure_generating<G: TextGenerator>(
        &self,
        boundary: &GenerationBoundary<G>,
    ) -> GenerationState {
        let description = self.description.unwrap_or_default();
        match boundary.generate_sequence(description, self.context).await {
            Ok(sequence) => self.done(sequence, GenerationMethod::ClaudeGenerated),
            Err(e) => {
                tracing::warn!(
                    goal_type = %self.goal,
                    error = %e,
                    transport = e.is_transport(),
                    "pure generation layer failed"
                );
                GenerationState::Fallback
            }
        }
    }

    /// `Fallback` transition
    #[must_use]
    pub fn on_fallback(&self) -> GenerationState {
        self.done(self.template_sequence.clone(), GenerationMethod::Fallback)
    }

    /// Drive the machine from `Template` to `Done`
    pub async fn run<G: TextGenerator>(&self, boundary: &GenerationBoundary<G>) -> SequenceSelection {
        let mut state = GenerationState::Template;
        let mut path = vec![StateKind::Template];

        loop {
            let next = match &state {
                GenerationState::Template => self.on_template(),
                GenerationState::ValidatingCustomizing => self.on_validating(boundary).await,
                GenerationState::PureGenerating => self.on_pure_generating(boundary).await,
                GenerationState::Fallback => self.on_fallback(),
                GenerationState::Done(outcome) => {
                    return SequenceSelection {
                        outcome: outcome.clone(),
                        path,
                    };
                }
            };

            debug_assert!(
                allowed(state.kind(), next.kind()),
                "illegal transition {:?} -> {:?}",
                state.kind(),
                next.kind()
            );
            tracing::debug!(from = ?state.kind(), to = ?next.kind(), "generation transition");
            path.push(next.kind());
            state = next;
        }
    }
}

/// Adaptive roadmap planner
///
/// Stateless across calls: every call builds fresh milestones and nothing is
/// cached, so one planner can serve concurrent callers behind an `Arc`.
#[derive(Debug)]
pub struct DreamPlanner<G = DisabledGenerator> {
    config: PlannerConfig,
    boundary: GenerationBoundary<G>,
}

impl DreamPlanner<DisabledGenerator> {
    /// Planner with no external generator; every roadmap comes from the catalog
    #[must_use]
    pub fn template_only(config: PlannerConfig) -> Self {
        Self::new(config, DisabledGenerator)
    }
}

impl Default for DreamPlanner<DisabledGenerator> {
    fn default() -> Self {
        Self::template_only(PlannerConfig::default())
    }
}

impl<G: TextGenerator> DreamPlanner<G> {
    /// Create planner over a generator
    #[inline]
    #[must_use]
    pub fn new(config: PlannerConfig, generator: G) -> Self {
        Self {
            config,
            boundary: GenerationBoundary::new(generator),
        }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Get generation boundary
    #[inline]
    #[must_use]
    pub fn boundary(&self) -> &GenerationBoundary<G> {
        &self.boundary
    }

    /// Generate a roadmap
    ///
    /// # Workflow
    /// 1. Catalog lookup and constraint adjustment
    /// 2. Optional validate/customize, then pure generation, then fallback
    /// 3. Enrichment, budget allocation, confidence scoring
    ///
    /// Never fails: generator errors degrade the generation method instead.
    #[tracing::instrument(skip(self, context, description, options), fields(goal_type = %goal))]
    pub async fn generate_roadmap(
        &self,
        context: &UserContext,
        goal: &GoalType,
        description: Option<&str>,
        options: Option<GenerationOptions>,
    ) -> RoadmapGenerationResult {
        let options = options.unwrap_or(self.config.default_options);
        tracing::info!(
            has_description = description.is_some(),
            validation = options.use_claude_validation,
            "generating roadmap"
        );

        let selection = self.select_sequence(context, goal, description, options).await;
        let result = self.build_result(context, goal, description, selection.outcome);

        tracing::info!(
            method = %result.method(),
            milestones = result.roadmap.metadata.total_milestones,
            confidence = result.roadmap.metadata.confidence,
            "roadmap generated"
        );
        result
    }

    /// Run the layered strategy and return the winning sequence
    pub async fn select_sequence(
        &self,
        context: &UserContext,
        goal: &GoalType,
        description: Option<&str>,
        options: GenerationOptions,
    ) -> SequenceSelection {
        GenerationRun::new(goal, description, context, options)
            .run(&self.boundary)
            .await
    }

    /// Enrich a winning sequence into the final result
    #[must_use]
    pub fn build_result(
        &self,
        context: &UserContext,
        goal: &GoalType,
        description: Option<&str>,
        outcome: SequenceOutcome,
    ) -> RoadmapGenerationResult {
        let time_constrained = context.is_time_constrained();
        let mut milestones = enrichment::enrich(&outcome.sequence, time_constrained);

        let budget_allocation =
            budget::allocate(&milestones, context.budget_amount(), &self.config.currency);
        budget::apply_estimated_costs(&mut milestones, &budget_allocation);

        let metadata = RoadmapMetadata {
            total_milestones: milestones.len(),
            total_duration: enrichment::total_duration(&outcome.sequence, time_constrained),
            estimated_cost: milestones.iter().map(|m| m.estimated_cost).sum(),
            generation_method: outcome.method,
            validation_insights: outcome.insights,
            confidence: self.config.confidence_model.score(context, &milestones),
        };

        let goal_text = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map_or_else(|| enrichment::title_from_entry(goal.as_str()), str::to_string);

        RoadmapGenerationResult {
            roadmap: Roadmap {
                goal: goal_text,
                milestones,
                metadata,
            },
            budget_allocation,
        }
    }

    /// Polish milestone descriptions through the generator
    ///
    /// Keeps the input text whenever the generator fails or answers short.
    pub async fn refine_milestones(&self, goal: &GoalType, milestones: &[Milestone]) -> Vec<Milestone> {
        self.boundary.refine_milestone_text(goal, milestones).await
    }

    /// Generate a roadmap and hand its milestones to a store
    ///
    /// Storage failures are logged; the result is returned regardless.
    pub async fn generate_and_store<S: RoadmapStore + ?Sized>(
        &self,
        store: &S,
        roadmap_id: &RoadmapId,
        context: &UserContext,
        goal: &GoalType,
        description: Option<&str>,
        options: Option<GenerationOptions>,
    ) -> RoadmapGenerationResult {
        let result = self.generate_roadmap(context, goal, description, options).await;

        if let Err(e) = store
            .save_milestones(roadmap_id, result.roadmap.milestones.clone())
            .await
        {
            tracing::warn!(roadmap_id = %roadmap_id, error = %e, "failed to persist milestones");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::GenerationRequest;
    use crate::error::GenerationError;
    use crate::types::Constraint;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::Sequence;

    mock! {
        Generator {}

        #[async_trait]
        impl TextGenerator for Generator {
            async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError>;
        }
    }

    fn planner_with(generator: MockGenerator) -> DreamPlanner<MockGenerator> {
        DreamPlanner::new(PlannerConfig::default(), generator)
    }

    fn failing() -> MockGenerator {
        let mut generator = MockGenerator::new();
        generator
            .expect_complete()
            .returning(|_| Err(GenerationError::Transport("connection refused".to_string())));
        generator
    }

    #[test]
    fn transition_table() {
        assert!(allowed(StateKind::Template, StateKind::Done));
        assert!(allowed(StateKind::ValidatingCustomizing, StateKind::PureGenerating));
        assert!(!allowed(StateKind::Template, StateKind::Fallback));
        assert!(!allowed(StateKind::Fallback, StateKind::PureGenerating));
        assert!(allowed_transitions(StateKind::Done).is_empty());
    }

    #[tokio::test]
    async fn no_description_stays_on_template() {
        let mut generator = MockGenerator::new();
        generator.expect_complete().never();
        let planner = planner_with(generator);

        let selection = planner
            .select_sequence(&UserContext::new(), &GoalType::Wedding, None, GenerationOptions::new().with_validation())
            .await;

        assert_eq!(selection.outcome.method, GenerationMethod::Template);
        assert_eq!(selection.path, vec![StateKind::Template, StateKind::Done]);
    }

    #[tokio::test]
    async fn blank_description_counts_as_absent() {
        let mut generator = MockGenerator::new();
        generator.expect_complete().never();
        let planner = planner_with(generator);

        let selection = planner
            .select_sequence(&UserContext::new(), &GoalType::Home, Some("   "), GenerationOptions::new().with_validation())
            .await;
        assert_eq!(selection.outcome.method, GenerationMethod::Template);
    }

    #[tokio::test]
    async fn known_goal_without_validation_skips_generator() {
        let mut generator = MockGenerator::new();
        generator.expect_complete().never();
        let planner = planner_with(generator);

        let selection = planner
            .select_sequence(&UserContext::new(), &GoalType::Home, Some("first condo"), GenerationOptions::new())
            .await;
        assert_eq!(selection.outcome.method, GenerationMethod::Template);
    }

    #[tokio::test]
    async fn generation_disabled_skips_generator_for_unknown_goal() {
        let mut generator = MockGenerator::new();
        generator.expect_complete().never();
        let planner = planner_with(generator);

        let goal = GoalType::parse("build_a_boat");
        let selection = planner
            .select_sequence(&UserContext::new(), &goal, Some("wooden sailboat"), GenerationOptions::template_only())
            .await;
        assert_eq!(selection.outcome.method, GenerationMethod::Template);
        assert!(catalog::is_generic(&selection.outcome.sequence));
    }

    #[tokio::test]
    async fn approved_customization_is_template_validated() {
        let mut generator = MockGenerator::new();
        generator.expect_complete().times(1).returning(|_| {
            Ok(r#"{"approved": true, "customizedSequence": ["budget_planning", "venue_booking", "wedding_day_execution"], "insights": "looks right"}"#.to_string())
        });
        let planner = planner_with(generator);

        let selection = planner
            .select_sequence(&UserContext::new(), &GoalType::Wedding, Some("garden wedding"), GenerationOptions::new().with_validation())
            .await;

        assert_eq!(selection.outcome.method, GenerationMethod::TemplateValidated);
        assert_eq!(selection.outcome.insights.as_deref(), Some("looks right"));
        assert_eq!(selection.outcome.sequence.len(), 3);
    }

    #[tokio::test]
    async fn rejected_customization_is_template_customized() {
        let mut generator = MockGenerator::new();
        generator.expect_complete().times(1).returning(|_| {
            Ok(r#"{"approved": false, "customizedSequence": ["elope_research", "courthouse_booking", "celebration_dinner"], "insights": ""}"#.to_string())
        });
        let planner = planner_with(generator);

        let selection = planner
            .select_sequence(&UserContext::new(), &GoalType::Wedding, Some("quick elopement"), GenerationOptions::new().with_validation())
            .await;

        assert_eq!(selection.outcome.method, GenerationMethod::TemplateCustomized);
        assert_eq!(selection.outcome.insights, None);
    }

    #[tokio::test]
    async fn unknown_goal_forces_customization() {
        let mut generator = MockGenerator::new();
        generator.expect_complete().times(1).returning(|_| {
            Ok(r#"{"approved": false, "customizedSequence": ["hull_design", "materials_shopping", "launch_day_execution"], "insights": "boat build"}"#.to_string())
        });
        let planner = planner_with(generator);

        let goal = GoalType::parse("build_a_boat");
        let selection = planner
            .select_sequence(&UserContext::new(), &goal, Some("wooden sailboat"), GenerationOptions::new())
            .await;
        assert_eq!(selection.outcome.method, GenerationMethod::TemplateCustomized);
    }

    #[tokio::test]
    async fn failed_customization_falls_to_pure_generation() {
        let mut seq = Sequence::new();
        let mut generator = MockGenerator::new();
        generator
            .expect_complete()
            .withf(|req| req.kind == crate::boundary::RequestKind::ValidateCustomize)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("not json at all".to_string()));
        generator
            .expect_complete()
            .withf(|req| req.kind == crate::boundary::RequestKind::PureGenerate)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(r#"["savings_plan", "lender_research", "closing_day"]"#.to_string()));
        let planner = planner_with(generator);

        let selection = planner
            .select_sequence(&UserContext::new(), &GoalType::Home, Some("first condo"), GenerationOptions::new().with_validation())
            .await;

        assert_eq!(selection.outcome.method, GenerationMethod::ClaudeGenerated);
        assert_eq!(
            selection.path,
            vec![
                StateKind::Template,
                StateKind::ValidatingCustomizing,
                StateKind::PureGenerating,
                StateKind::Done
            ]
        );
    }

    #[tokio::test]
    async fn too_short_generation_falls_back() {
        let mut generator = MockGenerator::new();
        generator
            .expect_complete()
            .times(2)
            .returning(|req| match req.kind {
                crate::boundary::RequestKind::PureGenerate => Ok(r#"["a"]"#.to_string()),
                _ => Err(GenerationError::Timeout { duration_secs: 30 }),
            });
        let planner = planner_with(generator);

        let context = UserContext::new().with_constraint(Constraint::time());
        let selection = planner
            .select_sequence(&context, &GoalType::Wedding, Some("autumn wedding"), GenerationOptions::new().with_validation())
            .await;

        assert_eq!(selection.outcome.method, GenerationMethod::Fallback);
        assert_eq!(
            selection.outcome.sequence,
            constraints::determine_milestone_sequence(&GoalType::Wedding, &context.constraints)
        );
        assert_eq!(selection.path.last(), Some(&StateKind::Done));
        assert!(selection.path.contains(&StateKind::Fallback));
    }

    #[tokio::test]
    async fn failing_generator_still_produces_roadmap() {
        let planner = planner_with(failing());
        let result = planner
            .generate_roadmap(&UserContext::new(), &GoalType::Vacation, Some("two weeks in Japan"), Some(GenerationOptions::new().with_validation()))
            .await;

        assert_eq!(result.method(), GenerationMethod::Fallback);
        assert!(!result.roadmap.milestones.is_empty());
        assert_eq!(result.roadmap.goal, "two weeks in Japan");
    }

    #[tokio::test]
    async fn result_metadata_is_consistent() {
        let planner = DreamPlanner::template_only(PlannerConfig::new());
        let context = UserContext::new().with_budget(30000.0, 0.9);
        let result = planner
            .generate_roadmap(&context, &GoalType::Wedding, None, None)
            .await;

        let metadata = &result.roadmap.metadata;
        assert_eq!(metadata.total_milestones, result.roadmap.milestones.len());
        assert_eq!(metadata.generation_method, GenerationMethod::Template);
        assert_eq!(result.roadmap.goal, "Wedding");
        assert_eq!(result.budget_allocation.total, 30000.0);
        let allocated: f64 = result.roadmap.milestones.iter().map(|m| m.estimated_cost).sum();
        assert!((metadata.estimated_cost - allocated).abs() < 1e-6);
        assert!(metadata.confidence > 0.0 && metadata.confidence <= 1.0);
    }

    #[tokio::test]
    async fn refine_keeps_text_on_short_answer() {
        let mut generator = MockGenerator::new();
        generator
            .expect_complete()
            .returning(|_| Ok(r#"["Only one description"]"#.to_string()));
        let planner = planner_with(generator);

        let milestones = enrichment::enrich(&catalog::lookup(&GoalType::Baby), false);
        let refined = planner.refine_milestones(&GoalType::Baby, &milestones).await;
        assert_eq!(refined, milestones);
    }

    #[tokio::test]
    async fn refine_applies_full_answer() {
        let mut generator = MockGenerator::new();
        generator
            .expect_complete()
            .returning(|_| Ok(r#"["Pick the city.", "Price the move.", "Line up work."]"#.to_string()));
        let planner = planner_with(generator);

        let sequence: Vec<String> = catalog::lookup(&GoalType::Relocation).into_iter().take(3).collect();
        let milestones = enrichment::enrich(&sequence, false);
        let refined = planner.refine_milestones(&GoalType::Relocation, &milestones).await;

        assert_eq!(refined[1].description, "Price the move.");
        assert_eq!(refined[1].id, milestones[1].id);
        assert_eq!(refined[1].depends_on, milestones[1].depends_on);
    }
}
