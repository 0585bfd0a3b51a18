//! Testing utilities for the Dream Planner workspace
//!
//! Shared generators, fixtures, and roadmap assertions.

#![allow(missing_docs)]

use async_trait::async_trait;
use dream_core::{
    Constraint, DreamPlanner, GenerationError, GenerationRequest, PlannerConfig,
    RoadmapGenerationResult, TextGenerator, UserContext,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Generator replaying queued responses in order
///
/// Records every request; answers with a transport error once the script
/// runs out.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    #[must_use]
    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queue a failure
    #[must_use]
    pub fn then_error(self, error: GenerationError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Transport("script exhausted".to_string())))
    }
}

/// Generator failing every request with the same error
#[derive(Debug, Clone)]
pub struct FailingGenerator {
    error: GenerationError,
}

impl FailingGenerator {
    pub fn new(error: GenerationError) -> Self {
        Self { error }
    }

    pub fn unreachable() -> Self {
        Self::new(GenerationError::Transport("connection refused".to_string()))
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
        Err(self.error.clone())
    }
}

pub fn setup_test_planner<G: TextGenerator>(generator: G) -> DreamPlanner<G> {
    DreamPlanner::new(PlannerConfig::new(), generator)
}

pub fn empty_context() -> UserContext {
    UserContext::new()
}

pub fn full_context() -> UserContext {
    UserContext::new()
        .with_budget(25000.0, 0.9)
        .with_timeline("in 8 months", 0.9)
        .with_location("Lisbon", 0.6)
        .with_preference("style", "rustic", 0.6)
}

pub fn time_constrained_context() -> UserContext {
    UserContext::new().with_constraint(Constraint::time())
}

pub fn budget_constrained_context(amount: f64) -> UserContext {
    UserContext::new()
        .with_budget(amount, 0.9)
        .with_constraint(Constraint::budget())
}

/// Check the structural invariants every roadmap must satisfy
pub fn assert_valid_roadmap(result: &RoadmapGenerationResult) {
    let roadmap = &result.roadmap;
    assert!(!roadmap.milestones.is_empty(), "roadmap has no milestones");
    assert_eq!(roadmap.metadata.total_milestones, roadmap.milestones.len());
    assert!((0.0..=1.0).contains(&roadmap.metadata.confidence));

    for (i, milestone) in roadmap.milestones.iter().enumerate() {
        assert_eq!(milestone.tasks.len(), 3, "milestone {i} task count");
        if i == 0 {
            assert!(milestone.depends_on.is_empty(), "first milestone has dependencies");
        } else {
            assert_eq!(milestone.depends_on.len(), 1, "milestone {i} dependency count");
        }
    }
}
