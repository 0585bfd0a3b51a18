//! Dream Core - adaptive roadmap generation
//!
//! Turns a partially known personal goal into an ordered, enriched roadmap:
//! - Looks up a curated milestone sequence per goal type
//! - Reshapes it for time and budget constraints
//! - Optionally validates, customizes or replaces it through a text generator
//! - Enriches entries into milestones with tasks, durations and dependencies
//! - Allocates the stated budget and scores confidence
//!
//! # Example
//!
//! ```rust,ignore
//! use dream_core::{DreamPlanner, GoalType, PlannerConfig, UserContext};
//!
//! # async fn example() {
//! let planner = DreamPlanner::template_only(PlannerConfig::new());
//! let context = UserContext::new().with_budget(25000.0, 0.9);
//!
//! let result = planner
//!     .generate_roadmap(&context, &GoalType::Wedding, None, None)
//!     .await;
//!
//! println!("{} milestones", result.roadmap.metadata.total_milestones);
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Pipeline stages
pub mod boundary;
pub mod budget;
pub mod catalog;
pub mod confidence;
pub mod constraints;
pub mod enrichment;
pub mod orchestrator;

// Supporting modules
pub mod config;
pub mod discovery;
pub mod error;
pub mod store;
pub mod telemetry;
pub mod types;

// Re-exports for convenience
pub use boundary::{
    Customization, DisabledGenerator, GenerationBoundary, GenerationRequest, RequestKind,
    TextGenerator,
};
pub use confidence::ConfidenceModel;
pub use config::{GenerationConfig, LoggingConfig, PlannerConfig};
pub use constraints::determine_milestone_sequence;
pub use discovery::{discover, DiscoveredGoal};
pub use error::{ConfigError, GenerationError, StoreError};
pub use orchestrator::{DreamPlanner, GenerationState, SequenceSelection, StateKind};
pub use store::{toggle_task, InMemoryRoadmapStore, RoadmapId, RoadmapStore};
pub use types::{
    Assignee, BudgetAllocation, Constraint, ConstraintKind, GenerationMethod, GenerationOptions,
    GoalType, Milestone, MilestoneAllocation, MilestoneId, Roadmap, RoadmapGenerationResult,
    RoadmapMetadata, SequenceEntry, Task, TaskId, UserContext,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Dream Core
    pub use crate::{
        Constraint, DreamPlanner, GenerationMethod, GenerationOptions, GoalType, PlannerConfig,
        RoadmapGenerationResult, TextGenerator, UserContext,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
