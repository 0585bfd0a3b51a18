//! Roadmap persistence
//!
//! - [`RoadmapStore`] - async storage seam for generated milestones
//! - [`InMemoryRoadmapStore`] - concurrent map backend
//! - [`toggle_task`] - flip one task's completion flag

use crate::error::StoreError;
use crate::types::{Milestone, MilestoneId, TaskId};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique roadmap identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoadmapId(pub Ulid);

impl RoadmapId {
    /// Generate new roadmap ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RoadmapId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoadmapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "roadmap:{}", self.0)
    }
}

/// Storage for a roadmap's milestones
#[async_trait]
pub trait RoadmapStore: Send + Sync {
    /// Store milestones, replacing any previous set for the roadmap
    async fn save_milestones(
        &self,
        roadmap_id: &RoadmapId,
        milestones: Vec<Milestone>,
    ) -> Result<(), StoreError>;

    /// Load milestones in stored order
    async fn load_milestones(&self, roadmap_id: &RoadmapId) -> Result<Vec<Milestone>, StoreError>;

    /// Replace one milestone, matched by ID
    async fn update_milestone(
        &self,
        roadmap_id: &RoadmapId,
        milestone: Milestone,
    ) -> Result<(), StoreError>;

    /// Remove a roadmap and its milestones
    async fn delete_roadmap(&self, roadmap_id: &RoadmapId) -> Result<(), StoreError>;
}

/// In-process store backed by a concurrent map
#[derive(Debug, Default)]
pub struct InMemoryRoadmapStore {
    roadmaps: DashMap<RoadmapId, Vec<Milestone>>,
}

impl InMemoryRoadmapStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored roadmaps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.roadmaps.len()
    }

    /// Check if no roadmaps are stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roadmaps.is_empty()
    }
}

#[async_trait]
impl RoadmapStore for InMemoryRoadmapStore {
    async fn save_milestones(
        &self,
        roadmap_id: &RoadmapId,
        milestones: Vec<Milestone>,
    ) -> Result<(), StoreError> {
        tracing::debug!(roadmap_id = %roadmap_id, count = milestones.len(), "saving milestones");
        self.roadmaps.insert(*roadmap_id, milestones);
        Ok(())
    }

    async fn load_milestones(&self, roadmap_id: &RoadmapId) -> Result<Vec<Milestone>, StoreError> {
        self.roadmaps
            .get(roadmap_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(roadmap_id.to_string()))
    }

    async fn update_milestone(
        &self,
        roadmap_id: &RoadmapId,
        milestone: Milestone,
    ) -> Result<(), StoreError> {
        let mut entry = self
            .roadmaps
            .get_mut(roadmap_id)
            .ok_or_else(|| StoreError::NotFound(roadmap_id.to_string()))?;

        let slot = entry
            .iter_mut()
            .find(|m| m.id == milestone.id)
            .ok_or_else(|| StoreError::MilestoneNotFound {
                roadmap: roadmap_id.to_string(),
                milestone: milestone.id.to_string(),
            })?;
        *slot = milestone;
        Ok(())
    }

    async fn delete_roadmap(&self, roadmap_id: &RoadmapId) -> Result<(), StoreError> {
        self.roadmaps
            .remove(roadmap_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(roadmap_id.to_string()))
    }
}

/// Flip a task's completion flag and persist the milestone
///
/// Returns the new completion state.
pub async fn toggle_task<S: RoadmapStore + ?Sized>(
    store: &S,
    roadmap_id: &RoadmapId,
    milestone_id: &MilestoneId,
    task_id: &TaskId,
) -> Result<bool, StoreError> {
    let milestones = store.load_milestones(roadmap_id).await?;
    let mut milestone = milestones
        .into_iter()
        .find(|m| m.id == *milestone_id)
        .ok_or_else(|| StoreError::MilestoneNotFound {
            roadmap: roadmap_id.to_string(),
            milestone: milestone_id.to_string(),
        })?;

    let task = milestone
        .tasks
        .iter_mut()
        .find(|t| t.id == *task_id)
        .ok_or_else(|| StoreError::TaskNotFound {
            milestone: milestone_id.to_string(),
            task: task_id.to_string(),
        })?;
    task.completed = !task.completed;
    let completed = task.completed;

    store.update_milestone(roadmap_id, milestone).await?;
    tracing::debug!(roadmap_id = %roadmap_id, task_id = %task_id, completed, "task toggled");
    Ok(completed)
}
