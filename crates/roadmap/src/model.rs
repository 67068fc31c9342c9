//! Validated, read-only roadmap aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use crate::document::RoadmapDocument;
use crate::validation::{self, ValidationError};

/// Overall difficulty the roadmap was generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

/// Kind of work a milestone represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneType {
    #[default]
    Skill,
    Project,
    Certification,
    Experience,
    Networking,
}

/// Milestone priority as declared by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort rank; lower ranks come first.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Learning resource attached to a milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Learner settings the roadmap was personalized with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Personalization {
    pub learning_style: Option<String>,
    pub weekly_hours: Option<u32>,
}

/// Completion state of a milestone.
///
/// `Pending -> Completed` is the only transition; `Completed` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum MilestoneStatus {
    #[default]
    Pending,
    #[serde(rename_all = "camelCase")]
    Completed {
        /// Missing for milestones that arrived already completed without a timestamp.
        completed_at: Option<DateTime<Utc>>,
        notes: Option<String>,
    },
}

/// Why a milestone transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("milestone '{0}' does not exist in this roadmap")]
    UnknownMilestone(String),

    #[error("milestone '{id}' is already completed")]
    AlreadyCompleted {
        id: String,
        completed_at: Option<DateTime<Utc>>,
    },
}

/// Actionable unit of work within a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub phase_id: String,
    #[serde(rename = "type")]
    pub milestone_type: MilestoneType,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub estimated_hours: u32,
    /// Skill names in declared order, trimmed and without duplicates.
    pub skills: Vec<String>,
    pub resources: Vec<Resource>,
    pub success_criteria: Vec<String>,
    #[serde(flatten)]
    pub(crate) status: MilestoneStatus,
}

impl Milestone {
    #[must_use]
    pub fn status(&self) -> &MilestoneStatus {
        &self.status
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self.status, MilestoneStatus::Completed { .. })
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match &self.status {
            MilestoneStatus::Completed { completed_at, .. } => *completed_at,
            MilestoneStatus::Pending => None,
        }
    }

    #[must_use]
    pub fn completion_notes(&self) -> Option<&str> {
        match &self.status {
            MilestoneStatus::Completed { notes, .. } => notes.as_deref(),
            MilestoneStatus::Pending => None,
        }
    }
}

/// Ordered stage of a roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    /// Position in the roadmap; equal to the phase's index in [`RoadmapModel::list_phases`].
    pub order: u32,
    pub title: String,
    pub description: String,
    pub duration_months: u32,
    pub milestones: Vec<Milestone>,
}

impl Phase {
    /// Number of completed milestones in this phase.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.milestones.iter().filter(|m| m.is_completed()).count()
    }
}

/// Validated roadmap.
///
/// Phases are stored in ascending `order`, and every milestone id is unique.
/// The structure never changes after construction; only milestone completion
/// state moves, through [`RoadmapModel::complete_milestone`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapModel {
    pub(crate) id: String,
    pub(crate) target_role: String,
    pub(crate) difficulty: Difficulty,
    pub(crate) estimated_duration_months: u32,
    pub(crate) personalization: Personalization,
    pub(crate) phases: Vec<Phase>,
    /// milestone id -> (phase index, milestone index)
    #[serde(skip)]
    pub(crate) milestone_index: HashMap<String, (usize, usize)>,
}

impl RoadmapModel {
    /// Validate a decoded document.
    pub fn from_document(document: RoadmapDocument) -> Result<Self, ValidationError> {
        validation::validate(document)
    }

    /// Decode and validate a JSON payload.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let document: RoadmapDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Decode and validate an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        let document: RoadmapDocument = serde_json::from_value(value)?;
        Self::from_document(document)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn target_role(&self) -> &str {
        &self.target_role
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn estimated_duration_months(&self) -> u32 {
        self.estimated_duration_months
    }

    #[must_use]
    pub fn personalization(&self) -> &Personalization {
        &self.personalization
    }

    /// Phases in ascending order.
    #[must_use]
    pub fn list_phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Phase at the given order, if any.
    #[must_use]
    pub fn phase(&self, order: u32) -> Option<&Phase> {
        self.phases.get(order as usize)
    }

    #[must_use]
    pub fn find_milestone(&self, id: &str) -> Option<&Milestone> {
        self.milestone_index
            .get(id)
            .map(|&(p, m)| &self.phases[p].milestones[m])
    }

    /// All milestones in canonical order: phases ascending, then declared order.
    pub fn milestones(&self) -> impl Iterator<Item = &Milestone> {
        self.phases.iter().flat_map(|p| p.milestones.iter())
    }

    #[must_use]
    pub fn milestone_count(&self) -> usize {
        self.milestone_index.len()
    }

    /// Every distinct skill name, in first-sighting canonical order.
    #[must_use]
    pub fn total_skill_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.milestones()
            .flat_map(|m| m.skills.iter())
            .filter(|s| seen.insert(s.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Ids of every milestone currently completed.
    #[must_use]
    pub fn completed_milestone_ids(&self) -> BTreeSet<String> {
        self.milestones()
            .filter(|m| m.is_completed())
            .map(|m| m.id.clone())
            .collect()
    }

    /// Move a milestone from `Pending` to `Completed`.
    ///
    /// This is the model-level primitive; callers that need the full
    /// completion protocol (records, change signal) go through the engine's
    /// tracker instead.
    pub fn complete_milestone(
        &mut self,
        id: &str,
        completed_at: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<&Milestone, TransitionError> {
        let &(p, m) = self
            .milestone_index
            .get(id)
            .ok_or_else(|| TransitionError::UnknownMilestone(id.to_string()))?;
        let milestone = &mut self.phases[p].milestones[m];

        if let MilestoneStatus::Completed { completed_at, .. } = &milestone.status {
            return Err(TransitionError::AlreadyCompleted {
                id: id.to_string(),
                completed_at: *completed_at,
            });
        }

        milestone.status = MilestoneStatus::Completed {
            completed_at: Some(completed_at),
            notes,
        };
        Ok(milestone)
    }
}
