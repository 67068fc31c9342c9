//! Wire shape of a roadmap as produced by the external generator.
//!
//! Everything here is permissive: optional fields default, unknown fields are
//! ignored. Nothing in this module is trusted; [`crate::RoadmapModel`] is the
//! only type the engine consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, MilestoneType, Priority};

/// Raw roadmap payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapDocument {
    pub id: String,
    pub target_role: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub estimated_duration_months: u32,
    #[serde(default)]
    pub phases: Vec<PhaseDocument>,
    #[serde(default)]
    pub personalization: PersonalizationDocument,
}

/// Learner settings captured when the roadmap was generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizationDocument {
    #[serde(default)]
    pub learning_style: Option<String>,
    /// Hours per week the learner committed to.
    #[serde(default)]
    pub weekly_hours: Option<u32>,
}

/// Raw phase payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseDocument {
    pub id: String,
    pub order: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration_months: u32,
    #[serde(default)]
    pub milestones: Vec<MilestoneDocument>,
}

/// Raw milestone payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneDocument {
    pub id: String,
    /// Back-reference to the owning phase. Defaults to the containing phase.
    #[serde(default)]
    pub phase_id: Option<String>,
    #[serde(rename = "type", default)]
    pub milestone_type: MilestoneType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub estimated_hours: u32,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub resources: Vec<ResourceDocument>,
    #[serde(default)]
    pub success_criteria: Vec<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completion_notes: Option<String>,
}

/// Generators emit resources either as bare titles or as objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceDocument {
    Title(String),
    Detailed {
        title: String,
        #[serde(default)]
        url: Option<String>,
        #[serde(rename = "type", default)]
        kind: Option<String>,
    },
}
