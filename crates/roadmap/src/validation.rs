//! Structural validation at the ingestion boundary.

use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

use crate::document::{MilestoneDocument, PhaseDocument, ResourceDocument, RoadmapDocument};
use crate::model::{Milestone, MilestoneStatus, Personalization, Phase, Resource, RoadmapModel};

/// Reasons a roadmap payload is rejected.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The payload could not be decoded into the roadmap shape.
    #[error("malformed roadmap payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("phase order {order} is used by more than one phase")]
    DuplicatePhaseOrder { order: u32 },

    /// Orders must run 0..N-1 without gaps.
    #[error("phase orders are not contiguous: expected {expected}, found {found}")]
    NonContiguousPhaseOrder { expected: u32, found: u32 },

    #[error("phase id '{0}' is used by more than one phase")]
    DuplicatePhaseId(String),

    #[error("milestone id '{0}' is used by more than one milestone")]
    DuplicateMilestoneId(String),

    #[error("milestone '{milestone_id}' references unknown phase '{phase_id}'")]
    UnknownPhase {
        milestone_id: String,
        phase_id: String,
    },

    /// The back-reference names a real phase, just not the one holding the milestone.
    #[error("milestone '{milestone_id}' claims phase '{phase_id}' but is listed under '{container}'")]
    PhaseMismatch {
        milestone_id: String,
        phase_id: String,
        container: String,
    },
}

/// Validate a document and convert it into a [`RoadmapModel`].
pub(crate) fn validate(document: RoadmapDocument) -> Result<RoadmapModel, ValidationError> {
    let mut phases = document.phases;
    check_phase_orders(&phases)?;
    phases.sort_by_key(|p| p.order);

    let mut phase_ids = HashSet::new();
    for phase in &phases {
        if !phase_ids.insert(phase.id.as_str()) {
            return Err(ValidationError::DuplicatePhaseId(phase.id.clone()));
        }
    }
    for phase in &phases {
        for milestone in &phase.milestones {
            if let Some(phase_id) = &milestone.phase_id {
                if !phase_ids.contains(phase_id.as_str()) {
                    return Err(ValidationError::UnknownPhase {
                        milestone_id: milestone.id.clone(),
                        phase_id: phase_id.clone(),
                    });
                }
                if phase_id != &phase.id {
                    return Err(ValidationError::PhaseMismatch {
                        milestone_id: milestone.id.clone(),
                        phase_id: phase_id.clone(),
                        container: phase.id.clone(),
                    });
                }
            }
        }
    }

    let mut milestone_index = HashMap::new();
    let mut converted = Vec::with_capacity(phases.len());
    for (p, phase) in phases.into_iter().enumerate() {
        for (m, milestone) in phase.milestones.iter().enumerate() {
            if milestone_index.insert(milestone.id.clone(), (p, m)).is_some() {
                return Err(ValidationError::DuplicateMilestoneId(milestone.id.clone()));
            }
        }
        converted.push(convert_phase(phase));
    }

    debug!(
        roadmap_id = %document.id,
        phases = converted.len(),
        milestones = milestone_index.len(),
        "validated roadmap"
    );

    Ok(RoadmapModel {
        id: document.id,
        target_role: document.target_role,
        difficulty: document.difficulty,
        estimated_duration_months: document.estimated_duration_months,
        personalization: Personalization {
            learning_style: document.personalization.learning_style,
            weekly_hours: document.personalization.weekly_hours,
        },
        phases: converted,
        milestone_index,
    })
}

fn check_phase_orders(phases: &[PhaseDocument]) -> Result<(), ValidationError> {
    let mut orders: Vec<u32> = phases.iter().map(|p| p.order).collect();
    orders.sort_unstable();

    for pair in orders.windows(2) {
        if pair[0] == pair[1] {
            return Err(ValidationError::DuplicatePhaseOrder { order: pair[0] });
        }
    }
    for (expected, &found) in (0u32..).zip(&orders) {
        if expected != found {
            return Err(ValidationError::NonContiguousPhaseOrder { expected, found });
        }
    }
    Ok(())
}

fn convert_phase(phase: PhaseDocument) -> Phase {
    let phase_id = phase.id;
    let milestones = phase
        .milestones
        .into_iter()
        .map(|m| convert_milestone(m, &phase_id))
        .collect();

    Phase {
        id: phase_id,
        order: phase.order,
        title: phase.title,
        description: phase.description,
        duration_months: phase.duration_months,
        milestones,
    }
}

fn convert_milestone(milestone: MilestoneDocument, phase_id: &str) -> Milestone {
    let status = if milestone.is_completed {
        MilestoneStatus::Completed {
            completed_at: milestone.completed_at,
            notes: milestone.completion_notes,
        }
    } else {
        if milestone.completed_at.is_some() {
            debug!(milestone_id = %milestone.id, "ignoring completedAt on pending milestone");
        }
        MilestoneStatus::Pending
    };

    Milestone {
        phase_id: phase_id.to_string(),
        milestone_type: milestone.milestone_type,
        title: milestone.title,
        description: milestone.description,
        priority: milestone.priority,
        estimated_hours: milestone.estimated_hours,
        skills: normalize_skills(milestone.skills),
        resources: milestone.resources.into_iter().map(convert_resource).collect(),
        success_criteria: milestone.success_criteria,
        status,
        id: milestone.id,
    }
}

/// Trim names, drop blanks, keep the first occurrence of each name.
fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

fn convert_resource(resource: ResourceDocument) -> Resource {
    match resource {
        ResourceDocument::Title(title) => Resource {
            title,
            url: None,
            kind: None,
        },
        ResourceDocument::Detailed { title, url, kind } => Resource { title, url, kind },
    }
}
