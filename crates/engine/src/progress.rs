//! Phase and overall progress.
//!
//! Overall progress is the unweighted mean of per-phase progress: a phase with
//! two milestones counts as much as a phase with twenty. Phases without
//! milestones report 0.

use careerpath_roadmap::{Phase, RoadmapModel};
use serde::Serialize;

use crate::availability::CompletedSet;

/// Where a phase stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Progress of one phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgress {
    pub phase_id: String,
    pub order: u32,
    pub title: String,
    pub completed: usize,
    pub total: usize,
    /// `completed / total`, or 0 for an empty phase.
    pub ratio: f64,
    pub status: PhaseStatus,
}

/// Everything the progress dashboard shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub phases: Vec<PhaseProgress>,
    pub overall: f64,
    /// `None` only for a roadmap without phases.
    pub current_phase_index: Option<usize>,
    pub remaining_months: u32,
    pub completed_milestones: usize,
    pub total_milestones: usize,
    pub completed_hours: u64,
    pub total_hours: u64,
}

/// Progress queries over one `{roadmap, completed set}` snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ProgressAggregator<'a> {
    model: &'a RoadmapModel,
    completed: &'a CompletedSet,
}

impl<'a> ProgressAggregator<'a> {
    #[must_use]
    pub fn new(model: &'a RoadmapModel, completed: &'a CompletedSet) -> Self {
        Self { model, completed }
    }

    fn completed_in(&self, phase: &Phase) -> usize {
        phase
            .milestones
            .iter()
            .filter(|m| self.completed.contains(&m.id))
            .count()
    }

    /// Fraction of the phase's milestones that are completed.
    #[must_use]
    pub fn phase_progress(&self, phase: &Phase) -> f64 {
        let total = phase.milestones.len();
        if total == 0 {
            return 0.0;
        }
        self.completed_in(phase) as f64 / total as f64
    }

    /// Progress of every phase, in order.
    #[must_use]
    pub fn phase_progresses(&self) -> Vec<f64> {
        self.model
            .list_phases()
            .iter()
            .map(|p| self.phase_progress(p))
            .collect()
    }

    /// Unweighted mean of [`Self::phase_progress`] over all phases.
    #[must_use]
    pub fn overall_progress(&self) -> f64 {
        let phases = self.model.list_phases();
        if phases.is_empty() {
            return 0.0;
        }
        let sum: f64 = phases.iter().map(|p| self.phase_progress(p)).sum();
        sum / phases.len() as f64
    }

    /// Index of the first phase not fully complete; the last phase once all are.
    #[must_use]
    pub fn current_phase_index(&self) -> Option<usize> {
        let phases = self.model.list_phases();
        phases
            .iter()
            .position(|p| self.phase_progress(p) < 1.0)
            .or_else(|| phases.len().checked_sub(1))
    }

    /// `ceil(estimated_duration_months * (1 - overall_progress))`.
    ///
    /// A coarse estimate, separate from the dated timeline projection.
    #[must_use]
    pub fn remaining_months(&self) -> u32 {
        let remaining =
            f64::from(self.model.estimated_duration_months()) * (1.0 - self.overall_progress());
        // Absorb float noise such as 3 * (1 - 2/3) = 1.0000000000000002.
        let months = (remaining - 1e-9).ceil().max(0.0);
        months as u32
    }

    /// Full progress breakdown.
    #[must_use]
    pub fn report(&self) -> ProgressReport {
        let mut completed_milestones = 0;
        let mut completed_hours = 0u64;
        let mut total_hours = 0u64;

        let phases: Vec<PhaseProgress> = self
            .model
            .list_phases()
            .iter()
            .map(|phase| {
                let completed = self.completed_in(phase);
                let total = phase.milestones.len();
                completed_milestones += completed;
                for milestone in &phase.milestones {
                    let hours = u64::from(milestone.estimated_hours);
                    total_hours += hours;
                    if self.completed.contains(&milestone.id) {
                        completed_hours += hours;
                    }
                }

                let status = match completed {
                    0 => PhaseStatus::NotStarted,
                    c if c == total => PhaseStatus::Completed,
                    _ => PhaseStatus::InProgress,
                };
                PhaseProgress {
                    phase_id: phase.id.clone(),
                    order: phase.order,
                    title: phase.title.clone(),
                    completed,
                    total,
                    ratio: self.phase_progress(phase),
                    status,
                }
            })
            .collect();

        ProgressReport {
            phases,
            overall: self.overall_progress(),
            current_phase_index: self.current_phase_index(),
            remaining_months: self.remaining_months(),
            completed_milestones,
            total_milestones: self.model.milestone_count(),
            completed_hours,
            total_hours,
        }
    }
}
