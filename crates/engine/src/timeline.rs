//! Declared schedule of a roadmap.
//!
//! Windows come only from each phase's `duration_months`, laid end to end from
//! a start date. Actual completion never moves them; comparing plan against
//! progress is left to [`plan_comparison`].

use careerpath_roadmap::RoadmapModel;
use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::availability::CompletedSet;
use crate::progress::ProgressAggregator;

/// Planned window of one phase. `end` is exclusive and equals the next phase's `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseWindow {
    pub phase_id: String,
    pub order: u32,
    pub title: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub duration_months: u32,
}

impl PhaseWindow {
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Planned phase vs. the phase the learner is actually working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanComparison {
    /// Phase the schedule says should be active on the given date, if any.
    pub planned_phase_index: Option<usize>,
    pub current_phase_index: Option<usize>,
    /// How many phases the learner trails the plan by; negative when ahead.
    pub phases_behind: i64,
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Walks phases in order, accumulating `duration_months` from `start`.
///
/// Every boundary is `start` plus the running month total, so a clamp to a
/// short month end never carries into later phases.
#[must_use]
pub fn timeline_projection(model: &RoadmapModel, start: NaiveDate) -> Vec<PhaseWindow> {
    let mut cursor = start;
    let mut elapsed_months = 0u32;
    model
        .list_phases()
        .iter()
        .map(|phase| {
            elapsed_months = elapsed_months.saturating_add(phase.duration_months);
            let end = add_months(start, elapsed_months);
            let window = PhaseWindow {
                phase_id: phase.id.clone(),
                order: phase.order,
                title: phase.title.clone(),
                start: cursor,
                end,
                duration_months: phase.duration_months,
            };
            cursor = end;
            window
        })
        .collect()
}

/// Planned end of the whole roadmap; `start` itself when there are no phases.
#[must_use]
pub fn projected_end(model: &RoadmapModel, start: NaiveDate) -> NaiveDate {
    timeline_projection(model, start)
        .last()
        .map_or(start, |w| w.end)
}

/// Compares the declared schedule on `today` against actual progress.
///
/// Dates past the last window count as planned in the last phase; dates
/// before `start` have no planned phase.
#[must_use]
pub fn plan_comparison(
    model: &RoadmapModel,
    completed: &CompletedSet,
    start: NaiveDate,
    today: NaiveDate,
) -> PlanComparison {
    let windows = timeline_projection(model, start);
    let planned_phase_index = if today < start {
        None
    } else {
        windows
            .iter()
            .position(|w| w.contains(today))
            .or_else(|| windows.len().checked_sub(1))
    };
    let current_phase_index = ProgressAggregator::new(model, completed).current_phase_index();

    let phases_behind = match (planned_phase_index, current_phase_index) {
        (Some(planned), Some(current)) => planned as i64 - current as i64,
        _ => 0,
    };

    PlanComparison {
        planned_phase_index,
        current_phase_index,
        phases_behind,
    }
}
