//! Read-only view over one roadmap state.
//!
//! A snapshot pins `{roadmap, completed set, classification tables}` and
//! resolves the skill graph once. Every query on it is pure; to observe a
//! later completion, take a new snapshot.

use careerpath_roadmap::{Milestone, RoadmapModel};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::availability::{resolve_availability, CompletedSet};
use crate::classify::ClassificationTables;
use crate::config::EngineOptions;
use crate::graph::{build_skill_graph, SkillGraph, SkillNode, SkillSummary};
use crate::progress::{ProgressAggregator, ProgressReport};
use crate::recommend::{LockedSkill, RecommendationEngine};
use crate::timeline::{self, PhaseWindow, PlanComparison};

#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    model: Arc<RoadmapModel>,
    tables: Arc<ClassificationTables>,
    completed: CompletedSet,
    skills: SkillGraph,
    options: EngineOptions,
}

impl EngineSnapshot {
    /// Snapshot of the completion state recorded in `model`.
    #[must_use]
    pub fn new(model: Arc<RoadmapModel>, tables: Arc<ClassificationTables>) -> Self {
        let completed = model.completed_milestone_ids();
        Self::with_completed(model, tables, completed)
    }

    /// Snapshot against an explicit completed set, e.g. for what-if views.
    #[must_use]
    pub fn with_completed(
        model: Arc<RoadmapModel>,
        tables: Arc<ClassificationTables>,
        completed: CompletedSet,
    ) -> Self {
        let skills = resolve_availability(&build_skill_graph(&model, &tables), &completed);
        Self {
            model,
            tables,
            completed,
            skills,
            options: EngineOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Recommendation engine limited to the configured list length.
    #[must_use]
    pub fn recommender(&self) -> RecommendationEngine {
        RecommendationEngine::from_options(&self.options)
    }

    #[must_use]
    pub fn model(&self) -> &RoadmapModel {
        &self.model
    }

    #[must_use]
    pub fn tables(&self) -> &ClassificationTables {
        &self.tables
    }

    #[must_use]
    pub fn completed(&self) -> &CompletedSet {
        &self.completed
    }

    #[must_use]
    pub fn skill_map(&self) -> &SkillGraph {
        &self.skills
    }

    #[must_use]
    pub fn skill_summary(&self) -> SkillSummary {
        self.skills.summary()
    }

    fn progress(&self) -> ProgressAggregator<'_> {
        ProgressAggregator::new(&self.model, &self.completed)
    }

    /// Progress of the phase with the given order.
    #[must_use]
    pub fn phase_progress(&self, order: u32) -> Option<f64> {
        self.model
            .phase(order)
            .map(|phase| self.progress().phase_progress(phase))
    }

    #[must_use]
    pub fn phase_progresses(&self) -> Vec<f64> {
        self.progress().phase_progresses()
    }

    #[must_use]
    pub fn overall_progress(&self) -> f64 {
        self.progress().overall_progress()
    }

    #[must_use]
    pub fn current_phase_index(&self) -> Option<usize> {
        self.progress().current_phase_index()
    }

    #[must_use]
    pub fn remaining_months(&self) -> u32 {
        self.progress().remaining_months()
    }

    #[must_use]
    pub fn progress_report(&self) -> ProgressReport {
        self.progress().report()
    }

    #[must_use]
    pub fn timeline_projection(&self, start: NaiveDate) -> Vec<PhaseWindow> {
        timeline::timeline_projection(&self.model, start)
    }

    #[must_use]
    pub fn plan_comparison(&self, start: NaiveDate, today: NaiveDate) -> PlanComparison {
        timeline::plan_comparison(&self.model, &self.completed, start, today)
    }

    #[must_use]
    pub fn next_learnable_skills(&self, limit: usize) -> Vec<&SkillNode> {
        RecommendationEngine::new()
            .with_limit(limit)
            .next_learnable_skills(&self.skills)
    }

    #[must_use]
    pub fn locked_skills(&self, limit: usize) -> Vec<&SkillNode> {
        RecommendationEngine::new()
            .with_limit(limit)
            .locked_skills(&self.skills)
    }

    #[must_use]
    pub fn explain_locked(&self, limit: usize) -> Vec<LockedSkill<'_>> {
        RecommendationEngine::new()
            .with_limit(limit)
            .explain_locked(&self.skills)
    }

    #[must_use]
    pub fn upcoming_milestones(&self, limit: usize) -> Vec<&Milestone> {
        RecommendationEngine::new()
            .with_limit(limit)
            .upcoming_milestones(&self.model, &self.completed)
    }
}
