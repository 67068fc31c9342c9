//! What to learn next.
//!
//! Both skill lists sort by importance (core, then important, then useful)
//! with a stable sort over the graph's canonical order, so equally important
//! skills keep the order the roadmap introduces them in.

use careerpath_roadmap::{Milestone, RoadmapModel};
use serde::Serialize;

use crate::availability::{AvailabilityResolver, CompletedSet, UnmetPrerequisites};
use crate::config::EngineOptions;
use crate::graph::{SkillGraph, SkillNode};
use crate::progress::ProgressAggregator;

/// Default length of each recommendation list.
pub const DEFAULT_LIMIT: usize = 5;

/// A locked skill together with what keeps it locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedSkill<'a> {
    pub skill: &'a SkillNode,
    pub unmet: UnmetPrerequisites,
}

/// Ranks skills and milestones for display.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationEngine {
    limit: usize,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

impl RecommendationEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine using the configured list length.
    #[must_use]
    pub fn from_options(options: &EngineOptions) -> Self {
        Self::new().with_limit(options.recommendation_limit)
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Available skills not learned yet, most important first.
    #[must_use]
    pub fn next_learnable_skills<'a>(&self, graph: &'a SkillGraph) -> Vec<&'a SkillNode> {
        ranked(graph, |n| n.is_available && !n.is_learned, self.limit)
    }

    /// Skills whose prerequisites are not met, most important first.
    #[must_use]
    pub fn locked_skills<'a>(&self, graph: &'a SkillGraph) -> Vec<&'a SkillNode> {
        ranked(graph, |n| !n.is_available, self.limit)
    }

    /// [`Self::locked_skills`] with the prerequisites each one is waiting on.
    #[must_use]
    pub fn explain_locked<'a>(&self, graph: &'a SkillGraph) -> Vec<LockedSkill<'a>> {
        self.locked_skills(graph)
            .into_iter()
            .map(|skill| LockedSkill {
                skill,
                unmet: AvailabilityResolver.unmet_prerequisites(graph, skill),
            })
            .collect()
    }

    /// Pending milestones of the current phase, high priority first.
    ///
    /// Ties keep declared order.
    #[must_use]
    pub fn upcoming_milestones<'a>(
        &self,
        model: &'a RoadmapModel,
        completed: &CompletedSet,
    ) -> Vec<&'a Milestone> {
        let Some(current) = ProgressAggregator::new(model, completed).current_phase_index() else {
            return Vec::new();
        };
        let mut pending: Vec<&Milestone> = model.list_phases()[current]
            .milestones
            .iter()
            .filter(|m| !completed.contains(&m.id))
            .collect();
        pending.sort_by_key(|m| m.priority.rank());
        pending.truncate(self.limit);
        pending
    }
}

/// `nextLearnableSkills(skillMap, limit)`.
#[must_use]
pub fn next_learnable_skills(graph: &SkillGraph, limit: usize) -> Vec<&SkillNode> {
    RecommendationEngine::new()
        .with_limit(limit)
        .next_learnable_skills(graph)
}

/// `lockedSkills(skillMap, limit)`.
#[must_use]
pub fn locked_skills(graph: &SkillGraph, limit: usize) -> Vec<&SkillNode> {
    RecommendationEngine::new()
        .with_limit(limit)
        .locked_skills(graph)
}

fn ranked<F>(graph: &SkillGraph, keep: F, limit: usize) -> Vec<&SkillNode>
where
    F: Fn(&SkillNode) -> bool,
{
    let mut nodes: Vec<&SkillNode> = graph.iter().filter(|n| keep(n)).collect();
    // stable: equal ranks stay in canonical order
    nodes.sort_by_key(|n| n.importance.rank());
    nodes.truncate(limit);
    nodes
}
