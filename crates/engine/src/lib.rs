//! Roadmap progression and skill-dependency engine.
//!
//! Every output here is a derived view over a validated roadmap and the set of
//! completed milestones:
//! - [`graph`]: skill map with level, category, importance, prerequisites, hours
//! - [`availability`]: which skills are learned and which are unlocked
//! - [`progress`] / [`timeline`]: phase and overall progress, planned schedule
//! - [`recommend`]: what to learn next, what is still locked
//! - [`completion`]: the single mutation, `Pending -> Completed`
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use careerpath_engine::{ClassificationTables, RoadmapTracker};
//! use careerpath_roadmap::RoadmapModel;
//!
//! let model = RoadmapModel::from_json(r#"{
//!     "id": "rm-1",
//!     "targetRole": "Web Developer",
//!     "phases": [{ "id": "p0", "order": 0, "milestones": [
//!         { "id": "m1", "skills": ["JavaScript"], "estimatedHours": 40 },
//!         { "id": "m2", "skills": ["React"], "estimatedHours": 30 }
//!     ] }]
//! }"#).expect("valid roadmap");
//!
//! let mut tracker = RoadmapTracker::new(model, Arc::new(ClassificationTables::default()));
//! assert!(!tracker.snapshot().skill_map().get("React").unwrap().is_available);
//!
//! tracker.complete_milestone("m1", None).expect("first completion");
//! let snapshot = tracker.snapshot();
//! assert!(snapshot.skill_map().get("React").unwrap().is_available);
//! assert_eq!(snapshot.overall_progress(), 0.5);
//! ```

#![deny(unsafe_code)]

pub mod availability;
pub mod classify;
pub mod completion;
pub mod config;
pub mod graph;
pub mod progress;
pub mod recommend;
pub mod snapshot;
pub mod timeline;

pub use availability::{resolve_availability, AvailabilityResolver, CompletedSet, UnmetPrerequisites};
pub use classify::{
    CategoryRule, Classification, ClassificationTables, Importance, ImportanceRule,
    PrerequisiteRule, DEFAULT_CATEGORY,
};
pub use completion::{CompletionError, CompletionRecord, RoadmapTracker, SharedTracker};
pub use config::{
    classification_tables_or_default, load_classification_from, load_classification_tables,
    EngineOptions,
};
pub use graph::{build_skill_graph, SkillGraph, SkillGraphBuilder, SkillNode, SkillSummary};
pub use progress::{PhaseProgress, PhaseStatus, ProgressAggregator, ProgressReport};
pub use recommend::{
    locked_skills, next_learnable_skills, LockedSkill, RecommendationEngine, DEFAULT_LIMIT,
};
pub use snapshot::EngineSnapshot;
pub use timeline::{plan_comparison, projected_end, timeline_projection, PhaseWindow, PlanComparison};

use careerpath_roadmap::{RoadmapModel, ValidationError};
use std::sync::Arc;

/// Any error the engine surfaces to its caller.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl RoadmapTracker {
    /// Validate a generator payload and start tracking it.
    pub fn from_json(json: &str, tables: Arc<ClassificationTables>) -> Result<Self, Error> {
        Ok(Self::new(RoadmapModel::from_json(json)?, tables))
    }
}
