//! Validated roadmap model for the career-learning engine.
//!
//! A roadmap arrives as an untyped JSON document from an external generator.
//! This crate decodes it ([`RoadmapDocument`]), rejects malformed structure
//! ([`ValidationError`]), and produces the read-only [`RoadmapModel`] every
//! downstream view is derived from.
//!
//! # Example
//!
//! ```rust
//! use careerpath_roadmap::RoadmapModel;
//!
//! let model = RoadmapModel::from_json(r#"{
//!     "id": "rm-1",
//!     "targetRole": "Data Analyst",
//!     "phases": [
//!         { "id": "p0", "order": 0, "milestones": [
//!             { "id": "m1", "type": "skill", "skills": ["SQL", "Excel"] }
//!         ] }
//!     ]
//! }"#).expect("valid roadmap");
//!
//! assert_eq!(model.total_skill_names(), vec!["SQL", "Excel"]);
//! ```

#![deny(unsafe_code)]

pub mod document;
pub mod model;
pub mod validation;

pub use document::{MilestoneDocument, PhaseDocument, ResourceDocument, RoadmapDocument};
pub use model::{
    Difficulty, Milestone, MilestoneStatus, MilestoneType, Personalization, Phase, Priority,
    Resource, RoadmapModel, TransitionError,
};
pub use validation::ValidationError;

impl TryFrom<RoadmapDocument> for RoadmapModel {
    type Error = ValidationError;

    fn try_from(document: RoadmapDocument) -> Result<Self, Self::Error> {
        Self::from_document(document)
    }
}
