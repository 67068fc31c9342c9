//! Learned / available state for each skill.
//!
//! - A skill is learned when any one of its related milestones is completed.
//!   One completion is enough, even for skills touched by several milestones.
//! - A skill is available when it has no prerequisites, or every prerequisite
//!   names a skill in this graph that is learned. A prerequisite missing from
//!   the graph can never be satisfied, so its dependents stay locked for good.
//!
//! Both flags only depend on the completed set, which only grows, so a skill
//! that became available never becomes unavailable again.

use std::collections::BTreeSet;
use tracing::debug;

use crate::graph::{SkillGraph, SkillNode};

/// Ids of completed milestones.
pub type CompletedSet = BTreeSet<String>;

/// Why a skill is not yet available.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmetPrerequisites {
    /// Prerequisites present in the graph but not learned yet.
    pub pending: Vec<String>,
    /// Prerequisites no milestone in this roadmap teaches.
    pub unresolvable: Vec<String>,
}

impl UnmetPrerequisites {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.unresolvable.is_empty()
    }

    /// True when the skill can never become available in this roadmap.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        !self.unresolvable.is_empty()
    }
}

/// Computes learned/available flags. Stateless; every call starts from scratch.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailabilityResolver;

impl AvailabilityResolver {
    /// Returns a copy of `graph` with both flags recomputed from `completed`.
    #[must_use]
    pub fn resolve(&self, graph: &SkillGraph, completed: &CompletedSet) -> SkillGraph {
        let mut resolved = graph.clone();

        for node in resolved.nodes_mut() {
            node.is_learned = node
                .related_milestone_ids
                .iter()
                .any(|id| completed.contains(id));
        }

        let available: Vec<bool> = resolved
            .iter()
            .map(|node| prerequisites_met(&resolved, node))
            .collect();
        for (node, is_available) in resolved.nodes_mut().zip(available) {
            node.is_available = is_available;
        }

        debug!(
            skills = resolved.len(),
            completed = completed.len(),
            "resolved skill availability"
        );
        resolved
    }

    /// Lists what stands between `node` and availability.
    #[must_use]
    pub fn unmet_prerequisites(&self, graph: &SkillGraph, node: &SkillNode) -> UnmetPrerequisites {
        let mut unmet = UnmetPrerequisites::default();
        for prerequisite in &node.prerequisites {
            match graph.get(prerequisite) {
                Some(p) if p.is_learned => {}
                Some(_) => unmet.pending.push(prerequisite.clone()),
                None => unmet.unresolvable.push(prerequisite.clone()),
            }
        }
        unmet
    }
}

/// Convenience wrapper around [`AvailabilityResolver::resolve`].
#[must_use]
pub fn resolve_availability(graph: &SkillGraph, completed: &CompletedSet) -> SkillGraph {
    AvailabilityResolver.resolve(graph, completed)
}

fn prerequisites_met(graph: &SkillGraph, node: &SkillNode) -> bool {
    node.prerequisites
        .iter()
        .all(|name| graph.get(name).is_some_and(|p| p.is_learned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ClassificationTables, PrerequisiteRule};
    use crate::graph::build_skill_graph;
    use careerpath_test_utils::RoadmapFixture;

    fn tables() -> ClassificationTables {
        ClassificationTables {
            prerequisites: vec![
                PrerequisiteRule {
                    pattern: "Advanced".into(),
                    requires: vec!["Basics".into(), "Tooling".into()],
                },
                PrerequisiteRule {
                    pattern: "Orphan".into(),
                    requires: vec!["Nowhere".into()],
                },
            ],
            ..ClassificationTables::empty()
        }
    }

    fn graph() -> SkillGraph {
        let model = RoadmapFixture::new("rm")
            .phase("p0", 1)
            .milestone("m1", 10, &["Basics"])
            .milestone("m2", 10, &["Tooling", "Basics"])
            .phase("p1", 1)
            .milestone("m3", 10, &["Advanced", "Orphan"])
            .build();
        build_skill_graph(&model, &tables())
    }

    fn completed(ids: &[&str]) -> CompletedSet {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_nothing_completed() {
        let resolved = resolve_availability(&graph(), &completed(&[]));
        let basics = resolved.get("Basics").unwrap();
        assert!(!basics.is_learned);
        assert!(basics.is_available);
        assert!(!resolved.get("Advanced").unwrap().is_available);
    }

    #[test]
    fn test_one_related_milestone_marks_learned() {
        // Basics is touched by m1 and m2; m2 alone is enough.
        let resolved = resolve_availability(&graph(), &completed(&["m2"]));
        assert!(resolved.get("Basics").unwrap().is_learned);
        assert!(resolved.get("Tooling").unwrap().is_learned);
        assert!(resolved.get("Advanced").unwrap().is_available);
    }

    #[test]
    fn test_partial_prerequisites_keep_skill_locked() {
        let resolved = resolve_availability(&graph(), &completed(&["m1"]));
        let advanced = resolved.get("Advanced").unwrap();
        assert!(!advanced.is_available);

        let unmet = AvailabilityResolver.unmet_prerequisites(&resolved, advanced);
        assert_eq!(unmet.pending, vec!["Tooling"]);
        assert!(!unmet.is_permanent());
    }

    #[test]
    fn test_missing_prerequisite_locks_forever() {
        let resolved = resolve_availability(&graph(), &completed(&["m1", "m2", "m3"]));
        let orphan = resolved.get("Orphan").unwrap();
        assert!(orphan.is_learned);
        assert!(!orphan.is_available);

        let unmet = AvailabilityResolver.unmet_prerequisites(&resolved, orphan);
        assert_eq!(unmet.unresolvable, vec!["Nowhere"]);
        assert!(unmet.is_permanent());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let graph = graph();
        let done = completed(&["m1"]);
        let once = resolve_availability(&graph, &done);
        let twice = resolve_availability(&once, &done);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_completed_ids_are_ignored() {
        let resolved = resolve_availability(&graph(), &completed(&["m-unknown"]));
        assert_eq!(resolved.summary().learned, 0);
    }
}
