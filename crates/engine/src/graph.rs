//! Skill graph derived from a roadmap.
//!
//! The builder walks phases in ascending order, milestones in declared order,
//! and each milestone's skills in declared order. That traversal order is the
//! canonical order of the graph: [`SkillGraph::iter`] yields nodes in it, and
//! every stable sort downstream uses it as the tie-break.
//!
//! Nodes are created on first sighting (level = phase order, hours = the
//! milestone's hours). Later sightings append the milestone id and add its
//! hours in full, so a 20-hour milestone touching two skills credits 20 hours
//! to each.

use careerpath_roadmap::RoadmapModel;
use serde::ser::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::classify::{ClassificationTables, Importance};

/// A derived skill. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillNode {
    pub name: String,
    /// Lowest phase order whose milestones reference this skill.
    pub level: u32,
    pub category: String,
    pub importance: Importance,
    /// Exact names of skills that must be learned first.
    pub prerequisites: Vec<String>,
    /// Milestones touching this skill, in canonical order.
    pub related_milestone_ids: Vec<String>,
    /// Sum of the estimated hours of every related milestone.
    pub estimated_hours: u32,
    pub is_learned: bool,
    pub is_available: bool,
}

/// Skill name -> node map that remembers canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillGraph {
    nodes: Vec<SkillNode>,
    /// Name to position in `nodes`.
    index: HashMap<String, usize>,
}

/// Learned / available counts over a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSummary {
    pub total: usize,
    pub learned: usize,
    pub available: usize,
    /// Available but not yet learned.
    pub learnable: usize,
    pub locked: usize,
}

impl SkillGraph {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SkillNode> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Nodes in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &SkillNode> {
        self.nodes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Canonical position of a skill; the tie-break for stable sorts.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Skills grouped by the phase order that introduces them (skill-tree tiers).
    #[must_use]
    pub fn by_level(&self) -> BTreeMap<u32, Vec<&SkillNode>> {
        let mut levels: BTreeMap<u32, Vec<&SkillNode>> = BTreeMap::new();
        for node in &self.nodes {
            levels.entry(node.level).or_default().push(node);
        }
        levels
    }

    /// Skills grouped by category, categories in first-sighting order.
    #[must_use]
    pub fn by_category(&self) -> Vec<(&str, Vec<&SkillNode>)> {
        let mut groups: Vec<(&str, Vec<&SkillNode>)> = Vec::new();
        for node in &self.nodes {
            match groups.iter_mut().find(|(c, _)| *c == node.category) {
                Some((_, members)) => members.push(node),
                None => groups.push((node.category.as_str(), vec![node])),
            }
        }
        groups
    }

    /// Skills that list `name` as a prerequisite.
    #[must_use]
    pub fn dependents(&self, name: &str) -> Vec<&SkillNode> {
        self.nodes
            .iter()
            .filter(|n| n.prerequisites.iter().any(|p| p == name))
            .collect()
    }

    #[must_use]
    pub fn summary(&self) -> SkillSummary {
        let mut summary = SkillSummary {
            total: self.nodes.len(),
            ..Default::default()
        };
        for node in &self.nodes {
            if node.is_learned {
                summary.learned += 1;
            }
            if node.is_available {
                summary.available += 1;
                if !node.is_learned {
                    summary.learnable += 1;
                }
            } else {
                summary.locked += 1;
            }
        }
        summary
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut SkillNode> {
        self.nodes.iter_mut()
    }
}

/// Serializes as a JSON object keyed by skill name, in canonical order.
impl Serialize for SkillGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.nodes.iter().map(|n| (&n.name, n)))
    }
}

/// Derives a [`SkillGraph`] from a roadmap using injectable classification tables.
///
/// Building never fails; skills no rule matches get the permissive defaults.
#[derive(Debug, Clone, Copy)]
pub struct SkillGraphBuilder<'a> {
    tables: &'a ClassificationTables,
}

impl<'a> SkillGraphBuilder<'a> {
    #[must_use]
    pub fn new(tables: &'a ClassificationTables) -> Self {
        Self { tables }
    }

    /// Build the graph. Learned/available flags start out false; see
    /// [`crate::availability`] for resolving them.
    #[must_use]
    pub fn build(&self, model: &RoadmapModel) -> SkillGraph {
        let mut graph = SkillGraph::default();

        for phase in model.list_phases() {
            for milestone in &phase.milestones {
                for skill in &milestone.skills {
                    if let Some(&i) = graph.index.get(skill) {
                        let node = &mut graph.nodes[i];
                        node.estimated_hours =
                            node.estimated_hours.saturating_add(milestone.estimated_hours);
                        node.related_milestone_ids.push(milestone.id.clone());
                        continue;
                    }

                    let classification = self.tables.classify(skill);
                    graph.index.insert(skill.clone(), graph.nodes.len());
                    graph.nodes.push(SkillNode {
                        name: skill.clone(),
                        level: phase.order,
                        category: classification.category,
                        importance: classification.importance,
                        prerequisites: classification.prerequisites,
                        related_milestone_ids: vec![milestone.id.clone()],
                        estimated_hours: milestone.estimated_hours,
                        is_learned: false,
                        is_available: false,
                    });
                }
            }
        }

        debug!(
            roadmap_id = %model.id(),
            skills = graph.len(),
            "built skill graph"
        );
        graph
    }
}

/// Convenience wrapper around [`SkillGraphBuilder::build`].
#[must_use]
pub fn build_skill_graph(model: &RoadmapModel, tables: &ClassificationTables) -> SkillGraph {
    SkillGraphBuilder::new(tables).build(model)
}
