use careerpath_engine::{
    build_skill_graph, next_learnable_skills, resolve_availability, ClassificationTables,
    CompletedSet, PrerequisiteRule, ProgressAggregator,
};
use careerpath_roadmap::RoadmapModel;
use careerpath_test_utils::RoadmapFixture;
use proptest::prelude::*;

// No name is a substring of another, so each rule matches exactly one skill.
const SKILLS: [&str; 5] = ["Alpha", "Bravo", "Charlie", "Delta", "Echo"];
const UNTAUGHT: &str = "Zulu";

/// phases -> milestones -> skill indices
type Layout = Vec<Vec<Vec<usize>>>;

fn layout() -> impl Strategy<Value = Layout> {
    prop::collection::vec(
        prop::collection::vec(prop::collection::vec(0..SKILLS.len(), 0..3), 0..4),
        0..4,
    )
}

fn tables() -> impl Strategy<Value = ClassificationTables> {
    prop::collection::vec(
        prop::collection::vec(0..=SKILLS.len(), 0..3),
        SKILLS.len(),
    )
    .prop_map(|requires| ClassificationTables {
        prerequisites: SKILLS
            .iter()
            .zip(requires)
            .map(|(skill, indices)| PrerequisiteRule {
                pattern: (*skill).to_string(),
                requires: indices
                    .into_iter()
                    .map(|i| SKILLS.get(i).copied().unwrap_or(UNTAUGHT).to_string())
                    .collect(),
            })
            .collect(),
        ..ClassificationTables::empty()
    })
}

fn build(layout: &Layout) -> RoadmapModel {
    let mut fixture = RoadmapFixture::new("prop");
    for (p, milestones) in layout.iter().enumerate() {
        fixture = fixture.phase(&format!("p{p}"), 1);
        for (m, skills) in milestones.iter().enumerate() {
            let names: Vec<&str> = skills.iter().map(|&i| SKILLS[i]).collect();
            fixture = fixture.milestone(&format!("m{p}_{m}"), 1, &names);
        }
    }
    fixture.build()
}

fn completed_subset(model: &RoadmapModel, mask: &[bool]) -> CompletedSet {
    model
        .milestones()
        .zip(mask.iter().chain(std::iter::repeat(&false)))
        .filter(|(_, done)| **done)
        .map(|(m, _)| m.id.clone())
        .collect()
}

proptest! {
    #[test]
    fn availability_never_regresses(layout in layout(), tables in tables()) {
        let model = build(&layout);
        let graph = build_skill_graph(&model, &tables);

        let mut completed = CompletedSet::new();
        let mut previous = resolve_availability(&graph, &completed);
        for milestone in model.milestones() {
            completed.insert(milestone.id.clone());
            let next = resolve_availability(&graph, &completed);
            for node in previous.iter() {
                let now = next.get(&node.name).unwrap();
                prop_assert!(!node.is_available || now.is_available, "{} regressed", node.name);
                prop_assert!(!node.is_learned || now.is_learned, "{} unlearned", node.name);
            }
            previous = next;
        }
    }

    #[test]
    fn skills_without_prerequisites_are_available(
        layout in layout(),
        tables in tables(),
        mask in prop::collection::vec(any::<bool>(), 16),
    ) {
        let model = build(&layout);
        let completed = completed_subset(&model, &mask);
        let graph = resolve_availability(&build_skill_graph(&model, &tables), &completed);

        for node in graph.iter().filter(|n| n.prerequisites.is_empty()) {
            prop_assert!(node.is_available);
        }
    }

    #[test]
    fn learned_iff_a_related_milestone_is_completed(
        layout in layout(),
        mask in prop::collection::vec(any::<bool>(), 16),
    ) {
        let model = build(&layout);
        let completed = completed_subset(&model, &mask);
        let graph = resolve_availability(
            &build_skill_graph(&model, &ClassificationTables::empty()),
            &completed,
        );

        for node in graph.iter() {
            let expected = model
                .milestones()
                .any(|m| completed.contains(&m.id) && m.skills.contains(&node.name));
            prop_assert_eq!(node.is_learned, expected);
        }
    }

    #[test]
    fn untaught_prerequisites_lock_forever(layout in layout(), tables in tables()) {
        let model = build(&layout);
        let graph = build_skill_graph(&model, &tables);
        let everything: CompletedSet = model.milestones().map(|m| m.id.clone()).collect();
        let resolved = resolve_availability(&graph, &everything);

        for node in resolved.iter() {
            if node.prerequisites.iter().any(|p| !resolved.contains(p)) {
                prop_assert!(!node.is_available);
            }
        }
    }

    #[test]
    fn next_learnable_is_available_and_unlearned(
        layout in layout(),
        tables in tables(),
        mask in prop::collection::vec(any::<bool>(), 16),
        limit in 0usize..8,
    ) {
        let model = build(&layout);
        let completed = completed_subset(&model, &mask);
        let graph = resolve_availability(&build_skill_graph(&model, &tables), &completed);

        let next = next_learnable_skills(&graph, limit);
        prop_assert!(next.len() <= limit);
        for node in next {
            prop_assert!(node.is_available);
            prop_assert!(!node.is_learned);
        }
    }

    #[test]
    fn overall_progress_is_the_mean_of_phase_progress(
        layout in layout(),
        mask in prop::collection::vec(any::<bool>(), 16),
    ) {
        let model = build(&layout);
        let completed = completed_subset(&model, &mask);
        let progress = ProgressAggregator::new(&model, &completed);

        let phases = progress.phase_progresses();
        for ratio in &phases {
            prop_assert!((0.0..=1.0).contains(ratio));
        }
        let overall = progress.overall_progress();
        prop_assert!(!overall.is_nan());
        if phases.is_empty() {
            prop_assert_eq!(overall, 0.0);
        } else {
            let mean = phases.iter().sum::<f64>() / phases.len() as f64;
            prop_assert!((overall - mean).abs() < 1e-12);
        }
    }
}
