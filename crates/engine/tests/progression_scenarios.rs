use careerpath_engine::{
    build_skill_graph, ClassificationTables, CompletionError, EngineOptions, Error,
    RecommendationEngine, RoadmapTracker, SharedTracker,
};
use careerpath_engine::config::{CLASSIFICATION_ENV, RECOMMENDATION_LIMIT_ENV};
use careerpath_test_utils::{deep_learning_roadmap, env_guard, set_env_var, RoadmapFixture};
use chrono::{TimeZone, Utc};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("careerpath_engine=debug")
        .with_test_writer()
        .try_init();
}

fn tracker(fixture: RoadmapFixture) -> RoadmapTracker {
    RoadmapTracker::new(fixture.build(), Arc::new(ClassificationTables::default()))
}

#[test]
fn deep_learning_stays_locked_when_a_prerequisite_is_never_taught() {
    init_tracing();
    let mut tracker = tracker(deep_learning_roadmap());

    let before = tracker.snapshot();
    assert!(before.skill_map().get("Python").unwrap().is_available);
    assert!(!before.skill_map().get("딥러닝").unwrap().is_available);

    tracker.complete_milestone("m1", None).unwrap();
    let after_python = tracker.snapshot();
    assert!(after_python.skill_map().get("Python").unwrap().is_learned);
    assert!(!after_python.skill_map().get("딥러닝").unwrap().is_available);

    let explained = after_python.explain_locked(10);
    let deep = explained
        .iter()
        .find(|locked| locked.skill.name == "딥러닝")
        .unwrap();
    assert_eq!(deep.unmet.unresolvable, vec!["머신러닝"]);
    assert!(deep.unmet.pending.is_empty());
    assert!(deep.unmet.is_permanent());

    tracker.complete_milestone("m2", None).unwrap();
    tracker.complete_milestone("m3", None).unwrap();
    let finished = tracker.snapshot();
    assert!(!finished.skill_map().get("딥러닝").unwrap().is_available);
    assert_eq!(finished.overall_progress(), 1.0);
    assert_eq!(finished.current_phase_index(), Some(1));
    assert_eq!(finished.remaining_months(), 0);
}

#[test]
fn milestone_hours_are_attributed_in_full_to_every_skill() {
    let model = RoadmapFixture::new("rm")
        .phase("p0", 1)
        .milestone("m1", 20, &["A", "B"])
        .build();
    let graph = build_skill_graph(&model, &ClassificationTables::empty());

    assert_eq!(graph.get("A").unwrap().estimated_hours, 20);
    assert_eq!(graph.get("B").unwrap().estimated_hours, 20);
}

#[test]
fn progress_with_an_empty_middle_phase() {
    let mut tracker = tracker(
        RoadmapFixture::new("rm")
            .estimated_months(9)
            .phase("p0", 3)
            .milestone("a1", 10, &["Git"])
            .milestone("a2", 10, &["SQL"])
            .phase("p1", 3)
            .phase("p2", 3)
            .milestone("c1", 5, &[])
            .milestone("c2", 5, &[])
            .milestone("c3", 5, &[])
            .milestone("c4", 5, &[]),
    );
    for id in ["a1", "c1", "c2"] {
        tracker.complete_milestone(id, None).unwrap();
    }

    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.phase_progresses(), vec![0.5, 0.0, 0.5]);
    assert!((snapshot.overall_progress() - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(snapshot.current_phase_index(), Some(0));
    // ceil(9 * (1 - 1/3))
    assert_eq!(snapshot.remaining_months(), 6);

    let report = snapshot.progress_report();
    assert_eq!(report.completed_milestones, 3);
    assert_eq!(report.total_milestones, 6);
    assert_eq!(report.completed_hours, 20);
    assert_eq!(report.total_hours, 40);
}

#[test]
fn overall_progress_is_unweighted_across_phases() {
    let mut tracker = tracker(
        RoadmapFixture::new("rm")
            .phase("small", 1)
            .milestone("s1", 1, &[])
            .milestone("s2", 1, &[])
            .phase("large", 1)
            .milestone("l1", 1, &[])
            .milestone("l2", 1, &[])
            .milestone("l3", 1, &[])
            .milestone("l4", 1, &[])
            .milestone("l5", 1, &[])
            .milestone("l6", 1, &[]),
    );
    for id in ["s1", "l1", "l2", "l3"] {
        tracker.complete_milestone(id, None).unwrap();
    }
    assert_eq!(tracker.snapshot().overall_progress(), 0.5);
}

#[test]
fn second_completion_keeps_the_first_timestamp() {
    let mut tracker = tracker(deep_learning_roadmap());
    let first = Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2026, 5, 5, 9, 30, 0).unwrap();

    let record = tracker.complete_milestone_at("m1", None, first).unwrap();
    assert_eq!(record.milestone_id, "m1");
    assert_eq!(record.completed_at, first);

    let err = tracker
        .complete_milestone_at("m1", Some("again".into()), second)
        .unwrap_err();
    assert!(matches!(err, CompletionError::AlreadyCompleted { .. }));

    let milestone = tracker.model().find_milestone("m1").unwrap();
    assert_eq!(milestone.completed_at(), Some(first));
    assert_eq!(milestone.completion_notes(), None);
}

#[test]
fn next_learnable_skills_follow_completions() {
    let mut tracker = tracker(
        RoadmapFixture::new("web")
            .phase("p0", 2)
            .milestone("m1", 30, &["JavaScript", "HTML"])
            .phase("p1", 2)
            .milestone("m2", 40, &["React"])
            .milestone("m3", 20, &["Node.js"]),
    );
    let limit = EngineOptions::default().recommendation_limit;

    let names = |tracker: &RoadmapTracker| -> Vec<String> {
        tracker
            .snapshot()
            .next_learnable_skills(limit)
            .into_iter()
            .map(|n| n.name.clone())
            .collect()
    };

    // JavaScript is core; HTML has no importance rule
    assert_eq!(names(&tracker), vec!["JavaScript", "HTML"]);

    tracker.complete_milestone("m1", None).unwrap();
    // React is important; Node.js falls back to useful
    assert_eq!(names(&tracker), vec!["React", "Node.js"]);
    assert!(tracker.snapshot().locked_skills(limit).is_empty());
}

#[test]
fn recommendation_limit_comes_from_the_environment() {
    let _lock = env_guard();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("classification.toml");
    let _tables = set_env_var(CLASSIFICATION_ENV, missing.to_str());
    let _limit = set_env_var(RECOMMENDATION_LIMIT_ENV, Some("1"));

    let model = RoadmapFixture::new("web")
        .phase("p0", 2)
        .milestone("m1", 30, &["JavaScript", "HTML", "Git"])
        .build();
    let tracker = RoadmapTracker::from_env(model);
    assert_eq!(tracker.options().recommendation_limit, 1);

    let snapshot = tracker.snapshot();
    let recommender = snapshot.recommender();
    let next = recommender.next_learnable_skills(snapshot.skill_map());
    let names: Vec<_> = next.iter().map(|n| n.name.as_str()).collect();
    // JavaScript and Git are both core; canonical order breaks the tie
    assert_eq!(names, vec!["JavaScript"]);
    assert_eq!(recommender.upcoming_milestones(snapshot.model(), snapshot.completed()).len(), 1);
}

#[test]
fn upcoming_milestones_move_to_the_next_phase() {
    let mut tracker = tracker(deep_learning_roadmap());
    let engine = RecommendationEngine::new();

    let ids = |tracker: &RoadmapTracker| -> Vec<String> {
        let snapshot = tracker.snapshot();
        engine
            .upcoming_milestones(snapshot.model(), snapshot.completed())
            .into_iter()
            .map(|m| m.id.clone())
            .collect()
    };

    assert_eq!(ids(&tracker), vec!["m1", "m2"]);
    tracker.complete_milestone("m1", None).unwrap();
    tracker.complete_milestone("m2", None).unwrap();
    assert_eq!(ids(&tracker), vec!["m3"]);
}

#[test]
fn malformed_payloads_are_rejected_before_tracking() {
    let tables = Arc::new(ClassificationTables::default());

    let gap = r#"{ "id": "rm", "targetRole": "x", "phases": [
        { "id": "p0", "order": 0 }, { "id": "p2", "order": 2 }
    ] }"#;
    assert!(matches!(
        RoadmapTracker::from_json(gap, Arc::clone(&tables)),
        Err(Error::Validation(_))
    ));

    let not_json = "{ \"id\": ";
    let err = RoadmapTracker::from_json(not_json, tables).unwrap_err();
    assert!(err.to_string().contains("malformed"));
}

#[test]
fn shared_tracker_publishes_revisions() {
    let shared = SharedTracker::from(tracker(deep_learning_roadmap()));
    let mut rx = shared.subscribe();

    shared.complete_milestone("m2", None).unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), 1);

    let snapshot = shared.snapshot();
    assert!(snapshot.skill_map().get("통계").unwrap().is_learned);
    assert_eq!(snapshot.phase_progress(0), Some(0.5));
}
