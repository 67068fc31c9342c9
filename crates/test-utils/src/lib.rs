//! Shared test utilities for careerpath crates.
//!
//! Env-var guards for tests that touch process-global state, and a builder
//! for small roadmaps so tests can state only the parts they assert on.

use careerpath_roadmap::{
    MilestoneDocument, PhaseDocument, Priority, RoadmapDocument, RoadmapModel,
};
use std::sync::{LazyLock, Mutex, MutexGuard};

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = careerpath_test_utils::set_env_var("MY_VAR", Some("value"));
/// // MY_VAR is set to "value"
/// // When _guard drops, MY_VAR is restored to its original value
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// Builder for roadmap documents.
///
/// Phases get contiguous orders in the sequence they are added. Milestones
/// attach to the most recently added phase.
///
/// ```
/// use careerpath_test_utils::RoadmapFixture;
///
/// let model = RoadmapFixture::new("rm")
///     .phase("basics", 2)
///     .milestone("m1", 20, &["Python"])
///     .build();
/// assert_eq!(model.milestone_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RoadmapFixture {
    document: RoadmapDocument,
}

impl RoadmapFixture {
    pub fn new(id: &str) -> Self {
        Self {
            document: RoadmapDocument {
                id: id.to_string(),
                target_role: "Backend Developer".to_string(),
                ..RoadmapDocument::default()
            },
        }
    }

    pub fn estimated_months(mut self, months: u32) -> Self {
        self.document.estimated_duration_months = months;
        self
    }

    pub fn phase(mut self, id: &str, duration_months: u32) -> Self {
        let order = u32::try_from(self.document.phases.len()).expect("phase count fits u32");
        self.document.phases.push(PhaseDocument {
            id: id.to_string(),
            order,
            title: format!("Phase {order}"),
            duration_months,
            ..PhaseDocument::default()
        });
        self
    }

    pub fn milestone(self, id: &str, hours: u32, skills: &[&str]) -> Self {
        self.push_milestone(id, hours, skills, false)
    }

    /// A milestone that arrives already completed, without a timestamp.
    pub fn completed_milestone(self, id: &str, hours: u32, skills: &[&str]) -> Self {
        self.push_milestone(id, hours, skills, true)
    }

    /// Set the priority of the last added milestone.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.last_milestone().priority = priority;
        self
    }

    pub fn document(&self) -> RoadmapDocument {
        self.document.clone()
    }

    /// The document as a generator payload.
    pub fn json(&self) -> String {
        serde_json::to_string(&self.document).expect("fixture document serializes")
    }

    /// Validate and build the model. Panics on invalid fixtures.
    pub fn build(self) -> RoadmapModel {
        RoadmapModel::from_document(self.document).expect("fixture roadmap is valid")
    }

    fn push_milestone(mut self, id: &str, hours: u32, skills: &[&str], completed: bool) -> Self {
        let phase = self
            .document
            .phases
            .last_mut()
            .expect("add a phase before its milestones");
        phase.milestones.push(MilestoneDocument {
            id: id.to_string(),
            title: format!("Milestone {id}"),
            estimated_hours: hours,
            skills: skills.iter().map(|s| (*s).to_string()).collect(),
            is_completed: completed,
            ..MilestoneDocument::default()
        });
        self
    }

    fn last_milestone(&mut self) -> &mut MilestoneDocument {
        self.document
            .phases
            .last_mut()
            .and_then(|p| p.milestones.last_mut())
            .expect("add a milestone before setting its priority")
    }
}

/// Two phases; the second teaches 딥러닝, whose prerequisite 머신러닝 is taught
/// nowhere in the roadmap.
///
/// | phase | milestone | hours | skills      |
/// |-------|-----------|-------|-------------|
/// | p0    | m1        | 40    | Python      |
/// | p0    | m2        | 30    | 통계        |
/// | p1    | m3        | 60    | 딥러닝      |
pub fn deep_learning_roadmap() -> RoadmapFixture {
    RoadmapFixture::new("dl-roadmap")
        .estimated_months(6)
        .phase("p0", 3)
        .milestone("m1", 40, &["Python"])
        .milestone("m2", 30, &["통계"])
        .phase("p1", 3)
        .milestone("m3", 60, &["딥러닝"])
}
