//! Milestone completion: the engine's only mutation.
//!
//! [`RoadmapTracker::complete_milestone`] moves a milestone from pending to
//! completed exactly once, returns a [`CompletionRecord`], and bumps the
//! revision published on a watch channel. It does not recompute any view;
//! callers take a fresh [`EngineSnapshot`] afterwards. Persisting the change
//! and reacting to it (rewards, notifications) happen outside, after success.
//!
//! The tracker mutates through `&mut self`, so the borrow checker enforces a
//! single writer. [`SharedTracker`] adds a lock for callers that share one
//! roadmap across threads.

use careerpath_roadmap::{RoadmapModel, TransitionError};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::classify::ClassificationTables;
use crate::config::{classification_tables_or_default, EngineOptions};
use crate::snapshot::EngineSnapshot;

/// Returned by a successful completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub milestone_id: String,
    pub completed_at: DateTime<Utc>,
}

/// Why a completion was refused. Existing state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CompletionError {
    #[error("milestone '{id}' not found")]
    NotFound { id: String },

    #[error("milestone '{id}' is already completed")]
    AlreadyCompleted {
        id: String,
        /// When the first completion happened, if known.
        completed_at: Option<DateTime<Utc>>,
    },
}

impl CompletionError {
    /// Duplicate completions are expected user actions, not faults.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::AlreadyCompleted { .. })
    }

    /// Message suitable for showing to the learner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { .. } => "This milestone no longer exists in your roadmap.".into(),
            Self::AlreadyCompleted {
                completed_at: Some(at),
                ..
            } => format!(
                "You already completed this milestone on {}.",
                at.format("%Y-%m-%d")
            ),
            Self::AlreadyCompleted { .. } => "You already completed this milestone.".into(),
        }
    }
}

impl From<TransitionError> for CompletionError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::UnknownMilestone(id) => Self::NotFound { id },
            TransitionError::AlreadyCompleted { id, completed_at } => {
                Self::AlreadyCompleted { id, completed_at }
            }
        }
    }
}

/// Owns one roadmap's mutable completion state.
#[derive(Debug)]
pub struct RoadmapTracker {
    model: Arc<RoadmapModel>,
    tables: Arc<ClassificationTables>,
    options: EngineOptions,
    revision: watch::Sender<u64>,
}

impl RoadmapTracker {
    #[must_use]
    pub fn new(model: RoadmapModel, tables: Arc<ClassificationTables>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            model: Arc::new(model),
            tables,
            options: EngineOptions::default(),
            revision,
        }
    }

    /// Tracker using the configured classification tables and engine options.
    #[must_use]
    pub fn from_env(model: RoadmapModel) -> Self {
        Self::new(model, Arc::new(classification_tables_or_default()))
            .with_options(EngineOptions::from_env())
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

    /// Current roadmap. Holding the `Arc` keeps this exact state alive;
    /// later completions copy on write instead of changing it.
    #[must_use]
    pub fn model(&self) -> &Arc<RoadmapModel> {
        &self.model
    }

    #[must_use]
    pub fn tables(&self) -> &Arc<ClassificationTables> {
        &self.tables
    }

    /// Number of successful completions since the tracker was created.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Receiver that changes whenever a completion succeeds.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Immutable view of the current state for the pure queries.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::new(Arc::clone(&self.model), Arc::clone(&self.tables))
            .with_options(self.options.clone())
    }

    /// Complete a milestone now.
    pub fn complete_milestone(
        &mut self,
        id: &str,
        notes: Option<String>,
    ) -> Result<CompletionRecord, CompletionError> {
        self.complete_milestone_at(id, notes, Utc::now())
    }

    /// Complete a milestone with an explicit timestamp.
    pub fn complete_milestone_at(
        &mut self,
        id: &str,
        notes: Option<String>,
        completed_at: DateTime<Utc>,
    ) -> Result<CompletionRecord, CompletionError> {
        // Check first so a refused attempt never clones a shared model.
        if let Some(existing) = self.model.find_milestone(id) {
            if existing.is_completed() {
                let err = CompletionError::AlreadyCompleted {
                    id: id.to_string(),
                    completed_at: existing.completed_at(),
                };
                warn!(roadmap_id = %self.model.id(), milestone_id = %id, "milestone already completed");
                return Err(err);
            }
        } else {
            warn!(roadmap_id = %self.model.id(), milestone_id = %id, "unknown milestone");
            return Err(CompletionError::NotFound { id: id.to_string() });
        }

        Arc::make_mut(&mut self.model).complete_milestone(id, completed_at, notes)?;
        self.revision.send_modify(|r| *r += 1);

        info!(
            roadmap_id = %self.model.id(),
            milestone_id = %id,
            revision = self.revision(),
            "milestone completed"
        );
        Ok(CompletionRecord {
            milestone_id: id.to_string(),
            completed_at,
        })
    }
}

/// A [`RoadmapTracker`] behind a lock, for sharing across threads.
///
/// Each call holds the lock for the whole check-transition-publish sequence,
/// so concurrent completions of the same roadmap never interleave.
#[derive(Debug, Clone)]
pub struct SharedTracker {
    inner: Arc<Mutex<RoadmapTracker>>,
}

impl SharedTracker {
    #[must_use]
    pub fn new(tracker: RoadmapTracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    pub fn complete_milestone(
        &self,
        id: &str,
        notes: Option<String>,
    ) -> Result<CompletionRecord, CompletionError> {
        self.inner.lock().complete_milestone(id, notes)
    }

    pub fn complete_milestone_at(
        &self,
        id: &str,
        notes: Option<String>,
        completed_at: DateTime<Utc>,
    ) -> Result<CompletionRecord, CompletionError> {
        self.inner
            .lock()
            .complete_milestone_at(id, notes, completed_at)
    }

    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        self.inner.lock().snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.lock().subscribe()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.lock().revision()
    }
}

impl From<RoadmapTracker> for SharedTracker {
    fn from(tracker: RoadmapTracker) -> Self {
        Self::new(tracker)
    }
}
