// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The ball: a single unit of work tracked by the store.

use serde::{Deserialize, Serialize};

use crate::define_id;
use crate::time::Timestamp;

define_id! {
    /// Globally-unique identifier for a ball.
    pub struct BallId;
}

/// Priority of a ball, from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

/// Preferred model size for a ball. `Blank` means "defer to the session default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelSize {
    Small,
    #[default]
    Medium,
    Large,
    Blank,
}

/// Lifecycle state of a ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallState {
    Pending,
    InProgress,
    Blocked,
    Complete,
    Researched,
}

impl BallState {
    /// Terminal states are not revisited by the loop engine.
    pub fn is_terminal(self) -> bool {
        matches!(self, BallState::Complete | BallState::Researched)
    }
}

/// A single unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub title: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    pub priority: Priority,
    #[serde(default)]
    pub model_size: ModelSize,
    #[serde(default)]
    pub model_override: Option<String>,
    #[serde(default)]
    pub agent_provider: Option<String>,
    pub state: BallState,
    #[serde(default)]
    pub blocked_reason: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub depends_on: Vec<BallId>,
    pub working_dir: String,
    pub created_at: Timestamp,
    pub last_activity: Timestamp,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    #[serde(default)]
    pub completion_note: Option<String>,
    #[serde(default)]
    pub update_count: u64,
    #[serde(default)]
    pub beads_issues: Vec<String>,
    #[serde(default)]
    pub beads_primary: Option<String>,
    /// Legacy alias for `title`, accepted on load and never written.
    #[serde(default, skip_serializing)]
    pub intent: Option<String>,
}

impl Ball {
    /// Resolve the legacy `intent` field into `title` if `title` was left empty.
    pub fn normalize_legacy_fields(&mut self) {
        if self.title.is_empty() {
            if let Some(intent) = self.intent.take() {
                self.title = intent;
            }
        }
    }

    /// A ball belongs to `session` iff the session name appears in its tag set,
    /// or `session` is the meta-session that selects every ball.
    pub fn in_session(&self, session: &str) -> bool {
        crate::meta_session::is_meta(session) || self.tags.iter().any(|t| t == session)
    }

    /// Whether this ball is eligible to be worked in a non-interactive, non-targeted run.
    pub fn is_workable(&self, interactive_or_targeted: bool) -> bool {
        match self.state {
            BallState::Pending | BallState::InProgress => true,
            BallState::Blocked => interactive_or_targeted,
            BallState::Complete | BallState::Researched => false,
        }
    }

    /// Derived short ID used for prefix resolution and display.
    pub fn short_id(&self) -> &str {
        use crate::id::ShortId;
        self.id.as_str().short(8)
    }
}

#[cfg(test)]
#[path = "ball_tests.rs"]
mod tests;
