// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The session: a named logical grouping of balls.

use serde::{Deserialize, Serialize};

use crate::ball::ModelSize;
use crate::time::Timestamp;

/// A named logical grouping of balls. The reserved name `all` (see
/// [`crate::meta_session`]) selects every ball regardless of tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub acceptance_criteria: Option<Vec<String>>,
    #[serde(default)]
    pub default_model: ModelSize,
    pub created_at: Timestamp,
    pub last_activity: Timestamp,
}

impl Session {
    pub fn new(id: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            context: None,
            acceptance_criteria: None,
            default_model: ModelSize::default(),
            created_at: now,
            last_activity: now,
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
