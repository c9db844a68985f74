// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jug session` - manage named groupings of balls.

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use jug_core::{ModelSize, Session};
use jug_store::JuggleStore;

#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Create a session
    Create {
        /// Session identifier (tag name balls reference)
        id: String,
        /// Human description
        description: String,
        /// Long-form context paragraph
        #[arg(long)]
        context: Option<String>,
        /// Default model size for balls that don't pick one: small, medium, large
        #[arg(long = "default-model", default_value = "medium")]
        default_model: String,
    },
    /// Show a session's metadata
    Show {
        /// Session identifier
        id: String,
    },
}

pub fn handle(command: SessionCommand, store: &JuggleStore) -> Result<()> {
    match command {
        SessionCommand::Create { id, description, context, default_model } => {
            let now = Utc::now();
            let mut session = Session::new(id.clone(), now);
            session.description = description;
            session.context = context;
            session.default_model = parse_model_size(&default_model)?;
            store.sessions.create_session(&session)?;
            println!("created session '{id}'");
        }
        SessionCommand::Show { id } => {
            let session = store
                .sessions
                .load_session(&id)?
                .ok_or_else(|| anyhow::anyhow!("session '{id}' not found"))?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
    }
    Ok(())
}

fn parse_model_size(s: &str) -> Result<ModelSize> {
    Ok(match s {
        "small" => ModelSize::Small,
        "medium" => ModelSize::Medium,
        "large" => ModelSize::Large,
        other => anyhow::bail!("unknown model size '{other}'"),
    })
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
