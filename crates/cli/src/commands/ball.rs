// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jug ball` - manage the units of work a session draws from.

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use jug_core::{Ball, BallId, BallState, IdGen, ModelSize, Priority, UuidIdGen};
use jug_store::JuggleStore;

#[derive(Args)]
pub struct BallArgs {
    #[command(subcommand)]
    pub command: BallCommand,
}

#[derive(Subcommand)]
pub enum BallCommand {
    /// Add a new ball
    Add {
        /// Short title
        title: String,
        /// Session tags this ball belongs to (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Long-form context
        #[arg(long)]
        context: Option<String>,
        /// Acceptance criteria line (repeatable)
        #[arg(long = "ac")]
        acceptance_criteria: Vec<String>,
        /// Priority: urgent, high, medium, low
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Preferred model size: small, medium, large, blank
        #[arg(long = "model-size", default_value = "blank")]
        model_size: String,
        /// Dependency ball-ids (repeatable)
        #[arg(long = "depends-on")]
        depends_on: Vec<String>,
    },
    /// List balls, optionally filtered by session
    List {
        /// Session name; omit for every active ball
        #[arg(long)]
        session: Option<String>,
    },
    /// Show one ball in full
    Show {
        /// Ball ID or unique prefix
        id: String,
    },
    /// Transition a ball's state
    SetState {
        /// Ball ID or unique prefix
        id: String,
        /// pending, in_progress, blocked, complete, researched
        state: String,
        /// Reason, required when transitioning to blocked
        #[arg(long)]
        reason: Option<String>,
    },
    /// Move a completed/researched ball to the archive
    Archive {
        /// Ball ID or unique prefix
        id: String,
    },
    /// Restore an archived ball to pending
    Unarchive {
        /// Ball ID or unique prefix
        id: String,
    },
}

pub fn handle(command: BallCommand, store: &JuggleStore) -> Result<()> {
    match command {
        BallCommand::Add { title, tags, context, acceptance_criteria, priority, model_size, depends_on } => {
            let now = Utc::now();
            let ball = Ball {
                id: BallId::new(UuidIdGen.next()),
                title,
                context: context.unwrap_or_default(),
                acceptance_criteria,
                priority: parse_priority(&priority)?,
                model_size: parse_model_size(&model_size)?,
                model_override: None,
                agent_provider: None,
                state: BallState::Pending,
                blocked_reason: None,
                tags,
                depends_on: depends_on.into_iter().map(BallId::new).collect(),
                working_dir: ".".to_string(),
                created_at: now,
                last_activity: now,
                completed_at: None,
                completion_note: None,
                update_count: 0,
                beads_issues: vec![],
                beads_primary: None,
                intent: None,
            };
            store.balls.append_ball(&ball)?;
            println!("added {}", ball.short_id());
        }
        BallCommand::List { session } => {
            let balls = store.balls.load_balls()?;
            for b in balls.iter().filter(|b| session.as_deref().map_or(true, |s| b.in_session(s))) {
                println!("{}  {:?}  {}", b.short_id(), b.state, b.title);
            }
        }
        BallCommand::Show { id } => {
            let balls = store.balls.load_balls()?;
            let resolved = store.balls.resolve_ball_id(&id, true)?;
            let ball = balls
                .iter()
                .find(|b| b.id == resolved)
                .ok_or_else(|| anyhow::anyhow!("ball '{id}' not found"))?;
            println!("{}", serde_json::to_string_pretty(ball)?);
        }
        BallCommand::SetState { id, state, reason } => {
            let new_state = parse_state(&state)?;
            if new_state == BallState::Blocked && reason.is_none() {
                bail!("--reason is required when setting state to blocked");
            }
            let resolved = store.balls.resolve_ball_id(&id, true)?;
            let mut balls = store.balls.load_balls()?;
            let ball = balls
                .iter_mut()
                .find(|b| b.id == resolved)
                .ok_or_else(|| anyhow::anyhow!("ball '{id}' not found"))?;
            ball.state = new_state;
            ball.blocked_reason = reason;
            ball.last_activity = Utc::now();
            if new_state.is_terminal() {
                ball.completed_at = Some(Utc::now());
            }
            let ball = ball.clone();
            store.balls.update_ball(&ball)?;
            println!("{} -> {:?}", ball.short_id(), ball.state);
        }
        BallCommand::Archive { id } => {
            let resolved = store.balls.resolve_ball_id(&id, true)?;
            let balls = store.balls.load_balls()?;
            let ball = balls
                .iter()
                .find(|b| b.id == resolved)
                .ok_or_else(|| anyhow::anyhow!("ball '{id}' not found"))?;
            store.balls.archive_ball(ball)?;
            println!("archived {}", ball.short_id());
        }
        BallCommand::Unarchive { id } => {
            let resolved = store.balls.resolve_ball_id(&id, true)?;
            let ball = store.balls.unarchive_ball(&resolved)?;
            println!("restored {}", ball.short_id());
        }
    }
    Ok(())
}

fn parse_priority(s: &str) -> Result<Priority> {
    Ok(match s {
        "urgent" => Priority::Urgent,
        "high" => Priority::High,
        "medium" => Priority::Medium,
        "low" => Priority::Low,
        other => bail!("unknown priority '{other}'"),
    })
}

fn parse_model_size(s: &str) -> Result<ModelSize> {
    Ok(match s {
        "small" => ModelSize::Small,
        "medium" => ModelSize::Medium,
        "large" => ModelSize::Large,
        "blank" => ModelSize::Blank,
        other => bail!("unknown model size '{other}'"),
    })
}

fn parse_state(s: &str) -> Result<BallState> {
    Ok(match s {
        "pending" => BallState::Pending,
        "in_progress" => BallState::InProgress,
        "blocked" => BallState::Blocked,
        "complete" => BallState::Complete,
        "researched" => BallState::Researched,
        other => bail!("unknown state '{other}'"),
    })
}

#[cfg(test)]
#[path = "ball_tests.rs"]
mod tests;
