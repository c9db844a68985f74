// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jug daemon` - inspect and steer a running loop invocation out-of-process.

use anyhow::Result;
use clap::{Args, Subcommand};
use jug_core::{ControlCommand, DaemonState, PidInfo};
use jug_engine::DaemonFiles;
use jug_store::JuggleStore;

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Print the last-known state for a session's loop invocation
    Status {
        /// Session identifier
        session: String,
    },
    /// Pause after the current iteration
    Pause {
        session: String,
    },
    /// Resume a paused loop
    Resume {
        session: String,
    },
    /// Cancel the loop
    Cancel {
        session: String,
    },
    /// Skip the current ball and move to the next
    SkipBall {
        session: String,
    },
    /// Request a model change on the next iteration
    ChangeModel {
        session: String,
        model: String,
    },
}

pub fn handle(command: DaemonCommand, store: &JuggleStore) -> Result<()> {
    match command {
        DaemonCommand::Status { session } => {
            let files = files_for(store, &session);
            match files.read_state()? {
                Some(state) => println!("{}", serde_json::to_string_pretty(&state)?),
                None => println!("no daemon state recorded for '{session}'"),
            }
            if let Some(pid) = files.read_pid_info()? {
                println!("pid: {}", pid.pid);
            }
        }
        DaemonCommand::Pause { session } => send(store, &session, ControlCommand::Pause)?,
        DaemonCommand::Resume { session } => send(store, &session, ControlCommand::Resume)?,
        DaemonCommand::Cancel { session } => send(store, &session, ControlCommand::Cancel)?,
        DaemonCommand::SkipBall { session } => send(store, &session, ControlCommand::SkipBall)?,
        DaemonCommand::ChangeModel { session, model } => {
            send(store, &session, ControlCommand::ChangeModel(model))?
        }
    }
    Ok(())
}

fn files_for(store: &JuggleStore, session: &str) -> DaemonFiles {
    DaemonFiles::new(store.sessions.session_dir(session))
}

fn send(store: &JuggleStore, session: &str, command: ControlCommand) -> Result<()> {
    files_for(store, session).write_control(&command)?;
    println!("sent {command:?} to '{session}'");
    Ok(())
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
