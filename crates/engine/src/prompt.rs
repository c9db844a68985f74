// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt synthesis: turns a session and its balls into the single prompt
//! handed to the provider adapter for one iteration.

use jug_core::{Ball, BallState, JugglerError, Result, Session};

const INSTRUCTIONS: &str = "\
Work on exactly one of the balls above. When you are done, emit one of the \
following markers, and nothing after it:\n\
  <promise>COMPLETE</promise> or <promise>COMPLETE: <commit message></promise>\n\
  <promise>CONTINUE</promise> or <promise>CONTINUE: <commit message></promise>\n\
  <promise>BLOCKED: <reason></promise>\n\
Use COMPLETE when every acceptance criterion for the ball is met. Use \
CONTINUE when you made progress but the ball isn't done. Use BLOCKED when \
you cannot make further progress without outside input.";

/// Resolve which balls should be shown to the assistant for one iteration.
///
/// `all_balls` is every ball loaded from the discovered project directories.
/// When `ball_id` is `None`, the session's complete/researched/blocked balls
/// are dropped. When `ball_id` is given, it is resolved by prefix against the
/// session-filtered set and the result is restricted to that single ball.
pub fn select_balls<'a>(all_balls: &'a [Ball], session_id: &str, ball_id: Option<&str>) -> Result<Vec<&'a Ball>> {
    let mut filtered: Vec<&Ball> = all_balls.iter().filter(|b| b.in_session(session_id)).collect();

    match ball_id {
        None => {
            filtered.retain(|b| !matches!(b.state, BallState::Complete | BallState::Researched | BallState::Blocked));
            Ok(filtered)
        }
        Some(id) => {
            if let Some(exact) = filtered.iter().copied().find(|b| b.id.as_str() == id) {
                return Ok(vec![exact]);
            }
            let matches: Vec<&Ball> = filtered.into_iter().filter(|b| b.short_id().starts_with(id)).collect();
            match matches.len() {
                0 => Err(JugglerError::not_found("ball", id)),
                1 => Ok(matches),
                _ => Err(JugglerError::Ambiguous {
                    prefix: id.to_string(),
                    matches: matches.iter().map(|b| b.id.as_str().to_string()).collect(),
                }),
            }
        }
    }
}

/// Render the full prompt for one iteration.
pub fn synthesize(
    session: Option<&Session>,
    session_id: &str,
    balls: &[&Ball],
    debug: bool,
    user_message: Option<&str>,
) -> String {
    let mut out = String::new();
    out.push_str(&render_session_context(session, session_id));
    out.push_str(&render_balls(balls));
    out.push_str(INSTRUCTIONS);
    out.push('\n');
    if debug {
        out.push_str(
            "\n<debug-reasoning>\nExplain your reasoning as you work, before emitting the \
            completion marker.\n</debug-reasoning>\n",
        );
    }
    if let Some(msg) = user_message {
        out.push_str(&format!("\n<user-message>\n{msg}\n</user-message>\n"));
    }
    out
}

fn render_session_context(session: Option<&Session>, session_id: &str) -> String {
    let mut out = format!("<session id=\"{session_id}\">\n");
    if let Some(session) = session {
        if !session.description.is_empty() {
            out.push_str(&format!("{}\n", session.description));
        }
        if let Some(context) = &session.context {
            out.push_str(&format!("{context}\n"));
        }
        if let Some(ac) = &session.acceptance_criteria {
            out.push_str("Acceptance criteria:\n");
            for item in ac {
                out.push_str(&format!("- {item}\n"));
            }
        }
    }
    out.push_str("</session>\n\n");
    out
}

fn render_balls(balls: &[&Ball]) -> String {
    let mut out = String::new();
    for ball in balls {
        out.push_str(&format!("<ball id=\"{}\" state=\"{:?}\">\n", ball.id, ball.state));
        out.push_str(&format!("Title: {}\n", ball.title));
        if !ball.context.is_empty() {
            out.push_str(&format!("Context: {}\n", ball.context));
        }
        if !ball.acceptance_criteria.is_empty() {
            out.push_str("Acceptance criteria:\n");
            for item in &ball.acceptance_criteria {
                out.push_str(&format!("- {item}\n"));
            }
        }
        if let Some(reason) = &ball.blocked_reason {
            out.push_str(&format!("Blocked reason: {reason}\n"));
        }
        out.push_str("</ball>\n\n");
    }
    out
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
