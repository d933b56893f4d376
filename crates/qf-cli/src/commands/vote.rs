//! Vote command
//!
//! Record a user's vote on a question or an answer.

use anyhow::{Context as _, Result};
use clap::Subcommand;
use colored::Colorize;

use qf_core::{AnswerId, QuestionId, UserId, VoteTarget};
use qf_storage::ForumStore;

/// Vote subcommands
#[derive(Debug, Subcommand)]
pub enum VoteCommand {
    /// Vote on a question
    Question {
        /// Question id
        id: i32,

        /// Voter's user id
        #[arg(long, short)]
        user: i32,
    },

    /// Vote on an answer
    Answer {
        /// Answer id
        id: i32,

        /// Voter's user id
        #[arg(long, short)]
        user: i32,
    },
}

/// Execute the vote command
pub async fn execute(store: &ForumStore, cmd: VoteCommand) -> Result<()> {
    let (user, target) = match cmd {
        VoteCommand::Question { id, user } => (UserId(user), VoteTarget::Question(QuestionId(id))),
        VoteCommand::Answer { id, user } => (UserId(user), VoteTarget::Answer(AnswerId(id))),
    };

    store
        .votes()
        .vote(user, target)
        .await
        .with_context(|| format!("User {} could not vote on {}", user, target))?;
    let total = store.votes().count(target).await?;

    println!(
        "{} User {} voted on {} ({} votes)",
        "✓".green(),
        user,
        target,
        total.to_string().yellow()
    );
    Ok(())
}
