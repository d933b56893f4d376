//! Answer command
//!
//! Answer questions, edit or move answers.

use anyhow::{Context as _, Result};
use clap::Subcommand;
use colored::Colorize;

use super::{confirm, print_json};
use qf_core::model::{ContentUpdate, NewAnswer};
use qf_core::{AnswerId, QuestionId, UserId};
use qf_storage::ForumStore;

/// Answer subcommands
#[derive(Debug, Subcommand)]
pub enum AnswerCommand {
    /// Answer a question
    Add {
        /// Question id
        #[arg(long, short)]
        question: i32,

        /// Author's user id
        #[arg(long, short)]
        user: i32,

        /// Answer text
        content: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace an answer's text
    Edit {
        /// Answer id
        id: i32,

        /// New text
        content: String,
    },

    /// Move an answer to another question; without --question it is deleted
    Move {
        /// Answer id
        id: i32,

        /// Target question id
        #[arg(long, short)]
        question: Option<i32>,
    },

    /// Delete an answer with its comments and votes
    Delete {
        /// Answer id
        id: i32,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

/// Execute the answer command
pub async fn execute(store: &ForumStore, cmd: AnswerCommand) -> Result<()> {
    match cmd {
        AnswerCommand::Add {
            question,
            user,
            content,
            json,
        } => {
            let new = NewAnswer::new(QuestionId(question), UserId(user), content);
            add_answer(store, new, json).await
        }
        AnswerCommand::Edit { id, content } => {
            let answer = store
                .answers()
                .update(AnswerId(id), ContentUpdate::new().content(content).touch())
                .await
                .with_context(|| format!("Failed to update answer {}", id))?;
            println!("{} Updated answer {}", "✓".green(), answer.id);
            Ok(())
        }
        AnswerCommand::Move { id, question } => {
            move_answer(store, AnswerId(id), question.map(QuestionId)).await
        }
        AnswerCommand::Delete { id, yes } => {
            let id = AnswerId(id);
            let answer = store.answers().get(id).await?;
            if !yes {
                println!("Answer {}: {}", answer.id.to_string().green(), answer.content);
            }
            if !confirm("Delete this answer?", yes)? {
                println!("Deletion cancelled.");
                return Ok(());
            }
            store.answers().delete(id).await?;
            println!("{} Answer {} deleted.", "✓".green(), id);
            Ok(())
        }
    }
}

async fn add_answer(store: &ForumStore, new: NewAnswer, as_json: bool) -> Result<()> {
    let question_id = new.question_id;
    let answer = store
        .answers()
        .create(new)
        .await
        .with_context(|| format!("Failed to answer question {}", question_id))?;

    if as_json {
        return print_json(&answer);
    }
    println!(
        "{} Created answer {} on question {}",
        "✓".green(),
        answer.id.to_string().cyan(),
        question_id
    );
    Ok(())
}

async fn move_answer(store: &ForumStore, id: AnswerId, target: Option<QuestionId>) -> Result<()> {
    let moved = store
        .answers()
        .reassign(id, target)
        .await
        .with_context(|| format!("Failed to move answer {}", id))?;

    match (moved, target) {
        (Some(_), Some(question)) => {
            println!("{} Moved answer {} to question {}", "✓".green(), id, question)
        }
        _ => println!(
            "{} Answer {} detached from its question and deleted.",
            "✓".green(),
            id
        ),
    }
    Ok(())
}
