//! Comment command
//!
//! Comment on questions and answers.

use anyhow::{Context as _, Result};
use clap::Subcommand;
use colored::Colorize;

use super::{print_json, timestamp};
use qf_core::model::{Comment, NewComment};
use qf_core::{AnswerId, CommentAttachment, CommentId, QuestionId, UserId};
use qf_storage::ForumStore;

/// Comment subcommands
#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// Write a comment
    Add {
        /// Author's user id
        #[arg(long, short)]
        user: i32,

        /// Question the comment is on
        #[arg(long, short)]
        question: Option<i32>,

        /// Answer the comment is on
        #[arg(long, short)]
        answer: Option<i32>,

        /// Comment text
        content: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List comments on a question, an answer, or by a user
    List {
        #[arg(long, short)]
        question: Option<i32>,

        #[arg(long, short)]
        answer: Option<i32>,

        #[arg(long, short)]
        user: Option<i32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a comment
    Delete {
        /// Comment id
        id: i32,
    },
}

/// Execute the comment command
pub async fn execute(store: &ForumStore, cmd: CommentCommand) -> Result<()> {
    match cmd {
        CommentCommand::Add {
            user,
            question,
            answer,
            content,
            json,
        } => {
            let new = NewComment {
                user_id: UserId(user),
                content,
                question_id: question.map(QuestionId),
                answer_id: answer.map(AnswerId),
            };
            add_comment(store, new, json).await
        }
        CommentCommand::List {
            question,
            answer,
            user,
            json,
        } => {
            let comments = match (question, answer, user) {
                (Some(id), _, _) => store.comments().for_question(QuestionId(id)).await?,
                (_, Some(id), _) => store.comments().for_answer(AnswerId(id)).await?,
                (_, _, Some(id)) => store.comments().by_user(UserId(id)).await?,
                (None, None, None) => {
                    anyhow::bail!("Pass one of --question, --answer or --user")
                }
            };
            list_comments(&comments, json)
        }
        CommentCommand::Delete { id } => {
            store
                .comments()
                .delete(CommentId(id))
                .await
                .with_context(|| format!("Failed to delete comment {}", id))?;
            println!("{} Comment {} deleted.", "✓".green(), id);
            Ok(())
        }
    }
}

async fn add_comment(store: &ForumStore, new: NewComment, as_json: bool) -> Result<()> {
    let comment = store
        .comments()
        .create(new)
        .await
        .context("Failed to create comment")?;

    if as_json {
        return print_json(&comment);
    }
    println!(
        "{} Created comment {} ({})",
        "✓".green(),
        comment.id.to_string().cyan(),
        describe(comment.attachment())
    );
    Ok(())
}

fn describe(attachment: CommentAttachment) -> String {
    match attachment {
        CommentAttachment::Question(id) => format!("on question {}", id),
        CommentAttachment::Answer(id) => format!("on answer {}", id),
        CommentAttachment::Both { question, answer } => {
            format!("on question {} and answer {}", question, answer)
        }
        CommentAttachment::Detached => "detached".to_string(),
    }
}

fn list_comments(comments: &[Comment], as_json: bool) -> Result<()> {
    if as_json {
        return print_json(&comments);
    }
    if comments.is_empty() {
        println!("No comments found.");
        return Ok(());
    }

    for comment in comments {
        println!(
            "  {} user {} {} {}",
            comment.id.to_string().green(),
            comment.user_id,
            timestamp(&comment.create_date).dimmed(),
            describe(comment.attachment()).dimmed()
        );
        println!("    {}", comment.content);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_attachment() {
        assert_eq!(describe(CommentAttachment::Detached), "detached");
        assert_eq!(
            describe(CommentAttachment::Question(QuestionId(3))),
            "on question 3"
        );
        assert_eq!(
            describe(CommentAttachment::Both {
                question: QuestionId(1),
                answer: AnswerId(2)
            }),
            "on question 1 and answer 2"
        );
    }
}
