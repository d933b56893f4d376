//! Question command
//!
//! Ask, browse, edit and delete questions.

use anyhow::{Context as _, Result};
use clap::Subcommand;
use colored::Colorize;

use super::{confirm, print_json, timestamp};
use qf_core::config::Config;
use qf_core::model::{NewQuestion, QuestionQuery, QuestionUpdate};
use qf_core::{QuestionId, UserId};
use qf_storage::ForumStore;

/// Question subcommands
#[derive(Debug, Subcommand)]
pub enum QuestionCommand {
    /// Ask a question
    Add {
        /// Author's user id
        #[arg(long, short)]
        user: i32,

        #[arg(long, short)]
        subject: String,

        #[arg(long)]
        content: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a question with its answers and comments
    Show {
        /// Question id
        id: i32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List questions, newest first
    List {
        /// Page number, starting at 1
        #[arg(long, short, default_value = "1")]
        page: u64,

        /// Questions per page (default from config)
        #[arg(long)]
        per_page: Option<u64>,

        /// Search subject, content, authors and answers
        #[arg(long, short)]
        keyword: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a question's subject or content
    Edit {
        /// Question id
        id: i32,

        #[arg(long, short)]
        subject: Option<String>,

        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a question with its answers
    Delete {
        /// Question id
        id: i32,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

/// Execute the question command
pub async fn execute(store: &ForumStore, config: &Config, cmd: QuestionCommand) -> Result<()> {
    match cmd {
        QuestionCommand::Add {
            user,
            subject,
            content,
            json,
        } => add_question(store, NewQuestion::new(UserId(user), subject, content), json).await,
        QuestionCommand::Show { id, json } => show_question(store, QuestionId(id), json).await,
        QuestionCommand::List {
            page,
            per_page,
            keyword,
            json,
        } => {
            let mut query = QuestionQuery::new()
                .page(page.saturating_sub(1))
                .per_page(per_page.unwrap_or(config.listing.per_page));
            if let Some(keyword) = keyword {
                query = query.keyword(keyword);
            }
            list_questions(store, &query, json).await
        }
        QuestionCommand::Edit {
            id,
            subject,
            content,
        } => {
            let mut changes = QuestionUpdate::new();
            changes.subject = subject;
            changes.content = content;
            edit_question(store, QuestionId(id), changes).await
        }
        QuestionCommand::Delete { id, yes } => delete_question(store, QuestionId(id), yes).await,
    }
}

async fn add_question(store: &ForumStore, new: NewQuestion, as_json: bool) -> Result<()> {
    let question = store
        .questions()
        .create(new)
        .await
        .context("Failed to create question")?;

    if as_json {
        return print_json(&question);
    }
    println!(
        "{} Created question {}: {}",
        "✓".green(),
        question.id.to_string().cyan(),
        question.subject
    );
    Ok(())
}

async fn show_question(store: &ForumStore, id: QuestionId, as_json: bool) -> Result<()> {
    let question = store.questions().get(id).await?;
    let author = store.users().get(question.user_id).await?;
    let voters = store.questions().voters(id).await?;
    let comments = store.comments().for_question(id).await?;
    let answers = store.answers().for_question(id).await?;

    let mut answer_details = Vec::with_capacity(answers.len());
    for answer in answers {
        let votes = store.answers().voter_count(answer.id).await?;
        let comments = store.comments().for_answer(answer.id).await?;
        answer_details.push((answer, votes, comments));
    }

    if as_json {
        let answers: Vec<_> = answer_details
            .iter()
            .map(|(answer, votes, comments)| {
                serde_json::json!({
                    "answer": answer,
                    "votes": votes,
                    "comments": comments,
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "question": question,
            "author": author,
            "voters": voters,
            "comments": comments,
            "answers": answers,
        }));
    }

    println!("{}", question.subject.bold().underline());
    println!(
        "  {} asked by {} on {}",
        format!("#{}", question.id).green(),
        author.username.cyan(),
        timestamp(&question.create_date)
    );
    if let Some(modified) = &question.modify_date {
        println!("  {}", format!("edited {}", timestamp(modified)).dimmed());
    }
    println!("  Votes: {}", voters.len().to_string().yellow());
    println!();
    println!("{}", question.content);

    for comment in &comments {
        println!("  {} {}", "›".dimmed(), comment.content.dimmed());
    }

    println!();
    println!(
        "{}",
        format!("{} Answers", answer_details.len()).bold()
    );
    for (answer, votes, comments) in &answer_details {
        println!();
        println!(
            "  {} by user {} on {} ({} votes)",
            format!("#{}", answer.id).green(),
            answer.user_id,
            timestamp(&answer.create_date),
            votes.to_string().yellow()
        );
        println!("  {}", answer.content);
        for comment in comments {
            println!("    {} {}", "›".dimmed(), comment.content.dimmed());
        }
    }
    Ok(())
}

async fn list_questions(store: &ForumStore, query: &QuestionQuery, as_json: bool) -> Result<()> {
    let page = store.questions().list(query).await?;

    if as_json {
        return print_json(&page);
    }
    if page.items.is_empty() {
        println!("No questions found.");
        return Ok(());
    }

    println!("{}", "Questions:".bold().underline());
    println!();
    for question in &page.items {
        let answers = store.questions().answer_count(question.id).await?;
        println!(
            "  {} {} {} ({})",
            question.id.to_string().green(),
            question.subject,
            format!("[{} answers]", answers).cyan(),
            timestamp(&question.create_date).dimmed()
        );
    }

    println!(
        "\n  {} Page {} of {} ({} questions)",
        "ℹ".blue(),
        page.page + 1,
        page.page_count().max(1),
        page.total
    );
    if page.has_next() {
        println!("  Use --page {} for more.", page.page + 2);
    }
    Ok(())
}

async fn edit_question(store: &ForumStore, id: QuestionId, changes: QuestionUpdate) -> Result<()> {
    if changes.is_empty() {
        eprintln!(
            "{} Nothing to change. Pass --subject or --content.",
            "⚠".yellow()
        );
        return Ok(());
    }
    let question = store
        .questions()
        .update(id, changes.touch())
        .await
        .with_context(|| format!("Failed to update question {}", id))?;
    println!("{} Updated question {}", "✓".green(), question.id);
    Ok(())
}

async fn delete_question(store: &ForumStore, id: QuestionId, yes: bool) -> Result<()> {
    let question = store.questions().get(id).await?;
    let answers = store.questions().answer_count(id).await?;

    if !yes {
        println!("Question: {} ({})", question.subject.green(), question.id);
        println!("  {} answers will be deleted with it", answers);
    }
    if !confirm("Delete this question?", yes)? {
        println!("Deletion cancelled.");
        return Ok(());
    }

    store.questions().delete(id).await?;
    println!(
        "{} Question {} deleted with {} answers.",
        "✓".green(),
        id,
        answers
    );
    Ok(())
}
