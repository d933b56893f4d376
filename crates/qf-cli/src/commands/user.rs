//! User command
//!
//! Manage forum users.

use anyhow::{Context as _, Result};
use clap::Subcommand;
use colored::Colorize;

use super::{confirm, print_json};
use qf_core::model::{NewUser, User, UserUpdate};
use qf_core::UserId;
use qf_storage::ForumStore;

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register a user
    Add {
        /// Unique username
        username: String,

        /// Unique email address
        #[arg(long, short)]
        email: String,

        /// Password hash to store
        #[arg(long, short)]
        password: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a user by id or username
    Show {
        /// User id or username
        user: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all users
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a user's username, email or password hash
    Edit {
        /// User id
        id: i32,

        #[arg(long, short)]
        username: Option<String>,

        #[arg(long, short)]
        email: Option<String>,

        #[arg(long, short)]
        password: Option<String>,
    },

    /// Delete a user
    Delete {
        /// User id
        id: i32,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

/// Execute the user command
pub async fn execute(store: &ForumStore, cmd: UserCommand) -> Result<()> {
    match cmd {
        UserCommand::Add {
            username,
            email,
            password,
            json,
        } => add_user(store, NewUser::new(username, password, email), json).await,
        UserCommand::Show { user, json } => show_user(store, &user, json).await,
        UserCommand::List { json } => list_users(store, json).await,
        UserCommand::Edit {
            id,
            username,
            email,
            password,
        } => {
            let mut changes = UserUpdate::new();
            changes.username = username;
            changes.email = email;
            changes.password = password;
            edit_user(store, UserId(id), changes).await
        }
        UserCommand::Delete { id, yes } => delete_user(store, UserId(id), yes).await,
    }
}

async fn add_user(store: &ForumStore, new: NewUser, as_json: bool) -> Result<()> {
    let username = new.username.clone();
    let user = store
        .users()
        .create(new)
        .await
        .with_context(|| format!("Failed to create user '{}'", username))?;

    if as_json {
        return print_json(&user);
    }
    println!(
        "{} Created user {} ({})",
        "✓".green(),
        user.id.to_string().cyan(),
        user.username
    );
    Ok(())
}

/// Look a user up by numeric id, falling back to username
async fn resolve_user(store: &ForumStore, key: &str) -> Result<User> {
    let found = match key.parse::<i32>() {
        Ok(id) => store.users().find(UserId(id)).await?,
        Err(_) => None,
    };
    let found = match found {
        Some(user) => Some(user),
        None => store.users().find_by_username(key).await?,
    };
    found.with_context(|| format!("User '{}' not found", key))
}

async fn show_user(store: &ForumStore, key: &str, as_json: bool) -> Result<()> {
    let user = resolve_user(store, key).await?;
    let counts = store.users().authored_counts(user.id).await?;

    if as_json {
        return print_json(&serde_json::json!({
            "user": user,
            "authored": counts,
        }));
    }

    println!("{}", "User Details".bold().underline());
    println!();
    println!("  ID: {}", user.id.to_string().green());
    println!("  Username: {}", user.username);
    println!("  Email: {}", user.email);
    println!();
    println!("{}", "Authored".bold());
    println!("  Questions: {}", counts.questions.to_string().cyan());
    println!("  Answers: {}", counts.answers.to_string().cyan());
    println!("  Comments: {}", counts.comments.to_string().cyan());
    Ok(())
}

async fn list_users(store: &ForumStore, as_json: bool) -> Result<()> {
    let users = store.users().list().await?;

    if as_json {
        return print_json(&users);
    }
    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("{}", "Users:".bold().underline());
    println!();
    for user in &users {
        println!(
            "  {} {} {}",
            user.id.to_string().green(),
            user.username,
            format!("<{}>", user.email).dimmed()
        );
    }
    Ok(())
}

async fn edit_user(store: &ForumStore, id: UserId, changes: UserUpdate) -> Result<()> {
    if changes.is_empty() {
        eprintln!(
            "{} Nothing to change. Pass --username, --email or --password.",
            "⚠".yellow()
        );
        return Ok(());
    }
    let user = store
        .users()
        .update(id, changes)
        .await
        .with_context(|| format!("Failed to update user {}", id))?;
    println!("{} Updated user {} ({})", "✓".green(), user.id, user.username);
    Ok(())
}

async fn delete_user(store: &ForumStore, id: UserId, yes: bool) -> Result<()> {
    let user = store.users().get(id).await?;
    let counts = store.users().authored_counts(id).await?;

    if !yes {
        println!("User: {} ({})", user.username.green(), user.id);
        println!(
            "  {} questions, {} answers, {} comments",
            counts.questions, counts.answers, counts.comments
        );
    }
    if !confirm("Delete this user?", yes)? {
        println!("Deletion cancelled.");
        return Ok(());
    }

    store
        .users()
        .delete(id)
        .await
        .with_context(|| format!("Failed to delete user '{}'", user.username))?;
    println!("{} User '{}' deleted.", "✓".green(), user.username);
    Ok(())
}
