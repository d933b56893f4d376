//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod answer;
pub mod comment;
pub mod init;
pub mod question;
pub mod schema;
pub mod user;
pub mod vote;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use qf_core::config::{sqlite_url, Config};
use qf_storage::ForumStore;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// qforum - Q&A forum backend
#[derive(Debug, Parser)]
#[command(name = "qforum")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "QFORUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database URL or SQLite file path
    #[arg(short, long, global = true, env = "QFORUM_DATABASE")]
    pub database: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default configuration and install the schema
    Init(init::InitArgs),

    /// Print the schema DDL
    Schema(schema::SchemaArgs),

    /// Manage users
    #[command(subcommand)]
    User(user::UserCommand),

    /// Manage questions
    #[command(subcommand)]
    Question(question::QuestionCommand),

    /// Manage answers
    #[command(subcommand)]
    Answer(answer::AnswerCommand),

    /// Manage comments
    #[command(subcommand)]
    Comment(comment::CommentCommand),

    /// Vote on questions and answers
    #[command(subcommand)]
    Vote(vote::VoteCommand),
}

/// Resolved configuration for one invocation
#[derive(Debug)]
pub struct Context {
    pub config_path: PathBuf,
    pub config: Config,
}

impl Context {
    /// Load the config file, then apply the `--database` override
    pub fn load(config: Option<PathBuf>, database: Option<String>) -> Result<Self> {
        let config_path = match config {
            Some(path) => path,
            None => default_config_path(),
        };
        let mut config = Config::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        if let Some(database) = database {
            config.database.url = Some(database_url(&database));
        }
        debug!("Using config {:?}, database {:?}", config_path, config.database.url);

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Open the store, installing the schema if needed
    pub async fn open_store(&self) -> Result<ForumStore> {
        ForumStore::open(&self.config)
            .await
            .context("Failed to open forum database")
    }
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Schema output needs neither config nor database
    let command = cli.command;
    if let Commands::Schema(args) = command {
        return schema::execute(args);
    }

    let ctx = Context::load(cli.config, cli.database)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async move {
        if let Commands::Init(args) = command {
            return init::execute(&ctx, args).await;
        }

        let store = ctx.open_store().await?;
        let result = match command {
            Commands::User(cmd) => user::execute(&store, cmd).await,
            Commands::Question(cmd) => question::execute(&store, &ctx.config, cmd).await,
            Commands::Answer(cmd) => answer::execute(&store, cmd).await,
            Commands::Comment(cmd) => comment::execute(&store, cmd).await,
            Commands::Vote(cmd) => vote::execute(&store, cmd).await,
            Commands::Init(_) | Commands::Schema(_) => Ok(()),
        };
        let closed = store.close().await;
        settle(result, closed)
    })
}

/// Report the command's own error ahead of a failure to close the store
fn settle(result: Result<()>, closed: qf_core::Result<()>) -> Result<()> {
    match (result, closed) {
        (Err(err), Err(close_err)) => {
            warn!("Failed to close forum database: {}", close_err);
            Err(err)
        }
        (Err(err), Ok(())) => Err(err),
        (Ok(()), closed) => closed.context("Failed to close forum database"),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// `config.toml` in the platform config directory (~/.qforum as fallback)
pub fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("org", "qforum", "qforum")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".qforum")
        })
        .join("config.toml")
}

/// Accept either a full database URL or a path to a SQLite file
pub fn database_url(value: &str) -> String {
    if value.contains("://") || value.starts_with("sqlite:") {
        value.to_string()
    } else {
        sqlite_url(Path::new(value))
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Ask before a destructive action unless `--yes` was given
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}
