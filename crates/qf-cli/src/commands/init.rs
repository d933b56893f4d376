//! Init command
//!
//! Write a default configuration and install the schema.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use std::fs;

use super::Context;
use qf_storage::schema::installed_tables;

/// Arguments for the init command
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Execute the init command
pub async fn execute(ctx: &Context, args: InitArgs) -> Result<()> {
    let config_path = &ctx.config_path;

    if config_path.exists() && !args.force {
        eprintln!(
            "{} Configuration already exists at {}. Use --force to overwrite.",
            "⚠".yellow(),
            config_path.display()
        );
    } else {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory {}", parent.display())
                })?;
            }
        }
        let text = ctx.config.to_toml_string()?;
        fs::write(config_path, text).context("Failed to write config.toml")?;
        println!(
            "{} Wrote configuration to {}",
            "✓".green(),
            config_path.display()
        );
    }

    let store = ctx.open_store().await?;
    let tables = installed_tables(store.connection()).await?;
    store.close().await?;

    println!(
        "{} Schema installed ({} tables: {})",
        "✓".green(),
        tables.len(),
        tables.join(", ")
    );
    println!("\n{}", "Next steps:".bold());
    println!("  1. Register a user:");
    println!(
        "     {}",
        "qforum user add <name> --email <email> --password <hash>".cyan()
    );
    println!("  2. Ask a question:");
    println!(
        "     {}",
        "qforum question add --user <id> --subject <text> --content <text>".cyan()
    );

    Ok(())
}
