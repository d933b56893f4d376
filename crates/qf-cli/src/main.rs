//! qforum - Q&A forum backend CLI
//!
//! Administers a forum database: users, questions, answers, comments and
//! votes, with the relational schema and its cascades enforced by SQLite.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default config and install the schema
//! qforum init
//!
//! # Register a user and ask a question
//! qforum user add alice --email alice@example.com --password <hash>
//! qforum question add --user 1 --subject "Borrow checker" --content "Why?"
//!
//! # Browse
//! qforum question list --keyword borrow
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
