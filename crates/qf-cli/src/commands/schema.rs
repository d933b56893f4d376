//! Schema command
//!
//! Print the DDL that `init` installs.

use anyhow::Result;
use clap::Args;
use qf_core::schema::{create_indexes, create_table, render_ddl, table, NAMING_CONVENTION};

/// Arguments for the schema command
#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Only print statements for this table
    #[arg(long, short)]
    pub table: Option<String>,

    /// Print the constraint naming convention instead
    #[arg(long)]
    pub naming: bool,
}

/// Execute the schema command
pub fn execute(args: SchemaArgs) -> Result<()> {
    if args.naming {
        for (kind, template) in NAMING_CONVENTION {
            println!("{:<4} {}", kind.to_string(), template);
        }
        return Ok(());
    }

    let statements = match &args.table {
        Some(name) => {
            let def = table(name).ok_or_else(|| anyhow::anyhow!("Unknown table: {}", name))?;
            let mut statements = vec![create_table(def)];
            statements.extend(create_indexes(def));
            statements
        }
        None => render_ddl(),
    };

    for sql in statements {
        println!("{};", sql);
    }
    Ok(())
}
