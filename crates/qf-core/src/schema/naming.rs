//! Constraint naming convention
//!
//! Every index and constraint in the schema gets a deterministic name built
//! from a per-kind template, so that schema diffs stay stable between runs.

use std::fmt;

/// Kind of named schema object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintType {
    Index,
    Unique,
    Check,
    ForeignKey,
    PrimaryKey,
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConstraintType::Index => "ix",
            ConstraintType::Unique => "uq",
            ConstraintType::Check => "ck",
            ConstraintType::ForeignKey => "fk",
            ConstraintType::PrimaryKey => "pk",
        };
        f.write_str(s)
    }
}

/// Name templates, one per constraint type
pub const NAMING_CONVENTION: [(ConstraintType, &str); 5] = [
    (ConstraintType::Index, "ix_%(column_0_label)s"),
    (ConstraintType::Unique, "uq_%(table_name)s_%(column_0_name)s"),
    (ConstraintType::Check, "ck_%(table_name)s_%(column_0_name)s"),
    (
        ConstraintType::ForeignKey,
        "fk_%(table_name)s_%(column_0_name)s_%(referred_table_name)s",
    ),
    (ConstraintType::PrimaryKey, "pk_%(table_name)s"),
];

/// Values substituted into a template
#[derive(Debug, Clone, Copy, Default)]
pub struct NameParts<'a> {
    pub table: &'a str,
    /// First column of the constraint
    pub column: Option<&'a str>,
    pub referred_table: Option<&'a str>,
}

impl<'a> NameParts<'a> {
    pub fn table(table: &'a str) -> Self {
        Self {
            table,
            ..Self::default()
        }
    }

    pub fn column(mut self, column: &'a str) -> Self {
        self.column = Some(column);
        self
    }

    pub fn referred(mut self, referred_table: &'a str) -> Self {
        self.referred_table = Some(referred_table);
        self
    }
}

/// Template for a constraint type
pub fn template(kind: ConstraintType) -> &'static str {
    NAMING_CONVENTION
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, t)| *t)
        .unwrap_or("%(table_name)s")
}

/// Render the name of a constraint
pub fn render(kind: ConstraintType, parts: NameParts<'_>) -> String {
    let column = parts.column.unwrap_or_default();
    let label = if column.is_empty() {
        parts.table.to_string()
    } else {
        format!("{}_{}", parts.table, column)
    };

    template(kind)
        .replace("%(column_0_label)s", &label)
        .replace("%(table_name)s", parts.table)
        .replace("%(column_0_name)s", column)
        .replace("%(referred_table_name)s", parts.referred_table.unwrap_or_default())
}

pub fn index_name(table: &str, column: &str) -> String {
    render(ConstraintType::Index, NameParts::table(table).column(column))
}

pub fn unique_name(table: &str, column: &str) -> String {
    render(ConstraintType::Unique, NameParts::table(table).column(column))
}

pub fn check_name(table: &str, column: &str) -> String {
    render(ConstraintType::Check, NameParts::table(table).column(column))
}

pub fn foreign_key_name(table: &str, column: &str, referred_table: &str) -> String {
    render(
        ConstraintType::ForeignKey,
        NameParts::table(table).column(column).referred(referred_table),
    )
}

pub fn primary_key_name(table: &str) -> String {
    render(ConstraintType::PrimaryKey, NameParts::table(table))
}
