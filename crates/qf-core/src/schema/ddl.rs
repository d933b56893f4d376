//! SQLite DDL rendering

use super::naming;
use super::tables::{TableDef, TABLES};

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn column_list(columns: &[&str]) -> String {
    columns.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", ")
}

/// `CREATE TABLE` statement with every constraint named
pub fn create_table(table: &TableDef) -> String {
    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|c| {
            let null = if c.nullable { "" } else { " NOT NULL" };
            format!("    {} {}{}", quote(c.name), c.sql_type.sql(), null)
        })
        .collect();

    lines.push(format!(
        "    CONSTRAINT {} PRIMARY KEY ({})",
        quote(&naming::primary_key_name(table.name)),
        column_list(table.primary_key)
    ));

    for c in table.columns.iter().filter(|c| c.unique) {
        lines.push(format!(
            "    CONSTRAINT {} UNIQUE ({})",
            quote(&naming::unique_name(table.name, c.name)),
            quote(c.name)
        ));
    }

    for c in table.columns {
        if let Some(max) = c.sql_type.max_len() {
            lines.push(format!(
                "    CONSTRAINT {} CHECK (length({}) <= {})",
                quote(&naming::check_name(table.name, c.name)),
                quote(c.name),
                max
            ));
        }
    }

    for fk in table.foreign_keys {
        lines.push(format!(
            "    CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE CASCADE",
            quote(&naming::foreign_key_name(table.name, fk.column, fk.references)),
            quote(fk.column),
            quote(fk.references),
            quote(fk.referenced_column)
        ));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        quote(table.name),
        lines.join(",\n")
    )
}

/// `CREATE INDEX` statements for a table's foreign key columns
pub fn create_indexes(table: &TableDef) -> Vec<String> {
    table
        .indexed_columns()
        .map(|column| {
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                quote(&naming::index_name(table.name, column)),
                quote(table.name),
                quote(column)
            )
        })
        .collect()
}

/// Full schema, in execution order
pub fn render_ddl() -> Vec<String> {
    TABLES
        .iter()
        .flat_map(|t| std::iter::once(create_table(t)).chain(create_indexes(t)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{ANSWER, QUESTION_VOTER, USER};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_user_table_constraints() {
        let sql = create_table(&USER);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"user\" ("));
        assert!(sql.contains("\"username\" VARCHAR(150) NOT NULL"));
        assert!(sql.contains("CONSTRAINT \"pk_user\" PRIMARY KEY (\"id\")"));
        assert!(sql.contains("CONSTRAINT \"uq_user_username\" UNIQUE (\"username\")"));
        assert!(sql.contains("CONSTRAINT \"uq_user_email\" UNIQUE (\"email\")"));
        assert!(sql.contains("CONSTRAINT \"ck_user_email\" CHECK (length(\"email\") <= 120)"));
        assert!(!sql.contains("FOREIGN KEY"));
    }

    #[test]
    fn test_answer_foreign_keys() {
        let sql = create_table(&ANSWER);
        assert!(sql.contains("\"question_id\" INTEGER,"));
        assert!(sql.contains(
            "CONSTRAINT \"fk_answer_question_id_question\" FOREIGN KEY (\"question_id\") \
             REFERENCES \"question\" (\"id\") ON DELETE CASCADE"
        ));
        assert!(sql.contains("CONSTRAINT \"fk_answer_user_id_user\""));
    }

    #[test]
    fn test_association_composite_key() {
        let sql = create_table(&QUESTION_VOTER);
        assert!(sql.contains(
            "CONSTRAINT \"pk_question_voter\" PRIMARY KEY (\"user_id\", \"question_id\")"
        ));
        assert_eq!(
            create_indexes(&QUESTION_VOTER),
            vec![
                "CREATE INDEX IF NOT EXISTS \"ix_question_voter_question_id\" \
                 ON \"question_voter\" (\"question_id\")"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_every_foreign_key_cascades() {
        for sql in render_ddl().iter().filter(|s| s.starts_with("CREATE TABLE")) {
            let fks = sql.matches("FOREIGN KEY").count();
            assert_eq!(sql.matches("ON DELETE CASCADE").count(), fks);
        }
    }

    #[test]
    fn test_render_ddl_counts() {
        let ddl = render_ddl();
        let tables = ddl.iter().filter(|s| s.starts_with("CREATE TABLE")).count();
        let indexes = ddl.iter().filter(|s| s.starts_with("CREATE INDEX")).count();
        assert_eq!(tables, 6);
        // question 1, answer 2, comment 3, each voter table 1
        assert_eq!(indexes, 8);
        assert!(ddl[0].contains("\"user\""));
    }
}
