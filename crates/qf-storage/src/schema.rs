//! Schema installation

use crate::error::db_err;
use qf_core::error::Result;
use qf_core::schema::render_ddl;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement, TransactionTrait};
use tracing::{debug, info};

/// Create all tables and indexes that do not exist yet.
///
/// Runs in one transaction; calling it on an installed database is a no-op.
pub async fn install(db: &DatabaseConnection) -> Result<()> {
    let txn = db.begin().await.map_err(db_err)?;
    let statements = render_ddl();
    for sql in &statements {
        debug!("{}", sql);
        txn.execute_unprepared(sql).await.map_err(db_err)?;
    }
    txn.commit().await.map_err(db_err)?;
    info!("Schema installed ({} statements)", statements.len());
    Ok(())
}

/// Whether the connection enforces foreign keys.
///
/// Cascades and reference checks all depend on it.
pub async fn foreign_keys_enabled(db: &DatabaseConnection) -> Result<bool> {
    let row = db
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            "PRAGMA foreign_keys".to_string(),
        ))
        .await
        .map_err(db_err)?;

    match row {
        Some(row) => Ok(row.try_get::<i64>("", "foreign_keys").map_err(db_err)? == 1),
        None => Ok(false),
    }
}

/// Names of the tables present in the database
pub async fn installed_tables(db: &DatabaseConnection) -> Result<Vec<String>> {
    let rows = db
        .query_all(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type = 'table' \
             AND name NOT LIKE 'sqlite_%' ORDER BY name"
                .to_string(),
        ))
        .await
        .map_err(db_err)?;

    rows.iter()
        .map(|row| row.try_get::<String>("", "name").map_err(db_err))
        .collect()
}

/// Names of the indexes and named constraints SQLite tracks for a table
pub async fn index_names(db: &DatabaseConnection, table: &str) -> Result<Vec<String>> {
    let rows = db
        .query_all(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = ? ORDER BY name",
            [table.into()],
        ))
        .await
        .map_err(db_err)?;

    rows.iter()
        .map(|row| row.try_get::<String>("", "name").map_err(db_err))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestStore;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_install_creates_all_tables() {
        let t = TestStore::new().await;
        let tables = installed_tables(t.connection()).await.unwrap();
        assert_eq!(
            tables,
            vec!["answer", "answer_voter", "comment", "question", "question_voter", "user"]
        );
    }

    #[tokio::test]
    async fn test_install_is_idempotent() {
        let t = TestStore::new().await;
        install(t.connection()).await.unwrap();
        install(t.connection()).await.unwrap();
        assert_eq!(installed_tables(t.connection()).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let t = TestStore::new().await;
        assert!(foreign_keys_enabled(t.connection()).await.unwrap());
    }

    #[tokio::test]
    async fn test_indexes_follow_naming_convention() {
        let t = TestStore::new().await;
        let names = index_names(t.connection(), "comment").await.unwrap();
        assert!(names.contains(&"ix_comment_user_id".to_string()));
        assert!(names.contains(&"ix_comment_question_id".to_string()));
        assert!(names.contains(&"ix_comment_answer_id".to_string()));
    }
}
