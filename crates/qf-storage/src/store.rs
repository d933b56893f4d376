//! The storage handle

use crate::error::db_err;
use crate::repo::{AnswerRepo, CommentRepo, QuestionRepo, UserRepo, VoteRepo};
use crate::schema;
use qf_core::config::{sqlite_url, Config, DatabaseConfig, UserDeletePolicy};
use qf_core::error::{ForumError, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Database file name inside the data directory
pub const DEFAULT_DATABASE_FILE: &str = "qforum.db";

/// Explicitly constructed handle over the forum database.
///
/// Owns the connection pool. Repositories borrow it for the length of a call.
pub struct ForumStore {
    db: DatabaseConnection,
    user_delete: UserDeletePolicy,
}

impl ForumStore {
    /// Connect, verify foreign key enforcement, and install the schema
    pub async fn open(config: &Config) -> Result<Self> {
        let store = Self::connect(&config.database)
            .await?
            .with_user_delete_policy(config.content.user_delete);
        schema::install(&store.db).await?;
        Ok(store)
    }

    /// Connect without touching the schema
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = match &config.url {
            Some(url) => url.clone(),
            None => sqlite_url(&Self::default_database_path()?),
        };

        let mut options = ConnectOptions::new(url.clone());
        options
            .max_connections(config.max_connections.max(1))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .sqlx_logging(config.sql_logging);

        let db = Database::connect(options).await.map_err(db_err)?;
        debug!("Connected to {}", url);

        if !schema::foreign_keys_enabled(&db).await? {
            return Err(ForumError::Config(format!(
                "foreign key enforcement is off for {}",
                url
            )));
        }

        info!("Opened forum store at {}", url);
        Ok(Self::from_connection(db))
    }

    /// Wrap an existing connection
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            db,
            user_delete: UserDeletePolicy::default(),
        }
    }

    pub fn with_user_delete_policy(mut self, policy: UserDeletePolicy) -> Self {
        self.user_delete = policy;
        self
    }

    /// Database file in the platform data directory (~/.qforum as fallback)
    pub fn default_database_path() -> Result<PathBuf> {
        let data_dir = directories::ProjectDirs::from("org", "qforum", "qforum")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".qforum")
            });

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).map_err(|e| {
                ForumError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create data directory: {}", e),
                ))
            })?;
            debug!("Created data directory: {:?}", data_dir);
        }

        Ok(data_dir.join(DEFAULT_DATABASE_FILE))
    }

    pub fn user_delete_policy(&self) -> UserDeletePolicy {
        self.user_delete
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn users(&self) -> UserRepo<'_> {
        UserRepo::new(&self.db, self.user_delete)
    }

    pub fn questions(&self) -> QuestionRepo<'_> {
        QuestionRepo::new(&self.db)
    }

    pub fn answers(&self) -> AnswerRepo<'_> {
        AnswerRepo::new(&self.db)
    }

    pub fn comments(&self) -> CommentRepo<'_> {
        CommentRepo::new(&self.db)
    }

    pub fn votes(&self) -> VoteRepo<'_> {
        VoteRepo::new(&self.db)
    }

    /// Release the pool
    pub async fn close(self) -> Result<()> {
        self.db.close().await.map_err(db_err)?;
        debug!("Forum store closed");
        Ok(())
    }
}
