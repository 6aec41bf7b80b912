use anyhow::{Context, Result};
use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Schema};
use std::time::Duration;

use crate::config::StorageConfig;
use crate::entities::{comment, task};

/// In-memory SQLite gives every pooled connection its own database.
const MEMORY_MARKERS: [&str; 2] = [":memory:", "mode=memory"];
const PINNED_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Relational store holding tasks and comments
pub struct LocalStorage {
    pub conn: DatabaseConnection,
}

impl LocalStorage {
    /// Connect using the storage configuration and create the schema if needed
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let in_memory = MEMORY_MARKERS.iter().any(|marker| config.database_url.contains(marker));

        let mut options = ConnectOptions::new(config.database_url.clone());
        options.sqlx_logging(false);
        if in_memory {
            // A single connection that never gets recycled keeps the data alive
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(PINNED_CONNECTION_LIFETIME)
                .max_lifetime(PINNED_CONNECTION_LIFETIME);
        } else {
            options.max_connections(config.max_connections).min_connections(1);
        }

        let conn = Database::connect(options)
            .await
            .with_context(|| format!("Failed to connect to {}", config.database_url))?;

        let storage = LocalStorage { conn };
        storage.init_schema().await?;

        Ok(storage)
    }

    /// Fresh in-memory store, used by tests and the default configuration
    pub async fn in_memory() -> Result<Self> {
        Self::new(&StorageConfig::default()).await
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        let tables = [
            schema.create_table_from_entity(task::Entity).if_not_exists().to_owned(),
            schema.create_table_from_entity(comment::Entity).if_not_exists().to_owned(),
        ];
        for table in &tables {
            self.conn
                .execute(backend.build(table))
                .await
                .context("Failed to create table")?;
        }

        let indexes = [
            Index::create()
                .if_not_exists()
                .name("idx_comments_task_id")
                .table(comment::Entity)
                .col(comment::Column::TaskId)
                .to_owned(),
            Index::create()
                .if_not_exists()
                .name("idx_comments_parent_comment_id")
                .table(comment::Entity)
                .col(comment::Column::ParentCommentId)
                .to_owned(),
        ];
        for index in &indexes {
            self.conn
                .execute(backend.build(index))
                .await
                .context("Failed to create index")?;
        }

        Ok(())
    }

    /// Check if the database has any data
    pub async fn has_data(&self) -> Result<bool> {
        let count = task::Entity::find().count(&self.conn).await?;
        Ok(count > 0)
    }

    /// Clear all data from the database
    pub async fn clear_all_data(&self) -> Result<()> {
        comment::Entity::delete_many().exec(&self.conn).await?;
        task::Entity::delete_many().exec(&self.conn).await?;
        Ok(())
    }
}
