//! Task repository for database operations.

use anyhow::Result;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryOrder};

use crate::config::TaskOrder;
use crate::entities::task;

/// Repository for task-related database operations.
pub struct TaskRepository;

impl TaskRepository {
    /// Get all tasks in the requested id order.
    pub async fn get_all<C>(conn: &C, order: TaskOrder) -> Result<Vec<task::Model>>
    where
        C: ConnectionTrait,
    {
        let query = task::Entity::find();
        let query = match order {
            TaskOrder::NewestFirst => query.order_by_desc(task::Column::Id),
            TaskOrder::OldestFirst => query.order_by_asc(task::Column::Id),
        };
        Ok(query.all(conn).await?)
    }

    /// Get a single task by id.
    pub async fn get_by_id<C>(conn: &C, id: i32) -> Result<Option<task::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(task::Entity::find_by_id(id).one(conn).await?)
    }

    /// Check whether a task exists.
    pub async fn exists<C>(conn: &C, id: i32) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        Ok(Self::get_by_id(conn, id).await?.is_some())
    }

    /// Insert a new task and return the stored row.
    pub async fn create<C>(conn: &C, task: task::ActiveModel) -> Result<task::Model>
    where
        C: ConnectionTrait,
    {
        Ok(task.insert(conn).await?)
    }

    /// Update a task in the database.
    pub async fn update<C>(conn: &C, task: task::ActiveModel) -> Result<task::Model>
    where
        C: ConnectionTrait,
    {
        Ok(task.update(conn).await?)
    }

    /// Delete a task row. Comments must already be gone.
    pub async fn delete<C>(conn: &C, task: task::Model) -> Result<()>
    where
        C: ConnectionTrait,
    {
        task.delete(conn).await?;
        Ok(())
    }
}
