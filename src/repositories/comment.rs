//! Comment repository for database operations.

use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::comment;

/// Repository for comment-related database operations.
pub struct CommentRepository;

impl CommentRepository {
    /// Get every comment of a task as a flat list, ascending by id.
    pub async fn get_for_task<C>(conn: &C, task_id: i32) -> Result<Vec<comment::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(comment::Entity::find()
            .filter(comment::Column::TaskId.eq(task_id))
            .order_by_asc(comment::Column::Id)
            .all(conn)
            .await?)
    }

    /// Get every comment in the store, ascending by id.
    pub async fn get_all<C>(conn: &C) -> Result<Vec<comment::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(comment::Entity::find().order_by_asc(comment::Column::Id).all(conn).await?)
    }

    /// Get a single comment by id.
    pub async fn get_by_id<C>(conn: &C, id: i32) -> Result<Option<comment::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(comment::Entity::find_by_id(id).one(conn).await?)
    }

    /// Check whether a comment exists inside the given task.
    pub async fn exists_in_task<C>(conn: &C, id: i32, task_id: i32) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        let count = comment::Entity::find()
            .filter(comment::Column::Id.eq(id))
            .filter(comment::Column::TaskId.eq(task_id))
            .count(conn)
            .await?;
        Ok(count > 0)
    }

    /// Ids of the direct replies to any comment in `parent_ids`, ascending.
    pub async fn get_child_ids<C>(conn: &C, parent_ids: &[i32]) -> Result<Vec<i32>>
    where
        C: ConnectionTrait,
    {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(comment::Entity::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::ParentCommentId.is_in(parent_ids.iter().copied()))
            .order_by_asc(comment::Column::Id)
            .into_tuple::<i32>()
            .all(conn)
            .await?)
    }

    /// Insert a new comment and return the stored row.
    pub async fn create<C>(conn: &C, comment: comment::ActiveModel) -> Result<comment::Model>
    where
        C: ConnectionTrait,
    {
        Ok(comment.insert(conn).await?)
    }

    /// Update a comment in the database.
    pub async fn update<C>(conn: &C, comment: comment::ActiveModel) -> Result<comment::Model>
    where
        C: ConnectionTrait,
    {
        Ok(comment.update(conn).await?)
    }

    /// Delete the comments with the given ids and report how many rows went away.
    pub async fn delete_ids<C>(conn: &C, ids: &[i32]) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = comment::Entity::delete_many()
            .filter(comment::Column::Id.is_in(ids.iter().copied()))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Delete every comment of a task and report how many rows went away.
    pub async fn delete_for_task<C>(conn: &C, task_id: i32) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let result = comment::Entity::delete_many()
            .filter(comment::Column::TaskId.eq(task_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}
