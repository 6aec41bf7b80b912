use log::info;
use sea_orm::{ActiveValue, IntoActiveModel, TransactionTrait};

use crate::api::{CommentView, CreateComment, UpdateComment};
use crate::auth::{authorize_mutation, Caller};
use crate::cascade;
use crate::entities::comment;
use crate::error::{ServiceError, ServiceResult};
use crate::repositories::{CommentRepository, TaskRepository};
use crate::service::{require_text, stored_id, TrackerService};

impl TrackerService {
    /// Creates a comment, optionally as a reply, owned by the caller.
    ///
    /// # Errors
    /// - `Unauthenticated` without identity
    /// - `InvalidInput` for an empty body
    /// - `InvalidReference` if the task does not exist, or the parent comment
    ///   does not exist within that task
    pub async fn create_comment(&self, caller: &Caller, input: CreateComment) -> ServiceResult<CommentView> {
        let owner_id = caller.require_identity()?;
        require_text(&input.body, "comment body")?;

        let task_id = i32::try_from(input.task_id)
            .map_err(|_| ServiceError::InvalidReference(format!("task {} does not exist", input.task_id)))?;
        let parent_comment_id = input
            .parent_comment_id
            .map(|parent_id| {
                i32::try_from(parent_id).map_err(|_| {
                    ServiceError::InvalidReference(format!("comment {} does not exist in task {}", parent_id, task_id))
                })
            })
            .transpose()?;

        let txn = self.storage.conn.begin().await?;
        if !TaskRepository::exists(&txn, task_id).await? {
            return Err(ServiceError::InvalidReference(format!("task {} does not exist", task_id)));
        }
        if let Some(parent_id) = parent_comment_id {
            if !CommentRepository::exists_in_task(&txn, parent_id, task_id).await? {
                return Err(ServiceError::InvalidReference(format!(
                    "comment {} does not exist in task {}",
                    parent_id, task_id
                )));
            }
        }

        let model = CommentRepository::create(
            &txn,
            comment::ActiveModel {
                body: ActiveValue::Set(input.body),
                task_id: ActiveValue::Set(task_id),
                parent_comment_id: ActiveValue::Set(parent_comment_id),
                is_edited: ActiveValue::Set(false),
                owner_id: ActiveValue::Set(owner_id.to_string()),
                ..Default::default()
            },
        )
        .await?;
        txn.commit().await?;

        info!("Comment {} on task {} created by {}", model.id, task_id, owner_id);
        Ok(model.into())
    }

    /// Returns the comment forest of a task.
    pub async fn list_comments_for_task(&self, caller: &Caller, task_id: i64) -> ServiceResult<Vec<CommentView>> {
        caller.require_identity()?;
        let task_id = stored_id(task_id, "task")?;

        let txn = self.storage.conn.begin().await?;
        if !TaskRepository::exists(&txn, task_id).await? {
            return Err(ServiceError::NotFound(format!("task {}", task_id)));
        }
        let forest = Self::load_forest(&txn, task_id).await?;
        txn.commit().await?;

        Ok(forest)
    }

    /// Replaces a comment body on behalf of the owner or an admin and marks it edited.
    pub async fn update_comment(&self, caller: &Caller, id: i64, update: UpdateComment) -> ServiceResult<CommentView> {
        let caller_id = caller.require_identity()?;
        require_text(&update.body, "comment body")?;
        let id = stored_id(id, "comment")?;

        let txn = self.storage.conn.begin().await?;
        let model = CommentRepository::get_by_id(&txn, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("comment {}", id)))?;
        authorize_mutation(caller, &model.owner_id, &format!("comment {}", id))?;

        let mut active_model: comment::ActiveModel = model.into_active_model();
        active_model.body = ActiveValue::Set(update.body);
        active_model.is_edited = ActiveValue::Set(true);
        let model = CommentRepository::update(&txn, active_model).await?;
        txn.commit().await?;

        info!("Comment {} updated by {}", id, caller_id);
        Ok(model.into())
    }

    /// Deletes a comment and every reply beneath it.
    ///
    /// Returns the number of comments removed, the target included.
    pub async fn delete_comment(&self, caller: &Caller, id: i64) -> ServiceResult<u64> {
        let caller_id = caller.require_identity()?;
        let id = stored_id(id, "comment")?;

        let txn = self.storage.conn.begin().await?;
        let model = CommentRepository::get_by_id(&txn, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("comment {}", id)))?;
        authorize_mutation(caller, &model.owner_id, &format!("comment {}", id))?;

        let removed = cascade::delete_subtree(&txn, id).await?;
        txn.commit().await?;

        info!("Comment {} deleted by {} ({} removed)", id, caller_id, removed);
        Ok(removed)
    }
}
