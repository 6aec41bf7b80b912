use log::info;
use sea_orm::{ActiveModelTrait, ActiveValue, IntoActiveModel, TransactionTrait};
use std::collections::HashMap;

use crate::api::{CreateTask, TaskView, UpdateTask};
use crate::auth::{authorize_mutation, Caller};
use crate::entities::task;
use crate::error::{ServiceError, ServiceResult};
use crate::repositories::{CommentRepository, TaskRepository};
use crate::service::{require_text, stored_id, TrackerService};
use crate::tree;

impl TrackerService {
    /// Creates a task owned by the caller.
    ///
    /// # Errors
    /// `Unauthenticated` without identity, then `InvalidInput` for an empty title.
    pub async fn create_task(&self, caller: &Caller, input: CreateTask) -> ServiceResult<TaskView> {
        let owner_id = caller.require_identity()?;
        require_text(&input.title, "title")?;

        let model = TaskRepository::create(
            &self.storage.conn,
            task::ActiveModel {
                title: ActiveValue::Set(input.title),
                description: ActiveValue::Set(input.description),
                is_completed: ActiveValue::Set(false),
                owner_id: ActiveValue::Set(owner_id.to_string()),
                ..Default::default()
            },
        )
        .await?;

        info!("Task {} created by {}", model.id, owner_id);
        Ok(TaskView::from_model(model, Vec::new()))
    }

    /// Lists every task with its comment forest, in the configured order.
    pub async fn list_tasks(&self, caller: &Caller) -> ServiceResult<Vec<TaskView>> {
        caller.require_identity()?;

        // One read transaction so a concurrent cascade is seen whole or not at all
        let txn = self.storage.conn.begin().await?;
        let tasks = TaskRepository::get_all(&txn, self.task_order).await?;
        let comments = CommentRepository::get_all(&txn).await?;
        txn.commit().await?;

        let mut by_task: HashMap<i32, Vec<_>> = HashMap::new();
        for comment in comments {
            by_task.entry(comment.task_id).or_default().push(comment);
        }

        Ok(tasks
            .into_iter()
            .map(|model| {
                let forest = tree::build_forest(by_task.remove(&model.id).unwrap_or_default());
                TaskView::from_model(model, forest)
            })
            .collect())
    }

    /// Fetches one task with its comment forest.
    pub async fn get_task(&self, caller: &Caller, id: i64) -> ServiceResult<TaskView> {
        caller.require_identity()?;
        let id = stored_id(id, "task")?;

        let txn = self.storage.conn.begin().await?;
        let model = TaskRepository::get_by_id(&txn, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("task {}", id)))?;
        let forest = Self::load_forest(&txn, id).await?;
        txn.commit().await?;

        Ok(TaskView::from_model(model, forest))
    }

    /// Applies a partial update on behalf of the owner or an admin.
    ///
    /// Absent or empty `title`/`description` are left unchanged; `is_completed`
    /// is applied whenever present.
    pub async fn update_task(&self, caller: &Caller, id: i64, update: UpdateTask) -> ServiceResult<TaskView> {
        let caller_id = caller.require_identity()?;
        let id = stored_id(id, "task")?;

        let txn = self.storage.conn.begin().await?;
        let model = TaskRepository::get_by_id(&txn, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("task {}", id)))?;
        authorize_mutation(caller, &model.owner_id, &format!("task {}", id))?;

        let current = model.clone();
        let mut active_model: task::ActiveModel = model.into_active_model();
        if let Some(title) = update.title.filter(|t| !t.is_empty()) {
            active_model.title = ActiveValue::Set(title);
        }
        if let Some(description) = update.description.filter(|d| !d.is_empty()) {
            active_model.description = ActiveValue::Set(description);
        }
        if let Some(is_completed) = update.is_completed {
            active_model.is_completed = ActiveValue::Set(is_completed);
        }

        // Nothing changed: skip the write but still answer with the current row
        let model = if active_model.is_changed() {
            TaskRepository::update(&txn, active_model).await?
        } else {
            current
        };
        let forest = Self::load_forest(&txn, id).await?;
        txn.commit().await?;

        info!("Task {} updated by {}", id, caller_id);
        Ok(TaskView::from_model(model, forest))
    }

    /// Deletes a task together with all of its comments.
    ///
    /// Returns the number of comments removed alongside the task.
    pub async fn delete_task(&self, caller: &Caller, id: i64) -> ServiceResult<u64> {
        let caller_id = caller.require_identity()?;
        let id = stored_id(id, "task")?;

        let txn = self.storage.conn.begin().await?;
        let model = TaskRepository::get_by_id(&txn, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("task {}", id)))?;
        authorize_mutation(caller, &model.owner_id, &format!("task {}", id))?;

        let removed_comments = CommentRepository::delete_for_task(&txn, id).await?;
        TaskRepository::delete(&txn, model).await?;
        txn.commit().await?;

        info!(
            "Task {} deleted by {} with {} comment(s)",
            id, caller_id, removed_comments
        );
        Ok(removed_comments)
    }
}
