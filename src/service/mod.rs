//! Mutation service for tasks and comments.
//!
//! This module provides the [`TrackerService`] struct, the only entry point
//! that reads or writes tasks and comments. Every operation takes the caller
//! explicitly, applies the owner-or-admin policy where it mutates an existing
//! record, and runs its read-check-write sequence inside one storage
//! transaction. Operations are split by resource:
//! - [`tasks`]: create, list, fetch, update, delete tasks
//! - [`comments`]: create, list, update, delete comments
//!
//! # Example
//! ```rust,no_run
//! use taskthread::api::CreateTask;
//! use taskthread::auth::Caller;
//! use taskthread::service::TrackerService;
//! use taskthread::storage::LocalStorage;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let storage = Arc::new(LocalStorage::in_memory().await?);
//! let service = TrackerService::new(storage);
//! let caller = Caller::user("alice");
//!
//! let task = service
//!     .create_task(&caller, CreateTask { title: "Write docs".into(), description: String::new() })
//!     .await?;
//! assert!(task.comments.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod comments;
pub mod tasks;

use anyhow::Result;
use sea_orm::ConnectionTrait;
use std::sync::Arc;

use crate::api::CommentView;
use crate::config::{Config, TaskOrder};
use crate::error::{ServiceError, ServiceResult};
use crate::repositories::CommentRepository;
use crate::storage::LocalStorage;
use crate::tree;

/// Service exposing create/read/update/delete for tasks and comments.
#[derive(Clone)]
pub struct TrackerService {
    storage: Arc<LocalStorage>,
    task_order: TaskOrder,
}

impl TrackerService {
    /// Creates a service over shared storage with newest-first task listing.
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self {
            storage,
            task_order: TaskOrder::default(),
        }
    }

    /// Creates a service honoring the listing settings of `config`.
    pub fn with_config(storage: Arc<LocalStorage>, config: &Config) -> Self {
        Self {
            storage,
            task_order: config.listing.task_order,
        }
    }

    pub fn task_order(&self) -> TaskOrder {
        self.task_order
    }

    pub fn storage(&self) -> Arc<LocalStorage> {
        Arc::clone(&self.storage)
    }

    /// Load one task's comments and assemble them into a forest.
    async fn load_forest<C>(conn: &C, task_id: i32) -> Result<Vec<CommentView>>
    where
        C: ConnectionTrait,
    {
        let records = CommentRepository::get_for_task(conn, task_id).await?;
        Ok(tree::build_forest(records))
    }
}

/// Narrow a wire id to a stored id. Ids outside the stored range cannot exist.
pub(crate) fn stored_id(id: i64, resource: &str) -> ServiceResult<i32> {
    i32::try_from(id).map_err(|_| ServiceError::NotFound(format!("{} {}", resource, id)))
}

/// Reject empty or whitespace-only required text.
pub(crate) fn require_text(value: &str, field: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        Err(ServiceError::InvalidInput(format!("{} is required", field)))
    } else {
        Ok(())
    }
}
