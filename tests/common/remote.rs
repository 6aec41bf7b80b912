use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use taskthread::api::{CommentView, CreateComment, CreateTask, TaskView, UpdateComment, UpdateTask};
use taskthread::client::{LocalRemote, Remote, RemoteError};
use taskthread::error::ErrorKind;

/// Remote that can hold requests in flight and inject failures.
pub struct ScriptedRemote {
    inner: LocalRemote,
    failure: Mutex<Option<ErrorKind>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedRemote {
    pub fn new(inner: LocalRemote) -> Self {
        Self {
            inner,
            failure: Mutex::new(None),
            gate: None,
        }
    }

    /// Every request waits for a permit from [`ScriptedRemote::release`].
    pub fn gated(inner: LocalRemote) -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::new(inner)
        }
    }

    /// Fail every following request with `kind` until cleared.
    pub fn fail_with(&self, kind: Option<ErrorKind>) {
        *self.failure.lock().unwrap() = kind;
    }

    pub fn release(&self, requests: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(requests);
        }
    }

    async fn admit(&self) -> Result<(), RemoteError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        let failure = *self.failure.lock().unwrap();
        match failure {
            Some(kind) => Err(RemoteError::new(kind, "injected failure")),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Remote for ScriptedRemote {
    async fn list_tasks(&self) -> Result<Vec<TaskView>, RemoteError> {
        self.admit().await?;
        self.inner.list_tasks().await
    }

    async fn create_task(&self, input: CreateTask) -> Result<TaskView, RemoteError> {
        self.admit().await?;
        self.inner.create_task(input).await
    }

    async fn update_task(&self, id: i64, update: UpdateTask) -> Result<TaskView, RemoteError> {
        self.admit().await?;
        self.inner.update_task(id, update).await
    }

    async fn delete_task(&self, id: i64) -> Result<(), RemoteError> {
        self.admit().await?;
        self.inner.delete_task(id).await
    }

    async fn list_comments(&self, task_id: i64) -> Result<Vec<CommentView>, RemoteError> {
        self.admit().await?;
        self.inner.list_comments(task_id).await
    }

    async fn create_comment(&self, input: CreateComment) -> Result<CommentView, RemoteError> {
        self.admit().await?;
        self.inner.create_comment(input).await
    }

    async fn update_comment(&self, id: i64, update: UpdateComment) -> Result<CommentView, RemoteError> {
        self.admit().await?;
        self.inner.update_comment(id, update).await
    }

    async fn delete_comment(&self, id: i64) -> Result<(), RemoteError> {
        self.admit().await?;
        self.inner.delete_comment(id).await
    }
}
