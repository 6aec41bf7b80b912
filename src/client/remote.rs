//! Boundary between the client stores and the mutation service.

use async_trait::async_trait;
use std::time::Duration;

use crate::api::{CommentView, CreateComment, CreateTask, TaskView, UpdateComment, UpdateTask};
use crate::auth::Caller;
use crate::error::{ErrorKind, ServiceError};
use crate::service::TrackerService;

/// A failed request as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind:?} ({code}): {message}", code = .kind.status_code())]
pub struct RemoteError {
    pub kind: ErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(ErrorKind::Unexpected, format!("request timed out after {:?}", after))
    }
}

impl From<ServiceError> for RemoteError {
    fn from(err: ServiceError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

/// Wire contract of the mutation service, as consumed by the client stores.
#[async_trait]
pub trait Remote: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<TaskView>, RemoteError>;
    async fn create_task(&self, input: CreateTask) -> Result<TaskView, RemoteError>;
    async fn update_task(&self, id: i64, update: UpdateTask) -> Result<TaskView, RemoteError>;
    async fn delete_task(&self, id: i64) -> Result<(), RemoteError>;

    async fn list_comments(&self, task_id: i64) -> Result<Vec<CommentView>, RemoteError>;
    async fn create_comment(&self, input: CreateComment) -> Result<CommentView, RemoteError>;
    async fn update_comment(&self, id: i64, update: UpdateComment) -> Result<CommentView, RemoteError>;
    async fn delete_comment(&self, id: i64) -> Result<(), RemoteError>;
}

/// In-process transport calling a [`TrackerService`] as a fixed caller.
///
/// An optional timeout turns slow calls into `Unexpected` failures.
#[derive(Clone)]
pub struct LocalRemote {
    service: TrackerService,
    caller: Caller,
    timeout: Option<Duration>,
}

impl LocalRemote {
    pub fn new(service: TrackerService, caller: Caller) -> Self {
        Self {
            service,
            caller,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn call<T, F>(&self, request: F) -> Result<T, RemoteError>
    where
        F: std::future::Future<Output = Result<T, ServiceError>> + Send,
    {
        match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, request).await {
                Ok(result) => result.map_err(RemoteError::from),
                Err(_) => Err(RemoteError::timeout(limit)),
            },
            None => request.await.map_err(RemoteError::from),
        }
    }
}

#[async_trait]
impl Remote for LocalRemote {
    async fn list_tasks(&self) -> Result<Vec<TaskView>, RemoteError> {
        self.call(self.service.list_tasks(&self.caller)).await
    }

    async fn create_task(&self, input: CreateTask) -> Result<TaskView, RemoteError> {
        self.call(self.service.create_task(&self.caller, input)).await
    }

    async fn update_task(&self, id: i64, update: UpdateTask) -> Result<TaskView, RemoteError> {
        self.call(self.service.update_task(&self.caller, id, update)).await
    }

    async fn delete_task(&self, id: i64) -> Result<(), RemoteError> {
        self.call(self.service.delete_task(&self.caller, id)).await.map(|_| ())
    }

    async fn list_comments(&self, task_id: i64) -> Result<Vec<CommentView>, RemoteError> {
        self.call(self.service.list_comments_for_task(&self.caller, task_id)).await
    }

    async fn create_comment(&self, input: CreateComment) -> Result<CommentView, RemoteError> {
        self.call(self.service.create_comment(&self.caller, input)).await
    }

    async fn update_comment(&self, id: i64, update: UpdateComment) -> Result<CommentView, RemoteError> {
        self.call(self.service.update_comment(&self.caller, id, update)).await
    }

    async fn delete_comment(&self, id: i64) -> Result<(), RemoteError> {
        self.call(self.service.delete_comment(&self.caller, id)).await.map(|_| ())
    }
}
