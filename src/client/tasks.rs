use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::{CreateTask, TaskView, UpdateTask};
use crate::client::state::{CollectionState, LoadStatus, Notice, OpKind, Speculation};
use crate::client::{is_temporary, ClientError, Remote, RemoteError, TempIds};
use crate::config::ClientConfig;

/// Client mirror of the task collection with optimistic mutations.
///
/// Cloning is cheap and every clone shares the same state, so independent
/// operations can run concurrently from different tasks.
#[derive(Clone)]
pub struct TaskStore {
    remote: Arc<dyn Remote>,
    state: Arc<Mutex<CollectionState<TaskView>>>,
    temp_ids: Arc<TempIds>,
    reject_concurrent_same_id: bool,
}

impl TaskStore {
    pub fn new(remote: Arc<dyn Remote>) -> Self {
        Self::with_config(remote, &ClientConfig::default())
    }

    pub fn with_config(remote: Arc<dyn Remote>, config: &ClientConfig) -> Self {
        Self {
            remote,
            state: Arc::new(Mutex::new(CollectionState::default())),
            temp_ids: Arc::new(TempIds::new()),
            reject_concurrent_same_id: config.reject_concurrent_same_id,
        }
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> CollectionState<TaskView> {
        self.state.lock().await.clone()
    }

    pub async fn tasks(&self) -> Vec<TaskView> {
        self.state.lock().await.items.clone()
    }

    /// Drop everything and return to `Idle`.
    pub async fn reset(&self) {
        *self.state.lock().await = CollectionState::default();
    }

    pub async fn clear_error(&self) {
        self.state.lock().await.error = None;
    }

    /// Replace the collection with the server's task list.
    pub async fn load(&self) -> Result<(), ClientError> {
        {
            let mut state = self.state.lock().await;
            state.status = LoadStatus::Loading;
            state.error = None;
        }

        let result = self.remote.list_tasks().await;

        let mut state = self.state.lock().await;
        match result {
            Ok(tasks) => {
                state.items = tasks;
                state.status = LoadStatus::Loaded;
                Ok(())
            }
            Err(err) => {
                state.status = LoadStatus::Errored;
                state.error = Some(Notice::for_error(&err, "load tasks"));
                Err(err.into())
            }
        }
    }

    /// Create a task, showing a temporary entry at the front until the server answers.
    pub async fn create_task(&self, input: CreateTask) -> Result<TaskView, ClientError> {
        let temp_id = self.temp_ids.next();
        let speculation = {
            let mut state = self.state.lock().await;
            state.operations.begin(OpKind::Create, temp_id);
            state.items.insert(
                0,
                TaskView {
                    id: temp_id,
                    title: input.title.clone(),
                    description: input.description.clone(),
                    is_completed: false,
                    owner_id: String::new(),
                    comments: Vec::new(),
                },
            );
            Speculation::absent(OpKind::Create, temp_id)
        };

        let result = self.remote.create_task(input).await;

        let mut state = self.state.lock().await;
        state.operations.finish(OpKind::Create, temp_id);
        match result {
            Ok(task) => {
                state.items.retain(|item| item.id != temp_id);
                // A reload that raced this request may already hold the row
                match state.items.iter().position(|item| item.id == task.id) {
                    Some(position) => state.items[position] = task.clone(),
                    None => state.items.insert(0, task.clone()),
                }
                debug!("Task {} confirmed as {}", temp_id, task.id);
                Ok(task)
            }
            Err(err) => {
                speculation.rollback(&mut state.items);
                Err(Self::fail(&mut state, err, "create task"))
            }
        }
    }

    /// Apply a partial update locally, then reconcile with the server's copy.
    pub async fn update_task(&self, id: i64, update: UpdateTask) -> Result<TaskView, ClientError> {
        let speculation = self
            .apply(OpKind::Update, id, |task| *task = task.with_update(&update))
            .await?;
        let result = self.remote.update_task(id, update).await;
        self.settle(speculation, result, "update task").await
    }

    /// Flip completion locally, then reconcile.
    pub async fn toggle_completion(&self, id: i64, is_completed: bool) -> Result<TaskView, ClientError> {
        let speculation = self
            .apply(OpKind::Toggle, id, |task| task.is_completed = is_completed)
            .await?;
        let result = self.remote.update_task(id, UpdateTask::completion(is_completed)).await;
        self.settle(speculation, result, "update task").await
    }

    /// Remove a task locally, restoring it if the server refuses.
    pub async fn delete_task(&self, id: i64) -> Result<(), ClientError> {
        let speculation = {
            let mut state = self.state.lock().await;
            let speculation = self.capture(&state, OpKind::Delete, id)?;
            state.operations.begin(OpKind::Delete, id);
            state.items.retain(|item| item.id != id);
            speculation
        };

        let result = self.remote.delete_task(id).await;

        let mut state = self.state.lock().await;
        state.operations.finish(OpKind::Delete, id);
        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                speculation.rollback(&mut state.items);
                Err(Self::fail(&mut state, err, "delete task"))
            }
        }
    }

    fn capture(
        &self,
        state: &CollectionState<TaskView>,
        kind: OpKind,
        id: i64,
    ) -> Result<Speculation<TaskView>, ClientError> {
        // The server only knows the id once the create settles
        if is_temporary(id) {
            return Err(ClientError::Unsaved(id));
        }
        if self.reject_concurrent_same_id && state.operations.is_busy(id) {
            return Err(ClientError::Busy(id));
        }
        Speculation::capture(kind, &state.items, id).ok_or(ClientError::NotLoaded(id))
    }

    /// Capture the pre-image of `id`, mark it in flight and mutate it in place.
    async fn apply<F>(&self, kind: OpKind, id: i64, mutate: F) -> Result<Speculation<TaskView>, ClientError>
    where
        F: FnOnce(&mut TaskView),
    {
        let mut state = self.state.lock().await;
        let speculation = self.capture(&state, kind, id)?;
        state.operations.begin(kind, id);
        if let Some(task) = state.items.iter_mut().find(|task| task.id == id) {
            mutate(task);
        }
        Ok(speculation)
    }

    /// Reconcile an in-place speculation with the server's answer.
    async fn settle(
        &self,
        speculation: Speculation<TaskView>,
        result: Result<TaskView, RemoteError>,
        action: &str,
    ) -> Result<TaskView, ClientError> {
        let mut state = self.state.lock().await;
        state.operations.finish(speculation.kind, speculation.id);
        match result {
            Ok(task) => {
                match state.items.iter_mut().find(|item| item.id == task.id) {
                    Some(item) => *item = task.clone(),
                    None => debug!("Task {} left the collection before its update settled", task.id),
                }
                Ok(task)
            }
            Err(err) => {
                speculation.rollback(&mut state.items);
                Err(Self::fail(&mut state, err, action))
            }
        }
    }

    fn fail(state: &mut CollectionState<TaskView>, err: RemoteError, action: &str) -> ClientError {
        warn!("Failed to {}: {}", action, err);
        state.error = Some(Notice::for_error(&err, action));
        err.into()
    }
}
