use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::{CommentView, CreateComment, UpdateComment};
use crate::client::state::{CollectionState, LoadStatus, Notice, OpKind};
use crate::client::{is_temporary, ClientError, Remote, RemoteError, TempIds};
use crate::config::ClientConfig;
use crate::tree::{self, Slot};

/// Pre-image of one comment before a speculative apply on the forest.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CommentPreImage {
    /// Speculative create: the id did not exist.
    Absent,
    /// Speculative delete: the detached subtree and where it hung.
    Detached { node: CommentView, slot: Slot },
    /// Speculative edit: the node's own fields; replies are left alone.
    Fields(CommentView),
}

#[derive(Debug)]
struct CommentSpeculation {
    kind: OpKind,
    id: i64,
    pre_image: CommentPreImage,
}

impl CommentSpeculation {
    fn rollback(self, forest: &mut Vec<CommentView>) {
        match self.pre_image {
            CommentPreImage::Absent => {
                tree::detach(forest, self.id);
            }
            CommentPreImage::Detached { node, slot } => {
                let id = node.id;
                if !tree::reattach(forest, node, slot) {
                    warn!("Could not restore comment {}: its parent left the thread", id);
                }
            }
            CommentPreImage::Fields(previous) => {
                if let Some(node) = tree::find_mut(forest, self.id) {
                    copy_fields(node, previous);
                }
            }
        }
    }
}

/// Copy of a node's own fields with an empty reply list.
fn own_fields(node: &CommentView) -> CommentView {
    CommentView {
        id: node.id,
        body: node.body.clone(),
        task_id: node.task_id,
        parent_comment_id: node.parent_comment_id,
        is_edited: node.is_edited,
        owner_id: node.owner_id.clone(),
        replies: Vec::new(),
    }
}

/// Overwrite a node's own fields, keeping its current replies.
fn copy_fields(node: &mut CommentView, source: CommentView) {
    let replies = std::mem::take(&mut node.replies);
    *node = CommentView { replies, ..source };
}

/// Client mirror of one task's comment forest with optimistic mutations.
#[derive(Clone)]
pub struct CommentStore {
    remote: Arc<dyn Remote>,
    task_id: i64,
    state: Arc<Mutex<CollectionState<CommentView>>>,
    temp_ids: Arc<TempIds>,
    reject_concurrent_same_id: bool,
}

impl CommentStore {
    pub fn new(remote: Arc<dyn Remote>, task_id: i64) -> Self {
        Self::with_config(remote, task_id, &ClientConfig::default())
    }

    pub fn with_config(remote: Arc<dyn Remote>, task_id: i64, config: &ClientConfig) -> Self {
        Self {
            remote,
            task_id,
            state: Arc::new(Mutex::new(CollectionState::default())),
            temp_ids: Arc::new(TempIds::new()),
            reject_concurrent_same_id: config.reject_concurrent_same_id,
        }
    }

    pub fn task_id(&self) -> i64 {
        self.task_id
    }

    pub async fn snapshot(&self) -> CollectionState<CommentView> {
        self.state.lock().await.clone()
    }

    /// Current root comments with nested replies.
    pub async fn forest(&self) -> Vec<CommentView> {
        self.state.lock().await.items.clone()
    }

    pub async fn reset(&self) {
        *self.state.lock().await = CollectionState::default();
    }

    /// Replace the forest with the server's.
    pub async fn load(&self) -> Result<(), ClientError> {
        {
            let mut state = self.state.lock().await;
            state.status = LoadStatus::Loading;
            state.error = None;
        }

        let result = self.remote.list_comments(self.task_id).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(forest) => {
                state.items = forest;
                state.status = LoadStatus::Loaded;
                Ok(())
            }
            Err(err) => {
                state.status = LoadStatus::Errored;
                state.error = Some(Notice::for_error(&err, "load comments"));
                Err(err.into())
            }
        }
    }

    /// Add a root comment, or a reply when `parent_comment_id` is given.
    ///
    /// The temporary node is appended to its sibling list; temporary ids sort
    /// after every server id, so sibling order stays ascending.
    pub async fn create_comment(
        &self,
        body: impl Into<String>,
        parent_comment_id: Option<i64>,
    ) -> Result<CommentView, ClientError> {
        let body = body.into();
        let temp_id = self.temp_ids.next();

        let speculation = {
            let mut state = self.state.lock().await;
            if is_temporary(self.task_id) {
                state.error = Some(Notice::unsaved_task());
                return Err(ClientError::Unsaved(self.task_id));
            }
            if let Some(parent_id) = parent_comment_id {
                if is_temporary(parent_id) {
                    return Err(ClientError::Unsaved(parent_id));
                }
                if tree::find(&state.items, parent_id).is_none() {
                    return Err(ClientError::NotLoaded(parent_id));
                }
            }

            let node = CommentView {
                id: temp_id,
                body: body.clone(),
                task_id: self.task_id,
                parent_comment_id,
                is_edited: false,
                owner_id: String::new(),
                replies: Vec::new(),
            };
            tree::insert_ordered(&mut state.items, node);
            state.operations.begin(OpKind::Create, temp_id);
            CommentSpeculation {
                kind: OpKind::Create,
                id: temp_id,
                pre_image: CommentPreImage::Absent,
            }
        };

        let result = self
            .remote
            .create_comment(CreateComment {
                body,
                task_id: self.task_id,
                parent_comment_id,
            })
            .await;

        let mut state = self.state.lock().await;
        state.operations.finish(OpKind::Create, temp_id);
        match result {
            Ok(comment) => {
                tree::detach(&mut state.items, temp_id);
                if tree::find(&state.items, comment.id).is_none()
                    && !tree::insert_ordered(&mut state.items, comment.clone())
                {
                    debug!("Parent of comment {} left the thread before it was confirmed", comment.id);
                }
                Ok(comment)
            }
            Err(err) => {
                speculation.rollback(&mut state.items);
                Err(Self::fail(&mut state, err, "add comment"))
            }
        }
    }

    /// Replace a comment body locally, then reconcile with the server's copy.
    pub async fn update_comment(&self, id: i64, body: impl Into<String>) -> Result<CommentView, ClientError> {
        let body = body.into();
        let speculation = {
            let mut state = self.state.lock().await;
            self.check_settled(&state, id)?;
            let node = tree::find_mut(&mut state.items, id).ok_or(ClientError::NotLoaded(id))?;
            let previous = own_fields(node);
            node.body = body.clone();
            node.is_edited = true;
            state.operations.begin(OpKind::Update, id);
            CommentSpeculation {
                kind: OpKind::Update,
                id,
                pre_image: CommentPreImage::Fields(previous),
            }
        };

        let result = self.remote.update_comment(id, UpdateComment { body }).await;

        let mut state = self.state.lock().await;
        state.operations.finish(speculation.kind, id);
        match result {
            Ok(comment) => {
                if let Some(node) = tree::find_mut(&mut state.items, id) {
                    copy_fields(node, comment.clone());
                }
                Ok(comment)
            }
            Err(err) => {
                speculation.rollback(&mut state.items);
                Err(Self::fail(&mut state, err, "update comment"))
            }
        }
    }

    /// Remove a comment and its replies locally, restoring them if the server refuses.
    ///
    /// Refused with `Busy` while any comment in the subtree, the target
    /// included, has a create, update or delete in flight, whatever the
    /// same-id setting says.
    pub async fn delete_comment(&self, id: i64) -> Result<(), ClientError> {
        let speculation = {
            let mut state = self.state.lock().await;
            self.check_settled(&state, id)?;
            let node = tree::find(&state.items, id).ok_or(ClientError::NotLoaded(id))?;
            // A restored subtree must not carry replies or edits that settled while it was detached
            let pending = tree::flatten_ids(std::slice::from_ref(node))
                .into_iter()
                .find(|&inner| is_temporary(inner) || state.operations.is_busy(inner));
            if let Some(inner) = pending {
                return Err(ClientError::Busy(inner));
            }
            let (node, slot) = tree::detach(&mut state.items, id).ok_or(ClientError::NotLoaded(id))?;
            state.operations.begin(OpKind::Delete, id);
            CommentSpeculation {
                kind: OpKind::Delete,
                id,
                pre_image: CommentPreImage::Detached { node, slot },
            }
        };

        let result = self.remote.delete_comment(id).await;

        let mut state = self.state.lock().await;
        state.operations.finish(speculation.kind, id);
        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                speculation.rollback(&mut state.items);
                Err(Self::fail(&mut state, err, "delete comment"))
            }
        }
    }

    fn check_settled(&self, state: &CollectionState<CommentView>, id: i64) -> Result<(), ClientError> {
        if is_temporary(id) {
            Err(ClientError::Unsaved(id))
        } else if self.reject_concurrent_same_id && state.operations.is_busy(id) {
            Err(ClientError::Busy(id))
        } else {
            Ok(())
        }
    }

    fn fail(state: &mut CollectionState<CommentView>, err: RemoteError, action: &str) -> ClientError {
        warn!("Failed to {}: {}", action, err);
        state.error = Some(Notice::for_error(&err, action));
        err.into()
    }
}
