//! Request and response shapes exchanged with the presentation layer.
//!
//! These are transport-agnostic; field names serialize in camelCase.
//! Ids are widened to `i64` so the client can mint temporary ids that can
//! never collide with 32-bit server ids.

use serde::{Deserialize, Serialize};

use crate::entities::{comment, task};

/// A task together with its comment forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub owner_id: String,
    #[serde(default)]
    pub comments: Vec<CommentView>,
}

/// A comment and its nested replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i64,
    pub body: String,
    pub task_id: i64,
    pub parent_comment_id: Option<i64>,
    pub is_edited: bool,
    pub owner_id: String,
    #[serde(default)]
    pub replies: Vec<CommentView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update; absent or empty strings leave the field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    pub body: String,
    pub task_id: i64,
    pub parent_comment_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComment {
    pub body: String,
}

impl TaskView {
    pub fn from_model(model: task::Model, comments: Vec<CommentView>) -> Self {
        Self {
            id: i64::from(model.id),
            title: model.title,
            description: model.description,
            is_completed: model.is_completed,
            owner_id: model.owner_id,
            comments,
        }
    }

    /// Copy of this task with the fields of `update` applied the way the
    /// server applies them.
    pub fn with_update(&self, update: &UpdateTask) -> Self {
        let mut next = self.clone();
        if let Some(title) = update.title.as_deref().filter(|t| !t.is_empty()) {
            next.title = title.to_string();
        }
        if let Some(description) = update.description.as_deref().filter(|d| !d.is_empty()) {
            next.description = description.to_string();
        }
        if let Some(is_completed) = update.is_completed {
            next.is_completed = is_completed;
        }
        next
    }
}

impl From<comment::Model> for CommentView {
    fn from(model: comment::Model) -> Self {
        Self {
            id: i64::from(model.id),
            body: model.body,
            task_id: i64::from(model.task_id),
            parent_comment_id: model.parent_comment_id.map(i64::from),
            is_edited: model.is_edited,
            owner_id: model.owner_id,
            replies: Vec::new(),
        }
    }
}

impl UpdateTask {
    pub fn completion(is_completed: bool) -> Self {
        Self {
            is_completed: Some(is_completed),
            ..Self::default()
        }
    }
}
