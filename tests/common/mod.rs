#![allow(dead_code)]

use std::sync::Arc;
use taskthread::api::{CommentView, CreateComment, CreateTask, TaskView};
use taskthread::auth::Caller;
use taskthread::service::TrackerService;
use taskthread::storage::LocalStorage;

pub async fn service() -> TrackerService {
    let storage = LocalStorage::in_memory().await.unwrap();
    TrackerService::new(Arc::new(storage))
}

pub async fn task(service: &TrackerService, caller: &Caller, title: &str) -> TaskView {
    service
        .create_task(
            caller,
            CreateTask {
                title: title.to_string(),
                description: String::new(),
            },
        )
        .await
        .unwrap()
}

pub async fn comment(
    service: &TrackerService,
    caller: &Caller,
    task_id: i64,
    parent_comment_id: Option<i64>,
    body: &str,
) -> CommentView {
    service
        .create_comment(
            caller,
            CreateComment {
                body: body.to_string(),
                task_id,
                parent_comment_id,
            },
        )
        .await
        .unwrap()
}

pub mod remote;
