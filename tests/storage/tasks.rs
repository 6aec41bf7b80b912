use sea_orm::ActiveValue;
use taskthread::config::TaskOrder;
use taskthread::entities::{comment, task};
use taskthread::repositories::{CommentRepository, TaskRepository};
use taskthread::storage::LocalStorage;

async fn insert_task(storage: &LocalStorage, title: &str) -> task::Model {
    TaskRepository::create(
        &storage.conn,
        task::ActiveModel {
            title: ActiveValue::Set(title.to_string()),
            description: ActiveValue::Set(String::new()),
            is_completed: ActiveValue::Set(false),
            owner_id: ActiveValue::Set("u1".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

async fn insert_comment(storage: &LocalStorage, task_id: i32, parent: Option<i32>) -> comment::Model {
    CommentRepository::create(
        &storage.conn,
        comment::ActiveModel {
            body: ActiveValue::Set("hello".to_string()),
            task_id: ActiveValue::Set(task_id),
            parent_comment_id: ActiveValue::Set(parent),
            is_edited: ActiveValue::Set(false),
            owner_id: ActiveValue::Set("u1".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_task_ids_are_sequential_and_ordered() {
    let storage = LocalStorage::in_memory().await.unwrap();
    let first = insert_task(&storage, "first").await;
    let second = insert_task(&storage, "second").await;
    assert!(second.id > first.id);

    let newest: Vec<i32> = TaskRepository::get_all(&storage.conn, TaskOrder::NewestFirst)
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(newest, vec![second.id, first.id]);

    let oldest: Vec<i32> = TaskRepository::get_all(&storage.conn, TaskOrder::OldestFirst)
        .await
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(oldest, vec![first.id, second.id]);
}

#[tokio::test]
async fn test_comment_queries() {
    let storage = LocalStorage::in_memory().await.unwrap();
    let task = insert_task(&storage, "t").await;
    let other = insert_task(&storage, "other").await;
    let root = insert_comment(&storage, task.id, None).await;
    let reply = insert_comment(&storage, task.id, Some(root.id)).await;
    let elsewhere = insert_comment(&storage, other.id, None).await;

    let for_task: Vec<i32> = CommentRepository::get_for_task(&storage.conn, task.id)
        .await
        .unwrap()
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(for_task, vec![root.id, reply.id]);

    assert!(CommentRepository::exists_in_task(&storage.conn, root.id, task.id).await.unwrap());
    assert!(!CommentRepository::exists_in_task(&storage.conn, elsewhere.id, task.id).await.unwrap());

    let children = CommentRepository::get_child_ids(&storage.conn, &[root.id]).await.unwrap();
    assert_eq!(children, vec![reply.id]);
    assert!(CommentRepository::get_child_ids(&storage.conn, &[]).await.unwrap().is_empty());

    assert!(storage.has_data().await.unwrap());
    storage.clear_all_data().await.unwrap();
    assert!(!storage.has_data().await.unwrap());
}
