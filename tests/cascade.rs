mod common;

use sea_orm::{ConnectionTrait, TransactionTrait};
use taskthread::auth::Caller;
use taskthread::cascade::{collect_subtree, delete_subtree, CascadeDeleter};
use taskthread::error::ErrorKind;
use taskthread::tree;

use common::{comment, service, task};

#[tokio::test]
async fn test_delete_removes_every_descendant() {
    let service = service().await;
    let alice = Caller::user("alice");
    let created = task(&service, &alice, "t").await;

    // root -> (a -> (a1, a2 -> a2x), b), plus an unrelated sibling root
    let root = comment(&service, &alice, created.id, None, "root").await;
    let a = comment(&service, &alice, created.id, Some(root.id), "a").await;
    let b = comment(&service, &alice, created.id, Some(root.id), "b").await;
    comment(&service, &alice, created.id, Some(a.id), "a1").await;
    let a2 = comment(&service, &alice, created.id, Some(a.id), "a2").await;
    comment(&service, &alice, created.id, Some(a2.id), "a2x").await;
    let sibling = comment(&service, &alice, created.id, None, "sibling").await;

    let removed = service.delete_comment(&alice, root.id).await.unwrap();
    assert_eq!(removed, 6);

    let forest = service.list_comments_for_task(&alice, created.id).await.unwrap();
    assert_eq!(tree::flatten_ids(&forest), vec![sibling.id]);
    assert!(tree::find(&forest, b.id).is_none());
}

#[tokio::test]
async fn test_delete_leaf_leaves_ancestors() {
    let service = service().await;
    let alice = Caller::user("alice");
    let created = task(&service, &alice, "t").await;
    let root = comment(&service, &alice, created.id, None, "root").await;
    let reply = comment(&service, &alice, created.id, Some(root.id), "reply").await;

    assert_eq!(service.delete_comment(&alice, reply.id).await.unwrap(), 1);

    let forest = service.list_comments_for_task(&alice, created.id).await.unwrap();
    assert_eq!(tree::flatten_ids(&forest), vec![root.id]);
    assert!(forest[0].replies.is_empty());
}

#[tokio::test]
async fn test_collect_subtree_levels() {
    let service = service().await;
    let alice = Caller::user("alice");
    let created = task(&service, &alice, "t").await;
    let root = comment(&service, &alice, created.id, None, "root").await;
    let child = comment(&service, &alice, created.id, Some(root.id), "child").await;
    let grandchild = comment(&service, &alice, created.id, Some(child.id), "grandchild").await;

    let storage = service.storage();
    let subtree = collect_subtree(&storage.conn, root.id as i32).await.unwrap();
    assert_eq!(subtree.len(), 3);
    assert_eq!(
        subtree.deletion_order(),
        vec![grandchild.id as i32, child.id as i32, root.id as i32]
    );
}

#[tokio::test]
async fn test_deep_chain_is_removed() {
    let service = service().await;
    let alice = Caller::user("alice");
    let created = task(&service, &alice, "t").await;

    let root = comment(&service, &alice, created.id, None, "0").await;
    let mut parent = root.id;
    for depth in 1..200 {
        parent = comment(&service, &alice, created.id, Some(parent), &depth.to_string()).await.id;
    }

    let storage = service.storage();
    assert_eq!(CascadeDeleter::delete(&storage.conn, root.id as i32).await.unwrap(), 200);
    assert!(service.list_comments_for_task(&alice, created.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_root_deletes_nothing() {
    let service = service().await;
    let alice = Caller::user("alice");
    let created = task(&service, &alice, "t").await;
    let root = comment(&service, &alice, created.id, None, "root").await;

    let storage = service.storage();
    let err = CascadeDeleter::delete(&storage.conn, root.id as i32 + 50).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let forest = service.list_comments_for_task(&alice, created.id).await.unwrap();
    assert_eq!(tree::count_nodes(&forest), 1);
}

#[tokio::test]
async fn test_task_delete_removes_its_comments() {
    let service = service().await;
    let alice = Caller::user("alice");
    let doomed = task(&service, &alice, "doomed").await;
    let kept = task(&service, &alice, "kept").await;

    let root = comment(&service, &alice, doomed.id, None, "root").await;
    comment(&service, &alice, doomed.id, Some(root.id), "reply").await;
    let survivor = comment(&service, &alice, kept.id, None, "survivor").await;

    assert_eq!(service.delete_task(&alice, doomed.id).await.unwrap(), 2);

    let tasks = service.list_tasks(&alice).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tree::flatten_ids(&tasks[0].comments), vec![survivor.id]);
}

#[tokio::test]
async fn test_failure_midway_keeps_whole_subtree() {
    let service = service().await;
    let alice = Caller::user("alice");
    let created = task(&service, &alice, "t").await;
    let root = comment(&service, &alice, created.id, None, "root").await;
    let child = comment(&service, &alice, created.id, Some(root.id), "child").await;
    comment(&service, &alice, created.id, Some(child.id), "grandchild").await;
    let before = service.list_comments_for_task(&alice, created.id).await.unwrap();

    // Deeper levels go first, so the refusal hits after they were already removed
    let storage = service.storage();
    storage
        .conn
        .execute_unprepared(&format!(
            "CREATE TRIGGER refuse_root_delete BEFORE DELETE ON comments \
             WHEN OLD.id = {} BEGIN SELECT RAISE(ABORT, 'refused'); END",
            root.id
        ))
        .await
        .unwrap();

    let err = CascadeDeleter::delete(&storage.conn, root.id as i32).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert_eq!(service.list_comments_for_task(&alice, created.id).await.unwrap(), before);

    let err = service.delete_comment(&alice, root.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert_eq!(service.list_comments_for_task(&alice, created.id).await.unwrap(), before);
}

#[tokio::test]
async fn test_uncommitted_cascade_is_discarded() {
    let service = service().await;
    let alice = Caller::user("alice");
    let created = task(&service, &alice, "t").await;
    let root = comment(&service, &alice, created.id, None, "root").await;
    comment(&service, &alice, created.id, Some(root.id), "child").await;
    let before = service.list_comments_for_task(&alice, created.id).await.unwrap();

    let storage = service.storage();
    let txn = storage.conn.begin().await.unwrap();
    assert_eq!(delete_subtree(&txn, root.id as i32).await.unwrap(), 2);
    drop(txn);

    assert_eq!(service.list_comments_for_task(&alice, created.id).await.unwrap(), before);
}
