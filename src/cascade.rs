//! Cascade deletion of a comment and every reply beneath it.
//!
//! Descendants are collected level by level through `parent_comment_id`, then
//! removed deepest level first with the target last. Both steps run against
//! the same connection, which callers make a transaction so the subtree
//! disappears all at once or not at all.

use anyhow::Result;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::error::{ServiceError, ServiceResult};
use crate::repositories::CommentRepository;

/// Subtree rooted at one comment, grouped by depth (`levels[0]` is the root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtree {
    pub levels: Vec<Vec<i32>>,
}

impl Subtree {
    pub fn len(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids in deletion order: deepest replies first, root last.
    pub fn deletion_order(&self) -> Vec<i32> {
        self.levels.iter().rev().flatten().copied().collect()
    }
}

/// Collect the ids of `root_id` and all its transitive replies.
///
/// The walk follows stored parent links only, so it terminates as long as the
/// stored links are acyclic, which creation-time validation guarantees.
pub async fn collect_subtree<C>(conn: &C, root_id: i32) -> Result<Subtree>
where
    C: ConnectionTrait,
{
    let mut levels = vec![vec![root_id]];
    loop {
        let frontier = levels.last().map(Vec::as_slice).unwrap_or_default();
        let children = CommentRepository::get_child_ids(conn, frontier).await?;
        if children.is_empty() {
            break;
        }
        levels.push(children);
    }
    Ok(Subtree { levels })
}

/// Delete `root_id` and its replies on an already open connection or
/// transaction. Returns the number of removed comments.
pub async fn delete_subtree<C>(conn: &C, root_id: i32) -> ServiceResult<u64>
where
    C: ConnectionTrait,
{
    if CommentRepository::get_by_id(conn, root_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("comment {}", root_id)));
    }

    let subtree = collect_subtree(conn, root_id).await?;
    let mut removed = 0;
    for level in subtree.levels.iter().rev() {
        removed += CommentRepository::delete_ids(conn, level).await?;
    }

    log::debug!("Cascade removed {} comment(s) rooted at {}", removed, root_id);
    Ok(removed)
}

/// Standalone cascade deleter owning its transaction boundary.
pub struct CascadeDeleter;

impl CascadeDeleter {
    /// Remove a comment with all of its replies in a single transaction.
    ///
    /// Fails with `NotFound`, deleting nothing, when the comment does not exist.
    pub async fn delete(conn: &DatabaseConnection, comment_id: i32) -> ServiceResult<u64> {
        let txn = conn.begin().await?;
        let removed = delete_subtree(&txn, comment_id).await?;
        txn.commit().await?;
        Ok(removed)
    }
}
