//! Reply-tree reconstruction and forest helpers.
//!
//! Comments are stored flat, each pointing at its parent by id. The tree view
//! is derived on demand: records are indexed by id, replies are collected as
//! index lists, and nodes are materialized bottom-up with an explicit stack.
//! Nodes own their replies; nothing points back at a parent.

use std::collections::HashMap;

use crate::api::CommentView;
use crate::entities::comment;

/// Build the ordered reply forest for one task from its flat comment set.
///
/// Roots and every reply list come out in ascending id order regardless of the
/// input order. A comment whose parent is not part of the set is dropped
/// together with its own replies, and reported at `warn`.
pub fn build_forest(mut records: Vec<comment::Model>) -> Vec<CommentView> {
    records.sort_by_key(|record| record.id);

    let index: HashMap<i32, usize> = records
        .iter()
        .enumerate()
        .map(|(position, record)| (record.id, position))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (position, record) in records.iter().enumerate() {
        match record.parent_comment_id {
            None => roots.push(position),
            Some(parent_id) => match index.get(&parent_id) {
                Some(&parent) => children[parent].push(position),
                None => log::warn!(
                    "Dropping comment {} of task {}: parent comment {} is not in the set",
                    record.id,
                    record.task_id,
                    parent_id
                ),
            },
        }
    }

    let mut slots: Vec<Option<CommentView>> = records.into_iter().map(|record| Some(record.into())).collect();

    // Post-order walk from each root: a node is finished once all its replies are.
    let mut built: Vec<Option<CommentView>> = vec![None; slots.len()];
    let mut stack: Vec<(usize, bool)> = roots.iter().rev().map(|&root| (root, false)).collect();
    while let Some((position, expanded)) = stack.pop() {
        if expanded {
            let Some(mut node) = slots[position].take() else {
                continue;
            };
            node.replies = children[position]
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[position] = Some(node);
        } else {
            stack.push((position, true));
            stack.extend(children[position].iter().rev().map(|&child| (child, false)));
        }
    }

    roots.into_iter().filter_map(|root| built[root].take()).collect()
}

/// Ids of a forest in depth-first pre-order.
pub fn flatten_ids(forest: &[CommentView]) -> Vec<i64> {
    let mut ids = Vec::new();
    let mut stack: Vec<&CommentView> = forest.iter().rev().collect();
    while let Some(node) = stack.pop() {
        ids.push(node.id);
        stack.extend(node.replies.iter().rev());
    }
    ids
}

/// Total number of nodes in a forest.
pub fn count_nodes(forest: &[CommentView]) -> usize {
    forest.iter().map(|node| 1 + count_nodes(&node.replies)).sum()
}

pub fn find(forest: &[CommentView], id: i64) -> Option<&CommentView> {
    for node in forest {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find(&node.replies, id) {
            return Some(found);
        }
    }
    None
}

pub fn find_mut(forest: &mut [CommentView], id: i64) -> Option<&mut CommentView> {
    for node in forest.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.replies, id) {
            return Some(found);
        }
    }
    None
}

/// Where a node sat before it was detached: its parent (`None` for a root)
/// and its index within that sibling list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub parent_id: Option<i64>,
    pub index: usize,
}

/// Detach the node with `id`, replies included, and report where it was.
pub fn detach(forest: &mut Vec<CommentView>, id: i64) -> Option<(CommentView, Slot)> {
    if let Some(index) = forest.iter().position(|node| node.id == id) {
        let node = forest.remove(index);
        return Some((node, Slot { parent_id: None, index }));
    }
    for node in forest.iter_mut() {
        if let Some((detached, mut slot)) = detach(&mut node.replies, id) {
            if slot.parent_id.is_none() {
                slot.parent_id = Some(node.id);
            }
            return Some((detached, slot));
        }
    }
    None
}

/// Put a previously detached node back at its slot.
///
/// The index is clamped to the current sibling count. Returns `false` when the
/// parent is no longer present.
pub fn reattach(forest: &mut Vec<CommentView>, node: CommentView, slot: Slot) -> bool {
    let siblings = match slot.parent_id {
        None => forest,
        Some(parent_id) => match find_mut(forest, parent_id) {
            Some(parent) => &mut parent.replies,
            None => return false,
        },
    };
    let index = slot.index.min(siblings.len());
    siblings.insert(index, node);
    true
}

/// Insert a node under its `parent_comment_id` (or as a root), keeping the
/// sibling list in ascending id order. Returns `false` if the parent is missing.
pub fn insert_ordered(forest: &mut Vec<CommentView>, node: CommentView) -> bool {
    let siblings = match node.parent_comment_id {
        None => forest,
        Some(parent_id) => match find_mut(forest, parent_id) {
            Some(parent) => &mut parent.replies,
            None => return false,
        },
    };
    let index = siblings.partition_point(|sibling| sibling.id < node.id);
    siblings.insert(index, node);
    true
}
