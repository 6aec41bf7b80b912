//! Ephemeral UI state owned by the client stores.

use std::collections::HashSet;

use crate::api::TaskView;
use crate::client::RemoteError;
use crate::constants::{NOTICE_FAILED, NOTICE_NOT_ALLOWED, NOTICE_ONLY_OWNER, NOTICE_RETRY, NOTICE_UNSAVED_TASK};

/// Load lifecycle of a mirrored collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Kind of mutation in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Create,
    Update,
    Delete,
    Toggle,
}

/// In-flight markers. Creation is tracked per collection, everything else per id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operations {
    creating: usize,
    pub updating: HashSet<i64>,
    pub deleting: HashSet<i64>,
    pub toggling: HashSet<i64>,
}

impl Operations {
    pub fn is_creating(&self) -> bool {
        self.creating > 0
    }

    pub fn is_updating(&self, id: i64) -> bool {
        self.updating.contains(&id)
    }

    pub fn is_deleting(&self, id: i64) -> bool {
        self.deleting.contains(&id)
    }

    pub fn is_toggling(&self, id: i64) -> bool {
        self.toggling.contains(&id)
    }

    /// Whether any per-id operation is in flight for `id`.
    pub fn is_busy(&self, id: i64) -> bool {
        self.is_updating(id) || self.is_deleting(id) || self.is_toggling(id)
    }

    pub fn is_idle(&self) -> bool {
        !self.is_creating() && self.updating.is_empty() && self.deleting.is_empty() && self.toggling.is_empty()
    }

    pub fn begin(&mut self, kind: OpKind, id: i64) {
        match kind {
            OpKind::Create => self.creating += 1,
            OpKind::Update => {
                self.updating.insert(id);
            }
            OpKind::Delete => {
                self.deleting.insert(id);
            }
            OpKind::Toggle => {
                self.toggling.insert(id);
            }
        }
    }

    pub fn finish(&mut self, kind: OpKind, id: i64) {
        match kind {
            OpKind::Create => self.creating = self.creating.saturating_sub(1),
            OpKind::Update => {
                self.updating.remove(&id);
            }
            OpKind::Delete => {
                self.deleting.remove(&id);
            }
            OpKind::Toggle => {
                self.toggling.remove(&id);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The caller lacks identity or ownership.
    NotAllowed,
    /// Anything else; the user may retry.
    Failed,
}

/// User-facing description of the last failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    /// Describe a failed request for `action` (e.g. "delete comment").
    pub fn for_error(err: &RemoteError, action: &str) -> Self {
        if err.kind.is_permission_denial() {
            Self {
                kind: NoticeKind::NotAllowed,
                title: format!("{} {}", NOTICE_NOT_ALLOWED, action),
                message: NOTICE_ONLY_OWNER.to_string(),
            }
        } else {
            Self {
                kind: NoticeKind::Failed,
                title: format!("{} {}", NOTICE_FAILED, action),
                message: NOTICE_RETRY.to_string(),
            }
        }
    }

    pub fn unsaved_task() -> Self {
        Self {
            kind: NoticeKind::Failed,
            title: format!("{} add comment", NOTICE_FAILED),
            message: NOTICE_UNSAVED_TASK.to_string(),
        }
    }
}

/// Mirrored collection plus its ephemeral state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionState<T> {
    pub items: Vec<T>,
    pub status: LoadStatus,
    pub error: Option<Notice>,
    pub operations: Operations,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: LoadStatus::Idle,
            error: None,
            operations: Operations::default(),
        }
    }
}

impl<T> CollectionState<T> {
    pub fn loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }
}

/// Entities addressable by id inside a flat collection.
pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for TaskView {
    fn id(&self) -> i64 {
        self.id
    }
}

/// What a flat collection looked like at the affected id before a speculative apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreImage<T> {
    /// The id did not exist (speculative create).
    Absent,
    /// The entity sat at `index` with this value.
    Present { index: usize, entity: T },
}

/// An applied-but-unconfirmed mutation on a flat collection.
///
/// Rolling back writes the captured pre-image back verbatim; it never
/// re-derives an inverse of the forward operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speculation<T> {
    pub kind: OpKind,
    pub id: i64,
    pub pre_image: PreImage<T>,
}

impl<T: Identified + Clone> Speculation<T> {
    /// Capture the current value of `id`, or `None` if it is not in `items`.
    pub fn capture(kind: OpKind, items: &[T], id: i64) -> Option<Self> {
        items.iter().position(|item| item.id() == id).map(|index| Self {
            kind,
            id,
            pre_image: PreImage::Present {
                index,
                entity: items[index].clone(),
            },
        })
    }

    pub fn absent(kind: OpKind, id: i64) -> Self {
        Self {
            kind,
            id,
            pre_image: PreImage::Absent,
        }
    }

    /// Restore the collection at this id to its pre-image.
    pub fn rollback(self, items: &mut Vec<T>) {
        match self.pre_image {
            PreImage::Absent => items.retain(|item| item.id() != self.id),
            PreImage::Present { index, entity } => match items.iter().position(|item| item.id() == self.id) {
                Some(position) => items[position] = entity,
                None => items.insert(index.min(items.len()), entity),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(i64, &'static str);

    impl Identified for Item {
        fn id(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn rollback_reinserts_removed_entity_at_its_index() {
        let mut items = vec![Item(1, "a"), Item(2, "b"), Item(3, "c")];
        let speculation = Speculation::capture(OpKind::Delete, &items, 2).unwrap();
        items.retain(|item| item.0 != 2);
        speculation.rollback(&mut items);
        assert_eq!(items, vec![Item(1, "a"), Item(2, "b"), Item(3, "c")]);
    }

    #[test]
    fn rollback_restores_previous_value() {
        let mut items = vec![Item(1, "a"), Item(2, "b")];
        let speculation = Speculation::capture(OpKind::Update, &items, 1).unwrap();
        items[0] = Item(1, "changed");
        speculation.rollback(&mut items);
        assert_eq!(items[0], Item(1, "a"));
    }

    #[test]
    fn rollback_of_create_removes_entry() {
        let mut items = vec![Item(1, "a")];
        let speculation = Speculation::<Item>::absent(OpKind::Create, 99);
        items.insert(0, Item(99, "temp"));
        speculation.rollback(&mut items);
        assert_eq!(items, vec![Item(1, "a")]);
    }

    #[test]
    fn operations_track_concurrent_creates() {
        let mut operations = Operations::default();
        operations.begin(OpKind::Create, 0);
        operations.begin(OpKind::Create, 0);
        operations.finish(OpKind::Create, 0);
        assert!(operations.is_creating());
        operations.finish(OpKind::Create, 0);
        assert!(operations.is_idle());
    }
}
