//! Client-side mirror of tasks and comments with optimistic mutation.
//!
//! Stores apply every mutation locally before the request settles, track the
//! in-flight work per entity id, and reconcile with the server's answer or
//! roll back to the captured pre-image when the request fails. The server is
//! reached only through the [`Remote`] trait.

pub mod comments;
pub mod remote;
pub mod state;
pub mod tasks;
pub mod temp_id;

pub use comments::CommentStore;
pub use remote::{LocalRemote, Remote, RemoteError};
pub use state::{CollectionState, LoadStatus, Notice, NoticeKind, OpKind, Operations};
pub use tasks::TaskStore;
pub use temp_id::{is_temporary, TempIds};

/// Failures reported by the client stores.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("another operation on {0} is still in flight")]
    Busy(i64),

    #[error("{0} is not in the local collection")]
    NotLoaded(i64),

    #[error("{0} has not been saved yet")]
    Unsaved(i64),
}
