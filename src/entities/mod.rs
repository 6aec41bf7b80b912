pub mod comment;
pub mod task;

pub use comment::Entity as Comment;
pub use task::Entity as Task;
