//! Repository layer for database operations.
//!
//! This module provides repository structs that encapsulate database queries
//! and operations, following the Data Mapper pattern recommended by SeaORM.
//! Repositories keep entities as pure data models while providing reusable
//! database access methods. Every method is generic over `ConnectionTrait`
//! so it runs equally against a pooled connection or an open transaction.

pub mod comment;
pub mod task;

pub use comment::CommentRepository;
pub use task::TaskRepository;
