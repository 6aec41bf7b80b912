//! Local storage module for task and comment persistence
//!
//! This module owns the SeaORM connection and the schema for:
//! - Tasks
//! - Comments (self-referencing through `parent_comment_id`)

pub mod db;

pub use db::LocalStorage;
