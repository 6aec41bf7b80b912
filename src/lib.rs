//! Taskthread - tasks with threaded comments
//!
//! This library persists tasks and their reply threads in a relational store,
//! enforces owner-or-admin rules on every mutation, and provides a client-side
//! cache that applies changes optimistically and rolls them back when the
//! server refuses.
//!
//! # Modules
//!
//! * [`service`] - Create/read/update/delete for tasks and comments
//! * [`tree`] - Reply forest reconstruction from flat comment records
//! * [`cascade`] - Atomic deletion of a comment and all of its replies
//! * [`auth`] - Owner-or-admin authorization policy
//! * [`client`] - Optimistic client mirror of tasks and comment threads
//! * [`storage`] / [`repositories`] - SeaORM store and queries

/// Request and response shapes
pub mod api;

/// Authorization policy and caller identity
pub mod auth;

/// Cascade deletion of comment subtrees
pub mod cascade;

/// Client cache and optimistic controller
pub mod client;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// SeaORM entity models for database tables
pub mod entities;

/// Error taxonomy
pub mod error;

/// Logging setup
pub mod logger;

/// Repository layer for database operations
pub mod repositories;

/// Mutation service
pub mod service;

/// Local storage layer
pub mod storage;

/// Comment tree builder and forest helpers
pub mod tree;

// Re-export entity models for convenient access
pub use entities::{comment, task};
