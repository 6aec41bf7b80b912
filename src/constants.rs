//! Constants used throughout the application
//!
//! This module centralizes magic strings, notice text, and other constant values
//! to improve maintainability and consistency.

// Roles
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

// Configuration
pub const APP_NAME: &str = "taskthread";
pub const CONFIG_FILE_NAME: &str = "taskthread.toml";
pub const CONFIG_GENERATED: &str = "Configuration file generated";
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 1;
pub const MAX_CONNECTIONS_LIMIT: u32 = 64;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const LOG_FILE_NAME: &str = "taskthread.log";

// Client identifiers
/// Server ids are 32-bit; anything above this bound was minted locally.
pub const TEMP_ID_FLOOR: i64 = i32::MAX as i64;

// Notices
pub const NOTICE_NOT_ALLOWED: &str = "You are not allowed to";
pub const NOTICE_ONLY_OWNER: &str = "Only the owner or an administrator can change it.";
pub const NOTICE_FAILED: &str = "Failed to";
pub const NOTICE_RETRY: &str = "An unexpected error occurred. Please try again.";
pub const NOTICE_UNSAVED_TASK: &str = "You cannot comment on a task that has not been saved yet.";
