/*!
 * Database module for persistent storage of Sky content.
 *
 * This module provides SQLite-based persistence for:
 * - Posts and pages (one table, scoped by `post_type`)
 * - Tags, FAQs, library items and navigations
 * - Locale-scoped lookups over JSON translation columns
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
pub use repository::Repository;
