/*!
 * # Sky CMS - translatable content with locale-scoped uniqueness
 * 
 * A Rust library for content records (posts, pages, tags, FAQs, library
 * items, navigations) whose text attributes hold one value per locale.
 * 
 * ## Features
 * 
 * - Uniqueness validation scoped to the active editing locale
 * - Self-exclusion when editing an existing record
 * - SQLite storage with JSON translation columns
 * - In-memory store for tests and embedding
 * - Plugin configuration: resources, option lists, navigation item types
 * - ISO 639 language code support
 * 
 * ## Architecture
 * 
 * The library is organized in these main modules:
 * - `validation`: Validation rules and services:
 *   - `validation::unique_translation`: Locale-scoped uniqueness rule
 *   - `validation::service`: Runs rules over a form submission
 * - `locale`: Active locale resolution and ISO language helpers
 * - `registry`: Model tag resolution
 * - `store`: Record store abstraction and the in-memory store
 * - `database`: SQLite persistence
 * - `plugin`: Plugin builder and configuration file
 * - `slug`: URL slug helpers
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod database;
pub mod errors;
pub mod locale;
pub mod plugin;
pub mod registry;
pub mod slug;
pub mod store;
pub mod validation;

// Re-export main types for easier usage
pub use errors::{AppError, ConfigError, StoreError, ValidationError};
pub use locale::LocaleContext;
pub use plugin::{SkyConfig, SkyPlugin};
pub use registry::{ModelBinding, ModelRegistry};
pub use store::{MemoryStore, RecordStore, TranslationQuery};
pub use validation::{RuleOutcome, UniqueTranslationRule, ValidationErrors, ValidationService};
