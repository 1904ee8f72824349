/*!
 * Common test utilities for the sky-cms test suite
 */

use anyhow::Result;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use sky_cms::database::models::{TagRecord, TranslatableText};
use sky_cms::database::{DatabaseConnection, Repository};
use sky_cms::registry::ModelRegistry;
use sky_cms::store::RecordStore;

/// Route library logs to the test output (`RUST_LOG=debug cargo test`)
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Path of a database file inside a temporary directory
pub fn temp_db_path(dir: &Path) -> PathBuf {
    dir.join("data").join("sky.db")
}

/// In-memory SQLite repository shared behind an Arc
pub fn memory_repository() -> Result<Arc<Repository>> {
    Ok(Arc::new(Repository::new(DatabaseConnection::new_in_memory()?)))
}

/// Registry binding every model to the given repository
pub fn registry_for(repo: &Arc<Repository>) -> ModelRegistry {
    let store: Arc<dyn RecordStore> = repo.clone();
    ModelRegistry::with_defaults(store)
}

/// Insert a tag with one locale entry for both name and slug
pub fn seed_tag(repo: &Repository, locale: &str, slug: &str) -> Result<i64> {
    let tag = TagRecord::new(
        TranslatableText::single(locale, slug),
        TranslatableText::single(locale, slug),
        "tag",
    );
    repo.create_tag(&tag)
}

/// JSON object literal as form data
pub fn form(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}
