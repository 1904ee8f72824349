/*!
 * On-disk database lifecycle: create, reopen, validate
 */

use serde_json::json;
use std::sync::Arc;

use sky_cms::database::models::{NavigationRecord, TranslatableText};
use sky_cms::database::{DatabaseConnection, Repository};
use sky_cms::locale::LocaleContext;
use sky_cms::registry::ModelRegistry;
use sky_cms::store::RecordStore;
use sky_cms::validation::UniqueTranslationRule;

use crate::common::{create_temp_dir, init_logger, seed_tag, temp_db_path};

#[test]
fn test_fileDatabase_reopened_shouldKeepRecordsForValidation() {
    init_logger();
    let dir = create_temp_dir().unwrap();
    let path = temp_db_path(dir.path());

    {
        let repo = Repository::new(DatabaseConnection::new(&path).unwrap());
        seed_tag(&repo, "en", "news").unwrap();
    }
    assert!(path.exists());

    let repo = Arc::new(Repository::new(DatabaseConnection::new(&path).unwrap()));
    let store: Arc<dyn RecordStore> = repo.clone();
    let registry = ModelRegistry::with_defaults(store);

    let rule = UniqueTranslationRule::for_model(&registry, "Tag", None).unwrap();
    assert!(rule
        .validate("slug", &json!("news"), &LocaleContext::new("en"))
        .unwrap()
        .is_duplicate());
}

#[test]
fn test_stats_shouldCountRecordsPerModel() {
    let dir = create_temp_dir().unwrap();
    let repo = Repository::new(DatabaseConnection::new(temp_db_path(dir.path())).unwrap());

    seed_tag(&repo, "en", "news").unwrap();
    seed_tag(&repo, "en", "sports").unwrap();
    repo.create_navigation(&NavigationRecord::new(
        TranslatableText::single("en", "Main menu"),
        "main",
    ))
    .unwrap();

    let stats = repo.connection().stats().unwrap();
    assert_eq!(stats.tag_count, 2);
    assert_eq!(stats.navigation_count, 1);
    assert_eq!(stats.post_count, 0);
}

#[test]
fn test_navigationMenu_shouldBeFoundByHandle() {
    let dir = create_temp_dir().unwrap();
    let repo = Repository::new(DatabaseConnection::new(temp_db_path(dir.path())).unwrap());

    let mut menu = NavigationRecord::new(TranslatableText::single("en", "Footer"), "footer");
    menu.items = json!([{ "type": "external-link", "data": { "url": "https://example.com", "target": "_blank" } }]);
    repo.create_navigation(&menu).unwrap();

    let loaded = repo.get_navigation_by_handle("footer").unwrap().unwrap();
    assert_eq!(loaded.name.get("en"), Some("Footer"));
    assert_eq!(loaded.items[0]["data"]["target"], "_blank");
    assert!(repo.get_navigation_by_handle("header").unwrap().is_none());
}
