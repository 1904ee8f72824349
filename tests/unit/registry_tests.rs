/*!
 * Tests for the model registry and the in-memory store
 */

use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

use sky_cms::database::models::{ModelType, PostRecord, TagRecord, TranslatableText};
use sky_cms::errors::{StoreError, ValidationError};
use sky_cms::locale::LocaleContext;
use sky_cms::registry::ModelRegistry;
use sky_cms::store::{MemoryStore, RecordStore, TranslationQuery};
use sky_cms::validation::UniqueTranslationRule;

fn memory_registry() -> (Arc<MemoryStore>, ModelRegistry) {
    let store = Arc::new(MemoryStore::new());
    let shared: Arc<dyn RecordStore> = store.clone();
    (store, ModelRegistry::with_defaults(shared))
}

#[test]
fn test_memoryStore_translationExists_shouldMatchLocaleEntryOnly() {
    let store = MemoryStore::new();
    let tag = TagRecord::new(
        TranslatableText::single("en", "News"),
        TranslatableText::single("en", "news").with("fr", "actualites"),
        "tag",
    );
    let id = store.insert(&tag);

    let query = TranslationQuery::new(ModelType::Tag, "slug", "fr", "actualites");
    assert!(store.translation_exists(&query).unwrap());

    let wrong_locale = TranslationQuery::new(ModelType::Tag, "slug", "de", "actualites");
    assert!(!store.translation_exists(&wrong_locale).unwrap());

    assert!(!store.translation_exists(&query.clone().excluding(id)).unwrap());
}

#[test]
fn test_memoryStore_withUnknownColumn_shouldFail() {
    let store = MemoryStore::new();
    let query = TranslationQuery::new(ModelType::Faq, "slug", "en", "x");

    assert!(matches!(
        store.translation_exists(&query),
        Err(StoreError::UnknownColumn { .. })
    ));
}

#[test]
fn test_memoryStore_setColumnAndRemove_shouldAffectLookups() {
    let store = MemoryStore::new();
    let id = store.insert(&PostRecord::post(
        TranslatableText::single("en", "Hello"),
        TranslatableText::single("en", "hello"),
    ));
    let query = TranslationQuery::new(ModelType::Post, "slug", "en", "hello-world");
    assert!(!store.translation_exists(&query).unwrap());

    assert!(store.set_column(ModelType::Post, id, "slug", TranslatableText::single("en", "hello-world")));
    assert!(store.translation_exists(&query).unwrap());

    assert!(store.remove(ModelType::Post, id));
    assert!(store.is_empty());
    assert!(!store.translation_exists(&query).unwrap());
}

#[test]
fn test_rule_withMemoryStore_shouldKeepPostsAndPagesApart() {
    let (store, registry) = memory_registry();
    store.insert(&PostRecord::page(
        TranslatableText::single("en", "About"),
        TranslatableText::single("en", "about"),
    ));
    let ctx = LocaleContext::new("en");

    let post_rule = UniqueTranslationRule::for_model(&registry, "Post", None).unwrap();
    let page_rule = UniqueTranslationRule::for_model(&registry, "Page", None).unwrap();

    assert!(!post_rule.validate("slug", &json!("about"), &ctx).unwrap().is_duplicate());
    assert!(page_rule.validate("slug", &json!("about"), &ctx).unwrap().is_duplicate());
}

#[test]
fn test_registry_withAlias_shouldResolveToConfiguredModel() {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let mut overrides = BTreeMap::new();
    overrides.insert("Category".to_string(), "Tag".to_string());

    let registry = ModelRegistry::with_overrides(store, &overrides).unwrap();

    assert!(registry.tags().contains(&"Category"));
    assert_eq!(registry.resolve("Category").unwrap().model(), ModelType::Tag);
    assert!(matches!(
        registry.resolve("Widget"),
        Err(ValidationError::UnresolvableModel(_))
    ));
}

#[test]
fn test_registry_builder_laterBindingShouldWin() {
    let first: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let second: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());

    let registry = ModelRegistry::builder()
        .bind("Content", ModelType::Post, first)
        .bind("Content", ModelType::Page, second)
        .build();

    assert_eq!(registry.tags(), vec!["Content"]);
    assert_eq!(registry.resolve("Content").unwrap().model(), ModelType::Page);
}
