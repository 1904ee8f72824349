/*!
 * Tests for the plugin builder and configuration file
 */

use std::sync::Arc;

use sky_cms::errors::ConfigError;
use sky_cms::plugin::{
    FieldKind, FieldSpec, LogLevel, ResourceKind, SkyConfig, SkyPlugin, EXTERNAL_LINK,
};

use crate::common::create_temp_dir;

/// Test default plugin values
#[test]
fn test_default_plugin_withNoParameters_shouldHaveCorrectDefaults() {
    let plugin = SkyPlugin::make();

    assert_eq!(plugin.id(), "zeus-sky");
    assert_eq!(plugin.get_navigation_group_label(), "Sky");
    assert_eq!(plugin.enabled_resources(), ResourceKind::ALL.to_vec());
    assert_eq!(
        plugin.get_library_types().keys().cloned().collect::<Vec<_>>(),
        vec!["FILE", "IMAGE", "VIDEO"]
    );
    assert_eq!(
        plugin.get_tag_types().values().cloned().collect::<Vec<_>>(),
        vec!["Tag", "Category", "Library", "Faq"]
    );
    assert!(plugin.extra_fields().is_empty());
    assert!(plugin.has_badges());
}

#[test]
fn test_optionLists_shouldKeepConfiguredOrder() {
    let plugin = SkyPlugin::make()
        .translator(Arc::new(|text: &str| text.to_uppercase()))
        .tag_types([("topic", "Topic"), ("author", "Author"), ("brand", "Brand")]);

    assert_eq!(
        plugin.get_tag_types().keys().cloned().collect::<Vec<_>>(),
        vec!["topic", "author", "brand"]
    );
    assert_eq!(
        plugin.get_tag_types().values().cloned().collect::<Vec<_>>(),
        vec!["TOPIC", "AUTHOR", "BRAND"]
    );
}

#[test]
fn test_default_tagTypes_shouldListTagFirst() {
    let keys: Vec<String> = SkyPlugin::make().get_tag_types().keys().cloned().collect();
    assert_eq!(keys, vec!["tag", "category", "library", "faq"]);
}

#[test]
fn test_resourceToggles_shouldBeIndependent() {
    let plugin = SkyPlugin::make()
        .post_resource(false)
        .navigation_resource(false)
        .library_resource(true);

    assert!(!plugin.has_post_resource());
    assert!(plugin.has_page_resource());
    assert!(plugin.has_library_resource());
    assert!(!plugin.has_navigation_resource());
    assert_eq!(
        plugin.enabled_resources(),
        vec![ResourceKind::Page, ResourceKind::Faq, ResourceKind::Library, ResourceKind::Tag]
    );
}

#[test]
fn test_tagTypes_withTranslator_shouldCacheUntilReplaced() {
    let plugin = SkyPlugin::make()
        .translator(Arc::new(|text: &str| format!("{} (de)", text)))
        .tag_types([("topic", "Topic")]);

    assert_eq!(
        plugin.get_tag_types().get("topic").map(String::as_str),
        Some("Topic (de)")
    );
    let first = plugin.get_tag_types() as *const _;
    let second = plugin.get_tag_types() as *const _;
    assert_eq!(first, second);
}

#[test]
fn test_itemTypes_shouldMergeCustomTypesAfterExternalLink() {
    let plugin = SkyPlugin::make()
        .item_type("Page Link", vec![FieldSpec::text("page_id").required()], None)
        .item_type("Post Link", vec![FieldSpec::text("post_id")], Some("post"));

    let keys: Vec<String> = plugin.item_types().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec![EXTERNAL_LINK, "page-link", "post"]);

    let types = plugin.item_types();
    let target = types[0].1.field("target").unwrap();
    match &target.kind {
        FieldKind::Select { options } => {
            assert_eq!(options[0], (String::new(), "Same tab".to_string()));
            assert_eq!(options[1].0, "_blank");
        }
        other => panic!("expected select, got {:?}", other),
    }
}

#[test]
fn test_withExtraFields_shouldExposeFields() {
    let plugin = SkyPlugin::make().with_extra_fields(vec![
        FieldSpec::textarea("summary").label("Summary"),
        FieldSpec::toggle("featured"),
    ]);

    assert_eq!(plugin.extra_fields().len(), 2);
    assert_eq!(plugin.extra_fields()[0].display_label(), "Summary");
}

#[test]
fn test_config_saveAndLoad_shouldRoundTripThroughFile() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = SkyConfig::default();
    config.default_locale = "de".to_string();
    config.log_level = LogLevel::Debug;
    config.hidden_resources.push(ResourceKind::Faq);
    config.save(&path).unwrap();

    let loaded = SkyConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(!SkyPlugin::from_config(&loaded)
        .enabled_resources()
        .contains(&ResourceKind::Faq));
}

#[test]
fn test_config_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = SkyConfig::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config, SkyConfig::default());
}

#[test]
fn test_config_load_withMalformedJson_shouldReturnParseError() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(SkyConfig::load(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_validate_withEmptyTypeKey_shouldFail() {
    let mut config = SkyConfig::default();
    config.tag_types.insert(" ".to_string(), "Blank".to_string());

    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}
