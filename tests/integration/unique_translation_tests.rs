/*!
 * Locale-scoped uniqueness against a SQLite repository
 */

use serde_json::{json, Value};

use sky_cms::database::models::{FaqRecord, LibraryRecord, PostRecord, TranslatableText};
use sky_cms::errors::{StoreError, ValidationError};
use sky_cms::locale::LocaleContext;
use sky_cms::validation::{RuleOutcome, UniqueTranslationRule};

use crate::common::{form, init_logger, memory_repository, registry_for, seed_tag};

#[test]
fn test_tagSlug_takenInActiveLocale_shouldReportDuplicate() {
    init_logger();
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    seed_tag(&repo, "en", "news").unwrap();

    let rule = UniqueTranslationRule::for_model(&registry, "Tag", None).unwrap();
    let outcome = rule
        .validate("slug", &json!("news"), &LocaleContext::new("en"))
        .unwrap();

    assert_eq!(
        outcome,
        RuleOutcome::Duplicate {
            attribute: "slug".to_string(),
            locale: "en".to_string(),
            message: "This slug already exists in the selected language: EN".to_string(),
        }
    );
}

#[test]
fn test_tagSlug_editingSameRecord_shouldPass() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    let id = seed_tag(&repo, "en", "news").unwrap();

    let rule = UniqueTranslationRule::for_model(&registry, "Tag", Some(id)).unwrap();
    let outcome = rule
        .validate("slug", &json!("news"), &LocaleContext::new("en"))
        .unwrap();

    assert_eq!(outcome, RuleOutcome::Passed);
}

#[test]
fn test_tagSlug_editingOtherRecord_shouldStillReportDuplicate() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    seed_tag(&repo, "en", "news").unwrap();
    let other = seed_tag(&repo, "en", "sports").unwrap();

    let rule = UniqueTranslationRule::for_model(&registry, "Tag", Some(other)).unwrap();
    assert!(rule
        .validate("slug", &json!("news"), &LocaleContext::new("en"))
        .unwrap()
        .is_duplicate());
}

#[test]
fn test_tagSlug_withIgnoreDisabled_shouldCountSelf() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    let id = seed_tag(&repo, "en", "news").unwrap();

    let rule = UniqueTranslationRule::for_model(&registry, "Tag", Some(id))
        .unwrap()
        .ignore_record(false);

    assert!(rule
        .validate("slug", &json!("news"), &LocaleContext::new("en"))
        .unwrap()
        .is_duplicate());
}

#[test]
fn test_tagSlug_inOtherLocale_shouldPass() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    seed_tag(&repo, "en", "news").unwrap();

    let rule = UniqueTranslationRule::for_model(&registry, "Tag", None).unwrap();
    let outcome = rule
        .validate("slug", &json!("news"), &LocaleContext::new("en").with_active("fr"))
        .unwrap();

    assert_eq!(outcome, RuleOutcome::Passed);
}

#[test]
fn test_tagSlug_sameValueInOtherLocaleOfAnotherRecord_shouldPass() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    seed_tag(&repo, "en", "hello").unwrap();
    let editing = seed_tag(&repo, "fr", "hello").unwrap();

    let rule = UniqueTranslationRule::for_model(&registry, "Tag", Some(editing)).unwrap();

    let in_french = rule
        .validate("slug", &json!("hello"), &LocaleContext::new("fr"))
        .unwrap();
    assert_eq!(in_french, RuleOutcome::Passed);

    let in_english = rule
        .validate("slug", &json!("hello"), &LocaleContext::new("en"))
        .unwrap();
    assert!(matches!(
        in_english,
        RuleOutcome::Duplicate { ref locale, .. } if locale == "en"
    ));
}

#[test]
fn test_validate_repeated_shouldBeIdempotent() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    seed_tag(&repo, "en", "news").unwrap();
    let rule = UniqueTranslationRule::for_model(&registry, "Tag", None).unwrap();
    let ctx = LocaleContext::new("en");

    let first = rule.validate("slug", &json!("news"), &ctx).unwrap();
    let second = rule.validate("slug", &json!("news"), &ctx).unwrap();

    assert_eq!(first, second);
    assert_eq!(repo.list_tags(None).unwrap().len(), 1);
}

#[test]
fn test_nestedAttribute_withDataLocale_shouldUseInjectedLocale() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    seed_tag(&repo, "fr", "actualites").unwrap();

    let rule = UniqueTranslationRule::for_model(&registry, "Tag", None)
        .unwrap()
        .with_data(form(json!({ "activeLocale": "fr" })));
    let outcome = rule
        .validate("data.slug", &json!("actualites"), &LocaleContext::new("en"))
        .unwrap();

    assert!(matches!(
        outcome,
        RuleOutcome::Duplicate { ref attribute, ref locale, .. } if attribute == "slug" && locale == "fr"
    ));
}

#[test]
fn test_localeSuffixedAttribute_inOtherActiveLocale_shouldAddressParentColumn() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    seed_tag(&repo, "fr", "actualites").unwrap();

    let rule = UniqueTranslationRule::for_model(&registry, "Tag", None)
        .unwrap()
        .with_data(form(json!({ "activeLocale": "fr" })));
    let outcome = rule
        .validate("slug.en", &json!("actualites"), &LocaleContext::new("en"))
        .unwrap();

    assert!(matches!(
        outcome,
        RuleOutcome::Duplicate { ref attribute, ref locale, .. } if attribute == "slug" && locale == "fr"
    ));
}

#[test]
fn test_localeSuffixedAttribute_shouldAddressParentColumn() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    seed_tag(&repo, "en", "news").unwrap();

    let rule = UniqueTranslationRule::for_model(&registry, "Tag", None).unwrap();
    assert!(rule
        .validate("slug.en", &json!("news"), &LocaleContext::new("en"))
        .unwrap()
        .is_duplicate());
}

#[test]
fn test_postAndPage_sharingTable_shouldBeScopedSeparately() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    repo.create_post(&PostRecord::post(
        TranslatableText::single("en", "About"),
        TranslatableText::single("en", "about"),
    ))
    .unwrap();
    let ctx = LocaleContext::new("en");

    let post_rule = UniqueTranslationRule::for_model(&registry, "Post", None).unwrap();
    let page_rule = UniqueTranslationRule::for_model(&registry, "Page", None).unwrap();

    assert!(post_rule.validate("slug", &json!("about"), &ctx).unwrap().is_duplicate());
    assert_eq!(
        page_rule.validate("slug", &json!("about"), &ctx).unwrap(),
        RuleOutcome::Passed
    );
}

#[test]
fn test_otherModels_shouldCheckTheirOwnColumns() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    repo.create_faq(&FaqRecord::new(
        TranslatableText::single("en", "How do I sign up?"),
        TranslatableText::single("en", "Use the form."),
    ))
    .unwrap();
    repo.create_library_item(&LibraryRecord::new(
        TranslatableText::single("en", "Brochure"),
        TranslatableText::single("en", "brochure"),
        "FILE",
    ))
    .unwrap();
    let ctx = LocaleContext::new("en");

    let faq_rule = UniqueTranslationRule::for_model(&registry, "Faq", None).unwrap();
    assert!(faq_rule
        .validate("question", &json!("How do I sign up?"), &ctx)
        .unwrap()
        .is_duplicate());

    let library_rule = UniqueTranslationRule::for_model(&registry, "Library", None).unwrap();
    assert!(library_rule
        .validate("slug", &json!("brochure"), &ctx)
        .unwrap()
        .is_duplicate());
    assert!(!library_rule
        .validate("slug", &json!("brochure"), &ctx.clone().with_active("de"))
        .unwrap()
        .is_duplicate());
}

#[test]
fn test_nullCandidate_shouldPassWithoutQuery() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    let rule = UniqueTranslationRule::for_model(&registry, "Tag", None).unwrap();

    assert_eq!(
        rule.validate("slug", &Value::Null, &LocaleContext::new("en")).unwrap(),
        RuleOutcome::Passed
    );
}

#[test]
fn test_numericCandidate_shouldCompareAsText() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    seed_tag(&repo, "en", "2024").unwrap();

    let rule = UniqueTranslationRule::for_model(&registry, "Tag", None).unwrap();
    assert!(rule
        .validate("slug", &json!(2024), &LocaleContext::new("en"))
        .unwrap()
        .is_duplicate());
}

#[test]
fn test_unknownColumn_shouldFailBeforeQuerying() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    let rule = UniqueTranslationRule::for_model(&registry, "Tag", None).unwrap();

    let result = rule.validate("created_at", &json!("x"), &LocaleContext::new("en"));
    assert!(matches!(
        result,
        Err(ValidationError::Store(StoreError::UnknownColumn { .. }))
    ));
}

#[test]
fn test_missingLocale_shouldFailClosed() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    seed_tag(&repo, "en", "news").unwrap();
    let rule = UniqueTranslationRule::for_model(&registry, "Tag", None).unwrap();

    let result = rule.validate("slug", &json!("news"), &LocaleContext::empty());
    assert!(matches!(result, Err(ValidationError::MissingLocale)));
}

#[test]
fn test_validateWith_shouldReportThroughCallback() {
    let repo = memory_repository().unwrap();
    let registry = registry_for(&repo);
    seed_tag(&repo, "de", "nachrichten").unwrap();
    let rule = UniqueTranslationRule::for_model(&registry, "Tag", None).unwrap();

    let mut reported = Vec::new();
    rule.validate_with(
        "slug",
        &json!("nachrichten"),
        &LocaleContext::new("de"),
        |attribute, message| reported.push((attribute.to_string(), message)),
    )
    .unwrap();

    assert_eq!(reported.len(), 1);
    assert_eq!(
        reported[0].1.as_deref(),
        Some("This slug already exists in the selected language: DE")
    );
}
