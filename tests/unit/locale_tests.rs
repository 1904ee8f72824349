/*!
 * Tests for locale resolution and language helpers
 */

use serde_json::json;
use sky_cms::errors::ValidationError;
use sky_cms::locale::{display_locale, is_known_language, language_name, normalize_locale, LocaleContext};

use crate::common::form;

#[test]
fn test_resolve_withOnlyDefault_shouldUseDefault() {
    let ctx = LocaleContext::new("en");
    assert_eq!(ctx.resolve(None).unwrap(), "en");
}

#[test]
fn test_resolve_withActiveLocale_shouldPreferActiveOverDefault() {
    let ctx = LocaleContext::new("en").with_active("de");
    assert_eq!(ctx.resolve(None).unwrap(), "de");
}

#[test]
fn test_resolve_withInjectedData_shouldPreferData() {
    let ctx = LocaleContext::new("en").with_active("de");
    let data = form(json!({ "activeLocale": "fr", "slug": "bonjour" }));

    assert_eq!(ctx.resolve(Some(&data)).unwrap(), "fr");
}

#[test]
fn test_resolve_withBlankDataLocale_shouldFallBack() {
    let ctx = LocaleContext::new("en");
    let data = form(json!({ "activeLocale": "  " }));

    assert_eq!(ctx.resolve(Some(&data)).unwrap(), "en");
}

#[test]
fn test_resolve_withNothingSet_shouldFailClosed() {
    let result = LocaleContext::empty().resolve(Some(&form(json!({}))));
    assert!(matches!(result, Err(ValidationError::MissingLocale)));
}

#[test]
fn test_normalizeLocale_shouldTrimAndKeepCase() {
    assert_eq!(normalize_locale(" pt-BR ").unwrap(), "pt-BR");
    assert!(matches!(
        normalize_locale("en'); --"),
        Err(ValidationError::InvalidLocale(_))
    ));
}

#[test]
fn test_languageHelpers_shouldUsePrimarySubtag() {
    assert!(is_known_language("en"));
    assert!(is_known_language("pt-BR"));
    assert!(!is_known_language("zz"));
    assert_eq!(language_name("fr").as_deref(), Some("French"));
    assert_eq!(display_locale("pt-br"), "PT-BR");
}
