use isolang::Language;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ValidationError;

/// Locale utilities for translatable content
///
/// Translatable columns store one value per locale code. This module carries
/// the locale explicitly through validation (`LocaleContext`) and provides
/// helpers for checking and displaying locale codes.
/// Key under which form data carries the locale selected in the editor
pub const ACTIVE_LOCALE_KEY: &str = "activeLocale";

/// Locale state for one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleContext {
    /// Locale selected for the current request, if any
    #[serde(default)]
    pub active_locale: Option<String>,

    /// Application-wide fallback locale
    #[serde(default)]
    pub default_locale: Option<String>,
}

impl LocaleContext {
    /// Create a context with only a default locale
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            active_locale: None,
            default_locale: Some(default_locale.into()),
        }
    }

    /// Create a context with neither an active nor a default locale
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the active locale
    pub fn with_active(mut self, locale: impl Into<String>) -> Self {
        self.active_locale = Some(locale.into());
        self
    }

    /// Resolve the locale to validate against.
    ///
    /// Order: `activeLocale` in the injected data, then the active locale,
    /// then the default locale. Fails closed when none is set.
    pub fn resolve(&self, data: Option<&Map<String, Value>>) -> Result<String, ValidationError> {
        let from_data = data
            .and_then(|d| d.get(ACTIVE_LOCALE_KEY))
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty());

        let candidate = from_data
            .or(self.active_locale.as_deref().filter(|s| !s.trim().is_empty()))
            .or(self.default_locale.as_deref().filter(|s| !s.trim().is_empty()))
            .ok_or(ValidationError::MissingLocale)?;

        let locale = normalize_locale(candidate)?;
        debug!("Resolved active locale: {}", locale);
        Ok(locale)
    }
}

/// Check that a locale code is usable as a key inside a JSON locale map.
///
/// The code is trimmed but its case is preserved, since stored maps are keyed
/// by the exact code the editor used.
pub fn normalize_locale(code: &str) -> Result<String, ValidationError> {
    let trimmed = code.trim();

    if !is_safe_locale_key(trimmed) {
        return Err(ValidationError::InvalidLocale(code.to_string()));
    }

    if !is_known_language(trimmed) {
        warn!("Locale '{}' is not a known ISO 639 language code", trimmed);
    }

    Ok(trimmed.to_string())
}

/// Whether a code can be spliced into a JSON path (`$."<code>"`)
pub fn is_safe_locale_key(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= 35
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Primary language subtag of a locale (`pt-BR` -> `pt`)
fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Look up the language for a locale code (ISO 639-1 or 639-3 primary subtag)
fn lookup_language(code: &str) -> Option<Language> {
    let primary = primary_subtag(code);
    match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    }
}

/// Whether the locale's primary subtag is a known ISO 639 language
pub fn is_known_language(code: &str) -> bool {
    lookup_language(code).is_some()
}

/// English name of the locale's language, if known
pub fn language_name(code: &str) -> Option<String> {
    lookup_language(code).map(|lang| lang.to_name().to_string())
}

/// Locale as shown in user-facing messages
pub fn display_locale(code: &str) -> String {
    code.to_uppercase()
}
