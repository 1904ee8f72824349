/*!
 * Record store abstraction used by validation rules.
 *
 * A `RecordStore` answers one question: does a record of a given model hold
 * a given value for a translatable column in a given locale, optionally
 * ignoring one record key. Implementations:
 * - `database::Repository`: SQLite, queried with `json_extract`
 * - `MemoryStore`: in-process records behind a read/write lock
 */

pub mod memory;

use serde_json::Value;

use crate::database::models::ModelType;
use crate::errors::StoreError;
use crate::locale::is_safe_locale_key;

pub use memory::MemoryStore;

/// Query capability consumed by the uniqueness rule
pub trait RecordStore: Send + Sync {
    /// Whether any record matches the query
    fn translation_exists(&self, query: &TranslationQuery) -> Result<bool, StoreError>;
}

/// Equality lookup on one locale entry of a translatable column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationQuery {
    /// Model whose records are searched
    pub model: ModelType,
    /// Translatable column
    pub column: String,
    /// Locale key inside the column's JSON object
    pub locale: String,
    /// Value compared against the stored translation
    pub value: String,
    /// Record key left out of the search
    pub exclude_key: Option<i64>,
}

impl TranslationQuery {
    /// Build a query for `<column>-><locale> = value`
    pub fn new(
        model: ModelType,
        column: impl Into<String>,
        locale: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            model,
            column: column.into(),
            locale: locale.into(),
            value: value.into(),
            exclude_key: None,
        }
    }

    /// Leave the record with this key out of the search
    pub fn excluding(mut self, key: i64) -> Self {
        self.exclude_key = Some(key);
        self
    }

    /// JSON path addressing the locale entry
    pub fn json_path(&self) -> String {
        format!("$.\"{}\"", self.locale)
    }

    /// Reject columns and locales that cannot be placed in a query
    pub fn check(&self) -> Result<(), StoreError> {
        if !self.model.is_translatable(&self.column) {
            return Err(StoreError::UnknownColumn {
                model: self.model.to_string(),
                column: self.column.clone(),
            });
        }

        if !is_safe_locale_key(&self.locale) {
            return Err(StoreError::InvalidLocale(self.locale.clone()));
        }

        Ok(())
    }
}

/// Text form of a candidate value as compared against stored translations.
///
/// Translations are stored as strings, so scalars compare by their string
/// form. `null` never matches; arrays and objects compare as JSON text.
pub fn comparable_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
