/*!
 * Locale-scoped uniqueness rule for translatable attributes.
 *
 * A translatable column holds one value per locale, so a plain unique index
 * cannot protect it. This rule checks, before a record is saved, that no
 * other record of the same model already uses the candidate value for the
 * active locale.
 *
 * The check is not atomic: two concurrent submissions can both pass. Hosts
 * that need a hard guarantee must also enforce it in storage.
 */

use log::debug;
use serde_json::{Map, Value};

use crate::database::models::ModelType;
use crate::errors::ValidationError;
use crate::locale::{display_locale, LocaleContext};
use crate::registry::{ModelBinding, ModelRegistry};
use crate::store::{comparable_text, TranslationQuery};

/// Message reported for a duplicate value.
///
/// `:attribute` is replaced by the column name and `:locale` by the
/// upper-cased locale code.
pub const DEFAULT_MESSAGE: &str = "This :attribute already exists in the selected language: :locale";

/// Outcome of one rule evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// No other record holds the value
    Passed,
    /// Another record already holds the value in this locale
    Duplicate {
        /// Column that was checked
        attribute: String,
        /// Locale the check ran against
        locale: String,
        /// Rendered failure message
        message: String,
    },
}

impl RuleOutcome {
    /// Whether a duplicate was found
    pub fn is_duplicate(&self) -> bool {
        matches!(self, RuleOutcome::Duplicate { .. })
    }

    /// Failure message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            RuleOutcome::Passed => None,
            RuleOutcome::Duplicate { message, .. } => Some(message),
        }
    }
}

/// Uniqueness rule for one translatable attribute
#[derive(Debug, Clone)]
pub struct UniqueTranslationRule {
    binding: ModelBinding,
    record: Option<i64>,
    ignore_record: bool,
    data: Map<String, Value>,
    message: String,
}

impl UniqueTranslationRule {
    /// Create a rule for a resolved model.
    ///
    /// `record` is the key of the record being edited, if any.
    pub fn new(binding: ModelBinding, record: Option<i64>, ignore_record: bool) -> Self {
        Self {
            binding,
            record,
            ignore_record,
            data: Map::new(),
            message: DEFAULT_MESSAGE.to_string(),
        }
    }

    /// Resolve `tag` in the registry and create a rule that ignores `record`
    pub fn for_model(
        registry: &ModelRegistry,
        tag: &str,
        record: Option<i64>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(registry.resolve(tag)?, record, true))
    }

    /// Whether the current record is left out of the search
    pub fn ignore_record(mut self, ignore: bool) -> Self {
        self.ignore_record = ignore;
        self
    }

    /// Provide the data under validation (may carry `activeLocale`)
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.set_data(data);
        self
    }

    /// Replace the data under validation
    pub fn set_data(&mut self, data: Map<String, Value>) {
        self.data = data;
    }

    /// Use a different failure message template
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = template.into();
        self
    }

    /// Model binding the rule queries
    pub fn binding(&self) -> &ModelBinding {
        &self.binding
    }

    /// Column addressed by an attribute path.
    ///
    /// The last path segment names the column (`data.slug` -> `slug`). A
    /// locale-suffixed path (`slug.en`, `slug.fr`) addresses its parent
    /// column when the suffix is the active locale or is not itself a
    /// translatable column of `model`. The check still runs in the active
    /// locale.
    pub fn column_for(model: ModelType, attribute: &str, locale: &str) -> String {
        let mut segments = attribute.rsplit('.');
        let last = segments.next().unwrap_or(attribute);

        match segments.next() {
            Some(parent)
                if !parent.is_empty()
                    && (last == locale
                        || (!model.is_translatable(last) && model.is_translatable(parent))) =>
            {
                parent.to_string()
            }
            _ => last.to_string(),
        }
    }

    /// Check the candidate value using the rule's own data
    pub fn validate(
        &self,
        attribute: &str,
        value: &Value,
        locale: &LocaleContext,
    ) -> Result<RuleOutcome, ValidationError> {
        self.validate_against(attribute, value, locale, &self.data)
    }

    /// Check the candidate value against explicitly supplied form data
    pub fn validate_against(
        &self,
        attribute: &str,
        value: &Value,
        locale: &LocaleContext,
        data: &Map<String, Value>,
    ) -> Result<RuleOutcome, ValidationError> {
        let active_locale = locale.resolve(Some(data))?;
        let column = Self::column_for(self.binding.model(), attribute, &active_locale);

        let Some(candidate) = comparable_text(value) else {
            debug!("Skipping uniqueness check of {} for null value", column);
            return Ok(RuleOutcome::Passed);
        };

        let mut query = TranslationQuery::new(
            self.binding.model(),
            column.clone(),
            active_locale.clone(),
            candidate,
        );
        if let (true, Some(key)) = (self.ignore_record, self.record) {
            query = query.excluding(key);
        }

        if !self.binding.store().translation_exists(&query)? {
            return Ok(RuleOutcome::Passed);
        }

        debug!(
            "Duplicate {} for {} in locale {}",
            column,
            self.binding.tag(),
            active_locale
        );
        Ok(RuleOutcome::Duplicate {
            message: self.render_message(&column, &active_locale),
            attribute: column,
            locale: active_locale,
        })
    }

    /// Callback form: calls `fail(attribute, Some(message))` on a duplicate
    pub fn validate_with<F>(
        &self,
        attribute: &str,
        value: &Value,
        locale: &LocaleContext,
        mut fail: F,
    ) -> Result<(), ValidationError>
    where
        F: FnMut(&str, Option<String>),
    {
        if let RuleOutcome::Duplicate { message, .. } = self.validate(attribute, value, locale)? {
            fail(attribute, Some(message));
        }
        Ok(())
    }

    fn render_message(&self, column: &str, locale: &str) -> String {
        self.message
            .replace(":attribute", column)
            .replace(":locale", &display_locale(locale))
    }
}
