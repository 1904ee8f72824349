/*!
 * Validation service that runs rules over submitted form data.
 *
 * Each rule is attached to a field path. A duplicate in one field is
 * recorded in the error bag and the pass continues with the next field;
 * infrastructure errors abort the pass.
 */

use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::unique_translation::{RuleOutcome, UniqueTranslationRule};
use crate::errors::ValidationError;
use crate::locale::LocaleContext;

/// Failure messages collected per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty error bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    /// Whether any field failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Messages for a field
    pub fn get(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First message for a field
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over failing fields and their messages
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Runs uniqueness rules for a form submission
#[derive(Debug, Clone)]
pub struct ValidationService {
    locale: LocaleContext,
    rules: Vec<(String, UniqueTranslationRule)>,
}

impl ValidationService {
    /// Create a service validating against the given locale context
    pub fn new(locale: LocaleContext) -> Self {
        Self {
            locale,
            rules: Vec::new(),
        }
    }

    /// Attach a rule to a field path (`slug`, `data.slug`)
    pub fn with_rule(mut self, field: impl Into<String>, rule: UniqueTranslationRule) -> Self {
        self.add_rule(field, rule);
        self
    }

    /// Attach a rule to a field path
    pub fn add_rule(&mut self, field: impl Into<String>, rule: UniqueTranslationRule) {
        self.rules.push((field.into(), rule));
    }

    /// Locale context used for every rule
    pub fn locale(&self) -> &LocaleContext {
        &self.locale
    }

    /// Validate a submission, collecting failures per field
    pub fn validate(&self, data: &Map<String, Value>) -> Result<ValidationErrors, ValidationError> {
        let mut errors = ValidationErrors::new();

        for (field, rule) in &self.rules {
            let Some(value) = lookup_path(data, field) else {
                debug!("Field {} not submitted, skipping", field);
                continue;
            };

            if let RuleOutcome::Duplicate { message, .. } =
                rule.validate_against(field, value, &self.locale, data)?
            {
                errors.add(field.clone(), message);
            }
        }

        debug!(
            "Validated {} field(s), {} failing",
            self.rules.len(),
            errors.len()
        );
        Ok(errors)
    }
}

/// Look a dotted path up in form data; a literal key wins over nesting
fn lookup_path<'a>(data: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = data.get(path) {
        return Some(value);
    }

    let mut segments = path.split('.');
    let first = data.get(segments.next()?)?;
    segments.try_fold(first, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
