/*!
 * Form field descriptions for navigation item types and extra fields.
 */

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of form input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Toggle,
    /// Select with `(value, label)` options in display order
    Select {
        #[serde(default)]
        options: Vec<(String, String)>,
    },
}

/// A single form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Key the value is stored under
    pub name: String,

    /// Label shown to editors; defaults to the name
    #[serde(default)]
    pub label: Option<String>,

    #[serde(flatten)]
    pub kind: FieldKind,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub default: Option<Value>,
}

impl FieldSpec {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            required: false,
            default: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn textarea(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Textarea)
    }

    pub fn toggle(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Toggle)
    }

    /// Select input; options are `(value, label)` pairs
    pub fn select<I, K, L>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        let options = options
            .into_iter()
            .map(|(value, label)| (value.into(), label.into()))
            .collect();
        Self::new(name, FieldKind::Select { options })
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Label to display, falling back to the field name
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A navigation item type: a display name and the fields it collects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    pub name: String,

    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl ItemType {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
