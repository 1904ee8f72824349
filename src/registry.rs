/*!
 * Model registry.
 *
 * Maps model tags (`"Tag"`, `"Post"`, or any alias configured by the host)
 * to a model type and the record store that holds it. The registry is built
 * once at startup; rules resolve their binding when they are constructed.
 */

use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::database::models::ModelType;
use crate::errors::{ConfigError, ValidationError};
use crate::store::RecordStore;

/// A model tag resolved to its type and store
#[derive(Clone)]
pub struct ModelBinding {
    tag: String,
    model: ModelType,
    store: Arc<dyn RecordStore>,
}

impl ModelBinding {
    /// Bind a model type to a store under a tag
    pub fn new(tag: impl Into<String>, model: ModelType, store: Arc<dyn RecordStore>) -> Self {
        Self {
            tag: tag.into(),
            model,
            store,
        }
    }

    /// Tag the binding was registered under
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Bound model type
    pub fn model(&self) -> ModelType {
        self.model
    }

    /// Store holding the model's records
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }
}

impl fmt::Debug for ModelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBinding")
            .field("tag", &self.tag)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Registry of model bindings
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    bindings: HashMap<String, ModelBinding>,
}

impl ModelRegistry {
    /// Start an empty registry
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::default()
    }

    /// Bind every model type under its canonical name to one store
    pub fn with_defaults(store: Arc<dyn RecordStore>) -> Self {
        ModelType::ALL
            .iter()
            .fold(Self::builder(), |builder, model| {
                builder.bind(model.name(), *model, store.clone())
            })
            .build()
    }

    /// Defaults plus host-configured aliases (`alias -> model type name`)
    pub fn with_overrides(
        store: Arc<dyn RecordStore>,
        overrides: &BTreeMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut registry = Self::with_defaults(store.clone());

        for (tag, model_name) in overrides {
            let model: ModelType = model_name.parse().map_err(|_| {
                ConfigError::Invalid(format!("model '{}' maps to unknown type '{}'", tag, model_name))
            })?;
            debug!("Binding model tag '{}' to {}", tag, model);
            registry
                .bindings
                .insert(tag.clone(), ModelBinding::new(tag.clone(), model, store.clone()));
        }

        Ok(registry)
    }

    /// Resolve a model tag
    pub fn resolve(&self, tag: &str) -> Result<ModelBinding, ValidationError> {
        self.bindings
            .get(tag)
            .cloned()
            .ok_or_else(|| ValidationError::UnresolvableModel(tag.to_string()))
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.bindings.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

/// Builder for `ModelRegistry`
#[derive(Default)]
pub struct ModelRegistryBuilder {
    bindings: HashMap<String, ModelBinding>,
}

impl ModelRegistryBuilder {
    /// Bind a tag; a later binding for the same tag replaces the earlier one
    pub fn bind(mut self, tag: impl Into<String>, model: ModelType, store: Arc<dyn RecordStore>) -> Self {
        let tag = tag.into();
        self.bindings
            .insert(tag.clone(), ModelBinding::new(tag, model, store));
        self
    }

    pub fn build(self) -> ModelRegistry {
        ModelRegistry {
            bindings: self.bindings,
        }
    }
}
