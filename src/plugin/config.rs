use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::fields::{FieldSpec, ItemType};
use super::ordered::{OptionList, OrderedMap};
use super::ResourceKind;
use crate::database::models::ModelType;
use crate::errors::ConfigError;
use crate::locale::{is_known_language, is_safe_locale_key};
use crate::slug::validate_slug;

/// Plugin configuration module
/// This module handles the serialized plugin configuration including loading,
/// validating and saving settings.
/// Represents the plugin configuration file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SkyConfig {
    /// Locale used when a request carries none
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Resource toggles
    #[serde(default)]
    pub resources: ResourceToggles,

    /// Resources registered but hidden from navigation
    #[serde(default)]
    pub hidden_resources: Vec<ResourceKind>,

    /// Library item types (key -> label), in display order
    #[serde(default = "default_library_types")]
    pub library_types: OptionList,

    /// Tag types (key -> label), in display order
    #[serde(default = "default_tag_types")]
    pub tag_types: OptionList,

    /// Custom navigation item types keyed by slug, in registration order
    #[serde(default)]
    pub item_types: OrderedMap<ItemType>,

    /// Extra fields appended to content forms
    #[serde(default)]
    pub extra_fields: Vec<FieldSpec>,

    /// Model tag aliases (tag -> model type name)
    #[serde(default)]
    pub models: BTreeMap<String, String>,

    #[serde(default = "default_navigation_group_label")]
    pub navigation_group_label: String,

    #[serde(default)]
    pub route_name_prefix: Option<String>,

    #[serde(default)]
    pub uploads: UploadConfig,

    /// Show record counts next to navigation entries
    #[serde(default = "default_true")]
    pub badges: bool,

    /// SQLite database file; platform data directory when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Which resources the plugin registers
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ResourceToggles {
    #[serde(default = "default_true")]
    pub post: bool,
    #[serde(default = "default_true")]
    pub page: bool,
    #[serde(default = "default_true")]
    pub faq: bool,
    #[serde(default = "default_true")]
    pub library: bool,
    #[serde(default = "default_true")]
    pub tag: bool,
    #[serde(default = "default_true")]
    pub navigation: bool,
}

impl Default for ResourceToggles {
    fn default() -> Self {
        Self {
            post: true,
            page: true,
            faq: true,
            library: true,
            tag: true,
            navigation: true,
        }
    }
}

impl ResourceToggles {
    pub fn is_enabled(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Post => self.post,
            ResourceKind::Page => self.page,
            ResourceKind::Faq => self.faq,
            ResourceKind::Library => self.library,
            ResourceKind::Tag => self.tag,
            ResourceKind::Navigation => self.navigation,
        }
    }

    pub fn set(&mut self, kind: ResourceKind, enabled: bool) {
        let flag = match kind {
            ResourceKind::Post => &mut self.post,
            ResourceKind::Page => &mut self.page,
            ResourceKind::Faq => &mut self.faq,
            ResourceKind::Library => &mut self.library,
            ResourceKind::Tag => &mut self.tag,
            ResourceKind::Navigation => &mut self.navigation,
        };
        *flag = enabled;
    }
}

/// Where uploaded library files go
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    #[serde(default = "default_upload_disk")]
    pub disk: String,

    #[serde(default = "default_upload_directory")]
    pub directory: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            disk: default_upload_disk(),
            directory: default_upload_directory(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_locale() -> String {
    "en".to_string()
}

pub(crate) fn default_library_types() -> OptionList {
    [("FILE", "File"), ("IMAGE", "Image"), ("VIDEO", "Video")]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect()
}

pub(crate) fn default_tag_types() -> OptionList {
    [
        ("tag", "Tag"),
        ("category", "Category"),
        ("library", "Library"),
        ("faq", "Faq"),
    ]
    .into_iter()
    .map(|(k, v)| (k, v.to_string()))
    .collect()
}

pub(crate) fn default_navigation_group_label() -> String {
    "Sky".to_string()
}

fn default_upload_disk() -> String {
    "public".to_string()
}

fn default_upload_directory() -> String {
    "sky".to_string()
}

fn default_true() -> bool {
    true
}

/// Default implementation for SkyConfig
impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            resources: ResourceToggles::default(),
            hidden_resources: Vec::new(),
            library_types: default_library_types(),
            tag_types: default_tag_types(),
            item_types: OrderedMap::new(),
            extra_fields: Vec::new(),
            models: BTreeMap::new(),
            navigation_group_label: default_navigation_group_label(),
            route_name_prefix: None,
            uploads: UploadConfig::default(),
            badges: true,
            database_path: None,
            log_level: LogLevel::default(),
        }
    }
}

impl SkyConfig {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_safe_locale_key(self.default_locale.trim()) {
            return Err(ConfigError::Invalid(format!(
                "default locale '{}' is not a valid locale code",
                self.default_locale
            )));
        }
        if !is_known_language(&self.default_locale) {
            warn!(
                "Default locale '{}' is not a known ISO 639 language code",
                self.default_locale
            );
        }

        for (kind, types) in [("library", &self.library_types), ("tag", &self.tag_types)] {
            if types.keys().any(|key| key.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!("{} type keys must not be empty", kind)));
            }
        }

        for slug in self.item_types.keys() {
            validate_slug(slug)
                .map_err(|e| ConfigError::Invalid(format!("item type: {}", e)))?;
        }

        for (tag, model_name) in &self.models {
            if model_name.parse::<ModelType>().is_err() {
                return Err(ConfigError::Invalid(format!(
                    "model '{}' maps to unknown type '{}'",
                    tag, model_name
                )));
            }
        }

        Ok(())
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref())?;
        let config: SkyConfig = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Load a configuration file, writing the defaults first when it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }
}
