/*!
 * Plugin configuration surface.
 *
 * `SkyPlugin` is the host-facing builder: which resources are registered,
 * the option lists shown in forms, navigation item types and the extra
 * fields appended to content forms. `SkyConfig` is its serialized form.
 */

pub mod config;
pub mod fields;
pub mod ordered;

use anyhow::anyhow;
use log::debug;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use config::{LogLevel, ResourceToggles, SkyConfig, UploadConfig};
pub use fields::{FieldKind, FieldSpec, ItemType};
pub use ordered::{OptionList, OrderedMap};

use crate::slug::slugify;

/// Plugin identifier
pub const PLUGIN_ID: &str = "zeus-sky";

/// Key of the built-in navigation item type
pub const EXTERNAL_LINK: &str = "external-link";

/// Translates user-facing labels
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn translate(&self, text: &str) -> String {
        self(text)
    }
}

/// Admin resources the plugin can register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Post,
    Page,
    Faq,
    Library,
    Tag,
    Navigation,
}

impl ResourceKind {
    /// Registration order
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Post,
        ResourceKind::Page,
        ResourceKind::Faq,
        ResourceKind::Library,
        ResourceKind::Tag,
        ResourceKind::Navigation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Post => "post",
            ResourceKind::Page => "page",
            ResourceKind::Faq => "faq",
            ResourceKind::Library => "library",
            ResourceKind::Tag => "tag",
            ResourceKind::Navigation => "navigation",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("Invalid resource: {}", s))
    }
}

/// Host-facing plugin builder
#[derive(Clone)]
pub struct SkyPlugin {
    resources: ResourceToggles,
    hidden_resources: Vec<ResourceKind>,
    library_types: OptionList,
    tag_types: OptionList,
    translated_library_types: OnceCell<OptionList>,
    translated_tag_types: OnceCell<OptionList>,
    item_types: OrderedMap<ItemType>,
    extra_fields: Vec<FieldSpec>,
    models: BTreeMap<String, String>,
    navigation_group_label: String,
    route_name_prefix: Option<String>,
    uploads: UploadConfig,
    badges: bool,
    translator: Option<Arc<dyn Translator>>,
}

impl Default for SkyPlugin {
    fn default() -> Self {
        Self::make()
    }
}

impl fmt::Debug for SkyPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkyPlugin")
            .field("resources", &self.resources)
            .field("hidden_resources", &self.hidden_resources)
            .field("library_types", &self.library_types)
            .field("tag_types", &self.tag_types)
            .field("item_types", &self.item_types)
            .field("navigation_group_label", &self.navigation_group_label)
            .finish_non_exhaustive()
    }
}

impl SkyPlugin {
    /// Plugin with every resource enabled and default option lists
    pub fn make() -> Self {
        Self {
            resources: ResourceToggles::default(),
            hidden_resources: Vec::new(),
            library_types: config::default_library_types(),
            tag_types: config::default_tag_types(),
            translated_library_types: OnceCell::new(),
            translated_tag_types: OnceCell::new(),
            item_types: OrderedMap::new(),
            extra_fields: Vec::new(),
            models: BTreeMap::new(),
            navigation_group_label: config::default_navigation_group_label(),
            route_name_prefix: None,
            uploads: UploadConfig::default(),
            badges: true,
            translator: None,
        }
    }

    /// Build from a loaded configuration file
    pub fn from_config(config: &SkyConfig) -> Self {
        let mut plugin = Self::make()
            .library_types(config.library_types.clone())
            .tag_types(config.tag_types.clone())
            .hide_resources(config.hidden_resources.iter().copied())
            .with_extra_fields(config.extra_fields.clone())
            .models(config.models.clone())
            .navigation_group_label(config.navigation_group_label.clone())
            .uploads(config.uploads.clone())
            .badges(config.badges);
        plugin.resources = config.resources.clone();
        plugin.route_name_prefix = config.route_name_prefix.clone();

        for (slug, item_type) in config.item_types.iter() {
            plugin = plugin.item_type(item_type.name.clone(), item_type.fields.clone(), Some(slug.as_str()));
        }
        plugin
    }

    pub fn id(&self) -> &'static str {
        PLUGIN_ID
    }

    /// Translate labels through the host's translator
    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self.translated_library_types = OnceCell::new();
        self.translated_tag_types = OnceCell::new();
        self
    }

    fn translate(&self, text: &str) -> String {
        match &self.translator {
            Some(translator) => translator.translate(text),
            None => text.to_string(),
        }
    }

    fn toggle(mut self, kind: ResourceKind, enabled: bool) -> Self {
        self.resources.set(kind, enabled);
        self
    }

    pub fn post_resource(self, enabled: bool) -> Self {
        self.toggle(ResourceKind::Post, enabled)
    }

    pub fn has_post_resource(&self) -> bool {
        self.resources.post
    }

    pub fn page_resource(self, enabled: bool) -> Self {
        self.toggle(ResourceKind::Page, enabled)
    }

    pub fn has_page_resource(&self) -> bool {
        self.resources.page
    }

    pub fn faq_resource(self, enabled: bool) -> Self {
        self.toggle(ResourceKind::Faq, enabled)
    }

    pub fn has_faq_resource(&self) -> bool {
        self.resources.faq
    }

    pub fn library_resource(self, enabled: bool) -> Self {
        self.toggle(ResourceKind::Library, enabled)
    }

    pub fn has_library_resource(&self) -> bool {
        self.resources.library
    }

    pub fn tag_resource(self, enabled: bool) -> Self {
        self.toggle(ResourceKind::Tag, enabled)
    }

    pub fn has_tag_resource(&self) -> bool {
        self.resources.tag
    }

    pub fn navigation_resource(self, enabled: bool) -> Self {
        self.toggle(ResourceKind::Navigation, enabled)
    }

    pub fn has_navigation_resource(&self) -> bool {
        self.resources.navigation
    }

    /// Hide resources from the admin navigation
    pub fn hide_resources(mut self, kinds: impl IntoIterator<Item = ResourceKind>) -> Self {
        for kind in kinds {
            if !self.hidden_resources.contains(&kind) {
                self.hidden_resources.push(kind);
            }
        }
        self
    }

    /// Resources to register, in registration order
    pub fn enabled_resources(&self) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.resources.is_enabled(*kind))
            .filter(|kind| !self.hidden_resources.contains(kind))
            .collect()
    }

    /// Replace the library types, keeping their order; translated labels are
    /// rebuilt on next access
    pub fn library_types<I, K, L>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        self.library_types = types.into_iter().map(|(k, l)| (k, l.into())).collect();
        self.translated_library_types = OnceCell::new();
        self
    }

    /// Library types with translated labels
    pub fn get_library_types(&self) -> &OptionList {
        if self.translator.is_none() {
            return &self.library_types;
        }
        self.translated_library_types.get_or_init(|| {
            debug!("Translating {} library type label(s)", self.library_types.len());
            self.translate_labels(&self.library_types)
        })
    }

    /// Replace the tag types, keeping their order; translated labels are
    /// rebuilt on next access
    pub fn tag_types<I, K, L>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        self.tag_types = types.into_iter().map(|(k, l)| (k, l.into())).collect();
        self.translated_tag_types = OnceCell::new();
        self
    }

    /// Tag types with translated labels
    pub fn get_tag_types(&self) -> &OptionList {
        if self.translator.is_none() {
            return &self.tag_types;
        }
        self.translated_tag_types.get_or_init(|| {
            debug!("Translating {} tag type label(s)", self.tag_types.len());
            self.translate_labels(&self.tag_types)
        })
    }

    fn translate_labels(&self, labels: &OptionList) -> OptionList {
        labels
            .iter()
            .map(|(key, label)| (key.clone(), self.translate(label)))
            .collect()
    }

    /// Register a navigation item type under `slug`, or the slugified name
    pub fn item_type(mut self, name: impl Into<String>, fields: Vec<FieldSpec>, slug: Option<&str>) -> Self {
        let name = name.into();
        let key = slug.map(str::to_string).unwrap_or_else(|| slugify(&name));
        self.item_types.insert(key, ItemType::new(name, fields));
        self
    }

    fn external_link(&self) -> ItemType {
        ItemType::new(
            self.translate("External link"),
            vec![
                FieldSpec::text("url").label(self.translate("URL")).required(),
                FieldSpec::select(
                    "target",
                    [
                        ("", self.translate("Same tab")),
                        ("_blank", self.translate("New tab")),
                    ],
                )
                .label(self.translate("Target"))
                .default_value(""),
            ],
        )
    }

    /// Item types: the built-in external link first, then custom types.
    ///
    /// A custom type registered as `external-link` replaces the built-in one
    /// in place.
    pub fn item_types(&self) -> Vec<(String, ItemType)> {
        let mut types = OrderedMap::new();
        types.insert(EXTERNAL_LINK, self.external_link());
        for (key, item_type) in self.item_types.iter() {
            types.insert(key.clone(), item_type.clone());
        }
        types.into_iter().collect()
    }

    pub fn with_extra_fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.extra_fields = fields;
        self
    }

    pub fn extra_fields(&self) -> &[FieldSpec] {
        &self.extra_fields
    }

    /// Model tag aliases handed to the registry
    pub fn models(mut self, models: BTreeMap<String, String>) -> Self {
        self.models = models;
        self
    }

    pub fn get_models(&self) -> &BTreeMap<String, String> {
        &self.models
    }

    pub fn navigation_group_label(mut self, label: impl Into<String>) -> Self {
        self.navigation_group_label = label.into();
        self
    }

    pub fn get_navigation_group_label(&self) -> String {
        self.translate(&self.navigation_group_label)
    }

    pub fn route_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_name_prefix = Some(prefix.into());
        self
    }

    pub fn get_route_name_prefix(&self) -> Option<&str> {
        self.route_name_prefix.as_deref()
    }

    /// Route name with the configured prefix (`admin.` + `posts.index`)
    pub fn route_name(&self, name: &str) -> String {
        match &self.route_name_prefix {
            Some(prefix) => format!("{}{}", prefix, name),
            None => name.to_string(),
        }
    }

    pub fn uploads(mut self, uploads: UploadConfig) -> Self {
        self.uploads = uploads;
        self
    }

    pub fn get_uploads(&self) -> &UploadConfig {
        &self.uploads
    }

    pub fn badges(mut self, show: bool) -> Self {
        self.badges = show;
        self
    }

    pub fn has_badges(&self) -> bool {
        self.badges
    }
}
