/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted content. Translatable attributes are
 * stored as JSON objects keyed by locale code.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Content model types known to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelType {
    /// Blog post
    Post,
    /// Static page (shares the posts table)
    Page,
    /// Tag, category, library or faq label
    Tag,
    /// Frequently asked question
    Faq,
    /// Library item (file, image, video)
    Library,
    /// Navigation menu
    Navigation,
}

impl ModelType {
    /// All model types in registration order
    pub const ALL: [ModelType; 6] = [
        ModelType::Post,
        ModelType::Page,
        ModelType::Faq,
        ModelType::Library,
        ModelType::Tag,
        ModelType::Navigation,
    ];

    /// Canonical model name
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::Post => "Post",
            ModelType::Page => "Page",
            ModelType::Tag => "Tag",
            ModelType::Faq => "Faq",
            ModelType::Library => "Library",
            ModelType::Navigation => "Navigation",
        }
    }

    /// Table holding rows of this model
    pub fn table(&self) -> &'static str {
        match self {
            ModelType::Post | ModelType::Page => "posts",
            ModelType::Tag => "tags",
            ModelType::Faq => "faqs",
            ModelType::Library => "library",
            ModelType::Navigation => "navigations",
        }
    }

    /// Primary key column
    pub fn key_column(&self) -> &'static str {
        "id"
    }

    /// Row filter for models that share a table
    pub fn scope(&self) -> Option<(&'static str, &'static str)> {
        match self {
            ModelType::Post => Some(("post_type", "post")),
            ModelType::Page => Some(("post_type", "page")),
            _ => None,
        }
    }

    /// Columns holding locale maps
    pub fn translatable_columns(&self) -> &'static [&'static str] {
        match self {
            ModelType::Post | ModelType::Page => &["title", "slug", "description", "content"],
            ModelType::Tag => &["name", "slug"],
            ModelType::Faq => &["question", "answer"],
            ModelType::Library => &["title", "slug", "description"],
            ModelType::Navigation => &["name"],
        }
    }

    /// Whether `column` is one of the translatable columns
    pub fn is_translatable(&self, column: &str) -> bool {
        self.translatable_columns().contains(&column)
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ModelType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "post" => Ok(ModelType::Post),
            "page" => Ok(ModelType::Page),
            "tag" => Ok(ModelType::Tag),
            "faq" => Ok(ModelType::Faq),
            "library" => Ok(ModelType::Library),
            "navigation" => Ok(ModelType::Navigation),
            _ => Err(anyhow::anyhow!("Invalid model type: {}", s)),
        }
    }
}

/// A value stored once per locale
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslatableText(BTreeMap<String, String>);

impl TranslatableText {
    /// Create an empty locale map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a locale map holding one translation
    pub fn single(locale: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new().with(locale, value)
    }

    /// Add a translation (builder style)
    pub fn with(mut self, locale: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(locale, value);
        self
    }

    /// Set the translation for a locale
    pub fn set(&mut self, locale: impl Into<String>, value: impl Into<String>) {
        self.0.insert(locale.into(), value.into());
    }

    /// Translation for a locale
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Translation for a locale, falling back to another locale
    pub fn get_or(&self, locale: &str, fallback: &str) -> Option<&str> {
        self.get(locale).or_else(|| self.get(fallback))
    }

    /// Locales with a translation
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Whether no locale has a translation
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the JSON column representation
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// JSON column representation
    pub fn to_json(&self) -> String {
        // A map of strings always serializes
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Records that own translatable columns
pub trait TranslatableRecord {
    /// Model type of the record
    fn model_type(&self) -> ModelType;

    /// Primary key value
    fn key(&self) -> i64;

    /// Translatable columns and their locale maps
    fn translations(&self) -> Vec<(&'static str, &TranslatableText)>;
}

/// Publication status of posts and pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    /// Visible to everyone
    Publish,
    /// Scheduled for later publication
    Future,
    /// Work in progress
    #[default]
    Draft,
    /// Visible to editors only
    Private,
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStatus::Publish => write!(f, "publish"),
            PostStatus::Future => write!(f, "future"),
            PostStatus::Draft => write!(f, "draft"),
            PostStatus::Private => write!(f, "private"),
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "publish" => Ok(PostStatus::Publish),
            "future" => Ok(PostStatus::Future),
            "draft" => Ok(PostStatus::Draft),
            "private" => Ok(PostStatus::Private),
            _ => Err(anyhow::anyhow!("Invalid post status: {}", s)),
        }
    }
}

/// Tag record from the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: i64,
    pub name: TranslatableText,
    pub slug: TranslatableText,
    /// Key from the configured tag types (tag, category, ...)
    pub tag_type: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TagRecord {
    /// Create a new tag record (id is assigned on insert)
    pub fn new(name: TranslatableText, slug: TranslatableText, tag_type: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: 0,
            name,
            slug,
            tag_type: tag_type.into(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl TranslatableRecord for TagRecord {
    fn model_type(&self) -> ModelType {
        ModelType::Tag
    }

    fn key(&self) -> i64 {
        self.id
    }

    fn translations(&self) -> Vec<(&'static str, &TranslatableText)> {
        vec![("name", &self.name), ("slug", &self.slug)]
    }
}

/// Post or page record from the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: i64,
    /// `ModelType::Post` or `ModelType::Page`
    pub post_type: ModelType,
    pub title: TranslatableText,
    pub slug: TranslatableText,
    pub description: TranslatableText,
    pub content: TranslatableText,
    pub status: PostStatus,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PostRecord {
    /// Create a new draft post
    pub fn post(title: TranslatableText, slug: TranslatableText) -> Self {
        Self::with_type(ModelType::Post, title, slug)
    }

    /// Create a new draft page
    pub fn page(title: TranslatableText, slug: TranslatableText) -> Self {
        Self::with_type(ModelType::Page, title, slug)
    }

    fn with_type(post_type: ModelType, title: TranslatableText, slug: TranslatableText) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: 0,
            post_type,
            title,
            slug,
            description: TranslatableText::new(),
            content: TranslatableText::new(),
            status: PostStatus::default(),
            published_at: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Row value of the `post_type` column
    pub fn post_type_column(&self) -> &'static str {
        self.post_type.scope().map(|(_, v)| v).unwrap_or("post")
    }
}

impl TranslatableRecord for PostRecord {
    fn model_type(&self) -> ModelType {
        self.post_type
    }

    fn key(&self) -> i64 {
        self.id
    }

    fn translations(&self) -> Vec<(&'static str, &TranslatableText)> {
        vec![
            ("title", &self.title),
            ("slug", &self.slug),
            ("description", &self.description),
            ("content", &self.content),
        ]
    }
}

/// FAQ record from the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqRecord {
    pub id: i64,
    pub question: TranslatableText,
    pub answer: TranslatableText,
    pub created_at: String,
    pub updated_at: String,
}

impl FaqRecord {
    pub fn new(question: TranslatableText, answer: TranslatableText) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: 0,
            question,
            answer,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl TranslatableRecord for FaqRecord {
    fn model_type(&self) -> ModelType {
        ModelType::Faq
    }

    fn key(&self) -> i64 {
        self.id
    }

    fn translations(&self) -> Vec<(&'static str, &TranslatableText)> {
        vec![("question", &self.question), ("answer", &self.answer)]
    }
}

/// Library item record from the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryRecord {
    pub id: i64,
    pub title: TranslatableText,
    pub slug: TranslatableText,
    pub description: TranslatableText,
    /// Key from the configured library types (FILE, IMAGE, VIDEO)
    pub library_type: String,
    /// Remote URL or stored path of the file
    pub file_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl LibraryRecord {
    pub fn new(title: TranslatableText, slug: TranslatableText, library_type: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: 0,
            title,
            slug,
            description: TranslatableText::new(),
            library_type: library_type.into(),
            file_path: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl TranslatableRecord for LibraryRecord {
    fn model_type(&self) -> ModelType {
        ModelType::Library
    }

    fn key(&self) -> i64 {
        self.id
    }

    fn translations(&self) -> Vec<(&'static str, &TranslatableText)> {
        vec![
            ("title", &self.title),
            ("slug", &self.slug),
            ("description", &self.description),
        ]
    }
}

/// Navigation menu record from the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationRecord {
    pub id: i64,
    pub name: TranslatableText,
    /// Stable identifier used by themes to look the menu up
    pub handle: String,
    /// Menu tree as stored JSON
    pub items: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

impl NavigationRecord {
    pub fn new(name: TranslatableText, handle: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: 0,
            name,
            handle: handle.into(),
            items: serde_json::Value::Array(Vec::new()),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl TranslatableRecord for NavigationRecord {
    fn model_type(&self) -> ModelType {
        ModelType::Navigation
    }

    fn key(&self) -> i64 {
        self.id
    }

    fn translations(&self) -> Vec<(&'static str, &TranslatableText)> {
        vec![("name", &self.name)]
    }
}
