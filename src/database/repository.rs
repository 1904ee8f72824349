/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all content operations,
 * abstracting away the SQL details and providing type-safe access.
 * It also implements `RecordStore`, so validation rules can query it.
 */

use anyhow::Result;
use log::debug;
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::connection::DatabaseConnection;
use super::models::{
    FaqRecord, LibraryRecord, ModelType, NavigationRecord, PostRecord, PostStatus, TagRecord,
    TranslatableText,
};
use crate::errors::StoreError;
use crate::store::{RecordStore, TranslationQuery};

/// Read a JSON locale map column
fn text_column(row: &Row, idx: usize) -> rusqlite::Result<TranslatableText> {
    let raw: String = row.get(idx)?;
    TranslatableText::from_json(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Split an anyhow error back into the store error it wraps
fn store_error(err: anyhow::Error) -> StoreError {
    match err.downcast::<rusqlite::Error>() {
        Ok(db_err) => StoreError::Database(db_err),
        Err(other) => StoreError::Other(other),
    }
}

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Translation Lookups
    // =========================================================================

    /// Whether a record matches `<column>-><locale> = value`
    pub fn translation_exists(&self, query: &TranslationQuery) -> Result<bool> {
        query.check()?;

        self.db.execute(|conn| Self::translation_exists_sync(conn, query))
    }

    /// Lookup on an already locked connection
    fn translation_exists_sync(conn: &Connection, query: &TranslationQuery) -> Result<bool> {
        let model = query.model;
        let mut sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE json_extract({}, ?) = ?",
            model.table(),
            query.column
        );
        let mut values = vec![
            SqlValue::Text(query.json_path()),
            SqlValue::Text(query.value.clone()),
        ];

        if let Some((scope_column, scope_value)) = model.scope() {
            sql.push_str(&format!(" AND {} = ?", scope_column));
            values.push(SqlValue::Text(scope_value.to_string()));
        }

        if let Some(key) = query.exclude_key {
            sql.push_str(&format!(" AND {} != ?", model.key_column()));
            values.push(SqlValue::Integer(key));
        }
        sql.push(')');

        let exists: bool = conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;

        debug!(
            "Lookup {}.{}->{} = '{}' (excluding {:?}): {}",
            model, query.column, query.locale, query.value, query.exclude_key, exists
        );
        Ok(exists)
    }

    // =========================================================================
    // Tag Operations
    // =========================================================================

    fn parse_tag_row(row: &Row) -> rusqlite::Result<TagRecord> {
        Ok(TagRecord {
            id: row.get(0)?,
            name: text_column(row, 1)?,
            slug: text_column(row, 2)?,
            tag_type: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    /// Insert a tag and return its id
    pub fn create_tag(&self, tag: &TagRecord) -> Result<i64> {
        self.db.execute(|conn| {
            conn.execute(
                r#"
                INSERT INTO tags (name, slug, type, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    tag.name.to_json(),
                    tag.slug.to_json(),
                    tag.tag_type,
                    tag.created_at,
                    tag.updated_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Get a tag by id
    pub fn get_tag(&self, id: i64) -> Result<Option<TagRecord>> {
        self.db.execute(|conn| {
            let tag = conn
                .query_row(
                    "SELECT id, name, slug, type, created_at, updated_at FROM tags WHERE id = ?1",
                    [id],
                    Self::parse_tag_row,
                )
                .optional()?;
            Ok(tag)
        })
    }

    /// Find a tag by its slug in one locale
    pub fn find_tag_by_slug(&self, locale: &str, slug: &str) -> Result<Option<TagRecord>> {
        let query = TranslationQuery::new(ModelType::Tag, "slug", locale, slug);
        query.check()?;
        let path = query.json_path();

        self.db.execute(|conn| {
            let tag = conn
                .query_row(
                    r#"
                    SELECT id, name, slug, type, created_at, updated_at
                    FROM tags WHERE json_extract(slug, ?1) = ?2
                    ORDER BY id LIMIT 1
                    "#,
                    params![path, slug],
                    Self::parse_tag_row,
                )
                .optional()?;
            Ok(tag)
        })
    }

    /// List tags, optionally of one type
    pub fn list_tags(&self, type_filter: Option<&str>) -> Result<Vec<TagRecord>> {
        self.db.execute(|conn| {
            let tags: Vec<TagRecord> = if let Some(tag_type) = type_filter {
                let mut stmt = conn.prepare(
                    "SELECT id, name, slug, type, created_at, updated_at FROM tags WHERE type = ?1 ORDER BY id",
                )?;
                stmt.query_map([tag_type], Self::parse_tag_row)?
                    .collect::<rusqlite::Result<_>>()?
            } else {
                let mut stmt = conn.prepare(
                    "SELECT id, name, slug, type, created_at, updated_at FROM tags ORDER BY id",
                )?;
                stmt.query_map([], Self::parse_tag_row)?
                    .collect::<rusqlite::Result<_>>()?
            };
            Ok(tags)
        })
    }

    /// Update a tag, returning whether a row changed
    pub fn update_tag(&self, tag: &TagRecord) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        self.db.execute(|conn| {
            let changed = conn.execute(
                "UPDATE tags SET name = ?1, slug = ?2, type = ?3, updated_at = ?4 WHERE id = ?5",
                params![tag.name.to_json(), tag.slug.to_json(), tag.tag_type, now, tag.id],
            )?;
            Ok(changed > 0)
        })
    }

    /// Delete a tag, returning whether it existed
    pub fn delete_tag(&self, id: i64) -> Result<bool> {
        self.db.execute(|conn| {
            let deleted = conn.execute("DELETE FROM tags WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // =========================================================================
    // Post / Page Operations
    // =========================================================================

    fn parse_post_row(row: &Row) -> rusqlite::Result<PostRecord> {
        let post_type: String = row.get(1)?;
        Ok(PostRecord {
            id: row.get(0)?,
            post_type: if post_type == "page" {
                ModelType::Page
            } else {
                ModelType::Post
            },
            title: text_column(row, 2)?,
            slug: text_column(row, 3)?,
            description: text_column(row, 4)?,
            content: text_column(row, 5)?,
            status: row
                .get::<_, String>(6)?
                .parse()
                .unwrap_or(PostStatus::Draft),
            published_at: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    /// Insert a post or page and return its id
    pub fn create_post(&self, post: &PostRecord) -> Result<i64> {
        self.db.execute(|conn| {
            conn.execute(
                r#"
                INSERT INTO posts (
                    post_type, title, slug, description, content,
                    status, published_at, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    post.post_type_column(),
                    post.title.to_json(),
                    post.slug.to_json(),
                    post.description.to_json(),
                    post.content.to_json(),
                    post.status.to_string(),
                    post.published_at,
                    post.created_at,
                    post.updated_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Get a post or page by id
    pub fn get_post(&self, id: i64) -> Result<Option<PostRecord>> {
        self.db.execute(|conn| {
            let post = conn
                .query_row(
                    r#"
                    SELECT id, post_type, title, slug, description, content,
                           status, published_at, created_at, updated_at
                    FROM posts WHERE id = ?1
                    "#,
                    [id],
                    Self::parse_post_row,
                )
                .optional()?;
            Ok(post)
        })
    }

    /// List posts (`ModelType::Post`) or pages (`ModelType::Page`)
    pub fn list_posts(&self, post_type: ModelType) -> Result<Vec<PostRecord>> {
        let (_, type_value) = post_type
            .scope()
            .ok_or_else(|| anyhow::anyhow!("{} is not stored in the posts table", post_type))?;

        self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, post_type, title, slug, description, content,
                       status, published_at, created_at, updated_at
                FROM posts WHERE post_type = ?1
                ORDER BY id
                "#,
            )?;
            let posts = stmt
                .query_map([type_value], Self::parse_post_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(posts)
        })
    }

    /// Update a post or page, returning whether a row changed
    pub fn update_post(&self, post: &PostRecord) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();

        self.db.execute(|conn| {
            let changed = conn.execute(
                r#"
                UPDATE posts
                SET title = ?1, slug = ?2, description = ?3, content = ?4,
                    status = ?5, published_at = ?6, updated_at = ?7
                WHERE id = ?8
                "#,
                params![
                    post.title.to_json(),
                    post.slug.to_json(),
                    post.description.to_json(),
                    post.content.to_json(),
                    post.status.to_string(),
                    post.published_at,
                    now,
                    post.id,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Delete a post or page, returning whether it existed
    pub fn delete_post(&self, id: i64) -> Result<bool> {
        self.db.execute(|conn| {
            let deleted = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // =========================================================================
    // FAQ Operations
    // =========================================================================

    /// Insert a FAQ and return its id
    pub fn create_faq(&self, faq: &FaqRecord) -> Result<i64> {
        self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO faqs (question, answer, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    faq.question.to_json(),
                    faq.answer.to_json(),
                    faq.created_at,
                    faq.updated_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// List all FAQs
    pub fn list_faqs(&self) -> Result<Vec<FaqRecord>> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, question, answer, created_at, updated_at FROM faqs ORDER BY id",
            )?;
            let faqs = stmt
                .query_map([], |row| {
                    Ok(FaqRecord {
                        id: row.get(0)?,
                        question: text_column(row, 1)?,
                        answer: text_column(row, 2)?,
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(faqs)
        })
    }

    /// Delete a FAQ, returning whether it existed
    pub fn delete_faq(&self, id: i64) -> Result<bool> {
        self.db.execute(|conn| {
            let deleted = conn.execute("DELETE FROM faqs WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    // =========================================================================
    // Library Operations
    // =========================================================================

    /// Insert a library item and return its id
    pub fn create_library_item(&self, item: &LibraryRecord) -> Result<i64> {
        self.db.execute(|conn| {
            conn.execute(
                r#"
                INSERT INTO library (title, slug, description, type, file_path, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    item.title.to_json(),
                    item.slug.to_json(),
                    item.description.to_json(),
                    item.library_type,
                    item.file_path,
                    item.created_at,
                    item.updated_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// List library items, optionally of one type
    pub fn list_library_items(&self, type_filter: Option<&str>) -> Result<Vec<LibraryRecord>> {
        fn parse_library_row(row: &Row) -> rusqlite::Result<LibraryRecord> {
            Ok(LibraryRecord {
                id: row.get(0)?,
                title: text_column(row, 1)?,
                slug: text_column(row, 2)?,
                description: text_column(row, 3)?,
                library_type: row.get(4)?,
                file_path: row.get(5)?,
                created_at: row.get(6)?,
                updated_at: row.get(7)?,
            })
        }

        self.db.execute(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, title, slug, description, type, file_path, created_at, updated_at
                FROM library
                WHERE (?1 IS NULL OR type = ?1)
                ORDER BY id
                "#,
            )?;
            let items = stmt
                .query_map([type_filter], parse_library_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(items)
        })
    }

    // =========================================================================
    // Navigation Operations
    // =========================================================================

    /// Insert a navigation menu and return its id
    pub fn create_navigation(&self, navigation: &NavigationRecord) -> Result<i64> {
        self.db.execute(|conn| {
            conn.execute(
                r#"
                INSERT INTO navigations (name, handle, items, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    navigation.name.to_json(),
                    navigation.handle,
                    navigation.items.to_string(),
                    navigation.created_at,
                    navigation.updated_at,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Get a navigation menu by handle
    pub fn get_navigation_by_handle(&self, handle: &str) -> Result<Option<NavigationRecord>> {
        self.db.execute(|conn| {
            let navigation = conn
                .query_row(
                    "SELECT id, name, handle, items, created_at, updated_at FROM navigations WHERE handle = ?1",
                    [handle],
                    |row| {
                        let items: String = row.get(3)?;
                        Ok(NavigationRecord {
                            id: row.get(0)?,
                            name: text_column(row, 1)?,
                            handle: row.get(2)?,
                            items: serde_json::from_str(&items).map_err(|e| {
                                rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
                            })?,
                            created_at: row.get(4)?,
                            updated_at: row.get(5)?,
                        })
                    },
                )
                .optional()?;
            Ok(navigation)
        })
    }
}

impl RecordStore for Repository {
    fn translation_exists(&self, query: &TranslationQuery) -> Result<bool, StoreError> {
        query.check()?;

        self.db
            .execute(|conn| Self::translation_exists_sync(conn, query))
            .map_err(store_error)
    }
}
