/*!
 * In-memory record store.
 *
 * Keeps translatable columns of content records in a map guarded by a
 * `parking_lot::RwLock`. Useful for hosts that already hold their content
 * in memory and for tests that do not need SQLite.
 */

use log::debug;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use super::{RecordStore, TranslationQuery};
use crate::database::models::{ModelType, TranslatableRecord, TranslatableText};
use crate::errors::StoreError;

type Columns = BTreeMap<String, TranslatableText>;

/// Record store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<(ModelType, i64), Columns>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the translatable columns of a record.
    ///
    /// A record with key 0 gets the next free key. Returns the key used.
    pub fn insert<R: TranslatableRecord>(&self, record: &R) -> i64 {
        let columns: Columns = record
            .translations()
            .into_iter()
            .map(|(column, text)| (column.to_string(), text.clone()))
            .collect();

        let key = if record.key() == 0 {
            self.next_id.fetch_add(1, Ordering::SeqCst) + 1
        } else {
            self.next_id.fetch_max(record.key(), Ordering::SeqCst);
            record.key()
        };

        self.records.write().insert((record.model_type(), key), columns);
        debug!("Stored {} #{} in memory", record.model_type(), key);
        key
    }

    /// Replace one translatable column of a stored record
    pub fn set_column(&self, model: ModelType, key: i64, column: &str, text: TranslatableText) -> bool {
        match self.records.write().get_mut(&(model, key)) {
            Some(columns) => {
                columns.insert(column.to_string(), text);
                true
            }
            None => false,
        }
    }

    /// Remove a record, returning whether it existed
    pub fn remove(&self, model: ModelType, key: i64) -> bool {
        self.records.write().remove(&(model, key)).is_some()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn translation_exists(&self, query: &TranslationQuery) -> Result<bool, StoreError> {
        query.check()?;

        let records = self.records.read();
        let found = records.iter().any(|((model, key), columns)| {
            *model == query.model
                && query.exclude_key != Some(*key)
                && columns
                    .get(&query.column)
                    .and_then(|text| text.get(&query.locale))
                    == Some(query.value.as_str())
        });

        debug!(
            "Memory lookup {}.{}->{} = '{}' (excluding {:?}): {}",
            query.model, query.column, query.locale, query.value, query.exclude_key, found
        );
        Ok(found)
    }
}
