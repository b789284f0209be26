//! GraphQL DataLoaders for relation fields
//!
//! `Movie.director` and `Director.movies` are resolved through
//! [RelationLoader], which collects the reference values requested within one
//! execution tick and fetches them with a single `IN (...)` query:
//!
//! 1. When GraphQL resolves `movieCollection { director { ... } }`, each
//!    Movie's `director` resolver calls `loader.load_one(director_id)`
//! 2. DataLoader batches these calls
//! 3. One query fetches all matching directors:
//!    `SELECT ... FROM directors WHERE id IN (...)`
//! 4. Results are grouped by the key column and handed back to each resolver
//!
//! Loaders are built without a cache; every lookup reaches the store.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_graphql::dataloader::Loader;
use sqlx::sqlite::SqliteRow;

use crate::db::{Database, DirectorRecord, DocumentSchema, MovieRecord};

/// Batches lookups of documents whose `key_column` matches a set of values.
///
/// Keyed by `"id"` it is a find-by-identifier; keyed by a reference column it
/// is a one-to-many relation.
pub struct RelationLoader<T> {
    pub db: Database,
    pub key_column: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> RelationLoader<T> {
    pub fn new(db: Database, key_column: &'static str) -> Self {
        Self {
            db,
            key_column,
            _phantom: PhantomData,
        }
    }
}

/// Documents that can be grouped by one of their columns.
pub trait HasForeignKey {
    /// Get the value of a key column. Returns None if the column doesn't exist
    /// on this document.
    fn get_fk_value(&self, fk_column: &str) -> Option<&str>;
}

impl<T> Loader<String> for RelationLoader<T>
where
    T: DocumentSchema
        + HasForeignKey
        + for<'r> sqlx::FromRow<'r, SqliteRow>
        + Clone
        + Send
        + Sync
        + Unpin
        + 'static,
{
    type Value = Vec<T>;
    type Error = Arc<sqlx::Error>;

    async fn load(&self, keys: &[String]) -> Result<HashMap<String, Self::Value>, Self::Error> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        tracing::debug!(
            table = T::TABLE_NAME,
            key_column = self.key_column,
            key_count = keys.len(),
            "Batch loading {} by {}",
            T::TABLE_NAME,
            self.key_column
        );

        let placeholders: Vec<String> = (1..=keys.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "SELECT {} FROM {} WHERE {} IN ({}) ORDER BY rowid",
            T::column_list(),
            T::TABLE_NAME,
            self.key_column,
            placeholders.join(", ")
        );

        let mut query = sqlx::query_as::<_, T>(&sql);
        for key in keys {
            query = query.bind(key);
        }

        let rows = query.fetch_all(self.db.pool()).await.map_err(Arc::new)?;
        let total_loaded = rows.len();

        let mut result: HashMap<String, Vec<T>> =
            keys.iter().map(|k| (k.clone(), Vec::new())).collect();

        for row in rows {
            let Some(key) = row.get_fk_value(self.key_column).map(str::to_owned) else {
                continue;
            };
            if let Some(documents) = result.get_mut(&key) {
                documents.push(row);
            }
        }

        tracing::debug!(
            table = T::TABLE_NAME,
            total_loaded = total_loaded,
            "Batch load complete"
        );

        Ok(result)
    }
}

impl HasForeignKey for DirectorRecord {
    fn get_fk_value(&self, fk_column: &str) -> Option<&str> {
        match fk_column {
            "id" => Some(&self.id),
            _ => None,
        }
    }
}

impl HasForeignKey for MovieRecord {
    fn get_fk_value(&self, fk_column: &str) -> Option<&str> {
        match fk_column {
            "id" => Some(&self.id),
            "director_id" => Some(&self.director_id),
            _ => None,
        }
    }
}
