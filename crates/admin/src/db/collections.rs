//! Collection repository for inspection and maintenance.
//!
//! Collection and field names are validated [`CollectionName`]s and are
//! interpolated quoted; values are always bound parameters.

use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};

use bookingops_core::{CollectionName, FieldName};

use super::RepositoryError;
use crate::models::category::Category;

/// `undefined_table`
const PG_UNDEFINED_TABLE: &str = "42P01";
/// `undefined_column`
const PG_UNDEFINED_COLUMN: &str = "42703";

// =============================================================================
// Result Types
// =============================================================================

/// Document count for one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionCount {
    pub collection: CollectionName,
    pub count: u64,
}

/// Result of emptying one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearOutcome {
    pub collection: CollectionName,
    pub deleted: u64,
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    name: String,
    description: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            name: row.name,
            description: row.description,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for collection-level operations.
pub struct CollectionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CollectionRepository<'a> {
    /// Create a new collection repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all collections in the current schema, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a table name is not a
    /// plain identifier.
    pub async fn list_collections(&self) -> Result<Vec<CollectionName>, RepositoryError> {
        let names: Vec<String> = sqlx::query_scalar(
            r"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = current_schema()
              AND table_type = 'BASE TABLE'
            ORDER BY table_name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        let mut collections = Vec::with_capacity(names.len());
        for name in names {
            match CollectionName::parse(&name) {
                Ok(collection) => collections.push(collection),
                // Quoted-identifier tables can't be addressed by the tooling.
                Err(e) => warn!(table = %name, error = %e, "Skipping table with unsupported name"),
            }
        }

        debug!(count = collections.len(), "Listed collections");
        Ok(collections)
    }

    /// Count the documents in a collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CollectionNotFound` if the collection does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(collection = %collection))]
    pub async fn count(&self, collection: &CollectionName) -> Result<u64, RepositoryError> {
        let sql = format!("SELECT COUNT(*) FROM {}", collection.quoted());
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(self.pool)
            .await
            .map_err(|e| map_missing(e, collection, None))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Count the documents in every collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn counts(&self) -> Result<Vec<CollectionCount>, RepositoryError> {
        let collections = self.list_collections().await?;
        let mut counts = Vec::with_capacity(collections.len());

        for collection in collections {
            let count = self.count(&collection).await?;
            counts.push(CollectionCount { collection, count });
        }

        Ok(counts)
    }

    /// Fetch up to `limit` documents from a collection without filtering.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CollectionNotFound` if the collection does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(collection = %collection))]
    pub async fn sample(
        &self,
        collection: &CollectionName,
        limit: u32,
    ) -> Result<Vec<Value>, RepositoryError> {
        let sql = format!(
            "SELECT row_to_json(t)::text FROM {} AS t LIMIT $1",
            collection.quoted()
        );
        let rows: Vec<String> = sqlx::query_scalar(&sql)
            .bind(i64::from(limit))
            .fetch_all(self.pool)
            .await
            .map_err(|e| map_missing(e, collection, None))?;

        rows.iter().map(|row| parse_document(row)).collect()
    }

    /// Find documents whose `field` equals `value` exactly.
    ///
    /// The comparison is made on the field's text representation, so it
    /// works for any column type.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CollectionNotFound` if the collection or field does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self, value), fields(collection = %collection, field = %field))]
    pub async fn find_by_field(
        &self,
        collection: &CollectionName,
        field: &FieldName,
        value: &str,
    ) -> Result<Vec<Value>, RepositoryError> {
        let sql = format!(
            "SELECT row_to_json(t)::text FROM {} AS t WHERE t.{}::text = $1",
            collection.quoted(),
            field.quoted()
        );
        let rows: Vec<String> = sqlx::query_scalar(&sql)
            .bind(value)
            .fetch_all(self.pool)
            .await
            .map_err(|e| map_missing(e, collection, Some(field)))?;

        rows.iter().map(|row| parse_document(row)).collect()
    }

    /// List all categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CollectionNotFound` if `categories` does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let collection = CollectionName::parse(CollectionName::CATEGORIES)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        let rows: Vec<CategoryRow> = sqlx::query_as(
            r"
            SELECT name::text AS name, description::text AS description
            FROM categories
            ORDER BY name
            ",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| map_missing(e, &collection, None))?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Delete every document in a collection (empty filter).
    ///
    /// This is irreversible. Returns the number of deleted documents; a
    /// second call on the same collection returns 0.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::CollectionNotFound` if the collection does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(collection = %collection))]
    pub async fn clear(&self, collection: &CollectionName) -> Result<u64, RepositoryError> {
        let sql = format!("DELETE FROM {}", collection.quoted());
        let result = sqlx::query(&sql)
            .execute(self.pool)
            .await
            .map_err(|e| map_missing(e, collection, None))?;

        let deleted = result.rows_affected();
        info!(deleted, "Cleared collection");
        Ok(deleted)
    }

    /// Empty each collection in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first `RepositoryError` encountered. Collections before
    /// the failing one stay cleared.
    pub async fn clear_many(
        &self,
        collections: &[CollectionName],
    ) -> Result<Vec<ClearOutcome>, RepositoryError> {
        let mut outcomes = Vec::with_capacity(collections.len());

        for collection in collections {
            let deleted = self.clear(collection).await?;
            outcomes.push(ClearOutcome {
                collection: collection.clone(),
                deleted,
            });
        }

        Ok(outcomes)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse a `row_to_json` result.
fn parse_document(raw: &str) -> Result<Value, RepositoryError> {
    serde_json::from_str(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid row JSON: {e}")))
}

/// Turn "no such table/column" database errors into `CollectionNotFound`.
fn map_missing(
    err: sqlx::Error,
    collection: &CollectionName,
    field: Option<&FieldName>,
) -> RepositoryError {
    let code = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned());

    match (code.as_deref(), field) {
        (Some(PG_UNDEFINED_TABLE), _) => RepositoryError::CollectionNotFound(collection.to_string()),
        (Some(PG_UNDEFINED_COLUMN), Some(field)) => {
            RepositoryError::CollectionNotFound(format!("{collection}.{field}"))
        }
        _ => RepositoryError::Database(err),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let doc = parse_document(r#"{"name":"Phones","description":null}"#);
        assert!(matches!(doc, Ok(Value::Object(_))));

        let bad = parse_document("{not json");
        assert!(matches!(bad, Err(RepositoryError::DataCorruption(_))));
    }

    #[test]
    fn test_map_missing_passes_through_other_errors() {
        let collection = CollectionName::parse("brands").unwrap();
        let mapped = map_missing(sqlx::Error::RowNotFound, &collection, None);
        assert!(matches!(mapped, RepositoryError::Database(_)));
    }
}
