//! Database inspection and maintenance commands.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `DATABASE_NAME` - database to use when the URL has no path
//! - `CLEAR_COLLECTIONS` - default collections for `db clear`

use bookingops_admin::OpsError;
use bookingops_admin::config::{DatabaseConfig, MaintenanceConfig};
use bookingops_admin::console::{LogKind, log_database, log_formatted};
use bookingops_admin::db::{CollectionCount, CollectionRepository, create_pool};
use bookingops_core::{CollectionName, FieldName};
use serde_json::{Value, json};
use sqlx::PgPool;

/// Open the pool from `DATABASE_URL` / `DATABASE_NAME`.
pub async fn connect() -> Result<PgPool, OpsError> {
    let config = DatabaseConfig::from_env()?;
    tracing::info!(database = ?config.name, "Connecting to database...");
    let pool = create_pool(&config.resolved_url()?).await?;
    Ok(pool)
}

pub async fn collections(pool: &PgPool) -> Result<(), OpsError> {
    let collections = CollectionRepository::new(pool).list_collections().await?;
    let names: Vec<&str> = collections.iter().map(CollectionName::as_str).collect();

    log_database(
        "collections",
        &[("count", json!(names.len())), ("collections", json!(names))],
    );
    Ok(())
}

pub async fn counts(pool: &PgPool) -> Result<(), OpsError> {
    let counts = CollectionRepository::new(pool).counts().await?;
    let fields = nonzero_count_fields(&counts);

    if fields.is_empty() {
        log_database(
            "document counts",
            &[("status", json!("all collections are empty"))],
        );
    } else {
        log_database("document counts", &fields);
    }
    Ok(())
}

/// One field per collection that holds at least one document.
fn nonzero_count_fields(counts: &[CollectionCount]) -> Vec<(&str, Value)> {
    counts
        .iter()
        .filter(|c| c.count > 0)
        .map(|c| (c.collection.as_str(), json!(c.count)))
        .collect()
}

pub async fn sample(pool: &PgPool, collection: &str, limit: u32) -> Result<(), OpsError> {
    let collection = parse_name(collection)?;
    let documents = CollectionRepository::new(pool)
        .sample(&collection, limit)
        .await?;

    print_documents(&collection, &documents);
    Ok(())
}

pub async fn find(pool: &PgPool, collection: &str, field: &str, value: &str) -> Result<(), OpsError> {
    let collection = parse_name(collection)?;
    let field: FieldName = parse_name(field)?;
    let documents = CollectionRepository::new(pool)
        .find_by_field(&collection, &field, value)
        .await?;

    if documents.is_empty() {
        log_formatted(
            &format!("no match in {collection}"),
            &[(field.as_str(), json!(value))],
            LogKind::Warning,
        );
    }
    print_documents(&collection, &documents);
    Ok(())
}

pub async fn categories(pool: &PgPool) -> Result<(), OpsError> {
    let categories = CollectionRepository::new(pool).categories().await?;
    let fields: Vec<(&str, Value)> = categories
        .iter()
        .map(|c| {
            let description = c.description.as_deref().map_or(Value::Null, Value::from);
            (c.name.as_str(), description)
        })
        .collect();

    log_database(&format!("categories ({})", categories.len()), &fields);
    Ok(())
}

/// Empty `collections` (or `CLEAR_COLLECTIONS`). Without `confirmed` only
/// the counts are shown and the command fails.
pub async fn clear(pool: &PgPool, collections: &[String], confirmed: bool) -> Result<(), OpsError> {
    let targets = if collections.is_empty() {
        MaintenanceConfig::from_env()?.clear_collections
    } else {
        collections
            .iter()
            .map(|c| parse_name(c))
            .collect::<Result<Vec<_>, _>>()?
    };
    if targets.is_empty() {
        return Err(OpsError::InvalidArgument("no collections to clear".to_string()));
    }

    let repo = CollectionRepository::new(pool);

    if !confirmed {
        let mut fields = Vec::with_capacity(targets.len());
        for collection in &targets {
            fields.push((collection.as_str(), json!(repo.count(collection).await?)));
        }
        log_formatted("would delete", &fields, LogKind::Warning);
        return Err(OpsError::Refused(
            "re-run with --yes to delete these documents".to_string(),
        ));
    }

    let outcomes = repo.clear_many(&targets).await?;
    let fields: Vec<(&str, Value)> = outcomes
        .iter()
        .map(|o| (o.collection.as_str(), json!(o.deleted)))
        .collect();

    let total: u64 = outcomes.iter().map(|o| o.deleted).sum();
    tracing::info!(collections = outcomes.len(), total, "Collections cleared");
    log_formatted("documents deleted", &fields, LogKind::Success);
    Ok(())
}

fn parse_name(raw: &str) -> Result<CollectionName, OpsError> {
    CollectionName::parse(raw).map_err(|e| OpsError::InvalidArgument(format!("{raw:?}: {e}")))
}

/// One block per document, one line per top-level field.
fn print_documents(collection: &CollectionName, documents: &[Value]) {
    for (i, document) in documents.iter().enumerate() {
        let title = format!("{collection} #{}", i + 1);
        match document {
            Value::Object(map) => {
                let fields: Vec<(&str, Value)> =
                    map.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
                log_database(&title, &fields);
            }
            other => log_database(&title, &[("document", other.clone())]),
        }
    }

    tracing::info!(%collection, count = documents.len(), "Documents printed");
}
