//! Collection repository against a live database.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - `DATABASE_URL` pointing at a database the tests may create tables in
//!
//! Run with: cargo test -p bookingops-integration-tests -- --ignored

use bookingops_admin::db::{CollectionRepository, RepositoryError, create_pool};
use bookingops_core::{CollectionName, FieldName};
use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to database")
}

/// Create a uniquely named collection with three documents.
async fn seeded_collection(pool: &PgPool) -> CollectionName {
    let name = format!("ops_test_{}", Uuid::new_v4().simple());
    let collection = CollectionName::parse(&name).expect("valid name");

    sqlx::query(&format!(
        "CREATE TABLE {} (id SERIAL PRIMARY KEY, name TEXT NOT NULL, email TEXT)",
        collection.quoted()
    ))
    .execute(pool)
    .await
    .expect("Failed to create table");

    for (name, email) in [
        ("Ada", "ada@example.com"),
        ("Grace", "grace@example.com"),
        ("Linus", "linus@example.com"),
    ] {
        sqlx::query(&format!(
            "INSERT INTO {} (name, email) VALUES ($1, $2)",
            collection.quoted()
        ))
        .bind(name)
        .bind(email)
        .execute(pool)
        .await
        .expect("Failed to insert row");
    }

    collection
}

async fn drop_collection(pool: &PgPool, collection: &CollectionName) {
    let _ = sqlx::query(&format!("DROP TABLE IF EXISTS {}", collection.quoted()))
        .execute(pool)
        .await;
}

// ============================================================================
// Inspection
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_inspect_collection() {
    let pool = pool().await;
    let collection = seeded_collection(&pool).await;
    let repo = CollectionRepository::new(&pool);

    assert!(repo.list_collections().await.expect("list").contains(&collection));
    assert_eq!(repo.count(&collection).await.expect("count"), 3);
    assert_eq!(repo.sample(&collection, 2).await.expect("sample").len(), 2);

    let field = FieldName::parse("email").expect("valid field");
    let found = repo
        .find_by_field(&collection, &field, "grace@example.com")
        .await
        .expect("find");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "Grace");

    drop_collection(&pool, &collection).await;
    pool.close().await;
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_missing_collection_is_reported() {
    let pool = pool().await;
    let repo = CollectionRepository::new(&pool);

    let missing = CollectionName::parse("ops_test_does_not_exist").expect("valid name");
    let result = repo.count(&missing).await;
    assert!(matches!(result, Err(RepositoryError::CollectionNotFound(_))));

    pool.close().await;
}

// ============================================================================
// Maintenance
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_clear_then_count_is_zero() {
    let pool = pool().await;
    let collection = seeded_collection(&pool).await;
    let repo = CollectionRepository::new(&pool);

    let outcomes = repo
        .clear_many(std::slice::from_ref(&collection))
        .await
        .expect("clear");
    assert_eq!(outcomes[0].deleted, 3);
    assert_eq!(repo.count(&collection).await.expect("count"), 0);

    // Clearing an empty collection is a no-op.
    assert_eq!(repo.clear(&collection).await.expect("clear again"), 0);

    drop_collection(&pool, &collection).await;
    pool.close().await;
}
