//! Structural checks over the migrated schema.

use sqlx::PgPool;

/// Surrogate keys are `bigint` everywhere.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert_eq!(data_type, "bigint", "Table {table}.id should be bigint");
    }
}

/// TEXT is used for every string column.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(rows.is_empty(), "Found VARCHAR columns: {rows:?}");
}

/// Error mapping in the API keys off constraint name prefixes, so every
/// unique, foreign key and check constraint must carry one.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_constraint_names_use_prefixes(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT c.conname::TEXT, c.contype::TEXT
         FROM pg_constraint c
         JOIN pg_namespace n ON n.oid = c.connamespace
         WHERE n.nspname = 'public'
           AND c.contype IN ('u', 'f', 'c')
         ORDER BY c.conname",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (name, kind) in &rows {
        let prefix = match kind.as_str() {
            "u" => "uq_",
            "f" => "fk_",
            _ => "ck_",
        };
        assert!(name.starts_with(prefix), "Constraint {name} should start with {prefix}");
    }
}

/// Tables with `updated_at` refresh it on UPDATE.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_trigger_fires(pool: PgPool) {
    let (id, before): (i64, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
        "INSERT INTO users (username, email, password_hash)
         VALUES ('ana', 'ana@rallypoint.test', 'x')
         RETURNING id, updated_at",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    // NOW() is fixed per transaction, so the update must run in a new one.
    let (after,): (chrono::DateTime<chrono::Utc>,) =
        sqlx::query_as("UPDATE users SET status = 'banned' WHERE id = $1 RETURNING updated_at")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();

    assert!(after >= before);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_check_constraints_reject_bad_values(pool: PgPool) {
    let err = sqlx::query(
        "INSERT INTO users (username, email, password_hash, role)
         VALUES ('ana', 'ana@rallypoint.test', 'x', 'superuser')",
    )
    .execute(&pool)
    .await
    .unwrap_err();

    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("ck_users_role"));
}
