//! Live tests for loc8r-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh Postgres database from the sqlx test harness, so
//! `DATABASE_URL` must point at a server the harness can create databases on.
//! Run with `cargo test -p loc8r-db -- --ignored`.

use loc8r_db::{ping, PgConnector, PoolConfig, StoreConnector};

#[sqlx::test(migrations = false)]
#[ignore = "requires DATABASE_URL"]
async fn ping_succeeds_on_live_pool(pool: sqlx::PgPool) {
    ping(&pool).await.expect("SELECT 1");
}

#[sqlx::test(migrations = false)]
#[ignore = "requires DATABASE_URL"]
async fn identity_names_host_and_database(pool: sqlx::PgPool) {
    let connector = PgConnector::new(PoolConfig::default());
    let identity = connector.identity(&pool);
    assert!(!identity.host.is_empty());
    assert!(!identity.database.is_empty());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires DATABASE_URL"]
async fn close_shuts_the_pool(pool: sqlx::PgPool) {
    let connector = PgConnector::new(PoolConfig::default());
    let handle = pool.clone();
    connector.close(handle).await.expect("close");
    assert!(pool.is_closed());
}
