use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Create an in-memory SQLite database with the full schema applied.
///
/// Used by the integration tests in `tests/`; kept in the library so those
/// tests can link against it. The pool is pinned to one connection: every
/// pooled connection to `:memory:` would otherwise open its own database.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("Failed to connect to test database");

    use sea_orm_migration::MigratorTrait;
    crate::database::migrations::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}
