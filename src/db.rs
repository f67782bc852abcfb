use anyhow::Result;
use sea_orm::{Database, DatabaseConnection};

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let conn = Database::connect(database_url).await?;
    Ok(conn)
}

/// Apply the SQL migrations embedded from `migrations/`.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    let pool = conn.get_postgres_connection_pool();
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
