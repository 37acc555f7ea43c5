//! Database connection pool and utility functions.

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, PaginatorTrait, Statement,
};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Create a new database connection with configured pool settings.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url);

    // Every pooled connection to an in-memory SQLite database is a separate database
    let max_connections = if database_url.starts_with("sqlite") && database_url.contains(":memory:") {
        1
    } else {
        5
    };

    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt).await
}

/// Test database connection by executing a simple query.
pub async fn test_connection(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute_unprepared("SELECT 1").await?;
    Ok(())
}

/// Get the database server version string.
pub async fn get_version(db: &DatabaseConnection) -> Result<String, DbErr> {
    let backend = db.get_database_backend();
    let sql = match backend {
        DatabaseBackend::Sqlite => "SELECT 'SQLite ' || sqlite_version() AS version",
        _ => "SELECT version() AS version",
    };

    let result = db
        .query_one(Statement::from_string(backend, sql.to_owned()))
        .await?;

    match result {
        Some(row) => {
            let version: String = row.try_get("", "version")?;
            Ok(version)
        }
        None => Ok("Unknown".to_owned()),
    }
}

/// Get record counts for all tables.
pub async fn get_table_counts(db: &DatabaseConnection) -> Result<TableCounts, DbErr> {
    use crate::entities::prelude::*;
    use sea_orm::EntityTrait;

    let unidades = Unidades::find().count(db).await?;
    let pacientes = Pacientes::find().count(db).await?;
    let colaboradores = Colaboradores::find().count(db).await?;
    let gerentes = Gerentes::find().count(db).await?;

    Ok(TableCounts {
        unidades,
        pacientes,
        colaboradores,
        gerentes,
    })
}

/// Table record counts.
#[derive(Debug, Clone)]
pub struct TableCounts {
    pub unidades: u64,
    pub pacientes: u64,
    pub colaboradores: u64,
    pub gerentes: u64,
}
