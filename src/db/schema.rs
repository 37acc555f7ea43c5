//! Table creation from the entity definitions.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};
use tracing::debug;

use crate::entities::prelude::*;

/// Create every table that does not exist yet.
///
/// Units go first since the people tables reference them.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, Unidades).await?;
    create_table(db, Pacientes).await?;
    create_table(db, Colaboradores).await?;
    create_table(db, Gerentes).await?;
    create_table(db, PasswordResets).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    debug!("Ensuring table {}", entity.table_name());

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();

    db.execute(backend.build(&stmt)).await?;
    Ok(())
}
