//! Unit repository with CRUD operations.

use crate::entities::{prelude::*, unidades};
use crate::models::unidade::{CreateUnidade, UpdateUnidade};
use chrono::Utc;
use sea_orm::*;

/// List all units ordered by name.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<unidades::Model>, DbErr> {
    Unidades::find()
        .order_by_asc(unidades::Column::Nome)
        .all(db)
        .await
}

/// Get unit by ID.
pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<unidades::Model>, DbErr> {
    Unidades::find_by_id(id).one(db).await
}

/// Create a new unit.
pub async fn create(db: &DatabaseConnection, data: CreateUnidade) -> Result<unidades::Model, DbErr> {
    let model = unidades::ActiveModel {
        nome: Set(data.nome),
        endereco: Set(data.endereco),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await
}

/// Update an existing unit.
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    data: UpdateUnidade,
) -> Result<Option<unidades::Model>, DbErr> {
    let existing = Unidades::find_by_id(id).one(db).await?;

    match existing {
        Some(model) => {
            let mut active: unidades::ActiveModel = model.into();

            if let Some(nome) = data.nome {
                active.nome = Set(nome);
            }
            if let Some(endereco) = data.endereco {
                active.endereco = Set(endereco);
            }

            let updated = active.update(db).await?;
            Ok(Some(updated))
        }
        None => Ok(None),
    }
}

/// Delete a unit by ID.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
    let result = Unidades::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
