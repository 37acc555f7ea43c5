//! Manager repository.

use crate::entities::{gerentes, prelude::*};
use crate::models::gerente::CreateGerente;
use chrono::Utc;
use sea_orm::*;

/// List all managers ordered by name.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<gerentes::Model>, DbErr> {
    Gerentes::find()
        .order_by_asc(gerentes::Column::Nome)
        .all(db)
        .await
}

/// Get manager by ID.
pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<gerentes::Model>, DbErr> {
    Gerentes::find_by_id(id).one(db).await
}

/// Create a new manager. The password is hashed before it is stored.
pub async fn create(db: &DatabaseConnection, data: CreateGerente) -> Result<gerentes::Model, DbErr> {
    let password_hash = crate::auth::hash_password(&data.password).map_err(|e| DbErr::Custom(e.to_string()))?;

    let model = gerentes::ActiveModel {
        nome: Set(data.nome),
        cpf: Set(data.cpf),
        email: Set(data.email),
        password_hash: Set(password_hash),
        unidade_id: Set(data.unidade_id),
        geral: Set(data.geral),
        foto: Set(data.foto),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await
}

/// Point a manager at a unit.
pub async fn set_unidade(
    db: &DatabaseConnection,
    id: i32,
    unidade_id: i32,
) -> Result<Option<gerentes::Model>, DbErr> {
    let Some(model) = Gerentes::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: gerentes::ActiveModel = model.into();
    active.unidade_id = Set(Some(unidade_id));

    let updated = active.update(db).await?;
    Ok(Some(updated))
}
