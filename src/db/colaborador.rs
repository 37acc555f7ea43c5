//! Collaborator repository.

use crate::entities::{colaboradores, prelude::*};
use crate::models::colaborador::CreateColaborador;
use chrono::Utc;
use sea_orm::*;

/// List all collaborators ordered by name.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<colaboradores::Model>, DbErr> {
    Colaboradores::find()
        .order_by_asc(colaboradores::Column::Nome)
        .all(db)
        .await
}

/// Get collaborator by ID.
pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<colaboradores::Model>, DbErr> {
    Colaboradores::find_by_id(id).one(db).await
}

/// Create a new collaborator. The password is hashed before it is stored.
pub async fn create(db: &DatabaseConnection, data: CreateColaborador) -> Result<colaboradores::Model, DbErr> {
    let password_hash = crate::auth::hash_password(&data.password).map_err(|e| DbErr::Custom(e.to_string()))?;

    let model = colaboradores::ActiveModel {
        nome: Set(data.nome),
        rg: Set(data.rg),
        cpf: Set(data.cpf),
        email: Set(data.email),
        password_hash: Set(password_hash),
        unidade_id: Set(data.unidade_id),
        geral: Set(data.geral),
        profissional: Set(data.profissional),
        foto: Set(data.foto),
        rgdoc: Set(data.rgdoc),
        compres: Set(data.compres),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await
}
