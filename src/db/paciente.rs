//! Patient repository.

use crate::entities::{pacientes, prelude::*};
use crate::models::paciente::{CreatePaciente, Section};
use chrono::Utc;
use sea_orm::*;
use serde_json::Value;

/// List all patients ordered by name.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<pacientes::Model>, DbErr> {
    Pacientes::find()
        .order_by_asc(pacientes::Column::Nome)
        .all(db)
        .await
}

/// Get patient by ID.
pub async fn get_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<pacientes::Model>, DbErr> {
    Pacientes::find_by_id(id).one(db).await
}

/// Create a new patient. The password is hashed before it is stored.
pub async fn create(db: &DatabaseConnection, data: CreatePaciente) -> Result<pacientes::Model, DbErr> {
    let password_hash = crate::auth::hash_password(&data.password).map_err(|e| DbErr::Custom(e.to_string()))?;

    let model = pacientes::ActiveModel {
        nome: Set(data.nome),
        rg: Set(data.rg),
        cpf: Set(data.cpf),
        email: Set(data.email),
        password_hash: Set(password_hash),
        unidade_id: Set(data.unidade_id),
        geral: Set(data.geral),
        mae: Set(data.mae),
        pai: Set(data.pai),
        maisinfo: Set(data.maisinfo),
        escola: Set(data.escola),
        saudeinfo: Set(data.saudeinfo),
        foto: Set(data.foto),
        relescolar: Set(data.relescolar),
        laudo: Set(data.laudo),
        compres: Set(data.compres),
        rgdoc: Set(data.rgdoc),
        analise: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await
}

/// Replace one JSON section of a patient record.
pub async fn update_section(
    db: &DatabaseConnection,
    id: i32,
    section: Section,
    value: Value,
) -> Result<Option<pacientes::Model>, DbErr> {
    let Some(model) = Pacientes::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let mut active: pacientes::ActiveModel = model.into();
    let value = Some(value);
    match section {
        Section::Geral => active.geral = Set(value),
        Section::Escola => active.escola = Set(value),
        Section::Mae => active.mae = Set(value),
        Section::Pai => active.pai = Set(value),
        Section::MaisInfo => active.maisinfo = Set(value),
        Section::SaudeInfo => active.saudeinfo = Set(value),
    }

    let updated = active.update(db).await?;
    Ok(Some(updated))
}

/// Flip the "under review" flag.
pub async fn toggle_analise(db: &DatabaseConnection, id: i32) -> Result<Option<pacientes::Model>, DbErr> {
    let Some(model) = Pacientes::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let analise = model.analise;
    let mut active: pacientes::ActiveModel = model.into();
    active.analise = Set(!analise);

    let updated = active.update(db).await?;
    Ok(Some(updated))
}
