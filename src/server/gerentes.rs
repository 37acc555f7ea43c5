//! `/gerentes` controller.
//!
//! `GET /gerentes/id/{id}` wraps the record as `{ gerente }` while
//! `GET /gerentes/{id}` returns it bare; clients depend on both shapes.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::multipart::MultipartForm;
use super::state::AppState;
use crate::db;
use crate::entities::gerentes;
use crate::models::gerente::{CreateGerente, VincularUnidade};
use crate::wizard::validation::{ValidationError, validate_email, validate_password};

const NOT_FOUND: &str = "Gerente não encontrado";
const EMPTY_LIST: &str = "Nenhum gerente foi encontrado";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/gerentes", post(create))
        .route("/gerentes/", post(create))
        .route("/gerentes/getall", get(list))
        .route("/gerentes/vincularUnidade", put(vincular_unidade))
        .route("/gerentes/id/{id}", get(get_wrapped))
        .route("/gerentes/{id}", get(get_bare))
}

async fn create(State(state): State<AppState>, multipart: Multipart) -> ApiResult<impl IntoResponse> {
    let form = MultipartForm::read(multipart).await?;

    let email = form.required("email")?;
    if !validate_email(&email) {
        return Err(ValidationError::InvalidEmail.into());
    }
    let password = form.raw("password")?;
    if !validate_password(&password) {
        return Err(ValidationError::PasswordTooShort.into());
    }

    let mut data = CreateGerente {
        nome: form.required("nome")?,
        cpf: form.text("cpf").unwrap_or_default(),
        email,
        password,
        unidade_id: form.unidade_id()?,
        geral: form.json("geral")?,
        foto: None,
    };

    let files = form.store_files(&["fotofile"], &state.uploads).await?;
    data.foto = files.get("fotofile");

    let gerente = match db::gerente::create(&state.db, data).await {
        Ok(gerente) => gerente,
        Err(e) => {
            files.discard(&state.uploads).await;
            return Err(e.into());
        }
    };
    info!("Gerente {} created ({})", gerente.id, gerente.nome);
    Ok((StatusCode::CREATED, Json(gerente)))
}

async fn list(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<Value>)> {
    let gerentes = db::gerente::list_all(&state.db)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if gerentes.is_empty() {
        Ok((
            StatusCode::NO_CONTENT,
            Json(json!({ "error": true, "message": EMPTY_LIST })),
        ))
    } else {
        Ok((StatusCode::OK, Json(json!({ "error": false, "gerentes": gerentes }))))
    }
}

async fn find(state: &AppState, id: i32) -> ApiResult<gerentes::Model> {
    db::gerente::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

async fn get_wrapped(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<Value>> {
    let gerente = find(&state, id).await?;
    Ok(Json(json!({ "gerente": gerente })))
}

async fn get_bare(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<gerentes::Model>> {
    find(&state, id).await.map(Json)
}

/// Two independent operations: the unit lookup and the manager write.
async fn vincular_unidade(
    State(state): State<AppState>,
    Json(body): Json<VincularUnidade>,
) -> ApiResult<Json<gerentes::Model>> {
    db::unidade::get_by_id(&state.db, body.unidade_id)
        .await?
        .ok_or_else(|| ApiError::not_found(super::unidades::NOT_FOUND))?;

    let gerente = db::gerente::set_unidade(&state.db, body.gerente_id, body.unidade_id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    info!("Gerente {} linked to unidade {}", gerente.id, body.unidade_id);
    Ok(Json(gerente))
}
