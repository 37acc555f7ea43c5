//! `/unidades` controller.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::db;
use crate::entities::unidades;
use crate::models::unidade::{CreateUnidade, UpdateUnidade};
use crate::wizard::validation::require;

pub const NOT_FOUND: &str = "Unidade não encontrada";
pub const EMPTY_LIST: &str = "Nenhuma unidade foi encontrada";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/unidades", post(create))
        .route("/unidades/", post(create))
        .route("/unidades/getall", get(list))
        .route("/unidades/getUnidadeById/{id}", get(get_by_id))
        .route("/unidades/{id}", put(update).delete(delete))
}

async fn create(State(state): State<AppState>, Json(body): Json<CreateUnidade>) -> ApiResult<impl IntoResponse> {
    require("nome", &body.nome)?;
    require("endereco", &body.endereco)?;

    let unidade = db::unidade::create(&state.db, body).await?;
    info!("Unidade {} created ({})", unidade.id, unidade.nome);
    Ok((StatusCode::CREATED, Json(unidade)))
}

async fn list(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let unidades = db::unidade::list_all(&state.db)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(list_response(unidades))
}

/// 204 with an error flag when empty, 200 with the rows otherwise.
pub fn list_response(unidades: Vec<unidades::Model>) -> (StatusCode, Json<Value>) {
    if unidades.is_empty() {
        (
            StatusCode::NO_CONTENT,
            Json(json!({ "error": true, "message": EMPTY_LIST })),
        )
    } else {
        (StatusCode::OK, Json(json!({ "error": false, "unidades": unidades })))
    }
}

async fn get_by_id(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<unidades::Model>> {
    db::unidade::get_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateUnidade>,
) -> ApiResult<Json<unidades::Model>> {
    db::unidade::update(&state.db, id, body)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<Value>> {
    if db::unidade::delete(&state.db, id).await? {
        info!("Unidade {id} deleted");
        Ok(Json(json!({ "message": "Unidade removida" })))
    } else {
        Err(ApiError::not_found(NOT_FOUND))
    }
}
