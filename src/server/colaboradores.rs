//! `/colaboradores` controller.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::multipart::MultipartForm;
use super::state::AppState;
use crate::db;
use crate::entities::colaboradores;
use crate::models::colaborador::CreateColaborador;
use crate::wizard::validation::{ValidationError, validate_email, validate_password};

const NOT_FOUND: &str = "Colaborador não encontrado";
const EMPTY_LIST: &str = "Nenhum colaborador foi encontrado";
const FILE_FIELDS: &[&str] = &["fotofile", "rgdocfile", "compresfile"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/colaboradores", post(create))
        .route("/colaboradores/", post(create))
        .route("/colaboradores/getall", get(list))
        .route("/colaboradores/id/{id}", get(get_by_id))
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

    let mut data = CreateColaborador {
        nome: form.required("nome")?,
        rg: form.text("rg").unwrap_or_default(),
        cpf: form.text("cpf").unwrap_or_default(),
        email,
        password,
        unidade_id: form.unidade_id()?,
        geral: form.json("geral")?,
        profissional: form.json("profissional")?,
        ..Default::default()
    };

    let files = form.store_files(FILE_FIELDS, &state.uploads).await?;
    data.foto = files.get("fotofile");
    data.rgdoc = files.get("rgdocfile");
    data.compres = files.get("compresfile");

    let colaborador = match db::colaborador::create(&state.db, data).await {
        Ok(colaborador) => colaborador,
        Err(e) => {
            files.discard(&state.uploads).await;
            return Err(e.into());
        }
    };
    info!("Colaborador {} created ({})", colaborador.id, colaborador.nome);
    Ok((StatusCode::CREATED, Json(colaborador)))
}

async fn list(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<Value>)> {
    let colaboradores = db::colaborador::list_all(&state.db)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if colaboradores.is_empty() {
        Ok((
            StatusCode::NO_CONTENT,
            Json(json!({ "error": true, "message": EMPTY_LIST })),
        ))
    } else {
        Ok((
            StatusCode::OK,
            Json(json!({ "error": false, "colaboradores": colaboradores })),
        ))
    }
}

async fn get_by_id(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<colaboradores::Model>> {
    db::colaborador::get_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}
