//! `/imagens/{filename}`: serves stored uploads.

use axum::{
    Router,
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::get,
};

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::storage::{content_type, is_safe_name};

pub fn routes() -> Router<AppState> {
    Router::new().route("/imagens/{filename}", get(get_image))
}

async fn get_image(State(state): State<AppState>, Path(filename): Path<String>) -> ApiResult<impl IntoResponse> {
    if !is_safe_name(&filename) {
        return Err(ApiError::bad_request("Nome de arquivo inválido"));
    }

    let bytes = state
        .uploads
        .read(&filename)
        .await?
        .ok_or_else(|| ApiError::not_found("Imagem não encontrada"))?;

    Ok(([(CONTENT_TYPE, content_type(&filename))], bytes))
}
