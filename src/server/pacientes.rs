//! `/pacientes` controller.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::error::{ApiError, ApiResult};
use super::multipart::{MultipartForm, unwrap_stringified};
use super::state::AppState;
use crate::db;
use crate::entities::pacientes;
use crate::models::paciente::{CreatePaciente, Section};
use crate::wizard::validation::{ValidationError, validate_email, validate_password};

const NOT_FOUND: &str = "Paciente não encontrado";
const EMPTY_LIST: &str = "Nenhum paciente foi encontrado";
const FILE_FIELDS: &[&str] = &["fotofile", "relescolar", "laudofile", "compresfile", "rgdocfile"];

pub fn routes() -> Router<AppState> {
    let mut router = Router::new()
        .route("/pacientes", post(create))
        .route("/pacientes/", post(create))
        .route("/pacientes/getall", get(list))
        .route("/pacientes/id/{id}", get(get_by_id))
        .route("/pacientes/putanalise", put(toggle_analise));

    for section in Section::ALL {
        router = router.route(
            &format!("/pacientes/{}", section.route()),
            put(move |State(state): State<AppState>, Json(body): Json<Value>| async move {
                put_section(&state, section, body).await
            }),
        );
    }

    router
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

    let mut data = CreatePaciente {
        nome: form.required("nome")?,
        rg: form.text("rg").unwrap_or_default(),
        cpf: form.text("cpf").unwrap_or_default(),
        email,
        password,
        unidade_id: form.unidade_id()?,
        geral: form.json("geral")?,
        mae: form.json("mae")?,
        pai: form.json("pai")?,
        maisinfo: form.json("maisinfo")?,
        escola: form.json("escola")?,
        saudeinfo: form.json("saudeinfo")?,
        ..Default::default()
    };

    let files = form.store_files(FILE_FIELDS, &state.uploads).await?;
    data.foto = files.get("fotofile");
    data.relescolar = files.get("relescolar");
    data.laudo = files.get("laudofile");
    data.compres = files.get("compresfile");
    data.rgdoc = files.get("rgdocfile");

    let paciente = match db::paciente::create(&state.db, data).await {
        Ok(paciente) => paciente,
        Err(e) => {
            files.discard(&state.uploads).await;
            return Err(e.into());
        }
    };
    info!("Paciente {} created ({})", paciente.id, paciente.nome);
    Ok((StatusCode::CREATED, Json(paciente)))
}

async fn list(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<Value>)> {
    let pacientes = db::paciente::list_all(&state.db)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if pacientes.is_empty() {
        Ok((
            StatusCode::NO_CONTENT,
            Json(json!({ "error": true, "message": EMPTY_LIST })),
        ))
    } else {
        Ok((StatusCode::OK, Json(json!({ "error": false, "pacientes": pacientes }))))
    }
}

async fn get_by_id(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<pacientes::Model>> {
    db::paciente::get_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// Body `{ id, <section>: JSON }`.
async fn put_section(state: &AppState, section: Section, body: Value) -> ApiResult<Json<pacientes::Model>> {
    let id = body
        .get("id")
        .and_then(id_from_value)
        .ok_or_else(|| ApiError::bad_request("Campo obrigatório ausente: id"))?;
    let value = body
        .get(section.key())
        .cloned()
        .map(unwrap_stringified)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ApiError::bad_request(format!("Campo obrigatório ausente: {}", section.key())))?;

    let paciente = db::paciente::update_section(&state.db, id, section, value)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    info!("Paciente {id}: section {} updated", section.key());
    Ok(Json(paciente))
}

#[derive(Deserialize)]
struct AnaliseBody {
    #[serde(deserialize_with = "deserialize_id")]
    id: i32,
}

async fn toggle_analise(State(state): State<AppState>, Json(body): Json<AnaliseBody>) -> ApiResult<Json<Value>> {
    let paciente = db::paciente::toggle_analise(&state.db, body.id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    info!("Paciente {}: analise = {}", paciente.id, paciente.analise);
    Ok(Json(json!({ "id": paciente.id, "analise": paciente.analise })))
}

/// Ids arrive as numbers or numeric strings.
fn id_from_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(&value).ok_or_else(|| serde::de::Error::custom("id must be an integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_value() {
        assert_eq!(id_from_value(&json!(7)), Some(7));
        assert_eq!(id_from_value(&json!(" 12 ")), Some(12));
        assert_eq!(id_from_value(&json!("abc")), None);
        assert_eq!(id_from_value(&json!(null)), None);
        assert_eq!(id_from_value(&json!(1_i64 << 40)), None);
    }
}
