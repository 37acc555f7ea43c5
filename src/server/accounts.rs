//! Login and password routes, mounted once per role.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use serde_json::{Value, json};
use tracing::{info, warn};

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::db;
use crate::models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, PasswordResetConfirm, PasswordResetRequest, Role,
};
use crate::wizard::validation::{ValidationError, validate_password};

const INVALID_LOGIN: &str = "Email ou senha inválidos";

pub fn routes(role: Role) -> Router<AppState> {
    let base = format!("/{}", role.api_segment());

    Router::new()
        .route(
            &format!("{base}/login"),
            post(move |State(state): State<AppState>, Json(body): Json<LoginRequest>| async move {
                login(&state, role, body).await
            }),
        )
        .route(
            &format!("{base}/id/{{id}}/changePassword"),
            post(
                move |State(state): State<AppState>, Path(id): Path<i32>, Json(body): Json<ChangePasswordRequest>| async move {
                    change_password(&state, role, id, body).await
                },
            ),
        )
        .route(
            &format!("{base}/senha"),
            post(move |State(state): State<AppState>, Json(body): Json<PasswordResetRequest>| async move {
                request_reset(&state, role, body).await
            }),
        )
        .route(
            &format!("{base}/senha/redefinir"),
            post(move |State(state): State<AppState>, Json(body): Json<PasswordResetConfirm>| async move {
                confirm_reset(&state, role, body).await
            }),
        )
}

async fn login(state: &AppState, role: Role, body: LoginRequest) -> ApiResult<Json<LoginResponse>> {
    let account = db::account::find_by_email(&state.db, role, body.email.trim())
        .await?
        .ok_or_else(|| ApiError::unauthorized(INVALID_LOGIN))?;

    if !crate::auth::verify_password(&body.password, &account.password_hash) {
        warn!("Failed {role} login for {}", account.email);
        return Err(ApiError::unauthorized(INVALID_LOGIN));
    }

    info!("{role} {} logged in", account.id);
    Ok(Json(LoginResponse {
        id: account.id,
        nome: account.nome,
        email: account.email,
        role,
        unidade_id: account.unidade_id,
    }))
}

async fn change_password(state: &AppState, role: Role, id: i32, body: ChangePasswordRequest) -> ApiResult<Json<Value>> {
    let account = db::account::find_by_id(&state.db, role, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{role} não encontrado")))?;

    if !crate::auth::verify_password(&body.old_password, &account.password_hash) {
        return Err(ApiError::unauthorized("Senha atual incorreta"));
    }
    if !validate_password(&body.new_password) {
        return Err(ValidationError::PasswordTooShort.into());
    }

    let hash = crate::auth::hash_password(&body.new_password).map_err(|e| ApiError::internal(e.to_string()))?;
    db::account::set_password_hash(&state.db, role, id, hash).await?;

    info!("{role} {id} changed password");
    Ok(Json(json!({ "message": "Senha alterada com sucesso" })))
}

/// Issue a reset token. The answer is the same whether or not the e-mail exists.
async fn request_reset(state: &AppState, role: Role, body: PasswordResetRequest) -> ApiResult<Json<Value>> {
    let email = body.email.trim();

    if db::account::find_by_email(&state.db, role, email).await?.is_some() {
        let reset = db::password_reset::create(&state.db, role, email).await?;
        // Delivery is handled outside this service
        info!("Password reset requested for {role} {email} (reset id {})", reset.id);
    } else {
        warn!("Password reset requested for unknown {role} {email}");
    }

    Ok(Json(json!({
        "message": "Se o email estiver cadastrado, as instruções de redefinição serão enviadas"
    })))
}

async fn confirm_reset(state: &AppState, role: Role, body: PasswordResetConfirm) -> ApiResult<Json<Value>> {
    if !validate_password(&body.new_password) {
        return Err(ValidationError::PasswordTooShort.into());
    }

    let reset = db::password_reset::consume(&state.db, role, body.token.trim())
        .await?
        .ok_or_else(|| ApiError::bad_request("Token inválido ou já utilizado"))?;

    let account = db::account::find_by_email(&state.db, role, &reset.email)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{role} não encontrado")))?;

    let hash = crate::auth::hash_password(&body.new_password).map_err(|e| ApiError::internal(e.to_string()))?;
    db::account::set_password_hash(&state.db, role, account.id, hash).await?;

    info!("{role} {} reset password", account.id);
    Ok(Json(json!({ "message": "Senha redefinida com sucesso" })))
}
