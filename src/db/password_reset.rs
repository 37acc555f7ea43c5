//! Password reset tokens.

use crate::entities::{password_resets, prelude::*};
use crate::models::Role;
use chrono::Utc;
use sea_orm::*;

/// Issue a new reset token for an account.
pub async fn create(db: &DatabaseConnection, role: Role, email: &str) -> Result<password_resets::Model, DbErr> {
    let model = password_resets::ActiveModel {
        role: Set(role.code().to_string()),
        email: Set(email.to_string()),
        token: Set(uuid::Uuid::new_v4().simple().to_string()),
        used: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await
}

/// Mark an unused token for `role` as used and return it.
///
/// Tokens are single-use: a second call with the same token yields `None`.
pub async fn consume(db: &DatabaseConnection, role: Role, token: &str) -> Result<Option<password_resets::Model>, DbErr> {
    let found = PasswordResets::find()
        .filter(password_resets::Column::Token.eq(token))
        .filter(password_resets::Column::Role.eq(role.code()))
        .filter(password_resets::Column::Used.eq(false))
        .one(db)
        .await?;

    let Some(model) = found else {
        return Ok(None);
    };

    let mut active: password_resets::ActiveModel = model.into();
    active.used = Set(true);
    let updated = active.update(db).await?;
    Ok(Some(updated))
}
