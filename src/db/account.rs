//! Credential lookups shared by every role.

use crate::entities::{colaboradores, gerentes, pacientes, prelude::*};
use crate::models::Role;
use sea_orm::sea_query::Expr;
use sea_orm::*;

/// Login-relevant columns of any account table.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub password_hash: String,
    pub unidade_id: Option<i32>,
}

impl From<pacientes::Model> for Account {
    fn from(m: pacientes::Model) -> Self {
        Self {
            id: m.id,
            nome: m.nome,
            email: m.email,
            password_hash: m.password_hash,
            unidade_id: m.unidade_id,
        }
    }
}

impl From<colaboradores::Model> for Account {
    fn from(m: colaboradores::Model) -> Self {
        Self {
            id: m.id,
            nome: m.nome,
            email: m.email,
            password_hash: m.password_hash,
            unidade_id: m.unidade_id,
        }
    }
}

impl From<gerentes::Model> for Account {
    fn from(m: gerentes::Model) -> Self {
        Self {
            id: m.id,
            nome: m.nome,
            email: m.email,
            password_hash: m.password_hash,
            unidade_id: m.unidade_id,
        }
    }
}

/// Find an account by e-mail in the role's table.
pub async fn find_by_email(db: &DatabaseConnection, role: Role, email: &str) -> Result<Option<Account>, DbErr> {
    let account = match role {
        Role::Paciente => Pacientes::find()
            .filter(pacientes::Column::Email.eq(email))
            .one(db)
            .await?
            .map(Account::from),
        Role::Colaborador => Colaboradores::find()
            .filter(colaboradores::Column::Email.eq(email))
            .one(db)
            .await?
            .map(Account::from),
        Role::Gerente => Gerentes::find()
            .filter(gerentes::Column::Email.eq(email))
            .one(db)
            .await?
            .map(Account::from),
    };
    Ok(account)
}

/// Find an account by ID in the role's table.
pub async fn find_by_id(db: &DatabaseConnection, role: Role, id: i32) -> Result<Option<Account>, DbErr> {
    let account = match role {
        Role::Paciente => Pacientes::find_by_id(id).one(db).await?.map(Account::from),
        Role::Colaborador => Colaboradores::find_by_id(id).one(db).await?.map(Account::from),
        Role::Gerente => Gerentes::find_by_id(id).one(db).await?.map(Account::from),
    };
    Ok(account)
}

/// Store a new password hash. Returns false when the account does not exist.
pub async fn set_password_hash(db: &DatabaseConnection, role: Role, id: i32, hash: String) -> Result<bool, DbErr> {
    let result = match role {
        Role::Paciente => {
            Pacientes::update_many()
                .col_expr(pacientes::Column::PasswordHash, Expr::value(hash))
                .filter(pacientes::Column::Id.eq(id))
                .exec(db)
                .await?
        }
        Role::Colaborador => {
            Colaboradores::update_many()
                .col_expr(colaboradores::Column::PasswordHash, Expr::value(hash))
                .filter(colaboradores::Column::Id.eq(id))
                .exec(db)
                .await?
        }
        Role::Gerente => {
            Gerentes::update_many()
                .col_expr(gerentes::Column::PasswordHash, Expr::value(hash))
                .filter(gerentes::Column::Id.eq(id))
                .exec(db)
                .await?
        }
    };
    Ok(result.rows_affected > 0)
}
