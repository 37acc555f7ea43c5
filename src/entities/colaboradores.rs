//! `colaboradores` table: therapists and other staff.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "colaboradores")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nome: String,
    pub rg: String,
    pub cpf: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub unidade_id: Option<i32>,
    pub geral: Option<Json>,
    pub profissional: Option<Json>,
    pub foto: Option<String>,
    pub rgdoc: Option<String>,
    pub compres: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::unidades::Entity",
        from = "Column::UnidadeId",
        to = "super::unidades::Column::Id"
    )]
    Unidade,
}

impl Related<super::unidades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unidade.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
