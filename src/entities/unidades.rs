//! `unidades` table: physical facilities.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "unidades")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nome: String,
    pub endereco: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pacientes::Entity")]
    Pacientes,
    #[sea_orm(has_many = "super::colaboradores::Entity")]
    Colaboradores,
    #[sea_orm(has_many = "super::gerentes::Entity")]
    Gerentes,
}

impl Related<super::pacientes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pacientes.def()
    }
}

impl Related<super::colaboradores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Colaboradores.def()
    }
}

impl Related<super::gerentes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Gerentes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
