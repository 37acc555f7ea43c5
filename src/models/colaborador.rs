//! Collaborator registration sections and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::answer::Resposta;

/// General personal information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Geral {
    pub nascimento: Option<NaiveDate>,
    pub telefone: String,
    pub endereco: String,
    pub cidade: String,
}

/// Professional background.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profissional {
    pub formacao: String,
    pub especialidade: String,
    pub possui_registro: Resposta,
    /// Council registration number, only when `possui_registro` is `Sim`.
    pub registro_conselho: String,
}

impl Profissional {
    pub fn registro_enabled(&self) -> bool {
        self.possui_registro.is_sim()
    }
}

/// DTO for creating a collaborator.
#[derive(Debug, Clone, Default)]
pub struct CreateColaborador {
    pub nome: String,
    pub rg: String,
    pub cpf: String,
    pub email: String,
    pub password: String,
    pub unidade_id: Option<i32>,
    pub geral: Option<Value>,
    pub profissional: Option<Value>,
    pub foto: Option<String>,
    pub rgdoc: Option<String>,
    pub compres: Option<String>,
}
