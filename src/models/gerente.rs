//! Manager registration sections and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// General contact information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Geral {
    pub telefone: String,
    pub endereco: String,
    pub cargo: String,
}

/// DTO for creating a manager.
#[derive(Debug, Clone, Default)]
pub struct CreateGerente {
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub password: String,
    pub unidade_id: Option<i32>,
    pub geral: Option<Value>,
    pub foto: Option<String>,
}

/// Body of `PUT /gerentes/vincularUnidade`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VincularUnidade {
    pub gerente_id: i32,
    pub unidade_id: i32,
}
