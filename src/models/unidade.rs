//! Unit DTOs for create and update operations.

use serde::{Deserialize, Serialize};

/// DTO for creating a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUnidade {
    pub nome: String,
    pub endereco: String,
}

/// DTO for updating a unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUnidade {
    pub nome: Option<String>,
    pub endereco: Option<String>,
}

/// A unit as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unidade {
    pub id: i32,
    pub nome: String,
    pub endereco: String,
}
