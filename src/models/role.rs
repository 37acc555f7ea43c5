//! Account roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role, identified on the wire by a single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "g")]
    Gerente,
    #[serde(rename = "c")]
    Colaborador,
    #[serde(rename = "p")]
    Paciente,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Gerente, Role::Colaborador, Role::Paciente];

    /// Parse a role code (`g`, `c`, `p`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "g" => Some(Role::Gerente),
            "c" => Some(Role::Colaborador),
            "p" => Some(Role::Paciente),
            _ => None,
        }
    }

    /// Single-letter role code.
    pub fn code(&self) -> &'static str {
        match self {
            Role::Gerente => "g",
            Role::Colaborador => "c",
            Role::Paciente => "p",
        }
    }

    /// Lowercase plural route segment used by the API.
    pub fn api_segment(&self) -> &'static str {
        match self {
            Role::Gerente => "gerentes",
            Role::Colaborador => "colaboradores",
            Role::Paciente => "pacientes",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Gerente => "Gerente",
            Role::Colaborador => "Colaborador",
            Role::Paciente => "Paciente",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
