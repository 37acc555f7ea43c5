//! Yes/no answers that gate dependent fields.

use serde::{Deserialize, Serialize};

/// Answer to a yes/no question on a registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resposta {
    #[default]
    Nao,
    Sim,
}

impl Resposta {
    pub const ALL: [Resposta; 2] = [Resposta::Sim, Resposta::Nao];

    pub fn is_sim(&self) -> bool {
        matches!(self, Resposta::Sim)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Resposta::Sim => "Sim",
            Resposta::Nao => "Não",
        }
    }
}
