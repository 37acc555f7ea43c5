//! Patient registration sections and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::answer::Resposta;

/// General personal information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Geral {
    pub nascimento: Option<NaiveDate>,
    pub sexo: String,
    pub telefone: String,
    pub endereco: String,
    pub cidade: String,
    pub cep: String,
}

/// School information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Escola {
    pub nome_escola: String,
    pub serie: String,
    pub turno: String,
    pub professor: String,
    pub possui_mediador: Resposta,
    pub observacoes: String,
}

/// Mother or father (same shape for both).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Responsavel {
    pub nome: String,
    pub cpf: String,
    pub telefone: String,
    pub email: String,
    pub profissao: String,
}

/// Family and household details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaisInfo {
    pub mora_com: String,
    pub possui_irmaos: Resposta,
    /// Only meaningful when `possui_irmaos` is `Sim`.
    pub quantidade_irmaos: Option<u32>,
    pub como_conheceu: String,
}

impl MaisInfo {
    pub fn irmaos_enabled(&self) -> bool {
        self.possui_irmaos.is_sim()
    }
}

/// Health information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaudeInfo {
    pub diagnostico: String,
    pub cid: String,
    pub medicamentos: String,
    pub alergias: String,
    pub possui_terapia: Resposta,
    /// Only meaningful when `possui_terapia` is `Sim`.
    pub endereco_terapia: String,
    pub possui_convenio: Resposta,
    /// Only meaningful when `possui_convenio` is `Sim`.
    pub convenio: String,
}

impl SaudeInfo {
    pub fn terapia_enabled(&self) -> bool {
        self.possui_terapia.is_sim()
    }

    pub fn convenio_enabled(&self) -> bool {
        self.possui_convenio.is_sim()
    }
}

/// Editable JSON sections of a patient record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Geral,
    Escola,
    Mae,
    Pai,
    MaisInfo,
    SaudeInfo,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Geral,
        Section::Escola,
        Section::Mae,
        Section::Pai,
        Section::MaisInfo,
        Section::SaudeInfo,
    ];

    /// Field name used in payloads and records.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Geral => "geral",
            Section::Escola => "escola",
            Section::Mae => "mae",
            Section::Pai => "pai",
            Section::MaisInfo => "maisinfo",
            Section::SaudeInfo => "saudeinfo",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    /// Update route under `/pacientes/`.
    pub fn route(&self) -> String {
        format!("put{}", self.key())
    }
}

/// DTO for creating a patient, assembled from the multipart request.
#[derive(Debug, Clone, Default)]
pub struct CreatePaciente {
    pub nome: String,
    pub rg: String,
    pub cpf: String,
    pub email: String,
    pub password: String,
    pub unidade_id: Option<i32>,
    pub geral: Option<Value>,
    pub mae: Option<Value>,
    pub pai: Option<Value>,
    pub maisinfo: Option<Value>,
    pub escola: Option<Value>,
    pub saudeinfo: Option<Value>,
    pub foto: Option<String>,
    pub relescolar: Option<String>,
    pub laudo: Option<String>,
    pub compres: Option<String>,
    pub rgdoc: Option<String>,
}

/// List row of a patient record, as shown on the review screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacienteResumo {
    pub id: i32,
    pub nome: String,
    pub email: String,
    #[serde(default)]
    pub unidade_id: Option<i32>,
    #[serde(default)]
    pub analise: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_routes() {
        assert_eq!(Section::SaudeInfo.route(), "putsaudeinfo");
        assert_eq!(Section::from_key("mae"), Some(Section::Mae));
        assert_eq!(Section::from_key("analise"), None);
    }

    #[test]
    fn test_conditional_fields_follow_answer() {
        let mut saude = SaudeInfo::default();
        assert!(!saude.terapia_enabled());
        saude.possui_terapia = Resposta::Sim;
        assert!(saude.terapia_enabled());
        assert!(!saude.convenio_enabled());
    }

    #[test]
    fn test_slice_json_shape() {
        let escola = Escola {
            nome_escola: "EMEF Centro".to_string(),
            possui_mediador: Resposta::Sim,
            ..Default::default()
        };
        let value = serde_json::to_value(&escola).unwrap();
        assert_eq!(value["nomeEscola"], "EMEF Centro");
        assert_eq!(value["possuiMediador"], "sim");

        // Missing keys fall back to defaults when reading older records
        let parsed: Escola = serde_json::from_value(serde_json::json!({ "serie": "3º ano" })).unwrap();
        assert_eq!(parsed.serie, "3º ano");
        assert_eq!(parsed.possui_mediador, Resposta::Nao);
    }
}

