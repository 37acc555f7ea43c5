//! Patient registration wizard and the edit ("autenticação") flow.

use serde_json::Value;
use tracing::{info, warn};

use super::credentials::CredentialsForm;
use super::draft::{Attachment, RegistrationDraft, SliceValue};
use super::orchestrator::Registration;
use super::payload::{FieldKind, FieldTable};
use super::slice_from;
use super::validation::{ValidationError, require};
use crate::client::ApiClient;
use crate::error::Result;
use crate::models::paciente::{Escola, Geral, MaisInfo, Responsavel, SaudeInfo, Section};

const STEP_TITLES: [&str; 7] = [
    "Dados pessoais",
    "Escola",
    "Mãe",
    "Pai",
    "Mais informações",
    "Saúde",
    "Documentos",
];

/// Attachments picked on the last step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Documentos {
    pub foto: Option<Attachment>,
    pub relescolar: Option<Attachment>,
    pub laudo: Option<Attachment>,
    pub compres: Option<Attachment>,
    pub rgdoc: Option<Attachment>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacienteForms {
    pub credentials: CredentialsForm,
    pub geral: Geral,
    pub escola: Escola,
    pub mae: Responsavel,
    pub pai: Responsavel,
    pub maisinfo: MaisInfo,
    pub saude: SaudeInfo,
    pub documentos: Documentos,
    /// Editing an existing record: identity fields are read-only, no
    /// credentials, no documents step.
    pub edit_mode: bool,
}

impl PacienteForms {
    fn commit_geral(&self, draft: &mut RegistrationDraft) -> std::result::Result<(), ValidationError> {
        // Only the JSON sections can be updated on an existing record
        if !self.edit_mode {
            self.credentials.commit(draft)?;
        }
        if self.geral.nascimento.is_none() {
            return Err(ValidationError::Required("data de nascimento".to_string()));
        }
        require("telefone", &self.geral.telefone)?;
        draft.update_slice(Section::Geral.key(), SliceValue::json(&self.geral));
        Ok(())
    }

    fn commit_maisinfo(&self, draft: &mut RegistrationDraft) -> std::result::Result<(), ValidationError> {
        let mut maisinfo = self.maisinfo.clone();
        if maisinfo.irmaos_enabled() {
            if maisinfo.quantidade_irmaos.is_none() {
                return Err(ValidationError::Required("quantidade de irmãos".to_string()));
            }
        } else {
            maisinfo.quantidade_irmaos = None;
        }
        draft.update_slice(Section::MaisInfo.key(), SliceValue::json(&maisinfo));
        Ok(())
    }

    fn commit_saude(&self, draft: &mut RegistrationDraft) -> std::result::Result<(), ValidationError> {
        let mut saude = self.saude.clone();
        require("diagnóstico", &saude.diagnostico)?;
        if saude.terapia_enabled() {
            require("endereço da terapia", &saude.endereco_terapia)?;
        } else {
            saude.endereco_terapia.clear();
        }
        if saude.convenio_enabled() {
            require("convênio", &saude.convenio)?;
        } else {
            saude.convenio.clear();
        }
        draft.update_slice(Section::SaudeInfo.key(), SliceValue::json(&saude));
        Ok(())
    }

    fn commit_documentos(&self, draft: &mut RegistrationDraft) {
        let docs = &self.documentos;
        draft.update_slice("fotofile", SliceValue::file(docs.foto.as_ref()));
        draft.update_slice("relescolar", SliceValue::file(docs.relescolar.as_ref()));
        draft.update_slice("laudofile", SliceValue::file(docs.laudo.as_ref()));
        draft.update_slice("compresfile", SliceValue::file(docs.compres.as_ref()));
        draft.update_slice("rgdocfile", SliceValue::file(docs.rgdoc.as_ref()));
    }
}

impl Registration for PacienteForms {
    const RESOURCE: &'static str = "pacientes";
    const FIELDS: FieldTable = &[
        ("nome", FieldKind::Text),
        ("rg", FieldKind::Text),
        ("cpf", FieldKind::Text),
        ("email", FieldKind::Text),
        ("password", FieldKind::Text),
        ("unidadeId", FieldKind::Text),
        ("geral", FieldKind::Json),
        ("mae", FieldKind::Json),
        ("pai", FieldKind::Json),
        ("maisinfo", FieldKind::Json),
        ("escola", FieldKind::Json),
        ("saudeinfo", FieldKind::Json),
        ("fotofile", FieldKind::File),
        ("relescolar", FieldKind::File),
        ("laudofile", FieldKind::File),
        ("compresfile", FieldKind::File),
        ("rgdocfile", FieldKind::File),
    ];

    fn step_count(&self) -> usize {
        if self.edit_mode {
            STEP_TITLES.len() - 1
        } else {
            STEP_TITLES.len()
        }
    }

    fn step_title(&self, step: usize) -> &'static str {
        STEP_TITLES.get(step.saturating_sub(1)).copied().unwrap_or_default()
    }

    fn commit_step(&self, step: usize, draft: &mut RegistrationDraft) -> std::result::Result<(), ValidationError> {
        match step {
            1 => self.commit_geral(draft)?,
            2 => {
                require("nome da escola", &self.escola.nome_escola)?;
                draft.update_slice(Section::Escola.key(), SliceValue::json(&self.escola));
            }
            3 => {
                require("nome da mãe", &self.mae.nome)?;
                draft.update_slice(Section::Mae.key(), SliceValue::json(&self.mae));
            }
            4 => {
                // Father is optional; an untouched form is sent as nothing
                let value = if self.pai == Responsavel::default() {
                    SliceValue::Json(Value::Null)
                } else {
                    SliceValue::json(&self.pai)
                };
                draft.update_slice(Section::Pai.key(), value);
            }
            5 => self.commit_maisinfo(draft)?,
            6 => self.commit_saude(draft)?,
            _ => self.commit_documentos(draft),
        }
        Ok(())
    }

    fn receive(&mut self, record: &Value) {
        self.edit_mode = true;
        self.credentials.receive(record);
        self.geral = slice_from(&record["geral"]);
        self.escola = slice_from(&record["escola"]);
        self.mae = slice_from(&record["mae"]);
        self.pai = slice_from(&record["pai"]);
        self.maisinfo = slice_from(&record["maisinfo"]);
        self.saude = slice_from(&record["saudeinfo"]);
    }
}

/// One update per populated section slice, in section order.
pub fn section_updates(draft: &RegistrationDraft) -> Vec<(Section, Value)> {
    Section::ALL
        .into_iter()
        .filter_map(|section| match draft.get(section.key()) {
            Some(SliceValue::Json(value)) if !value.is_null() => Some((section, value.clone())),
            _ => None,
        })
        .collect()
}

/// Save an edited record: one `PUT /pacientes/put<section>` per populated slice.
///
/// Stops at the first failure; sections already sent stay saved.
pub async fn save_sections(client: &ApiClient, id: i32, draft: &RegistrationDraft) -> Result<usize> {
    let updates = section_updates(draft);
    let total = updates.len();
    for (section, value) in updates {
        if let Err(e) = client.put_section(section, id, &value).await {
            warn!("Paciente {id}: failed to save section {}: {e}", section.key());
            return Err(e);
        }
    }
    info!("Paciente {id}: {total} section(s) saved");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resposta;
    use crate::wizard::orchestrator::{FormOrchestrator, SubmissionBody};
    use crate::wizard::payload::PayloadPart;
    use chrono::NaiveDate;
    use serde_json::json;

    fn fill_first_step(forms: &mut PacienteForms) {
        forms.credentials.nome = "João".to_string();
        forms.credentials.email = "joao@example.com".to_string();
        forms.credentials.email_confirm = "joao@example.com".to_string();
        forms.credentials.password = "segredo123".to_string();
        forms.credentials.password_confirm = "segredo123".to_string();
        forms.geral.nascimento = NaiveDate::from_ymd_opt(2015, 3, 9);
        forms.geral.telefone = "11 99999-0000".to_string();
    }

    fn walk_to_last(wizard: &mut FormOrchestrator<PacienteForms>) {
        fill_first_step(&mut wizard.forms);
        wizard.forms.escola.nome_escola = "EMEF Central".to_string();
        wizard.forms.mae.nome = "Maria".to_string();
        wizard.forms.saude.diagnostico = "TEA".to_string();
        while !wizard.step().is_last() {
            assert!(wizard.next_step(), "blocked at step {}: {:?}", wizard.step().current(), wizard.error());
        }
    }

    #[test]
    fn test_first_step_requires_birth_date() {
        let mut wizard = FormOrchestrator::<PacienteForms>::new();
        fill_first_step(&mut wizard.forms);
        wizard.forms.geral.nascimento = None;

        assert!(!wizard.next_step());
        assert_eq!(wizard.error(), Some("O campo data de nascimento é obrigatório"));
    }

    #[test]
    fn test_conditional_fields_follow_answers() {
        let mut forms = PacienteForms::default();
        let mut draft = RegistrationDraft::new();

        forms.saude.diagnostico = "TEA".to_string();
        forms.saude.endereco_terapia = "Rua A".to_string();
        forms.saude.possui_convenio = Resposta::Sim;
        assert_eq!(
            forms.commit_step(6, &mut draft),
            Err(ValidationError::Required("convênio".to_string()))
        );

        forms.saude.convenio = "Unimed".to_string();
        forms.commit_step(6, &mut draft).unwrap();
        let saude = match draft.get("saudeinfo") {
            Some(SliceValue::Json(v)) => v.clone(),
            other => panic!("unexpected slice {other:?}"),
        };
        // Therapy was answered "não", so its address is dropped
        assert_eq!(saude["enderecoTerapia"], "");
        assert_eq!(saude["convenio"], "Unimed");
    }

    #[test]
    fn test_siblings_count_required_only_when_enabled() {
        let mut forms = PacienteForms::default();
        let mut draft = RegistrationDraft::new();
        forms.maisinfo.quantidade_irmaos = Some(2);
        forms.commit_step(5, &mut draft).unwrap();
        assert!(matches!(draft.get("maisinfo"), Some(SliceValue::Json(v)) if v["quantidadeIrmaos"].is_null()));

        forms.maisinfo.possui_irmaos = Resposta::Sim;
        forms.maisinfo.quantidade_irmaos = None;
        assert!(forms.commit_step(5, &mut draft).is_err());
    }

    #[test]
    fn test_full_walk_builds_multipart() {
        let mut wizard = FormOrchestrator::<PacienteForms>::new();
        walk_to_last(&mut wizard);
        wizard.forms.documentos.foto = Some(Attachment::new("foto.png", vec![1, 2, 3]));

        let submission = wizard.prepare_submission().unwrap();
        assert_eq!(submission.resource, "pacientes");
        let SubmissionBody::Multipart(parts) = submission.body else {
            panic!("pacientes are sent as multipart");
        };
        let names: Vec<_> = parts.iter().map(PayloadPart::name).collect();
        assert!(names.contains(&"email"));
        assert!(names.contains(&"fotofile"));
        // Blank father and missing attachments are left out
        assert!(!names.contains(&"pai"));
        assert!(!names.contains(&"laudofile"));
    }

    #[test]
    fn test_edit_mode_from_record() {
        let record = json!({
            "id": 7,
            "nome": "João",
            "email": "joao@example.com",
            "geral": { "nascimento": "2015-03-09", "telefone": "11 1234" },
            "escola": "{\"nomeEscola\":\"EMEF Central\"}",
            "mae": { "nome": "Maria" },
            "saudeinfo": { "diagnostico": "TEA" },
        });
        let mut wizard = FormOrchestrator::<PacienteForms>::from_record(&record);

        assert!(wizard.forms.edit_mode);
        assert_eq!(wizard.step().total(), 6);
        assert_eq!(wizard.forms.escola.nome_escola, "EMEF Central");

        while !wizard.step().is_last() {
            assert!(wizard.next_step(), "{:?}", wizard.error());
        }
        wizard.prepare_submission().unwrap();

        let updates = section_updates(wizard.draft());
        let sections: Vec<_> = updates.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            sections,
            vec![Section::Geral, Section::Escola, Section::Mae, Section::MaisInfo, Section::SaudeInfo]
        );
        assert!(wizard.draft().get("password").is_none());
    }

    #[test]
    fn test_edit_mode_leaves_identity_out_of_draft() {
        let record = json!({
            "id": 7,
            "nome": "João",
            "cpf": "123",
            "geral": { "nascimento": "2015-03-09", "telefone": "11 1234" },
        });
        let mut wizard = FormOrchestrator::<PacienteForms>::from_record(&record);
        wizard.forms.credentials.nome = "Outro Nome".to_string();
        wizard.forms.credentials.unidade_id = "não é número".to_string();

        assert!(wizard.next_step(), "{:?}", wizard.error());
        for field in ["nome", "rg", "cpf", "unidadeId", "email"] {
            assert!(wizard.draft().get(field).is_none(), "{field} should not be sent");
        }
        assert!(wizard.draft().is_populated("geral"));
    }
}
