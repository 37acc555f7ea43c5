//! Collaborator registration wizard.

use serde_json::Value;

use super::credentials::CredentialsForm;
use super::draft::{Attachment, RegistrationDraft, SliceValue};
use super::orchestrator::Registration;
use super::payload::{FieldKind, FieldTable};
use super::slice_from;
use super::validation::{ValidationError, require};
use crate::models::colaborador::{Geral, Profissional};

const STEP_TITLES: [&str; 3] = ["Dados pessoais", "Dados profissionais", "Documentos"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColaboradorForms {
    pub credentials: CredentialsForm,
    pub geral: Geral,
    pub profissional: Profissional,
    pub foto: Option<Attachment>,
    pub rgdoc: Option<Attachment>,
    pub compres: Option<Attachment>,
}

impl Registration for ColaboradorForms {
    const RESOURCE: &'static str = "colaboradores";
    const FIELDS: FieldTable = &[
        ("nome", FieldKind::Text),
        ("rg", FieldKind::Text),
        ("cpf", FieldKind::Text),
        ("email", FieldKind::Text),
        ("password", FieldKind::Text),
        ("unidadeId", FieldKind::Text),
        ("geral", FieldKind::Json),
        ("profissional", FieldKind::Json),
        ("fotofile", FieldKind::File),
        ("rgdocfile", FieldKind::File),
        ("compresfile", FieldKind::File),
    ];

    fn step_count(&self) -> usize {
        STEP_TITLES.len()
    }

    fn step_title(&self, step: usize) -> &'static str {
        STEP_TITLES.get(step.saturating_sub(1)).copied().unwrap_or_default()
    }

    fn commit_step(&self, step: usize, draft: &mut RegistrationDraft) -> Result<(), ValidationError> {
        match step {
            1 => {
                self.credentials.commit(draft)?;
                require("telefone", &self.geral.telefone)?;
                draft.update_slice("geral", SliceValue::json(&self.geral));
            }
            2 => {
                let mut profissional = self.profissional.clone();
                require("formação", &profissional.formacao)?;
                if profissional.registro_enabled() {
                    require("registro no conselho", &profissional.registro_conselho)?;
                } else {
                    profissional.registro_conselho.clear();
                }
                draft.update_slice("profissional", SliceValue::json(&profissional));
            }
            _ => {
                draft.update_slice("fotofile", SliceValue::file(self.foto.as_ref()));
                draft.update_slice("rgdocfile", SliceValue::file(self.rgdoc.as_ref()));
                draft.update_slice("compresfile", SliceValue::file(self.compres.as_ref()));
            }
        }
        Ok(())
    }

    fn receive(&mut self, record: &Value) {
        self.credentials.receive(record);
        self.geral = slice_from(&record["geral"]);
        self.profissional = slice_from(&record["profissional"]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resposta;
    use crate::wizard::orchestrator::FormOrchestrator;

    #[test]
    fn test_registration_number_gated_by_answer() {
        let mut forms = ColaboradorForms::default();
        let mut draft = RegistrationDraft::new();
        forms.profissional.formacao = "Psicologia".to_string();
        forms.profissional.possui_registro = Resposta::Sim;

        assert_eq!(
            forms.commit_step(2, &mut draft),
            Err(ValidationError::Required("registro no conselho".to_string()))
        );

        forms.profissional.registro_conselho = "CRP 06/1234".to_string();
        forms.commit_step(2, &mut draft).unwrap();
        assert!(draft.is_populated("profissional"));
    }

    #[test]
    fn test_first_step_checks_email_confirmation() {
        let mut wizard = FormOrchestrator::<ColaboradorForms>::new();
        wizard.forms.credentials.nome = "Carla".to_string();
        wizard.forms.credentials.email = "carla@example.com".to_string();
        wizard.forms.credentials.email_confirm = "carla@example.org".to_string();

        assert!(!wizard.next_step());
        assert_eq!(wizard.error(), Some("Os emails não coincidem"));
    }
}
