//! Manager registration wizard.

use serde_json::Value;

use super::credentials::CredentialsForm;
use super::draft::{Attachment, RegistrationDraft, SliceValue};
use super::orchestrator::Registration;
use super::payload::{FieldKind, FieldTable};
use super::slice_from;
use super::validation::{ValidationError, require};
use crate::models::gerente::Geral;

const STEP_TITLES: [&str; 2] = ["Dados pessoais", "Foto"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GerenteForms {
    pub credentials: CredentialsForm,
    pub geral: Geral,
    pub foto: Option<Attachment>,
}

impl Registration for GerenteForms {
    const RESOURCE: &'static str = "gerentes";
    const FIELDS: FieldTable = &[
        ("nome", FieldKind::Text),
        ("cpf", FieldKind::Text),
        ("email", FieldKind::Text),
        ("password", FieldKind::Text),
        ("unidadeId", FieldKind::Text),
        ("geral", FieldKind::Json),
        ("fotofile", FieldKind::File),
    ];

    fn step_count(&self) -> usize {
        STEP_TITLES.len()
    }

    fn step_title(&self, step: usize) -> &'static str {
        STEP_TITLES.get(step.saturating_sub(1)).copied().unwrap_or_default()
    }

    fn commit_step(&self, step: usize, draft: &mut RegistrationDraft) -> Result<(), ValidationError> {
        if step == 1 {
            self.credentials.commit(draft)?;
            require("cargo", &self.geral.cargo)?;
            draft.update_slice("geral", SliceValue::json(&self.geral));
        } else {
            draft.update_slice("fotofile", SliceValue::file(self.foto.as_ref()));
        }
        Ok(())
    }

    fn receive(&mut self, record: &Value) {
        self.credentials.receive(record);
        self.geral = slice_from(&record["geral"]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::orchestrator::{FormOrchestrator, SubmissionBody};
    use crate::wizard::payload::PayloadPart;

    fn filled() -> FormOrchestrator<GerenteForms> {
        let mut wizard = FormOrchestrator::<GerenteForms>::new();
        let credentials = &mut wizard.forms.credentials;
        credentials.nome = "Paula".to_string();
        credentials.email = "paula@example.com".to_string();
        credentials.email_confirm = "paula@example.com".to_string();
        credentials.password = "segredo123".to_string();
        credentials.password_confirm = "segredo123".to_string();
        wizard.forms.geral.cargo = "Coordenação".to_string();
        wizard
    }

    #[test]
    fn test_cargo_required_to_advance() {
        let mut wizard = filled();
        wizard.forms.geral.cargo = "  ".to_string();

        assert!(!wizard.next_step());
        assert_eq!(wizard.step().current(), 1);
        assert_eq!(wizard.error(), Some("O campo cargo é obrigatório"));
        assert!(wizard.take_scroll_request());
        assert!(!wizard.draft().is_populated("geral"));
    }

    #[test]
    fn test_submit_without_photo() {
        let mut wizard = filled();
        assert!(wizard.next_step());
        let submission = wizard.prepare_submission().unwrap();
        let SubmissionBody::Multipart(parts) = submission.body else {
            panic!("gerentes are sent as multipart");
        };
        let names: Vec<_> = parts.iter().map(PayloadPart::name).collect();
        assert_eq!(names, vec!["nome", "email", "password", "geral"]);
    }
}
