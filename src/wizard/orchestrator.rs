//! Form orchestrator: owns the draft and the step position, gates
//! advancement on step validation and drives the one-shot submission.

use serde_json::Value;
use tracing::{error, info};

use super::draft::{RegistrationDraft, SliceValue, StepIndex};
use super::payload::{FieldTable, PayloadPart, build_json, build_parts};
use super::validation::ValidationError;
use crate::client::ApiClient;
use crate::error::{AppError, Result};

/// Request body encoding of an entity's create endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Multipart,
    Json,
}

/// The step forms of one registration wizard.
pub trait Registration: Default {
    /// Route segment of the create endpoint (`POST /<resource>/`).
    const RESOURCE: &'static str;
    /// Draft fields sent on submit, with their encoding.
    const FIELDS: FieldTable;
    const ENCODING: Encoding = Encoding::Multipart;

    fn step_count(&self) -> usize;

    fn step_title(&self, step: usize) -> &'static str;

    /// Validate step `step` and, when valid, write the slices it owns into the draft.
    fn commit_step(&self, step: usize, draft: &mut RegistrationDraft) -> std::result::Result<(), ValidationError>;

    /// Pre-populate the forms from a previously fetched record (edit mode).
    fn receive(&mut self, record: &Value);
}

/// A serialized draft ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub resource: &'static str,
    pub body: SubmissionBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionBody {
    Multipart(Vec<PayloadPart>),
    Json(Value),
}

/// Submission lifecycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmitState {
    #[default]
    Idle,
    InFlight,
    Succeeded(Value),
    Failed(String),
}

pub struct FormOrchestrator<R: Registration> {
    /// Step forms, edited directly by the UI.
    pub forms: R,
    draft: RegistrationDraft,
    step: StepIndex,
    error: Option<String>,
    scroll_to_error: bool,
    submit_state: SubmitState,
}

impl<R: Registration> Default for FormOrchestrator<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Registration> FormOrchestrator<R> {
    pub fn new() -> Self {
        Self::with_forms(R::default())
    }

    pub fn with_forms(forms: R) -> Self {
        let step = StepIndex::new(forms.step_count());
        Self {
            forms,
            draft: RegistrationDraft::new(),
            step,
            error: None,
            scroll_to_error: false,
            submit_state: SubmitState::Idle,
        }
    }

    /// Edit mode: forms pre-populated from a fetched record.
    pub fn from_record(record: &Value) -> Self {
        let mut forms = R::default();
        forms.receive(record);
        Self::with_forms(forms)
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn step(&self) -> StepIndex {
        self.step
    }

    pub fn step_title(&self) -> &'static str {
        self.forms.step_title(self.step.current())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submit_state(&self) -> &SubmitState {
        &self.submit_state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.submit_state, SubmitState::InFlight)
    }

    /// One-shot request to scroll the error banner into view.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_error)
    }

    /// Replace one named slice of the draft.
    pub fn update_slice(&mut self, name: &str, value: SliceValue) {
        self.draft.update_slice(name, value);
    }

    /// Validate and commit the current step, then advance.
    ///
    /// Returns false when validation failed (the error is set) or on the last step.
    pub fn next_step(&mut self) -> bool {
        if !self.commit_current() {
            return false;
        }
        self.step.next()
    }

    pub fn prev_step(&mut self) -> bool {
        self.error = None;
        self.step.prev()
    }

    /// Show `message` in the error banner.
    pub fn set_error(&mut self, message: impl Into<String>) {
        // Only the first error in a row asks for a scroll
        if self.error.is_none() {
            self.scroll_to_error = true;
        }
        self.error = Some(message.into());
    }

    fn commit_current(&mut self) -> bool {
        match self.forms.commit_step(self.step.current(), &mut self.draft) {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(e) => {
                self.set_error(e.to_string());
                false
            }
        }
    }

    /// Commit the current step and serialize the draft.
    ///
    /// Refused while a previous submission is still in flight.
    pub fn prepare_submission(&mut self) -> Result<Submission> {
        if self.is_submitting() {
            return Err(AppError::SubmitInFlight);
        }
        if !self.commit_current() {
            return Err(AppError::validation(self.error.clone().unwrap_or_default()));
        }

        let body = match R::ENCODING {
            Encoding::Multipart => SubmissionBody::Multipart(build_parts(&self.draft, R::FIELDS)),
            Encoding::Json => SubmissionBody::Json(build_json(&self.draft, R::FIELDS)),
        };

        self.submit_state = SubmitState::InFlight;
        Ok(Submission {
            resource: R::RESOURCE,
            body,
        })
    }

    /// Record the outcome. The draft is kept either way so the user can retry.
    pub fn finish_submission(&mut self, result: &Result<Value>) {
        self.submit_state = match result {
            Ok(record) => {
                info!("{} registration submitted", R::RESOURCE);
                SubmitState::Succeeded(record.clone())
            }
            Err(e) => {
                error!("{} registration failed: {e}", R::RESOURCE);
                SubmitState::Failed(e.to_string())
            }
        };
    }

    /// Serialize, send once and record the outcome.
    pub async fn submit(&mut self, client: &ApiClient) -> Result<Value> {
        let submission = self.prepare_submission()?;
        let result = client.submit(submission).await;
        self.finish_submission(&result);
        result
    }

    /// Start over with empty forms.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::payload::FieldKind;
    use crate::wizard::validation::require;
    use serde_json::json;

    /// Two-step form: a name, then a JSON slice.
    #[derive(Default)]
    struct Demo {
        nome: String,
        cidade: String,
    }

    impl Registration for Demo {
        const RESOURCE: &'static str = "demos";
        const FIELDS: FieldTable = &[("nome", FieldKind::Text), ("geral", FieldKind::Json)];

        fn step_count(&self) -> usize {
            2
        }

        fn step_title(&self, step: usize) -> &'static str {
            if step == 1 { "Nome" } else { "Cidade" }
        }

        fn commit_step(&self, step: usize, draft: &mut RegistrationDraft) -> std::result::Result<(), ValidationError> {
            match step {
                1 => {
                    require("nome", &self.nome)?;
                    draft.update_slice("nome", SliceValue::text(&self.nome));
                }
                _ => {
                    require("cidade", &self.cidade)?;
                    draft.update_slice("geral", SliceValue::Json(json!({ "cidade": self.cidade })));
                }
            }
            Ok(())
        }

        fn receive(&mut self, record: &Value) {
            self.nome = record["nome"].as_str().unwrap_or_default().to_string();
        }
    }

    #[test]
    fn test_next_blocked_when_validation_fails() {
        let mut wizard = FormOrchestrator::<Demo>::new();

        assert!(!wizard.next_step());
        assert_eq!(wizard.step().current(), 1);
        assert_eq!(wizard.error(), Some("O campo nome é obrigatório"));
        assert!(wizard.take_scroll_request());
        assert!(!wizard.take_scroll_request());
        assert!(!wizard.draft().is_populated("nome"));
    }

    #[test]
    fn test_next_commits_slice_and_clears_error() {
        let mut wizard = FormOrchestrator::<Demo>::new();
        assert!(!wizard.next_step());

        wizard.forms.nome = "Ana".to_string();
        assert!(wizard.next_step());
        assert_eq!(wizard.step().current(), 2);
        assert_eq!(wizard.error(), None);
        assert_eq!(wizard.draft().get("nome"), Some(&SliceValue::Text("Ana".to_string())));
    }

    #[test]
    fn test_prev_step_keeps_draft() {
        let mut wizard = FormOrchestrator::<Demo>::new();
        wizard.forms.nome = "Ana".to_string();
        wizard.next_step();

        assert!(wizard.prev_step());
        assert!(!wizard.prev_step());
        assert!(wizard.draft().is_populated("nome"));
    }

    #[test]
    fn test_prepare_submission_serializes_draft() {
        let mut wizard = FormOrchestrator::<Demo>::new();
        wizard.forms.nome = "Ana".to_string();
        wizard.forms.cidade = "Campinas".to_string();
        wizard.next_step();

        let submission = wizard.prepare_submission().unwrap();
        assert_eq!(submission.resource, "demos");
        match submission.body {
            SubmissionBody::Multipart(parts) => {
                let names: Vec<_> = parts.iter().map(PayloadPart::name).collect();
                assert_eq!(names, vec!["nome", "geral"]);
            }
            other => panic!("unexpected body {other:?}"),
        }
        assert!(wizard.is_submitting());
    }

    #[test]
    fn test_second_submit_refused_while_in_flight() {
        let mut wizard = FormOrchestrator::<Demo>::new();
        wizard.forms.nome = "Ana".to_string();
        wizard.forms.cidade = "Campinas".to_string();
        wizard.next_step();

        wizard.prepare_submission().unwrap();
        assert!(matches!(wizard.prepare_submission(), Err(AppError::SubmitInFlight)));

        // A failure releases the guard and keeps the draft for a retry
        wizard.finish_submission(&Err(AppError::Api {
            status: 400,
            message: "erro".to_string(),
        }));
        assert!(matches!(wizard.submit_state(), SubmitState::Failed(_)));
        assert!(wizard.draft().is_populated("geral"));
        assert!(wizard.prepare_submission().is_ok());
    }

    #[test]
    fn test_invalid_last_step_blocks_submission() {
        let mut wizard = FormOrchestrator::<Demo>::new();
        wizard.forms.nome = "Ana".to_string();
        wizard.next_step();

        assert!(matches!(wizard.prepare_submission(), Err(AppError::Validation(_))));
        assert_eq!(wizard.submit_state(), &SubmitState::Idle);
        assert_eq!(wizard.error(), Some("O campo cidade é obrigatório"));
    }

    #[test]
    fn test_from_record_prefills_forms() {
        let wizard = FormOrchestrator::<Demo>::from_record(&json!({ "nome": "Bia" }));
        assert_eq!(wizard.forms.nome, "Bia");
        assert_eq!(wizard.step().current(), 1);
    }
}
