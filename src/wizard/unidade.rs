//! Unit registration: a single step sent as JSON.

use serde_json::Value;

use super::draft::{RegistrationDraft, SliceValue};
use super::orchestrator::{Encoding, Registration};
use super::payload::{FieldKind, FieldTable};
use super::validation::{ValidationError, require};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnidadeForm {
    pub nome: String,
    pub endereco: String,
}

impl Registration for UnidadeForm {
    const RESOURCE: &'static str = "unidades";
    const FIELDS: FieldTable = &[("nome", FieldKind::Text), ("endereco", FieldKind::Text)];
    const ENCODING: Encoding = Encoding::Json;

    fn step_count(&self) -> usize {
        1
    }

    fn step_title(&self, _step: usize) -> &'static str {
        "Nova unidade"
    }

    fn commit_step(&self, _step: usize, draft: &mut RegistrationDraft) -> Result<(), ValidationError> {
        require("nome", &self.nome)?;
        require("endereço", &self.endereco)?;
        draft.update_slice("nome", SliceValue::text(&self.nome));
        draft.update_slice("endereco", SliceValue::text(&self.endereco));
        Ok(())
    }

    fn receive(&mut self, record: &Value) {
        self.nome = record["nome"].as_str().unwrap_or_default().to_string();
        self.endereco = record["endereco"].as_str().unwrap_or_default().to_string();
    }
}
