//! Multi-step registration wizards.
//!
//! Each step form validates its own fields and commits whole slices into a
//! [`RegistrationDraft`]. The [`FormOrchestrator`] gates step changes on that
//! validation and serializes the draft once on submit.

pub mod colaborador;
pub mod credentials;
pub mod draft;
pub mod gerente;
pub mod orchestrator;
pub mod paciente;
pub mod payload;
pub mod unidade;
pub mod validation;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use colaborador::ColaboradorForms;
pub use draft::{Attachment, RegistrationDraft, SliceValue, StepIndex};
pub use gerente::GerenteForms;
pub use orchestrator::{Encoding, FormOrchestrator, Registration, SubmitState, Submission, SubmissionBody};
pub use paciente::PacienteForms;
pub use unidade::UnidadeForm;
pub use validation::ValidationError;

/// Typed slice from a record field. Accepts an object or a stringified object;
/// anything unreadable yields the empty slice.
pub(crate) fn slice_from<T: DeserializeOwned + Default>(value: &Value) -> T {
    let parsed = match value {
        Value::String(raw) => serde_json::from_str(raw),
        Value::Null => return T::default(),
        other => serde_json::from_value(other.clone()),
    };
    parsed.unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable record slice: {e}");
        T::default()
    })
}
