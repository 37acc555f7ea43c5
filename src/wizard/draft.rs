//! Registration draft and step position.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::validation::ValidationError;

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = crate::storage::content_type(&file_name).to_string();
        Self { file_name, mime, bytes }
    }

    /// Read a file from disk.
    pub fn from_path(path: &Path) -> Result<Self, ValidationError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("arquivo")
            .to_string();
        let bytes = std::fs::read(path).map_err(|_| ValidationError::Unreadable(file_name.clone()))?;
        Ok(Self::new(file_name, bytes))
    }
}

/// Value of one named slice.
#[derive(Debug, Clone, PartialEq)]
pub enum SliceValue {
    Empty,
    Text(String),
    Json(Value),
    File(Attachment),
}

impl SliceValue {
    /// Serialize a typed slice.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => SliceValue::Json(v),
            Err(e) => {
                tracing::error!("Failed to serialize slice: {e}");
                SliceValue::Empty
            }
        }
    }

    /// Blank text becomes `Empty`.
    pub fn text(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            SliceValue::Empty
        } else {
            SliceValue::Text(value.to_string())
        }
    }

    pub fn file(attachment: Option<&Attachment>) -> Self {
        attachment.cloned().map_or(SliceValue::Empty, SliceValue::File)
    }

    /// Nothing to send for this slice.
    pub fn is_empty(&self) -> bool {
        matches!(self, SliceValue::Empty | SliceValue::Json(Value::Null))
    }
}

/// The in-memory aggregate of everything entered so far.
///
/// Updates replace a whole named slice; nothing is merged field by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationDraft {
    slices: BTreeMap<String, SliceValue>,
}

impl RegistrationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `name` with `value`. No validation happens here.
    pub fn update_slice(&mut self, name: &str, value: SliceValue) {
        self.slices.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&SliceValue> {
        self.slices.get(name)
    }

    /// Slice is present and holds something to send.
    pub fn is_populated(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }

    /// Names of slices that hold something to send.
    pub fn populated(&self) -> impl Iterator<Item = &str> {
        self.slices
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, _)| k.as_str())
    }

    pub fn clear(&mut self) {
        self.slices.clear();
    }
}

/// Active step, 1-based, moved one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepIndex {
    current: usize,
    total: usize,
}

impl StepIndex {
    pub fn new(total: usize) -> Self {
        Self {
            current: 1,
            total: total.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }

    /// Advance by one. Returns false on the last step.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Go back by one. Returns false on the first step.
    pub fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_slice_is_idempotent() {
        let geral = SliceValue::Json(json!({ "telefone": "1234" }));

        let mut once = RegistrationDraft::new();
        once.update_slice("geral", geral.clone());

        let mut twice = RegistrationDraft::new();
        twice.update_slice("geral", geral.clone());
        twice.update_slice("geral", geral);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_update_replaces_whole_slice() {
        let mut draft = RegistrationDraft::new();
        draft.update_slice("geral", SliceValue::Json(json!({ "telefone": "1", "cidade": "X" })));
        draft.update_slice("geral", SliceValue::Json(json!({ "telefone": "2" })));

        assert_eq!(draft.get("geral"), Some(&SliceValue::Json(json!({ "telefone": "2" }))));
    }

    #[test]
    fn test_populated_skips_empty_values() {
        let mut draft = RegistrationDraft::new();
        draft.update_slice("nome", SliceValue::text("Ana"));
        draft.update_slice("rg", SliceValue::text("   "));
        draft.update_slice("pai", SliceValue::Json(Value::Null));
        draft.update_slice("fotofile", SliceValue::file(None));

        assert_eq!(draft.populated().collect::<Vec<_>>(), vec!["nome"]);
        assert!(draft.is_populated("nome"));
        assert!(!draft.is_populated("pai"));
        assert!(!draft.is_populated("inexistente"));
    }

    #[test]
    fn test_step_index_moves_one_at_a_time() {
        let mut step = StepIndex::new(3);
        assert_eq!(step.current(), 1);
        assert!(!step.prev());

        assert!(step.next());
        assert!(step.next());
        assert!(step.is_last());
        assert!(!step.next());
        assert_eq!(step.current(), 3);

        assert!(step.prev());
        assert_eq!(step.current(), 2);
    }

    #[test]
    fn test_attachment_mime_from_name() {
        let file = Attachment::new("laudo.pdf", vec![1, 2, 3]);
        assert_eq!(file.mime, "application/pdf");
    }
}
