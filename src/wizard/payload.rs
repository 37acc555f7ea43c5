//! Draft serialization: one serializer for every entity, driven by a
//! field-to-kind table.

use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use tracing::warn;

use super::draft::{Attachment, RegistrationDraft, SliceValue};
use crate::error::Result;

/// How a draft field travels in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain text part.
    Text,
    /// Structured slice, sent JSON-stringified.
    Json,
    /// Raw binary file part.
    File,
}

/// Ordered field table for one entity.
pub type FieldTable = &'static [(&'static str, FieldKind)];

/// One part of an outgoing multipart payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadPart {
    Text { name: String, value: String },
    File { name: String, attachment: Attachment },
}

impl PayloadPart {
    pub fn name(&self) -> &str {
        match self {
            PayloadPart::Text { name, .. } | PayloadPart::File { name, .. } => name,
        }
    }
}

/// Collect every populated field of `draft` listed in `fields`, once each,
/// in table order. Empty and null slices are left out.
pub fn build_parts(draft: &RegistrationDraft, fields: FieldTable) -> Vec<PayloadPart> {
    let mut parts = Vec::with_capacity(fields.len());

    for &(name, kind) in fields {
        let Some(value) = draft.get(name).filter(|v| !v.is_empty()) else {
            continue;
        };

        let part = match (kind, value) {
            (FieldKind::Text, SliceValue::Text(text)) => PayloadPart::Text {
                name: name.to_string(),
                value: text.clone(),
            },
            (FieldKind::Text, SliceValue::Json(Value::String(text))) => PayloadPart::Text {
                name: name.to_string(),
                value: text.clone(),
            },
            (FieldKind::Json, SliceValue::Json(json)) => PayloadPart::Text {
                name: name.to_string(),
                value: json.to_string(),
            },
            (FieldKind::File, SliceValue::File(attachment)) => PayloadPart::File {
                name: name.to_string(),
                attachment: attachment.clone(),
            },
            (kind, _) => {
                warn!("Draft field {name} does not hold a {kind:?} value, skipped");
                continue;
            }
        };
        parts.push(part);
    }

    parts
}

/// JSON object body for endpoints that take plain JSON. Files are not allowed there.
pub fn build_json(draft: &RegistrationDraft, fields: FieldTable) -> Value {
    let mut body = Map::new();

    for part in build_parts(draft, fields) {
        match part {
            PayloadPart::Text { name, value } => {
                let is_json = fields.iter().any(|&(n, k)| n == name && k == FieldKind::Json);
                let value = if is_json {
                    serde_json::from_str(&value).unwrap_or(Value::String(value))
                } else {
                    Value::String(value)
                };
                body.insert(name, value);
            }
            PayloadPart::File { name, .. } => {
                warn!("File field {name} cannot be sent in a JSON body, skipped");
            }
        }
    }

    Value::Object(body)
}

/// Convert parts into a reqwest multipart form.
pub fn into_form(parts: Vec<PayloadPart>) -> Result<Form> {
    let mut form = Form::new();

    for part in parts {
        form = match part {
            PayloadPart::Text { name, value } => form.text(name, value),
            PayloadPart::File { name, attachment } => {
                let file = Part::bytes(attachment.bytes)
                    .file_name(attachment.file_name)
                    .mime_str(&attachment.mime)?;
                form.part(name, file)
            }
        };
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: FieldTable = &[
        ("nome", FieldKind::Text),
        ("email", FieldKind::Text),
        ("geral", FieldKind::Json),
        ("pai", FieldKind::Json),
        ("fotofile", FieldKind::File),
        ("laudofile", FieldKind::File),
    ];

    fn populated_draft() -> RegistrationDraft {
        let mut draft = RegistrationDraft::new();
        draft.update_slice("nome", SliceValue::text("Ana"));
        draft.update_slice("email", SliceValue::text("ana@example.com"));
        draft.update_slice("geral", SliceValue::Json(json!({ "telefone": "1234" })));
        draft.update_slice("pai", SliceValue::Json(Value::Null));
        draft.update_slice("fotofile", SliceValue::File(Attachment::new("foto.png", vec![1, 2])));
        draft
    }

    #[test]
    fn test_every_populated_field_exactly_once() {
        let parts = build_parts(&populated_draft(), FIELDS);
        let names: Vec<_> = parts.iter().map(PayloadPart::name).collect();

        assert_eq!(names, vec!["nome", "email", "geral", "fotofile"]);
    }

    #[test]
    fn test_null_and_missing_fields_omitted() {
        let parts = build_parts(&populated_draft(), FIELDS);
        assert!(parts.iter().all(|p| p.name() != "pai"));
        assert!(parts.iter().all(|p| p.name() != "laudofile"));
    }

    #[test]
    fn test_json_slices_are_stringified() {
        let parts = build_parts(&populated_draft(), FIELDS);
        let geral = parts.iter().find(|p| p.name() == "geral").unwrap();
        match geral {
            PayloadPart::Text { value, .. } => {
                let parsed: Value = serde_json::from_str(value).unwrap();
                assert_eq!(parsed, json!({ "telefone": "1234" }));
            }
            other => panic!("unexpected part {other:?}"),
        }
    }

    #[test]
    fn test_fields_outside_table_ignored() {
        let mut draft = populated_draft();
        draft.update_slice("confirmEmail", SliceValue::text("ana@example.com"));
        let parts = build_parts(&draft, FIELDS);
        assert!(parts.iter().all(|p| p.name() != "confirmEmail"));
    }

    #[test]
    fn test_mismatched_kind_skipped() {
        let mut draft = RegistrationDraft::new();
        draft.update_slice("fotofile", SliceValue::text("not-a-file"));
        assert!(build_parts(&draft, FIELDS).is_empty());
    }

    #[test]
    fn test_build_json_body() {
        let body = build_json(&populated_draft(), FIELDS);
        assert_eq!(
            body,
            json!({
                "nome": "Ana",
                "email": "ana@example.com",
                "geral": { "telefone": "1234" }
            })
        );
    }

    #[test]
    fn test_into_form_accepts_all_parts() {
        let parts = build_parts(&populated_draft(), FIELDS);
        assert!(into_form(parts).is_ok());
    }
}
