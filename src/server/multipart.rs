//! Multipart intake for the create endpoints.

use std::collections::HashMap;

use axum::extract::Multipart;
use serde_json::Value;
use tracing::warn;

use super::error::{ApiError, ApiResult};
use crate::storage::UploadStore;

/// One uploaded file part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A fully read multipart body: text parts and file parts by field name.
#[derive(Debug, Default)]
pub struct MultipartForm {
    texts: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Drain the request body. Empty file parts are dropped.
    pub async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Multipart inválido: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Falha ao ler arquivo {name}: {e}")))?;
                    if !bytes.is_empty() {
                        form.files.insert(
                            name,
                            UploadedFile {
                                file_name,
                                bytes: bytes.to_vec(),
                            },
                        );
                    }
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Falha ao ler campo {name}: {e}")))?;
                    form.texts.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Text part, trimmed; `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<String> {
        self.texts
            .get(name)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Text part that must be present.
    pub fn required(&self, name: &str) -> ApiResult<String> {
        self.text(name)
            .ok_or_else(|| ApiError::bad_request(format!("Campo obrigatório ausente: {name}")))
    }

    /// Text part exactly as sent. Passwords keep their surrounding spaces.
    pub fn raw(&self, name: &str) -> ApiResult<String> {
        self.texts
            .get(name)
            .filter(|s| !s.is_empty())
            .cloned()
            .ok_or_else(|| ApiError::bad_request(format!("Campo obrigatório ausente: {name}")))
    }

    /// JSON-stringified part.
    pub fn json(&self, name: &str) -> ApiResult<Option<Value>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => {
                let value: Value = serde_json::from_str(&raw)
                    .map_err(|e| ApiError::bad_request(format!("JSON inválido em {name}: {e}")))?;
                Ok(Some(value).filter(|v| !v.is_null()))
            }
        }
    }

    /// Unit reference, parsed from its text form.
    pub fn unidade_id(&self) -> ApiResult<Option<i32>> {
        match self.text("unidadeId") {
            None => Ok(None),
            Some(raw) => raw
                .parse::<i32>()
                .map(Some)
                .map_err(|_| ApiError::bad_request(format!("unidadeId inválido: {raw}"))),
        }
    }

    /// Persist a file part, returning its stored name.
    pub async fn store_file(&self, name: &str, uploads: &UploadStore) -> ApiResult<Option<String>> {
        match self.files.get(name) {
            None => Ok(None),
            Some(file) => Ok(Some(uploads.save(&file.file_name, &file.bytes).await?)),
        }
    }

    /// Persist every listed file part. Nothing stays on disk if one of them fails.
    pub async fn store_files(&self, fields: &[&str], uploads: &UploadStore) -> ApiResult<StoredFiles> {
        let mut stored = StoredFiles::default();
        for &field in fields {
            match self.store_file(field, uploads).await {
                Ok(Some(name)) => {
                    stored.names.insert(field.to_string(), name);
                }
                Ok(None) => {}
                Err(e) => {
                    stored.discard(uploads).await;
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }
}

/// Stored names of the files saved for one request, by field name.
#[derive(Debug, Default)]
pub struct StoredFiles {
    names: HashMap<String, String>,
}

impl StoredFiles {
    pub fn get(&self, field: &str) -> Option<String> {
        self.names.get(field).cloned()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Remove the files again after the record could not be written.
    pub async fn discard(self, uploads: &UploadStore) {
        for name in self.names.into_values() {
            if let Err(e) = uploads.remove(&name).await {
                warn!("Failed to remove orphaned upload {name}: {e}");
            }
        }
    }
}

/// Section payloads may arrive as a JSON object or as a JSON-stringified object.
pub fn unwrap_stringified(value: Value) -> Value {
    match value {
        Value::String(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_stringified() {
        assert_eq!(unwrap_stringified(json!("{\"a\":1}")), json!({ "a": 1 }));
        assert_eq!(unwrap_stringified(json!({ "a": 1 })), json!({ "a": 1 }));
        assert_eq!(unwrap_stringified(json!("texto")), json!("texto"));
    }

    #[test]
    fn test_text_accessors() {
        let mut form = MultipartForm::default();
        form.texts.insert("nome".into(), "  Ana  ".into());
        form.texts.insert("vazio".into(), "   ".into());
        form.texts.insert("unidadeId".into(), "x1".into());
        form.texts.insert("geral".into(), "null".into());

        assert_eq!(form.text("nome").as_deref(), Some("Ana"));
        assert_eq!(form.text("vazio"), None);
        assert!(form.required("email").is_err());
        assert!(form.unidade_id().is_err());
        assert_eq!(form.json("geral").unwrap(), None);
    }

    #[test]
    fn test_raw_keeps_spaces() {
        let mut form = MultipartForm::default();
        form.texts.insert("password".into(), " segredo123 ".into());
        form.texts.insert("vazio".into(), String::new());

        assert_eq!(form.raw("password").unwrap(), " segredo123 ");
        assert_eq!(form.text("password").as_deref(), Some("segredo123"));
        assert!(form.raw("vazio").is_err());
        assert!(form.raw("ausente").is_err());
    }

    #[tokio::test]
    async fn test_discarded_files_leave_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadStore::new(dir.path());

        let mut form = MultipartForm::default();
        for field in ["fotofile", "laudofile"] {
            form.files.insert(
                field.into(),
                UploadedFile {
                    file_name: format!("{field}.png"),
                    bytes: b"bytes".to_vec(),
                },
            );
        }

        let stored = form.store_files(&["fotofile", "laudofile", "rgdocfile"], &uploads).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.get("rgdocfile").is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);

        stored.discard(&uploads).await;
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
