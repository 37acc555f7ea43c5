//! HTTP client for the Atipicidades backend.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{AppError, Result};
use crate::models::{
    ChangePasswordRequest, LoginRequest, LoginResponse, PacienteResumo, PasswordResetRequest, Role, Section,
    Unidade,
};
use crate::wizard::orchestrator::{Submission, SubmissionBody};
use crate::wizard::payload::into_form;

/// Backend API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. "http://localhost:3001").
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.api_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{base}/{path}", base = self.base_url, path = path.trim_start_matches('/'))
    }

    /// POST a serialized registration draft to `/<resource>/`.
    pub async fn submit(&self, submission: Submission) -> Result<Value> {
        let url = self.url(&format!("{}/", submission.resource));
        debug!("Submitting to {url}");

        let request = match submission.body {
            SubmissionBody::Multipart(parts) => self.client.post(&url).multipart(into_form(parts)?),
            SubmissionBody::Json(body) => self.client.post(&url).json(&body),
        };

        read_json(request.send().await?).await
    }

    /// Fetch one record by id: `GET /<role>/id/{id}`.
    ///
    /// Managers come back wrapped as `{ gerente: ... }`; the wrapper is removed.
    pub async fn get_record(&self, role: Role, id: i32) -> Result<Value> {
        let url = self.url(&format!("{}/id/{id}", role.api_segment()));
        let mut record: Value = read_json(self.client.get(&url).send().await?).await?;

        if let Some(inner) = record.get_mut("gerente") {
            record = inner.take();
        }
        Ok(record)
    }

    /// Profile of the signed-in account.
    pub async fn fetch_profile(&self, role: Role, id: i32) -> Result<Value> {
        self.get_record(role, id).await
    }

    /// `PUT /pacientes/put<section>` with `{ id, <section>: value }`.
    pub async fn put_section(&self, section: Section, id: i32, value: &Value) -> Result<Value> {
        let url = self.url(&format!("pacientes/{}", section.route()));
        let mut body = json!({ "id": id });
        body[section.key()] = value.clone();

        read_json(self.client.put(&url).json(&body).send().await?).await
    }

    /// Flip the review flag of a patient. Returns the new value.
    pub async fn toggle_analise(&self, id: i32) -> Result<bool> {
        let url = self.url("pacientes/putanalise");
        let body: Value = read_json(self.client.put(&url).json(&json!({ "id": id })).send().await?).await?;

        body["analise"]
            .as_bool()
            .ok_or_else(|| AppError::parse("Resposta sem campo analise"))
    }

    pub async fn login(&self, role: Role, email: &str, password: &str) -> Result<LoginResponse> {
        let url = self.url(&format!("{}/login", role.api_segment()));
        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let response = self.client.post(&url).json(&body).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AppError::auth(error_message(response).await));
        }
        read_json(response).await
    }

    pub async fn change_password(&self, role: Role, id: i32, old_password: &str, new_password: &str) -> Result<()> {
        let url = self.url(&format!("{}/id/{id}/changePassword", role.api_segment()));
        let body = ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };

        let response = self.client.post(&url).json(&body).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AppError::auth(error_message(response).await));
        }
        read_json::<Value>(response).await.map(|_| ())
    }

    /// Ask for a reset token. Returns the backend's message.
    pub async fn request_password_reset(&self, role: Role, email: &str) -> Result<String> {
        let url = self.url(&format!("{}/senha", role.api_segment()));
        let body = PasswordResetRequest {
            email: email.trim().to_string(),
        };

        let reply: Value = self.post_json(&url, &body).await?;
        Ok(reply["message"].as_str().unwrap_or_default().to_string())
    }

    /// All units. An empty list comes back as 204.
    pub async fn list_unidades(&self) -> Result<Vec<Unidade>> {
        self.list("unidades/getall", "unidades").await
    }

    pub async fn get_unidade(&self, id: i32) -> Result<Unidade> {
        let url = self.url(&format!("unidades/getUnidadeById/{id}"));
        read_json(self.client.get(&url).send().await?).await
    }

    pub async fn delete_unidade(&self, id: i32) -> Result<()> {
        let url = self.url(&format!("unidades/{id}"));
        read_json::<Value>(self.client.delete(&url).send().await?).await.map(|_| ())
    }

    pub async fn list_pacientes(&self) -> Result<Vec<PacienteResumo>> {
        self.list("pacientes/getall", "pacientes").await
    }

    /// Raw bytes of a stored upload.
    pub async fn fetch_image(&self, name: &str) -> Result<Vec<u8>> {
        let url = self.url(&format!("imagens/{name}"));
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(AppError::Api {
                status,
                message: error_message(response).await,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// GET a list endpoint answering `{ error, <key>: [...] }`, or 204 when empty.
    async fn list<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<Vec<T>> {
        let response = self.client.get(self.url(path)).send().await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let mut body: Value = read_json(response).await?;
        match body.get_mut(key) {
            Some(items) => Ok(serde_json::from_value(items.take())?),
            None => Err(AppError::parse(format!("Resposta sem campo {key}"))),
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
        read_json(self.client.post(url).json(body).send().await?).await
    }
}

/// Decode a success body, or turn the backend's `{ error }` body into an error.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(AppError::not_found(error_message(response).await));
    }
    if !status.is_success() {
        let message = error_message(response).await;
        warn!("API request failed ({status}): {message}");
        return Err(AppError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

/// Message from an error body, falling back to the status text.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    extract_error(&text).unwrap_or_else(|| status.canonical_reason().unwrap_or("Erro desconhecido").to_string())
}

fn extract_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("http://localhost:3001/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001");
        assert_eq!(client.url("/unidades/getall"), "http://localhost:3001/unidades/getall");
        assert_eq!(client.url("pacientes/"), "http://localhost:3001/pacientes/");
    }

    #[test]
    fn test_extract_error() {
        assert_eq!(extract_error(r#"{"error":"Email já cadastrado"}"#).as_deref(), Some("Email já cadastrado"));
        assert_eq!(
            extract_error(r#"{"error":true,"message":"Nenhuma unidade"}"#).as_deref(),
            Some("Nenhuma unidade")
        );
        assert_eq!(extract_error("<html>"), None);
    }

    mod backend {
        use super::*;
        use crate::server::{AppState, router};
        use crate::storage::UploadStore;
        use crate::wizard::paciente::save_sections;
        use crate::wizard::{Attachment, FormOrchestrator, PacienteForms, SubmitState, UnidadeForm};
        use chrono::NaiveDate;

        /// Serve the real router on an ephemeral port.
        async fn spawn_backend() -> (ApiClient, tempfile::TempDir) {
            let conn = crate::db::connect("sqlite::memory:").await.unwrap();
            crate::db::ensure_schema(&conn).await.unwrap();
            let uploads = tempfile::tempdir().unwrap();
            let app = router(AppState::new(conn, UploadStore::new(uploads.path())));

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

            let client = ApiClient::new(&format!("http://{addr}"), Duration::from_secs(10)).unwrap();
            (client, uploads)
        }

        fn filled_paciente() -> FormOrchestrator<PacienteForms> {
            let mut wizard = FormOrchestrator::<PacienteForms>::new();
            let forms = &mut wizard.forms;
            forms.credentials.nome = "Lia".to_string();
            forms.credentials.email = "lia@example.com".to_string();
            forms.credentials.email_confirm = "lia@example.com".to_string();
            forms.credentials.password = "segredo123".to_string();
            forms.credentials.password_confirm = "segredo123".to_string();
            forms.geral.nascimento = NaiveDate::from_ymd_opt(2016, 5, 1);
            forms.geral.telefone = "11 4000-1000".to_string();
            forms.escola.nome_escola = "EMEF Norte".to_string();
            forms.mae.nome = "Rosa".to_string();
            forms.saude.diagnostico = "TDAH".to_string();
            forms.documentos.foto = Some(Attachment::new("lia.png", b"png-bytes".to_vec()));
            while !wizard.step().is_last() {
                assert!(wizard.next_step(), "{:?}", wizard.error());
            }
            wizard
        }

        #[tokio::test]
        async fn test_paciente_wizard_round_trip() {
            let (client, _uploads) = spawn_backend().await;

            let mut wizard = filled_paciente();
            let created = wizard.submit(&client).await.unwrap();
            assert!(matches!(wizard.submit_state(), SubmitState::Succeeded(_)));
            let id = created["id"].as_i64().unwrap() as i32;

            let session = client.login(Role::Paciente, "lia@example.com", "segredo123").await.unwrap();
            assert_eq!(session.id, id);
            assert!(matches!(
                client.login(Role::Paciente, "lia@example.com", "errada123").await,
                Err(AppError::Auth(_))
            ));

            let record = client.fetch_profile(Role::Paciente, id).await.unwrap();
            let foto = record["foto"].as_str().unwrap().to_string();
            assert_eq!(client.fetch_image(&foto).await.unwrap(), b"png-bytes");

            // Edit flow: prefill, change the school, save section by section
            let mut edit = FormOrchestrator::<PacienteForms>::from_record(&record);
            edit.forms.escola.serie = "2º ano".to_string();
            while !edit.step().is_last() {
                assert!(edit.next_step(), "{:?}", edit.error());
            }
            edit.prepare_submission().unwrap();
            let saved = save_sections(&client, id, edit.draft()).await.unwrap();
            assert_eq!(saved, 5);

            let record = client.get_record(Role::Paciente, id).await.unwrap();
            assert_eq!(record["escola"]["serie"], "2º ano");

            assert!(client.toggle_analise(id).await.unwrap());
            let listed = client.list_pacientes().await.unwrap();
            assert_eq!(listed.len(), 1);
            assert!(listed[0].analise);
        }

        #[tokio::test]
        async fn test_unidades_and_missing_records() {
            let (client, _uploads) = spawn_backend().await;
            assert!(client.list_unidades().await.unwrap().is_empty());

            let mut wizard = FormOrchestrator::<UnidadeForm>::new();
            wizard.forms.nome = "Sede".to_string();
            wizard.forms.endereco = "Rua A, 1".to_string();
            let created = wizard.submit(&client).await.unwrap();
            let id = created["id"].as_i64().unwrap() as i32;

            assert_eq!(client.get_unidade(id).await.unwrap().nome, "Sede");
            assert_eq!(client.list_unidades().await.unwrap().len(), 1);
            assert!(matches!(client.get_unidade(id + 100).await, Err(AppError::NotFound(_))));
            assert!(matches!(
                client.get_record(Role::Gerente, 42).await,
                Err(AppError::NotFound(_))
            ));

            client.delete_unidade(id).await.unwrap();
            assert!(client.list_unidades().await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_duplicate_email_is_reported() {
            let (client, _uploads) = spawn_backend().await;
            filled_paciente().submit(&client).await.unwrap();

            let mut again = filled_paciente();
            let result = again.submit(&client).await;
            assert!(matches!(result, Err(AppError::Api { status: 400, .. })));
            assert!(matches!(again.submit_state(), SubmitState::Failed(_)));
        }
    }
}
