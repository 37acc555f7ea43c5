//! Identity and login fields shared by the first step of every person wizard.

use serde_json::Value;

use super::draft::{RegistrationDraft, SliceValue};
use super::validation::{ValidationError, check_email, check_password, parse_unidade_id, require};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialsForm {
    pub nome: String,
    pub rg: String,
    pub cpf: String,
    pub email: String,
    pub email_confirm: String,
    pub password: String,
    pub password_confirm: String,
    /// Free-text unit reference, numeric when set.
    pub unidade_id: String,
}

impl CredentialsForm {
    /// Validate and write `nome`, `rg`, `cpf`, `email`, `password` and `unidadeId`.
    pub fn commit(&self, draft: &mut RegistrationDraft) -> Result<(), ValidationError> {
        require("nome", &self.nome)?;
        let unidade = parse_unidade_id(&self.unidade_id)?;
        check_email(&self.email, &self.email_confirm)?;
        check_password(&self.password, &self.password_confirm)?;

        draft.update_slice("nome", SliceValue::text(&self.nome));
        draft.update_slice("rg", SliceValue::text(&self.rg));
        draft.update_slice("cpf", SliceValue::text(&self.cpf));
        draft.update_slice(
            "unidadeId",
            unidade.map_or(SliceValue::Empty, |id| SliceValue::Text(id.to_string())),
        );
        draft.update_slice("email", SliceValue::text(&self.email));
        draft.update_slice("password", SliceValue::Text(self.password.clone()));
        Ok(())
    }

    /// Fill from a fetched record. Passwords are never part of a record.
    pub fn receive(&mut self, record: &Value) {
        let text = |key: &str| record[key].as_str().unwrap_or_default().to_string();
        self.nome = text("nome");
        self.rg = text("rg");
        self.cpf = text("cpf");
        self.email = text("email");
        self.email_confirm = self.email.clone();
        self.unidade_id = record["unidadeId"]
            .as_i64()
            .map(|id| id.to_string())
            .unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled() -> CredentialsForm {
        CredentialsForm {
            nome: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            email_confirm: "ana@example.com".to_string(),
            password: "segredo123".to_string(),
            password_confirm: "segredo123".to_string(),
            unidade_id: "3".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_commit_writes_login_fields() {
        let mut draft = RegistrationDraft::new();
        filled().commit(&mut draft).unwrap();

        assert_eq!(draft.get("email"), Some(&SliceValue::Text("ana@example.com".to_string())));
        assert_eq!(draft.get("unidadeId"), Some(&SliceValue::Text("3".to_string())));
        assert!(!draft.is_populated("rg"));
    }

    #[test]
    fn test_commit_rejects_bad_credentials() {
        let mut draft = RegistrationDraft::new();

        let mut form = filled();
        form.password_confirm = "outra-senha".to_string();
        assert_eq!(form.commit(&mut draft), Err(ValidationError::PasswordMismatch));

        let mut form = filled();
        form.password = "curta".to_string();
        form.password_confirm = "curta".to_string();
        assert_eq!(form.commit(&mut draft), Err(ValidationError::PasswordTooShort));

        let mut form = filled();
        form.unidade_id = "três".to_string();
        assert!(matches!(form.commit(&mut draft), Err(ValidationError::InvalidNumber(_))));

        assert!(draft.populated().next().is_none());
    }

    #[test]
    fn test_receive() {
        let mut form = CredentialsForm::default();
        form.receive(&json!({ "nome": "Ana", "email": "ana@example.com", "unidadeId": 2 }));

        assert_eq!(form.nome, "Ana");
        assert_eq!(form.email_confirm, "ana@example.com");
        assert_eq!(form.unidade_id, "2");
        assert!(form.password.is_empty());
    }
}
