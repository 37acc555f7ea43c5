//! Step-local field validation.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// A failed step check. The message is what the error banner shows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("O campo {0} é obrigatório")]
    Required(String),

    #[error("Email inválido")]
    InvalidEmail,

    #[error("Os emails não coincidem")]
    EmailMismatch,

    #[error("A senha deve ter pelo menos 8 caracteres")]
    PasswordTooShort,

    #[error("As senhas não coincidem")]
    PasswordMismatch,

    #[error("O campo {0} deve ser um número")]
    InvalidNumber(String),

    #[error("Não foi possível ler o arquivo {0}")]
    Unreadable(String),
}

/// Structural e-mail check: something@something.tld, no whitespace.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Fails when `value` is empty or whitespace only.
pub fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field.to_string()))
    } else {
        Ok(())
    }
}

/// Required e-mail with matching confirmation.
pub fn check_email(email: &str, confirmation: &str) -> Result<(), ValidationError> {
    require("email", email)?;
    if !validate_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if email.trim() != confirmation.trim() {
        return Err(ValidationError::EmailMismatch);
    }
    Ok(())
}

/// Required password of minimum length with matching confirmation.
pub fn check_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    require("senha", password)?;
    if !validate_password(password) {
        return Err(ValidationError::PasswordTooShort);
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Parse a unit reference typed as free text. Blank means "no unit".
pub fn parse_unidade_id(raw: &str) -> Result<Option<i32>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| ValidationError::InvalidNumber("unidade".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email(" user@example.com "));
        assert!(!validate_email("user@"));
        assert!(!validate_email("user@example"));
        assert!(!validate_email("us er@example.com"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_validate_password() {
        assert!(!validate_password("1234567"));
        assert!(validate_password("12345678"));
        // Length counts characters, not bytes
        assert!(!validate_password("çççççç"));
    }

    #[test]
    fn test_require() {
        assert_eq!(require("nome", "  "), Err(ValidationError::Required("nome".to_string())));
        assert!(require("nome", "Ana").is_ok());
    }

    #[test]
    fn test_check_email_and_password() {
        assert_eq!(check_email("a@b.com", "a@c.com"), Err(ValidationError::EmailMismatch));
        assert_eq!(check_email("a@", "a@"), Err(ValidationError::InvalidEmail));
        assert!(check_email("a@b.com", "a@b.com").is_ok());

        assert_eq!(check_password("1234567", "1234567"), Err(ValidationError::PasswordTooShort));
        assert_eq!(check_password("12345678", "12345679"), Err(ValidationError::PasswordMismatch));
        assert!(check_password("12345678", "12345678").is_ok());
    }

    #[test]
    fn test_parse_unidade_id() {
        assert_eq!(parse_unidade_id(""), Ok(None));
        assert_eq!(parse_unidade_id(" 12 "), Ok(Some(12)));
        assert!(parse_unidade_id("doze").is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::Required("nome".to_string()).to_string(),
            "O campo nome é obrigatório"
        );
        assert_eq!(
            ValidationError::PasswordTooShort.to_string(),
            "A senha deve ter pelo menos 8 caracteres"
        );
    }
}
