//! Signed-in account, held in memory for the lifetime of the app.

use crate::models::{LoginResponse, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub role: Role,
    pub unidade_id: Option<i32>,
}

impl From<LoginResponse> for Session {
    fn from(login: LoginResponse) -> Self {
        Self {
            id: login.id,
            nome: login.nome,
            email: login.email,
            role: login.role,
            unidade_id: login.unidade_id,
        }
    }
}

/// The one place role and account id are read from.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: Option<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any previous session.
    pub fn login(&mut self, session: Session) {
        tracing::info!("{} {} signed in", session.role, session.id);
        self.current = Some(session);
    }

    /// End the session. Returns the one that was active.
    pub fn logout(&mut self) -> Option<Session> {
        let previous = self.current.take();
        if let Some(session) = &previous {
            tracing::info!("{} {} signed out", session.role, session.id);
        }
        previous
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.current.as_ref().map(|s| s.role)
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session {
            id: 4,
            nome: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role,
            unidade_id: Some(1),
        }
    }

    #[test]
    fn test_login_logout() {
        let mut store = SessionStore::new();
        assert!(store.current().is_none());

        store.login(session(Role::Colaborador));
        assert_eq!(store.role(), Some(Role::Colaborador));

        store.login(session(Role::Gerente));
        assert_eq!(store.role(), Some(Role::Gerente));

        assert_eq!(store.logout().map(|s| s.role), Some(Role::Gerente));
        assert!(!store.is_signed_in());
        assert!(store.logout().is_none());
    }

    #[test]
    fn test_from_login_response() {
        let login = LoginResponse {
            id: 9,
            nome: "Bia".to_string(),
            email: "bia@example.com".to_string(),
            role: Role::Paciente,
            unidade_id: None,
        };
        let session = Session::from(login);
        assert_eq!(session.id, 9);
        assert_eq!(session.role, Role::Paciente);
    }
}
