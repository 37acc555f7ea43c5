//! Role-aware navigation: which screens a role may open, and the profile
//! header shown above them.

use serde_json::Value;

use crate::models::Role;
use crate::session::Session;

/// Screens reachable from the navbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Home,
    Unidades,
    NovaUnidade,
    NovoGerente,
    NovoColaborador,
    NovoPaciente,
    Pacientes,
    /// A patient editing their own record.
    MeusDados,
    AlterarSenha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub destination: Destination,
}

const fn link(label: &'static str, destination: Destination) -> NavLink {
    NavLink { label, destination }
}

const GERENTE_LINKS: &[NavLink] = &[
    link("Início", Destination::Home),
    link("Unidades", Destination::Unidades),
    link("Nova unidade", Destination::NovaUnidade),
    link("Novo gerente", Destination::NovoGerente),
    link("Novo colaborador", Destination::NovoColaborador),
    link("Novo paciente", Destination::NovoPaciente),
    link("Pacientes", Destination::Pacientes),
    link("Alterar senha", Destination::AlterarSenha),
];

const COLABORADOR_LINKS: &[NavLink] = &[
    link("Início", Destination::Home),
    link("Novo paciente", Destination::NovoPaciente),
    link("Pacientes", Destination::Pacientes),
    link("Alterar senha", Destination::AlterarSenha),
];

const PACIENTE_LINKS: &[NavLink] = &[
    link("Início", Destination::Home),
    link("Meus dados", Destination::MeusDados),
    link("Alterar senha", Destination::AlterarSenha),
];

/// Navbar configuration for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleCapabilities {
    pub role: Role,
    pub home_label: &'static str,
    pub links: &'static [NavLink],
}

impl RoleCapabilities {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Gerente => Self {
                role,
                home_label: "Painel do gerente",
                links: GERENTE_LINKS,
            },
            Role::Colaborador => Self {
                role,
                home_label: "Painel do colaborador",
                links: COLABORADOR_LINKS,
            },
            Role::Paciente => Self {
                role,
                home_label: "Área do paciente",
                links: PACIENTE_LINKS,
            },
        }
    }

    pub fn allows(&self, destination: Destination) -> bool {
        self.links.iter().any(|l| l.destination == destination)
    }
}

/// Display profile for the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub nome: String,
    pub email: String,
    /// Stored upload name, served from `/imagens`.
    pub foto: Option<String>,
}

impl Profile {
    pub fn from_record(record: &Value) -> Self {
        let text = |key: &str| record[key].as_str().unwrap_or_default().to_string();
        Self {
            nome: text("nome"),
            email: text("email"),
            foto: record["foto"].as_str().filter(|f| !f.is_empty()).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProfileState {
    #[default]
    Unknown,
    Loading,
    Loaded(Profile),
    Failed(String),
}

pub const PLACEHOLDER_NAME: &str = "Usuário";
pub const PLACEHOLDER_EMAIL: &str = "Perfil indisponível";

/// Navbar state: capabilities of the signed-in role plus its profile.
#[derive(Debug, Default)]
pub struct NavShell {
    capabilities: Option<RoleCapabilities>,
    account_id: Option<i32>,
    profile: ProfileState,
}

impl NavShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Role becomes known. Returns the `(role, id)` to fetch the profile for,
    /// only on the first call after a reset.
    pub fn start(&mut self, session: &Session) -> Option<(Role, i32)> {
        if self.profile != ProfileState::Unknown {
            return None;
        }
        self.capabilities = Some(RoleCapabilities::for_role(session.role));
        self.account_id = Some(session.id);
        self.profile = ProfileState::Loading;
        Some((session.role, session.id))
    }

    /// Outcome of the profile fetch for `(role, id)`. Ignored unless that
    /// account's fetch is the one pending.
    pub fn profile_fetched(&mut self, role: Role, id: i32, result: Result<Value, String>) -> bool {
        if self.profile != ProfileState::Loading || !self.is_current(role, id) {
            tracing::debug!("Dropping stale profile reply for {role} {id}");
            return false;
        }
        self.profile = match result {
            Ok(record) => ProfileState::Loaded(Profile::from_record(&record)),
            Err(e) => {
                tracing::warn!("Profile fetch failed: {e}");
                ProfileState::Failed(e)
            }
        };
        true
    }

    /// Whether `(role, id)` is the account the shell was started for.
    pub fn is_current(&self, role: Role, id: i32) -> bool {
        self.account_id == Some(id) && self.capabilities.as_ref().is_some_and(|c| c.role == role)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn capabilities(&self) -> Option<&RoleCapabilities> {
        self.capabilities.as_ref()
    }

    pub fn account_id(&self) -> Option<i32> {
        self.account_id
    }

    pub fn profile(&self) -> &ProfileState {
        &self.profile
    }

    /// Name and e-mail for the header, with placeholders when not loaded.
    pub fn header(&self) -> (&str, &str) {
        match &self.profile {
            ProfileState::Loaded(p) => (p.nome.as_str(), p.email.as_str()),
            ProfileState::Loading => ("Carregando...", ""),
            ProfileState::Unknown | ProfileState::Failed(_) => (PLACEHOLDER_NAME, PLACEHOLDER_EMAIL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(role: Role) -> Session {
        Session {
            id: 3,
            nome: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role,
            unidade_id: None,
        }
    }

    #[test]
    fn test_capabilities_per_role() {
        let gerente = RoleCapabilities::for_role(Role::Gerente);
        assert!(gerente.allows(Destination::NovaUnidade));
        assert!(gerente.allows(Destination::NovoGerente));

        let colaborador = RoleCapabilities::for_role(Role::Colaborador);
        assert!(colaborador.allows(Destination::NovoPaciente));
        assert!(!colaborador.allows(Destination::Unidades));

        let paciente = RoleCapabilities::for_role(Role::Paciente);
        assert!(paciente.allows(Destination::MeusDados));
        assert!(!paciente.allows(Destination::Pacientes));

        for role in Role::ALL {
            let caps = RoleCapabilities::for_role(role);
            assert_eq!(caps.links[0].destination, Destination::Home);
            assert!(caps.allows(Destination::AlterarSenha));
        }
    }

    #[test]
    fn test_profile_loaded() {
        let mut shell = NavShell::new();
        assert_eq!(shell.header(), (PLACEHOLDER_NAME, PLACEHOLDER_EMAIL));

        assert_eq!(shell.start(&session(Role::Paciente)), Some((Role::Paciente, 3)));
        assert_eq!(shell.profile(), &ProfileState::Loading);
        // Already loading: no second fetch
        assert_eq!(shell.start(&session(Role::Paciente)), None);

        assert!(shell.profile_fetched(
            Role::Paciente,
            3,
            Ok(json!({ "nome": "Ana", "email": "ana@example.com", "foto": "a.png" }))
        ));
        assert_eq!(shell.header(), ("Ana", "ana@example.com"));
        match shell.profile() {
            ProfileState::Loaded(p) => assert_eq!(p.foto.as_deref(), Some("a.png")),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_profile_failure_shows_placeholder_without_retry() {
        let mut shell = NavShell::new();
        shell.start(&session(Role::Gerente));
        shell.profile_fetched(Role::Gerente, 3, Err("timeout".to_string()));

        assert!(matches!(shell.profile(), ProfileState::Failed(_)));
        assert_eq!(shell.header(), (PLACEHOLDER_NAME, PLACEHOLDER_EMAIL));
        assert_eq!(shell.start(&session(Role::Gerente)), None);

        // A late result does not revive a failed state
        assert!(!shell.profile_fetched(Role::Gerente, 3, Ok(json!({ "nome": "Tarde" }))));
        assert!(matches!(shell.profile(), ProfileState::Failed(_)));
    }

    #[test]
    fn test_reset_allows_new_session() {
        let mut shell = NavShell::new();
        shell.start(&session(Role::Gerente));
        shell.reset();
        assert!(shell.capabilities().is_none());
        assert_eq!(shell.start(&session(Role::Colaborador)).map(|(r, _)| r), Some(Role::Colaborador));
    }

    #[test]
    fn test_reply_for_previous_account_is_dropped() {
        let mut shell = NavShell::new();
        let gerente = Session {
            id: 9,
            ..session(Role::Gerente)
        };
        shell.start(&gerente);
        shell.reset();
        shell.start(&session(Role::Paciente));

        let late = json!({ "nome": "Gerente Antigo", "email": "g@x.com" });
        assert!(!shell.profile_fetched(Role::Gerente, 9, Ok(late)));
        assert_eq!(shell.profile(), &ProfileState::Loading);

        // Same id under another role is another account
        assert!(!shell.profile_fetched(Role::Gerente, 3, Ok(json!({ "nome": "Outro" }))));

        assert!(shell.profile_fetched(
            Role::Paciente,
            3,
            Ok(json!({ "nome": "Ana", "email": "ana@example.com" }))
        ));
        assert_eq!(shell.header(), ("Ana", "ana@example.com"));
    }
}
