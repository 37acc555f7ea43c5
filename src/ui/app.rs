//! Application state and the async message loop.

use std::sync::Arc;

use eframe::egui::{self, Color32};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::components::colors;
use super::home_panel::{self, Photo};
use super::login_panel::{self, LoginAction, LoginForm};
use super::nav_bar::{self, NavEvent};
use super::pacientes_panel::{self, PacientesAction};
use super::password_panel::{self, PasswordAction, PasswordForm};
use super::unidades_panel::{self, UnidadesAction};
use super::{steps, wizard_panel, wizard_panel::WizardAction};
use crate::client::ApiClient;
use crate::error::{AppError, Result};
use crate::models::{LoginResponse, PacienteResumo, Role, Unidade};
use crate::nav::{Destination, NavShell, ProfileState};
use crate::session::{Session, SessionStore};
use crate::wizard::paciente::save_sections;
use crate::wizard::{ColaboradorForms, FormOrchestrator, GerenteForms, PacienteForms, UnidadeForm};

/// Which create wizard a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardKind {
    Paciente,
    Colaborador,
    Gerente,
    Unidade,
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    LoginFinished(Result<LoginResponse>),
    ResetRequested(Result<String>),
    ProfileFetched(Role, i32, Result<Value>),
    PhotoFetched(String, Result<Vec<u8>>),
    Submitted(WizardKind, Result<Value>),
    RecordFetched(i32, Result<Value>),
    SectionsSaved(i32, Result<usize>),
    UnidadesLoaded(Result<Vec<Unidade>>),
    UnidadeDeleted(i32, Result<()>),
    PacientesLoaded(Result<Vec<PacienteResumo>>),
    AnaliseToggled(i32, Result<bool>),
    PasswordChanged(Result<()>),
}

/// A list fetched from the backend.
#[derive(Debug)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            loaded: false,
            error: None,
        }
    }
}

impl<T> ListState<T> {
    fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish(&mut self, result: Result<Vec<T>>) {
        self.loading = false;
        self.loaded = true;
        match result {
            Ok(items) => self.items = items,
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}

/// Patient record being edited, by id.
pub struct EditState {
    pub id: i32,
    pub wizard: FormOrchestrator<PacienteForms>,
}

impl EditState {
    /// Apply a save outcome. Ignored unless it belongs to this record's pending save.
    pub fn sections_saved(&mut self, id: i32, result: Result<usize>) -> bool {
        if self.id != id || !self.wizard.is_submitting() {
            debug!("Dropping stale save result for paciente {id}");
            return false;
        }
        let outcome = result.map(|saved| json!({ "secoes": saved }));
        self.wizard.finish_submission(&outcome);
        true
    }
}

/// Main application state.
pub struct App {
    rt: tokio::runtime::Runtime,
    client: ApiClient,

    tx: mpsc::UnboundedSender<UiMessage>,
    rx: mpsc::UnboundedReceiver<UiMessage>,

    session: SessionStore,
    nav: NavShell,
    current: Destination,
    photo: Option<Photo>,

    login: LoginForm,
    password: PasswordForm,

    paciente: FormOrchestrator<PacienteForms>,
    colaborador: FormOrchestrator<ColaboradorForms>,
    gerente: FormOrchestrator<GerenteForms>,
    unidade: FormOrchestrator<UnidadeForm>,
    edit: Option<EditState>,
    edit_loading: Option<i32>,

    unidades: ListState<Unidade>,
    pacientes: ListState<PacienteResumo>,
    paciente_search: String,

    error_message: Option<String>,
}

impl App {
    pub fn new(client: ApiClient, rt: tokio::runtime::Runtime) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            rt,
            client,
            tx,
            rx,
            session: SessionStore::new(),
            nav: NavShell::new(),
            current: Destination::Home,
            photo: None,
            login: LoginForm::default(),
            password: PasswordForm::default(),
            paciente: FormOrchestrator::new(),
            colaborador: FormOrchestrator::new(),
            gerente: FormOrchestrator::new(),
            unidade: FormOrchestrator::new(),
            edit: None,
            edit_loading: None,
            unidades: ListState::default(),
            pacientes: ListState::default(),
            paciente_search: String::new(),
            error_message: None,
        }
    }

    /// Run `task` on the runtime and post its result back to the UI.
    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = UiMessage> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    fn login(&mut self) {
        self.login.busy = true;
        self.login.error = None;

        let client = self.client.clone();
        let role = self.login.role;
        let email = self.login.email.clone();
        let password = self.login.password.clone();
        self.spawn(async move { UiMessage::LoginFinished(client.login(role, &email, &password).await) });
    }

    fn request_reset(&mut self) {
        self.login.busy = true;
        let client = self.client.clone();
        let role = self.login.role;
        let email = self.login.email.clone();
        self.spawn(async move { UiMessage::ResetRequested(client.request_password_reset(role, &email).await) });
    }

    fn logout(&mut self) {
        self.session.logout();
        self.nav.reset();
        self.photo = None;
        self.current = Destination::Home;
        self.login = LoginForm::default();
        self.password = PasswordForm::default();
        self.paciente.reset();
        self.colaborador.reset();
        self.gerente.reset();
        self.unidade.reset();
        self.edit = None;
        self.edit_loading = None;
        self.unidades = ListState::default();
        self.pacientes = ListState::default();
    }

    /// Role known: fetch the header profile once.
    fn start_navigation(&mut self) {
        let Some(session) = self.session.current() else {
            return;
        };
        if let Some((role, id)) = self.nav.start(session) {
            let client = self.client.clone();
            self.spawn(async move { UiMessage::ProfileFetched(role, id, client.fetch_profile(role, id).await) });
        }
    }

    fn navigate(&mut self, destination: Destination) {
        let allowed = self.nav.capabilities().is_some_and(|c| c.allows(destination));
        if !allowed {
            debug!("Navigation to {destination:?} not allowed for this role");
            return;
        }
        self.current = destination;

        match destination {
            Destination::Unidades if !self.unidades.loaded => self.load_unidades(),
            Destination::Pacientes if !self.pacientes.loaded => self.load_pacientes(),
            Destination::MeusDados => {
                if let Some(id) = self.session.current().map(|s| s.id)
                    && self.edit.as_ref().is_none_or(|e| e.id != id)
                {
                    self.open_edit(id);
                }
            }
            Destination::AlterarSenha => self.password = PasswordForm::default(),
            _ => {}
        }
    }

    fn load_unidades(&mut self) {
        self.unidades.start();
        let client = self.client.clone();
        self.spawn(async move { UiMessage::UnidadesLoaded(client.list_unidades().await) });
    }

    fn load_pacientes(&mut self) {
        self.pacientes.start();
        let client = self.client.clone();
        self.spawn(async move { UiMessage::PacientesLoaded(client.list_pacientes().await) });
    }

    fn delete_unidade(&mut self, id: i32) {
        let client = self.client.clone();
        self.spawn(async move { UiMessage::UnidadeDeleted(id, client.delete_unidade(id).await) });
    }

    fn toggle_analise(&mut self, id: i32) {
        let client = self.client.clone();
        self.spawn(async move { UiMessage::AnaliseToggled(id, client.toggle_analise(id).await) });
    }

    /// Fetch a patient record and open it in the edit wizard.
    fn open_edit(&mut self, id: i32) {
        self.edit = None;
        self.edit_loading = Some(id);
        let client = self.client.clone();
        self.spawn(async move { UiMessage::RecordFetched(id, client.get_record(Role::Paciente, id).await) });
    }

    fn submit(&mut self, kind: WizardKind) {
        let prepared = match kind {
            WizardKind::Paciente => self.paciente.prepare_submission(),
            WizardKind::Colaborador => self.colaborador.prepare_submission(),
            WizardKind::Gerente => self.gerente.prepare_submission(),
            WizardKind::Unidade => self.unidade.prepare_submission(),
        };

        match prepared {
            Ok(submission) => {
                let client = self.client.clone();
                self.spawn(async move { UiMessage::Submitted(kind, client.submit(submission).await) });
            }
            // Validation failures are already in the banner
            Err(e) => debug!("{kind:?} submission not sent: {e}"),
        }
    }

    /// Save an edited record, one section per request.
    fn submit_edit(&mut self) {
        let Some(edit) = self.edit.as_mut() else {
            return;
        };
        if let Err(e) = edit.wizard.prepare_submission() {
            debug!("Edit not sent: {e}");
            return;
        }

        let client = self.client.clone();
        let id = edit.id;
        let draft = edit.wizard.draft().clone();
        self.spawn(async move { UiMessage::SectionsSaved(id, save_sections(&client, id, &draft).await) });
    }

    fn change_password(&mut self) {
        let Some(session) = self.session.current() else {
            return;
        };
        self.password.busy = true;
        self.password.error = None;

        let client = self.client.clone();
        let (role, id) = (session.role, session.id);
        let (current, new) = (self.password.current.clone(), self.password.new.clone());
        self.spawn(async move { UiMessage::PasswordChanged(client.change_password(role, id, &current, &new).await) });
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::LoginFinished(result) => {
                    self.login.busy = false;
                    match result {
                        Ok(login) => {
                            self.session.login(Session::from(login));
                            self.login.password.clear();
                            self.start_navigation();
                        }
                        Err(e) => self.login.error = Some(user_message(&e)),
                    }
                }
                UiMessage::ResetRequested(result) => {
                    self.login.busy = false;
                    match result {
                        Ok(message) => self.login.reset_message = Some(message),
                        Err(e) => self.login.error = Some(user_message(&e)),
                    }
                }
                UiMessage::ProfileFetched(role, id, result) => {
                    let foto = result
                        .as_ref()
                        .ok()
                        .and_then(|r| r["foto"].as_str())
                        .filter(|f| !f.is_empty())
                        .map(str::to_string);
                    let applied = self.nav.profile_fetched(role, id, result.map_err(|e| e.to_string()));
                    if applied
                        && let Some(name) = foto
                        && matches!(self.nav.profile(), ProfileState::Loaded(_))
                    {
                        let client = self.client.clone();
                        self.spawn(async move {
                            let bytes = client.fetch_image(&name).await;
                            UiMessage::PhotoFetched(name, bytes)
                        });
                    }
                }
                UiMessage::PhotoFetched(name, result) => match result {
                    Ok(_) if !self.is_current_photo(&name) => debug!("Dropping stale photo {name}"),
                    Ok(bytes) => {
                        self.photo = Some(Photo {
                            name,
                            bytes: Arc::from(bytes),
                        })
                    }
                    Err(e) => error!("Failed to load photo {name}: {e}"),
                },
                UiMessage::Submitted(kind, result) => {
                    match kind {
                        WizardKind::Paciente => self.paciente.finish_submission(&result),
                        WizardKind::Colaborador => self.colaborador.finish_submission(&result),
                        WizardKind::Gerente => self.gerente.finish_submission(&result),
                        WizardKind::Unidade => self.unidade.finish_submission(&result),
                    }
                    if result.is_ok() {
                        match kind {
                            WizardKind::Unidade => self.unidades.loaded = false,
                            WizardKind::Paciente => self.pacientes.loaded = false,
                            _ => {}
                        }
                    }
                }
                UiMessage::RecordFetched(id, result) => {
                    if self.edit_loading != Some(id) {
                        continue;
                    }
                    self.edit_loading = None;
                    match result {
                        Ok(record) => {
                            self.edit = Some(EditState {
                                id,
                                wizard: FormOrchestrator::from_record(&record),
                            })
                        }
                        Err(e) => self.error_message = Some(user_message(&e)),
                    }
                }
                UiMessage::SectionsSaved(id, result) => {
                    if let Some(edit) = self.edit.as_mut() {
                        edit.sections_saved(id, result);
                    }
                    self.pacientes.loaded = false;
                }
                UiMessage::UnidadesLoaded(result) => self.unidades.finish(result),
                UiMessage::UnidadeDeleted(id, result) => match result {
                    Ok(()) => {
                        self.unidades.items.retain(|u| u.id != id);
                        info!("Unidade {id} removed");
                    }
                    Err(e) => self.error_message = Some(user_message(&e)),
                },
                UiMessage::PacientesLoaded(result) => self.pacientes.finish(result),
                UiMessage::AnaliseToggled(id, result) => match result {
                    Ok(analise) => {
                        if let Some(p) = self.pacientes.items.iter_mut().find(|p| p.id == id) {
                            p.analise = analise;
                        }
                    }
                    Err(e) => self.error_message = Some(user_message(&e)),
                },
                UiMessage::PasswordChanged(result) => {
                    self.password.busy = false;
                    match result {
                        Ok(()) => {
                            self.password = PasswordForm {
                                done: true,
                                ..Default::default()
                            }
                        }
                        Err(e) => self.password.error = Some(user_message(&e)),
                    }
                }
            }
        }
    }

    /// The photo named in the loaded header profile.
    fn is_current_photo(&self, name: &str) -> bool {
        matches!(self.nav.profile(), ProfileState::Loaded(p) if p.foto.as_deref() == Some(name))
    }

    fn is_busy(&self) -> bool {
        self.login.busy
            || self.password.busy
            || self.edit_loading.is_some()
            || self.unidades.loading
            || self.pacientes.loading
            || matches!(self.nav.profile(), ProfileState::Loading)
            || self.paciente.is_submitting()
            || self.colaborador.is_submitting()
            || self.gerente.is_submitting()
            || self.unidade.is_submitting()
            || self.edit.as_ref().is_some_and(|e| e.wizard.is_submitting())
    }

    fn show_main(&mut self, ui: &mut egui::Ui) {
        let go_home = match self.current {
            Destination::Home => {
                if let Some(next) = home_panel::show(ui, &self.nav, self.photo.as_ref()) {
                    self.navigate(next);
                }
                false
            }
            Destination::Unidades => {
                let can_edit = self.session.role() == Some(Role::Gerente);
                match unidades_panel::show(ui, &self.unidades, can_edit) {
                    UnidadesAction::None => false,
                    UnidadesAction::GoBack => true,
                    UnidadesAction::Refresh => {
                        self.load_unidades();
                        false
                    }
                    UnidadesAction::New => {
                        self.navigate(Destination::NovaUnidade);
                        false
                    }
                    UnidadesAction::Delete(id) => {
                        self.delete_unidade(id);
                        false
                    }
                }
            }
            Destination::Pacientes => match pacientes_panel::show(ui, &self.pacientes, &mut self.paciente_search) {
                PacientesAction::None => false,
                PacientesAction::GoBack => true,
                PacientesAction::Refresh => {
                    self.load_pacientes();
                    false
                }
                PacientesAction::ToggleAnalise(id) => {
                    self.toggle_analise(id);
                    false
                }
                PacientesAction::Edit(id) => {
                    self.current = Destination::MeusDados;
                    self.open_edit(id);
                    false
                }
            },
            Destination::NovoPaciente => {
                let action = wizard_panel::show(ui, "Cadastro de paciente", &mut self.paciente, steps::paciente);
                self.wizard_action(action, WizardKind::Paciente)
            }
            Destination::NovoColaborador => {
                let action =
                    wizard_panel::show(ui, "Cadastro de colaborador", &mut self.colaborador, steps::colaborador);
                self.wizard_action(action, WizardKind::Colaborador)
            }
            Destination::NovoGerente => {
                let action = wizard_panel::show(ui, "Cadastro de gerente", &mut self.gerente, steps::gerente);
                self.wizard_action(action, WizardKind::Gerente)
            }
            Destination::NovaUnidade => {
                let action = wizard_panel::show(ui, "Cadastro de unidade", &mut self.unidade, steps::unidade);
                self.wizard_action(action, WizardKind::Unidade)
            }
            Destination::MeusDados => self.show_edit(ui),
            Destination::AlterarSenha => match password_panel::show(ui, &mut self.password) {
                PasswordAction::None => false,
                PasswordAction::GoBack => true,
                PasswordAction::Submit => {
                    self.change_password();
                    false
                }
            },
        };

        if go_home {
            self.current = Destination::Home;
        }
    }

    fn wizard_action(&mut self, action: WizardAction, kind: WizardKind) -> bool {
        match action {
            WizardAction::None => false,
            WizardAction::Cancel => true,
            WizardAction::Submit => {
                self.submit(kind);
                false
            }
        }
    }

    fn show_edit(&mut self, ui: &mut egui::Ui) -> bool {
        if self.edit_loading.is_some() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Carregando cadastro...");
            });
            return false;
        }
        let Some(edit) = self.edit.as_mut() else {
            ui.colored_label(colors::NEUTRAL, "Nenhum cadastro aberto.");
            return super::components::back_button(ui);
        };

        let title = format!("Autenticação do cadastro #{}", edit.id);
        match wizard_panel::show(ui, &title, &mut edit.wizard, steps::paciente) {
            WizardAction::None => false,
            WizardAction::Cancel => true,
            WizardAction::Submit => {
                self.submit_edit();
                false
            }
        }
    }

    fn show_error_dialog(&mut self, ctx: &egui::Context) {
        let Some(message) = self.error_message.clone() else {
            return;
        };
        egui::Window::new("Erro")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.colored_label(Color32::from_rgb(255, 100, 100), &message);
                ui.add_space(10.0);
                if ui.button("OK").clicked() {
                    self.error_message = None;
                }
            });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_async_results();

        if self.is_busy() {
            ctx.request_repaint();
        }

        self.show_error_dialog(ctx);

        if !self.session.is_signed_in() {
            egui::CentralPanel::default().show(ctx, |ui| {
                let api_url = self.client.base_url().to_string();
                match login_panel::show(ui, &mut self.login, &api_url) {
                    LoginAction::None => {}
                    LoginAction::Login => self.login(),
                    LoginAction::RequestReset => self.request_reset(),
                }
            });
            return;
        }

        match nav_bar::show(ctx, &self.nav, self.current) {
            Some(NavEvent::Navigate(destination)) => self.navigate(destination),
            Some(NavEvent::Logout) => self.logout(),
            None => {}
        }

        egui::CentralPanel::default().show(ctx, |ui| self.show_main(ui));
    }
}

/// Short text for the user; authentication and backend messages pass through.
fn user_message(e: &AppError) -> String {
    match e {
        AppError::Auth(message) | AppError::NotFound(message) => message.clone(),
        AppError::Api { message, .. } => message.clone(),
        AppError::Http(_) => "Não foi possível conectar ao servidor".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::SubmitState;

    #[test]
    fn test_list_state() {
        let mut list = ListState::<i32>::default();
        list.start();
        assert!(list.loading);

        list.finish(Ok(vec![1, 2]));
        assert!(list.loaded && !list.loading);
        assert_eq!(list.items, vec![1, 2]);

        list.start();
        list.finish(Err(AppError::parse("quebrado")));
        assert_eq!(list.error.as_deref(), Some("Parse error: quebrado"));
        assert_eq!(list.items, vec![1, 2]);
    }

    fn editing(id: i32) -> EditState {
        let record = json!({
            "id": id,
            "nome": "João",
            "geral": { "nascimento": "2015-03-09", "telefone": "11 1234" },
            "escola": { "nomeEscola": "EMEF Central" },
            "mae": { "nome": "Maria" },
        });
        EditState {
            id,
            wizard: FormOrchestrator::from_record(&record),
        }
    }

    #[test]
    fn test_save_result_only_for_pending_record() {
        let mut edit = editing(7);
        // Nothing pending yet
        assert!(!edit.sections_saved(7, Ok(3)));
        assert_eq!(edit.wizard.submit_state(), &SubmitState::Idle);

        while !edit.wizard.step().is_last() {
            assert!(edit.wizard.next_step(), "{:?}", edit.wizard.error());
        }
        edit.wizard.prepare_submission().unwrap();

        // Result of a save started for another patient
        assert!(!edit.sections_saved(8, Ok(2)));
        assert!(edit.wizard.is_submitting());

        assert!(edit.sections_saved(7, Ok(3)));
        assert_eq!(edit.wizard.submit_state(), &SubmitState::Succeeded(json!({ "secoes": 3 })));
    }

    #[test]
    fn test_user_message() {
        assert_eq!(user_message(&AppError::auth("Email ou senha inválidos")), "Email ou senha inválidos");
        assert_eq!(
            user_message(&AppError::Api {
                status: 400,
                message: "Email já cadastrado".to_string()
            }),
            "Email já cadastrado"
        );
    }
}
