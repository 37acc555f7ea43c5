//! Sign-in screen with the password reset request.

use eframe::egui::{self, Align, Layout, RichText, Ui};
use egui_phosphor::regular::SIGN_IN;

use super::components::{colors, primary_button_with_icon};
use crate::models::Role;
use crate::wizard::validation::validate_email;

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub role: Role,
    pub email: String,
    pub password: String,
    pub busy: bool,
    pub error: Option<String>,
    /// Showing the "forgot password" form instead of the sign-in form.
    pub reset_mode: bool,
    pub reset_message: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            role: Role::Paciente,
            email: String::new(),
            password: String::new(),
            busy: false,
            error: None,
            reset_mode: false,
            reset_message: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAction {
    None,
    Login,
    RequestReset,
}

pub fn show(ui: &mut Ui, form: &mut LoginForm, api_url: &str) -> LoginAction {
    let mut action = LoginAction::None;

    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        ui.heading(RichText::new("Atipicidades").size(32.0).strong());
        ui.add_space(6.0);
        ui.weak(format!("Servidor: {api_url}"));
        ui.add_space(30.0);
    });

    ui.allocate_ui_with_layout(
        egui::vec2(ui.available_width(), 300.0),
        Layout::top_down(Align::Center),
        |ui| {
            egui::Grid::new("login_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Perfil:");
                    egui::ComboBox::from_id_salt("login_role")
                        .width(200.0)
                        .selected_text(form.role.label())
                        .show_ui(ui, |ui| {
                            for role in Role::ALL {
                                ui.selectable_value(&mut form.role, role, role.label());
                            }
                        });
                    ui.end_row();

                    ui.label("Email:");
                    ui.add(egui::TextEdit::singleline(&mut form.email).desired_width(260.0));
                    ui.end_row();

                    if !form.reset_mode {
                        ui.label("Senha:");
                        let response =
                            ui.add(egui::TextEdit::singleline(&mut form.password).password(true).desired_width(260.0));
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            action = LoginAction::Login;
                        }
                        ui.end_row();
                    }
                });

            ui.add_space(20.0);

            if form.reset_mode {
                let valid = validate_email(&form.email);
                if ui
                    .add_enabled(valid && !form.busy, egui::Button::new("Enviar instruções"))
                    .clicked()
                {
                    action = LoginAction::RequestReset;
                }
                if let Some(message) = &form.reset_message {
                    ui.add_space(10.0);
                    ui.colored_label(colors::SUCCESS, message);
                }
                ui.add_space(10.0);
                if ui.link("Voltar ao login").clicked() {
                    form.reset_mode = false;
                    form.reset_message = None;
                }
            } else {
                ui.add_enabled_ui(!form.busy, |ui| {
                    if primary_button_with_icon(ui, SIGN_IN, "Entrar").clicked() {
                        action = LoginAction::Login;
                    }
                });
                ui.add_space(10.0);
                if ui.link("Esqueci minha senha").clicked() {
                    form.reset_mode = true;
                    form.error = None;
                }
            }

            if form.busy {
                ui.add_space(10.0);
                ui.spinner();
            }
            if let Some(error) = &form.error {
                ui.add_space(10.0);
                ui.colored_label(colors::ERROR, error);
            }
        },
    );

    // Enter with an incomplete form does nothing
    if action == LoginAction::Login && (form.busy || form.email.trim().is_empty() || form.password.is_empty()) {
        if !form.busy {
            form.error = Some("Informe email e senha".to_string());
        }
        action = LoginAction::None;
    }

    action
}
