//! Change password of the signed-in account.

use eframe::egui::{self, Ui};

use super::components::{back_button, colors, panel_header, password_row};
use crate::wizard::validation::{ValidationError, check_password};

#[derive(Debug, Clone, Default)]
pub struct PasswordForm {
    pub current: String,
    pub new: String,
    pub confirm: String,
    pub busy: bool,
    pub error: Option<String>,
    pub done: bool,
}

impl PasswordForm {
    /// Local checks before anything is sent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.current.is_empty() {
            return Err(ValidationError::Required("senha atual".to_string()));
        }
        check_password(&self.new, &self.confirm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordAction {
    None,
    GoBack,
    Submit,
}

pub fn show(ui: &mut Ui, form: &mut PasswordForm) -> PasswordAction {
    let mut action = PasswordAction::None;

    if back_button(ui) {
        action = PasswordAction::GoBack;
    }
    panel_header(ui, "Alterar senha");

    egui::Grid::new("password_grid")
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, |ui| {
            password_row(ui, "Senha atual:", &mut form.current);
            password_row(ui, "Nova senha:", &mut form.new);
            password_row(ui, "Confirmar nova senha:", &mut form.confirm);
        });

    ui.add_space(20.0);
    ui.horizontal(|ui| {
        if ui.add_enabled(!form.busy, egui::Button::new("Salvar")).clicked() {
            match form.validate() {
                Ok(()) => action = PasswordAction::Submit,
                Err(e) => form.error = Some(e.to_string()),
            }
        }
        if form.busy {
            ui.spinner();
        }
    });

    if let Some(error) = &form.error {
        ui.add_space(10.0);
        ui.colored_label(colors::ERROR, error);
    } else if form.done {
        ui.add_space(10.0);
        ui.colored_label(colors::SUCCESS, "Senha alterada com sucesso.");
    }

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let mut form = PasswordForm::default();
        assert!(matches!(form.validate(), Err(ValidationError::Required(_))));

        form.current = "antiga123".to_string();
        form.new = "nova-senha".to_string();
        form.confirm = "nova-senha".to_string();
        assert!(form.validate().is_ok());

        form.confirm = "outra".to_string();
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
    }
}
