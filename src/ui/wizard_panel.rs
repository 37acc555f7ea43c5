//! Chrome shared by every registration wizard: step header, error banner,
//! navigation buttons and submission status.

use eframe::egui::{self, Align, Layout, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{CHECK_CIRCLE, PAPER_PLANE_TILT};

use super::components::{back_button, colors, error_banner, panel_header, primary_button_with_icon};
use crate::wizard::{FormOrchestrator, Registration, SubmitState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    None,
    /// Last step confirmed; the caller sends the draft.
    Submit,
    Cancel,
}

/// Render `wizard`; `body` lays out the fields of the current step and
/// returns a message when a picked file could not be read.
pub fn show<R: Registration>(
    ui: &mut Ui,
    title: &str,
    wizard: &mut FormOrchestrator<R>,
    body: impl FnOnce(&mut Ui, &mut R, usize) -> Option<String>,
) -> WizardAction {
    let mut action = WizardAction::None;

    if back_button(ui) {
        action = WizardAction::Cancel;
    }
    panel_header(ui, title);

    if let SubmitState::Succeeded(_) = wizard.submit_state() {
        ui.horizontal(|ui| {
            ui.colored_label(colors::SUCCESS, RichText::new(CHECK_CIRCLE).size(20.0));
            ui.colored_label(colors::SUCCESS, "Cadastro enviado com sucesso.");
        });
        ui.add_space(15.0);
        if ui.button("Novo cadastro").clicked() {
            wizard.reset();
        }
        return action;
    }

    let step = wizard.step();
    ui.horizontal(|ui| {
        ui.heading(wizard.step_title());
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.label(format!("Passo {} de {}", step.current(), step.total()));
        });
    });
    ui.add_space(10.0);

    let scroll = wizard.take_scroll_request();
    ScrollArea::vertical().id_salt("wizard_scroll").show(ui, |ui| {
        if let Some(error) = wizard.error() {
            error_banner(ui, error, scroll);
            ui.add_space(10.0);
        }

        if let Some(file_error) = body(ui, &mut wizard.forms, step.current()) {
            wizard.set_error(file_error);
        }

        ui.add_space(20.0);
        ui.separator();

        let submitting = wizard.is_submitting();
        ui.horizontal(|ui| {
            if !step.is_first() && ui.add_enabled(!submitting, egui::Button::new("< Anterior")).clicked() {
                wizard.prev_step();
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if !step.is_last() {
                    if ui.button("Próximo >").clicked() {
                        wizard.next_step();
                    }
                } else {
                    let send = ui.add_enabled_ui(!submitting, |ui| primary_button_with_icon(ui, PAPER_PLANE_TILT, "Enviar"));
                    if send.inner.clicked() {
                        action = WizardAction::Submit;
                    }
                    if submitting {
                        ui.spinner();
                        ui.label("Enviando...");
                    }
                }
            });
        });

        if let SubmitState::Failed(message) = wizard.submit_state() {
            ui.add_space(10.0);
            ui.colored_label(colors::ERROR, format!("Falha no envio: {message}"));
        }
    });

    action
}
