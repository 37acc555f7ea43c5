//! Patient review: list, analysis flag and edit.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL};

use super::app::ListState;
use super::components::{back_button, colors, panel_header};
use crate::models::PacienteResumo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacientesAction {
    None,
    GoBack,
    Refresh,
    ToggleAnalise(i32),
    Edit(i32),
}

pub fn show(ui: &mut Ui, list: &ListState<PacienteResumo>, search: &mut String) -> PacientesAction {
    let mut action = PacientesAction::None;

    if back_button(ui) {
        action = PacientesAction::GoBack;
    }
    panel_header(ui, "Pacientes");

    ui.horizontal(|ui| {
        ui.label("Buscar:");
        ui.add(
            egui::TextEdit::singleline(search)
                .desired_width(200.0)
                .hint_text("Nome ou email..."),
        );
        ui.add_space(10.0);
        if ui
            .add_enabled(!list.loading, egui::Button::new(format!("{ARROWS_CLOCKWISE} Atualizar")))
            .clicked()
        {
            action = PacientesAction::Refresh;
        }
        if list.loading {
            ui.spinner();
        }
    });
    ui.add_space(15.0);

    if let Some(error) = &list.error {
        ui.colored_label(colors::ERROR, error);
        return action;
    }

    let needle = search.trim().to_lowercase();
    let filtered: Vec<_> = list
        .items
        .iter()
        .filter(|p| {
            needle.is_empty() || p.nome.to_lowercase().contains(&needle) || p.email.to_lowercase().contains(&needle)
        })
        .collect();

    ui.label(format!("Exibindo {} de {} pacientes", filtered.len(), list.items.len()));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("pacientes_scroll").show(ui, |ui| {
        egui::Grid::new("pacientes_grid")
            .num_columns(5)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Nome");
                ui.strong("Email");
                ui.strong("Unidade");
                ui.strong("Em análise");
                ui.strong("Ações");
                ui.end_row();

                for paciente in filtered {
                    ui.label(&paciente.nome);
                    ui.label(&paciente.email);
                    ui.label(paciente.unidade_id.map(|id| id.to_string()).unwrap_or("-".to_string()));

                    let mut analise = paciente.analise;
                    if ui.checkbox(&mut analise, "").changed() {
                        action = PacientesAction::ToggleAnalise(paciente.id);
                    }

                    if ui.button(format!("{PENCIL} Editar")).clicked() {
                        action = PacientesAction::Edit(paciente.id);
                    }
                    ui.end_row();
                }
            });
    });

    action
}
