//! Unit list.

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PLUS, TRASH};

use super::app::ListState;
use super::components::{back_button, colors, panel_header, primary_button_with_icon};
use crate::models::Unidade;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnidadesAction {
    None,
    GoBack,
    Refresh,
    New,
    Delete(i32),
}

pub fn show(ui: &mut Ui, list: &ListState<Unidade>, can_edit: bool) -> UnidadesAction {
    let mut action = UnidadesAction::None;

    if back_button(ui) {
        action = UnidadesAction::GoBack;
    }
    panel_header(ui, "Unidades");

    ui.horizontal(|ui| {
        if can_edit && primary_button_with_icon(ui, PLUS, "Nova unidade").clicked() {
            action = UnidadesAction::New;
        }
        ui.add_space(10.0);
        if ui
            .add_enabled(!list.loading, egui::Button::new(format!("{ARROWS_CLOCKWISE} Atualizar")))
            .clicked()
        {
            action = UnidadesAction::Refresh;
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
    if list.items.is_empty() && !list.loading {
        ui.weak("Nenhuma unidade foi encontrada");
        return action;
    }

    ScrollArea::vertical().id_salt("unidades_scroll").show(ui, |ui| {
        egui::Grid::new("unidades_grid")
            .num_columns(4)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Id");
                ui.strong("Nome");
                ui.strong("Endereço");
                ui.strong("");
                ui.end_row();

                for unidade in &list.items {
                    ui.label(unidade.id.to_string());
                    ui.label(&unidade.nome);
                    ui.label(&unidade.endereco);
                    if can_edit {
                        if ui
                            .button(egui::RichText::new(TRASH).color(colors::ERROR))
                            .on_hover_text("Remover")
                            .clicked()
                        {
                            action = UnidadesAction::Delete(unidade.id);
                        }
                    } else {
                        ui.label("");
                    }
                    ui.end_row();
                }
            });
    });

    action
}
