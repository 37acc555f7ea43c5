//! Shared UI components.

use chrono::{Local, NaiveDate};
use eframe::egui::{self, Color32, Response, RichText, Sense, StrokeKind, Ui};
use egui_extras::DatePickerButton;
use egui_phosphor::regular::{PAPERCLIP, WARNING_CIRCLE, X};

use crate::models::Resposta;
use crate::wizard::Attachment;

/// Render a clickable dashboard card with dynamic size.
///
/// Returns the response which can be checked for `.clicked()`.
pub fn dashboard_card(ui: &mut Ui, title: &str, description: &str, icon: &str, size: egui::Vec2) -> Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let visuals = ui.style().interact(&response);

        // Scale factor based on width (200 is the reference size)
        let scale = size.x / 200.0;

        ui.painter().rect_filled(rect, 8.0, visuals.bg_fill);
        ui.painter()
            .rect_stroke(rect, 8.0, visuals.bg_stroke, StrokeKind::Outside);

        let icon_pos = egui::pos2(rect.center().x, rect.top() + size.y * 0.23);
        ui.painter().text(
            icon_pos,
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(36.0 * scale),
            visuals.text_color(),
        );

        let title_pos = egui::pos2(rect.center().x, rect.center().y + size.y * 0.07);
        ui.painter().text(
            title_pos,
            egui::Align2::CENTER_CENTER,
            title,
            egui::FontId::proportional(18.0 * scale),
            visuals.text_color(),
        );

        let desc_pos = egui::pos2(rect.center().x, rect.bottom() - size.y * 0.17);
        ui.painter().text(
            desc_pos,
            egui::Align2::CENTER_CENTER,
            description,
            egui::FontId::proportional(12.0 * scale),
            ui.visuals().weak_text_color(),
        );
    }

    response
}

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui) -> bool {
    ui.button(RichText::new("< Voltar ao início").size(14.0)).clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

pub fn primary_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(format!("{icon} {text}")).strong()).min_size(egui::vec2(120.0, 28.0)))
}

/// Error banner. When `scroll` is set the banner is brought into view once.
pub fn error_banner(ui: &mut Ui, message: &str, scroll: bool) {
    let response = egui::Frame::group(ui.style())
        .fill(colors::ERROR.gamma_multiply(0.15))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(colors::ERROR, WARNING_CIRCLE);
                ui.colored_label(colors::ERROR, message);
            });
        })
        .response;

    if scroll {
        response.scroll_to_me(Some(egui::Align::Center));
    }
}

/// Labelled single-line text field inside a two-column grid.
pub fn text_row(ui: &mut Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).desired_width(280.0));
    ui.end_row();
}

/// Labelled masked field inside a two-column grid.
pub fn password_row(ui: &mut Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).password(true).desired_width(280.0));
    ui.end_row();
}

/// Sim/Não select. Returns true when the answer changed.
pub fn resposta_row(ui: &mut Ui, id: &str, label: &str, value: &mut Resposta) -> bool {
    let before = *value;
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .width(120.0)
        .selected_text(value.label())
        .show_ui(ui, |ui| {
            for option in Resposta::ALL {
                ui.selectable_value(value, option, option.label());
            }
        });
    ui.end_row();
    *value != before
}

/// Optional date with a calendar popup.
pub fn date_row(ui: &mut Ui, id: &str, label: &str, value: &mut Option<NaiveDate>) {
    ui.label(label);
    ui.horizontal(|ui| {
        let mut date = value.unwrap_or_else(|| Local::now().date_naive());
        if ui.add(DatePickerButton::new(&mut date).id_salt(id)).changed() {
            *value = Some(date);
        }
        match value {
            Some(d) => {
                ui.label(d.format("%d/%m/%Y").to_string());
            }
            None => {
                ui.weak("não informada");
            }
        }
    });
    ui.end_row();
}

/// Attachment picker. Returns an error message when the picked file could not be read.
pub fn file_row(ui: &mut Ui, label: &str, value: &mut Option<Attachment>, extensions: &[&str]) -> Option<String> {
    let mut error = None;
    ui.label(label);
    ui.horizontal(|ui| {
        if ui.button(format!("{PAPERCLIP} Escolher arquivo")).clicked()
            && let Some(path) = rfd::FileDialog::new()
                .add_filter("Arquivos", extensions)
                .pick_file()
        {
            match Attachment::from_path(&path) {
                Ok(attachment) => *value = Some(attachment),
                Err(e) => error = Some(e.to_string()),
            }
        }
        if let Some(attachment) = value.as_ref() {
            ui.label(&attachment.file_name);
            if ui.small_button(X).on_hover_text("Remover").clicked() {
                *value = None;
            }
        } else {
            ui.weak("nenhum arquivo");
        }
    });
    ui.end_row();
    error
}
