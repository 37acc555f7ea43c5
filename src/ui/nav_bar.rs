//! One navbar for every role, driven by its capabilities.

use eframe::egui::{self, Align, Layout, RichText};
use egui_phosphor::regular::{
    BUILDINGS, CLIPBOARD_TEXT, HOUSE, KEY, PLUS_CIRCLE, SIGN_OUT, USER_CIRCLE, USER_PLUS, USERS,
};

use crate::nav::{Destination, NavShell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    Navigate(Destination),
    Logout,
}

pub fn icon(destination: Destination) -> &'static str {
    match destination {
        Destination::Home => HOUSE,
        Destination::Unidades => BUILDINGS,
        Destination::NovaUnidade => PLUS_CIRCLE,
        Destination::NovoGerente | Destination::NovoColaborador | Destination::NovoPaciente => USER_PLUS,
        Destination::Pacientes => USERS,
        Destination::MeusDados => CLIPBOARD_TEXT,
        Destination::AlterarSenha => KEY,
    }
}

pub fn show(ctx: &egui::Context, nav: &NavShell, current: Destination) -> Option<NavEvent> {
    let caps = nav.capabilities()?;
    let mut event = None;

    egui::TopBottomPanel::top("nav_bar").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new(caps.home_label).strong());
            ui.separator();

            for link in caps.links {
                let text = format!("{} {}", icon(link.destination), link.label);
                if ui.selectable_label(current == link.destination, text).clicked() {
                    event = Some(NavEvent::Navigate(link.destination));
                }
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button(format!("{SIGN_OUT} Sair")).clicked() {
                    event = Some(NavEvent::Logout);
                }
                let (nome, email) = nav.header();
                ui.label(RichText::new(email).weak());
                ui.label(format!("{USER_CIRCLE} {nome}"));
            });
        });
        ui.add_space(4.0);
    });

    event
}
