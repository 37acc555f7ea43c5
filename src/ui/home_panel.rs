//! Home: profile header and one card per navbar destination.

use std::sync::Arc;

use eframe::egui::{self, RichText, Ui};
use egui_phosphor::regular::USER_CIRCLE;

use super::components::{colors, dashboard_card};
use super::nav_bar::icon;
use crate::nav::{Destination, NavShell, ProfileState};

/// Profile photo fetched from `/imagens`.
pub struct Photo {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

const PHOTO_SIZE: f32 = 96.0;

pub fn show(ui: &mut Ui, nav: &NavShell, photo: Option<&Photo>) -> Option<Destination> {
    let caps = nav.capabilities()?;
    let mut next = None;

    ui.add_space(10.0);
    ui.horizontal(|ui| {
        match photo {
            Some(photo) => {
                ui.add(
                    egui::Image::from_bytes(format!("bytes://foto/{}", photo.name), photo.bytes.clone())
                        .max_size(egui::vec2(PHOTO_SIZE, PHOTO_SIZE))
                        .corner_radius(8.0),
                );
            }
            None => {
                ui.label(RichText::new(USER_CIRCLE).size(PHOTO_SIZE * 0.8));
            }
        }
        ui.add_space(15.0);
        ui.vertical(|ui| {
            let (nome, email) = nav.header();
            ui.heading(RichText::new(nome).size(24.0));
            ui.label(email);
            ui.add_space(4.0);
            match nav.profile() {
                ProfileState::Loading => {
                    ui.spinner();
                }
                ProfileState::Failed(_) => {
                    ui.colored_label(colors::WARNING, "Não foi possível carregar o perfil.");
                }
                _ => {
                    ui.weak(caps.role.label());
                }
            }
        });
    });

    ui.add_space(20.0);
    ui.separator();
    ui.add_space(20.0);

    let card_size = egui::vec2(200.0, 130.0);
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(16.0, 16.0);
        for link in caps.links.iter().filter(|l| l.destination != Destination::Home) {
            if dashboard_card(ui, link.label, caps.home_label, icon(link.destination), card_size).clicked() {
                next = Some(link.destination);
            }
        }
    });

    next
}
