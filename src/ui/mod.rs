//! Desktop client: sign-in, role navbar, registration wizards and lists.

pub mod app;
pub mod components;
pub mod home_panel;
pub mod login_panel;
pub mod nav_bar;
pub mod pacientes_panel;
pub mod password_panel;
pub mod steps;
pub mod unidades_panel;
pub mod wizard_panel;

pub use app::App;
