pub use super::colaboradores::Entity as Colaboradores;
pub use super::gerentes::Entity as Gerentes;
pub use super::pacientes::Entity as Pacientes;
pub use super::password_resets::Entity as PasswordResets;
pub use super::unidades::Entity as Unidades;
