//! Data models: request/response DTOs and typed registration sections.

pub mod answer;
pub mod auth;
pub mod colaborador;
pub mod gerente;
pub mod paciente;
pub mod role;
pub mod unidade;

pub use answer::Resposta;
pub use auth::{ChangePasswordRequest, LoginRequest, LoginResponse, PasswordResetConfirm, PasswordResetRequest};
pub use colaborador::CreateColaborador;
pub use gerente::{CreateGerente, VincularUnidade};
pub use paciente::{CreatePaciente, PacienteResumo, Section};
pub use role::Role;
pub use unidade::{CreateUnidade, Unidade, UpdateUnidade};
