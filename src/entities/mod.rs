//! SeaORM entities, one module per table.

pub mod colaboradores;
pub mod gerentes;
pub mod pacientes;
pub mod password_resets;
pub mod prelude;
pub mod unidades;
