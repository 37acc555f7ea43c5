//! Database connection pool and repositories.

pub mod account;
pub mod colaborador;
pub mod connection;
pub mod gerente;
pub mod paciente;
pub mod password_reset;
pub mod schema;
pub mod unidade;

pub use connection::{TableCounts, connect, get_table_counts, get_version, test_connection};
pub use schema::ensure_schema;

#[cfg(test)]
mod tests;
