pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod nav;
pub mod server;
pub mod session;
pub mod storage;
pub mod ui;
pub mod wizard;

pub use error::{AppError, Result};
