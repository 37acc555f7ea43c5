use sea_orm::DatabaseConnection;

use crate::storage::UploadStore;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(db: DatabaseConnection, uploads: UploadStore) -> Self {
        Self { db, uploads }
    }
}
