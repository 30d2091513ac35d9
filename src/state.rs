use signbank_backend::tags::SqliteTagStore;
use sqlx::SqlitePool;

/// Shared application state handed to every handler
pub struct AppState {
    pub db: SqlitePool,
    pub tags: SqliteTagStore,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        let tags = SqliteTagStore::new(db.clone());
        Self { db, tags }
    }
}
