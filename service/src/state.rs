//! Shared state handed to every axum handler via `State`.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::Mutex;

use ledger_core::engine::Engine;

use crate::cache::ServiceCache;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub engine: Arc<dyn Engine>,
    pub cache: Arc<Mutex<ServiceCache>>,
}
