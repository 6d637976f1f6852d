use crate::session::SessionStore;
use sqlx::PgPool;

pub struct AppState {
    pub db: PgPool,
    pub sessions: SessionStore,
}
