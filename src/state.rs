use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn},
};

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub pool: DbPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// The raw sqlx pool is shared with the SeaORM connection.
    pub fn new(orm: OrmConn, config: AppConfig) -> Self {
        let pool = orm.get_postgres_connection_pool().clone();
        Self {
            orm,
            pool,
            config: Arc::new(config),
        }
    }
}
