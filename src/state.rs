use std::{sync::Arc, time::Duration};

use crate::{
    config::{AppConfig, StoreBackend},
    db::{create_orm_conn, run_migrations},
    store::{CatalogStore, MemoryStore, OrderStore, PgStore, UserStore},
};

/// Store handles shared by every request. Each handle is passed in
/// explicitly; nothing is looked up from process-wide state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub orders: Arc<dyn OrderStore>,
    pub request_timeout: Duration,
}

impl AppState {
    /// Shares one backend for all three capabilities.
    pub fn with_store<S>(store: S, request_timeout: Duration) -> Self
    where
        S: UserStore + CatalogStore + OrderStore + 'static,
    {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            catalog: store.clone(),
            orders: store,
            request_timeout,
        }
    }

    /// Builds the backend selected by `STORE_BACKEND`.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match config.store_backend {
            StoreBackend::Postgres => {
                let orm = create_orm_conn(config.database_url()?).await?;
                run_migrations(&orm).await?;
                tracing::info!("using postgres store");
                Ok(Self::with_store(PgStore::new(orm), config.request_timeout))
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store, data is lost on exit");
                Ok(Self::with_store(MemoryStore::new(), config.request_timeout))
            }
        }
    }
}
