use crate::auth::services::ensure_admin;
use crate::config::{AppConfig, StoreBackend};
use crate::store::{MemoryStore, PgStore, Store};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match (config.backend, config.database_url.as_deref()) {
            (StoreBackend::Postgres, Some(url)) => {
                Arc::new(PgStore::connect(url).await?) as Arc<dyn Store>
            }
            (StoreBackend::Postgres, None) => anyhow::bail!("DATABASE_URL is not set"),
            (StoreBackend::Memory, _) => {
                warn!("using the in-memory store; data is lost on restart");
                Arc::new(MemoryStore::new()) as Arc<dyn Store>
            }
        };
        info!(backend = ?config.backend, "store ready");

        if let Some(admin) = &config.admin {
            ensure_admin(store.as_ref(), admin).await?;
        }

        Ok(Self::from_parts(store, config))
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            backend: StoreBackend::Memory,
            database_url: None,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
            admin: None,
        });

        Self::from_parts(Arc::new(MemoryStore::new()), config)
    }
}
