use backoffice_api::config::{Config, ConfigError, StoreBackend};
use backoffice_storage::{BackofficeStore, RedisStore};
use std::sync::Arc;

pub async fn create_store(config: &Config) -> Result<BackofficeStore, ConfigError> {
    match &config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Ok(BackofficeStore::memory())
        }
        StoreBackend::Redis { url } => {
            let store = RedisStore::new(url)
                .await
                .map_err(|e| ConfigError::Store(e.to_string()))?;
            tracing::info!("Connected to redis store");
            Ok(BackofficeStore::Redis(Arc::new(store)))
        }
    }
}
