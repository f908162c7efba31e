use backoffice_types::DocumentStore;
use std::sync::Arc;

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis_store;

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;

#[derive(Clone)]
pub enum BackofficeStore {
    Memory(Arc<MemoryStore>),
    #[cfg(feature = "redis")]
    Redis(Arc<RedisStore>),
    Other(Arc<dyn DocumentStore>),
}

impl BackofficeStore {
    pub fn memory() -> Self {
        BackofficeStore::Memory(Arc::new(MemoryStore::new()))
    }

    pub fn as_generic(&self) -> Arc<dyn DocumentStore> {
        match self {
            BackofficeStore::Memory(store) => store.clone() as Arc<dyn DocumentStore>,
            #[cfg(feature = "redis")]
            BackofficeStore::Redis(store) => store.clone() as Arc<dyn DocumentStore>,
            BackofficeStore::Other(store) => store.clone(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            BackofficeStore::Memory(_) => "memory",
            #[cfg(feature = "redis")]
            BackofficeStore::Redis(_) => "redis",
            BackofficeStore::Other(_) => "other",
        }
    }
}

impl std::fmt::Debug for BackofficeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BackofficeStore({})", self.backend_name())
    }
}
