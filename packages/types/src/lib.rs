pub mod store;

pub use ::anyhow::{self, Result, anyhow, bail};
pub use ::async_trait::{self, async_trait};
pub use chrono;
pub use serde_json::{self, Value, json};
pub use tokio;
pub use uuid;

pub use store::{DocumentStore, StoreError, StoredDocument};

#[inline]
pub fn create_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
