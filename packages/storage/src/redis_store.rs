//! Redis-backed document store
//!
//! Layout:
//! - `doc:{collection}:{id}` holds the JSON document
//! - `idx:{collection}` is a list of ids in creation order, used for queries

use async_trait::async_trait;
use backoffice_types::{DocumentStore, StoreError, StoredDocument, Value, create_id};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

const DOC_PREFIX: &str = "doc:";
const INDEX_PREFIX: &str = "idx:";

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn new(redis_url: &str) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(redis_url).map_err(|e| StoreError::Connection(e.to_string()))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(Self { conn })
    }

    fn doc_key(collection: &str, id: &str) -> String {
        format!("{}{}:{}", DOC_PREFIX, collection, id)
    }

    fn index_key(collection: &str) -> String {
        format!("{}{}", INDEX_PREFIX, collection)
    }

    async fn read_json(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut conn = self.conn.clone();

        let result: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match result {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn write_json(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, &json)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn push_index(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.rpush::<_, _, ()>(Self::index_key(collection), id)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn all_ids(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        conn.lrange(Self::index_key(collection), 0, -1)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let data = self.read_json(&Self::doc_key(collection, id)).await?;
        Ok(data.map(|data| StoredDocument::new(id, data)))
    }

    async fn set(&self, collection: &str, id: &str, data: &Value) -> Result<(), StoreError> {
        let key = Self::doc_key(collection, id);

        let mut conn = self.conn.clone();
        let exists: bool = conn
            .exists(&key)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        self.write_json(&key, data).await?;
        if !exists {
            self.push_index(collection, id).await?;
        }
        Ok(())
    }

    async fn add(&self, collection: &str, data: &Value) -> Result<String, StoreError> {
        let id = create_id();
        self.write_json(&Self::doc_key(collection, &id), data).await?;
        self.push_index(collection, &id).await?;
        Ok(id)
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let ids = self.all_ids(collection).await?;

        let mut matches = Vec::new();
        for id in ids {
            // Index entries can outlive documents deleted by hand.
            let Some(doc) = self.get(collection, &id).await? else {
                tracing::debug!(collection, id = %id, "Dangling index entry");
                continue;
            };
            if doc.field(field) == Some(value) {
                matches.push(doc);
            }
        }

        Ok(matches)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.exists::<_, bool>(Self::index_key("ping"))
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Connection(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_per_collection() {
        assert_eq!(RedisStore::doc_key("scratchoffs", "abc"), "doc:scratchoffs:abc");
        assert_eq!(RedisStore::index_key("scratchoffs"), "idx:scratchoffs");
    }
}
