use std::sync::Arc;

use backoffice_types::{DocumentStore, StoreError, Value};
use chrono::NaiveDate;

use crate::{
    documents::{self, SettingsDocument, SnapshotDocument},
    ledger::{DailySnapshot, DenominationSettings, SnapshotId},
};

pub const DEFAULT_SNAPSHOT_COLLECTION: &str = "scratchoffs";
pub const DEFAULT_SETTINGS_COLLECTION: &str = "scratchoff_settings";
pub const DEFAULT_SETTINGS_ID: &str = "ticketValues";

#[derive(Clone, Debug)]
pub struct RepositoryConfig {
    pub snapshot_collection: String,
    pub settings_collection: String,
    pub settings_id: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            snapshot_collection: DEFAULT_SNAPSHOT_COLLECTION.to_string(),
            settings_collection: DEFAULT_SETTINGS_COLLECTION.to_string(),
            settings_id: DEFAULT_SETTINGS_ID.to_string(),
        }
    }
}

/// Typed access to the scratch-off collections.
#[derive(Clone)]
pub struct ScratchoffRepository {
    store: Arc<dyn DocumentStore>,
    config: RepositoryConfig,
}

impl ScratchoffRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(store, RepositoryConfig::default())
    }

    pub fn with_config(store: Arc<dyn DocumentStore>, config: RepositoryConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    #[tracing::instrument(name = "ScratchoffRepository::load_settings", skip(self))]
    pub async fn load_settings(&self) -> Result<Option<DenominationSettings>, StoreError> {
        let doc = self
            .store
            .get(&self.config.settings_collection, &self.config.settings_id)
            .await?;

        Ok(doc.map(|doc| SettingsDocument::from_value(&doc.data).into()))
    }

    /// Full replace of the settings document, never a per-slot merge.
    #[tracing::instrument(name = "ScratchoffRepository::replace_settings", skip_all)]
    pub async fn replace_settings(&self, settings: &DenominationSettings) -> Result<(), StoreError> {
        let value = SettingsDocument::from(settings).to_value()?;
        self.store
            .set(
                &self.config.settings_collection,
                &self.config.settings_id,
                &value,
            )
            .await
    }

    /// The snapshot saved for `date`. Duplicate saves resolve to the most
    /// recently saved one.
    #[tracing::instrument(name = "ScratchoffRepository::find_snapshot", skip(self))]
    pub async fn find_snapshot(&self, date: NaiveDate) -> Result<Option<DailySnapshot>, StoreError> {
        let matches = self
            .store
            .find_eq(
                &self.config.snapshot_collection,
                "dateString",
                &Value::String(documents::date_key(date)),
            )
            .await?;

        if matches.len() > 1 {
            tracing::debug!(count = matches.len(), "Multiple snapshots for the same day");
        }

        Ok(matches
            .iter()
            .map(|doc| documents::snapshot_from_stored(doc, date))
            .max_by_key(DailySnapshot::saved_at))
    }

    /// Appends; a second save for the same day creates a second document.
    #[tracing::instrument(name = "ScratchoffRepository::append_snapshot", skip_all)]
    pub async fn append_snapshot(&self, snapshot: &DailySnapshot) -> Result<SnapshotId, StoreError> {
        let value = SnapshotDocument::from(snapshot).to_value()?;
        let id = self
            .store
            .add(&self.config.snapshot_collection, &value)
            .await?;
        Ok(SnapshotId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TicketBoard;
    use backoffice_storage::MemoryStore;
    use backoffice_types::json;
    use chrono::{Duration, Utc};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[tokio::test]
    async fn missing_documents_read_as_none() {
        let repo = ScratchoffRepository::new(Arc::new(MemoryStore::new()));
        assert!(repo.load_settings().await.unwrap().is_none());
        assert!(repo.find_snapshot(date(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn settings_are_replaced_whole() {
        let store = Arc::new(MemoryStore::new());
        let repo = ScratchoffRepository::new(store.clone());

        repo.replace_settings(&DenominationSettings::new([(1, 2.0), (2, 3.0)]))
            .await
            .unwrap();
        repo.replace_settings(&DenominationSettings::new([(5, 3.0)]))
            .await
            .unwrap();

        let settings = repo.load_settings().await.unwrap().unwrap();
        assert_eq!(settings.len(), 1);
        assert_eq!(settings.get(5), Some(3.0));
        assert_eq!(settings.get(1), None);
        assert_eq!(store.len(DEFAULT_SETTINGS_COLLECTION).await, 1);
    }

    #[tokio::test]
    async fn latest_duplicate_wins() {
        let store = Arc::new(MemoryStore::new());
        let repo = ScratchoffRepository::new(store.clone());
        let now = Utc::now();

        let mut board = TicketBoard::new();
        board.set_today(1, 5).unwrap();
        let newer = DailySnapshot::capture(&board, date(4), now);
        board.set_today(1, 3).unwrap();
        let older = DailySnapshot::capture(&board, date(4), now - Duration::hours(1));

        repo.append_snapshot(&newer).await.unwrap();
        repo.append_snapshot(&older).await.unwrap();

        let found = repo.find_snapshot(date(4)).await.unwrap().unwrap();
        assert_eq!(found.slot(1).unwrap().today_counter(), 5);
        assert!(found.id().is_some());
        assert_eq!(store.len(DEFAULT_SNAPSHOT_COLLECTION).await, 2);
    }

    #[tokio::test]
    async fn reads_hand_written_documents() {
        let store = Arc::new(MemoryStore::new());
        store
            .add(
                DEFAULT_SNAPSHOT_COLLECTION,
                &json!({
                    "dateString": "2024-03-01",
                    "rows": [{ "id": 3, "value": 1, "yesterday": 0, "today": "55", "sold": 55, "total": 55 }],
                    "grandTotal": 55,
                }),
            )
            .await
            .unwrap();

        let repo = ScratchoffRepository::new(store);
        let found = repo.find_snapshot(date(1)).await.unwrap().unwrap();
        assert_eq!(found.slots().len(), 1);
        assert_eq!(found.slot(3).unwrap().today_counter(), 55);
    }
}
