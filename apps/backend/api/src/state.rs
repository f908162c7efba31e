use std::{sync::Arc, time::Duration};

use backoffice_core::{ScratchoffRepository, ScratchoffTracker, SessionContext};
use backoffice_storage::BackofficeStore;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::error::ApiError;

pub type AppState = Arc<State>;
pub type SharedTracker = Arc<RwLock<ScratchoffTracker>>;

pub struct State {
    pub store: BackofficeStore,
    pub repository: ScratchoffRepository,
    /// Working trackers keyed by user id, dropped after the idle TTL.
    pub trackers: moka::sync::Cache<String, SharedTracker>,
    today: fn() -> NaiveDate,
}

/// Day keys are UTC calendar days, matching the stored `dateString`s.
fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl State {
    pub fn new(store: BackofficeStore, session_ttl: Duration) -> Self {
        let repository = ScratchoffRepository::new(store.as_generic());

        let trackers = moka::sync::Cache::builder()
            .max_capacity(1024)
            .time_to_idle(session_ttl)
            .build();

        Self {
            store,
            repository,
            trackers,
            today: utc_today,
        }
    }

    /// Pins the calendar day new trackers open on.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    /// The caller's working tracker, opened on first use.
    #[tracing::instrument(name = "State::tracker", skip(self, session), fields(user_id = %session.user_id()))]
    pub async fn tracker(&self, session: &SessionContext) -> Result<SharedTracker, ApiError> {
        session.require_admin()?;

        let key = session.user_id().to_string();
        if let Some(tracker) = self.trackers.get(&key) {
            return Ok(tracker);
        }

        let tracker =
            ScratchoffTracker::open(self.repository.clone(), session.clone(), self.today()).await?;
        metrics::counter!(
            "scratchoff_loads_total",
            "outcome" => crate::routes::scratchoff::load_outcome(&tracker.notices(), 0)
        )
        .increment(1);
        tracing::info!("Opened scratch-off tracker");

        // a concurrent first request may have won the race; keep its tracker
        Ok(self
            .trackers
            .get_with(key, || Arc::new(RwLock::new(tracker))))
    }
}
