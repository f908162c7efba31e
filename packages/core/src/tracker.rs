//! Stateful scratch-off session.
//!
//! A tracker owns the working board for one signed-in admin. Edits are
//! synchronous and recompute only the touched slot. Store reads never fail
//! the session: they leave the board as it was and queue a warning notice.
//! Saves are append-only and guarded against overlap.

use std::sync::atomic::{AtomicBool, Ordering};

use backoffice_types::Value;
use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::{
    documents::{coerce, date_key},
    error::{LedgerError, Result},
    ledger::{
        BoardStats, DailySnapshot, DenominationSettings, SlotId, SnapshotId, SortConfig, SortKey,
        TicketBoard, TicketSlot, apply_carry_forward, baseline_date,
    },
    notice::Notice,
    repository::ScratchoffRepository,
    session::SessionContext,
};

pub struct ScratchoffTracker {
    repository: ScratchoffRepository,
    session: SessionContext,
    board: TicketBoard,
    date: NaiveDate,
    sort: SortConfig,
    saving: AtomicBool,
    notices: Mutex<Vec<Notice>>,
}

/// Clears the save flag when the save future finishes or is dropped.
struct SaveGuard<'a>(&'a AtomicBool);

impl<'a> SaveGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LedgerError::SaveInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ScratchoffTracker {
    /// Starts a session on `today`: default board, settings overlay and the
    /// baseline from the day before, both read concurrently.
    #[tracing::instrument(name = "ScratchoffTracker::open", skip(repository, session), fields(user_id = %session.user_id()))]
    pub async fn open(
        repository: ScratchoffRepository,
        session: SessionContext,
        today: NaiveDate,
    ) -> Result<Self> {
        session.require_admin()?;

        let mut tracker = Self {
            repository,
            session,
            board: TicketBoard::new(),
            date: today,
            sort: SortConfig::default(),
            saving: AtomicBool::new(false),
            notices: Mutex::new(Vec::new()),
        };

        let repository = &tracker.repository;
        let (settings, baseline) = tokio::join!(repository.load_settings(), async {
            match baseline_date(today) {
                Some(day) => repository.find_snapshot(day).await,
                None => Ok(None),
            }
        });

        match settings {
            Ok(Some(settings)) => {
                let applied = settings.apply_to(&mut tracker.board);
                info!(applied, "Applied denomination settings");
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Error loading settings: {}", e);
                tracker.notify(Notice::warning("Failed to load ticket settings"));
            }
        }

        match baseline {
            Ok(Some(previous)) => {
                let applied = apply_carry_forward(&mut tracker.board, &previous);
                info!(applied, "Carried forward yesterday's counters");
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Error loading yesterday's data: {}", e);
                tracker.notify(Notice::warning("Failed to load yesterday's data"));
            }
        }

        Ok(tracker)
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn board(&self) -> &TicketBoard {
        &self.board
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn grand_total(&self) -> f64 {
        self.board.grand_total()
    }

    pub fn stats(&self) -> BoardStats {
        BoardStats::of(&self.board)
    }

    pub fn sort_config(&self) -> SortConfig {
        self.sort
    }

    pub fn sort_by(&mut self, key: SortKey) -> SortConfig {
        self.sort = self.sort.toggle(key);
        self.sort
    }

    pub fn sorted_slots(&self) -> Vec<&TicketSlot> {
        self.sort.sort(&self.board)
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }

    /// Raw input is coerced; anything non-numeric counts as 0.
    pub fn set_today(&mut self, slot_id: SlotId, raw: &Value) -> Result<&TicketSlot> {
        self.board.set_today(slot_id, coerce::counter(Some(raw)))
    }

    pub fn set_denomination(&mut self, slot_id: SlotId, raw: &Value) -> Result<&TicketSlot> {
        self.board
            .set_denomination(slot_id, coerce::amount(Some(raw)))
    }

    /// Switches the reconciliation date.
    ///
    /// A snapshot saved for `date` replaces the matching slots verbatim, then
    /// the previous day's snapshot supplies the starting counters, possibly
    /// overriding the ones just loaded. Without either snapshot the board is
    /// left as it is. A failed read changes nothing and queues a warning.
    #[tracing::instrument(name = "ScratchoffTracker::select_date", skip(self), fields(user_id = %self.session.user_id()))]
    pub async fn select_date(&mut self, date: NaiveDate) -> Result<()> {
        self.date = date;

        let repository = &self.repository;
        let (target, previous) = tokio::join!(repository.find_snapshot(date), async {
            match baseline_date(date) {
                Some(day) => repository.find_snapshot(day).await,
                None => Ok(None),
            }
        });

        let (target, previous) = match (target, previous) {
            (Ok(target), Ok(previous)) => (target, previous),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to load data for selected date: {}", e);
                self.notify(Notice::warning("Failed to load selected date's data"));
                return Ok(());
            }
        };

        if let Some(snapshot) = target {
            let restored = self.board.restore_from(&snapshot);
            info!(restored, "Loaded saved snapshot");
            self.notify(Notice::success(format!(
                "Loaded data for {}",
                date_key(date)
            )));
        }

        if let Some(snapshot) = previous {
            let applied = apply_carry_forward(&mut self.board, &snapshot);
            info!(applied, "Carried forward previous day's counters");
        }

        Ok(())
    }

    /// Appends the working board as a new snapshot for the selected date.
    #[tracing::instrument(name = "ScratchoffTracker::save", skip(self), fields(user_id = %self.session.user_id(), date = %self.date))]
    pub async fn save(&self) -> Result<SnapshotId> {
        self.session.require_admin()?;
        let _guard = SaveGuard::acquire(&self.saving)?;

        let snapshot = DailySnapshot::capture(&self.board, self.date, Utc::now());
        match self.repository.append_snapshot(&snapshot).await {
            Ok(id) => {
                info!(snapshot_id = %id, grand_total = snapshot.grand_total(), "Saved scratch-off snapshot");
                self.notify(Notice::success("Scratch-off data saved successfully!"));
                Ok(id)
            }
            Err(e) => {
                error!("Failed to save data: {}", e);
                self.notify(Notice::error("Failed to save data"));
                Err(e.into())
            }
        }
    }

    /// Replaces the stored settings with the board's current denominations.
    #[tracing::instrument(name = "ScratchoffTracker::save_settings", skip(self), fields(user_id = %self.session.user_id()))]
    pub async fn save_settings(&self) -> Result<DenominationSettings> {
        self.session.require_admin()?;
        let _guard = SaveGuard::acquire(&self.saving)?;

        let settings = DenominationSettings::from_board(&self.board, Utc::now());
        match self.repository.replace_settings(&settings).await {
            Ok(()) => {
                info!(values = settings.len(), "Saved denomination settings");
                self.notify(Notice::success("Settings saved successfully!"));
                Ok(settings)
            }
            Err(e) => {
                error!("Failed to save settings: {}", e);
                self.notify(Notice::error("Failed to save settings"));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_storage::MemoryStore;
    use backoffice_types::json;
    use std::sync::Arc;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn repository() -> ScratchoffRepository {
        ScratchoffRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn employees_cannot_open_the_ledger() {
        let result =
            ScratchoffTracker::open(repository(), SessionContext::employee("clerk"), date(2)).await;
        assert!(matches!(result, Err(LedgerError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn raw_input_is_coerced() {
        let mut tracker =
            ScratchoffTracker::open(repository(), SessionContext::admin("owner"), date(2))
                .await
                .unwrap();

        tracker.set_today(13, &json!("15")).unwrap();
        assert_eq!(tracker.board().slot(13).unwrap().units_sold(), 15);

        tracker.set_today(13, &json!("fifteen")).unwrap();
        assert_eq!(tracker.board().slot(13).unwrap().units_sold(), 0);

        tracker.set_denomination(13, &json!("abc")).unwrap();
        assert_eq!(tracker.board().slot(13).unwrap().denomination(), 0.0);

        assert!(matches!(
            tracker.set_today(99, &json!(1)),
            Err(LedgerError::UnknownSlot(99))
        ));
    }

    #[test]
    fn save_guard_blocks_reentry() {
        let flag = AtomicBool::new(false);
        let guard = SaveGuard::acquire(&flag).unwrap();
        assert!(matches!(
            SaveGuard::acquire(&flag),
            Err(LedgerError::SaveInProgress)
        ));
        drop(guard);
        assert!(SaveGuard::acquire(&flag).is_ok());
    }
}
