use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{SlotId, TicketBoard, TicketSlot};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(pub String);

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One saved reconciliation, immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshot {
    id: Option<SnapshotId>,
    date_key: NaiveDate,
    slots: Vec<TicketSlot>,
    grand_total: f64,
    saved_at: DateTime<Utc>,
}

impl DailySnapshot {
    pub fn capture(board: &TicketBoard, date_key: NaiveDate, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            date_key,
            slots: board.slots().to_vec(),
            grand_total: board.grand_total(),
            saved_at,
        }
    }

    pub(crate) fn from_parts(
        id: Option<SnapshotId>,
        date_key: NaiveDate,
        slots: Vec<TicketSlot>,
        grand_total: f64,
        saved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            date_key,
            slots,
            grand_total,
            saved_at,
        }
    }

    pub fn id(&self) -> Option<&SnapshotId> {
        self.id.as_ref()
    }

    pub fn date_key(&self) -> NaiveDate {
        self.date_key
    }

    pub fn slots(&self) -> &[TicketSlot] {
        &self.slots
    }

    pub fn slot(&self, slot_id: SlotId) -> Option<&TicketSlot> {
        self.slots.iter().find(|slot| slot.slot_id() == slot_id)
    }

    pub fn grand_total(&self) -> f64 {
        self.grand_total
    }

    pub fn saved_at(&self) -> DateTime<Utc> {
        self.saved_at
    }
}
