//! Store document shapes.
//!
//! Writes go through the serde structs below. Reads never trust the stored
//! shape: every field is coerced with [`coerce`] before it reaches the
//! ledger, so a malformed document degrades to zeros instead of failing.

use backoffice_types::{StoreError, StoredDocument, Value};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::{
    DailySnapshot, DenominationSettings, SlotId, SnapshotId, TicketSlot, is_valid_slot,
};

pub mod coerce;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date_key(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingValue {
    pub id: SlotId,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    pub values: Vec<SettingValue>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl SettingsDocument {
    pub fn from_value(value: &Value) -> Self {
        let values = coerce::array(value.get("values"))
            .iter()
            .filter_map(|entry| {
                let id = coerce::slot_id(entry.get("id"))?;
                Some(SettingValue {
                    id,
                    value: coerce::amount(entry.get("value")),
                })
            })
            .collect();

        Self {
            values,
            updated_at: coerce::timestamp(value.get("updatedAt")),
        }
    }

    pub fn to_value(&self) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<&DenominationSettings> for SettingsDocument {
    fn from(settings: &DenominationSettings) -> Self {
        Self {
            values: settings
                .values()
                .map(|(id, value)| SettingValue { id, value })
                .collect(),
            updated_at: settings.updated_at(),
        }
    }
}

impl From<SettingsDocument> for DenominationSettings {
    fn from(document: SettingsDocument) -> Self {
        DenominationSettings::new(
            document
                .values
                .into_iter()
                .filter(|entry| is_valid_slot(entry.id))
                .map(|entry| (entry.id, entry.value)),
        )
        .with_updated_at(document.updated_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub id: SlotId,
    pub value: f64,
    pub yesterday: u32,
    pub today: u32,
    pub sold: u32,
    pub total: f64,
}

impl SnapshotRow {
    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            id: coerce::slot_id(value.get("id"))?,
            value: coerce::amount(value.get("value")),
            yesterday: coerce::counter(value.get("yesterday")),
            today: coerce::counter(value.get("today")),
            sold: coerce::counter(value.get("sold")),
            total: coerce::amount(value.get("total")),
        })
    }
}

impl From<&TicketSlot> for SnapshotRow {
    fn from(slot: &TicketSlot) -> Self {
        Self {
            id: slot.slot_id(),
            value: slot.denomination(),
            yesterday: slot.yesterday_counter(),
            today: slot.today_counter(),
            sold: slot.units_sold(),
            total: slot.revenue(),
        }
    }
}

impl From<&SnapshotRow> for TicketSlot {
    fn from(row: &SnapshotRow) -> Self {
        TicketSlot::restore(
            row.id,
            row.value,
            row.yesterday,
            row.today,
            row.sold,
            row.total,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    pub date_string: String,
    pub rows: Vec<SnapshotRow>,
    pub grand_total: f64,
    pub date: Option<DateTime<Utc>>,
}

impl SnapshotDocument {
    pub fn from_value(value: &Value) -> Self {
        Self {
            date_string: value
                .get("dateString")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            rows: coerce::array(value.get("rows"))
                .iter()
                .filter_map(SnapshotRow::from_value)
                .collect(),
            grand_total: coerce::amount(value.get("grandTotal")),
            date: coerce::timestamp(value.get("date")),
        }
    }

    pub fn to_value(&self) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(self)?)
    }

    /// `fallback_date` stands in when the stored date string is unreadable.
    pub fn into_snapshot(self, id: Option<SnapshotId>, fallback_date: NaiveDate) -> DailySnapshot {
        let date = parse_date_key(&self.date_string).unwrap_or(fallback_date);
        DailySnapshot::from_parts(
            id,
            date,
            self.rows.iter().map(TicketSlot::from).collect(),
            self.grand_total,
            self.date.unwrap_or_default(),
        )
    }
}

impl From<&DailySnapshot> for SnapshotDocument {
    fn from(snapshot: &DailySnapshot) -> Self {
        Self {
            date_string: date_key(snapshot.date_key()),
            rows: snapshot.slots().iter().map(SnapshotRow::from).collect(),
            grand_total: snapshot.grand_total(),
            date: Some(snapshot.saved_at()),
        }
    }
}

pub fn snapshot_from_stored(doc: &StoredDocument, fallback_date: NaiveDate) -> DailySnapshot {
    SnapshotDocument::from_value(&doc.data)
        .into_snapshot(Some(SnapshotId(doc.id.clone())), fallback_date)
}
