use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SlotId, TicketBoard};

/// Persisted `slot -> denomination` overrides, edited independently of any
/// daily snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenominationSettings {
    values: BTreeMap<SlotId, f64>,
    updated_at: Option<DateTime<Utc>>,
}

impl DenominationSettings {
    pub fn new(values: impl IntoIterator<Item = (SlotId, f64)>) -> Self {
        Self {
            values: values.into_iter().collect(),
            updated_at: None,
        }
    }

    /// Settings mirroring the board's current denominations. Non-finite
    /// values are left out.
    pub fn from_board(board: &TicketBoard, updated_at: DateTime<Utc>) -> Self {
        Self {
            values: board
                .slots()
                .iter()
                .filter(|slot| slot.denomination().is_finite())
                .map(|slot| (slot.slot_id(), slot.denomination()))
                .collect(),
            updated_at: Some(updated_at),
        }
    }

    pub fn with_updated_at(mut self, updated_at: Option<DateTime<Utc>>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn get(&self, slot_id: SlotId) -> Option<f64> {
        self.values.get(&slot_id).copied()
    }

    pub fn values(&self) -> impl Iterator<Item = (SlotId, f64)> + '_ {
        self.values.iter().map(|(slot_id, value)| (*slot_id, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Overrides the denomination of every slot listed; the rest keep theirs.
    pub fn apply_to(&self, board: &mut TicketBoard) -> usize {
        self.values()
            .filter(|(slot_id, value)| board.set_denomination(*slot_id, *value).is_ok())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::default_denomination;

    #[test]
    fn overlay_only_touches_listed_slots() {
        let mut board = TicketBoard::new();
        let settings = DenominationSettings::new([(5, 3.0)]);

        assert_eq!(settings.apply_to(&mut board), 1);
        for slot in board.slots() {
            if slot.slot_id() == 5 {
                assert_eq!(slot.denomination(), 3.0);
            } else {
                assert_eq!(slot.denomination(), default_denomination(slot.slot_id()));
            }
        }
    }

    #[test]
    fn overlay_skips_slots_outside_the_board() {
        let mut board = TicketBoard::new();
        let settings = DenominationSettings::new([(0, 3.0), (31, 3.0), (2, 10.0)]);

        assert_eq!(settings.apply_to(&mut board), 1);
        assert_eq!(board.slot(2).unwrap().denomination(), 10.0);
    }

    #[test]
    fn from_board_drops_non_finite_values() {
        let mut board = TicketBoard::new();
        board.set_denomination(4, f64::NAN).unwrap();

        let settings = DenominationSettings::from_board(&board, Utc::now());
        assert_eq!(settings.len(), 29);
        assert!(settings.get(4).is_none());
        assert_eq!(settings.get(30), Some(20.0));
        assert!(settings.updated_at().is_some());
    }
}
