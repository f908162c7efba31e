use serde::{Deserialize, Serialize};

use super::{
    Counter, SLOT_COUNT, SlotId, TicketSlot, default_denomination, snapshot::DailySnapshot,
};
use crate::error::{LedgerError, Result};

/// The 30-slot working state, always kept in slot id order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketBoard {
    slots: Vec<TicketSlot>,
}

impl Default for TicketBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketBoard {
    pub fn new() -> Self {
        let slots = (1..=SLOT_COUNT as SlotId)
            .map(|slot_id| TicketSlot::new(slot_id, default_denomination(slot_id)))
            .collect();
        Self { slots }
    }

    pub fn slots(&self) -> &[TicketSlot] {
        &self.slots
    }

    pub fn slot(&self, slot_id: SlotId) -> Option<&TicketSlot> {
        self.index_of(slot_id).map(|index| &self.slots[index])
    }

    fn index_of(&self, slot_id: SlotId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.slot_id() == slot_id)
    }

    fn slot_mut(&mut self, slot_id: SlotId) -> Result<&mut TicketSlot> {
        let index = self
            .index_of(slot_id)
            .ok_or(LedgerError::UnknownSlot(slot_id))?;
        Ok(&mut self.slots[index])
    }

    pub fn set_today(&mut self, slot_id: SlotId, counter: Counter) -> Result<&TicketSlot> {
        let slot = self.slot_mut(slot_id)?;
        slot.set_today(counter);
        Ok(slot)
    }

    pub fn set_yesterday(&mut self, slot_id: SlotId, counter: Counter) -> Result<&TicketSlot> {
        let slot = self.slot_mut(slot_id)?;
        slot.set_yesterday(counter);
        Ok(slot)
    }

    pub fn set_denomination(&mut self, slot_id: SlotId, denomination: f64) -> Result<&TicketSlot> {
        let slot = self.slot_mut(slot_id)?;
        slot.set_denomination(denomination);
        Ok(slot)
    }

    /// Replaces matching slots with the persisted ones, derived fields and all.
    /// Slots the snapshot does not mention are left alone.
    pub fn restore_from(&mut self, snapshot: &DailySnapshot) -> usize {
        let mut restored = 0;
        for saved in snapshot.slots() {
            if let Some(index) = self.index_of(saved.slot_id()) {
                self.slots[index] = saved.clone();
                restored += 1;
            }
        }
        restored
    }

    pub fn grand_total(&self) -> f64 {
        self.slots.iter().map(TicketSlot::revenue).sum()
    }

    pub fn total_units_sold(&self) -> u64 {
        self.slots
            .iter()
            .map(|slot| u64::from(slot.units_sold()))
            .sum()
    }
}
