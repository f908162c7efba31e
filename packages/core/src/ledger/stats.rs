use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{SlotId, TicketBoard, TicketSlot};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub total_units_sold: u64,
    pub grand_total: f64,
    pub average_denomination: f64,
    /// Ties resolve to the later slot.
    pub most_sold_slot: Option<SlotId>,
    pub highest_revenue: f64,
}

impl BoardStats {
    pub fn of(board: &TicketBoard) -> Self {
        let slots = board.slots();

        let average_denomination = if slots.is_empty() {
            0.0
        } else {
            slots.iter().map(TicketSlot::denomination).sum::<f64>() / slots.len() as f64
        };

        // max_by_key keeps the last of equal maxima
        let most_sold_slot = slots
            .iter()
            .max_by_key(|slot| slot.units_sold())
            .map(TicketSlot::slot_id);

        let highest_revenue = slots
            .iter()
            .map(TicketSlot::revenue)
            .fold(0.0, f64::max);

        Self {
            total_units_sold: board.total_units_sold(),
            grand_total: board.grand_total(),
            average_denomination,
            most_sold_slot,
            highest_revenue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    Denomination,
    Yesterday,
    Today,
    Sold,
    Revenue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::Id,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortConfig {
    /// Same key flips ascending to descending, anything else starts ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self { key, direction }
    }

    pub fn sort<'a>(&self, board: &'a TicketBoard) -> Vec<&'a TicketSlot> {
        let mut slots: Vec<&TicketSlot> = board.slots().iter().collect();
        slots.sort_by(|a, b| {
            let ordering = self.compare(a, b);
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        slots
    }

    fn compare(&self, a: &TicketSlot, b: &TicketSlot) -> Ordering {
        match self.key {
            SortKey::Id => a.slot_id().cmp(&b.slot_id()),
            SortKey::Denomination => a.denomination().total_cmp(&b.denomination()),
            SortKey::Yesterday => a.yesterday_counter().cmp(&b.yesterday_counter()),
            SortKey::Today => a.today_counter().cmp(&b.today_counter()),
            SortKey::Sold => a.units_sold().cmp(&b.units_sold()),
            SortKey::Revenue => a.revenue().total_cmp(&b.revenue()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_on_an_idle_board() {
        let stats = BoardStats::of(&TicketBoard::new());
        assert_eq!(stats.total_units_sold, 0);
        assert_eq!(stats.grand_total, 0.0);
        // (6 * (1 + 2 + 5 + 10 + 20)) / 30
        assert_eq!(stats.average_denomination, 7.6);
        assert_eq!(stats.most_sold_slot, Some(30));
        assert_eq!(stats.highest_revenue, 0.0);
    }

    #[test]
    fn stats_pick_the_best_slots() {
        let mut board = TicketBoard::new();
        board.set_today(2, 40).unwrap();
        board.set_today(8, 40).unwrap();
        board.set_today(26, 3).unwrap();

        let stats = BoardStats::of(&board);
        assert_eq!(stats.total_units_sold, 83);
        assert_eq!(stats.most_sold_slot, Some(8));
        assert_eq!(stats.highest_revenue, 80.0);
        assert_eq!(stats.grand_total, 40.0 + 80.0 + 60.0);
    }

    #[test]
    fn toggle_flips_only_the_active_key() {
        let sort = SortConfig::default();
        let sort = sort.toggle(SortKey::Id);
        assert_eq!(sort.direction, SortDirection::Descending);

        let sort = sort.toggle(SortKey::Id);
        assert_eq!(sort.direction, SortDirection::Ascending);

        let sort = sort.toggle(SortKey::Sold);
        assert_eq!(sort.key, SortKey::Sold);
        assert_eq!(sort.direction, SortDirection::Ascending);
    }

    #[test]
    fn sorts_by_revenue_descending() {
        let mut board = TicketBoard::new();
        board.set_today(1, 5).unwrap();
        board.set_today(25, 1).unwrap();
        board.set_today(13, 2).unwrap();

        let sort = SortConfig {
            key: SortKey::Revenue,
            direction: SortDirection::Descending,
        };
        let ids: Vec<SlotId> = sort
            .sort(&board)
            .iter()
            .take(3)
            .map(|slot| slot.slot_id())
            .collect();
        assert_eq!(ids, vec![25, 13, 1]);
        assert_eq!(sort.sort(&board).len(), 30);
    }
}
