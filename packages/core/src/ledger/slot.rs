use serde::{Deserialize, Serialize};

use super::{Counter, SlotId, roll_limit};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub units_sold: Counter,
    pub revenue: f64,
}

/// Units sold between two counter readings and the revenue they bring in.
///
/// A reading below yesterday's is taken as exactly one roll wrap. The
/// calculator cannot tell a wrap from a bad entry, so it never goes below
/// zero instead of guessing further.
pub fn compute_sale(yesterday: Counter, today: Counter, denomination: f64) -> Sale {
    let units_sold = if today >= yesterday {
        today - yesterday
    } else {
        let wrapped = (u64::from(today) + u64::from(roll_limit(denomination)))
            .saturating_sub(u64::from(yesterday));
        // today < yesterday keeps this below the roll limit
        wrapped as Counter
    };

    Sale {
        units_sold,
        revenue: f64::from(units_sold) * denomination,
    }
}

/// One dispenser position on the board.
///
/// `units_sold` and `revenue` only change through the setters, which rerun
/// [`compute_sale`] for this slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSlot {
    slot_id: SlotId,
    denomination: f64,
    yesterday_counter: Counter,
    today_counter: Counter,
    units_sold: Counter,
    revenue: f64,
}

impl TicketSlot {
    pub fn new(slot_id: SlotId, denomination: f64) -> Self {
        Self {
            slot_id,
            denomination,
            yesterday_counter: 0,
            today_counter: 0,
            units_sold: 0,
            revenue: 0.0,
        }
    }

    /// Rebuilds a slot exactly as it was persisted, derived fields included.
    pub(crate) fn restore(
        slot_id: SlotId,
        denomination: f64,
        yesterday_counter: Counter,
        today_counter: Counter,
        units_sold: Counter,
        revenue: f64,
    ) -> Self {
        Self {
            slot_id,
            denomination,
            yesterday_counter,
            today_counter,
            units_sold,
            revenue,
        }
    }

    pub fn slot_id(&self) -> SlotId {
        self.slot_id
    }

    pub fn denomination(&self) -> f64 {
        self.denomination
    }

    pub fn yesterday_counter(&self) -> Counter {
        self.yesterday_counter
    }

    pub fn today_counter(&self) -> Counter {
        self.today_counter
    }

    pub fn units_sold(&self) -> Counter {
        self.units_sold
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    pub fn roll_limit(&self) -> Counter {
        roll_limit(self.denomination)
    }

    pub fn set_today(&mut self, counter: Counter) {
        self.today_counter = counter;
        self.recompute();
    }

    pub fn set_yesterday(&mut self, counter: Counter) {
        self.yesterday_counter = counter;
        self.recompute();
    }

    pub fn set_denomination(&mut self, denomination: f64) {
        self.denomination = denomination;
        self.recompute();
    }

    pub fn recompute(&mut self) {
        let sale = compute_sale(self.yesterday_counter, self.today_counter, self.denomination);
        self.units_sold = sale.units_sold;
        self.revenue = sale.revenue;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_progression_is_a_plain_difference() {
        let sale = compute_sale(30, 45, 5.0);
        assert_eq!(sale.units_sold, 15);
        assert_eq!(sale.revenue, 75.0);

        for (yesterday, today, denomination) in [(0, 0, 1.0), (12, 12, 20.0), (3, 200, 2.0)] {
            let sale = compute_sale(yesterday, today, denomination);
            assert_eq!(sale.units_sold, today - yesterday);
            assert_eq!(sale.revenue, f64::from(today - yesterday) * denomination);
        }
    }

    #[test]
    fn lower_reading_assumes_one_wrap() {
        let sale = compute_sale(240, 10, 1.0);
        assert_eq!(sale.units_sold, 20);
        assert_eq!(sale.revenue, 20.0);

        let sale = compute_sale(20, 5, 10.0);
        assert_eq!(sale.units_sold, 10);
        assert_eq!(sale.revenue, 100.0);
    }

    #[test]
    fn unknown_denomination_never_goes_negative() {
        let sale = compute_sale(50, 40, 7.0);
        assert_eq!(sale.units_sold, 0);
        assert_eq!(sale.revenue, 0.0);
    }

    #[test]
    fn wrap_larger_than_roll_clamps_to_zero() {
        // yesterday beyond the roll length can only come from bad input
        let sale = compute_sale(400, 10, 5.0);
        assert_eq!(sale.units_sold, 0);
    }

    #[test]
    fn huge_readings_do_not_overflow() {
        let sale = compute_sale(Counter::MAX, Counter::MAX - 1, 1.0);
        assert_eq!(sale.units_sold, 249);
    }

    #[test]
    fn setters_recompute_the_slot() {
        let mut slot = TicketSlot::new(3, 2.0);
        slot.set_yesterday(100);
        // today still at 0 reads as one wrap: 0 + 150 - 100
        assert_eq!(slot.units_sold(), 50);
        assert_eq!(slot.revenue(), 100.0);

        slot.set_today(130);
        assert_eq!(slot.units_sold(), 30);
        assert_eq!(slot.revenue(), 60.0);

        slot.set_denomination(3.0);
        assert_eq!(slot.units_sold(), 30);
        assert_eq!(slot.revenue(), 90.0);

        slot.set_today(40);
        assert_eq!(slot.units_sold(), 90);
        assert_eq!(slot.revenue(), 270.0);
    }
}
