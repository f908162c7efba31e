use chrono::NaiveDate;

use super::{DailySnapshot, TicketBoard};

/// The calendar day whose snapshot supplies `date`'s starting counters.
pub fn baseline_date(date: NaiveDate) -> Option<NaiveDate> {
    date.pred_opt()
}

/// Copies the predecessor's ending counters into each slot's starting
/// counter. Slots the predecessor does not mention keep their value.
///
/// Returns how many slots were updated.
pub fn apply_carry_forward(board: &mut TicketBoard, predecessor: &DailySnapshot) -> usize {
    let mut applied = 0;
    for previous in predecessor.slots() {
        if board
            .set_yesterday(previous.slot_id(), previous.today_counter())
            .is_ok()
        {
            applied += 1;
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TicketSlot;
    use chrono::Utc;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn baseline_is_the_previous_calendar_day() {
        assert_eq!(baseline_date(date(2)), Some(date(1)));
        assert_eq!(
            baseline_date(date(1)),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn matching_slots_take_the_previous_ending_counter() {
        let previous = DailySnapshot::from_parts(
            None,
            date(1),
            vec![TicketSlot::restore(3, 1.0, 10, 55, 45, 45.0)],
            45.0,
            Utc::now(),
        );

        let mut board = TicketBoard::new();
        board.set_yesterday(4, 9).unwrap();

        assert_eq!(apply_carry_forward(&mut board, &previous), 1);
        assert_eq!(board.slot(3).unwrap().yesterday_counter(), 55);
        assert_eq!(board.slot(4).unwrap().yesterday_counter(), 9);
        assert_eq!(board.slot(5).unwrap().yesterday_counter(), 0);
    }

    #[test]
    fn carried_counter_reruns_the_calculator() {
        let previous = DailySnapshot::from_parts(
            None,
            date(1),
            vec![TicketSlot::restore(1, 1.0, 0, 240, 240, 240.0)],
            240.0,
            Utc::now(),
        );

        let mut board = TicketBoard::new();
        board.set_today(1, 10).unwrap();
        apply_carry_forward(&mut board, &previous);

        assert_eq!(board.slot(1).unwrap().units_sold(), 20);
        assert_eq!(board.grand_total(), 20.0);
    }
}
