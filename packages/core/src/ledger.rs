pub mod board;
pub mod carry_forward;
pub mod roll_limit;
pub mod settings;
pub mod slot;
pub mod snapshot;
pub mod stats;

pub use board::TicketBoard;
pub use carry_forward::{apply_carry_forward, baseline_date};
pub use roll_limit::roll_limit;
pub use settings::DenominationSettings;
pub use slot::{Sale, TicketSlot, compute_sale};
pub use snapshot::{DailySnapshot, SnapshotId};
pub use stats::{BoardStats, SortConfig, SortDirection, SortKey};

/// Physical dispenser position, `1..=SLOT_COUNT`.
pub type SlotId = u8;

/// Ticket counter reading on a dispenser.
pub type Counter = u32;

pub const SLOT_COUNT: usize = 30;

pub fn is_valid_slot(slot_id: SlotId) -> bool {
    (1..=SLOT_COUNT as SlotId).contains(&slot_id)
}

/// Compiled-in denomination for a slot before settings are applied.
pub fn default_denomination(slot_id: SlotId) -> f64 {
    match slot_id {
        0..=6 => 1.0,
        7..=12 => 2.0,
        13..=18 => 5.0,
        19..=24 => 10.0,
        _ => 20.0,
    }
}
