//! Scratch-off ticket ledger for the store back office.
//!
//! The crate exposes:
//! - [`ledger`]: pure reconciliation logic (roll limits, per-slot sales,
//!   baseline carry-forward, settings overlay, board statistics).
//! - [`documents`]: the loosely typed store documents and their coercion into
//!   the ledger types.
//! - [`ScratchoffRepository`]: typed access to the document store.
//! - [`ScratchoffTracker`]: the stateful working session a UI shell drives.

pub mod documents;
pub mod error;
pub mod ledger;
pub mod notice;
pub mod repository;
pub mod session;
pub mod tracker;

pub use error::LedgerError;
pub use ledger::{
    BoardStats, Counter, DailySnapshot, DenominationSettings, SLOT_COUNT, Sale, SlotId,
    SnapshotId, SortConfig, SortDirection, SortKey, TicketBoard, TicketSlot, compute_sale,
    roll_limit,
};
pub use notice::{Notice, NoticeLevel};
pub use repository::{RepositoryConfig, ScratchoffRepository};
pub use session::{Role, SessionContext};
pub use tracker::ScratchoffTracker;
