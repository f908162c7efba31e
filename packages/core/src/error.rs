use backoffice_types::StoreError;
use thiserror::Error;

use crate::ledger::SlotId;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("user {user_id} is not allowed to view the scratch-off ledger")]
    Forbidden { user_id: String },
    #[error("a save is already in progress")]
    SaveInProgress,
    #[error("unknown ticket slot {0}")]
    UnknownSlot(SlotId),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Store failures are recoverable; the session stays usable.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, LedgerError::Store(_))
    }
}
