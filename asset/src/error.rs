use thiserror::Error;

/// Failure modes of an external asset-ledger call.
///
/// Any of these aborts the engine operation that made the call; the engine
/// never retries a failed transfer.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("insufficient asset balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("account not known to the ledger: {0}")]
    UnknownAccount(String),

    #[error("ledger rejected the call: {0}")]
    Rejected(String),
}
