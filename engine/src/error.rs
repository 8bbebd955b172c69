//! Engine-specific errors.

use erapool_asset::AssetError;
use erapool_types::Timestamp;
use thiserror::Error;

/// Every failure aborts the enclosing operation with no partial state
/// change; callers decide whether to retry.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("amount must be non-zero")]
    InvalidAmount,

    #[error("deposits and withdrawals are paused")]
    Paused,

    #[error("participant is blacklisted")]
    Blacklisted,

    #[error("timelocked until {ready_at}")]
    Timelocked { ready_at: Timestamp },

    #[error("no rewards to claim")]
    NoRewards,

    #[error("external asset transfer failed: {0}")]
    TransferFailed(#[from] AssetError),

    #[error("caller lacks the required role")]
    Unauthorized,

    #[error("requested {requested} exceeds recorded tax total {recorded}")]
    MaxExceeded { requested: u128, recorded: u128 },

    #[error("requested {requested} exceeds actual reserves {available}")]
    InsufficientReserves { requested: u128, available: u128 },

    #[error("an operation is already executing")]
    ReentrantCall,

    #[error("arithmetic overflow in reward computation")]
    Overflow,
}
