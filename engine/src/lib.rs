//! Era-based staking and reward accrual engine.
//!
//! Participants stake a fungible asset and accrue rewards per discrete
//! era from a separately funded pool. The accrued amount for one era is
//! `rate × stake`, where the rate is snapshotted globally at each era
//! boundary — settlement replays the snapshots a participant has not yet
//! folded in, so accrual is proportional to stake held during each era
//! regardless of when anyone calls in.
//!
//! This crate handles:
//! - Era advancement and per-era reward-rate snapshotting
//! - Rate recomputation from pool funds and total stake
//! - Deposit/withdrawal bookkeeping with deposit tax
//! - Per-participant pro-rata settlement
//! - Claim disbursement with the replenish split
//!
//! Value transfer and authorization are consumed as capabilities
//! (`erapool-asset`); every public mutation runs in a non-reentrant
//! transactional scope that commits fully or not at all.

pub mod admin;
pub mod engine;
pub mod error;
pub mod events;
pub mod state;

pub use engine::StakingEngine;
pub use error::EngineError;
pub use events::{EngineEvent, EventBus};
pub use state::{EngineState, GlobalState, ParticipantRecord};
