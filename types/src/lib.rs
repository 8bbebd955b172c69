//! Fundamental types for the erapool staking engine.
//!
//! This crate defines the types shared across every other crate in the
//! workspace: account identities, timestamps, and the tunable staking
//! parameters with their production defaults.

pub mod account;
pub mod params;
pub mod time;

pub use account::AccountId;
pub use params::{StakingParams, BPS_DENOM, REWARD_SCALE};
pub use time::Timestamp;
