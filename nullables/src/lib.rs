//! Nullable infrastructure for deterministic testing.
//!
//! The engine's external dependencies (time source, asset ledgers, access
//! control) are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch a real ledger or clock
//!
//! Usage: swap real implementations for nullables in tests.

pub mod access;
pub mod asset;
pub mod clock;

pub use access::NullAccess;
pub use asset::NullAsset;
pub use clock::NullClock;
