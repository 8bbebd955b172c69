//! Capability traits the erapool engine consumes but does not implement.
//!
//! The engine moves value through an external fungible-asset ledger and
//! gates privileged operations through an external authorization check.
//! Both are injected as trait objects; the rest of the workspace depends
//! only on the traits. Production hosts supply real implementations, tests
//! use the doubles in `erapool-nullables`.

pub mod access;
pub mod error;
pub mod ledger;

pub use access::AccessControl;
pub use error::AssetError;
pub use ledger::AssetLedger;
