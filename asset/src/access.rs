use erapool_types::AccountId;

/// Authorization capability consumed by the engine.
///
/// The engine never manages identities or grants — it only asks. The owner
/// role gates the administrative surface; the guard role gates
/// pause/unpause. A caller may hold both roles.
pub trait AccessControl {
    fn is_owner(&self, caller: &AccountId) -> bool;
    fn is_guard(&self, caller: &AccountId) -> bool;
}
