use crate::AssetError;
use erapool_types::AccountId;

/// A fungible-asset ledger, viewed from a single holder account.
///
/// A handle is bound to one holder at construction time — for the engine,
/// its vault account. `transfer` spends from that bound holder, matching a
/// ledger whose outbound transfers are implicit in the caller identity.
/// The stake asset and the reward asset are independent instances; the
/// engine holds one handle for each.
///
/// Every method may fail. The engine treats any failure as fatal to the
/// enclosing operation (`TransferFailed`), rolling back all of its state.
pub trait AssetLedger {
    /// Move `amount` from the bound holder account to `to`.
    ///
    /// A zero `amount` is a success no-op.
    fn transfer(&mut self, to: &AccountId, amount: u128) -> Result<(), AssetError>;

    /// Move `amount` from `from` to `to` on the holder's authority.
    fn transfer_from(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), AssetError>;

    /// Current balance of `account`.
    fn balance_of(&self, account: &AccountId) -> Result<u128, AssetError>;
}
