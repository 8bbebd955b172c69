//! Nullable asset ledger — thread-safe in-memory balances for testing.

use erapool_asset::{AssetError, AssetLedger};
use erapool_types::AccountId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    balances: HashMap<AccountId, u128>,
    /// When set, every transfer fails with `AssetError::Rejected`.
    fail_transfers: bool,
}

/// An in-memory fungible-asset ledger for testing.
///
/// Handles are cheap clones over shared balances; each handle is bound to
/// a holder account that outbound `transfer`s spend from. Tests keep one
/// handle to mint and inspect while the engine owns another bound to its
/// vault.
#[derive(Clone)]
pub struct NullAsset {
    holder: AccountId,
    inner: Arc<Mutex<Inner>>,
}

impl NullAsset {
    /// Create a fresh ledger with a handle bound to `holder`.
    pub fn new(holder: impl Into<AccountId>) -> Self {
        Self {
            holder: holder.into(),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Another handle over the same balances, bound to a different holder.
    pub fn handle_for(&self, holder: impl Into<AccountId>) -> Self {
        Self {
            holder: holder.into(),
            inner: Arc::clone(&self.inner),
        }
    }

    /// Credit `amount` to `account` out of thin air.
    pub fn mint(&self, account: &AccountId, amount: u128) {
        let mut inner = self.inner.lock().unwrap();
        let balance = inner.balances.entry(account.clone()).or_default();
        *balance += amount;
    }

    /// Current balance, zero for unknown accounts.
    pub fn balance(&self, account: &AccountId) -> u128 {
        self.inner
            .lock()
            .unwrap()
            .balances
            .get(account)
            .copied()
            .unwrap_or(0)
    }

    /// Make every subsequent transfer fail (or succeed again).
    pub fn set_fail_transfers(&self, fail: bool) {
        self.inner.lock().unwrap().fail_transfers = fail;
    }

    fn move_funds(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), AssetError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_transfers {
            return Err(AssetError::Rejected("injected transfer failure".into()));
        }
        if amount == 0 {
            return Ok(());
        }
        let available = inner.balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return Err(AssetError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        *inner.balances.get_mut(from).unwrap() -= amount;
        *inner.balances.entry(to.clone()).or_default() += amount;
        Ok(())
    }
}

impl AssetLedger for NullAsset {
    fn transfer(&mut self, to: &AccountId, amount: u128) -> Result<(), AssetError> {
        let from = self.holder.clone();
        self.move_funds(&from, to, amount)
    }

    fn transfer_from(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), AssetError> {
        self.move_funds(from, to, amount)
    }

    fn balance_of(&self, account: &AccountId) -> Result<u128, AssetError> {
        Ok(self.balance(account))
    }
}
