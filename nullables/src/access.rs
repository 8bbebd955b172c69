//! Nullable access control — configurable owner/guard sets for testing.

use erapool_asset::AccessControl;
use erapool_types::AccountId;
use std::collections::HashSet;

/// Access control backed by plain in-memory role sets.
#[derive(Clone, Debug, Default)]
pub struct NullAccess {
    owners: HashSet<AccountId>,
    guards: HashSet<AccountId>,
}

impl NullAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single account holding both the owner and guard roles.
    pub fn single(admin: impl Into<AccountId>) -> Self {
        let admin = admin.into();
        let mut access = Self::new();
        access.owners.insert(admin.clone());
        access.guards.insert(admin);
        access
    }

    pub fn grant_owner(&mut self, account: impl Into<AccountId>) {
        self.owners.insert(account.into());
    }

    pub fn grant_guard(&mut self, account: impl Into<AccountId>) {
        self.guards.insert(account.into());
    }
}

impl AccessControl for NullAccess {
    fn is_owner(&self, caller: &AccountId) -> bool {
        self.owners.contains(caller)
    }

    fn is_guard(&self, caller: &AccountId) -> bool {
        self.guards.contains(caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_independent() {
        let mut access = NullAccess::new();
        access.grant_owner("admin");
        access.grant_guard("watchdog");

        assert!(access.is_owner(&AccountId::from("admin")));
        assert!(!access.is_guard(&AccountId::from("admin")));
        assert!(access.is_guard(&AccountId::from("watchdog")));
        assert!(!access.is_owner(&AccountId::from("watchdog")));
    }

    #[test]
    fn single_holds_both_roles() {
        let access = NullAccess::single("root");
        assert!(access.is_owner(&AccountId::from("root")));
        assert!(access.is_guard(&AccountId::from("root")));
    }
}
