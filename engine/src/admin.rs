//! Administrative and guard surface.
//!
//! These operations carry no accrual logic of their own — they are state
//! mutations the core tolerates at arbitrary times. Owner-gated unless
//! noted; pause/unpause is gated on the guard role. Every operation runs
//! in the same transactional scope as the core, so a rejected call leaves
//! nothing behind.

use crate::engine::StakingEngine;
use crate::error::EngineError;
use crate::events::EngineEvent;
use erapool_asset::{AccessControl, AssetLedger};
use erapool_types::{AccountId, Timestamp};

impl StakingEngine {
    fn require_owner(&self, caller: &AccountId) -> Result<(), EngineError> {
        if self.access.is_owner(caller) {
            Ok(())
        } else {
            Err(EngineError::Unauthorized)
        }
    }

    fn require_guard(&self, caller: &AccountId) -> Result<(), EngineError> {
        if self.access.is_guard(caller) {
            Ok(())
        } else {
            Err(EngineError::Unauthorized)
        }
    }

    /// Change the era length.
    ///
    /// Boundaries already due are materialized under the old length
    /// first; only future boundary computations use the new value, and
    /// already-written snapshots are untouched.
    pub fn set_era_length(
        &mut self,
        caller: &AccountId,
        secs: u64,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        self.transactional(|eng| {
            eng.require_owner(caller)?;
            if secs == 0 {
                return Err(EngineError::InvalidAmount);
            }
            eng.state.global.advance_era(now);
            eng.state.global.era_length = secs;
            Ok(())
        })
    }

    /// Change the shared withdraw/claim timelock.
    pub fn set_timelock(&mut self, caller: &AccountId, secs: u64) -> Result<(), EngineError> {
        self.transactional(|eng| {
            eng.require_owner(caller)?;
            eng.state.global.timelock_secs = secs;
            Ok(())
        })
    }

    /// Change the deposit tax rate.
    pub fn set_deposit_tax(&mut self, caller: &AccountId, bps: u32) -> Result<(), EngineError> {
        self.transactional(|eng| {
            eng.require_owner(caller)?;
            if bps > 10_000 {
                return Err(EngineError::InvalidAmount);
            }
            eng.state.global.deposit_tax_bps = bps;
            Ok(())
        })
    }

    /// Change the rate formula's normalization window.
    ///
    /// Zero is tolerated: the rate calculator guards the divisor and
    /// yields a zero rate instead of faulting.
    pub fn set_duration_param(
        &mut self,
        caller: &AccountId,
        era_units: u64,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        self.transactional(|eng| {
            eng.require_owner(caller)?;
            eng.state.global.advance_era(now);
            eng.state.global.duration_param = era_units;
            eng.sync_pool_rate()?;
            Ok(())
        })
    }

    /// Point the replenish split at a different secondary beneficiary.
    pub fn set_beneficiary(
        &mut self,
        caller: &AccountId,
        account: AccountId,
    ) -> Result<(), EngineError> {
        self.transactional(|eng| {
            eng.require_owner(caller)?;
            eng.beneficiary = account;
            Ok(())
        })
    }

    /// Rebind the engine's vault account on both asset ledgers.
    pub fn set_vault(&mut self, caller: &AccountId, vault: AccountId) -> Result<(), EngineError> {
        self.transactional(|eng| {
            eng.require_owner(caller)?;
            eng.vault = vault;
            eng.sync_pool_rate()?;
            Ok(())
        })
    }

    /// Swap the stake-asset ledger handle.
    pub fn set_stake_asset(
        &mut self,
        caller: &AccountId,
        ledger: Box<dyn AssetLedger>,
    ) -> Result<(), EngineError> {
        self.transactional(move |eng| {
            eng.require_owner(caller)?;
            eng.stake_asset = ledger;
            Ok(())
        })
    }

    /// Swap the reward-asset ledger handle; the pool is re-read from the
    /// new ledger immediately.
    pub fn set_reward_asset(
        &mut self,
        caller: &AccountId,
        ledger: Box<dyn AssetLedger>,
    ) -> Result<(), EngineError> {
        self.transactional(move |eng| {
            eng.require_owner(caller)?;
            eng.reward_asset = ledger;
            eng.sync_pool_rate()?;
            Ok(())
        })
    }

    /// Exclude accounts from reward accrual. Their owed rewards are
    /// forced to zero at their next settlement.
    pub fn blacklist_add(
        &mut self,
        caller: &AccountId,
        accounts: &[AccountId],
    ) -> Result<(), EngineError> {
        self.transactional(|eng| {
            eng.require_owner(caller)?;
            for account in accounts {
                eng.state.blacklist.insert(account.clone());
            }
            Ok(())
        })
    }

    /// Re-admit accounts to reward accrual.
    pub fn blacklist_remove(
        &mut self,
        caller: &AccountId,
        accounts: &[AccountId],
    ) -> Result<(), EngineError> {
        self.transactional(|eng| {
            eng.require_owner(caller)?;
            for account in accounts {
                eng.state.blacklist.remove(account);
            }
            Ok(())
        })
    }

    /// Halt or resume deposits, withdrawals, and claims. Guard role.
    pub fn set_paused(&mut self, caller: &AccountId, paused: bool) -> Result<(), EngineError> {
        self.transactional(|eng| {
            eng.require_guard(caller)?;
            eng.state.global.paused = paused;
            eng.note(EngineEvent::PauseToggled { paused });
            Ok(())
        })
    }

    /// Reconfigure the replenish skim applied at claim time.
    pub fn set_replenish(
        &mut self,
        caller: &AccountId,
        enabled: bool,
        rate_bps: u32,
    ) -> Result<(), EngineError> {
        self.transactional(|eng| {
            eng.require_owner(caller)?;
            if rate_bps > 10_000 {
                return Err(EngineError::InvalidAmount);
            }
            eng.state.global.replenish_enabled = enabled;
            eng.state.global.replenish_tax_bps = rate_bps;
            eng.note(EngineEvent::ReplenishToggled { enabled, rate_bps });
            Ok(())
        })
    }

    /// Bring the era timeline current and recompute the rate from a
    /// fresh pool reading.
    pub fn refresh_rate(&mut self, caller: &AccountId, now: Timestamp) -> Result<(), EngineError> {
        self.transactional(|eng| {
            eng.require_owner(caller)?;
            eng.state.global.advance_era(now);
            eng.sync_pool_rate()?;
            Ok(())
        })
    }

    /// Withdraw accumulated deposit tax to the caller, bounded by the
    /// recorded tax total and by what the vault actually holds.
    pub fn sweep_tax(&mut self, caller: &AccountId, amount: u128) -> Result<(), EngineError> {
        self.transactional(|eng| {
            eng.require_owner(caller)?;
            if amount == 0 {
                return Err(EngineError::InvalidAmount);
            }
            let recorded = eng.state.global.tax_total;
            if amount > recorded {
                return Err(EngineError::MaxExceeded {
                    requested: amount,
                    recorded,
                });
            }
            let available = eng.stake_asset.balance_of(&eng.vault)?;
            if amount > available {
                return Err(EngineError::InsufficientReserves {
                    requested: amount,
                    available,
                });
            }
            eng.stake_asset.transfer(caller, amount)?;
            eng.state.global.tax_total = recorded - amount;
            Ok(())
        })
    }

    /// Swap the injected access capability (owner and guard rotation).
    pub fn rotate_access(
        &mut self,
        caller: &AccountId,
        access: Box<dyn AccessControl>,
    ) -> Result<(), EngineError> {
        self.transactional(move |eng| {
            eng.require_owner(caller)?;
            eng.access = access;
            eng.note(EngineEvent::GuardRotated);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::STAKE_SENTINEL;
    use erapool_nullables::{NullAccess, NullAsset};
    use erapool_types::{StakingParams, REWARD_SCALE};

    fn acct(s: &str) -> AccountId {
        AccountId::from(s)
    }

    fn t(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn params() -> StakingParams {
        StakingParams {
            era_length_secs: 100,
            duration_param: 7,
            timelock_secs: 50,
            deposit_tax_bps: 500,
            replenish_tax_bps: 2000,
            replenish_enabled: false,
        }
    }

    struct Harness {
        engine: StakingEngine,
        stake: NullAsset,
        reward: NullAsset,
    }

    fn harness_with_access(access: NullAccess) -> Harness {
        let stake = NullAsset::new("vault");
        let reward = NullAsset::new("vault");
        let engine = StakingEngine::new(
            &params(),
            Timestamp::EPOCH,
            acct("vault"),
            acct("beneficiary"),
            Box::new(stake.clone()),
            Box::new(reward.clone()),
            Box::new(access),
        );
        Harness {
            engine,
            stake,
            reward,
        }
    }

    fn harness() -> Harness {
        harness_with_access(NullAccess::single("admin"))
    }

    #[test]
    fn non_owner_is_rejected_everywhere() {
        let mut h = harness();
        let mallory = acct("mallory");
        assert!(matches!(
            h.engine.set_era_length(&mallory, 10, t(0)),
            Err(EngineError::Unauthorized)
        ));
        assert!(matches!(
            h.engine.set_deposit_tax(&mallory, 100),
            Err(EngineError::Unauthorized)
        ));
        assert!(matches!(
            h.engine.sweep_tax(&mallory, 1),
            Err(EngineError::Unauthorized)
        ));
        assert!(matches!(
            h.engine.blacklist_add(&mallory, &[acct("x")]),
            Err(EngineError::Unauthorized)
        ));
        assert!(matches!(
            h.engine.set_replenish(&mallory, true, 1000),
            Err(EngineError::Unauthorized)
        ));
    }

    #[test]
    fn pause_is_guard_gated_not_owner_gated() {
        let mut access = NullAccess::new();
        access.grant_owner("owner");
        access.grant_guard("watchdog");
        let mut h = harness_with_access(access);

        assert!(matches!(
            h.engine.set_paused(&acct("owner"), true),
            Err(EngineError::Unauthorized)
        ));
        h.engine.set_paused(&acct("watchdog"), true).unwrap();
        assert!(h.engine.state().global.paused);
        h.engine.set_paused(&acct("watchdog"), false).unwrap();
        assert!(!h.engine.state().global.paused);
    }

    #[test]
    fn era_length_change_materializes_old_boundaries_first() {
        let mut h = harness();
        h.engine.set_era_length(&acct("admin"), 50, t(250)).unwrap();
        // Two eras closed under length 100 before the switch.
        assert_eq!(h.engine.state().global.current_era, 2);
        assert_eq!(h.engine.state().global.era_length, 50);

        h.engine.refresh_rate(&acct("admin"), t(400)).unwrap();
        // 400 / 50 = 8 total units, 2 already elapsed.
        assert_eq!(h.engine.state().global.current_era, 8);
    }

    #[test]
    fn era_length_zero_is_rejected() {
        let mut h = harness();
        assert!(matches!(
            h.engine.set_era_length(&acct("admin"), 0, t(0)),
            Err(EngineError::InvalidAmount)
        ));
    }

    #[test]
    fn deposit_tax_cannot_exceed_100_percent() {
        let mut h = harness();
        assert!(matches!(
            h.engine.set_deposit_tax(&acct("admin"), 10_001),
            Err(EngineError::InvalidAmount)
        ));
        h.engine.set_deposit_tax(&acct("admin"), 10_000).unwrap();
        assert_eq!(h.engine.state().global.deposit_tax_bps, 10_000);
    }

    #[test]
    fn refresh_rate_reads_the_pool() {
        let mut h = harness();
        h.reward.mint(&acct("vault"), 700);
        h.engine.refresh_rate(&acct("admin"), t(0)).unwrap();
        // total_staked is the bare sentinel here.
        assert_eq!(
            h.engine.state().global.reward_rate,
            700 * REWARD_SCALE / (STAKE_SENTINEL * 7)
        );
        assert_eq!(h.engine.state().global.total_pool_funds, 700);
    }

    #[test]
    fn duration_param_reshapes_the_rate() {
        let mut h = harness();
        h.reward.mint(&acct("vault"), 700);
        h.engine.set_duration_param(&acct("admin"), 1, t(0)).unwrap();
        assert_eq!(h.engine.state().global.reward_rate, 700 * REWARD_SCALE);

        // Zero duration falls back to a zero rate, not a fault.
        h.engine.set_duration_param(&acct("admin"), 0, t(0)).unwrap();
        assert_eq!(h.engine.state().global.reward_rate, 0);
    }

    #[test]
    fn sweep_tax_respects_recorded_total() {
        let mut h = harness();
        h.stake.mint(&acct("alice"), 100);
        h.engine.deposit(&acct("alice"), 100, t(0)).unwrap();
        assert_eq!(h.engine.state().global.tax_total, 5);

        assert!(matches!(
            h.engine.sweep_tax(&acct("admin"), 6),
            Err(EngineError::MaxExceeded {
                requested: 6,
                recorded: 5
            })
        ));

        h.engine.sweep_tax(&acct("admin"), 5).unwrap();
        assert_eq!(h.engine.state().global.tax_total, 0);
        assert_eq!(h.stake.balance(&acct("admin")), 5);
    }

    #[test]
    fn sweep_tax_respects_actual_reserves() {
        let mut h = harness();
        h.stake.mint(&acct("vault"), 3);
        // Recorded total says 50, the vault holds 3.
        h.engine.state.global.tax_total = 50;

        assert!(matches!(
            h.engine.sweep_tax(&acct("admin"), 10),
            Err(EngineError::InsufficientReserves {
                requested: 10,
                available: 3
            })
        ));
    }

    #[test]
    fn sweep_tax_rejects_zero() {
        let mut h = harness();
        assert!(matches!(
            h.engine.sweep_tax(&acct("admin"), 0),
            Err(EngineError::InvalidAmount)
        ));
    }

    #[test]
    fn blacklist_bulk_add_and_remove() {
        let mut h = harness();
        let listed = [acct("a"), acct("b"), acct("c")];
        h.engine.blacklist_add(&acct("admin"), &listed).unwrap();
        assert_eq!(h.engine.state().blacklist.len(), 3);

        h.engine
            .blacklist_remove(&acct("admin"), &listed[..2])
            .unwrap();
        assert_eq!(h.engine.state().blacklist.len(), 1);
        assert!(h.engine.state().blacklist.contains(&acct("c")));
    }

    #[test]
    fn replenish_reconfiguration_validates_rate() {
        let mut h = harness();
        assert!(matches!(
            h.engine.set_replenish(&acct("admin"), true, 10_001),
            Err(EngineError::InvalidAmount)
        ));
        h.engine.set_replenish(&acct("admin"), true, 3000).unwrap();
        assert!(h.engine.state().global.replenish_enabled);
        assert_eq!(h.engine.state().global.replenish_tax_bps, 3000);
    }

    #[test]
    fn beneficiary_change_redirects_replenish() {
        let mut h = harness();
        h.reward.mint(&acct("vault"), 1000);
        h.engine.set_replenish(&acct("admin"), true, 2000).unwrap();
        h.engine
            .set_beneficiary(&acct("admin"), acct("treasury2"))
            .unwrap();
        h.engine.state.record_mut(&acct("alice")).rewards_owed = 100 * REWARD_SCALE;

        h.engine.claim(&acct("alice"), t(60)).unwrap();
        assert_eq!(h.reward.balance(&acct("treasury2")), 20);
        assert_eq!(h.reward.balance(&acct("beneficiary")), 0);
    }

    #[test]
    fn rotate_access_hands_over_control() {
        let mut h = harness();
        h.engine
            .rotate_access(&acct("admin"), Box::new(NullAccess::single("admin2")))
            .unwrap();

        assert!(matches!(
            h.engine.set_timelock(&acct("admin"), 10),
            Err(EngineError::Unauthorized)
        ));
        h.engine.set_timelock(&acct("admin2"), 10).unwrap();
        assert_eq!(h.engine.state().global.timelock_secs, 10);
    }

    #[test]
    fn failed_admin_call_changes_nothing() {
        let mut h = harness();
        let before = h.engine.state().global.clone();
        let _ = h.engine.set_era_length(&acct("admin"), 0, t(999)).unwrap_err();
        assert_eq!(h.engine.state().global.current_era, before.current_era);
        assert_eq!(h.engine.state().global.era_length, before.era_length);
        assert_eq!(h.engine.state().global.eras_elapsed, before.eras_elapsed);
    }
}
