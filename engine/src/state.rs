//! Global ledger state, per-participant records, and the era clock.

use crate::error::EngineError;
use erapool_types::{AccountId, StakingParams, Timestamp, BPS_DENOM, REWARD_SCALE};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Offset baked into `total_staked` so the rate divisor starts nonzero.
///
/// `sum(staked over participants) == total_staked - STAKE_SENTINEL` holds
/// at all times. The rate formula still guards a zero divisor explicitly:
/// the sentinel keeps the common path division-safe, the guard keeps
/// admin-supplied parameters (a zero duration) from faulting.
pub const STAKE_SENTINEL: u128 = 1;

/// Singleton global state, mutated by every operation.
///
/// The era clock is materialized lazily: a boundary that is due stays
/// unwritten until some state-changing call advances the clock, so
/// `current_era` always equals the number of snapshots written.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GlobalState {
    /// When era 0 began; boundary arithmetic is anchored here.
    pub start_time: Timestamp,
    /// When the clock last materialized a boundary.
    pub last_advance_at: Timestamp,
    /// Wall-clock duration of one era in seconds, admin-mutable.
    ///
    /// Zero halts the clock rather than faulting; the setter rejects it.
    pub era_length: u64,
    /// Era boundaries already materialized since `start_time`.
    pub eras_elapsed: u64,
    /// Authoritative index into `era_snapshots`; monotonically
    /// non-decreasing.
    pub current_era: u64,
    /// Rate that applied during each closed era. Append-only: era `e` is
    /// written exactly once, when its closing boundary is crossed.
    pub era_snapshots: Vec<u128>,
    /// Current per-unit-stake per-era rate, scaled by [`REWARD_SCALE`].
    pub reward_rate: u128,
    /// Pool balance as read from the reward-asset ledger at the last rate
    /// recomputation. Never trusted across operations.
    pub total_pool_funds: u128,
    /// Sum of all stakes plus [`STAKE_SENTINEL`].
    pub total_staked: u128,
    /// Normalization window of the rate formula, in era units. Distinct
    /// from `era_length` and deliberately not reconciled with it.
    pub duration_param: u64,
    /// Deposit tax in basis points.
    pub deposit_tax_bps: u32,
    /// Replenish skim in basis points, applied while enabled.
    pub replenish_tax_bps: u32,
    pub replenish_enabled: bool,
    /// Deposit tax collected and not yet swept.
    pub tax_total: u128,
    /// Replenish units routed to the beneficiary, resettable counter.
    pub replenish_accumulated: u128,
    /// Replenish units routed to the beneficiary, lifetime monotone.
    pub replenish_total_lifetime: u128,
    /// Timelock applied to withdraw-after-deposit and claim-after-claim.
    pub timelock_secs: u64,
    /// Global halt flag for deposit/withdraw.
    pub paused: bool,
    /// Number of participants with a nonzero stake.
    pub participant_count: u64,
}

impl GlobalState {
    pub fn new(params: &StakingParams, start_time: Timestamp) -> Self {
        Self {
            start_time,
            last_advance_at: start_time,
            era_length: params.era_length_secs,
            eras_elapsed: 0,
            current_era: 0,
            era_snapshots: Vec::new(),
            reward_rate: 0,
            total_pool_funds: 0,
            total_staked: STAKE_SENTINEL,
            duration_param: params.duration_param,
            deposit_tax_bps: params.deposit_tax_bps,
            replenish_tax_bps: params.replenish_tax_bps,
            replenish_enabled: params.replenish_enabled,
            tax_total: 0,
            replenish_accumulated: 0,
            replenish_total_lifetime: 0,
            timelock_secs: params.timelock_secs,
            paused: false,
            participant_count: 0,
        }
    }

    /// Era boundaries due but not yet materialized at `now`.
    pub fn eras_due(&self, now: Timestamp) -> u64 {
        if self.era_length == 0 {
            return 0;
        }
        let total_units = self.start_time.elapsed_since(now) / self.era_length;
        total_units.saturating_sub(self.eras_elapsed)
    }

    /// Bring the era timeline up to date.
    ///
    /// Each boundary crossed snapshots the rate as of this call — all
    /// boundaries crossed at once receive the same value, not per-step
    /// recomputations. Idempotent within one era length. Returns the
    /// number of eras materialized.
    pub fn advance_era(&mut self, now: Timestamp) -> u64 {
        let due = self.eras_due(now);
        if due > 0 {
            for _ in 0..due {
                self.era_snapshots.push(self.reward_rate);
                self.current_era += 1;
            }
            self.eras_elapsed += due;
            self.last_advance_at = now;
            tracing::debug!(
                eras = due,
                current_era = self.current_era,
                rate = self.reward_rate,
                "era boundary materialized"
            );
        }
        due
    }

    /// Recompute the reward rate from a fresh pool-balance reading.
    ///
    /// `rate = pool_funds * SCALE / (total_staked * duration_param)`,
    /// with a zero divisor yielding rate 0 rather than faulting. Old era
    /// snapshots keep whatever was written; only eras closing after this
    /// call observe the new rate.
    pub fn recompute_rate(&mut self, pool_funds: u128) -> Result<(), EngineError> {
        self.total_pool_funds = pool_funds;
        let divisor = self
            .total_staked
            .checked_mul(self.duration_param as u128)
            .ok_or(EngineError::Overflow)?;
        self.reward_rate = if divisor == 0 {
            0
        } else {
            pool_funds
                .checked_mul(REWARD_SCALE)
                .ok_or(EngineError::Overflow)?
                / divisor
        };
        tracing::debug!(
            rate = self.reward_rate,
            pool_funds,
            total_staked = self.total_staked,
            "reward rate recomputed"
        );
        Ok(())
    }

    /// Deposit tax for a gross amount, truncating basis-point math.
    pub fn deposit_toll(&self, gross: u128) -> Result<u128, EngineError> {
        gross
            .checked_mul(self.deposit_tax_bps as u128)
            .map(|scaled| scaled / BPS_DENOM)
            .ok_or(EngineError::Overflow)
    }
}

/// Ledger entry for one participant.
///
/// Born lazily on first deposit and never deleted — a full withdrawal
/// zeroes the stake but keeps the record so lifetime totals stay
/// queryable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Current stake (post-tax units of the stake asset).
    pub staked: u128,
    /// Era up to which rewards are already folded into `rewards_owed`.
    pub settlement_era: u64,
    /// Accrued-but-unclaimed rewards, scaled by [`REWARD_SCALE`].
    pub rewards_owed: u128,
    pub last_deposit_at: Timestamp,
    pub last_claim_at: Timestamp,
    /// Cumulative de-scaled rewards ever paid out. Monotone.
    pub lifetime_claimed: u128,
}

impl ParticipantRecord {
    /// Fresh record settling from `current_era` — a new participant never
    /// accrues for eras that closed before they arrived.
    pub fn new(current_era: u64) -> Self {
        Self {
            staked: 0,
            settlement_era: current_era,
            rewards_owed: 0,
            last_deposit_at: Timestamp::EPOCH,
            last_claim_at: Timestamp::EPOCH,
            lifetime_claimed: 0,
        }
    }
}

/// The complete mutable ledger: global state, participant records, and
/// the blacklist.
///
/// `Clone` is the transactional checkpoint — a failed operation restores
/// the pre-call value wholesale.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineState {
    pub global: GlobalState,
    pub participants: HashMap<AccountId, ParticipantRecord>,
    pub blacklist: HashSet<AccountId>,
}

impl EngineState {
    pub fn new(params: &StakingParams, start_time: Timestamp) -> Self {
        Self {
            global: GlobalState::new(params, start_time),
            participants: HashMap::new(),
            blacklist: HashSet::new(),
        }
    }

    /// Get or lazily create the record for `participant`.
    pub fn record_mut(&mut self, participant: &AccountId) -> &mut ParticipantRecord {
        let current_era = self.global.current_era;
        self.participants
            .entry(participant.clone())
            .or_insert_with(|| ParticipantRecord::new(current_era))
    }

    /// Fold elapsed-era snapshots into a participant's owed rewards and
    /// advance their settlement pointer.
    ///
    /// This is the single authoritative place where `rewards_owed` is
    /// updated. The stake applied is the stake held entering this call,
    /// flat across the whole `[settlement_era, current_era)` interval —
    /// every stake mutation forces settlement first, so the interval
    /// never spans a stake change. Blacklisted participants settle to
    /// zero. The pointer advances unconditionally, including no-op and
    /// blacklisted settlements.
    pub fn settle(&mut self, participant: &AccountId) -> Result<(), EngineError> {
        let to = self.global.current_era;
        let blacklisted = self.blacklist.contains(participant);
        let rec = match self.participants.get_mut(participant) {
            Some(rec) => rec,
            None => return Ok(()),
        };
        if blacklisted {
            rec.rewards_owed = 0;
        } else if rec.staked > 0 {
            let mut owed = rec.rewards_owed;
            for era in rec.settlement_era..to {
                let accrual = self.global.era_snapshots[era as usize]
                    .checked_mul(rec.staked)
                    .ok_or(EngineError::Overflow)?;
                owed = owed.checked_add(accrual).ok_or(EngineError::Overflow)?;
            }
            rec.rewards_owed = owed;
        }
        rec.settlement_era = to;
        Ok(())
    }

    /// Read-only settlement: what `rewards_owed` would hold after a
    /// settle over the materialized timeline. Saturates on overflow.
    pub fn pending_rewards(&self, participant: &AccountId) -> u128 {
        if self.blacklist.contains(participant) {
            return 0;
        }
        let Some(rec) = self.participants.get(participant) else {
            return 0;
        };
        let mut owed = rec.rewards_owed;
        if rec.staked > 0 {
            for era in rec.settlement_era..self.global.current_era {
                let accrual = self.global.era_snapshots[era as usize].saturating_mul(rec.staked);
                owed = owed.saturating_add(accrual);
            }
        }
        owed
    }

    /// Sum of all participant stakes, excluding the sentinel.
    pub fn staked_sum(&self) -> u128 {
        self.participants.values().map(|rec| rec.staked).sum()
    }
}
