//! The staking engine — deposits, withdrawals, settlement, claims.

use crate::error::EngineError;
use crate::events::{EngineEvent, EventBus};
use crate::state::{EngineState, ParticipantRecord};
use erapool_asset::{AccessControl, AssetLedger};
use erapool_types::{AccountId, StakingParams, Timestamp, REWARD_SCALE};

/// The staking engine — owns the ledger state and the injected
/// capabilities, and serializes every mutation through a non-reentrant
/// transactional scope.
///
/// The engine holds one asset-ledger handle per asset: the stake asset
/// (pulled on deposit, pushed on withdrawal, taxed into the vault) and the
/// reward asset (the pool read by the rate calculator and paid out on
/// claim). Both handles are bound to the engine's `vault` account.
pub struct StakingEngine {
    pub(crate) state: EngineState,
    pub(crate) stake_asset: Box<dyn AssetLedger>,
    pub(crate) reward_asset: Box<dyn AssetLedger>,
    pub(crate) access: Box<dyn AccessControl>,
    pub(crate) vault: AccountId,
    pub(crate) beneficiary: AccountId,
    pub(crate) events: EventBus,
    pub(crate) pending_events: Vec<EngineEvent>,
    pub(crate) entered: bool,
}

impl StakingEngine {
    pub fn new(
        params: &StakingParams,
        start_time: Timestamp,
        vault: AccountId,
        beneficiary: AccountId,
        stake_asset: Box<dyn AssetLedger>,
        reward_asset: Box<dyn AssetLedger>,
        access: Box<dyn AccessControl>,
    ) -> Self {
        Self {
            state: EngineState::new(params, start_time),
            stake_asset,
            reward_asset,
            access,
            vault,
            beneficiary,
            events: EventBus::new(),
            pending_events: Vec::new(),
            entered: false,
        }
    }

    /// The complete ledger state, read-only.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// A participant's record, if one was ever created.
    pub fn participant(&self, participant: &AccountId) -> Option<&ParticipantRecord> {
        self.state.participants.get(participant)
    }

    /// What a settlement right now would leave the participant owed
    /// (scaled). Read-only; the materialized era timeline is not advanced.
    pub fn pending_rewards(&self, participant: &AccountId) -> u128 {
        self.state.pending_rewards(participant)
    }

    /// Subscribe to committed-operation events.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Run one public operation: reject reentrant invocation, checkpoint
    /// the ledger, and either commit (emitting buffered events) or restore
    /// the checkpoint wholesale. External asset transfers can call back
    /// into the host; the `entered` flag is what rejects a nested
    /// operation on this instance.
    pub(crate) fn transactional<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        if self.entered {
            return Err(EngineError::ReentrantCall);
        }
        self.entered = true;
        let checkpoint = self.state.clone();
        let result = op(self);
        match &result {
            Ok(_) => {
                for event in std::mem::take(&mut self.pending_events) {
                    tracing::info!(?event, "engine event");
                    self.events.emit(&event);
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "operation aborted, state restored");
                self.state = checkpoint;
                self.pending_events.clear();
            }
        }
        self.entered = false;
        result
    }

    /// Buffer an event for emission on commit.
    pub(crate) fn note(&mut self, event: EngineEvent) {
        self.pending_events.push(event);
    }

    /// Re-read the pool balance and recompute the reward rate.
    pub(crate) fn sync_pool_rate(&mut self) -> Result<(), EngineError> {
        let pool = self.reward_asset.balance_of(&self.vault)?;
        self.state.global.recompute_rate(pool)?;
        self.note(EngineEvent::RateUpdated {
            rate: self.state.global.reward_rate,
            pool_funds: pool,
            total_staked: self.state.global.total_staked,
        });
        Ok(())
    }

    /// Stake `raw_amount` of the stake asset for `participant`.
    ///
    /// Settlement runs on the pre-deposit stake before the new stake is
    /// added, so the deposited amount cannot retroactively earn rewards
    /// for eras already passed. The deposit tax is skimmed off the raw
    /// amount; the net enters the stake. Returns the net amount credited.
    pub fn deposit(
        &mut self,
        participant: &AccountId,
        raw_amount: u128,
        now: Timestamp,
    ) -> Result<u128, EngineError> {
        self.transactional(|eng| {
            if eng.state.global.paused {
                return Err(EngineError::Paused);
            }
            if raw_amount == 0 {
                return Err(EngineError::InvalidAmount);
            }
            if eng.state.blacklist.contains(participant) {
                return Err(EngineError::Blacklisted);
            }

            eng.state.global.advance_era(now);
            eng.state.record_mut(participant);
            eng.state.settle(participant)?;

            eng.stake_asset
                .transfer_from(participant, &eng.vault, raw_amount)?;

            let toll = eng.state.global.deposit_toll(raw_amount)?;
            let net = raw_amount - toll;
            eng.state.global.tax_total = eng
                .state
                .global
                .tax_total
                .checked_add(toll)
                .ok_or(EngineError::Overflow)?;
            eng.state.global.total_staked = eng
                .state
                .global
                .total_staked
                .checked_add(net)
                .ok_or(EngineError::Overflow)?;

            let rec = eng.state.record_mut(participant);
            let was_unstaked = rec.staked == 0;
            rec.staked = rec.staked.checked_add(net).ok_or(EngineError::Overflow)?;
            rec.last_deposit_at = now;
            if was_unstaked && net > 0 {
                eng.state.global.participant_count += 1;
            }

            eng.sync_pool_rate()?;
            eng.note(EngineEvent::DepositAccepted {
                participant: participant.clone(),
                gross: raw_amount,
                net,
                toll,
            });
            Ok(net)
        })
    }

    /// Withdraw the participant's full stake.
    ///
    /// Rewards are settled up to the current era before the stake is
    /// zeroed, so pending accrual is preserved in `rewards_owed` and can
    /// still be claimed. Returns the amount pushed back out.
    pub fn withdraw(
        &mut self,
        participant: &AccountId,
        now: Timestamp,
    ) -> Result<u128, EngineError> {
        self.transactional(|eng| {
            if eng.state.global.paused {
                return Err(EngineError::Paused);
            }
            let timelock = eng.state.global.timelock_secs;
            let rec = eng
                .state
                .participants
                .get(participant)
                .ok_or(EngineError::InvalidAmount)?;
            if rec.staked == 0 {
                return Err(EngineError::InvalidAmount);
            }
            if !rec.last_deposit_at.has_expired(timelock, now) {
                return Err(EngineError::Timelocked {
                    ready_at: rec.last_deposit_at.plus_secs(timelock),
                });
            }

            eng.state.global.advance_era(now);
            eng.state.settle(participant)?;

            let rec = eng
                .state
                .participants
                .get_mut(participant)
                .ok_or(EngineError::InvalidAmount)?;
            let amount = rec.staked;
            rec.staked = 0;
            rec.last_deposit_at = Timestamp::EPOCH;

            eng.stake_asset.transfer(participant, amount)?;

            eng.state.global.total_staked = eng
                .state
                .global
                .total_staked
                .checked_sub(amount)
                .ok_or(EngineError::Overflow)?;
            eng.state.global.participant_count =
                eng.state.global.participant_count.saturating_sub(1);

            eng.sync_pool_rate()?;
            eng.note(EngineEvent::WithdrawalCompleted {
                participant: participant.clone(),
                amount,
            });
            Ok(amount)
        })
    }

    /// Claim accrued rewards, net of the replenish split.
    ///
    /// The owed balance is brought current, split into a payable portion
    /// and a replenish portion for the secondary beneficiary, de-scaled
    /// (truncating — dust below one pool unit is accepted loss), and paid
    /// out in two all-or-nothing transfers. Returns the de-scaled amount
    /// paid to the participant.
    pub fn claim(&mut self, participant: &AccountId, now: Timestamp) -> Result<u128, EngineError> {
        self.transactional(|eng| {
            if eng.state.global.paused {
                return Err(EngineError::Paused);
            }
            if eng.state.blacklist.contains(participant) {
                return Err(EngineError::Blacklisted);
            }
            let timelock = eng.state.global.timelock_secs;
            let rec = eng
                .state
                .participants
                .get(participant)
                .ok_or(EngineError::NoRewards)?;
            if !rec.last_claim_at.has_expired(timelock, now) {
                return Err(EngineError::Timelocked {
                    ready_at: rec.last_claim_at.plus_secs(timelock),
                });
            }
            // Nothing owed and no closed era left to settle. Checked
            // against the era timeline as materialized so far: an era
            // that is due but unwritten does not count.
            if rec.settlement_era == eng.state.global.current_era && rec.rewards_owed == 0 {
                return Err(EngineError::NoRewards);
            }

            eng.state.global.advance_era(now);
            eng.state.settle(participant)?;

            let owed = eng
                .state
                .participants
                .get(participant)
                .ok_or(EngineError::NoRewards)?
                .rewards_owed;
            let replenish_scaled = if eng.state.global.replenish_enabled {
                // Divide-then-multiply is the fixed disbursement rule:
                // truncate to a percent basis before applying the rate.
                (owed / 100) * (eng.state.global.replenish_tax_bps as u128 / 100)
            } else {
                0
            };
            let paid = (owed - replenish_scaled) / REWARD_SCALE;
            let replenished = replenish_scaled / REWARD_SCALE;

            eng.reward_asset.transfer(participant, paid)?;
            let beneficiary = eng.beneficiary.clone();
            eng.reward_asset.transfer(&beneficiary, replenished)?;

            let rec = eng
                .state
                .participants
                .get_mut(participant)
                .ok_or(EngineError::NoRewards)?;
            rec.rewards_owed = 0;
            rec.lifetime_claimed = rec
                .lifetime_claimed
                .checked_add(paid)
                .ok_or(EngineError::Overflow)?;
            rec.last_claim_at = now;
            eng.state.global.replenish_accumulated = eng
                .state
                .global
                .replenish_accumulated
                .checked_add(replenished)
                .ok_or(EngineError::Overflow)?;
            eng.state.global.replenish_total_lifetime = eng
                .state
                .global
                .replenish_total_lifetime
                .checked_add(replenished)
                .ok_or(EngineError::Overflow)?;

            eng.sync_pool_rate()?;
            eng.state.global.advance_era(now);
            eng.note(EngineEvent::ClaimPaid {
                participant: participant.clone(),
                paid,
                replenished,
            });
            Ok(paid)
        })
    }
}
