//! Events emitted on committed engine operations for subscribers.

use erapool_types::AccountId;

/// Engine-level events that observers can subscribe to via the [`EventBus`].
///
/// Events describe committed state only: an operation that fails emits
/// nothing, no matter how far it got.
#[derive(Clone, Debug)]
pub enum EngineEvent {
    /// The global reward rate was recomputed.
    RateUpdated {
        rate: u128,
        pool_funds: u128,
        total_staked: u128,
    },
    /// A deposit was accepted; `net` entered the stake, `toll` the tax pot.
    DepositAccepted {
        participant: AccountId,
        gross: u128,
        net: u128,
        toll: u128,
    },
    /// A participant withdrew their full stake.
    WithdrawalCompleted {
        participant: AccountId,
        amount: u128,
    },
    /// A claim paid out; `replenished` went to the secondary beneficiary.
    ClaimPaid {
        participant: AccountId,
        paid: u128,
        replenished: u128,
    },
    /// The guard halted or resumed deposits/withdrawals.
    PauseToggled { paused: bool },
    /// Replenish mode was reconfigured.
    ReplenishToggled { enabled: bool, rate_bps: u32 },
    /// The access capability was swapped out.
    GuardRotated,
}

/// Synchronous fan-out event bus for engine events.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast
/// to avoid stalling the operation that committed.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&EngineEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&EngineEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &EngineEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
